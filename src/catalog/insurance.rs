use serde::{Deserialize, Serialize};

/// One insurance circle as listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceCircleListing {
    /// Circle contract address.
    pub id: String,
    pub name: String,
    pub contribution_amount: u64,
    /// Days.
    pub contribution_period: u32,
    /// Days.
    pub voting_period: u32,
    pub coverage_limit: u64,
    pub members: u32,
    pub total_funds: u64,
}

pub fn fetch_insurance_circles() -> Vec<InsuranceCircleListing> {
    vec![
        InsuranceCircleListing {
            id: "0x69030eFC11616251C01f2cA4CA181e7c85E67080".to_string(),
            name: "Crop Insurance Pool".to_string(),
            contribution_amount: 50,
            contribution_period: 30,
            voting_period: 7,
            coverage_limit: 10000,
            members: 100,
            total_funds: 25000,
        },
        InsuranceCircleListing {
            id: "0x69030eFC11616251C01f2cA4CA181e7c85E67073".to_string(),
            name: "Small Business Protection".to_string(),
            contribution_amount: 100,
            contribution_period: 15,
            voting_period: 5,
            coverage_limit: 20000,
            members: 50,
            total_funds: 40000,
        },
    ]
}

/// Look a circle up by address, ignoring hex case.
pub fn fetch_an_insurance_circle(id: &str) -> Option<InsuranceCircleListing> {
    fetch_insurance_circles()
        .into_iter()
        .find(|circle| circle.id.eq_ignore_ascii_case(id))
}
