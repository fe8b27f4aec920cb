use serde::{Deserialize, Serialize};

/// One row of the group-savings listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSavingSummary {
    pub id: String,
    pub name: String,
    pub members: u32,
    pub total_savings: u64,
}

/// Detail view of a single group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSavingDetail {
    pub id: String,
    pub name: String,
    pub members: u32,
    pub total_savings: u64,
    pub goal: u64,
    pub owner: String,
}

fn listing() -> Vec<GroupSavingSummary> {
    vec![
        GroupSavingSummary {
            id: "0x01".to_string(),
            name: "Family Vacation Fund".to_string(),
            members: 5,
            total_savings: 5000,
        },
        GroupSavingSummary {
            id: "0x02".to_string(),
            name: "Wedding Gift Pool".to_string(),
            members: 8,
            total_savings: 2000,
        },
    ]
}

pub fn fetch_group_savings() -> Vec<GroupSavingSummary> {
    listing()
}

/// Any id resolves; the detail is a fixture echoed back under that id.
pub fn fetch_a_group_saving(group_id: &str) -> GroupSavingDetail {
    GroupSavingDetail {
        id: group_id.to_string(),
        name: "Family Group".to_string(),
        members: 5,
        total_savings: 5000,
        goal: 10000,
        owner: "0x02".to_string(),
    }
}

/// Groups a user invests in. Not yet filtered by user.
pub fn fetch_investment_savings(_user_address: &str) -> Vec<GroupSavingSummary> {
    listing()
}
