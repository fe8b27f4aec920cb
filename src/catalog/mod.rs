//! Static listings shown before any chain data is loaded.
//!
//! These are fixed fixtures, not a data source: no I/O and no caching.

pub mod insurance;
pub mod savings;

pub use insurance::{fetch_an_insurance_circle, fetch_insurance_circles, InsuranceCircleListing};
pub use savings::{
    fetch_a_group_saving, fetch_group_savings, fetch_investment_savings, GroupSavingDetail,
    GroupSavingSummary,
};
