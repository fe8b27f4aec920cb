//! Micro-insurance circle and its factory.

use alloy::primitives::{Address, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::contracts::{percent_to_basis_points, signatures, ContractCall, ViewCall};
use crate::error::{Error, Result};

sol! {
    #[derive(Debug, PartialEq, Eq)]
    interface IMicroInsurance {
        function members(address member) external view returns (bool isMember, bool isPending, uint256 lastPremiumPayment);
        function claims(uint256 claimId) external view returns (address claimant, uint256 amount, uint256 votesFor, uint256 votesAgainst, bool executed, bool vetoed);
        function isPremiumUpToDate(address member) external view returns (bool);
        function totalMembers() external view returns (uint256);
        function poolBalance() external view returns (uint256);

        function requestMembership() external;
        function approveMembership(address requester) external;
        function rejectMembership(address requester) external;
        function payPremium() external;
        function submitClaim(uint256 amount) external;
        function voteOnClaim(uint256 claimId, bool inFavor) external;
        function executeClaim(uint256 claimId) external;
        function vetoClaim(uint256 claimId) external;
    }

    #[derive(Debug, PartialEq, Eq)]
    interface IMicroInsuranceFactory {
        function insuranceCircles(uint256 id) external view returns (address);
        function createMicroInsurance(address token, uint256 contributionAmount, uint256 period, uint256 votingThreshold, uint256 maxClaimAmount, string name) external returns (address);
    }
}

use IMicroInsurance::*;
use IMicroInsuranceFactory::*;

pub(crate) static SIGNATURES: &[([u8; 4], &str)] = signatures![
    membersCall,
    claimsCall,
    isPremiumUpToDateCall,
    totalMembersCall,
    poolBalanceCall,
    requestMembershipCall,
    approveMembershipCall,
    rejectMembershipCall,
    payPremiumCall,
    submitClaimCall,
    voteOnClaimCall,
    executeClaimCall,
    vetoClaimCall,
    insuranceCirclesCall,
    createMicroInsuranceCall,
];

/// A deployed insurance circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MicroInsurance {
    address: Address,
}

impl MicroInsurance {
    pub fn at(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    fn view<C: SolCall>(&self, call: C) -> ViewCall<C> {
        ViewCall::new(self.address, call)
    }

    fn write<C: SolCall>(&self, call: C) -> ContractCall {
        ContractCall::new(self.address, &call)
    }

    pub fn member_status(&self, member: Address) -> ViewCall<membersCall> {
        self.view(membersCall { member })
    }

    pub fn claim(&self, claim_id: U256) -> ViewCall<claimsCall> {
        self.view(claimsCall { claimId: claim_id })
    }

    pub fn is_premium_up_to_date(&self, member: Address) -> ViewCall<isPremiumUpToDateCall> {
        self.view(isPremiumUpToDateCall { member })
    }

    pub fn total_members(&self) -> ViewCall<totalMembersCall> {
        self.view(totalMembersCall {})
    }

    pub fn pool_balance(&self) -> ViewCall<poolBalanceCall> {
        self.view(poolBalanceCall {})
    }

    pub fn request_membership(&self) -> ContractCall {
        self.write(requestMembershipCall {})
    }

    pub fn approve_membership(&self, requester: Address) -> ContractCall {
        self.write(approveMembershipCall { requester })
    }

    pub fn reject_membership(&self, requester: Address) -> ContractCall {
        self.write(rejectMembershipCall { requester })
    }

    pub fn pay_premium(&self) -> ContractCall {
        self.write(payPremiumCall {})
    }

    pub fn submit_claim(&self, amount: U256) -> ContractCall {
        self.write(submitClaimCall { amount })
    }

    pub fn vote_on_claim(&self, claim_id: U256, in_favor: bool) -> ContractCall {
        self.write(voteOnClaimCall {
            claimId: claim_id,
            inFavor: in_favor,
        })
    }

    pub fn execute_claim(&self, claim_id: U256) -> ContractCall {
        self.write(executeClaimCall { claimId: claim_id })
    }

    pub fn veto_claim(&self, claim_id: U256) -> ContractCall {
        self.write(vetoClaimCall { claimId: claim_id })
    }
}

/// Parameters for a new insurance circle.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInsuranceCircle {
    pub token: Address,
    pub contribution_amount: U256,
    /// Premium period in seconds.
    pub period: U256,
    /// Share of votes needed to pay a claim, in percent.
    pub voting_threshold_percent: f64,
    pub max_claim_amount: U256,
    pub name: String,
}

/// Factory deploying insurance circles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MicroInsuranceFactory {
    address: Address,
}

impl MicroInsuranceFactory {
    pub fn at(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn insurance_circle(&self, id: u64) -> ViewCall<insuranceCirclesCall> {
        ViewCall::new(self.address, insuranceCirclesCall { id: U256::from(id) })
    }

    pub fn create(&self, params: &NewInsuranceCircle) -> Result<ContractCall> {
        if params.voting_threshold_percent > 100.0 {
            return Err(Error::InvalidInput(format!(
                "Voting threshold cannot exceed 100%, got {}",
                params.voting_threshold_percent
            )));
        }
        if params.name.trim().is_empty() {
            return Err(Error::InvalidInput("Insurance circle name is empty".to_string()));
        }
        let call = createMicroInsuranceCall {
            token: params.token,
            contributionAmount: params.contribution_amount,
            period: params.period,
            votingThreshold: percent_to_basis_points(params.voting_threshold_percent)?,
            maxClaimAmount: params.max_claim_amount,
            name: params.name.clone(),
        };
        Ok(ContractCall::new(self.address, &call))
    }
}
