//! Micro-lending circle and its factory.

use alloy::primitives::{Address, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::contracts::{percent_to_basis_points, signatures, ContractCall, ViewCall};
use crate::error::Result;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    interface IMicroLending {
        function lendingToken() external view returns (address);
        function contributionAmount() external view returns (uint256);
        function memberBalance(address member) external view returns (uint256);
        function loanRequests(uint256 loanId) external view returns (address borrower, uint256 amount, uint256 duration, uint256 votesFor, uint256 votesAgainst, bool executed);
        function isContributionUpToDate(address member) external view returns (bool);

        function requestMembership() external;
        function contribute() external;
        function requestLoan(uint256 amount, uint256 duration) external;
        function vote(uint256 loanId, bool inFavor) external;
        function executeLoan(uint256 loanId) external;
        function repayLoan(uint256 loanId, uint256 amount) external;
        function withdrawInterest() external;
        function withdrawBalance(uint256 amount) external;
    }

    #[derive(Debug, PartialEq, Eq)]
    interface IMicroLendingFactory {
        function lendingCircles(uint256 id) external view returns (address);
        function createMicroLending(address creator, address token, uint256 contributionAmount, uint256 period, uint256 initialRate) external returns (address);
    }
}

use IMicroLending::*;
use IMicroLendingFactory::*;

pub(crate) static SIGNATURES: &[([u8; 4], &str)] = signatures![
    lendingTokenCall,
    contributionAmountCall,
    memberBalanceCall,
    loanRequestsCall,
    isContributionUpToDateCall,
    requestMembershipCall,
    contributeCall,
    requestLoanCall,
    voteCall,
    executeLoanCall,
    repayLoanCall,
    withdrawInterestCall,
    withdrawBalanceCall,
    lendingCirclesCall,
    createMicroLendingCall,
];

/// A deployed lending circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MicroLending {
    address: Address,
}

impl MicroLending {
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

    pub fn lending_token(&self) -> ViewCall<lendingTokenCall> {
        self.view(lendingTokenCall {})
    }

    pub fn contribution_amount(&self) -> ViewCall<contributionAmountCall> {
        self.view(contributionAmountCall {})
    }

    pub fn member_balance(&self, member: Address) -> ViewCall<memberBalanceCall> {
        self.view(memberBalanceCall { member })
    }

    pub fn loan_request(&self, loan_id: U256) -> ViewCall<loanRequestsCall> {
        self.view(loanRequestsCall { loanId: loan_id })
    }

    pub fn is_contribution_up_to_date(&self, member: Address) -> ViewCall<isContributionUpToDateCall> {
        self.view(isContributionUpToDateCall { member })
    }

    pub fn request_membership(&self) -> ContractCall {
        self.write(requestMembershipCall {})
    }

    pub fn contribute(&self) -> ContractCall {
        self.write(contributeCall {})
    }

    pub fn request_loan(&self, amount: U256, duration: U256) -> ContractCall {
        self.write(requestLoanCall { amount, duration })
    }

    pub fn vote(&self, loan_id: U256, in_favor: bool) -> ContractCall {
        self.write(voteCall {
            loanId: loan_id,
            inFavor: in_favor,
        })
    }

    pub fn execute_loan(&self, loan_id: U256) -> ContractCall {
        self.write(executeLoanCall { loanId: loan_id })
    }

    pub fn repay_loan(&self, loan_id: U256, amount: U256) -> ContractCall {
        self.write(repayLoanCall {
            loanId: loan_id,
            amount,
        })
    }

    pub fn withdraw_interest(&self) -> ContractCall {
        self.write(withdrawInterestCall {})
    }

    pub fn withdraw_balance(&self, amount: U256) -> ContractCall {
        self.write(withdrawBalanceCall { amount })
    }
}

/// Parameters for a new lending circle.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLendingCircle {
    pub creator: Address,
    pub token: Address,
    pub contribution_amount: U256,
    /// Contribution period in seconds.
    pub period: U256,
    /// Initial interest rate in percent.
    pub initial_rate_percent: f64,
}

/// Factory deploying lending circles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MicroLendingFactory {
    address: Address,
}

impl MicroLendingFactory {
    pub fn at(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn lending_circle(&self, id: u64) -> ViewCall<lendingCirclesCall> {
        ViewCall::new(self.address, lendingCirclesCall { id: U256::from(id) })
    }

    pub fn create(&self, params: &NewLendingCircle) -> Result<ContractCall> {
        let call = createMicroLendingCall {
            creator: params.creator,
            token: params.token,
            contributionAmount: params.contribution_amount,
            period: params.period,
            initialRate: percent_to_basis_points(params.initial_rate_percent)?,
        };
        Ok(ContractCall::new(self.address, &call))
    }
}
