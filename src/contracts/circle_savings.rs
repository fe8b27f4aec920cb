//! Rotating savings circle.

use alloy::primitives::{Address, U256};
use alloy::sol;

use crate::contracts::{signatures, ContractCall, ViewCall};

sol! {
    #[derive(Debug, PartialEq, Eq)]
    interface ICircleSavings {
        function token() external view returns (address);
        function periodDuration() external view returns (uint256);
        function contributionAmount() external view returns (uint256);
        function startTime() external view returns (uint256);
        function currentPeriod() external view returns (uint256);
        function cycleLength() external view returns (uint256);
        function memberList(uint256 index) external view returns (address);
        function members(address member) external view returns (bool isMember, uint256 totalContributed, uint256 lastContributionPeriod);
        function selected(address member) external view returns (bool);
        function totalContributed() external view returns (uint256);
        function protocolTaxRate() external view returns (uint256);
        function taxCollector() external view returns (address);
        function randomResult() external view returns (uint256);
        function selectedWithdrawer() external view returns (address);
        function withdrawerSelected() external view returns (bool);
        function getCurrentPeriod() external view returns (uint256);
        function getMemberCount() external view returns (uint256);
        function getEligibleWithdrawer() external view returns (address);

        function addMember(address member) external;
        function removeMember(address member) external;
        function startCycle(uint256 contributionAmount) external;
        function contribute() external;
        function triggerAutoSave(address member) external;
        function withdraw() external;
        function setToken(address newToken) external;
        function setPeriodDuration(uint256 newDuration) external;
        function updateVRFSubscription(uint256 subscriptionId) external;
        function updateCallbackGasLimit(uint32 callbackGasLimit) external;
    }
}

use ICircleSavings::*;

pub(crate) static SIGNATURES: &[([u8; 4], &str)] = signatures![
    tokenCall,
    periodDurationCall,
    contributionAmountCall,
    startTimeCall,
    currentPeriodCall,
    cycleLengthCall,
    memberListCall,
    membersCall,
    selectedCall,
    totalContributedCall,
    protocolTaxRateCall,
    taxCollectorCall,
    randomResultCall,
    selectedWithdrawerCall,
    withdrawerSelectedCall,
    getCurrentPeriodCall,
    getMemberCountCall,
    getEligibleWithdrawerCall,
    addMemberCall,
    removeMemberCall,
    startCycleCall,
    contributeCall,
    triggerAutoSaveCall,
    withdrawCall,
    setTokenCall,
    setPeriodDurationCall,
    updateVRFSubscriptionCall,
    updateCallbackGasLimitCall,
];

/// A deployed circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircleSavings {
    address: Address,
}

impl CircleSavings {
    pub fn at(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    fn view<C: alloy::sol_types::SolCall>(&self, call: C) -> ViewCall<C> {
        ViewCall::new(self.address, call)
    }

    fn write<C: alloy::sol_types::SolCall>(&self, call: C) -> ContractCall {
        ContractCall::new(self.address, &call)
    }

    // Views

    pub fn token(&self) -> ViewCall<tokenCall> {
        self.view(tokenCall {})
    }

    pub fn period_duration(&self) -> ViewCall<periodDurationCall> {
        self.view(periodDurationCall {})
    }

    pub fn contribution_amount(&self) -> ViewCall<contributionAmountCall> {
        self.view(contributionAmountCall {})
    }

    pub fn start_time(&self) -> ViewCall<startTimeCall> {
        self.view(startTimeCall {})
    }

    pub fn current_period(&self) -> ViewCall<currentPeriodCall> {
        self.view(currentPeriodCall {})
    }

    pub fn cycle_length(&self) -> ViewCall<cycleLengthCall> {
        self.view(cycleLengthCall {})
    }

    pub fn member_list(&self, index: u64) -> ViewCall<memberListCall> {
        self.view(memberListCall {
            index: U256::from(index),
        })
    }

    pub fn members(&self, member: Address) -> ViewCall<membersCall> {
        self.view(membersCall { member })
    }

    pub fn selected(&self, member: Address) -> ViewCall<selectedCall> {
        self.view(selectedCall { member })
    }

    pub fn total_contributed(&self) -> ViewCall<totalContributedCall> {
        self.view(totalContributedCall {})
    }

    pub fn protocol_tax_rate(&self) -> ViewCall<protocolTaxRateCall> {
        self.view(protocolTaxRateCall {})
    }

    pub fn tax_collector(&self) -> ViewCall<taxCollectorCall> {
        self.view(taxCollectorCall {})
    }

    pub fn random_result(&self) -> ViewCall<randomResultCall> {
        self.view(randomResultCall {})
    }

    pub fn selected_withdrawer(&self) -> ViewCall<selectedWithdrawerCall> {
        self.view(selectedWithdrawerCall {})
    }

    pub fn withdrawer_selected(&self) -> ViewCall<withdrawerSelectedCall> {
        self.view(withdrawerSelectedCall {})
    }

    pub fn get_current_period(&self) -> ViewCall<getCurrentPeriodCall> {
        self.view(getCurrentPeriodCall {})
    }

    pub fn get_member_count(&self) -> ViewCall<getMemberCountCall> {
        self.view(getMemberCountCall {})
    }

    pub fn get_eligible_withdrawer(&self) -> ViewCall<getEligibleWithdrawerCall> {
        self.view(getEligibleWithdrawerCall {})
    }

    // State-changing

    pub fn add_member(&self, member: Address) -> ContractCall {
        self.write(addMemberCall { member })
    }

    pub fn remove_member(&self, member: Address) -> ContractCall {
        self.write(removeMemberCall { member })
    }

    pub fn start_cycle(&self, contribution_amount: U256) -> ContractCall {
        self.write(startCycleCall {
            contributionAmount: contribution_amount,
        })
    }

    pub fn contribute(&self) -> ContractCall {
        self.write(contributeCall {})
    }

    pub fn trigger_auto_save(&self, member: Address) -> ContractCall {
        self.write(triggerAutoSaveCall { member })
    }

    pub fn withdraw(&self) -> ContractCall {
        self.write(withdrawCall {})
    }

    pub fn set_token(&self, new_token: Address) -> ContractCall {
        self.write(setTokenCall { newToken: new_token })
    }

    pub fn set_period_duration(&self, new_duration: U256) -> ContractCall {
        self.write(setPeriodDurationCall {
            newDuration: new_duration,
        })
    }

    pub fn update_vrf_subscription(&self, subscription_id: U256) -> ContractCall {
        self.write(updateVRFSubscriptionCall {
            subscriptionId: subscription_id,
        })
    }

    pub fn update_callback_gas_limit(&self, callback_gas_limit: u32) -> ContractCall {
        self.write(updateCallbackGasLimitCall {
            callbackGasLimit: callback_gas_limit,
        })
    }
}
