//! Governance, staking and treasury aggregates as reported by their sources

use serde::{Deserialize, Serialize};

use super::numeric::Amount;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceStats {
    pub total_proposals: u64,
    pub active_proposals: u64,
    /// Votes cast across all proposals
    pub total_votes: Amount,
    #[serde(default)]
    pub total_voting_power: Amount,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakingStats {
    pub total_staked_amount: Amount,
    #[serde(default)]
    pub total_stakers: u64,
    #[serde(default)]
    pub total_rewards_distributed: Amount,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreasuryBalance {
    pub total: Amount,
    #[serde(default)]
    pub available: Amount,
    #[serde(default)]
    pub locked: Amount,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreasuryStats {
    pub balance: TreasuryBalance,
    pub total_deposits: Amount,
    pub total_withdrawals: Amount,
    #[serde(default)]
    pub transaction_count: u64,
}

/// Staking position of the signed-in caller
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStakingSummary {
    pub total_staked: Amount,
    #[serde(default)]
    pub total_rewards: Amount,
    #[serde(default)]
    pub active_stakes: u64,
}

/// Composite of the independently fetched statistics.
///
/// Replaced as a whole on every successful refresh. `user_staking` is absent
/// when no caller is signed in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicStats {
    pub governance: Option<GovernanceStats>,
    pub staking: Option<StakingStats>,
    pub treasury: Option<TreasuryStats>,
    pub user_staking: Option<UserStakingSummary>,
}
