//! Statically known organization record
//!
//! The overview panel falls back to these values whenever a live statistics
//! source has not produced data yet.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaoProfile {
    pub id: String,
    pub name: String,
    pub member_count: u64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub governance: GovernanceProfile,
    #[serde(default)]
    pub treasury: TreasuryProfile,
    #[serde(default)]
    pub staking: StakingProfile,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceProfile {
    pub active_proposals: u64,
}

/// Treasury figures as preformatted display strings
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreasuryProfile {
    pub balance: String,
    pub monthly_inflow: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakingProfile {
    pub total_staked: String,
    pub apr: String,
}
