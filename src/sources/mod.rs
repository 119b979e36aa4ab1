//! Backend collaborators consumed by the panels
//!
//! Each trait covers one independently failing service. Implementations own
//! transport and authentication; the panels only see typed results or an
//! [`Error`](crate::error::Error).

pub mod fixture;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{
    ActivityRecord, Asset, AssetId, GovernanceStats, StakingStats, StorageStats, TreasuryStats,
    UploadFile, UserStakingSummary,
};

#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Assets the caller authored or owns, regardless of visibility
    async fn list_caller_assets(&self) -> Result<Vec<Asset>>;

    /// Assets published to every requester
    async fn list_public_assets(&self) -> Result<Vec<Asset>>;

    /// Store a new asset and return its record
    async fn upload_asset(&self, file: UploadFile, is_public: bool, tags: Vec<String>)
        -> Result<Asset>;

    /// Fetch one asset including its binary payload
    async fn fetch_asset(&self, id: AssetId) -> Result<Asset>;

    async fn delete_asset(&self, id: AssetId) -> Result<()>;

    async fn storage_stats(&self) -> Result<StorageStats>;
}

#[async_trait]
pub trait GovernanceSource: Send + Sync {
    async fn governance_stats(&self) -> Result<GovernanceStats>;
}

#[async_trait]
pub trait StakingSource: Send + Sync {
    async fn staking_stats(&self) -> Result<StakingStats>;

    /// Staking position of one principal
    async fn user_staking_summary(&self, principal: &str) -> Result<UserStakingSummary>;
}

#[async_trait]
pub trait TreasurySource: Send + Sync {
    async fn treasury_stats(&self) -> Result<TreasuryStats>;
}

#[async_trait]
pub trait ActivitySource: Send + Sync {
    async fn recent_activity(&self) -> Result<Vec<ActivityRecord>>;
}
