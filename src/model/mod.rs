//! Typed records exchanged with the backend sources
//!
//! Everything here is plain data: the panels own copies and hand out clones.

mod activity;
mod asset;
mod numeric;
mod profile;
mod stats;

pub use activity::{ActivityKind, ActivityRecord};
pub use asset::{content_type_for, Asset, StorageStats, UploadFile};
pub use numeric::{parse_natural, Amount, AssetId};
pub use profile::{DaoProfile, GovernanceProfile, StakingProfile, TreasuryProfile};
pub use stats::{
    DynamicStats, GovernanceStats, StakingStats, TreasuryBalance, TreasuryStats,
    UserStakingSummary,
};
