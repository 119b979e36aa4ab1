//! In-memory backend seeded from a JSON fixture document
//!
//! Implements every source trait against a single document so the CLI and
//! the tests can drive the panels without a live backend. Uploads and deletes
//! only touch the in-memory copy. Individual operations can be made to fail
//! and every call is counted.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use super::{ActivitySource, AssetSource, GovernanceSource, StakingSource, TreasurySource};
use crate::error::{Error, Result};
use crate::model::{
    ActivityRecord, Asset, AssetId, DaoProfile, GovernanceStats, StakingStats, StorageStats,
    TreasuryStats, UploadFile, UserStakingSummary,
};

const DEFAULT_STORAGE_LIMIT: u64 = 1024 * 1024 * 1024;

/// Operations a fixture can be told to fail
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FixtureOperation {
    ListCallerAssets,
    ListPublicAssets,
    UploadAsset,
    FetchAsset,
    DeleteAsset,
    StorageStats,
    GovernanceStats,
    StakingStats,
    UserStakingSummary,
    TreasuryStats,
    RecentActivity,
}

impl FixtureOperation {
    fn source_name(self) -> &'static str {
        match self {
            FixtureOperation::ListCallerAssets
            | FixtureOperation::ListPublicAssets
            | FixtureOperation::UploadAsset
            | FixtureOperation::FetchAsset
            | FixtureOperation::DeleteAsset
            | FixtureOperation::StorageStats => "assets",
            FixtureOperation::GovernanceStats => "governance",
            FixtureOperation::StakingStats | FixtureOperation::UserStakingSummary => "staking",
            FixtureOperation::TreasuryStats => "treasury",
            FixtureOperation::RecentActivity => "activity",
        }
    }

    fn name(self) -> &'static str {
        match self {
            FixtureOperation::ListCallerAssets => "list_caller_assets",
            FixtureOperation::ListPublicAssets => "list_public_assets",
            FixtureOperation::UploadAsset => "upload_asset",
            FixtureOperation::FetchAsset => "fetch_asset",
            FixtureOperation::DeleteAsset => "delete_asset",
            FixtureOperation::StorageStats => "storage_stats",
            FixtureOperation::GovernanceStats => "governance_stats",
            FixtureOperation::StakingStats => "staking_stats",
            FixtureOperation::UserStakingSummary => "user_staking_summary",
            FixtureOperation::TreasuryStats => "treasury_stats",
            FixtureOperation::RecentActivity => "recent_activity",
        }
    }
}

/// Backend state as stored in a fixture file.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureDocument {
    pub profile: DaoProfile,

    /// Principal the console acts as; assets uploaded by it are caller-scoped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller: Option<String>,

    #[serde(default)]
    pub assets: Vec<Asset>,

    #[serde(default = "default_storage_limit")]
    pub storage_limit: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub governance: Option<GovernanceStats>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staking: Option<StakingStats>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treasury: Option<TreasuryStats>,

    /// Staking summaries keyed by principal
    #[serde(default)]
    pub user_staking: BTreeMap<String, UserStakingSummary>,

    #[serde(default)]
    pub activity: Vec<ActivityRecord>,

    /// Operations that always fail
    #[serde(default)]
    pub failing: BTreeSet<FixtureOperation>,
}

fn default_storage_limit() -> u64 {
    DEFAULT_STORAGE_LIMIT
}

impl FixtureDocument {
    /// A document with only a profile; every source reports empty data.
    pub fn new(profile: DaoProfile) -> Self {
        Self {
            profile,
            caller: None,
            assets: Vec::new(),
            storage_limit: DEFAULT_STORAGE_LIMIT,
            governance: None,
            staking: None,
            treasury: None,
            user_staking: BTreeMap::new(),
            activity: Vec::new(),
            failing: BTreeSet::new(),
        }
    }
}

pub struct FixtureBackend {
    state: RwLock<FixtureDocument>,
    failing: Mutex<BTreeSet<FixtureOperation>>,
    calls: Mutex<HashMap<FixtureOperation, usize>>,
    latency: Duration,
    operation_latency: HashMap<FixtureOperation, Duration>,
}

impl FixtureBackend {
    pub fn new(document: FixtureDocument) -> Self {
        let failing = document.failing.clone();
        Self {
            state: RwLock::new(document),
            failing: Mutex::new(failing),
            calls: Mutex::new(HashMap::new()),
            latency: Duration::ZERO,
            operation_latency: HashMap::new(),
        }
    }

    /// Read a fixture document from a JSON file.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path).await?;
        let document: FixtureDocument = serde_json::from_str(&raw)?;
        debug!(
            "Loaded fixture {} with {} assets",
            path.display(),
            document.assets.len()
        );
        Ok(Self::new(document))
    }

    /// Act as `caller` instead of the document's caller, when given.
    pub fn with_caller(mut self, caller: Option<String>) -> Self {
        if caller.is_some() {
            self.state.get_mut().caller = caller;
        }
        self
    }

    /// Delay every call by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Delay `operation` by `latency` instead of the backend-wide delay
    pub fn with_operation_latency(mut self, operation: FixtureOperation, latency: Duration) -> Self {
        self.operation_latency.insert(operation, latency);
        self
    }

    pub fn fail(&self, operation: FixtureOperation) {
        lock(&self.failing).insert(operation);
    }

    pub fn recover(&self, operation: FixtureOperation) {
        lock(&self.failing).remove(&operation);
    }

    /// How many times `operation` has been invoked
    pub fn call_count(&self, operation: FixtureOperation) -> usize {
        lock(&self.calls).get(&operation).copied().unwrap_or(0)
    }

    pub async fn profile(&self) -> DaoProfile {
        self.state.read().await.profile.clone()
    }

    pub async fn caller(&self) -> Option<String> {
        self.state.read().await.caller.clone()
    }

    pub async fn set_governance(&self, stats: Option<GovernanceStats>) {
        self.state.write().await.governance = stats;
    }

    pub async fn set_treasury(&self, stats: Option<TreasuryStats>) {
        self.state.write().await.treasury = stats;
    }

    pub async fn asset_count(&self) -> usize {
        self.state.read().await.assets.len()
    }

    /// Record the call, wait out the configured latency and apply failure injection.
    async fn enter(&self, operation: FixtureOperation) -> Result<()> {
        *lock(&self.calls).entry(operation).or_insert(0) += 1;
        let latency = self
            .operation_latency
            .get(&operation)
            .copied()
            .unwrap_or(self.latency);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        let failing = lock(&self.failing).contains(&operation);
        if failing {
            return Err(Error::backend(
                operation.source_name(),
                operation.name(),
                "injected failure",
            ));
        }
        Ok(())
    }

    fn unavailable(operation: FixtureOperation) -> Error {
        Error::backend(
            operation.source_name(),
            operation.name(),
            "no data available",
        )
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl AssetSource for FixtureBackend {
    async fn list_caller_assets(&self) -> Result<Vec<Asset>> {
        self.enter(FixtureOperation::ListCallerAssets).await?;
        let state = self.state.read().await;
        let Some(caller) = state.caller.as_deref() else {
            return Ok(Vec::new());
        };
        Ok(state
            .assets
            .iter()
            .filter(|a| a.uploaded_by.as_deref() == Some(caller))
            .map(Asset::without_payload)
            .collect())
    }

    async fn list_public_assets(&self) -> Result<Vec<Asset>> {
        self.enter(FixtureOperation::ListPublicAssets).await?;
        let state = self.state.read().await;
        Ok(state
            .assets
            .iter()
            .filter(|a| a.is_public)
            .map(Asset::without_payload)
            .collect())
    }

    async fn upload_asset(
        &self,
        file: UploadFile,
        is_public: bool,
        tags: Vec<String>,
    ) -> Result<Asset> {
        self.enter(FixtureOperation::UploadAsset).await?;
        let mut state = self.state.write().await;
        let next_id = state
            .assets
            .iter()
            .map(|a| a.id.value())
            .max()
            .map_or(1, |max| max + 1);

        let asset = Asset {
            id: AssetId(next_id),
            size: file.size(),
            name: file.name,
            content_type: file.content_type,
            data: file.data,
            is_public,
            tags: tags.into_iter().collect(),
            uploaded_by: state.caller.clone(),
            uploaded_at: Some(Utc::now()),
        };
        state.assets.push(asset.clone());
        Ok(asset.without_payload())
    }

    async fn fetch_asset(&self, id: AssetId) -> Result<Asset> {
        self.enter(FixtureOperation::FetchAsset).await?;
        let state = self.state.read().await;
        state
            .assets
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or(Error::AssetNotFound(id))
    }

    async fn delete_asset(&self, id: AssetId) -> Result<()> {
        self.enter(FixtureOperation::DeleteAsset).await?;
        let mut state = self.state.write().await;
        let before = state.assets.len();
        state.assets.retain(|a| a.id != id);
        if state.assets.len() == before {
            return Err(Error::AssetNotFound(id));
        }
        Ok(())
    }

    async fn storage_stats(&self) -> Result<StorageStats> {
        self.enter(FixtureOperation::StorageStats).await?;
        let state = self.state.read().await;
        let total_assets = state.assets.len() as u64;
        let storage_used: u64 = state.assets.iter().map(|a| a.size).sum();
        Ok(StorageStats {
            total_assets,
            storage_used,
            storage_available: state.storage_limit.saturating_sub(storage_used),
            storage_limit: state.storage_limit,
            average_file_size: storage_used.checked_div(total_assets).unwrap_or(0),
        })
    }
}

#[async_trait]
impl GovernanceSource for FixtureBackend {
    async fn governance_stats(&self) -> Result<GovernanceStats> {
        self.enter(FixtureOperation::GovernanceStats).await?;
        self.state
            .read()
            .await
            .governance
            .clone()
            .ok_or_else(|| Self::unavailable(FixtureOperation::GovernanceStats))
    }
}

#[async_trait]
impl StakingSource for FixtureBackend {
    async fn staking_stats(&self) -> Result<StakingStats> {
        self.enter(FixtureOperation::StakingStats).await?;
        self.state
            .read()
            .await
            .staking
            .clone()
            .ok_or_else(|| Self::unavailable(FixtureOperation::StakingStats))
    }

    async fn user_staking_summary(&self, principal: &str) -> Result<UserStakingSummary> {
        self.enter(FixtureOperation::UserStakingSummary).await?;
        // Principals without a position have an empty summary.
        Ok(self
            .state
            .read()
            .await
            .user_staking
            .get(principal)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl TreasurySource for FixtureBackend {
    async fn treasury_stats(&self) -> Result<TreasuryStats> {
        self.enter(FixtureOperation::TreasuryStats).await?;
        self.state
            .read()
            .await
            .treasury
            .clone()
            .ok_or_else(|| Self::unavailable(FixtureOperation::TreasuryStats))
    }
}

#[async_trait]
impl ActivitySource for FixtureBackend {
    async fn recent_activity(&self) -> Result<Vec<ActivityRecord>> {
        self.enter(FixtureOperation::RecentActivity).await?;
        Ok(self.state.read().await.activity.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> DaoProfile {
        serde_json::from_value(serde_json::json!({
            "id": "dao-1",
            "name": "Test DAO",
            "memberCount": 10
        }))
        .unwrap()
    }

    fn asset(id: u64, owner: &str, public: bool, size: u64) -> Asset {
        Asset {
            id: AssetId::from(id),
            name: format!("file-{id}"),
            content_type: "text/plain".to_string(),
            size,
            data: vec![b'x'; size as usize],
            is_public: public,
            tags: BTreeSet::new(),
            uploaded_by: Some(owner.to_string()),
            uploaded_at: None,
        }
    }

    fn backend() -> FixtureBackend {
        let mut doc = FixtureDocument::new(profile());
        doc.caller = Some("alice".to_string());
        doc.storage_limit = 100;
        doc.assets = vec![
            asset(1, "alice", false, 10),
            asset(2, "bob", true, 20),
            asset(3, "alice", true, 30),
        ];
        FixtureBackend::new(doc)
    }

    #[tokio::test]
    async fn test_listings_split_by_scope_without_payload() {
        let backend = backend();
        let mine = backend.list_caller_assets().await.unwrap();
        let public = backend.list_public_assets().await.unwrap();

        let mine_ids: Vec<_> = mine.iter().map(|a| a.id.value()).collect();
        let public_ids: Vec<_> = public.iter().map(|a| a.id.value()).collect();
        assert_eq!(mine_ids, vec![1, 3]);
        assert_eq!(public_ids, vec![2, 3]);
        assert!(mine.iter().chain(public.iter()).all(|a| a.data.is_empty()));
    }

    #[tokio::test]
    async fn test_storage_stats_derived_from_assets() {
        let stats = backend().storage_stats().await.unwrap();
        assert_eq!(stats.total_assets, 3);
        assert_eq!(stats.storage_used, 60);
        assert_eq!(stats.storage_available, 40);
        assert_eq!(stats.average_file_size, 20);
    }

    #[tokio::test]
    async fn test_upload_assigns_next_id_and_owner() {
        let backend = backend();
        let uploaded = backend
            .upload_asset(
                UploadFile::new("notes.txt", "text/plain", b"hello".to_vec()),
                false,
                vec!["docs".to_string()],
            )
            .await
            .unwrap();

        assert_eq!(uploaded.id, AssetId(4));
        assert_eq!(uploaded.size, 5);
        assert_eq!(uploaded.uploaded_by.as_deref(), Some("alice"));
        let fetched = backend.fetch_asset(AssetId(4)).await.unwrap();
        assert_eq!(fetched.data, b"hello".to_vec());
    }

    #[tokio::test]
    async fn test_injected_failure_and_call_count() {
        let backend = backend();
        backend.fail(FixtureOperation::StorageStats);
        let err = backend.storage_stats().await.unwrap_err();
        assert!(matches!(err, Error::SourceError { .. }));

        backend.recover(FixtureOperation::StorageStats);
        assert!(backend.storage_stats().await.is_ok());
        assert_eq!(backend.call_count(FixtureOperation::StorageStats), 2);
    }

    #[tokio::test]
    async fn test_delete_missing_asset_is_not_found() {
        let backend = backend();
        backend.delete_asset(AssetId(2)).await.unwrap();
        let err = backend.delete_asset(AssetId(2)).await.unwrap_err();
        assert!(matches!(err, Error::AssetNotFound(id) if id == AssetId(2)));
    }

    #[tokio::test]
    async fn test_from_path_with_caller_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixture.json");
        let mut doc = FixtureDocument::new(profile());
        doc.caller = Some("alice".to_string());
        doc.assets = vec![asset(1, "alice", false, 10), asset(2, "bob", false, 20)];
        std::fs::write(&path, serde_json::to_vec(&doc).unwrap()).unwrap();

        let as_written = FixtureBackend::from_path(&path).await.unwrap().with_caller(None);
        assert_eq!(as_written.caller().await.as_deref(), Some("alice"));

        let as_bob = FixtureBackend::from_path(&path)
            .await
            .unwrap()
            .with_caller(Some("bob".to_string()));
        assert_eq!(as_bob.caller().await.as_deref(), Some("bob"));
        let mine = as_bob.list_caller_assets().await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, AssetId(2));
    }

    #[tokio::test]
    async fn test_missing_stats_source_fails() {
        assert!(backend().governance_stats().await.is_err());
        let summary = backend().user_staking_summary("carol").await.unwrap();
        assert_eq!(summary, UserStakingSummary::default());
    }
}
