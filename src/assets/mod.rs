//! Asset library panel
//!
//! Holds the reconciled asset list and storage report for one session, and
//! runs the library's operations: load, refresh, upload, view, download and
//! delete. Every operation posts a notification; failures leave the
//! committed listing as it was.

mod reconcile;
pub mod upload;


pub use reconcile::reconcile;
pub use upload::{UploadPhase, UploadSimulator, UploadState};

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use lru::LruCache;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, error, info, instrument};

use crate::config::{AssetsConfig, ConsoleConfig};
use crate::error::{Error, Result};
use crate::format::Percent;
use crate::loading::{LoadKind, LoadTracker, LoadingFlags, RefreshOutcome};
use crate::model::{Asset, AssetId, StorageStats, UploadFile};
use crate::notify::{Notification, Notifier};
use crate::orchestrator;
use crate::sources::AssetSource;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded(Asset),
    /// No file was selected
    NoFile,
    /// An upload is already running
    Busy,
}

/// Payload of an asset opened for viewing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetPayload {
    pub id: AssetId,
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadedAsset {
    pub path: PathBuf,
    pub bytes: u64,
    /// Hex-encoded SHA-256 of the written payload
    pub sha256: String,
}

/// Everything the presentation layer needs to draw the library
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetLibrarySnapshot {
    pub assets: Vec<Asset>,
    pub storage: Option<StorageStats>,
    pub utilization: Option<Percent>,
    pub loading: LoadingFlags,
    pub upload: UploadState,
    pub notification: Option<Notification>,
    pub loaded_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct LibraryState {
    assets: Vec<Asset>,
    storage: Option<StorageStats>,
    loaded_at: Option<DateTime<Utc>>,
}

pub struct AssetLibrary {
    source: Arc<dyn AssetSource>,
    config: AssetsConfig,
    state: Mutex<LibraryState>,
    payloads: Option<Mutex<LruCache<AssetId, Asset>>>,
    loading: LoadTracker,
    uploads: UploadSimulator,
    notifier: Notifier,
}

impl AssetLibrary {
    pub fn new(source: Arc<dyn AssetSource>, config: &ConsoleConfig) -> Self {
        let payloads = NonZeroUsize::new(config.assets.payload_cache_capacity)
            .map(|capacity| Mutex::new(LruCache::new(capacity)));
        Self {
            source,
            config: config.assets.clone(),
            state: Mutex::new(LibraryState::default()),
            payloads,
            loading: LoadTracker::new(),
            uploads: UploadSimulator::new(config.upload.clone()),
            notifier: Notifier::new(),
        }
    }

    pub fn snapshot(&self) -> AssetLibrarySnapshot {
        let state = self.state();
        AssetLibrarySnapshot {
            assets: state.assets.clone(),
            storage: state.storage.clone(),
            utilization: state.storage.as_ref().map(StorageStats::utilization),
            loading: self.loading.flags(),
            upload: self.uploads.snapshot(),
            notification: self.notifier.latest(),
            loaded_at: state.loaded_at,
        }
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// First fetch when the panel opens. Once a listing has been committed,
    /// a repeated call runs as a refresh.
    pub async fn load(&self) -> Result<RefreshOutcome> {
        self.fetch(LoadKind::Initial).await
    }

    /// Manual refresh. Ignored while another load is in flight.
    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        self.fetch(LoadKind::Refresh).await
    }

    /// Refresh because an upload or delete just changed the listing.
    ///
    /// Unlike a manual refresh this is never lost: if another load is in
    /// flight and may have read the listing before the change, that load
    /// runs once more after it finishes.
    async fn refresh_after_change(&self) -> Result<RefreshOutcome> {
        self.loading.request_follow_up();
        self.fetch(LoadKind::Refresh).await
    }

    async fn fetch(&self, kind: LoadKind) -> Result<RefreshOutcome> {
        let mut outcome = self.fetch_once(kind).await;
        while !matches!(outcome, Ok(RefreshOutcome::Skipped)) && self.loading.take_follow_up() {
            debug!("Listing changed during load, fetching again");
            outcome = self.fetch_once(LoadKind::Refresh).await;
        }
        outcome
    }

    #[instrument(skip(self))]
    async fn fetch_once(&self, kind: LoadKind) -> Result<RefreshOutcome> {
        let Some(guard) = self.loading.try_begin(kind) else {
            debug!("Asset load already in flight, ignoring {:?} request", kind);
            return Ok(RefreshOutcome::Skipped);
        };

        let batch = orchestrator::run_batch("assets", async {
            tokio::try_join!(
                self.source.list_caller_assets(),
                self.source.list_public_assets(),
                self.source.storage_stats(),
            )
        })
        .await;

        let (caller, public, storage) = match batch {
            Ok(results) => results,
            Err(e) => {
                error!("Failed to load assets: {}", e);
                self.notifier.error("Failed to load assets");
                return Err(e);
            }
        };

        let merged = reconcile(caller, public);
        info!(
            assets = merged.len(),
            storage_used = storage.storage_used,
            "Asset library refreshed"
        );

        {
            let mut state = self.state();
            state.assets = merged;
            state.storage = Some(storage);
            state.loaded_at = Some(Utc::now());
        }
        guard.commit();
        self.clear_payloads();

        Ok(RefreshOutcome::Applied)
    }

    /// Upload the selected file while driving the progress indicator.
    ///
    /// `None` (nothing selected) and a selection made while another upload is
    /// running are ignored. On success the library is refreshed before the
    /// indicator resets.
    #[instrument(skip(self, file), fields(file = file.as_ref().map(|f| f.name.as_str())))]
    pub async fn upload(&self, file: Option<UploadFile>) -> Result<UploadOutcome> {
        let Some(file) = file else {
            return Ok(UploadOutcome::NoFile);
        };
        let Some(run) = self.uploads.begin(&file.name) else {
            debug!("Upload already in progress, ignoring selection");
            return Ok(UploadOutcome::Busy);
        };

        let tags = self.config.default_tags.clone();
        match self
            .source
            .upload_asset(file, self.config.publish_uploads, tags)
            .await
        {
            Ok(asset) => {
                let completion = run.succeed();
                #[cfg(feature = "metrics")]
                crate::metrics::inc_upload(true);
                info!(id = %asset.id, size = asset.size, "Asset uploaded");
                self.notifier.success("Asset uploaded successfully!");

                // A failed refresh posts its own notification; the upload stands.
                let _ = self.refresh_after_change().await;
                completion.finish().await;
                Ok(UploadOutcome::Uploaded(asset))
            }
            Err(e) => {
                run.fail();
                #[cfg(feature = "metrics")]
                crate::metrics::inc_upload(false);
                error!("Failed to upload asset: {}", e);
                self.notifier.error("Failed to upload asset");
                Err(e)
            }
        }
    }

    /// Fetch an asset's payload for display.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn view(&self, id: AssetId) -> Result<AssetPayload> {
        match self.fetch_payload(id).await {
            Ok(asset) => Ok(AssetPayload {
                id: asset.id,
                name: asset.name,
                content_type: asset.content_type,
                data: asset.data,
            }),
            Err(e) => {
                error!("Failed to view asset {}: {}", id, e);
                self.notifier.error("Failed to view asset");
                Err(e)
            }
        }
    }

    /// Write an asset's payload into `dir` under its display name.
    #[instrument(skip(self, dir), fields(id = %id, dir = %dir.display()))]
    pub async fn download_to(&self, id: AssetId, dir: &Path) -> Result<DownloadedAsset> {
        match self.write_payload(id, dir).await {
            Ok(downloaded) => {
                info!(
                    path = %downloaded.path.display(),
                    bytes = downloaded.bytes,
                    "Asset downloaded"
                );
                self.notifier.success("Asset downloaded successfully!");
                Ok(downloaded)
            }
            Err(e) => {
                error!("Failed to download asset {}: {}", id, e);
                self.notifier.error("Failed to download asset");
                Err(e)
            }
        }
    }

    async fn write_payload(&self, id: AssetId, dir: &Path) -> Result<DownloadedAsset> {
        let asset = self.fetch_payload(id).await?;
        let path = dir.join(download_file_name(&asset));
        tokio::fs::write(&path, &asset.data).await?;
        Ok(DownloadedAsset {
            path,
            bytes: asset.data.len() as u64,
            sha256: hex::encode(Sha256::digest(&asset.data)),
        })
    }

    /// Delete an asset and refresh the listing.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, id: AssetId) -> Result<()> {
        if let Err(e) = self.source.delete_asset(id).await {
            error!("Failed to delete asset {}: {}", id, e);
            self.notifier.error("Failed to delete asset");
            return Err(e);
        }

        if let Some(cache) = &self.payloads {
            lock(cache).pop(&id);
        }
        info!("Asset deleted");
        self.notifier.success("Asset deleted successfully!");

        // A failed refresh posts its own notification; the delete stands.
        let _ = self.refresh_after_change().await;
        Ok(())
    }

    async fn fetch_payload(&self, id: AssetId) -> Result<Asset> {
        if let Some(cache) = &self.payloads {
            if let Some(asset) = lock(cache).get(&id) {
                debug!("Payload cache hit");
                return Ok(asset.clone());
            }
        }

        let asset = self.source.fetch_asset(id).await?;
        if asset.id != id {
            return Err(Error::backend(
                "assets",
                "fetch_asset",
                format!("requested asset {id}, received {}", asset.id),
            ));
        }
        if let Some(cache) = &self.payloads {
            lock(cache).put(id, asset.clone());
        }
        Ok(asset)
    }

    fn clear_payloads(&self) {
        if let Some(cache) = &self.payloads {
            lock(cache).clear();
        }
    }

    fn state(&self) -> MutexGuard<'_, LibraryState> {
        lock(&self.state)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// File name for a downloaded asset, stripped of any directory components.
fn download_file_name(asset: &Asset) -> String {
    let base = asset
        .name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if base.is_empty() || base == "." || base == ".." {
        format!("asset-{}", asset.id)
    } else {
        base.to_string()
    }
}
