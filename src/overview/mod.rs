//! Overview dashboard panel
//!
//! Loads the recent-activity feed together with the governance, staking and
//! treasury statistics when the panel opens. A manual refresh re-fetches the
//! statistics only. Headline figures are derived on demand by
//! [`synth::synthesize`] from whatever has been committed.

pub mod synth;

#[cfg(test)]
mod synth_test;

pub use synth::{synthesize, CallerStaking, DashboardMetrics, PerformanceMetrics, QuickStat};

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info, instrument};

use crate::config::{ConsoleConfig, OverviewConfig};
use crate::error::Result;
use crate::loading::{LoadKind, LoadTracker, LoadingFlags, RefreshOutcome};
use crate::model::{ActivityRecord, DaoProfile, DynamicStats};
use crate::notify::{Notification, Notifier};
use crate::orchestrator;
use crate::sources::{ActivitySource, GovernanceSource, StakingSource, TreasurySource};

/// Services the overview reads from
#[derive(Clone)]
pub struct OverviewSources {
    pub governance: Arc<dyn GovernanceSource>,
    pub staking: Arc<dyn StakingSource>,
    pub treasury: Arc<dyn TreasurySource>,
    pub activity: Arc<dyn ActivitySource>,
}

impl OverviewSources {
    /// Use one backend for every statistics source.
    pub fn shared<B>(backend: Arc<B>) -> Self
    where
        B: GovernanceSource + StakingSource + TreasurySource + ActivitySource + 'static,
    {
        Self {
            governance: backend.clone(),
            staking: backend.clone(),
            treasury: backend.clone(),
            activity: backend,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewSnapshot {
    pub profile: DaoProfile,
    pub metrics: DashboardMetrics,
    pub activity: Vec<ActivityRecord>,
    pub stats: Option<DynamicStats>,
    pub loading: LoadingFlags,
    pub notification: Option<Notification>,
    pub loaded_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct OverviewState {
    activity: Vec<ActivityRecord>,
    stats: Option<DynamicStats>,
    loaded_at: Option<DateTime<Utc>>,
}

pub struct OverviewPanel {
    profile: DaoProfile,
    sources: OverviewSources,
    caller: Option<String>,
    config: OverviewConfig,
    state: Mutex<OverviewState>,
    loading: LoadTracker,
    notifier: Notifier,
}

impl OverviewPanel {
    /// `caller` is the signed-in principal, if any. Without one the caller
    /// staking summary is never requested.
    pub fn new(
        profile: DaoProfile,
        sources: OverviewSources,
        caller: Option<String>,
        config: &ConsoleConfig,
    ) -> Self {
        Self {
            profile,
            sources,
            caller,
            config: config.overview.clone(),
            state: Mutex::new(OverviewState::default()),
            loading: LoadTracker::new(),
            notifier: Notifier::new(),
        }
    }

    pub fn profile(&self) -> &DaoProfile {
        &self.profile
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn metrics(&self) -> DashboardMetrics {
        let state = self.state();
        synthesize(&self.profile, state.stats.as_ref(), &self.config)
    }

    pub fn snapshot(&self) -> OverviewSnapshot {
        let state = self.state();
        OverviewSnapshot {
            profile: self.profile.clone(),
            metrics: synthesize(&self.profile, state.stats.as_ref(), &self.config),
            activity: state.activity.clone(),
            stats: state.stats.clone(),
            loading: self.loading.flags(),
            notification: self.notifier.latest(),
            loaded_at: state.loaded_at,
        }
    }

    /// Fetch activity and statistics when the panel opens. After a
    /// successful load or refresh, a repeated call is flagged as a refresh.
    #[instrument(skip(self), fields(dao = %self.profile.id))]
    pub async fn load(&self) -> Result<RefreshOutcome> {
        let Some(guard) = self.loading.try_begin(LoadKind::Initial) else {
            debug!("Overview load already in flight, ignoring request");
            return Ok(RefreshOutcome::Skipped);
        };

        let batch = orchestrator::run_batch("overview", async {
            tokio::try_join!(self.sources.activity.recent_activity(), self.fetch_stats())
        })
        .await;

        let (activity, stats) = match batch {
            Ok(results) => results,
            Err(e) => {
                error!("Failed to fetch data: {}", e);
                self.notifier.error("Failed to fetch data");
                return Err(e);
            }
        };

        info!(activity = activity.len(), "Overview loaded");
        {
            let mut state = self.state();
            state.activity = activity;
            state.stats = Some(stats);
            state.loaded_at = Some(Utc::now());
        }
        guard.commit();
        Ok(RefreshOutcome::Applied)
    }

    /// Re-fetch statistics. Ignored while another load is in flight.
    #[instrument(skip(self), fields(dao = %self.profile.id))]
    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        let Some(guard) = self.loading.try_begin(LoadKind::Refresh) else {
            debug!("Overview load already in flight, ignoring refresh");
            return Ok(RefreshOutcome::Skipped);
        };

        match orchestrator::run_batch("overview_stats", self.fetch_stats()).await {
            Ok(stats) => {
                info!("Overview statistics refreshed");
                {
                    let mut state = self.state();
                    state.stats = Some(stats);
                    state.loaded_at = Some(Utc::now());
                }
                guard.commit();
                Ok(RefreshOutcome::Applied)
            }
            Err(e) => {
                error!("Failed to refresh data: {}", e);
                self.notifier.error("Failed to refresh data");
                Err(e)
            }
        }
    }

    async fn fetch_stats(&self) -> Result<DynamicStats> {
        let user_staking = self
            .caller
            .as_deref()
            .map(|principal| self.sources.staking.user_staking_summary(principal));

        let (governance, staking, treasury, user_staking) = tokio::try_join!(
            self.sources.governance.governance_stats(),
            self.sources.staking.staking_stats(),
            self.sources.treasury.treasury_stats(),
            orchestrator::optional(user_staking),
        )?;

        Ok(DynamicStats {
            governance: Some(governance),
            staking: Some(staking),
            treasury: Some(treasury),
            user_staking,
        })
    }

    fn state(&self) -> MutexGuard<'_, OverviewState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
