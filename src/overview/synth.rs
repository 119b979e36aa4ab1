//! Derived dashboard metrics
//!
//! Combines the static organization profile with whatever live statistics
//! are available. Each figure uses its live source when present and the
//! profile (or a configured constant) otherwise, so a missing source never
//! leaves a hole in the dashboard.

use serde::Serialize;

use crate::config::OverviewConfig;
use crate::format::{format_amount, format_currency, Percent};
use crate::model::{DaoProfile, DynamicStats, UserStakingSummary};

/// One headline figure on the dashboard
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickStat {
    pub label: &'static str,
    pub value: String,
    pub change: Option<String>,
    /// Whether `value` came from a live source rather than the profile
    pub live: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    /// Votes cast relative to member count
    pub governance_participation: Percent,
    pub participation_live: bool,
    /// Withdrawals relative to deposits
    pub treasury_utilization: Percent,
    pub utilization_live: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerStaking {
    pub staked: String,
    pub rewards: String,
    pub active_stakes: u64,
}

/// Immutable view model for the overview dashboard
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub quick_stats: Vec<QuickStat>,
    pub performance: PerformanceMetrics,
    pub caller_staking: Option<CallerStaking>,
}

impl DashboardMetrics {
    pub fn quick_stat(&self, label: &str) -> Option<&QuickStat> {
        self.quick_stats.iter().find(|s| s.label == label)
    }
}

pub const TOTAL_MEMBERS: &str = "Total Members";
pub const TREASURY_BALANCE: &str = "Treasury Balance";
pub const TOTAL_STAKED: &str = "Total Staked";
pub const ACTIVE_PROPOSALS: &str = "Active Proposals";

pub fn synthesize(
    profile: &DaoProfile,
    stats: Option<&DynamicStats>,
    fallback: &OverviewConfig,
) -> DashboardMetrics {
    let governance = stats.and_then(|s| s.governance.as_ref());
    let staking = stats.and_then(|s| s.staking.as_ref());
    let treasury = stats.and_then(|s| s.treasury.as_ref());
    let user_staking = stats.and_then(|s| s.user_staking.as_ref());

    let members = QuickStat {
        label: TOTAL_MEMBERS,
        value: format_amount(u128::from(profile.member_count)),
        change: None,
        live: false,
    };

    let treasury_balance = match treasury {
        Some(t) => QuickStat {
            label: TREASURY_BALANCE,
            value: format_currency(t.balance.total.value()),
            change: Some(format!("+{}", format_currency(t.total_deposits.value()))),
            live: true,
        },
        None => QuickStat {
            label: TREASURY_BALANCE,
            value: profile.treasury.balance.clone(),
            change: non_empty(&profile.treasury.monthly_inflow),
            live: false,
        },
    };

    let total_staked = match staking {
        Some(s) => QuickStat {
            label: TOTAL_STAKED,
            value: format_currency(s.total_staked_amount.value()),
            change: None,
            live: true,
        },
        None => QuickStat {
            label: TOTAL_STAKED,
            value: profile.staking.total_staked.clone(),
            change: None,
            live: false,
        },
    };

    let active_proposals = QuickStat {
        label: ACTIVE_PROPOSALS,
        value: governance
            .map(|g| g.active_proposals)
            .unwrap_or(profile.governance.active_proposals)
            .to_string(),
        change: None,
        live: governance.is_some(),
    };

    let performance = PerformanceMetrics {
        governance_participation: governance
            .map(|g| Percent::ratio(g.total_votes.value(), u128::from(profile.member_count)))
            .unwrap_or_else(|| Percent::new(u32::from(fallback.fallback_participation_percent))),
        participation_live: governance.is_some(),
        treasury_utilization: treasury
            .map(|t| Percent::ratio(t.total_withdrawals.value(), t.total_deposits.value()))
            .unwrap_or_else(|| {
                Percent::new(u32::from(fallback.fallback_treasury_utilization_percent))
            }),
        utilization_live: treasury.is_some(),
    };

    DashboardMetrics {
        quick_stats: vec![members, treasury_balance, total_staked, active_proposals],
        performance,
        caller_staking: user_staking.map(caller_staking),
    }
}

fn caller_staking(summary: &UserStakingSummary) -> CallerStaking {
    CallerStaking {
        staked: format_amount(summary.total_staked.value()),
        rewards: format_amount(summary.total_rewards.value()),
        active_stakes: summary.active_stakes,
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
