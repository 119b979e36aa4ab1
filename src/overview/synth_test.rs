//! Unit tests for the dashboard metrics synthesizer
//!
//! Covers: fallback to profile values and configured percentages when
//! sources are absent, zero denominators, clamping, exact formatting of
//! large quantities, and the optional caller staking summary.

#[cfg(test)]
mod tests {
    use crate::config::OverviewConfig;
    use crate::model::{
        Amount, DaoProfile, DynamicStats, GovernanceProfile, GovernanceStats, StakingProfile,
        StakingStats, TreasuryBalance, TreasuryProfile, TreasuryStats, UserStakingSummary,
    };
    use crate::overview::synth::{
        synthesize, ACTIVE_PROPOSALS, TOTAL_MEMBERS, TOTAL_STAKED, TREASURY_BALANCE,
    };

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn profile(member_count: u64) -> DaoProfile {
        DaoProfile {
            id: "dao-1".to_string(),
            name: "Harbor DAO".to_string(),
            member_count,
            category: "DeFi".to_string(),
            status: "active".to_string(),
            created_at: None,
            governance: GovernanceProfile {
                active_proposals: 3,
            },
            treasury: TreasuryProfile {
                balance: "$120,000".to_string(),
                monthly_inflow: "+$4,000".to_string(),
            },
            staking: StakingProfile {
                total_staked: "$80,000".to_string(),
                apr: "12%".to_string(),
            },
        }
    }

    fn governance(total_votes: u128, active: u64) -> GovernanceStats {
        GovernanceStats {
            total_proposals: 10,
            active_proposals: active,
            total_votes: Amount(total_votes),
            total_voting_power: Amount::ZERO,
        }
    }

    fn treasury(total: u128, deposits: u128, withdrawals: u128) -> TreasuryStats {
        TreasuryStats {
            balance: TreasuryBalance {
                total: Amount(total),
                ..Default::default()
            },
            total_deposits: Amount(deposits),
            total_withdrawals: Amount(withdrawals),
            transaction_count: 0,
        }
    }

    fn full_stats() -> DynamicStats {
        DynamicStats {
            governance: Some(governance(40, 5)),
            staking: Some(StakingStats {
                total_staked_amount: Amount(250_000),
                ..Default::default()
            }),
            treasury: Some(treasury(1_500_000, 200_000, 50_000)),
            user_staking: None,
        }
    }

    // -------------------------------------------------------------------------
    // No live statistics
    // -------------------------------------------------------------------------

    #[test]
    fn test_no_stats_uses_profile_and_fallback_percentages() {
        let metrics = synthesize(&profile(1200), None, &OverviewConfig::default());

        assert_eq!(metrics.quick_stat(TOTAL_MEMBERS).unwrap().value, "1,200");
        let balance = metrics.quick_stat(TREASURY_BALANCE).unwrap();
        assert_eq!(balance.value, "$120,000");
        assert_eq!(balance.change.as_deref(), Some("+$4,000"));
        assert!(!balance.live);
        assert_eq!(metrics.quick_stat(TOTAL_STAKED).unwrap().value, "$80,000");
        assert_eq!(metrics.quick_stat(ACTIVE_PROPOSALS).unwrap().value, "3");

        assert_eq!(metrics.performance.governance_participation.value(), 78);
        assert_eq!(metrics.performance.treasury_utilization.value(), 45);
        assert!(!metrics.performance.participation_live);
        assert!(metrics.caller_staking.is_none());
    }

    #[test]
    fn test_configured_fallbacks_are_used() {
        let config = OverviewConfig {
            fallback_participation_percent: 10,
            fallback_treasury_utilization_percent: 20,
        };
        let metrics = synthesize(&profile(5), Some(&DynamicStats::default()), &config);
        assert_eq!(metrics.performance.governance_participation.value(), 10);
        assert_eq!(metrics.performance.treasury_utilization.value(), 20);
    }

    // -------------------------------------------------------------------------
    // Live statistics
    // -------------------------------------------------------------------------

    #[test]
    fn test_live_stats_replace_profile_values() {
        let stats = full_stats();
        let metrics = synthesize(&profile(100), Some(&stats), &OverviewConfig::default());

        let balance = metrics.quick_stat(TREASURY_BALANCE).unwrap();
        assert_eq!(balance.value, "$1,500,000");
        assert_eq!(balance.change.as_deref(), Some("+$200,000"));
        assert!(balance.live);
        assert_eq!(metrics.quick_stat(TOTAL_STAKED).unwrap().value, "$250,000");
        assert_eq!(metrics.quick_stat(ACTIVE_PROPOSALS).unwrap().value, "5");

        assert_eq!(metrics.performance.governance_participation.value(), 40);
        assert_eq!(metrics.performance.treasury_utilization.value(), 25);
    }

    #[test]
    fn test_each_missing_source_falls_back_independently() {
        let mut stats = full_stats();
        stats.governance = None;
        let metrics = synthesize(&profile(100), Some(&stats), &OverviewConfig::default());

        assert_eq!(metrics.performance.governance_participation.value(), 78);
        assert!(!metrics.performance.participation_live);
        assert_eq!(metrics.performance.treasury_utilization.value(), 25);
        assert!(metrics.performance.utilization_live);
        assert_eq!(metrics.quick_stat(ACTIVE_PROPOSALS).unwrap().value, "3");
    }

    #[test]
    fn test_zero_votes_and_zero_members_is_zero_percent() {
        let stats = DynamicStats {
            governance: Some(governance(0, 0)),
            ..Default::default()
        };
        let metrics = synthesize(&profile(0), Some(&stats), &OverviewConfig::default());
        assert_eq!(metrics.performance.governance_participation.value(), 0);
    }

    #[test]
    fn test_zero_deposits_is_zero_percent() {
        let stats = DynamicStats {
            treasury: Some(treasury(0, 0, 500)),
            ..Default::default()
        };
        let metrics = synthesize(&profile(10), Some(&stats), &OverviewConfig::default());
        assert_eq!(metrics.performance.treasury_utilization.value(), 0);
    }

    #[test]
    fn test_more_votes_than_members_clamps_to_full() {
        let stats = DynamicStats {
            governance: Some(governance(5_000, 1)),
            ..Default::default()
        };
        let metrics = synthesize(&profile(100), Some(&stats), &OverviewConfig::default());
        assert_eq!(metrics.performance.governance_participation.value(), 100);
    }

    #[test]
    fn test_large_treasury_formatted_exactly() {
        let huge = 123_456_789_012_345_678_901_234_567u128;
        let stats = DynamicStats {
            treasury: Some(treasury(huge, huge, huge / 2)),
            ..Default::default()
        };
        let metrics = synthesize(&profile(1), Some(&stats), &OverviewConfig::default());
        assert_eq!(
            metrics.quick_stat(TREASURY_BALANCE).unwrap().value,
            "$123,456,789,012,345,678,901,234,567"
        );
        assert_eq!(metrics.performance.treasury_utilization.value(), 50);
    }

    #[test]
    fn test_utilization_near_u128_limit_does_not_overflow() {
        let deposits = 160_000_000_000_000_000_000_000_000_000_000_000_000u128;
        let withdrawals = 1_500_000_000_000_000_000_000_000_000_000_000_000u128;
        let stats = DynamicStats {
            treasury: Some(treasury(deposits - withdrawals, deposits, withdrawals)),
            ..Default::default()
        };
        let metrics = synthesize(&profile(1), Some(&stats), &OverviewConfig::default());
        assert_eq!(metrics.performance.treasury_utilization.value(), 1);
    }

    #[test]
    fn test_caller_staking_present_when_signed_in() {
        let mut stats = full_stats();
        stats.user_staking = Some(UserStakingSummary {
            total_staked: Amount(12_500),
            total_rewards: Amount(310),
            active_stakes: 2,
        });
        let metrics = synthesize(&profile(100), Some(&stats), &OverviewConfig::default());

        let mine = metrics.caller_staking.unwrap();
        assert_eq!(mine.staked, "12,500");
        assert_eq!(mine.rewards, "310");
        assert_eq!(mine.active_stakes, 2);
    }

    #[test]
    fn test_empty_monthly_inflow_has_no_change() {
        let mut p = profile(1);
        p.treasury.monthly_inflow.clear();
        let metrics = synthesize(&p, None, &OverviewConfig::default());
        assert!(metrics.quick_stat(TREASURY_BALANCE).unwrap().change.is_none());
    }
}
