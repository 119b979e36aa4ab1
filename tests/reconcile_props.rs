//! Property tests for asset reconciliation and percentage math.
//!
//! Checks that for arbitrary caller and public listings:
//! - the merged list never holds two records with the same id,
//! - every id from either listing appears exactly once,
//! - the caller's record wins whenever both listings carry an id,
//! - reconciling the result again changes nothing.
//!
//! Run with: `cargo test --test reconcile_props`

use std::collections::{BTreeSet, HashMap, HashSet};

use proptest::prelude::*;

use dao_console::assets::reconcile;
use dao_console::format::Percent;
use dao_console::model::{Asset, AssetId};

// --- Strategy helpers ---

fn asset(id: u128, name: String, is_public: bool) -> Asset {
    Asset {
        id: AssetId(id),
        name,
        content_type: "application/octet-stream".to_string(),
        size: 1,
        data: Vec::new(),
        is_public,
        tags: BTreeSet::new(),
        uploaded_by: None,
        uploaded_at: None,
    }
}

/// Small id space so caller and public listings overlap often
fn listing_strategy(origin: &'static str, public: bool) -> impl Strategy<Value = Vec<Asset>> {
    prop::collection::vec((0u128..24, "[a-z]{1,6}"), 0..16).prop_map(move |entries| {
        entries
            .into_iter()
            .map(|(id, stem)| asset(id, format!("{origin}-{stem}"), public))
            .collect()
    })
}

fn ids(assets: &[Asset]) -> HashSet<AssetId> {
    assets.iter().map(|a| a.id).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn merged_list_has_no_duplicate_ids(
        caller in listing_strategy("caller", false),
        public in listing_strategy("public", true),
    ) {
        let merged = reconcile(caller, public);
        prop_assert_eq!(ids(&merged).len(), merged.len());
    }

    #[test]
    fn merged_list_covers_union_of_ids(
        caller in listing_strategy("caller", false),
        public in listing_strategy("public", true),
    ) {
        let mut expected = ids(&caller);
        expected.extend(ids(&public));
        let merged = reconcile(caller, public);
        prop_assert_eq!(ids(&merged), expected);
    }

    #[test]
    fn caller_record_wins_for_shared_ids(
        caller in listing_strategy("caller", false),
        public in listing_strategy("public", true),
    ) {
        // First caller occurrence of each id is the one that must survive.
        let mut first_caller: HashMap<AssetId, Asset> = HashMap::new();
        for a in &caller {
            first_caller.entry(a.id).or_insert_with(|| a.clone());
        }

        let merged = reconcile(caller, public);
        for a in &merged {
            if let Some(mine) = first_caller.get(&a.id) {
                prop_assert_eq!(a, mine);
            }
        }
    }

    #[test]
    fn reconcile_is_idempotent(
        caller in listing_strategy("caller", false),
        public in listing_strategy("public", true),
    ) {
        let once = reconcile(caller, public);
        prop_assert_eq!(reconcile(once.clone(), Vec::new()), once.clone());
        prop_assert_eq!(reconcile(Vec::new(), once.clone()), once);
    }

    #[test]
    fn empty_listing_on_either_side_is_identity_for_unique_ids(
        ids in prop::collection::btree_set(0u128..1_000, 0..16),
    ) {
        let listing: Vec<Asset> = ids.into_iter().map(|id| asset(id, id.to_string(), true)).collect();
        prop_assert_eq!(reconcile(Vec::new(), listing.clone()), listing.clone());
        prop_assert_eq!(reconcile(listing.clone(), Vec::new()), listing);
    }

    #[test]
    fn ratio_is_always_within_bounds(numerator in any::<u128>(), denominator in any::<u128>()) {
        let percent = Percent::ratio(numerator, denominator);
        prop_assert!(percent.value() <= 100);
        if denominator == 0 {
            prop_assert_eq!(percent, Percent::ZERO);
        }
        if numerator >= denominator && denominator > 0 {
            prop_assert_eq!(percent, Percent::FULL);
        }
    }

    #[test]
    fn ratio_matches_rounded_division_for_small_values(
        numerator in 0u128..1_000_000,
        denominator in 1u128..1_000_000,
    ) {
        prop_assume!(numerator <= denominator);
        let expected = ((numerator as f64 / denominator as f64) * 100.0).round() as u8;
        // Exact half-up rounding can differ from float rounding only at .5 boundaries.
        let actual = Percent::ratio(numerator, denominator).value();
        prop_assert!(actual.abs_diff(expected) <= 1, "{actual} vs {expected}");
    }
}
