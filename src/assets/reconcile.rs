//! Merging of caller-scoped and public asset listings

use std::collections::HashSet;

use crate::model::{Asset, AssetId};

/// Merge the caller's assets with the public listing.
///
/// The caller's records come first in their source order, followed by every
/// public record whose id the caller list does not already contain, in its
/// source order. An asset visible in both scopes appears once, as the
/// caller's copy. Ids repeated within one list keep their first occurrence.
pub fn reconcile(caller: Vec<Asset>, public: Vec<Asset>) -> Vec<Asset> {
    let mut seen: HashSet<AssetId> = HashSet::with_capacity(caller.len() + public.len());
    let mut merged = Vec::with_capacity(caller.len() + public.len());

    for asset in caller.into_iter().chain(public) {
        if seen.insert(asset.id) {
            merged.push(asset);
        }
    }

    merged
}
