//! Deterministic ordering of vote tallies.

use std::cmp::Ordering;

use crate::{dao::models::TallyEntity, util::collate};

/// Most votes first, then title, then item id so equal titles still order the same way
/// regardless of insertion order.
pub fn compare(a: &TallyEntity, b: &TallyEntity) -> Ordering {
    b.votes
        .cmp(&a.votes)
        .then_with(|| collate(&a.title, &b.title))
        .then_with(|| a.item_id.cmp(&b.item_id))
}

/// Sort tallies in place; the leader ends up first.
pub fn sort_tallies(tallies: &mut [TallyEntity]) {
    tallies.sort_by(compare);
}

/// Plurality leader of already sorted tallies.
pub fn leader(tallies: &[TallyEntity]) -> Option<&TallyEntity> {
    tallies.first()
}
