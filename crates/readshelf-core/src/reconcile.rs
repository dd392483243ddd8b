//! Shelf reconciliation
//!
//! Splits fetched shelf items into the ones that still need a note and the
//! ones already present in the local index.

use std::collections::HashSet;

use crate::index::LocalIndex;
use crate::models::ShelfItem;

/// Outcome of comparing a shelf against the local notes
#[derive(Debug, Clone, Default)]
pub struct SyncPlan<'a> {
    /// Items without a note, in feed order
    pub new: Vec<&'a ShelfItem>,
    /// Items that already have a note
    pub existing: Vec<&'a ShelfItem>,
    /// Repeated IDs within the feed itself (only the first copy is planned)
    pub duplicates: Vec<&'a ShelfItem>,
}

/// Compute the set difference between shelf items and local notes
pub fn plan<'a>(items: &'a [ShelfItem], index: &LocalIndex) -> SyncPlan<'a> {
    let mut seen = HashSet::new();
    let mut plan = SyncPlan::default();

    for item in items {
        if !seen.insert(item.book_id.as_str()) {
            plan.duplicates.push(item);
        } else if index.contains(&item.book_id) {
            plan.existing.push(item);
        } else {
            plan.new.push(item);
        }
    }

    plan
}
