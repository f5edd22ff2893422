#![allow(dead_code)]

use std::sync::Arc;

use crate::test_fixtures::{ids, messages, plot, source};
use crate::{LoadError, LoadOptions, PlotRegistry, load};

/// Invariant: no two admitted records share an id; the first one enumerated wins.
pub(crate) fn inv_unique_ids() {
	let snap = load(&source([plot("a", (0, 0), (1, 1)), plot("a", (10, 10), (1, 1)), plot("b", (20, 20), (1, 1))]), &LoadOptions::default()).unwrap();

	assert_eq!(ids(&snap), vec!["a", "b"]);
	assert_eq!(snap.get("a").unwrap().position.x, 0);
	assert_eq!(messages(&snap), vec!["Duplicate plot id: a in 2.json".to_string()]);
	match &snap.errors()[0] {
		LoadError::DuplicateId { first_label, .. } => assert_eq!(first_label, "1.json"),
		other => panic!("unexpected error {other:?}"),
	}
}

#[cfg_attr(test, test)]
pub(crate) fn test_unique_ids() {
	inv_unique_ids()
}

/// Invariant: admitted footprints are pairwise disjoint.
pub(crate) fn inv_disjoint_footprints() {
	let snap = load(&source([plot("A", (0, 0), (3, 3)), plot("B", (2, 2), (3, 3))]), &LoadOptions::default()).unwrap();

	assert_eq!(ids(&snap), vec!["A"]);
	assert_eq!(messages(&snap), vec!["Plot B in 2.json overlaps with another plot.".to_string()]);
	match &snap.errors()[0] {
		LoadError::Overlap { claimed_by, cell, .. } => {
			assert_eq!(claimed_by, "A");
			assert_eq!((cell.x, cell.y), (2, 2));
		}
		other => panic!("unexpected error {other:?}"),
	}
}

#[cfg_attr(test, test)]
pub(crate) fn test_disjoint_footprints() {
	inv_disjoint_footprints()
}

/// Invariant: overlap outcome follows enumeration order, not any field of the plots.
pub(crate) fn inv_order_decides_overlap_winner() {
	let one = plot("one", (0, 0), (4, 4));
	let two = plot("two", (3, 3), (2, 2));
	let three = plot("three", (10, 0), (2, 2));
	let opts = LoadOptions::default();

	let forward = load(&source([one.clone(), two.clone(), three.clone()]), &opts).unwrap();
	assert_eq!(ids(&forward), vec!["one", "three"]);

	let swapped = load(&source([two, one, three]), &opts).unwrap();
	assert_eq!(ids(&swapped), vec!["two", "three"]);
	assert_eq!(messages(&swapped), vec!["Plot one in 2.json overlaps with another plot.".to_string()]);
}

#[cfg_attr(test, test)]
pub(crate) fn test_order_decides_overlap_winner() {
	inv_order_decides_overlap_winner()
}

/// Invariant: a rejected document claims neither its id nor its cells.
pub(crate) fn inv_rejected_document_claims_nothing() {
	let snap = load(
		&source([
			plot("base", (0, 0), (2, 2)),
			// Rejected for overlap; must not reserve "late" or (5, 5).
			plot("late", (1, 1), (5, 5)),
			plot("late", (20, 20), (1, 1)),
			plot("corner", (5, 5), (1, 1)),
		]),
		&LoadOptions::default(),
	)
	.unwrap();

	assert_eq!(ids(&snap), vec!["base", "late", "corner"]);
	assert_eq!(snap.get("late").unwrap().position.x, 20);
	assert_eq!(snap.errors().len(), 1);
}

#[cfg_attr(test, test)]
pub(crate) fn test_rejected_document_claims_nothing() {
	inv_rejected_document_claims_nothing()
}

/// Invariant: a pinned snapshot stays intact while a reload publishes a new one.
pub(crate) fn inv_snapshot_liveness_across_reload() {
	let registry = PlotRegistry::default();
	registry.reload(&source([plot("old", (0, 0), (1, 1))])).unwrap();

	let pinned = registry.get("old").expect("old must resolve");
	let snap_before = registry.snapshot();

	registry.reload(&source([plot("new", (0, 0), (1, 1))])).unwrap();

	assert_eq!(pinned.id, "old");
	assert_eq!(snap_before.len(), 1);
	assert!(snap_before.get("old").is_some());
	assert!(registry.get("old").is_none());
	assert_eq!(registry.get("new").unwrap().snapshot().generation(), 2);
	assert!(!Arc::ptr_eq(&snap_before, &registry.snapshot()));
}

#[cfg_attr(test, test)]
pub(crate) fn test_snapshot_liveness_across_reload() {
	inv_snapshot_liveness_across_reload()
}
