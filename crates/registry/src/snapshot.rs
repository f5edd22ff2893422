//! Immutable result of one load pass.
//!
//! # Role
//!
//! Pure view type: lookups and listing, no mutation. The registry publishes
//! whole snapshots; nothing edits one after [`Snapshot::new`].

use std::sync::Arc;

use plotgrid_model::PlotRecord;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::error::{LoadError, NotFound};

/// Admitted records plus every error from the pass that produced them.
#[derive(Debug, Default)]
pub struct Snapshot {
	generation: u64,
	records: Vec<PlotRecord>,
	by_id: FxHashMap<Box<str>, usize>,
	/// Display name to the first record carrying it.
	by_name: FxHashMap<Box<str>, usize>,
	errors: Vec<LoadError>,
}

impl Snapshot {
	pub(crate) fn new(generation: u64, records: Vec<PlotRecord>, errors: Vec<LoadError>) -> Self {
		let mut by_id = FxHashMap::with_capacity_and_hasher(records.len(), Default::default());
		let mut by_name = FxHashMap::default();
		for (idx, record) in records.iter().enumerate() {
			by_id.insert(Box::from(record.id.as_str()), idx);
			if let Some(name) = record.name() {
				by_name.entry(Box::from(name)).or_insert(idx);
			}
		}
		Self {
			generation,
			records,
			by_id,
			by_name,
			errors,
		}
	}

	/// Load counter of the registry that published this snapshot; 0 for standalone loads.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Admitted records in admission order.
	pub fn records(&self) -> &[PlotRecord] {
		&self.records
	}

	/// Rejections in enumeration order.
	pub fn errors(&self) -> &[LoadError] {
		&self.errors
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// Exact id match, falling back to exact display-name match.
	pub fn get(&self, key: &str) -> Option<&PlotRecord> {
		self.index_of(key).map(|idx| &self.records[idx])
	}

	/// Like [`Snapshot::get`] but with a reportable miss.
	pub fn lookup(&self, key: &str) -> Result<&PlotRecord, NotFound> {
		self.get(key).ok_or_else(|| NotFound { id: key.to_string() })
	}

	/// Records and errors, shaped for transports.
	pub fn list(&self) -> Listing<'_> {
		Listing {
			records: &self.records,
			errors: &self.errors,
		}
	}

	fn index_of(&self, key: &str) -> Option<usize> {
		self.by_id.get(key).or_else(|| self.by_name.get(key)).copied()
	}
}

/// Serializable `{records, errors}` view of a snapshot.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Listing<'a> {
	pub records: &'a [PlotRecord],
	pub errors: &'a [LoadError],
}

/// Snapshot-pinning handle to one record.
///
/// Holds its snapshot alive, so a reload published after the lookup does not
/// invalidate it.
#[derive(Clone)]
pub struct PlotRef {
	pub(crate) snap: Arc<Snapshot>,
	pub(crate) idx: usize,
}

impl PlotRef {
	pub(crate) fn find(snap: Arc<Snapshot>, key: &str) -> Option<Self> {
		let idx = snap.index_of(key)?;
		Some(Self { snap, idx })
	}

	/// The snapshot this record was read from.
	pub fn snapshot(&self) -> &Arc<Snapshot> {
		&self.snap
	}
}

impl std::ops::Deref for PlotRef {
	type Target = PlotRecord;

	fn deref(&self) -> &PlotRecord {
		&self.snap.records[self.idx]
	}
}

impl std::fmt::Debug for PlotRef {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PlotRef")
			.field("id", &self.id)
			.field("generation", &self.snap.generation)
			.finish()
	}
}
