//! Process-wide registry with atomic publication.
//!
//! # Role
//!
//! Caches the latest [`Snapshot`] for callers that do not want to reload per
//! request. A reload builds a complete snapshot off to the side, then swaps it
//! in with one atomic store. Readers either see the previous snapshot or the
//! new one, never a partially built index.
//!
//! # Concurrency
//!
//! - **Reads:** wait-free atomic load of the current snapshot.
//! - **Writes:** the swap is atomic; concurrent reloads are last-store-wins,
//!   each publishing a complete snapshot.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;
use plotgrid_model::{DocumentSource, SourceError};
use tracing::debug;

use crate::load::{LoadOptions, load_generation};
use crate::snapshot::{PlotRef, Snapshot};

pub struct PlotRegistry {
	options: LoadOptions,
	snap: ArcSwap<Snapshot>,
	generations: AtomicU64,
}

impl PlotRegistry {
	/// Creates a registry holding an empty snapshot (generation 0).
	pub fn new(options: LoadOptions) -> Self {
		Self {
			options,
			snap: ArcSwap::from_pointee(Snapshot::default()),
			generations: AtomicU64::new(0),
		}
	}

	pub fn options(&self) -> &LoadOptions {
		&self.options
	}

	/// Rebuilds from `source` and publishes the result.
	///
	/// When the source cannot be enumerated the current snapshot stays
	/// published and the error is returned.
	pub fn reload(&self, source: &dyn DocumentSource) -> Result<Arc<Snapshot>, SourceError> {
		let generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;
		let snap = Arc::new(load_generation(source, &self.options, generation)?);
		self.snap.store(Arc::clone(&snap));
		debug!(generation, records = snap.len(), "published plot snapshot");
		Ok(snap)
	}

	/// Pins the current snapshot.
	pub fn snapshot(&self) -> Arc<Snapshot> {
		self.snap.load_full()
	}

	/// Looks up a plot by id, then by display name, in the current snapshot.
	pub fn get(&self, key: &str) -> Option<PlotRef> {
		PlotRef::find(self.snap.load_full(), key)
	}

	pub fn len(&self) -> usize {
		self.snap.load().len()
	}

	pub fn is_empty(&self) -> bool {
		self.snap.load().is_empty()
	}
}

impl Default for PlotRegistry {
	fn default() -> Self {
		Self::new(LoadOptions::default())
	}
}
