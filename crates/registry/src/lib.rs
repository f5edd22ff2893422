#![cfg_attr(doc, allow(rustdoc::private_intra_doc_links))]
//! Plot registry and conflict detection.
//!
//! # Mental Model
//!
//! 1. **Load:** [`load`] walks a [`DocumentSource`](plotgrid_model::DocumentSource)
//!    once, in enumeration order, admitting each plot whose id is new and
//!    whose footprint touches no admitted cell.
//! 2. **Snapshot:** the pass yields an immutable [`Snapshot`] of admitted
//!    records plus one [`LoadError`] per rejected document.
//! 3. **Publication (optional):** [`PlotRegistry`] caches the latest snapshot
//!    and replaces it atomically on [`PlotRegistry::reload`].
//!
//! # Invariants
//!
//! - No two admitted records share an id.
//!   - Enforced in: [`load`] (duplicate check against the pass id map).
//!   - Tested by: [`crate::invariants::test_unique_ids`]
//!   - Failure symptom: `get` returns an arbitrary one of several plots.
//!
//! - Admitted footprints are pairwise disjoint.
//!   - Enforced in: [`geometry::OccupancyIndex::first_conflict`].
//!   - Tested by: [`crate::invariants::test_disjoint_footprints`]
//!   - Failure symptom: two agents both own a cell.
//!
//! - Outcome depends only on enumeration order (first registrant wins).
//!   - Enforced in: [`load`] (sequential pass, no priority field).
//!   - Tested by: [`crate::invariants::test_order_decides_overlap_winner`]
//!   - Failure symptom: reordering files changes nothing, or changes more than the conflicting pair.
//!
//! - A rejected document is never partially admitted.
//!   - Enforced in: [`load`] (claims happen only after every check passes).
//!   - Tested by: [`crate::invariants::test_rejected_document_claims_nothing`]
//!   - Failure symptom: a plot rejected for overlap still blocks its id.
//!
//! - Readers never observe a partially built snapshot.
//!   - Enforced in: [`PlotRegistry::reload`] (build, then one atomic store).
//!   - Tested by: [`crate::invariants::test_snapshot_liveness_across_reload`]

pub mod geometry;

mod error;
mod load;
mod registry;
mod snapshot;

pub use error::{LoadError, NotFound};
pub use geometry::{CellSet, OccupancyIndex, occupied_cells, overlaps};
pub use load::{LoadOptions, load};
pub use registry::PlotRegistry;
pub use snapshot::{Listing, PlotRef, Snapshot};

#[cfg(any(test, doc))]
pub(crate) mod invariants;

#[cfg(any(test, doc))]
mod test_fixtures;
