//! One full load pass over a document source.
//!
//! # Pipeline
//!
//! Documents are processed strictly in enumeration order. For each one:
//!
//! 1. Decode; failures are [`LoadError::Parse`].
//! 2. Check `id`, `position`, `size` presence ([`LoadError::MissingFields`]).
//! 3. Map onto the typed record and the grid; malformed fields and oversized
//!    footprints are [`LoadError::Parse`].
//! 4. Reject an id already admitted ([`LoadError::DuplicateId`]).
//! 5. Reject a footprint touching an admitted cell ([`LoadError::Overlap`]).
//! 6. Admit: the record, its id and its cells join the pass state.
//!
//! First registrant wins. A rejected document claims neither its id nor its
//! cells, so a later document may still take them. All state is local to one
//! call to [`load`].

use plotgrid_model::{DocumentSource, PlotRecord, SourceDocument, SourceError, import_rich_schema, missing_required_fields};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, info_span};

use crate::error::LoadError;
use crate::geometry::{OccupancyIndex, occupied_cells};
use crate::snapshot::Snapshot;

/// Tunables for a load pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadOptions {
	/// Largest footprint, in cells, a single plot may claim.
	pub max_footprint_cells: u64,
	/// Accept the richer visualization schema through the import adapter.
	pub import_rich_schema: bool,
}

impl Default for LoadOptions {
	fn default() -> Self {
		Self {
			max_footprint_cells: 1_000_000,
			import_rich_schema: false,
		}
	}
}

/// Builds a snapshot from every document in `source`.
///
/// Only a source that cannot be enumerated at all is an error; individual
/// documents that fail are collected in [`Snapshot::errors`].
pub fn load(source: &dyn DocumentSource, options: &LoadOptions) -> Result<Snapshot, SourceError> {
	load_generation(source, options, 0)
}

pub(crate) fn load_generation(source: &dyn DocumentSource, options: &LoadOptions, generation: u64) -> Result<Snapshot, SourceError> {
	let _span = info_span!("plot_load", generation).entered();
	let mut pass = LoadPass::new(options);
	for doc in source.documents()? {
		pass.ingest(doc);
	}
	info!(admitted = pass.records.len(), rejected = pass.errors.len(), "plot load complete");
	Ok(Snapshot::new(generation, pass.records, pass.errors))
}

struct LoadPass<'a> {
	options: &'a LoadOptions,
	/// Admitted id to the label it was admitted from.
	ids: FxHashMap<String, String>,
	occupancy: OccupancyIndex,
	records: Vec<PlotRecord>,
	errors: Vec<LoadError>,
}

impl<'a> LoadPass<'a> {
	fn new(options: &'a LoadOptions) -> Self {
		Self {
			options,
			ids: FxHashMap::default(),
			occupancy: OccupancyIndex::new(),
			records: Vec::new(),
			errors: Vec::new(),
		}
	}

	fn ingest(&mut self, doc: SourceDocument) {
		let label = doc.label.clone();
		match self.admit(doc) {
			Ok(record) => {
				debug!(id = %record.id, %label, "admitted plot");
				self.records.push(record);
			}
			Err(error) => {
				debug!(%label, %error, "rejected plot");
				self.errors.push(error);
			}
		}
	}

	fn admit(&mut self, doc: SourceDocument) -> Result<PlotRecord, LoadError> {
		let label = doc.label.clone();
		let parse_err = |cause: String| LoadError::Parse { label: label.clone(), cause };

		let mut map = match doc.into_value().map_err(parse_err)? {
			Value::Object(map) => map,
			_ => return Err(parse_err("document root must be a JSON object".into())),
		};
		if self.options.import_rich_schema {
			import_rich_schema(&mut map);
		}

		let missing = missing_required_fields(&map);
		if !missing.is_empty() {
			return Err(LoadError::MissingFields { label, fields: missing });
		}

		let record = PlotRecord::from_value(Value::Object(map)).map_err(|e| parse_err(e.to_string()))?;
		let rect = record.footprint().map_err(|e| parse_err(e.to_string()))?;
		if rect.area() > self.options.max_footprint_cells {
			return Err(parse_err(format!(
				"footprint of {} cells exceeds the limit of {}",
				rect.area(),
				self.options.max_footprint_cells
			)));
		}

		if let Some(first_label) = self.ids.get(&record.id) {
			return Err(LoadError::DuplicateId {
				id: record.id,
				label,
				first_label: first_label.clone(),
			});
		}

		if let Some((cell, owner)) = self.occupancy.first_conflict(rect.cells()) {
			return Err(LoadError::Overlap {
				id: record.id,
				label,
				claimed_by: owner.to_string(),
				cell,
			});
		}

		let cells = occupied_cells(record.position, record.size).map_err(|e| parse_err(e.to_string()))?;
		self.occupancy.claim(&record.id, &cells);
		self.ids.insert(record.id.clone(), label);
		Ok(record)
	}
}
