//! Cell-level occupancy.
//!
//! Each footprint is flattened into the unit cells it covers, which turns
//! rectangle overlap into set membership. Cost is O(area) per plot, so the
//! loader caps footprint area (see [`crate::LoadOptions::max_footprint_cells`]).

use plotgrid_model::{GeometryError, GridPoint, GridRect, GridSize};
use rustc_hash::{FxHashMap, FxHashSet};

/// Set of occupied grid cells.
pub type CellSet = FxHashSet<GridPoint>;

/// Every cell covered by the rectangle anchored at `position` with extent `size`.
pub fn occupied_cells(position: GridPoint, size: GridSize) -> Result<CellSet, GeometryError> {
	let rect = GridRect::new(position, size)?;
	Ok(rect.cells().collect())
}

/// Returns true if any cell of `cells` is already in `used`.
pub fn overlaps(cells: &CellSet, used: &CellSet) -> bool {
	let (small, large) = if cells.len() <= used.len() { (cells, used) } else { (used, cells) };
	small.iter().any(|c| large.contains(c))
}

/// Cells claimed so far during one load, with the id that claimed each.
#[derive(Debug, Default)]
pub struct OccupancyIndex {
	owner_of: FxHashMap<GridPoint, usize>,
	owners: Vec<String>,
}

impl OccupancyIndex {
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of claimed cells.
	pub fn len(&self) -> usize {
		self.owner_of.len()
	}

	pub fn is_empty(&self) -> bool {
		self.owner_of.is_empty()
	}

	/// Id of the plot holding `cell`, if any.
	pub fn owner(&self, cell: GridPoint) -> Option<&str> {
		self.owner_of.get(&cell).map(|&i| self.owners[i].as_str())
	}

	/// First already-claimed cell among `cells`, in iteration order, with its owner.
	pub fn first_conflict(&self, cells: impl IntoIterator<Item = GridPoint>) -> Option<(GridPoint, &str)> {
		cells.into_iter().find_map(|cell| self.owner(cell).map(|owner| (cell, owner)))
	}

	/// Records `cells` as held by `id`. Callers check for conflicts first.
	pub fn claim(&mut self, id: &str, cells: &CellSet) {
		let idx = self.owners.len();
		self.owners.push(id.to_string());
		self.owner_of.reserve(cells.len());
		for &cell in cells {
			let prev = self.owner_of.insert(cell, idx);
			debug_assert!(prev.is_none(), "cell {cell:?} claimed twice");
		}
	}
}

#[cfg(test)]
mod tests;
