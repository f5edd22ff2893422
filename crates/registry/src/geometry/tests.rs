use plotgrid_model::{GridPoint, GridSize};
use pretty_assertions::assert_eq;

use super::*;

fn cells(x: i64, y: i64, w: u32, h: u32) -> CellSet {
	occupied_cells(GridPoint::new(x, y), GridSize::new(w, h).unwrap()).unwrap()
}

#[test]
fn occupied_cells_enumerates_width_along_x_and_height_along_y() {
	let set = cells(1, 1, 3, 2);
	assert_eq!(set.len(), 6);
	assert!(set.contains(&GridPoint::new(3, 2)));
	assert!(!set.contains(&GridPoint::new(2, 3)));
	assert!(!set.contains(&GridPoint::new(4, 1)));
}

#[test]
fn overlapping_squares_share_a_corner_cell() {
	let a = cells(0, 0, 3, 3);
	let b = cells(2, 2, 3, 3);
	assert!(overlaps(&a, &b));
	assert!(overlaps(&b, &a));
	assert_eq!(a.intersection(&b).copied().collect::<Vec<_>>(), vec![GridPoint::new(2, 2)]);
}

#[test]
fn adjacent_footprints_do_not_overlap() {
	assert!(!overlaps(&cells(0, 0, 3, 3), &cells(3, 0, 2, 2)));
	assert!(!overlaps(&cells(0, 0, 1, 1), &CellSet::default()));
}

#[test]
fn occupancy_reports_first_conflict_with_owner() {
	let mut index = OccupancyIndex::new();
	index.claim("alpha", &cells(0, 0, 2, 2));
	index.claim("beta", &cells(5, 5, 1, 1));
	assert_eq!(index.len(), 5);

	let queried = [GridPoint::new(9, 9), GridPoint::new(5, 5), GridPoint::new(1, 1)];
	assert_eq!(index.first_conflict(queried), Some((GridPoint::new(5, 5), "beta")));
	assert_eq!(index.first_conflict([GridPoint::new(-1, 0)]), None);
	assert_eq!(index.owner(GridPoint::new(1, 0)), Some("alpha"));
}

#[test]
fn footprint_overflow_is_reported() {
	let err = occupied_cells(GridPoint::new(0, i64::MAX), GridSize::new(1, 1).unwrap());
	assert!(err.is_err());
}
