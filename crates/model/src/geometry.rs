//! Integer grid geometry for plot footprints.
//!
//! Plots claim axis-aligned rectangles on an unbounded integer grid. A
//! rectangle is anchored at its top-left cell and extends `width` cells along
//! x and `height` cells along y. Edges returned by [`GridRect::right`] and
//! [`GridRect::bottom`] are exclusive.
//!
//! Both [`GridPoint`] and [`GridSize`] deserialize from either a two-element
//! array (`[x, y]`, `[width, height]`) or an object (`{"x": .., "y": ..}`,
//! `{"width": .., "height": ..}`). Extra object keys such as `z` or `depth`
//! are ignored.

use serde::{Deserialize, Serialize};

/// Errors raised when a footprint cannot be represented on the grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
	/// The far edge of the rectangle does not fit in an `i64`.
	#[error("footprint at ({x}, {y}) with size {width}x{height} overflows the grid")]
	Overflow { x: i64, y: i64, width: u32, height: u32 },
}

/// A single grid cell, or the anchor of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "PointRepr", into = "[i64; 2]")]
pub struct GridPoint {
	pub x: i64,
	pub y: i64,
}

impl GridPoint {
	/// Creates a new point.
	pub const fn new(x: i64, y: i64) -> Self {
		Self { x, y }
	}
}

impl From<(i64, i64)> for GridPoint {
	fn from((x, y): (i64, i64)) -> Self {
		Self { x, y }
	}
}

impl From<GridPoint> for [i64; 2] {
	fn from(p: GridPoint) -> Self {
		[p.x, p.y]
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PointRepr {
	Pair([i64; 2]),
	Named { x: i64, y: i64 },
}

impl From<PointRepr> for GridPoint {
	fn from(repr: PointRepr) -> Self {
		match repr {
			PointRepr::Pair([x, y]) => Self { x, y },
			PointRepr::Named { x, y } => Self { x, y },
		}
	}
}

/// Extent of a rectangle in cells. Both dimensions are at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SizeRepr", into = "[u32; 2]")]
pub struct GridSize {
	width: u32,
	height: u32,
}

impl GridSize {
	/// Creates a size, returning `None` if either dimension is zero.
	pub const fn new(width: u32, height: u32) -> Option<Self> {
		if width == 0 || height == 0 { None } else { Some(Self { width, height }) }
	}

	pub const fn width(&self) -> u32 {
		self.width
	}

	pub const fn height(&self) -> u32 {
		self.height
	}

	/// Number of cells covered.
	pub const fn area(&self) -> u64 {
		self.width as u64 * self.height as u64
	}
}

impl From<GridSize> for [u32; 2] {
	fn from(s: GridSize) -> Self {
		[s.width, s.height]
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SizeRepr {
	Pair([u32; 2]),
	Named { width: u32, height: u32 },
}

impl TryFrom<SizeRepr> for GridSize {
	type Error = String;

	fn try_from(repr: SizeRepr) -> Result<Self, Self::Error> {
		let (width, height) = match repr {
			SizeRepr::Pair([w, h]) => (w, h),
			SizeRepr::Named { width, height } => (width, height),
		};
		Self::new(width, height).ok_or_else(|| format!("size must be at least 1x1, got {width}x{height}"))
	}
}

/// A rectangle with an anchor and a non-empty extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridRect {
	pub origin: GridPoint,
	pub size: GridSize,
}

impl GridRect {
	/// Creates a rectangle, checking that its far edges fit on the grid.
	pub fn new(origin: GridPoint, size: GridSize) -> Result<Self, GeometryError> {
		let overflow = || GeometryError::Overflow {
			x: origin.x,
			y: origin.y,
			width: size.width,
			height: size.height,
		};
		origin.x.checked_add(i64::from(size.width)).ok_or_else(overflow)?;
		origin.y.checked_add(i64::from(size.height)).ok_or_else(overflow)?;
		Ok(Self { origin, size })
	}

	pub const fn left(&self) -> i64 {
		self.origin.x
	}

	/// Right edge x coordinate (exclusive).
	pub const fn right(&self) -> i64 {
		self.origin.x + self.size.width as i64
	}

	pub const fn top(&self) -> i64 {
		self.origin.y
	}

	/// Bottom edge y coordinate (exclusive).
	pub const fn bottom(&self) -> i64 {
		self.origin.y + self.size.height as i64
	}

	pub const fn area(&self) -> u64 {
		self.size.area()
	}

	/// Returns true if the cell lies inside the rectangle.
	pub const fn contains(&self, cell: GridPoint) -> bool {
		cell.x >= self.left() && cell.x < self.right() && cell.y >= self.top() && cell.y < self.bottom()
	}

	/// Returns true if the two rectangles share at least one cell.
	pub const fn intersects(&self, other: &Self) -> bool {
		self.left() < other.right() && other.left() < self.right() && self.top() < other.bottom() && other.top() < self.bottom()
	}

	/// Iterates every covered cell, column by column.
	pub fn cells(&self) -> impl Iterator<Item = GridPoint> + '_ {
		(self.left()..self.right()).flat_map(move |x| (self.top()..self.bottom()).map(move |y| GridPoint { x, y }))
	}
}
