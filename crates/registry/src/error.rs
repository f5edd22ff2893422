use plotgrid_model::GridPoint;
use serde::{Serialize, Serializer};

/// Why a document was kept out of a snapshot.
///
/// Display strings are the user-facing report lines; the extra fields on
/// [`LoadError::DuplicateId`] and [`LoadError::Overlap`] name the earlier
/// registrant for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
	/// The document could not be read, decoded, or mapped onto the grid.
	#[error("Error loading plot from {label}: {cause}")]
	Parse { label: String, cause: String },

	#[error("Plot in {label} missing fields: {}", fields.join(", "))]
	MissingFields { label: String, fields: Vec<&'static str> },

	/// Another document earlier in enumeration order already holds this id.
	#[error("Duplicate plot id: {id} in {label}")]
	DuplicateId { id: String, label: String, first_label: String },

	/// The footprint shares at least one cell with an admitted plot.
	#[error("Plot {id} in {label} overlaps with another plot.")]
	Overlap { id: String, label: String, claimed_by: String, cell: GridPoint },
}

impl LoadError {
	/// Label of the rejected document.
	pub fn label(&self) -> &str {
		match self {
			Self::Parse { label, .. } | Self::MissingFields { label, .. } | Self::DuplicateId { label, .. } | Self::Overlap { label, .. } => label,
		}
	}
}

impl Serialize for LoadError {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

/// Lookup miss, rendered by transports as a not-found response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Plot with id '{id}' not found.")]
pub struct NotFound {
	pub id: String,
}
