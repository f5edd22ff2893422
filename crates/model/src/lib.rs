//! Data model shared by the plot registry and the content policy crates.
//!
//! - [`geometry`]: integer grid points, extents and rectangles.
//! - [`record`]: the canonical [`PlotRecord`] and a typed view of its visualization.
//! - [`source`]: enumerable document sources (directories, in-memory lists).

pub mod geometry;
pub mod record;
pub mod source;

pub use geometry::{GeometryError, GridPoint, GridRect, GridSize};
pub use record::{PlotRecord, REQUIRED_FIELDS, Renderer, Visualization, VisualizationKind, import_rich_schema, missing_required_fields};
pub use source::{DEFAULT_TEMPLATE_FILE, DirSource, DocumentBody, DocumentSource, MemorySource, SourceDocument, SourceError, file_label, list_plot_files};
