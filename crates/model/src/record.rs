//! Canonical plot record.
//!
//! The registry keys plots on the grid schema: `id`, `position` and `size`.
//! Those are the only fields decoded here. Every other key rides along as
//! raw JSON so lookups return the document the agent registered, and a
//! malformed content field never keeps a plot out of the registry; judging
//! content is the validator's job. Enumerated fields keep unknown values as
//! [`Renderer::Other`] / [`VisualizationKind::Other`].

use std::collections::BTreeMap;
use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::geometry::{GeometryError, GridPoint, GridRect, GridSize};

/// Fields a document must carry to be admitted to the registry, in report order.
pub const REQUIRED_FIELDS: [&str; 3] = ["id", "position", "size"];

/// One registered plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotRecord {
	/// Numeric ids are kept in their decimal form.
	#[serde(deserialize_with = "plot_id")]
	pub id: String,
	pub position: GridPoint,
	pub size: GridSize,
	/// Every other key, as submitted.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl PlotRecord {
	/// Parses a record from a JSON object that already passed the required-field check.
	pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
		serde_json::from_value(value)
	}

	/// The rectangle this plot claims.
	pub fn footprint(&self) -> Result<GridRect, GeometryError> {
		GridRect::new(self.position, self.size)
	}

	pub fn owner(&self) -> Option<&str> {
		self.extra.get("owner").and_then(Value::as_str)
	}

	/// Display name, used as the secondary lookup key.
	pub fn name(&self) -> Option<&str> {
		self.extra.get("name").and_then(Value::as_str)
	}

	/// Typed view of `visualization`, or `None` when it is absent or not shaped like one.
	pub fn visualization(&self) -> Option<Visualization> {
		serde_json::from_value(self.extra.get("visualization")?.clone()).ok()
	}
}

fn plot_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
	match Value::deserialize(deserializer)? {
		Value::String(id) => Ok(id),
		Value::Number(n) => Ok(n.to_string()),
		other => Err(D::Error::custom(format!("plot id must be a string or number, got {other}"))),
	}
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Visualization {
	#[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
	pub kind: Option<VisualizationKind>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub renderer: Option<Renderer>,
	#[serde(default, skip_serializing_if = "Map::is_empty")]
	pub style: Map<String, Value>,
	#[serde(default, skip_serializing_if = "Map::is_empty")]
	pub animation: Map<String, Value>,
	/// Language name to source. Values are kept raw: a non-string entry is a
	/// content-policy error, not a load error.
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub code: BTreeMap<String, Value>,
}

macro_rules! string_enum {
	($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
		$(#[$meta])*
		#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(from = "String", into = "String")]
		pub enum $name {
			$($variant,)+
			/// A value outside the supported set, kept verbatim.
			Other(String),
		}

		impl $name {
			/// Every supported value, in declaration order.
			pub const SUPPORTED: &[&str] = &[$($text),+];

			pub fn as_str(&self) -> &str {
				match self {
					$(Self::$variant => $text,)+
					Self::Other(s) => s,
				}
			}

			pub fn is_supported(&self) -> bool {
				!matches!(self, Self::Other(_))
			}
		}

		impl From<String> for $name {
			fn from(s: String) -> Self {
				match s.as_str() {
					$($text => Self::$variant,)+
					_ => Self::Other(s),
				}
			}
		}

		impl From<&str> for $name {
			fn from(s: &str) -> Self {
				Self::from(s.to_string())
			}
		}

		impl From<$name> for String {
			fn from(v: $name) -> Self {
				match v {
					$name::Other(s) => s,
					other => other.as_str().to_string(),
				}
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str(self.as_str())
			}
		}
	};
}

string_enum! {
	/// What a plot renders as.
	VisualizationKind {
		Geometry => "geometry",
		ParticleSystem => "particle_system",
		Procedural => "procedural",
		Custom => "custom",
	}
}

string_enum! {
	/// Rendering backend a plot targets.
	Renderer {
		Webgl => "webgl",
		Canvas => "canvas",
		Svg => "svg",
		ThreeJs => "three_js",
		BabylonJs => "babylon_js",
	}
}

/// Returns the required fields absent from a document object, in report order.
pub fn missing_required_fields(doc: &Map<String, Value>) -> Vec<&'static str> {
	REQUIRED_FIELDS.iter().copied().filter(|f| !doc.contains_key(*f)).collect()
}

/// Fills grid fields from the richer visualization schema.
///
/// Only absent keys are filled: `id` from `name`, `owner` from `agent_id`,
/// `position` from the floored `coordinates.x` / `coordinates.y`, and a
/// `size` object whose `width` / `height` are whole floats becomes an integer
/// pair. Anything that does not map cleanly is left alone so the usual
/// required-field and parse checks report it.
pub fn import_rich_schema(doc: &mut Map<String, Value>) {
	if !doc.contains_key("id")
		&& let Some(name) = doc.get("name").and_then(Value::as_str)
	{
		let name = name.to_string();
		doc.insert("id".into(), Value::String(name));
	}

	if !doc.contains_key("owner")
		&& let Some(agent) = doc.get("agent_id").and_then(Value::as_str)
	{
		let agent = agent.to_string();
		doc.insert("owner".into(), Value::String(agent));
	}

	if !doc.contains_key("position")
		&& let Some(coords) = doc.get("coordinates").and_then(Value::as_object)
		&& let (Some(x), Some(y)) = (floor_int(coords.get("x")), floor_int(coords.get("y")))
	{
		doc.insert("position".into(), Value::from(vec![x, y]));
	}

	if let Some(size) = doc.get("size").and_then(Value::as_object)
		&& let (Some(w), Some(h)) = (whole_int(size.get("width")), whole_int(size.get("height")))
	{
		doc.insert("size".into(), Value::from(vec![w, h]));
	}
}

fn floor_int(v: Option<&Value>) -> Option<i64> {
	let v = v?;
	if let Some(i) = v.as_i64() {
		return Some(i);
	}
	let f = v.as_f64()?.floor();
	(f.is_finite() && f >= i64::MIN as f64 && f <= i64::MAX as f64).then_some(f as i64)
}

fn whole_int(v: Option<&Value>) -> Option<i64> {
	let v = v?;
	if let Some(i) = v.as_i64() {
		return Some(i);
	}
	let f = v.as_f64()?;
	(f.fract() == 0.0 && f >= 0.0 && f <= u32::MAX as f64).then_some(f as i64)
}
