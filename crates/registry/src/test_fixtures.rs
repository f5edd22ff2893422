#![allow(dead_code)]

use plotgrid_model::{MemorySource, SourceDocument};
use serde_json::{Value, json};

/// A minimal grid-schema plot document.
pub(crate) fn plot(id: &str, pos: (i64, i64), size: (u32, u32)) -> Value {
	json!({
		"id": id,
		"owner": format!("owner-{id}"),
		"position": [pos.0, pos.1],
		"size": [size.0, size.1],
	})
}

/// Labels documents `<n>.json` in the given order.
pub(crate) fn source(docs: impl IntoIterator<Item = Value>) -> MemorySource {
	docs.into_iter().enumerate().map(|(i, doc)| SourceDocument::value(format!("{}.json", i + 1), doc)).collect()
}

pub(crate) fn ids(snap: &crate::Snapshot) -> Vec<&str> {
	snap.records().iter().map(|r| r.id.as_str()).collect()
}

pub(crate) fn messages(snap: &crate::Snapshot) -> Vec<String> {
	snap.errors().iter().map(ToString::to_string).collect()
}
