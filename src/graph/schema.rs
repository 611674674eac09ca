//! Versioned input formats and their conversion into [`Block`]s.
//!
//! Formats are told apart by the shape of each element's `title`:
//! `v0.1` carries `he_text` / `en_text`, `v0.2` carries `he` / `en`. Every
//! element of an array must classify the same way; a mixed array is
//! rejected rather than merged.

use std::collections::HashSet;

use serde_json::{Map, Value};

use super::types::Block;
use crate::error::{GraphError, Result};

/// A recognised block wire format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaFormat {
	/// Titles as `{ "he_text", "en_text" }`.
	V01,
	/// Titles as `{ "he", "en" }`, the internal shape.
	V02,
}

impl SchemaFormat {
	pub fn version(self) -> &'static str {
		match self {
			SchemaFormat::V01 => "0.1",
			SchemaFormat::V02 => "0.2",
		}
	}

	pub fn from_version(version: &str) -> Result<Self> {
		match version.trim().trim_start_matches('v') {
			"0.1" => Ok(SchemaFormat::V01),
			"0.2" => Ok(SchemaFormat::V02),
			other => Err(GraphError::UnsupportedSchemaVersion(other.to_string())),
		}
	}
}

/// Classify a single raw block.
pub fn detect_format(value: &Value) -> Result<SchemaFormat> {
	let object = value
		.as_object()
		.ok_or_else(|| GraphError::InvalidBlockSchema("block is not an object".into()))?;
	let id = object.get("id").and_then(Value::as_str).unwrap_or("<missing id>");
	let title = object
		.get("title")
		.and_then(Value::as_object)
		.ok_or_else(|| GraphError::InvalidBlockSchema(format!("block `{id}` has no title object")))?;

	let has = |a: &str, b: &str| title.get(a).is_some_and(Value::is_string) && title.get(b).is_some_and(Value::is_string);
	match (has("he_text", "en_text"), has("he", "en")) {
		(true, false) => Ok(SchemaFormat::V01),
		(false, true) => Ok(SchemaFormat::V02),
		(true, true) => Err(GraphError::InvalidBlockSchema(format!(
			"block `{id}` title carries both he/en and he_text/en_text"
		))),
		(false, false) => Err(GraphError::InvalidBlockSchema(format!(
			"block `{id}` title needs string he/en or he_text/en_text fields"
		))),
	}
}

/// Classify an array, failing on the first element that disagrees with the first.
///
/// An empty array is treated as the internal format.
pub fn detect_array_format(values: &[Value]) -> Result<SchemaFormat> {
	let Some(first) = values.first() else {
		return Ok(SchemaFormat::V02);
	};
	let expected = detect_format(first)?;
	for (index, value) in values.iter().enumerate().skip(1) {
		let other = detect_format(value)?;
		if other != expected {
			return Err(GraphError::MixedSchemaFormats {
				first: expected,
				other,
				index,
			});
		}
	}
	Ok(expected)
}

/// Convert `values` written in `version` into blocks.
pub fn adapt(version: &str, values: &[Value]) -> Result<Vec<Block>> {
	let format = SchemaFormat::from_version(version)?;
	values
		.iter()
		.map(|value| {
			let found = detect_format(value)?;
			if found != format {
				return Err(GraphError::InvalidBlockSchema(format!(
					"expected v{} block, found v{}",
					format.version(),
					found.version()
				)));
			}
			adapt_one(format, value.clone())
		})
		.collect()
}

fn adapt_one(format: SchemaFormat, value: Value) -> Result<Block> {
	let value = match (format, value) {
		(SchemaFormat::V01, Value::Object(mut object)) => {
			if let Some(Value::Object(title)) = object.remove("title") {
				object.insert("title".into(), Value::Object(rename_title(title)));
			}
			Value::Object(object)
		}
		(_, value) => value,
	};
	serde_json::from_value(value).map_err(|e| GraphError::InvalidBlockSchema(e.to_string()))
}

fn rename_title(mut title: Map<String, Value>) -> Map<String, Value> {
	for (from, to) in [("he_text", "he"), ("en_text", "en")] {
		if let Some(text) = title.remove(from) {
			title.insert(to.into(), text);
		}
	}
	title
}

/// Fail with every id that appears more than once, in first-seen order.
pub fn validate_unique_ids(blocks: &[Block]) -> Result<()> {
	let mut seen = HashSet::new();
	let mut reported = HashSet::new();
	let mut duplicates = Vec::new();
	for block in blocks {
		if !seen.insert(block.id.as_str()) && reported.insert(block.id.as_str()) {
			duplicates.push(block.id.clone());
		}
	}
	if duplicates.is_empty() {
		Ok(())
	} else {
		Err(GraphError::DuplicateBlockIds(duplicates))
	}
}

/// Parse a JSON array of blocks in any supported format.
pub fn parse_blocks(json: &str) -> Result<Vec<Block>> {
	let values: Vec<Value> = serde_json::from_str(json)?;
	let format = detect_array_format(&values)?;
	let blocks = adapt(format.version(), &values)?;
	validate_unique_ids(&blocks)?;
	Ok(blocks)
}
