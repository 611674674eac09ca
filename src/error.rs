//! Error types shared by the graph engine and the schema adaptors.
//!
//! Layout and navigation never fail; only structural input problems and
//! explicit ordering requests surface here.

use thiserror::Error;

use crate::graph::SchemaFormat;

/// Errors raised while validating input or mutating relationship data.
#[derive(Debug, Error)]
pub enum GraphError {
	/// A block was related to itself.
	#[error("block `{id}` cannot be its own prerequisite")]
	SelfLoop { id: String },

	/// Two or more blocks share an id. Carries every duplicated id.
	#[error("duplicate block ids: {}", .0.join(", "))]
	DuplicateBlockIds(Vec<String>),

	/// A raw block matched neither known schema.
	#[error("invalid block schema: {0}")]
	InvalidBlockSchema(String),

	/// An adaptor was asked for a version it does not know.
	#[error("unsupported schema version `{0}`")]
	UnsupportedSchemaVersion(String),

	/// The input array mixes schema formats.
	#[error("mixed schema formats: block {index} is {other:?}, expected {first:?}")]
	MixedSchemaFormats {
		first: SchemaFormat,
		other: SchemaFormat,
		index: usize,
	},

	/// A full topological order does not exist.
	#[error("prerequisite graph contains a cycle through: {}", .remaining.join(", "))]
	CycleDetected { remaining: Vec<String> },

	/// Rejected configuration value.
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	/// Malformed JSON input.
	#[error("json error: {0}")]
	Json(#[from] serde_json::Error),
}

/// Result alias for fallible engine operations.
pub type Result<T> = std::result::Result<T, GraphError>;
