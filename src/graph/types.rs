//! Block records and the typed edges derived from them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Display language for block titles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
	/// Hebrew.
	He,
	/// English.
	#[default]
	En,
}

/// A title carried in both supported languages.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct BilingualText {
	pub he: String,
	pub en: String,
}

impl BilingualText {
	pub fn new(he: impl Into<String>, en: impl Into<String>) -> Self {
		Self {
			he: he.into(),
			en: en.into(),
		}
	}

	/// Text for `language`, falling back to the other language when empty.
	pub fn get(&self, language: Language) -> &str {
		let (primary, fallback) = match language {
			Language::He => (&self.he, &self.en),
			Language::En => (&self.en, &self.he),
		};
		if primary.is_empty() { fallback } else { primary }
	}
}

/// A course unit in the dependency graph.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Block {
	/// Unique identifier, referenced by other blocks' relationship lists.
	pub id: String,
	pub title: BilingualText,
	/// Ids that must be learned before this block. Order carries no meaning.
	#[serde(default)]
	pub prerequisites: Vec<String>,
	/// Ids of the blocks that contain this one.
	#[serde(default)]
	pub parents: Vec<String>,
	/// Fields the engine does not interpret, kept verbatim.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl Block {
	pub fn new(id: impl Into<String>, title: BilingualText) -> Self {
		Self {
			id: id.into(),
			title,
			prerequisites: Vec::new(),
			parents: Vec::new(),
			extra: Map::new(),
		}
	}

	pub fn with_prerequisites<I, S>(mut self, ids: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.prerequisites = ids.into_iter().map(Into::into).collect();
		self
	}

	pub fn with_parents<I, S>(mut self, ids: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.parents = ids.into_iter().map(Into::into).collect();
		self
	}
}

/// Relationship carried by an [`Edge`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeKind {
	/// `from` must be learned before `to`.
	Prerequisite,
	/// `from` contains `to`.
	Parent,
}

/// A directed, typed relationship between two block ids.
///
/// `to` is always a known block; `from` may dangle when the source block
/// referenced an id outside the input set.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
	pub from: String,
	pub to: String,
	pub kind: EdgeKind,
}

impl Edge {
	pub fn new(from: impl Into<String>, to: impl Into<String>, kind: EdgeKind) -> Self {
		Self {
			from: from.into(),
			to: to.into(),
			kind,
		}
	}

	pub fn prerequisite(from: impl Into<String>, to: impl Into<String>) -> Self {
		Self::new(from, to, EdgeKind::Prerequisite)
	}

	pub fn parent(from: impl Into<String>, to: impl Into<String>) -> Self {
		Self::new(from, to, EdgeKind::Parent)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn title_falls_back_to_other_language() {
		let title = BilingualText::new("", "Algebra");
		assert_eq!(title.get(Language::He), "Algebra");
		assert_eq!(title.get(Language::En), "Algebra");
	}

	#[test]
	fn unknown_fields_survive_deserialization() {
		let block: Block = serde_json::from_value(serde_json::json!({
			"id": "a",
			"title": { "he": "א", "en": "A" },
			"credits": 3,
			"tags": ["core"]
		}))
		.unwrap();
		assert!(block.prerequisites.is_empty());
		assert_eq!(block.extra["credits"], 3);
		let back = serde_json::to_value(&block).unwrap();
		assert_eq!(back["tags"][0], "core");
	}
}
