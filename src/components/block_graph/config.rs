//! User-facing configuration for the block graph component.

use serde::Deserialize;

use crate::error::{GraphError, Result};
use crate::graph::{Language, LayoutConfig, Orientation};

/// Stroke pattern for an edge kind. Cosmetic only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
	#[default]
	Solid,
	Dashed,
	Dotted,
}

impl LineStyle {
	/// Canvas dash pattern as (dash, gap); empty for solid lines.
	pub fn dash_pattern(self) -> Option<(f64, f64)> {
		match self {
			LineStyle::Solid => None,
			LineStyle::Dashed => Some((8.0, 5.0)),
			LineStyle::Dotted => Some((2.0, 4.0)),
		}
	}
}

/// Options recognised by [`BlockGraphCanvas`](super::BlockGraphCanvas).
///
/// Deserialized from camelCase JSON; every field has a default.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphConfig {
	pub orientation: Orientation,
	pub node_width: f64,
	pub node_height: f64,
	pub horizontal_spacing: f64,
	pub vertical_spacing: f64,
	/// Unset means levels never wrap.
	pub max_nodes_per_level: Option<usize>,
	pub show_prerequisites: bool,
	pub show_parent_edges: bool,
	/// Title language. Does not affect layout.
	pub language: Language,
	pub prerequisite_line_style: LineStyle,
	pub parent_line_style: LineStyle,
}

impl Default for GraphConfig {
	fn default() -> Self {
		let layout = LayoutConfig::default();
		Self {
			orientation: layout.orientation,
			node_width: layout.node_width,
			node_height: layout.node_height,
			horizontal_spacing: layout.horizontal_spacing,
			vertical_spacing: layout.vertical_spacing,
			max_nodes_per_level: layout.max_nodes_per_level,
			show_prerequisites: true,
			show_parent_edges: true,
			language: Language::En,
			prerequisite_line_style: LineStyle::Dashed,
			parent_line_style: LineStyle::Solid,
		}
	}
}

impl GraphConfig {
	pub fn from_json(json: &str) -> Result<Self> {
		let config: Self = serde_json::from_str(json)?;
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> Result<()> {
		for (name, value) in [("nodeWidth", self.node_width), ("nodeHeight", self.node_height)] {
			if !(value.is_finite() && value > 0.0) {
				return Err(GraphError::InvalidConfig(format!("{name} must be positive, got {value}")));
			}
		}
		for (name, value) in [
			("horizontalSpacing", self.horizontal_spacing),
			("verticalSpacing", self.vertical_spacing),
		] {
			if !(value.is_finite() && value >= 0.0) {
				return Err(GraphError::InvalidConfig(format!(
					"{name} must be non-negative, got {value}"
				)));
			}
		}
		if self.max_nodes_per_level == Some(0) {
			return Err(GraphError::InvalidConfig("maxNodesPerLevel must be at least 1".into()));
		}
		Ok(())
	}

	pub fn layout(&self) -> LayoutConfig {
		LayoutConfig {
			orientation: self.orientation,
			node_width: self.node_width,
			node_height: self.node_height,
			horizontal_spacing: self.horizontal_spacing,
			vertical_spacing: self.vertical_spacing,
			max_nodes_per_level: self.max_nodes_per_level,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_json_keeps_defaults() {
		let config =
			GraphConfig::from_json(r#"{ "orientation": "rtl", "maxNodesPerLevel": 4, "language": "he" }"#)
				.unwrap();
		assert_eq!(config.orientation, Orientation::Rtl);
		assert_eq!(config.max_nodes_per_level, Some(4));
		assert_eq!(config.language, Language::He);
		assert_eq!(config.node_width, GraphConfig::default().node_width);
		assert_eq!(config.prerequisite_line_style, LineStyle::Dashed);
	}

	#[test]
	fn rejects_degenerate_geometry() {
		assert!(GraphConfig::from_json(r#"{ "nodeWidth": 0 }"#).is_err());
		assert!(GraphConfig::from_json(r#"{ "verticalSpacing": -1 }"#).is_err());
		assert!(GraphConfig::from_json(r#"{ "maxNodesPerLevel": 0 }"#).is_err());
		assert!(GraphConfig::from_json(r#"{ "horizontalSpacing": 0 }"#).is_ok());
	}
}
