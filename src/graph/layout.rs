//! Orientation-aware banded layout with optional grid wrapping.
//!
//! Blocks are banded by their depth in the parent hierarchy. Each
//! orientation resolves to a level axis (the direction the hierarchy grows)
//! and a sibling axis (the direction blocks of one level spread along), plus
//! a polarity. A single placement routine works purely in those terms:
//!
//! | orientation | level axis   | sibling axis |
//! |-------------|--------------|--------------|
//! | `ttb`       | y, growing   | x            |
//! | `btt`       | y, shrinking | x            |
//! | `ltr`       | x, growing   | y            |
//! | `rtl`       | x, shrinking | y            |
//!
//! When a level holds more blocks than `max_nodes_per_level`, it wraps into
//! extra lines inside its own band. Wrapped lines follow the level polarity,
//! so for `rtl` the first group of blocks stays on the right.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::builder::BlockGraph;
use super::types::{Block, Edge};

/// Padding added around the positioned blocks by [`compute_view_box`].
pub const VIEW_BOX_PADDING: f64 = 40.0;

/// Bounds used by [`compute_view_box`] when nothing is positioned.
pub const DEFAULT_VIEW_BOX: Rect = Rect {
	x: 0.0,
	y: 0.0,
	width: 800.0,
	height: 600.0,
};

/// Direction the parent hierarchy flows on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
	/// Top to bottom.
	#[default]
	Ttb,
	/// Bottom to top.
	Btt,
	/// Left to right.
	Ltr,
	/// Right to left.
	Rtl,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
	X,
	Y,
}

/// The two axis roles an orientation resolves to.
#[derive(Clone, Copy, Debug)]
struct AxisRoles {
	level: Axis,
	reversed: bool,
}

impl Orientation {
	fn roles(self) -> AxisRoles {
		match self {
			Orientation::Ttb => AxisRoles {
				level: Axis::Y,
				reversed: false,
			},
			Orientation::Btt => AxisRoles {
				level: Axis::Y,
				reversed: true,
			},
			Orientation::Ltr => AxisRoles {
				level: Axis::X,
				reversed: false,
			},
			Orientation::Rtl => AxisRoles {
				level: Axis::X,
				reversed: true,
			},
		}
	}
}

/// Geometry parameters for [`layout`].
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
	pub orientation: Orientation,
	pub node_width: f64,
	pub node_height: f64,
	pub horizontal_spacing: f64,
	pub vertical_spacing: f64,
	/// Wrap a level into a grid once it holds more blocks than this.
	pub max_nodes_per_level: Option<usize>,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			orientation: Orientation::Ttb,
			node_width: 180.0,
			node_height: 64.0,
			horizontal_spacing: 40.0,
			vertical_spacing: 80.0,
			max_nodes_per_level: None,
		}
	}
}

/// Sizes and gaps re-expressed along the level and sibling axes.
struct AxisMetrics {
	roles: AxisRoles,
	level_size: f64,
	level_gap: f64,
	sibling_size: f64,
	sibling_gap: f64,
}

impl AxisMetrics {
	fn new(config: &LayoutConfig) -> Self {
		let roles = config.orientation.roles();
		match roles.level {
			Axis::Y => Self {
				roles,
				level_size: config.node_height,
				level_gap: config.vertical_spacing,
				sibling_size: config.node_width,
				sibling_gap: config.horizontal_spacing,
			},
			Axis::X => Self {
				roles,
				level_size: config.node_width,
				level_gap: config.horizontal_spacing,
				sibling_size: config.node_height,
				sibling_gap: config.vertical_spacing,
			},
		}
	}

	/// Distance between wrapped lines inside one level band.
	fn line_stride(&self) -> f64 {
		self.level_size + self.level_gap / 2.0
	}

	/// Map a (level, sibling) pair back to screen x/y.
	fn to_screen(&self, level: f64, sibling: f64) -> (f64, f64) {
		let level = if self.roles.reversed { -level } else { level };
		match self.roles.level {
			Axis::Y => (sibling, level),
			Axis::X => (level, sibling),
		}
	}
}

/// Axis-aligned rectangle in layout space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl Rect {
	pub fn center(&self) -> Point {
		Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
	}

	pub fn right(&self) -> f64 {
		self.x + self.width
	}

	pub fn bottom(&self) -> f64 {
		self.y + self.height
	}

	pub fn contains(&self, p: Point) -> bool {
		p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
	}
}

/// A point in layout space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// A block with its assigned rectangle.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionedBlock {
	pub block: Block,
	pub position: Rect,
	/// Depth in the parent hierarchy among the laid-out blocks.
	pub level: usize,
}

/// An edge resolved to anchor points on both endpoints.
#[derive(Clone, Debug, PartialEq)]
pub struct RoutedEdge {
	pub edge: Edge,
	pub start: Point,
	pub end: Point,
}

/// Lay out every block of `graph`.
pub fn layout(graph: &BlockGraph, config: &LayoutConfig) -> Vec<PositionedBlock> {
	let ids: Vec<&str> = graph.blocks().iter().map(|b| b.id.as_str()).collect();
	layout_blocks(graph, &ids, config)
}

/// Lay out the subset `ids` of `graph`.
///
/// Levels only consider parents inside the subset, so a block whose parents
/// are hidden starts a new band at level 0. Unknown ids are ignored. Blocks
/// keep input order within their level.
///
/// A level that wraps onto several lines pushes every later level outward by
/// the extra lines. Wrapping therefore does shift the placement of the
/// levels after it, so that bands never overlap.
pub fn layout_blocks(graph: &BlockGraph, ids: &[&str], config: &LayoutConfig) -> Vec<PositionedBlock> {
	let mut members: Vec<&str> = ids.iter().copied().filter(|id| graph.contains(id)).collect();
	members.sort_by_key(|id| graph.order_of(id));
	members.dedup();

	let levels = assign_levels(graph, &members);
	let depth = levels.values().copied().max().map_or(0, |d| d + 1);
	let mut bands: Vec<Vec<&str>> = vec![Vec::new(); depth];
	for &id in &members {
		bands[levels[id]].push(id);
	}

	let metrics = AxisMetrics::new(config);
	let wrap = config.max_nodes_per_level.filter(|&k| k > 0);
	let mut positioned = Vec::with_capacity(members.len());
	let mut level_offset = 0.0;

	for (level, band) in bands.iter().enumerate() {
		let per_line = match wrap {
			Some(k) if band.len() > k => k,
			_ => band.len().max(1),
		};
		let lines = band.len().div_ceil(per_line).max(1);

		for (i, id) in band.iter().enumerate() {
			let (line, column) = (i / per_line, i % per_line);
			let along_level = level_offset + line as f64 * metrics.line_stride();
			let along_sibling = column as f64 * (metrics.sibling_size + metrics.sibling_gap);
			let (x, y) = metrics.to_screen(along_level, along_sibling);

			if let Some(block) = graph.block(id) {
				positioned.push(PositionedBlock {
					block: block.clone(),
					position: Rect {
						x,
						y,
						width: config.node_width,
						height: config.node_height,
					},
					level,
				});
			}
		}

		let band_extent = (lines - 1) as f64 * metrics.line_stride() + metrics.level_size;
		level_offset += band_extent + metrics.level_gap;
	}

	positioned
}

/// Depth of each member in the parent hierarchy restricted to `members`.
///
/// Parent cycles are cut where they close, so every member gets a level.
/// The walk keeps its own frame stack, so chain depth is not bounded by the
/// call stack.
fn assign_levels<'a>(graph: &BlockGraph, members: &[&'a str]) -> HashMap<&'a str, usize> {
	let by_name: HashMap<&str, &'a str> = members.iter().map(|&id| (id, id)).collect();
	let mut levels: HashMap<&'a str, usize> = HashMap::new();
	let mut in_progress: HashSet<&'a str> = HashSet::new();

	for &start in members {
		if levels.contains_key(start) {
			continue;
		}
		in_progress.insert(start);
		let mut frames = vec![LevelFrame::new(start, graph, &by_name)];

		while let Some(frame) = frames.last_mut() {
			if let Some(&parent) = frame.parents.get(frame.next) {
				frame.next += 1;
				if let Some(&known) = levels.get(parent) {
					frame.level = frame.level.max(known + 1);
				} else if in_progress.insert(parent) {
					frames.push(LevelFrame::new(parent, graph, &by_name));
				}
				continue;
			}

			let Some(done) = frames.pop() else {
				break;
			};
			in_progress.remove(done.id);
			levels.insert(done.id, done.level);
			if let Some(child) = frames.last_mut() {
				child.level = child.level.max(done.level + 1);
			}
		}
	}
	levels
}

/// One pending block in [`assign_levels`]: its in-subset parents and how
/// many of them have been visited.
struct LevelFrame<'a> {
	id: &'a str,
	parents: Vec<&'a str>,
	next: usize,
	level: usize,
}

impl<'a> LevelFrame<'a> {
	fn new(id: &'a str, graph: &BlockGraph, by_name: &HashMap<&str, &'a str>) -> Self {
		let parents = graph
			.parents_of(id)
			.into_iter()
			.filter_map(|p| by_name.get(p).copied())
			.collect();
		Self {
			id,
			parents,
			next: 0,
			level: 0,
		}
	}
}

/// Bounding box of `positioned`, padded by [`VIEW_BOX_PADDING`].
pub fn compute_view_box(positioned: &[PositionedBlock]) -> Rect {
	let Some(first) = positioned.first() else {
		return DEFAULT_VIEW_BOX;
	};
	let (mut min_x, mut min_y) = (first.position.x, first.position.y);
	let (mut max_x, mut max_y) = (first.position.right(), first.position.bottom());
	for p in &positioned[1..] {
		min_x = min_x.min(p.position.x);
		min_y = min_y.min(p.position.y);
		max_x = max_x.max(p.position.right());
		max_y = max_y.max(p.position.bottom());
	}
	Rect {
		x: min_x - VIEW_BOX_PADDING,
		y: min_y - VIEW_BOX_PADDING,
		width: max_x - min_x + 2.0 * VIEW_BOX_PADDING,
		height: max_y - min_y + 2.0 * VIEW_BOX_PADDING,
	}
}

/// Anchor points for an edge from `from` to `to`.
pub fn connection_points(from: &Rect, to: &Rect, orientation: Orientation) -> (Point, Point) {
	let (fc, tc) = (from.center(), to.center());
	match orientation {
		Orientation::Ttb => (Point::new(fc.x, from.bottom()), Point::new(tc.x, to.y)),
		Orientation::Btt => (Point::new(fc.x, from.y), Point::new(tc.x, to.bottom())),
		Orientation::Ltr => (Point::new(from.right(), fc.y), Point::new(to.x, tc.y)),
		Orientation::Rtl => (Point::new(from.x, fc.y), Point::new(to.right(), tc.y)),
	}
}

/// Resolve `edges` against `positioned`, skipping edges with an endpoint
/// that has no known position.
pub fn route_edges(
	edges: &[Edge],
	positioned: &[PositionedBlock],
	orientation: Orientation,
) -> Vec<RoutedEdge> {
	let by_id: HashMap<&str, &Rect> = positioned
		.iter()
		.map(|p| (p.block.id.as_str(), &p.position))
		.collect();
	edges
		.iter()
		.filter_map(|edge| {
			let from = by_id.get(edge.from.as_str())?;
			let to = by_id.get(edge.to.as_str())?;
			let (start, end) = connection_points(from, to, orientation);
			Some(RoutedEdge {
				edge: edge.clone(),
				start,
				end,
			})
		})
		.collect()
}
