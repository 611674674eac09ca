//! Drill-down navigation over the parent hierarchy.
//!
//! The only persistent state is the stack of entered blocks. Which blocks
//! are shown, dimmed, or absent is recomputed from the stack on demand by
//! [`categorize_blocks`].

use std::collections::HashSet;

use log::debug;
use serde::Serialize;

use super::builder::BlockGraph;

/// Selection depth reported to listeners: nothing selected.
pub const LEVEL_NONE: u8 = 0;
/// One block selected, its children revealed.
pub const LEVEL_SELECTED: u8 = 1;
/// The selected block has been entered; only its sub-blocks are shown.
pub const LEVEL_SUB_BLOCKS: u8 = 2;

/// Payload emitted on every click. A snapshot, never updated after emission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionEvent {
	pub block_id: Option<String>,
	pub selection_level: u8,
	pub navigation_stack: Vec<String>,
}

/// Blocks shown at full opacity and blocks kept as dimmed context.
///
/// Blocks in neither set are absent from the positioned output.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockCategories {
	pub visible: HashSet<String>,
	pub dimmed: HashSet<String>,
}

impl BlockCategories {
	/// Visible and dimmed ids in graph input order.
	pub fn relevant_ids<'g>(&self, graph: &'g BlockGraph) -> Vec<&'g str> {
		graph
			.blocks()
			.iter()
			.map(|b| b.id.as_str())
			.filter(|id| self.visible.contains(*id) || self.dimmed.contains(*id))
			.collect()
	}

	pub fn is_dimmed(&self, id: &str) -> bool {
		self.dimmed.contains(id)
	}
}

/// The single root that is skipped on the first screen, if any.
///
/// Applies only when the graph has exactly one root and that root has
/// children.
pub fn auto_hidden_root(graph: &BlockGraph) -> Option<&str> {
	match graph.roots().as_slice() {
		[only] if graph.has_children(only) => Some(*only),
		_ => None,
	}
}

/// Split the blocks of `graph` into visible and dimmed sets for a selection.
///
/// * level 0: the roots, or the children of an auto-hidden single root.
/// * level 1: the selection and its children.
/// * level 2 and deeper: the selection's children only.
///
/// At level 1 and deeper the selection's siblings and the other roots are
/// dimmed. An unknown selection falls back to level 0. Use
/// [`categorize_path`] when the whole drill-down path is known.
pub fn categorize_blocks(
	graph: &BlockGraph,
	selected_id: Option<&str>,
	selection_level: u8,
) -> BlockCategories {
	categorize(graph, selected_id, selection_level, selected_id.as_slice())
}

/// Like [`categorize_blocks`], for a full navigation stack.
///
/// Siblings of every block on the path are dimmed, along with the roots
/// that are not on it. Blocks on the path itself are never dimmed.
pub fn categorize_path(graph: &BlockGraph, path: &[String]) -> BlockCategories {
	let path: Vec<&str> = path.iter().map(String::as_str).collect();
	categorize(graph, path.last().copied(), level_for_depth(path.len()), &path)
}

fn categorize(
	graph: &BlockGraph,
	selected_id: Option<&str>,
	selection_level: u8,
	path: &[&str],
) -> BlockCategories {
	let hidden_root = auto_hidden_root(graph);
	let selected = selected_id.filter(|id| graph.contains(id));

	let (Some(selected), true) = (selected, selection_level > LEVEL_NONE) else {
		let visible = match hidden_root {
			Some(root) => owned(graph.children_of(root)),
			None => graph.roots().into_iter().map(str::to_string).collect(),
		};
		return BlockCategories {
			visible,
			dimmed: HashSet::new(),
		};
	};

	let mut visible: HashSet<String> = owned(graph.children_of(selected));
	if selection_level == LEVEL_SELECTED {
		visible.insert(selected.to_string());
	}

	let mut context: Vec<&str> = graph.roots();
	for &entry in path.iter().filter(|id| graph.contains(id)) {
		context.extend(siblings_of(graph, entry));
	}
	let dimmed = context
		.into_iter()
		.filter(|&id| Some(id) != hidden_root && !path.contains(&id) && !visible.contains(id))
		.map(str::to_string)
		.collect();

	BlockCategories { visible, dimmed }
}

/// Blocks sharing a parent with `id`, or the other roots when `id` is a root.
fn siblings_of<'g>(graph: &'g BlockGraph, id: &str) -> Vec<&'g str> {
	let parents = graph.parents_of(id);
	let pool: Vec<&'g str> = if parents.is_empty() {
		graph.roots()
	} else {
		parents
			.iter()
			.flat_map(|p| graph.children_of(p))
			.map(String::as_str)
			.collect()
	};
	pool.into_iter().filter(|&sib| sib != id).collect()
}

fn level_for_depth(depth: usize) -> u8 {
	match depth {
		0 => LEVEL_NONE,
		1 => LEVEL_SELECTED,
		_ => LEVEL_SUB_BLOCKS,
	}
}

fn owned(ids: &[String]) -> HashSet<String> {
	ids.iter().cloned().collect()
}

/// Stack of entered blocks, from the outermost drill-down to the current one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavigationState {
	stack: Vec<String>,
}

impl NavigationState {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn stack(&self) -> &[String] {
		&self.stack
	}

	/// Currently focused block (top of the stack).
	pub fn selected(&self) -> Option<&str> {
		self.stack.last().map(String::as_str)
	}

	pub fn selection_level(&self) -> u8 {
		level_for_depth(self.stack.len())
	}

	pub fn categorize(&self, graph: &BlockGraph) -> BlockCategories {
		categorize_path(graph, &self.stack)
	}

	/// Handle a click on `id` and return the notification to emit.
	///
	/// Clicking the top of the stack drills up one level. Clicking any other
	/// block with children drills into it. A block already deeper in the
	/// stack becomes the top again instead of being pushed twice. Leaves
	/// never change the stack.
	pub fn click(&mut self, graph: &BlockGraph, id: &str) -> SelectionEvent {
		if self.selected() == Some(id) {
			self.stack.pop();
			debug!("block-graph: drilled up from `{id}`, depth {}", self.stack.len());
			return self.event();
		}

		if let Some(pos) = self.stack.iter().position(|s| s == id) {
			self.stack.truncate(pos + 1);
			debug!("block-graph: returned to `{id}`, depth {}", self.stack.len());
			return self.event();
		}

		if !graph.has_children(id) {
			return SelectionEvent {
				block_id: Some(id.to_string()),
				selection_level: self.selection_level(),
				navigation_stack: self.stack.clone(),
			};
		}

		self.stack.push(id.to_string());
		debug!("block-graph: drilled into `{id}`, depth {}", self.stack.len());
		self.event()
	}

	/// Drill up one level, if anything is selected.
	pub fn back(&mut self) -> SelectionEvent {
		self.stack.pop();
		self.event()
	}

	/// Forget the drill-down path, for a freshly loaded block set.
	pub fn reset(&mut self) {
		self.stack.clear();
	}

	fn event(&self) -> SelectionEvent {
		SelectionEvent {
			block_id: self.selected().map(str::to_string),
			selection_level: self.selection_level(),
			navigation_stack: self.stack.clone(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::builder::build_graph;
	use crate::graph::types::{BilingualText, Block};

	fn block(id: &str) -> Block {
		Block::new(id, BilingualText::new(id, id))
	}

	fn set(ids: &[&str]) -> HashSet<String> {
		ids.iter().map(|s| s.to_string()).collect()
	}

	/// course -> {math, physics}; math -> {algebra, calculus}; calculus -> {limits}
	fn curriculum() -> BlockGraph {
		build_graph(&[
			block("course"),
			block("math").with_parents(["course"]),
			block("physics").with_parents(["course"]).with_prerequisites(["math"]),
			block("algebra").with_parents(["math"]),
			block("calculus").with_parents(["math"]).with_prerequisites(["algebra"]),
			block("limits").with_parents(["calculus"]),
		])
	}

	#[test]
	fn many_roots_are_all_visible() {
		let graph = build_graph(&[block("a"), block("b"), block("c")]);
		let cats = categorize_blocks(&graph, None, LEVEL_NONE);
		assert_eq!(cats.visible, set(&["a", "b", "c"]));
		assert!(cats.dimmed.is_empty());
	}

	#[test]
	fn single_root_with_children_is_hidden() {
		let cats = categorize_blocks(&curriculum(), None, LEVEL_NONE);
		assert_eq!(cats.visible, set(&["math", "physics"]));
	}

	#[test]
	fn childless_single_root_stays_visible() {
		let graph = build_graph(&[block("solo")]);
		assert_eq!(categorize_blocks(&graph, None, LEVEL_NONE).visible, set(&["solo"]));
	}

	#[test]
	fn first_level_shows_selection_and_children() {
		let cats = categorize_blocks(&curriculum(), Some("math"), LEVEL_SELECTED);
		assert_eq!(cats.visible, set(&["math", "algebra", "calculus"]));
		// The auto-hidden root stays hidden; the sibling is kept as context.
		assert_eq!(cats.dimmed, set(&["physics"]));
	}

	#[test]
	fn deeper_levels_hide_the_entered_block() {
		let cats = categorize_blocks(&curriculum(), Some("calculus"), LEVEL_SUB_BLOCKS);
		assert_eq!(cats.visible, set(&["limits"]));
		assert!(!cats.visible.contains("calculus"));
		assert_eq!(cats.dimmed, set(&["algebra"]));
	}

	#[test]
	fn unrelated_blocks_are_absent() {
		let graph = curriculum();
		let cats = categorize_blocks(&graph, Some("math"), LEVEL_SELECTED);
		assert_eq!(cats.relevant_ids(&graph), vec!["math", "physics", "algebra", "calculus"]);
		assert!(!cats.visible.contains("limits") && !cats.dimmed.contains("limits"));
	}

	#[test]
	fn click_pushes_then_pops() {
		let graph = curriculum();
		let mut nav = NavigationState::new();

		let ev = nav.click(&graph, "math");
		assert_eq!(ev.block_id.as_deref(), Some("math"));
		assert_eq!(ev.selection_level, LEVEL_SELECTED);

		let ev = nav.click(&graph, "calculus");
		assert_eq!(ev.selection_level, LEVEL_SUB_BLOCKS);
		assert_eq!(ev.navigation_stack, vec!["math", "calculus"]);

		let ev = nav.click(&graph, "calculus");
		assert_eq!(ev.navigation_stack, vec!["math"]);
		assert_eq!(ev.block_id.as_deref(), Some("math"));

		let ev = nav.click(&graph, "math");
		assert_eq!(ev.block_id, None);
		assert_eq!(ev.selection_level, LEVEL_NONE);
		assert!(nav.stack().is_empty());
	}

	#[test]
	fn leaf_clicks_notify_without_moving() {
		let graph = curriculum();
		let mut nav = NavigationState::new();
		nav.click(&graph, "math");

		let ev = nav.click(&graph, "algebra");
		assert_eq!(ev.block_id.as_deref(), Some("algebra"));
		assert_eq!(ev.navigation_stack, vec!["math"]);
		assert_eq!(nav.stack(), &["math".to_string()]);
		assert_eq!(nav.categorize(&graph), categorize_blocks(&graph, Some("math"), 1));
	}

	#[test]
	fn clicking_a_dimmed_sibling_pushes_it() {
		let graph = build_graph(&[
			block("a"),
			block("b"),
			block("a1").with_parents(["a"]),
			block("b1").with_parents(["b"]),
		]);
		let mut nav = NavigationState::new();
		nav.click(&graph, "a");
		assert!(nav.categorize(&graph).is_dimmed("b"));

		let ev = nav.click(&graph, "b");
		assert_eq!(ev.navigation_stack, vec!["a", "b"]);
		assert_eq!(ev.selection_level, LEVEL_SUB_BLOCKS);
		assert_eq!(nav.categorize(&graph).visible, set(&["b1"]));
	}

	#[test]
	fn deeper_stack_entry_becomes_the_top_again() {
		let graph = curriculum();
		let mut nav = NavigationState::new();
		nav.click(&graph, "math");
		nav.click(&graph, "calculus");

		let ev = nav.click(&graph, "math");
		assert_eq!(ev.navigation_stack, vec!["math"]);
		assert_eq!(ev.block_id.as_deref(), Some("math"));
	}

	#[test]
	fn path_ancestors_keep_their_siblings_and_roots_dimmed() {
		let graph = build_graph(&[
			block("a"),
			block("b"),
			block("a1").with_parents(["a"]),
			block("a2").with_parents(["a"]),
			block("x").with_parents(["a1"]),
		]);
		let mut nav = NavigationState::new();
		nav.click(&graph, "a");
		nav.click(&graph, "a1");

		let cats = nav.categorize(&graph);
		assert_eq!(cats.visible, set(&["x"]));
		assert_eq!(cats.dimmed, set(&["a2", "b"]));
		assert_eq!(cats.relevant_ids(&graph), vec!["b", "a2", "x"]);
	}

	#[test]
	fn path_dimming_skips_the_hidden_root_and_the_path() {
		let graph = curriculum();
		let path = vec!["math".to_string(), "calculus".to_string()];
		let cats = categorize_path(&graph, &path);
		assert_eq!(cats.visible, set(&["limits"]));
		assert_eq!(cats.dimmed, set(&["physics", "algebra"]));
	}

	#[test]
	fn event_stack_is_a_snapshot() {
		let graph = curriculum();
		let mut nav = NavigationState::new();
		let ev = nav.click(&graph, "math");
		nav.click(&graph, "calculus");
		assert_eq!(ev.navigation_stack, vec!["math"]);
	}

	#[test]
	fn back_and_reset_unwind_the_stack() {
		let graph = curriculum();
		let mut nav = NavigationState::new();
		nav.click(&graph, "math");
		nav.click(&graph, "calculus");
		assert_eq!(nav.back().navigation_stack, vec!["math"]);
		nav.reset();
		assert_eq!(nav.selected(), None);
		assert_eq!(nav.back().selection_level, LEVEL_NONE);
	}
}
