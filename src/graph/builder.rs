//! Converts a flat block list into an immutable graph model.

use std::collections::{HashMap, HashSet};

use log::warn;

use super::relationships::RelationshipIndex;
use super::types::{Block, Edge, EdgeKind};

/// Blocks keyed by id plus every edge derived from their relationship lists.
///
/// Built once per input batch. Input order is preserved and drives the
/// ordering of roots, children, and siblings during layout.
#[derive(Clone, Debug, Default)]
pub struct BlockGraph {
	blocks: Vec<Block>,
	index: HashMap<String, usize>,
	edges: Vec<Edge>,
	children: HashMap<String, Vec<String>>,
}

/// Build a [`BlockGraph`] from `blocks`.
///
/// References to ids outside the input set are kept as dangling edges.
/// Repeated ids inside one relationship list collapse to a single edge, and
/// self references are skipped.
pub fn build_graph(blocks: &[Block]) -> BlockGraph {
	let mut graph = BlockGraph::default();

	for block in blocks {
		if graph.index.contains_key(&block.id) {
			warn!("block-graph: duplicate block id `{}` ignored", block.id);
			continue;
		}
		graph.index.insert(block.id.clone(), graph.blocks.len());
		graph.blocks.push(block.clone());
	}

	for block in &graph.blocks {
		push_edges(&mut graph.edges, block, &block.prerequisites, EdgeKind::Prerequisite);
		push_edges(&mut graph.edges, block, &block.parents, EdgeKind::Parent);
	}

	for edge in &graph.edges {
		if edge.kind == EdgeKind::Parent {
			graph
				.children
				.entry(edge.from.clone())
				.or_default()
				.push(edge.to.clone());
		}
	}

	graph
}

fn push_edges(edges: &mut Vec<Edge>, block: &Block, sources: &[String], kind: EdgeKind) {
	let mut seen = HashSet::new();
	for source in sources {
		if source == &block.id {
			warn!("block-graph: block `{}` references itself, skipped", block.id);
			continue;
		}
		if seen.insert(source.as_str()) {
			edges.push(Edge::new(source.clone(), block.id.clone(), kind));
		}
	}
}

impl BlockGraph {
	pub fn blocks(&self) -> &[Block] {
		&self.blocks
	}

	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	pub fn len(&self) -> usize {
		self.blocks.len()
	}

	pub fn is_empty(&self) -> bool {
		self.blocks.is_empty()
	}

	pub fn contains(&self, id: &str) -> bool {
		self.index.contains_key(id)
	}

	pub fn block(&self, id: &str) -> Option<&Block> {
		self.index.get(id).map(|&i| &self.blocks[i])
	}

	/// Position of `id` in the input order.
	pub fn order_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	/// Known children of `id`, in input order.
	pub fn children_of(&self, id: &str) -> &[String] {
		self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn has_children(&self, id: &str) -> bool {
		!self.children_of(id).is_empty()
	}

	/// Parents of `id` that resolve to known blocks.
	pub fn parents_of(&self, id: &str) -> Vec<&str> {
		self.block(id)
			.map(|b| {
				b.parents
					.iter()
					.filter(|p| *p != id && self.contains(p))
					.map(String::as_str)
					.collect()
			})
			.unwrap_or_default()
	}

	/// Blocks without any resolvable parent, in input order.
	pub fn roots(&self) -> Vec<&str> {
		self.blocks
			.iter()
			.filter(|b| self.parents_of(&b.id).is_empty())
			.map(|b| b.id.as_str())
			.collect()
	}

	pub fn prerequisite_edges(&self) -> impl Iterator<Item = &Edge> {
		self.edges.iter().filter(|e| e.kind == EdgeKind::Prerequisite)
	}

	/// Relationship index over this graph's prerequisite edges.
	pub fn relationship_index(&self) -> RelationshipIndex {
		let mut index = RelationshipIndex::new();
		for block in &self.blocks {
			index.add_block(&block.id);
		}
		for edge in self.prerequisite_edges() {
			// Self references never reach the edge list.
			let _ = index.add_relationship(&edge.from, &edge.to);
		}
		index
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::types::BilingualText;

	fn block(id: &str) -> Block {
		Block::new(id, BilingualText::new(id, id))
	}

	#[test]
	fn empty_input_builds_empty_graph() {
		let graph = build_graph(&[]);
		assert!(graph.is_empty());
		assert!(graph.edges().is_empty());
		assert!(graph.roots().is_empty());
	}

	#[test]
	fn emits_typed_edges_towards_the_declaring_block() {
		let blocks = vec![
			block("course"),
			block("intro").with_parents(["course"]),
			block("advanced")
				.with_parents(["course"])
				.with_prerequisites(["intro", "intro"]),
		];
		let graph = build_graph(&blocks);

		assert_eq!(
			graph.edges(),
			&[
				Edge::parent("course", "intro"),
				Edge::prerequisite("intro", "advanced"),
				Edge::parent("course", "advanced"),
			]
		);
		assert_eq!(graph.children_of("course"), &["intro", "advanced"]);
		assert_eq!(graph.roots(), vec!["course"]);
	}

	#[test]
	fn dangling_references_are_kept_as_edges() {
		let blocks = vec![block("a").with_prerequisites(["ghost"]).with_parents(["nowhere"])];
		let graph = build_graph(&blocks);

		assert_eq!(graph.edges().len(), 2);
		assert!(!graph.contains("ghost"));
		// Unresolved parents do not demote a block from root.
		assert_eq!(graph.roots(), vec!["a"]);
		assert!(graph.parents_of("a").is_empty());
	}

	#[test]
	fn self_references_are_skipped() {
		let blocks = vec![block("a").with_prerequisites(["a"]).with_parents(["a"])];
		let graph = build_graph(&blocks);
		assert!(graph.edges().is_empty());
	}

	#[test]
	fn rebuilding_is_idempotent() {
		let blocks = vec![
			block("a"),
			block("b").with_prerequisites(["a"]),
			block("c").with_prerequisites(["a", "b"]).with_parents(["a"]),
		];
		let first = build_graph(&blocks);
		let second = build_graph(first.blocks());
		assert_eq!(first.edges(), second.edges());
	}
}
