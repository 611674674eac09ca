//! Transitive reduction of prerequisite edges for display.
//!
//! An edge `A -> C` is transitive when `C` is still reachable from `A` after
//! removing that edge. Transitive edges are hidden from rendering only; the
//! underlying block data is untouched. Parent edges are never reduced.

use std::collections::{HashMap, HashSet, VecDeque};

use super::types::{Edge, EdgeKind};

/// Prerequisite edges of `edges` that are implied by a longer path, as
/// `(from, to)` pairs.
pub fn find_transitive_edges(edges: &[Edge]) -> HashSet<(String, String)> {
	let mut successors: HashMap<&str, Vec<&str>> = HashMap::new();
	let mut direct: Vec<(&str, &str)> = Vec::new();
	let mut seen = HashSet::new();

	for edge in edges.iter().filter(|e| e.kind == EdgeKind::Prerequisite) {
		if seen.insert((edge.from.as_str(), edge.to.as_str())) {
			successors
				.entry(edge.from.as_str())
				.or_default()
				.push(edge.to.as_str());
			direct.push((edge.from.as_str(), edge.to.as_str()));
		}
	}

	direct
		.into_iter()
		.filter(|&(from, to)| reachable_without_direct(&successors, from, to))
		.map(|(from, to)| (from.to_string(), to.to_string()))
		.collect()
}

/// Edges to render: every parent edge plus the non-transitive prerequisite edges.
pub fn reduce_edges(edges: &[Edge]) -> Vec<Edge> {
	let transitive = find_transitive_edges(edges);
	edges
		.iter()
		.filter(|e| {
			e.kind == EdgeKind::Parent || !transitive.contains(&(e.from.clone(), e.to.clone()))
		})
		.cloned()
		.collect()
}

/// Breadth-first search from `from` to `to` that never takes the direct edge.
fn reachable_without_direct(successors: &HashMap<&str, Vec<&str>>, from: &str, to: &str) -> bool {
	let mut visited: HashSet<&str> = HashSet::from([from]);
	let mut queue: VecDeque<&str> = successors
		.get(from)
		.into_iter()
		.flatten()
		.copied()
		.filter(|&next| next != to)
		.collect();

	while let Some(node) = queue.pop_front() {
		if node == to {
			return true;
		}
		if !visited.insert(node) {
			continue;
		}
		if let Some(next) = successors.get(node) {
			queue.extend(next.iter().copied().filter(|n| !visited.contains(n)));
		}
	}
	false
}

#[cfg(test)]
mod tests {
	use super::*;

	fn prereqs(pairs: &[(&str, &str)]) -> Vec<Edge> {
		pairs.iter().map(|(a, b)| Edge::prerequisite(*a, *b)).collect()
	}

	fn pairs(edges: &[Edge]) -> Vec<(&str, &str)> {
		edges.iter().map(|e| (e.from.as_str(), e.to.as_str())).collect()
	}

	#[test]
	fn removes_a_single_shortcut() {
		let edges = prereqs(&[("a", "b"), ("b", "c"), ("a", "c")]);
		assert_eq!(pairs(&reduce_edges(&edges)), vec![("a", "b"), ("b", "c")]);
	}

	#[test]
	fn keeps_only_the_chain_of_a_fully_connected_path() {
		let edges = prereqs(&[
			("a", "b"),
			("b", "c"),
			("c", "d"),
			("a", "c"),
			("b", "d"),
			("a", "d"),
		]);
		let transitive = find_transitive_edges(&edges);
		assert_eq!(transitive.len(), 3);
		assert_eq!(
			pairs(&reduce_edges(&edges)),
			vec![("a", "b"), ("b", "c"), ("c", "d")]
		);
	}

	#[test]
	fn diamond_drops_only_the_long_shortcut() {
		let edges = prereqs(&[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d"), ("a", "d")]);
		let transitive = find_transitive_edges(&edges);
		assert_eq!(transitive, HashSet::from([("a".to_string(), "d".to_string())]));
		assert_eq!(reduce_edges(&edges).len(), 4);
	}

	#[test]
	fn parent_edges_survive_reduction() {
		let mut edges = prereqs(&[("a", "b"), ("b", "c"), ("a", "c")]);
		edges.push(Edge::parent("a", "c"));
		let reduced = reduce_edges(&edges);
		assert!(reduced.contains(&Edge::parent("a", "c")));
		assert!(!reduced.contains(&Edge::prerequisite("a", "c")));
	}

	#[test]
	fn independent_edges_are_untouched() {
		let edges = prereqs(&[("a", "b"), ("c", "d")]);
		assert!(find_transitive_edges(&edges).is_empty());
	}

	#[test]
	fn cycles_do_not_hang_the_search() {
		let edges = prereqs(&[("a", "b"), ("b", "a"), ("b", "c")]);
		let transitive = find_transitive_edges(&edges);
		assert!(!transitive.contains(&("b".to_string(), "c".to_string())));
	}
}
