//! Bidirectional prerequisite adjacency with memoized transitive closures.
//!
//! Both adjacency maps always hold the same set of keys: registering a
//! relationship registers both endpoints. Any mutation clears the closure
//! caches before returning, so reads never observe a stale closure.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque, btree_set};

use crate::error::{GraphError, Result};

/// A set of block ids in stable (sorted) order.
pub type IdSet = BTreeSet<String>;

/// Outcome of [`RelationshipIndex::detect_cycles`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CycleReport {
	Acyclic,
	/// Each cycle lists its blocks in edge order; the last links back to the first.
	Cycles(Vec<Vec<String>>),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
	White,
	Gray,
	Black,
}

/// Prerequisite / post-requisite adjacency over opaque block ids.
#[derive(Debug, Default)]
pub struct RelationshipIndex {
	prerequisites: BTreeMap<String, IdSet>,
	postrequisites: BTreeMap<String, IdSet>,
	all_prerequisites: RefCell<HashMap<String, IdSet>>,
	all_postrequisites: RefCell<HashMap<String, IdSet>>,
}

impl RelationshipIndex {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register `id` with empty adjacency if it is not already known.
	pub fn add_block(&mut self, id: &str) {
		if !self.prerequisites.contains_key(id) {
			self.prerequisites.insert(id.to_string(), IdSet::new());
			self.postrequisites.insert(id.to_string(), IdSet::new());
			self.invalidate();
		}
	}

	/// Record that `from` is a prerequisite of `to`.
	pub fn add_relationship(&mut self, from: &str, to: &str) -> Result<()> {
		if from == to {
			return Err(GraphError::SelfLoop { id: from.to_string() });
		}
		self.add_block(from);
		self.add_block(to);
		self.postrequisites
			.entry(from.to_string())
			.or_default()
			.insert(to.to_string());
		self.prerequisites
			.entry(to.to_string())
			.or_default()
			.insert(from.to_string());
		self.invalidate();
		Ok(())
	}

	pub fn remove_relationship(&mut self, from: &str, to: &str) {
		if let Some(set) = self.postrequisites.get_mut(from) {
			set.remove(to);
		}
		if let Some(set) = self.prerequisites.get_mut(to) {
			set.remove(from);
		}
		self.invalidate();
	}

	/// Drop `id` and every relationship touching it.
	pub fn remove_block(&mut self, id: &str) {
		if let Some(prereqs) = self.prerequisites.remove(id) {
			for p in prereqs {
				if let Some(set) = self.postrequisites.get_mut(&p) {
					set.remove(id);
				}
			}
		}
		if let Some(posts) = self.postrequisites.remove(id) {
			for p in posts {
				if let Some(set) = self.prerequisites.get_mut(&p) {
					set.remove(id);
				}
			}
		}
		self.invalidate();
	}

	pub fn contains(&self, id: &str) -> bool {
		self.prerequisites.contains_key(id)
	}

	pub fn len(&self) -> usize {
		self.prerequisites.len()
	}

	pub fn is_empty(&self) -> bool {
		self.prerequisites.is_empty()
	}

	/// Direct prerequisites of `id`. Empty for unknown ids.
	pub fn prerequisites(&self, id: &str) -> IdSet {
		self.prerequisites.get(id).cloned().unwrap_or_default()
	}

	/// Direct post-requisites of `id`. Empty for unknown ids.
	pub fn postrequisites(&self, id: &str) -> IdSet {
		self.postrequisites.get(id).cloned().unwrap_or_default()
	}

	/// Every block `id` transitively depends on.
	pub fn all_prerequisites(&self, id: &str) -> IdSet {
		Self::closure(&self.all_prerequisites, &self.prerequisites, id)
	}

	/// Every block that transitively depends on `id`.
	pub fn all_postrequisites(&self, id: &str) -> IdSet {
		Self::closure(&self.all_postrequisites, &self.postrequisites, id)
	}

	/// Whether `to` is reachable from `from` along post-requisite edges.
	pub fn has_path(&self, from: &str, to: &str) -> bool {
		from == to || self.all_postrequisites(from).contains(to)
	}

	/// Find cycles with a three-color depth-first search over post-requisites.
	pub fn detect_cycles(&self) -> CycleReport {
		let mut color: HashMap<&str, Color> = self
			.postrequisites
			.keys()
			.map(|k| (k.as_str(), Color::White))
			.collect();
		let mut parent: HashMap<&str, &str> = HashMap::new();
		let mut cycles = Vec::new();

		for start in self.postrequisites.keys() {
			if color[start.as_str()] != Color::White {
				continue;
			}
			color.insert(start.as_str(), Color::Gray);
			let mut stack: Vec<(&str, btree_set::Iter<'_, String>)> =
				vec![(start.as_str(), self.postrequisites[start].iter())];

			while let Some((node, children)) = stack.last_mut() {
				let node: &str = *node;
				let Some(child) = children.next() else {
					color.insert(node, Color::Black);
					stack.pop();
					continue;
				};
				match color.get(child.as_str()).copied().unwrap_or(Color::Black) {
					Color::White => {
						parent.insert(child.as_str(), node);
						color.insert(child.as_str(), Color::Gray);
						let next = self.postrequisites[child.as_str()].iter();
						stack.push((child.as_str(), next));
					}
					Color::Gray => {
						let mut path = vec![node.to_string()];
						let mut cur = node;
						while cur != child.as_str() {
							match parent.get(cur) {
								Some(&p) => {
									cur = p;
									path.push(cur.to_string());
								}
								None => break,
							}
						}
						path.reverse();
						cycles.push(path);
					}
					Color::Black => {}
				}
			}
		}

		if cycles.is_empty() {
			CycleReport::Acyclic
		} else {
			CycleReport::Cycles(cycles)
		}
	}

	/// Kahn's algorithm over prerequisite in-degrees.
	///
	/// Fails with [`GraphError::CycleDetected`] rather than returning a
	/// partial order.
	pub fn topological_order(&self) -> Result<Vec<String>> {
		let mut in_degree: BTreeMap<&str, usize> = self
			.prerequisites
			.iter()
			.map(|(id, set)| (id.as_str(), set.len()))
			.collect();
		let mut queue: VecDeque<&str> = in_degree
			.iter()
			.filter(|&(_, &d)| d == 0)
			.map(|(&id, _)| id)
			.collect();
		let mut order = Vec::with_capacity(in_degree.len());

		while let Some(id) = queue.pop_front() {
			order.push(id.to_string());
			for next in &self.postrequisites[id] {
				if let Some(d) = in_degree.get_mut(next.as_str()) {
					*d -= 1;
					if *d == 0 {
						queue.push_back(next.as_str());
					}
				}
			}
		}

		if order.len() < self.prerequisites.len() {
			let remaining = in_degree
				.into_iter()
				.filter(|&(_, d)| d > 0)
				.map(|(id, _)| id.to_string())
				.collect();
			return Err(GraphError::CycleDetected { remaining });
		}
		Ok(order)
	}

	fn closure(
		cache: &RefCell<HashMap<String, IdSet>>,
		adjacency: &BTreeMap<String, IdSet>,
		id: &str,
	) -> IdSet {
		if let Some(hit) = cache.borrow().get(id) {
			return hit.clone();
		}

		let mut visited = IdSet::new();
		let mut stack: Vec<&str> = adjacency
			.get(id)
			.map(|s| s.iter().map(String::as_str).collect())
			.unwrap_or_default();
		while let Some(next) = stack.pop() {
			if !visited.insert(next.to_string()) {
				continue;
			}
			if let Some(more) = adjacency.get(next) {
				stack.extend(more.iter().map(String::as_str));
			}
		}

		cache.borrow_mut().insert(id.to_string(), visited.clone());
		visited
	}

	fn invalidate(&mut self) {
		self.all_prerequisites.get_mut().clear();
		self.all_postrequisites.get_mut().clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn chain(edges: &[(&str, &str)]) -> RelationshipIndex {
		let mut index = RelationshipIndex::new();
		for (from, to) in edges {
			index.add_relationship(from, to).unwrap();
		}
		index
	}

	fn ids(items: &[&str]) -> IdSet {
		items.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn self_loop_is_rejected_without_mutation() {
		let mut index = chain(&[("x", "y")]);
		let err = index.add_relationship("x", "x").unwrap_err();
		assert!(matches!(err, GraphError::SelfLoop { ref id } if id == "x"));
		assert_eq!(index.prerequisites("x"), IdSet::new());
		assert_eq!(index.postrequisites("x"), ids(&["y"]));

		let mut fresh = RelationshipIndex::new();
		assert!(fresh.add_relationship("z", "z").is_err());
		assert!(!fresh.contains("z"));
	}

	#[test]
	fn unknown_ids_yield_empty_sets() {
		let index = RelationshipIndex::new();
		assert!(index.prerequisites("nope").is_empty());
		assert!(index.all_postrequisites("nope").is_empty());
	}

	#[test]
	fn closures_follow_the_whole_chain() {
		let index = chain(&[("a", "b"), ("b", "c"), ("c", "d")]);
		assert_eq!(index.all_postrequisites("a"), ids(&["b", "c", "d"]));
		assert_eq!(index.all_prerequisites("d"), ids(&["a", "b", "c"]));
		assert!(index.has_path("a", "d"));
		assert!(!index.has_path("d", "a"));
		assert!(index.has_path("d", "d"));
	}

	#[test]
	fn mutation_invalidates_cached_closures() {
		let mut index = chain(&[("a", "b"), ("b", "c")]);
		assert_eq!(index.all_postrequisites("a"), ids(&["b", "c"]));

		index.remove_relationship("b", "c");
		assert_eq!(index.all_postrequisites("a"), ids(&["b"]));

		index.add_relationship("b", "d").unwrap();
		assert_eq!(index.all_postrequisites("a"), ids(&["b", "d"]));

		index.remove_block("b");
		assert!(index.all_postrequisites("a").is_empty());
		assert!(index.prerequisites("d").is_empty());
		assert!(!index.contains("b"));
	}

	#[test]
	fn closure_terminates_on_cycles() {
		let index = chain(&[("a", "b"), ("b", "c"), ("c", "a")]);
		assert_eq!(index.all_postrequisites("a"), ids(&["a", "b", "c"]));
	}

	#[test]
	fn detects_and_reconstructs_a_cycle() {
		let index = chain(&[("a", "b"), ("b", "c"), ("c", "a"), ("c", "d")]);
		match index.detect_cycles() {
			CycleReport::Cycles(cycles) => {
				assert_eq!(cycles, vec![vec!["a".to_string(), "b".into(), "c".into()]]);
			}
			CycleReport::Acyclic => panic!("cycle not reported"),
		}
	}

	#[test]
	fn reports_acyclic_graphs_explicitly() {
		let index = chain(&[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")]);
		assert_eq!(index.detect_cycles(), CycleReport::Acyclic);
	}

	#[test]
	fn topological_order_respects_prerequisites() {
		let index = chain(&[("c", "d"), ("a", "b"), ("b", "d")]);
		let order = index.topological_order().unwrap();
		let pos = |id: &str| order.iter().position(|x| x == id).unwrap();
		assert_eq!(order.len(), 4);
		assert!(pos("a") < pos("b"));
		assert!(pos("b") < pos("d"));
		assert!(pos("c") < pos("d"));
	}

	#[test]
	fn topological_order_fails_on_cycles() {
		let index = chain(&[("root", "a"), ("a", "b"), ("b", "a")]);
		match index.topological_order() {
			Err(GraphError::CycleDetected { remaining }) => {
				assert_eq!(remaining, vec!["a".to_string(), "b".to_string()]);
			}
			other => panic!("expected cycle error, got {other:?}"),
		}
	}
}
