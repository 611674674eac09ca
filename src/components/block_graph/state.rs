//! Component state: the graph, the navigation stack, the viewport, and the
//! scene derived from them.
//!
//! The scene is rebuilt from scratch by [`BlockGraphState::relayout`]
//! whenever the blocks, the configuration, or the navigation stack change.
//! World coordinates are layout coordinates; the view box origin is mapped
//! to the viewport origin before the viewport transform applies.

use log::{debug, info};
use serde::Serialize;

use crate::graph::{
	Block, BlockCategories, BlockGraph, EdgeKind, NavigationState, Point, PositionedBlock, Rect,
	RoutedEdge, SelectionEvent, build_graph, compute_view_box, layout_blocks, reduce_edges, route_edges,
};

use super::config::GraphConfig;
use super::gesture::GestureHandler;
use super::viewport::Viewport;

/// Payload emitted once a freshly loaded block set has been drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderComplete {
	pub block_count: usize,
}

/// Everything the renderer draws for one navigation state.
#[derive(Clone, Debug, Default)]
pub struct Scene {
	pub positioned: Vec<PositionedBlock>,
	pub edges: Vec<RoutedEdge>,
	pub categories: BlockCategories,
	pub view_box: Rect,
}

impl Scene {
	pub fn block_at(&self, world: Point) -> Option<&PositionedBlock> {
		// Later blocks draw on top, so search back to front.
		self.positioned.iter().rev().find(|p| p.position.contains(world))
	}
}

/// Mutable state owned by one mounted component.
pub struct BlockGraphState {
	pub graph: BlockGraph,
	pub config: GraphConfig,
	pub navigation: NavigationState,
	pub viewport: Viewport,
	pub gestures: GestureHandler,
	pub hovered: Option<String>,
	pub width: f64,
	pub height: f64,
	scene: Scene,
	render_pending: bool,
}

impl BlockGraphState {
	pub fn new(blocks: &[Block], config: GraphConfig, width: f64, height: f64) -> Self {
		let mut state = Self {
			graph: BlockGraph::default(),
			config,
			navigation: NavigationState::new(),
			viewport: Viewport::new(),
			gestures: GestureHandler::new(),
			hovered: None,
			width,
			height,
			scene: Scene::default(),
			render_pending: false,
		};
		state.set_blocks(blocks);
		state
	}

	pub fn scene(&self) -> &Scene {
		&self.scene
	}

	/// Replace the block set. Navigation starts over and the view is refit.
	pub fn set_blocks(&mut self, blocks: &[Block]) {
		self.graph = build_graph(blocks);
		self.navigation.reset();
		self.hovered = None;
		self.gestures.cancel();
		self.relayout();
		self.fit_view();
		self.render_pending = true;
		info!(
			"block-graph: loaded {} blocks, {} edges",
			self.graph.len(),
			self.graph.edges().len()
		);
	}

	pub fn set_config(&mut self, config: GraphConfig) {
		self.config = config;
		self.relayout();
		self.fit_view();
	}

	/// Recompute visibility, positions and routed edges.
	pub fn relayout(&mut self) {
		let categories = self.navigation.categorize(&self.graph);
		let ids = categories.relevant_ids(&self.graph);
		let layout = self.config.layout();
		let positioned = layout_blocks(&self.graph, &ids, &layout);

		let shown: Vec<_> = self
			.graph
			.edges()
			.iter()
			.filter(|e| match e.kind {
				EdgeKind::Prerequisite => self.config.show_prerequisites,
				EdgeKind::Parent => self.config.show_parent_edges,
			})
			.filter(|e| ids.contains(&e.from.as_str()) && ids.contains(&e.to.as_str()))
			.cloned()
			.collect();
		let edges = route_edges(&reduce_edges(&shown), &positioned, layout.orientation);

		debug!(
			"block-graph: {} visible, {} dimmed, {} edges",
			categories.visible.len(),
			categories.dimmed.len(),
			edges.len()
		);
		self.scene = Scene {
			view_box: compute_view_box(&positioned),
			positioned,
			edges,
			categories,
		};
	}

	/// Zoom out until the view box fits (never past 100%) and center it.
	pub fn fit_view(&mut self) {
		let vb = self.scene.view_box;
		self.viewport.reset();
		if vb.width > 0.0 && vb.height > 0.0 && self.width > 0.0 && self.height > 0.0 {
			self.viewport
				.zoom((self.width / vb.width).min(self.height / vb.height).min(1.0));
		}
		let zoom = self.viewport.zoom_level();
		self.viewport.pan(
			(self.width - vb.width * zoom) / 2.0,
			(self.height - vb.height * zoom) / 2.0,
		);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	pub fn screen_to_world(&self, screen: Point) -> Point {
		let p = self.viewport.screen_to_world(screen);
		Point::new(p.x + self.scene.view_box.x, p.y + self.scene.view_box.y)
	}

	pub fn block_at(&self, screen: Point) -> Option<&PositionedBlock> {
		self.scene.block_at(self.screen_to_world(screen))
	}

	/// Route a click at `screen` to navigation. `None` when nothing was hit.
	pub fn click_at(&mut self, screen: Point) -> Option<SelectionEvent> {
		let id = self.block_at(screen)?.block.id.clone();
		Some(self.click(&id))
	}

	pub fn click(&mut self, id: &str) -> SelectionEvent {
		let event = self.navigation.click(&self.graph, id);
		self.relayout();
		event
	}

	pub fn back(&mut self) -> SelectionEvent {
		let event = self.navigation.back();
		self.relayout();
		event
	}

	pub fn set_hover(&mut self, screen: Option<Point>) {
		self.hovered = screen.and_then(|p| self.block_at(p)).map(|p| p.block.id.clone());
	}

	/// Take the pending render notification for the current batch, if any.
	pub fn take_render_complete(&mut self) -> Option<RenderComplete> {
		if !std::mem::take(&mut self.render_pending) {
			return None;
		}
		Some(RenderComplete {
			block_count: self.graph.len(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::BilingualText;

	fn block(id: &str) -> Block {
		Block::new(id, BilingualText::new(id, id))
	}

	fn blocks() -> Vec<Block> {
		vec![
			block("program"),
			block("year1").with_parents(["program"]),
			block("year2").with_parents(["program"]).with_prerequisites(["year1"]),
			block("intro").with_parents(["year1"]),
			block("lab").with_parents(["year1"]).with_prerequisites(["intro"]),
		]
	}

	fn screen_center(state: &BlockGraphState, id: &str) -> Point {
		let p = state
			.scene()
			.positioned
			.iter()
			.find(|p| p.block.id == id)
			.unwrap();
		let c = p.position.center();
		let vb = state.scene().view_box;
		let s = state.viewport.state();
		Point::new((c.x - vb.x) * s.zoom + s.pan_x, (c.y - vb.y) * s.zoom + s.pan_y)
	}

	#[test]
	fn first_screen_skips_the_single_root() {
		let state = BlockGraphState::new(&blocks(), GraphConfig::default(), 1200.0, 800.0);
		let ids: Vec<_> = state.scene().positioned.iter().map(|p| p.block.id.as_str()).collect();
		assert_eq!(ids, vec!["year1", "year2"]);
		assert_eq!(state.scene().edges.len(), 1);
	}

	#[test]
	fn clicking_drills_down_and_relayouts() {
		let mut state = BlockGraphState::new(&blocks(), GraphConfig::default(), 1200.0, 800.0);
		let at = screen_center(&state, "year1");
		let event = state.click_at(at).unwrap();
		assert_eq!(event.navigation_stack, vec!["year1"]);

		let scene = state.scene();
		assert!(scene.categories.visible.contains("intro"));
		assert!(scene.categories.is_dimmed("year2"));
		assert_eq!(scene.positioned.len(), 4);
	}

	#[test]
	fn empty_space_is_not_a_click() {
		let mut state = BlockGraphState::new(&blocks(), GraphConfig::default(), 1200.0, 800.0);
		assert!(state.click_at(Point::new(-5000.0, -5000.0)).is_none());
	}

	#[test]
	fn render_notice_fires_once_per_batch() {
		let mut state = BlockGraphState::new(&blocks(), GraphConfig::default(), 800.0, 600.0);
		assert_eq!(state.take_render_complete(), Some(RenderComplete { block_count: 5 }));
		assert_eq!(state.take_render_complete(), None);
		state.set_blocks(&blocks()[..2]);
		assert_eq!(state.take_render_complete(), Some(RenderComplete { block_count: 2 }));
	}

	#[test]
	fn new_data_clears_navigation() {
		let mut state = BlockGraphState::new(&blocks(), GraphConfig::default(), 800.0, 600.0);
		state.click("year1");
		state.set_blocks(&blocks());
		assert!(state.navigation.stack().is_empty());
	}

	#[test]
	fn hidden_edge_kinds_are_not_routed() {
		let config = GraphConfig {
			show_prerequisites: false,
			..GraphConfig::default()
		};
		let state = BlockGraphState::new(&blocks(), config, 800.0, 600.0);
		assert!(state.scene().edges.is_empty());
	}
}
