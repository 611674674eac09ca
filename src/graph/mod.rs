//! The graph engine: blocks in, laid-out and navigable diagram out.
//!
//! Everything here is DOM-free and synchronous. The pipeline is
//! [`build_graph`] → [`categorize_blocks`] → [`layout_blocks`] →
//! [`reduce_edges`] / [`route_edges`], with [`RelationshipIndex`] available
//! for prerequisite queries.

mod builder;
mod layout;
mod navigation;
mod reduction;
mod relationships;
pub mod schema;
mod types;

pub use builder::{BlockGraph, build_graph};
pub use layout::{
	DEFAULT_VIEW_BOX, LayoutConfig, Orientation, Point, PositionedBlock, Rect, RoutedEdge,
	VIEW_BOX_PADDING, compute_view_box, connection_points, layout, layout_blocks, route_edges,
};
pub use navigation::{
	BlockCategories, LEVEL_NONE, LEVEL_SELECTED, LEVEL_SUB_BLOCKS, NavigationState,
	SelectionEvent, auto_hidden_root, categorize_blocks, categorize_path,
};
pub use reduction::{find_transitive_edges, reduce_edges};
pub use relationships::{CycleReport, IdSet, RelationshipIndex};
pub use schema::SchemaFormat;
pub use types::{BilingualText, Block, Edge, EdgeKind, Language};
