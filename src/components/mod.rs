//! UI components.

pub mod block_graph;
