//! Drill-down block graph visualization component.
//!
//! Renders the laid-out block graph on an HTML canvas with:
//! - Banded layout in four orientations with optional grid wrapping
//! - Click-to-drill navigation with dimmed sibling context
//! - Pan (drag past a small threshold) and cursor-centred wheel zoom
//! - Transitively reduced prerequisite edges
//!
//! # Example
//!
//! ```ignore
//! use block_graph::{BlockGraphCanvas, GraphConfig};
//! use block_graph::graph::{BilingualText, Block};
//!
//! let blocks = vec![
//!     Block::new("algebra", BilingualText::new("אלגברה", "Algebra")),
//!     Block::new("calculus", BilingualText::new("חדו\"א", "Calculus"))
//!         .with_prerequisites(["algebra"]),
//! ];
//!
//! view! { <BlockGraphCanvas blocks=blocks fullscreen=true /> }
//! ```

mod component;
pub mod config;
pub mod gesture;
mod render;
pub mod state;
pub mod theme;
pub mod viewport;

pub use component::BlockGraphCanvas;
pub use config::{GraphConfig, LineStyle};
pub use gesture::{GestureHandler, GestureOutcome};
pub use state::{BlockGraphState, RenderComplete, Scene};
pub use theme::Theme;
pub use viewport::{Viewport, ViewportState};
