//! block-graph: Interactive drill-down dependency graph of course blocks.
//!
//! The [`graph`] module is the DOM-free engine: graph construction,
//! prerequisite indexing, transitive reduction, banded layout and
//! navigation. The [`components`] module hosts it in a WASM canvas
//! component with pan/zoom and click-driven drill-down.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
pub mod error;
pub mod graph;

pub use components::block_graph::{BlockGraphCanvas, GraphConfig, RenderComplete, Theme};
pub use error::{GraphError, Result};
pub use graph::{Block, SelectionEvent};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("block-graph: logging initialized");
}

/// Text content of the `<script>` element with the given id.
fn script_text(id: &str) -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Load blocks from a script element with id="block-data".
/// Expected format: a JSON array of v0.1 or v0.2 blocks.
fn load_blocks() -> Option<Vec<Block>> {
	let json_text = script_text("block-data")?;
	match graph::schema::parse_blocks(&json_text) {
		Ok(blocks) => {
			info!("block-graph: loaded {} blocks", blocks.len());
			Some(blocks)
		}
		Err(e) => {
			warn!("block-graph: failed to load block data: {}", e);
			None
		}
	}
}

/// Load options from a script element with id="graph-config", if present.
fn load_config() -> GraphConfig {
	let Some(json_text) = script_text("graph-config") else {
		return GraphConfig::default();
	};
	GraphConfig::from_json(&json_text).unwrap_or_else(|e| {
		warn!("block-graph: ignoring graph config: {}", e);
		GraphConfig::default()
	})
}

/// Theme named by the page's `<html data-theme="...">` attribute.
fn load_theme() -> Theme {
	let name = web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.document_element())
		.and_then(|e| e.get_attribute("data-theme"));
	match name.as_deref().map(|n| (n, Theme::named(n))) {
		Some((_, Some(theme))) => theme,
		Some((n, None)) => {
			warn!("block-graph: unknown theme `{}`, using light", n);
			Theme::default()
		}
		None => Theme::default(),
	}
}

/// Main application component.
/// Loads blocks and options from the DOM and renders the drill-down graph.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let blocks = load_blocks().unwrap_or_default();
	let blocks_signal = Signal::derive(move || blocks.clone());
	let config = load_config();
	let theme = load_theme();
	let theme_name = theme.name;

	let (selection, set_selection) = signal(None::<SelectionEvent>);
	let on_select = Callback::new(move |event: SelectionEvent| {
		info!(
			"block-graph: selected {:?} at level {}",
			event.block_id, event.selection_level
		);
		set_selection.set(Some(event));
	});
	let on_render = Callback::new(move |done: RenderComplete| {
		info!("block-graph: render complete, {} blocks", done.block_count);
	});

	let breadcrumb = move || {
		selection
			.get()
			.map(|event| event.navigation_stack.join(" › "))
			.filter(|path| !path.is_empty())
			.unwrap_or_else(|| "All blocks".to_string())
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme=theme_name />
		<Title text="Course Block Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<BlockGraphCanvas
				blocks=blocks_signal
				config=config
				theme=theme
				fullscreen=true
				on_select=on_select
				on_render=on_render
			/>
			<div class="graph-overlay">
				<h1>"Course Blocks"</h1>
				<p class="subtitle">{breadcrumb}</p>
			</div>
		</div>
	}
}
