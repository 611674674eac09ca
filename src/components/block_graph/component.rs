//! Leptos component wrapping the block graph canvas.
//!
//! The component creates an HTML canvas element and wires mouse, touch and
//! wheel handlers through the [`GestureHandler`](super::gesture::GestureHandler):
//! presses that never cross the drag threshold become clicks that drive the
//! drill-down navigation, the rest pan the view. Escape drills up one level.
//! A `requestAnimationFrame` loop redraws the scene every frame.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent,
	WheelEvent, Window,
};

use super::config::GraphConfig;
use super::gesture::GestureOutcome;
use super::render;
use super::state::{BlockGraphState, RenderComplete};
use super::theme::Theme;
use crate::graph::{Block, Point, SelectionEvent};

/// Bundles graph state with its visual theme.
struct GraphContext {
	state: BlockGraphState,
	theme: Theme,
}

/// Shared handle to the mounted component's context.
type SharedContext = Rc<RefCell<Option<GraphContext>>>;

/// Renders an interactive drill-down block graph on a canvas element.
///
/// Pass blocks via the reactive `blocks` signal; every new value replaces
/// the graph and resets navigation. The component sizes itself to its
/// parent container by default; set `fullscreen = true` to fill the
/// viewport and resize automatically with the window.
///
/// `on_select` fires on every click of a block, `on_render` once per block
/// batch after it has first been drawn.
#[component]
pub fn BlockGraphCanvas(
	#[prop(into)] blocks: Signal<Vec<Block>>,
	#[prop(optional, into)] config: MaybeProp<GraphConfig>,
	#[prop(optional)] theme: Option<Theme>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(optional)] on_select: Option<Callback<SelectionEvent>>,
	#[prop(optional)] on_render: Option<Callback<RenderComplete>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let keydown_cb: Rc<RefCell<Option<Closure<dyn FnMut(KeyboardEvent)>>>> =
		Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init, keydown_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone(), keydown_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let blocks = blocks.get();
		let config = config.get().unwrap_or_default();

		// Later runs only swap data into the existing context.
		if let Some(ref mut c) = *context_init.borrow_mut() {
			if c.state.config != config {
				c.state.set_config(config);
			}
			if c.state.graph.blocks() != blocks.as_slice() {
				c.state.set_blocks(&blocks);
			}
			return;
		}

		let Some(window) = web_sys::window() else {
			return;
		};
		let (w, h) = canvas_size(&window, &canvas, fullscreen);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			log::error!("block-graph: canvas 2d context unavailable");
			return;
		};

		*context_init.borrow_mut() = Some(GraphContext {
			state: BlockGraphState::new(&blocks, config, w, h),
			theme: theme.clone().unwrap_or_default(),
		});

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = canvas_size(&win, &canvas_resize, true);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.state.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let context_key = context_init.clone();
		*keydown_cb_init.borrow_mut() = Some(Closure::new(move |ev: KeyboardEvent| {
			if ev.key() != "Escape" {
				return;
			}
			let event = match *context_key.borrow_mut() {
				Some(ref mut c) if !c.state.navigation.stack().is_empty() => Some(c.state.back()),
				_ => None,
			};
			if let (Some(event), Some(cb)) = (event, on_select) {
				cb.run(event);
			}
		}));
		if let Some(ref cb) = *keydown_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref());
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let mut notice = None;
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				render::render(&c.state, &ctx, &c.theme);
				notice = c.state.take_render_complete();
			}
			// Emit after releasing the borrow so listeners may touch the component.
			if let (Some(notice), Some(cb)) = (notice, on_render) {
				debug!("block-graph: rendered {} blocks", notice.block_count);
				cb.run(notice);
			}
			if let (Some(win), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let pointer = move |client_x: f64, client_y: f64| -> Option<Point> {
		let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
		let rect = canvas.get_bounding_client_rect();
		Some(Point::new(client_x - rect.left(), client_y - rect.top()))
	};

	let finish = {
		let context = context.clone();
		move |outcome: GestureOutcome| {
			let event = match outcome {
				GestureOutcome::Click(at) => context
					.borrow_mut()
					.as_mut()
					.and_then(|c| c.state.click_at(at)),
				GestureOutcome::Pan | GestureOutcome::Idle => None,
			};
			if let (Some(event), Some(cb)) = (event, on_select) {
				cb.run(event);
			}
		}
	};

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(at) = pointer(ev.client_x() as f64, ev.client_y() as f64) else {
			return;
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			c.state.gestures.pointer_down(at, &c.state.viewport);
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(at) = pointer(ev.client_x() as f64, ev.client_y() as f64) else {
			return;
		};
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			let state = &mut c.state;
			if !state.gestures.pointer_move(at, &mut state.viewport) {
				state.set_hover(Some(at));
			}
		}
	};

	let context_mu = context.clone();
	let finish_mu = finish.clone();
	let on_mouseup = move |_: MouseEvent| {
		let outcome = match *context_mu.borrow_mut() {
			Some(ref mut c) => c.state.gestures.pointer_up(),
			None => GestureOutcome::Idle,
		};
		finish_mu(outcome);
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.gestures.cancel();
			c.state.set_hover(None);
		}
	};

	let touch_points = move |ev: &TouchEvent| -> Vec<Point> {
		let touches = ev.touches();
		(0..touches.length())
			.filter_map(|i| touches.get(i))
			.filter_map(|t| pointer(t.client_x() as f64, t.client_y() as f64))
			.collect()
	};

	let context_ts = context.clone();
	let on_touchstart = move |ev: TouchEvent| {
		let points = touch_points(&ev);
		if let Some(ref mut c) = *context_ts.borrow_mut() {
			c.state.gestures.touch_start(&points, &c.state.viewport);
		}
	};

	let context_tm = context.clone();
	let on_touchmove = move |ev: TouchEvent| {
		let points = touch_points(&ev);
		if let Some(ref mut c) = *context_tm.borrow_mut() {
			let state = &mut c.state;
			if state.gestures.touch_move(&points, &mut state.viewport) {
				ev.prevent_default();
			}
		}
	};

	let context_te = context.clone();
	let on_touchend = move |_: TouchEvent| {
		let outcome = match *context_te.borrow_mut() {
			Some(ref mut c) => c.state.gestures.touch_end(),
			None => GestureOutcome::Idle,
		};
		finish(outcome);
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(at) = pointer(ev.client_x() as f64, ev.client_y() as f64) else {
			return;
		};
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let state = &mut c.state;
			state.gestures.wheel(ev.delta_y(), at, &mut state.viewport);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="block-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:touchstart=on_touchstart
			on:touchmove=on_touchmove
			on:touchend=on_touchend
			on:wheel=on_wheel
			style="display: block; cursor: grab; touch-action: none;"
		/>
	}
}

fn canvas_size(window: &Window, canvas: &HtmlCanvasElement, fullscreen: bool) -> (f64, f64) {
	let inner = |v: Result<JsValue, JsValue>, fallback: f64| {
		v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
	};
	if fullscreen {
		(
			inner(window.inner_width(), 800.0),
			inner(window.inner_height(), 600.0),
		)
	} else {
		let parent = canvas.parent_element();
		(
			parent.as_ref().map(|p| p.client_width() as f64).unwrap_or(800.0),
			parent.as_ref().map(|p| p.client_height() as f64).unwrap_or(600.0),
		)
	}
}
