//! Turns raw pointer, touch and wheel input into viewport changes.
//!
//! A press only becomes a pan once the pointer has travelled
//! [`DRAG_THRESHOLD`] pixels from where it went down, so a press-and-release
//! without movement still counts as a click. While panning, the offset is
//! always recomputed from the snapshot taken at press time rather than
//! accumulated per move event.

use crate::graph::Point;

use super::viewport::Viewport;

/// Minimum travel, in screen pixels, before a press turns into a pan.
pub const DRAG_THRESHOLD: f64 = 5.0;
/// Zoom change applied per wheel event.
pub const WHEEL_ZOOM_STEP: f64 = 0.1;

/// How a finished press should be interpreted by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureOutcome {
	/// Nothing was pressed.
	Idle,
	/// Released without crossing the drag threshold, at this screen point.
	Click(Point),
	/// The press panned the view.
	Pan,
}

/// Tracks an in-progress press.
#[derive(Clone, Debug, Default)]
pub struct GestureHandler {
	start: Option<Point>,
	initial_pan: (f64, f64),
	panning: bool,
}

impl GestureHandler {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_active(&self) -> bool {
		self.start.is_some()
	}

	/// Record the press position and the pan at press time.
	pub fn pointer_down(&mut self, at: Point, viewport: &Viewport) {
		self.start = Some(at);
		self.initial_pan = viewport.pan_offset();
		self.panning = false;
	}

	/// Update the pan once the threshold is crossed. Returns whether the
	/// gesture is currently a pan.
	pub fn pointer_move(&mut self, at: Point, viewport: &mut Viewport) -> bool {
		let Some(start) = self.start else {
			return false;
		};
		let (dx, dy) = (at.x - start.x, at.y - start.y);
		if !self.panning && dx.hypot(dy) >= DRAG_THRESHOLD {
			self.panning = true;
		}
		if self.panning {
			viewport.pan(self.initial_pan.0 + dx, self.initial_pan.1 + dy);
		}
		self.panning
	}

	/// Finish the press. The viewport keeps its pan.
	pub fn pointer_up(&mut self) -> GestureOutcome {
		let outcome = match (self.start, self.panning) {
			(None, _) => GestureOutcome::Idle,
			(Some(_), true) => GestureOutcome::Pan,
			(Some(start), false) => GestureOutcome::Click(start),
		};
		self.cancel();
		outcome
	}

	/// Drop any in-progress press without reporting it.
	pub fn cancel(&mut self) {
		self.start = None;
		self.initial_pan = (0.0, 0.0);
		self.panning = false;
	}

	/// Start a touch gesture. Multi-touch is reserved for pinch and ignored.
	pub fn touch_start(&mut self, touches: &[Point], viewport: &Viewport) {
		match touches {
			[only] => self.pointer_down(*only, viewport),
			_ => self.cancel(),
		}
	}

	pub fn touch_move(&mut self, touches: &[Point], viewport: &mut Viewport) -> bool {
		match touches {
			[only] => self.pointer_move(*only, viewport),
			_ => false,
		}
	}

	pub fn touch_end(&mut self) -> GestureOutcome {
		self.pointer_up()
	}

	/// Apply one wheel step centred on `cursor`. Negative `delta_y`
	/// (scrolling up) zooms in.
	///
	/// The host must suppress the browser's default handling of the event.
	pub fn wheel(&mut self, delta_y: f64, cursor: Point, viewport: &mut Viewport) {
		if delta_y == 0.0 {
			return;
		}
		let step = if delta_y < 0.0 { WHEEL_ZOOM_STEP } else { -WHEEL_ZOOM_STEP };
		viewport.zoom_at(viewport.zoom_level() + step, cursor);
	}
}
