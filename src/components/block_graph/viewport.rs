//! Pan and zoom state applied to the whole diagram.

use log::warn;

use crate::graph::Point;

/// Default lower zoom bound.
pub const DEFAULT_MIN_ZOOM: f64 = 0.1;
/// Default upper zoom bound.
pub const DEFAULT_MAX_ZOOM: f64 = 5.0;

/// Zoom factor, pan offset (screen pixels) and zoom limits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
	/// Uniform scale (1.0 = 100%).
	pub zoom: f64,
	pub pan_x: f64,
	pub pan_y: f64,
	pub min_zoom: f64,
	pub max_zoom: f64,
}

impl Default for ViewportState {
	fn default() -> Self {
		Self {
			zoom: 1.0,
			pan_x: 0.0,
			pan_y: 0.0,
			min_zoom: DEFAULT_MIN_ZOOM,
			max_zoom: DEFAULT_MAX_ZOOM,
		}
	}
}

/// Owner of the [`ViewportState`]. Screen = world * zoom + pan.
#[derive(Clone, Debug, Default)]
pub struct Viewport {
	state: ViewportState,
}

impl Viewport {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn state(&self) -> ViewportState {
		self.state
	}

	pub fn zoom_level(&self) -> f64 {
		self.state.zoom
	}

	pub fn pan_offset(&self) -> (f64, f64) {
		(self.state.pan_x, self.state.pan_y)
	}

	/// Set the zoom factor, clamped to the configured limits.
	pub fn zoom(&mut self, level: f64) {
		self.state.zoom = self.clamp_zoom(level);
	}

	/// Set the absolute pan offset.
	pub fn pan(&mut self, x: f64, y: f64) {
		self.state.pan_x = x;
		self.state.pan_y = y;
	}

	/// Zoom to `target` keeping the world point under `cursor` fixed on screen.
	pub fn zoom_at(&mut self, target: f64, cursor: Point) {
		let old = self.state.zoom;
		let new = self.clamp_zoom(target);
		let ratio = new / old;
		self.state.pan_x = cursor.x - (cursor.x - self.state.pan_x) * ratio;
		self.state.pan_y = cursor.y - (cursor.y - self.state.pan_y) * ratio;
		self.state.zoom = new;
	}

	/// Replace the zoom limits. Invalid limits are logged and ignored.
	pub fn set_zoom_limits(&mut self, min: f64, max: f64) {
		if min <= 0.0 || min >= max {
			warn!("block-graph: rejected zoom limits min={min} max={max}");
			return;
		}
		self.state.min_zoom = min;
		self.state.max_zoom = max;
		self.state.zoom = self.clamp_zoom(self.state.zoom);
	}

	/// Back to 100% at the origin. Limits are kept.
	pub fn reset(&mut self) {
		self.state.zoom = 1.0;
		self.state.pan_x = 0.0;
		self.state.pan_y = 0.0;
	}

	/// Affine matrix `[a, b, c, d, e, f]` as used by canvas `setTransform`.
	pub fn transform_matrix(&self) -> [f64; 6] {
		let s = &self.state;
		[s.zoom, 0.0, 0.0, s.zoom, s.pan_x, s.pan_y]
	}

	pub fn screen_to_world(&self, screen: Point) -> Point {
		Point::new(
			(screen.x - self.state.pan_x) / self.state.zoom,
			(screen.y - self.state.pan_y) / self.state.zoom,
		)
	}

	fn clamp_zoom(&self, level: f64) -> f64 {
		level.clamp(self.state.min_zoom, self.state.max_zoom)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-9
	}

	#[test]
	fn zoom_is_clamped() {
		let mut vp = Viewport::new();
		vp.zoom(50.0);
		assert_eq!(vp.zoom_level(), DEFAULT_MAX_ZOOM);
		vp.zoom(0.0);
		assert_eq!(vp.zoom_level(), DEFAULT_MIN_ZOOM);
	}

	#[test]
	fn invalid_limits_are_ignored() {
		let mut vp = Viewport::new();
		vp.set_zoom_limits(0.0, 2.0);
		vp.set_zoom_limits(3.0, 3.0);
		assert_eq!(vp.state().min_zoom, DEFAULT_MIN_ZOOM);
		assert_eq!(vp.state().max_zoom, DEFAULT_MAX_ZOOM);
	}

	#[test]
	fn new_limits_reclamp_current_zoom() {
		let mut vp = Viewport::new();
		vp.zoom(4.0);
		vp.set_zoom_limits(0.5, 2.0);
		assert_eq!(vp.zoom_level(), 2.0);
	}

	#[test]
	fn reset_keeps_limits() {
		let mut vp = Viewport::new();
		vp.set_zoom_limits(0.5, 2.0);
		vp.zoom(1.5);
		vp.pan(10.0, -4.0);
		vp.reset();
		assert_eq!(vp.pan_offset(), (0.0, 0.0));
		assert_eq!(vp.zoom_level(), 1.0);
		assert_eq!(vp.state().max_zoom, 2.0);
	}

	#[test]
	fn matrix_is_scale_then_translate() {
		let mut vp = Viewport::new();
		vp.zoom(2.0);
		vp.pan(3.0, 4.0);
		assert_eq!(vp.transform_matrix(), [2.0, 0.0, 0.0, 2.0, 3.0, 4.0]);
	}

	#[test]
	fn cursor_zoom_keeps_the_point_under_the_cursor() {
		let mut vp = Viewport::new();
		vp.pan(30.0, -10.0);
		let cursor = Point::new(250.0, 120.0);
		let before = vp.screen_to_world(cursor);
		vp.zoom_at(2.5, cursor);
		let after = vp.screen_to_world(cursor);
		assert!(close(before.x, after.x) && close(before.y, after.y));
	}

	#[test]
	fn cursor_zoom_uses_the_clamped_factor() {
		let mut vp = Viewport::new();
		vp.zoom_at(100.0, Point::new(100.0, 0.0));
		assert_eq!(vp.zoom_level(), DEFAULT_MAX_ZOOM);
		assert!(close(vp.pan_offset().0, 100.0 - 100.0 * DEFAULT_MAX_ZOOM));
	}
}
