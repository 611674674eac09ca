//! Visual theming for the block graph.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Block rectangle styling.
#[derive(Clone, Debug)]
pub struct BlockStyle {
	pub fill: Color,
	/// Fill for blocks that can be drilled into.
	pub container_fill: Color,
	pub border: Color,
	/// Border of the current selection and of the hovered block.
	pub highlight_border: Color,
	pub border_width: f64,
	pub corner_radius: f64,
	pub text: Color,
	/// Font size in world units.
	pub font_size: f64,
	pub padding: f64,
	/// Global alpha for dimmed context blocks.
	pub dimmed_alpha: f64,
}

/// Edge styling per relationship kind.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	pub prerequisite: Color,
	pub parent: Color,
	pub width: f64,
	pub arrow_size: f64,
}

/// Complete theme configuration.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub background: Color,
	pub block: BlockStyle,
	pub edge: EdgeStyle,
}

impl Default for Theme {
	fn default() -> Self {
		Self::light()
	}
}

impl Theme {
	/// Built-in theme for a `data-theme` name.
	pub fn named(name: &str) -> Option<Self> {
		match name {
			"light" => Some(Self::light()),
			"midnight" => Some(Self::midnight()),
			_ => None,
		}
	}

	pub fn light() -> Self {
		Self {
			name: "light",
			background: Color::rgb(248, 249, 251),
			block: BlockStyle {
				fill: Color::rgb(255, 255, 255),
				container_fill: Color::rgb(232, 240, 254),
				border: Color::rgb(176, 190, 197),
				highlight_border: Color::rgb(25, 118, 210),
				border_width: 1.5,
				corner_radius: 8.0,
				text: Color::rgb(38, 50, 56),
				font_size: 14.0,
				padding: 10.0,
				dimmed_alpha: 0.35,
			},
			edge: EdgeStyle {
				prerequisite: Color::rgb(230, 81, 0),
				parent: Color::rgb(96, 125, 139),
				width: 1.5,
				arrow_size: 7.0,
			},
		}
	}

	pub fn midnight() -> Self {
		let accent = Color::rgb(100, 181, 246);
		Self {
			name: "midnight",
			background: Color::rgb(15, 20, 30),
			block: BlockStyle {
				fill: Color::rgb(30, 38, 52),
				container_fill: Color::rgb(36, 52, 78),
				border: Color::rgb(70, 85, 110),
				highlight_border: accent,
				border_width: 1.5,
				corner_radius: 8.0,
				text: Color::rgb(225, 230, 240),
				font_size: 14.0,
				padding: 10.0,
				dimmed_alpha: 0.3,
			},
			edge: EdgeStyle {
				prerequisite: Color::rgb(255, 167, 38).with_alpha(0.85),
				parent: accent.lighten(0.3).with_alpha(0.6),
				width: 1.5,
				arrow_size: 7.0,
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn css_output_drops_opaque_alpha() {
		assert_eq!(Color::rgb(255, 0, 16).to_css(), "#ff0010");
		assert_eq!(Color::rgba(1, 2, 3, 0.5).to_css(), "rgba(1, 2, 3, 0.5)");
	}

	#[test]
	fn themes_resolve_by_name() {
		assert_eq!(Theme::named("midnight").map(|t| t.name), Some("midnight"));
		assert_eq!(Theme::named("light").map(|t| t.name), Some("light"));
		assert!(Theme::named("sepia").is_none());
	}
}
