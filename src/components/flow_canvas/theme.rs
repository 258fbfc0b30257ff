//! Visual theming for the scenario canvas.

use serde::Deserialize;

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

/// How the background grid is drawn. Chosen by the page config's `background`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridVariant {
	/// Full-length grid lines.
	#[default]
	Lines,
	/// A dot at every grid intersection.
	Dots,
}

#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	pub color: Color,
	pub grid_color: Color,
	pub grid_variant: GridVariant,
	/// Grid spacing in canvas units.
	pub grid_spacing: f64,
}

#[derive(Clone, Debug)]
pub struct NodeStyle {
	pub fill: Color,
	pub border: Color,
	pub hover_border: Color,
	pub selected_border: Color,
	pub text: Color,
	pub subtext: Color,
	pub label_font: String,
	pub type_font: String,
	pub delete_fill: Color,
}

#[derive(Clone, Debug)]
pub struct EdgeStyle {
	pub color: Color,
	pub width: f64,
	pub arrow_size: f64,
	/// Line drawn while a connection is being dragged out.
	pub preview_color: Color,
}

/// Complete canvas theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub background: BackgroundStyle,
	pub node: NodeStyle,
	pub edge: EdgeStyle,
}

impl Default for Theme {
	fn default() -> Self {
		let accent = Color::rgb(0x99, 0xb3, 0xec);
		Self {
			background: BackgroundStyle {
				color: Color::rgb(250, 251, 253),
				grid_color: accent.with_alpha(0.35),
				grid_variant: GridVariant::default(),
				grid_spacing: 24.0,
			},
			node: NodeStyle {
				fill: Color::rgb(255, 255, 255),
				border: Color::rgb(120, 130, 150),
				hover_border: accent,
				selected_border: Color::rgb(25, 118, 210),
				text: Color::rgb(33, 37, 41),
				subtext: Color::rgb(110, 117, 125),
				label_font: "600 13px system-ui, sans-serif".into(),
				type_font: "11px system-ui, sans-serif".into(),
				delete_fill: Color::rgb(198, 40, 40),
			},
			edge: EdgeStyle {
				color: Color::rgb(120, 130, 150),
				width: 1.5,
				arrow_size: 8.0,
				preview_color: accent,
			},
		}
	}
}

impl Theme {
	/// The same theme with a different background grid.
	pub fn with_grid(mut self, variant: GridVariant) -> Self {
		self.background.grid_variant = variant;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn grid_variant_is_selectable() {
		assert_eq!(Theme::default().background.grid_variant, GridVariant::Lines);
		let theme = Theme::default().with_grid(GridVariant::Dots);
		assert_eq!(theme.background.grid_variant, GridVariant::Dots);
		assert_eq!(theme.background.grid_spacing, Theme::default().background.grid_spacing);
	}

	#[test]
	fn css_output() {
		assert_eq!(Color::rgb(0x99, 0xb3, 0xec).to_css(), "#99b3ec");
		assert_eq!(
			Color::rgb(10, 20, 30).with_alpha(0.5).to_css(),
			"rgba(10, 20, 30, 0.5)"
		);
		assert_eq!(Color::rgb(0, 0, 0).lighten(1.0), Color::rgb(255, 255, 255));
	}
}
