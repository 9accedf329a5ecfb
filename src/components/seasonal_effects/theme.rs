//! Colors and per-effect palettes.

use rand::Rng;

/// RGB color with an alpha channel for CSS output.
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

	/// Shift each channel down by the given amounts, saturating at 0.
	pub fn shade(self, dr: u8, dg: u8, db: u8) -> Self {
		Self {
			r: self.r.saturating_sub(dr),
			g: self.g.saturating_sub(dg),
			b: self.b.saturating_sub(db),
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

/// Fixed set of colors a particle picks from when it spawns.
#[derive(Clone, Copy, Debug)]
pub struct Palette {
	pub colors: &'static [Color],
}

impl Palette {
	/// Pale pinks through white.
	pub const SAKURA: Self = Self {
		colors: &[
			Color::rgb(255, 182, 193), // Light pink
			Color::rgb(255, 192, 203), // Pink
			Color::rgb(255, 228, 225), // Misty rose
			Color::rgb(255, 240, 245), // Lavender blush
			Color::rgb(255, 255, 255), // White
		],
	};

	/// Deep red through bright orange.
	pub const MAPLE: Self = Self {
		colors: &[
			Color::rgb(200, 30, 30),  // Deep red
			Color::rgb(220, 20, 60),  // Crimson
			Color::rgb(255, 69, 0),   // Vermilion
			Color::rgb(255, 120, 0),  // Orange
			Color::rgb(255, 160, 0),  // Light orange
		],
	};

	/// Gold through cream.
	pub const GINKGO: Self = Self {
		colors: &[
			Color::rgb(255, 215, 0),   // Gold
			Color::rgb(255, 223, 0),   // Bright gold
			Color::rgb(255, 255, 0),   // Yellow
			Color::rgb(238, 221, 130), // Pale yellow
			Color::rgb(255, 239, 145), // Cream
		],
	};

	/// Blue-tinged summer greens.
	pub const WILLOW: Self = Self {
		colors: &[
			Color::rgb(50, 150, 50),  // Deep green
			Color::rgb(60, 180, 60),  // Bright green
			Color::rgb(40, 140, 80),  // Blue green
			Color::rgb(70, 160, 70),  // Soft green
			Color::rgb(80, 200, 80),  // Fresh leaf
			Color::rgb(45, 130, 90),  // Deep teal
			Color::rgb(90, 190, 90),  // Pale green
		],
	};

	pub const RAIN: Self = Self {
		colors: &[Color::rgb(174, 194, 224)],
	};

	pub const SNOW: Self = Self {
		colors: &[Color::rgb(255, 255, 255)],
	};

	pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
		self.colors[rng.gen_range(0..self.colors.len())]
	}

	pub fn contains(&self, color: Color) -> bool {
		self.colors
			.iter()
			.any(|c| (c.r, c.g, c.b) == (color.r, color.g, color.b))
	}
}

/// Stroke color for the fine veins drawn over larger sakura petals.
pub const SAKURA_VEIN: Color = Color {
	r: 255,
	g: 182,
	b: 193,
	a: 0.3,
};
