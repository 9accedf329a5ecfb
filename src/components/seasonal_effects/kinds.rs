//! Effect variants, their parameter tables, and the season mapping.

use std::fmt;

use serde::Deserialize;

use super::wind::WindOptions;

/// One of the five seasonal backgrounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
	Rain,
	Sakura,
	Snow,
	AutumnLeaves,
	SummerWillow,
}

/// What happens to a particle that drifts past the left or right margin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgePolicy {
	/// Respawn at the top with fresh attributes.
	Respawn,
	/// Teleport to the opposite margin, keeping everything else.
	Wrap,
}

impl EffectKind {
	pub const ALL: [EffectKind; 5] = [
		EffectKind::Rain,
		EffectKind::Sakura,
		EffectKind::Snow,
		EffectKind::AutumnLeaves,
		EffectKind::SummerWillow,
	];

	pub fn index(self) -> usize {
		match self {
			EffectKind::Rain => 0,
			EffectKind::Sakura => 1,
			EffectKind::Snow => 2,
			EffectKind::AutumnLeaves => 3,
			EffectKind::SummerWillow => 4,
		}
	}

	/// CSS class of the effect's canvas element.
	pub fn canvas_class(self) -> &'static str {
		match self {
			EffectKind::Rain => "rain-canvas",
			EffectKind::Sakura => "sakura-canvas",
			EffectKind::Snow => "snow-canvas",
			EffectKind::AutumnLeaves => "autumn-leaves-canvas",
			EffectKind::SummerWillow => "summer-willow-canvas",
		}
	}

	/// Id of the `<style>` element holding the canvas rule.
	pub fn style_id(self) -> &'static str {
		match self {
			EffectKind::Rain => "rain-effect-style",
			EffectKind::Sakura => "sakura-effect-style",
			EffectKind::Snow => "snow-effect-style",
			EffectKind::AutumnLeaves => "autumn-leaves-effect-style",
			EffectKind::SummerWillow => "summer-willow-effect-style",
		}
	}

	/// Property on `window` under which the live canvas is published.
	pub fn global_key(self) -> &'static str {
		match self {
			EffectKind::Rain => "rainEffect",
			EffectKind::Sakura => "sakuraEffect",
			EffectKind::Snow => "snowEffect",
			EffectKind::AutumnLeaves => "autumnLeavesEffect",
			EffectKind::SummerWillow => "summerWillowEffect",
		}
	}

	/// Whole-canvas CSS opacity.
	pub fn canvas_opacity(self) -> f64 {
		match self {
			EffectKind::Rain => 0.6,
			EffectKind::Sakura | EffectKind::Snow => 0.8,
			EffectKind::AutumnLeaves => 0.9,
			EffectKind::SummerWillow => 0.85,
		}
	}

	/// Viewport pixels per particle.
	pub fn density_factor(self) -> f64 {
		match self {
			EffectKind::Rain => 2.5,
			EffectKind::Sakura => 15.0,
			EffectKind::Snow => 8.0,
			EffectKind::AutumnLeaves => 18.0,
			EffectKind::SummerWillow => 10.0,
		}
	}

	/// Inclusive particle-count bounds.
	pub fn density_bounds(self) -> (usize, usize) {
		match self {
			EffectKind::AutumnLeaves => (8, 40),
			_ => (0, usize::MAX),
		}
	}

	pub fn wind(self) -> WindOptions {
		match self {
			EffectKind::Rain => WindOptions::RAIN,
			EffectKind::Sakura => WindOptions::SAKURA,
			EffectKind::Snow => WindOptions::SNOW,
			EffectKind::AutumnLeaves => WindOptions::AUTUMN_LEAVES,
			EffectKind::SummerWillow => WindOptions::SUMMER_WILLOW,
		}
	}

	/// Distance outside the canvas a particle may travel before it is recycled.
	pub fn margin(self) -> f64 {
		match self {
			EffectKind::Snow => 20.0,
			EffectKind::SummerWillow => 60.0,
			_ => 50.0,
		}
	}

	pub fn edge_policy(self) -> EdgePolicy {
		match self {
			EffectKind::Snow => EdgePolicy::Wrap,
			_ => EdgePolicy::Respawn,
		}
	}

	/// Only the willow canvas follows window resizes.
	pub fn tracks_resize(self) -> bool {
		matches!(self, EffectKind::SummerWillow)
	}

	/// Whether particle sizes scale with the viewport.
	pub fn uses_size_multiplier(self) -> bool {
		matches!(
			self,
			EffectKind::Sakura | EffectKind::Snow | EffectKind::AutumnLeaves
		)
	}

	/// Full-viewport, click-through stylesheet for this effect's canvas.
	pub fn stylesheet(self) -> String {
		full_screen_canvas_css(self.canvas_class(), self.canvas_opacity())
	}
}

impl fmt::Display for EffectKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			EffectKind::Rain => "rain",
			EffectKind::Sakura => "sakura",
			EffectKind::Snow => "snow",
			EffectKind::AutumnLeaves => "autumn-leaves",
			EffectKind::SummerWillow => "summer-willow",
		};
		f.write_str(name)
	}
}

/// Build the fixed full-screen rule for a canvas class.
pub fn full_screen_canvas_css(class_name: &str, opacity: f64) -> String {
	format!(
		"\n.{class_name} {{\n  position: fixed;\n  top: 0;\n  left: 0;\n  width: 100%;\n  height: 100%;\n  pointer-events: none;\n  z-index: 1;\n  opacity: {opacity};\n}}\n"
	)
}

/// Season selected by the host page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
	Spring,
	Summer,
	Autumn,
	Winter,
	#[default]
	Tsuyu,
	All,
	None,
}

impl Season {
	/// Parse a `data-season` value. Unknown values fall back to tsuyu.
	pub fn parse(value: &str) -> Self {
		match value.trim().to_ascii_lowercase().as_str() {
			"spring" => Season::Spring,
			"summer" => Season::Summer,
			"autumn" => Season::Autumn,
			"winter" => Season::Winter,
			"all" => Season::All,
			"none" => Season::None,
			_ => Season::Tsuyu,
		}
	}

	/// The single effect shown for this season.
	pub fn effect(self) -> EffectKind {
		match self {
			Season::Spring => EffectKind::Sakura,
			Season::Summer => EffectKind::SummerWillow,
			Season::Autumn => EffectKind::AutumnLeaves,
			Season::Winter => EffectKind::Snow,
			Season::Tsuyu | Season::All | Season::None => EffectKind::Rain,
		}
	}
}
