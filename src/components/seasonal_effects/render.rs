//! Canvas rendering for particle fields.
//!
//! Each frame clears the canvas and draws every particle in its own
//! save/translate/rotate scope. Outlines are built from quadratic and cubic
//! curves scaled by the particle's size.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::particles::{LeafVariant, Particle, ParticleField, PetalVariant, Shape};
use super::theme::SAKURA_VEIN;

/// Tilt (radians per unit of wind) applied to willow leaves.
const WILLOW_WIND_TILT: f64 = 0.1;

/// Petals at or below this size skip their veins.
const VEIN_MIN_SIZE: f64 = 6.0;

/// Flakes above this size render as stars instead of discs.
const STAR_MIN_SIZE: f64 = 4.0;

/// Draw one frame of `field` at time `now` (ms) under `wind`.
pub fn draw_field(ctx: &CanvasRenderingContext2d, field: &ParticleField, wind: f64, now: f64) {
	let bounds = field.bounds();
	ctx.clear_rect(0.0, 0.0, bounds.width, bounds.height);

	for p in &field.particles {
		ctx.set_global_alpha(global_alpha(p.shape, p.opacity));
		match p.shape {
			Shape::Raindrop { length } => draw_raindrop(ctx, p, length),
			_ => draw_rotated(ctx, p, wind, now),
		}
	}

	ctx.set_global_alpha(1.0);
}

/// Canvas-wide alpha for a particle. Raindrops carry their opacity in the
/// stroke color instead, so they draw at full global alpha.
fn global_alpha(shape: Shape, opacity: f64) -> f64 {
	match shape {
		Shape::Raindrop { .. } => 1.0,
		_ => opacity,
	}
}

fn draw_raindrop(ctx: &CanvasRenderingContext2d, p: &Particle, length: f64) {
	ctx.set_stroke_style_str(&p.color.with_alpha(p.opacity).to_css());
	ctx.set_line_width(1.0);
	ctx.begin_path();
	ctx.move_to(p.x, p.y);
	ctx.line_to(p.x, p.y + length);
	ctx.stroke();
}

fn draw_rotated(ctx: &CanvasRenderingContext2d, p: &Particle, wind: f64, now: f64) {
	let tilt = match p.shape {
		Shape::Willow { .. } => wind * WILLOW_WIND_TILT,
		_ => 0.0,
	};

	ctx.save();
	let _ = ctx.translate(p.x + p.sway_offset(now), p.y);
	let _ = ctx.rotate(p.rotation + tilt);

	ctx.set_fill_style_str(&p.color.with_alpha(p.opacity).to_css());

	match p.shape {
		Shape::Petal { variant, size } => draw_petal(ctx, size, variant),
		Shape::Flake { size } => {
			if size > STAR_MIN_SIZE {
				draw_star(ctx, size / 2.0, size / 4.0, 6);
			} else {
				ctx.begin_path();
				let _ = ctx.arc(0.0, 0.0, size / 2.0, 0.0, PI * 2.0);
				ctx.fill();
			}
		}
		Shape::Leaf {
			variant: LeafVariant::Maple,
			size,
		} => draw_maple(ctx, size),
		Shape::Leaf {
			variant: LeafVariant::Ginkgo,
			size,
		} => draw_ginkgo(ctx, size),
		Shape::Willow {
			length,
			width,
			curvature,
		} => {
			let outline = p.color.shade(20, 20, 10).with_alpha(p.opacity * 0.8);
			ctx.set_stroke_style_str(&outline.to_css());
			ctx.set_line_width(0.5);
			draw_willow(ctx, length, width, curvature);
		}
		Shape::Raindrop { .. } => {}
	}

	ctx.restore();
}

/// Petal half-extents `(width, height)` before scaling.
fn petal_extent(variant: PetalVariant) -> (f64, f64) {
	match variant {
		PetalVariant::Heart => (4.0, 6.0),
		PetalVariant::DoubleNotch => (3.5, 5.5),
		PetalVariant::Rounded => (3.0, 5.0),
	}
}

fn draw_petal(ctx: &CanvasRenderingContext2d, size: f64, variant: PetalVariant) {
	let scale = size / 10.0;
	let (w, h) = petal_extent(variant);
	let (w, h) = (w * scale, h * scale);

	ctx.begin_path();
	match variant {
		PetalVariant::Heart => {
			ctx.move_to(0.0, h * 0.4);
			ctx.bezier_curve_to(-w * 0.3, h * 0.1, -w * 0.5, -h * 0.1, -w * 0.2, -h * 0.4);
			// Notch at the tip
			ctx.quadratic_curve_to(-w * 0.1, -h * 0.5, 0.0, -h * 0.3);
			ctx.quadratic_curve_to(w * 0.1, -h * 0.5, w * 0.2, -h * 0.4);
			ctx.bezier_curve_to(w * 0.5, -h * 0.1, w * 0.3, h * 0.1, 0.0, h * 0.4);
		}
		PetalVariant::DoubleNotch => {
			ctx.move_to(0.0, h * 0.3);
			ctx.bezier_curve_to(-w * 0.4, 0.0, -w * 0.3, -h * 0.3, -w * 0.2, -h * 0.4);
			ctx.quadratic_curve_to(-w * 0.2, -h * 0.4, -w * 0.1, -h * 0.2);
			ctx.quadratic_curve_to(0.0, -h * 0.5, w * 0.1, -h * 0.2);
			ctx.quadratic_curve_to(w * 0.2, -h * 0.4, w * 0.2, -h * 0.4);
			ctx.bezier_curve_to(w * 0.3, -h * 0.3, w * 0.4, 0.0, 0.0, h * 0.3);
		}
		PetalVariant::Rounded => {
			ctx.move_to(0.0, h * 0.4);
			ctx.bezier_curve_to(-w * 0.3, h * 0.1, -w * 0.4, -h * 0.2, -w * 0.1, -h * 0.4);
			ctx.quadratic_curve_to(0.0, -h * 0.5, w * 0.1, -h * 0.4);
			ctx.bezier_curve_to(w * 0.4, -h * 0.2, w * 0.3, h * 0.1, 0.0, h * 0.4);
		}
	}
	ctx.fill();

	if size > VEIN_MIN_SIZE {
		ctx.set_stroke_style_str(&SAKURA_VEIN.to_css());
		ctx.set_line_width(0.5);
		ctx.begin_path();
		ctx.move_to(0.0, h * 0.3);
		ctx.line_to(0.0, -h * 0.2);
		ctx.move_to(0.0, 0.0);
		ctx.line_to(-w * 0.15, -h * 0.15);
		ctx.move_to(0.0, 0.0);
		ctx.line_to(w * 0.15, -h * 0.15);
		ctx.stroke();
	}
}

/// Star polygon alternating between outer and inner radius, starting at the top.
fn draw_star(ctx: &CanvasRenderingContext2d, outer: f64, inner: f64, spikes: u32) {
	let step = PI / spikes as f64;
	let mut rot = PI / 2.0 * 3.0;

	ctx.begin_path();
	ctx.move_to(0.0, -outer);
	for _ in 0..spikes {
		ctx.line_to(rot.cos() * outer, rot.sin() * outer);
		rot += step;
		ctx.line_to(rot.cos() * inner, rot.sin() * inner);
		rot += step;
	}
	ctx.line_to(0.0, -outer);
	ctx.close_path();
	ctx.fill();
}

/// Palmate maple outline, in units of `size / 15`.
const MAPLE_OUTLINE: [(f64, f64); 14] = [
	(0.0, -9.0),
	(-2.0, -6.0),
	(-7.0, -8.0),
	(-4.0, -3.0),
	(-9.0, -2.0),
	(-5.0, 1.0),
	(-7.0, 6.0),
	(0.0, 3.0),
	(7.0, 6.0),
	(5.0, 1.0),
	(9.0, -2.0),
	(4.0, -3.0),
	(7.0, -8.0),
	(2.0, -6.0),
];

fn draw_maple(ctx: &CanvasRenderingContext2d, size: f64) {
	let s = size / 15.0;
	ctx.begin_path();
	let (x0, y0) = MAPLE_OUTLINE[0];
	ctx.move_to(x0 * s, y0 * s);
	for &(x, y) in &MAPLE_OUTLINE[1..] {
		ctx.line_to(x * s, y * s);
	}
	ctx.close_path();
	ctx.fill();
}

fn draw_ginkgo(ctx: &CanvasRenderingContext2d, size: f64) {
	let s = size / 22.0;

	// Fan with a flat, lightly scalloped top edge
	ctx.begin_path();
	ctx.move_to(0.0, 6.2 * s);
	ctx.quadratic_curve_to(-9.0 * s, 4.5 * s, -13.0 * s, 0.6 * s);
	ctx.quadratic_curve_to(-14.0 * s, -1.8 * s, -8.0 * s, -5.6 * s);
	ctx.quadratic_curve_to(-4.0 * s, -6.6 * s, -2.0 * s, -6.6 * s);
	ctx.line_to(2.0 * s, -6.6 * s);
	ctx.quadratic_curve_to(4.0 * s, -6.4 * s, 8.0 * s, -5.6 * s);
	ctx.quadratic_curve_to(14.0 * s, -1.8 * s, 13.0 * s, 0.6 * s);
	ctx.quadratic_curve_to(9.0 * s, 4.5 * s, 0.0, 6.2 * s);
	ctx.close_path();
	ctx.fill();

	// Punch the central V notch out of what was just drawn
	let _ = ctx.set_global_composite_operation("destination-out");
	ctx.begin_path();
	ctx.move_to(0.0, -0.3 * s);
	ctx.quadratic_curve_to(-3.4 * s, -3.9 * s, 0.0, -6.9 * s);
	ctx.quadratic_curve_to(3.4 * s, -3.9 * s, 0.0, -0.3 * s);
	ctx.close_path();
	ctx.fill();
	let _ = ctx.set_global_composite_operation("source-over");
}

fn draw_willow(ctx: &CanvasRenderingContext2d, length: f64, width: f64, curvature: f64) {
	let (hl, hw) = (length / 2.0, width / 2.0);

	ctx.begin_path();
	ctx.move_to(0.0, -hl);
	ctx.quadratic_curve_to(hw + curvature * 10.0, -hl * 0.3, hw, 0.0);
	ctx.quadratic_curve_to(hw - curvature * 5.0, hl * 0.3, 0.0, hl);
	ctx.quadratic_curve_to(-hw + curvature * 5.0, hl * 0.3, -hw, 0.0);
	ctx.quadratic_curve_to(-hw - curvature * 10.0, -hl * 0.3, 0.0, -hl);
	ctx.close_path();
	ctx.fill();

	// Center line
	ctx.begin_path();
	ctx.move_to(0.0, -hl * 0.8);
	ctx.quadratic_curve_to(curvature * 3.0, 0.0, 0.0, hl * 0.8);
	ctx.stroke();
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::seasonal_effects::theme::Palette;

	#[test]
	fn maple_outline_is_mirror_symmetric() {
		let pts = &MAPLE_OUTLINE;
		for i in 1..7 {
			let (lx, ly) = pts[i];
			let (rx, ry) = pts[pts.len() - i];
			assert_eq!(lx, -rx);
			assert_eq!(ly, ry);
		}
	}

	#[test]
	fn raindrop_opacity_applies_once() {
		let drop = Shape::Raindrop { length: 20.0 };
		let color = Palette::RAIN.colors[0].with_alpha(0.25);
		assert_eq!(global_alpha(drop, 0.25) * color.a, 0.25);

		let flake = Shape::Flake { size: 3.0 };
		assert_eq!(global_alpha(flake, 0.7), 0.7);
	}

	#[test]
	fn petal_extents_shrink_by_variant() {
		let heart = petal_extent(PetalVariant::Heart);
		let notch = petal_extent(PetalVariant::DoubleNotch);
		let round = petal_extent(PetalVariant::Rounded);
		assert!(heart.0 > notch.0 && notch.0 > round.0);
		assert!(heart.1 > notch.1 && notch.1 > round.1);
	}
}
