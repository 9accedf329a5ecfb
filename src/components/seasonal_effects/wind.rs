//! Shared wind model.
//!
//! Every effect keeps one [`WindState`] that drifts toward a randomly chosen
//! target. The target is re-rolled once per `interval` and the live value is
//! eased toward it each frame, so the whole field sways together.

use rand::Rng;

/// Live wind value plus the target it is easing toward.
#[derive(Clone, Debug, Default)]
pub struct WindState {
	pub current: f64,
	pub target: f64,
	/// Timestamp (ms) of the last target change.
	pub last_change: f64,
}

impl WindState {
	/// Calm wind whose first target change is `interval` ms after `now`.
	pub fn new(now: f64) -> Self {
		Self {
			current: 0.0,
			target: 0.0,
			last_change: now,
		}
	}
}

/// Per-effect wind personality.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindOptions {
	/// Milliseconds between target re-rolls.
	pub interval: f64,
	/// Fraction of the remaining gap closed per update, clamped to [0, 1].
	pub ease: f64,
	/// Targets are drawn from `[-range, range]`.
	pub range: f64,
}

impl Default for WindOptions {
	fn default() -> Self {
		Self {
			interval: 4000.0,
			ease: 0.02,
			range: 1.0,
		}
	}
}

impl WindOptions {
	/// Rain keeps a zero range, so its wind never leaves 0.
	pub const RAIN: Self = Self {
		interval: 3500.0,
		ease: 0.05,
		range: 0.0,
	};
	pub const SAKURA: Self = Self {
		interval: 4000.0,
		ease: 0.015,
		range: 2.5,
	};
	pub const SNOW: Self = Self {
		interval: 4000.0,
		ease: 0.01,
		range: 0.5,
	};
	pub const AUTUMN_LEAVES: Self = Self {
		interval: 3500.0,
		ease: 0.015,
		range: 1.5,
	};
	pub const SUMMER_WILLOW: Self = Self {
		interval: 3000.0,
		ease: 0.02,
		range: 3.5,
	};
}

/// Advance the wind and return the new live value.
///
/// If more than `interval` ms passed since the last change, a fresh target is
/// drawn uniformly from `[-range, range]` and `now` becomes the change time.
/// The live value then moves `ease` of the way toward the target.
pub fn update_wind<R: Rng + ?Sized>(
	state: &mut WindState,
	now: f64,
	opts: &WindOptions,
	rng: &mut R,
) -> f64 {
	let ease = opts.ease.clamp(0.0, 1.0);

	if now - state.last_change > opts.interval {
		state.target = (rng.r#gen::<f64>() * 2.0 - 1.0) * opts.range;
		state.last_change = now;
	}
	state.current += (state.target - state.current) * ease;
	state.current
}
