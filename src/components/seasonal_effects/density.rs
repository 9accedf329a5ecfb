//! Viewport-relative particle counts and sizing.

/// Reference viewport width (px) at which particles render at 1.0x.
const REFERENCE_WIDTH: f64 = 768.0;

/// Number of particles for a viewport: `floor(width / max(1, factor))`,
/// clamped to `[min, max]`.
pub fn compute_density(viewport_width: f64, factor: f64, min: usize, max: usize) -> usize {
	let raw = (viewport_width / factor.max(1.0)).floor();
	// NaN and negative widths collapse to zero before clamping.
	let raw = if raw.is_finite() && raw > 0.0 {
		raw as usize
	} else if raw == f64::INFINITY {
		usize::MAX
	} else {
		0
	};
	raw.clamp(min, max.max(min))
}

/// Device scale applied to petal, flake and leaf sizes.
pub fn size_multiplier(viewport_width: f64) -> f64 {
	(viewport_width / REFERENCE_WIDTH).clamp(0.6, 1.2)
}
