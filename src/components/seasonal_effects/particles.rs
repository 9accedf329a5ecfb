//! Particle factories and per-frame simulation for every seasonal effect.
//!
//! A [`ParticleField`] owns a fixed number of particles sized from the viewport
//! width. Each frame [`ParticleField::step`] integrates motion with per-frame
//! constants and recycles particles that leave the canvas by overwriting them
//! in place, so the field never reallocates while running.

use std::f64::consts::TAU;

use rand::Rng;

use super::density::{compute_density, size_multiplier};
use super::kinds::{EdgePolicy, EffectKind};
use super::theme::{Color, Palette};

/// Sakura petal outline variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PetalVariant {
	/// Classic heart with a single notch.
	Heart,
	/// Narrower petal with a deeper double notch.
	DoubleNotch,
	/// Soft rounded tip.
	Rounded,
}

/// Autumn leaf species.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeafVariant {
	Maple,
	Ginkgo,
}

/// What a particle looks like and how big it is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
	Raindrop { length: f64 },
	Petal { variant: PetalVariant, size: f64 },
	Flake { size: f64 },
	Leaf { variant: LeafVariant, size: f64 },
	Willow { length: f64, width: f64, curvature: f64 },
}

/// Side-to-side pendulum applied at draw time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sway {
	pub amplitude: f64,
	pub speed: f64,
	pub offset: f64,
}

/// A single falling particle.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	pub shape: Shape,
	/// Pixels fallen per frame.
	pub speed: f64,
	pub opacity: f64,
	/// Constant horizontal drift per frame.
	pub drift: f64,
	pub rotation: f64,
	pub rotation_speed: f64,
	pub turbulence: f64,
	pub phase: f64,
	/// Fraction of the wind a willow leaf catches.
	pub wind_resistance: f64,
	pub sway: Option<Sway>,
	pub color: Color,
}

/// Canvas size in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub width: f64,
	pub height: f64,
}

/// Result of checking a particle against the canvas edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Containment {
	Inside,
	Wrapped,
	Respawned,
}

/// Uniform sample in `[lo, hi)`; tolerates empty ranges.
fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
	lo + rng.r#gen::<f64>() * (hi - lo)
}

impl Particle {
	/// Build a fresh particle for `kind`.
	///
	/// With `initial` the particle is scattered over the whole canvas height;
	/// otherwise it starts just above the top edge.
	pub fn spawn<R: Rng + ?Sized>(
		kind: EffectKind,
		bounds: Bounds,
		size_mult: f64,
		initial: bool,
		rng: &mut R,
	) -> Self {
		let x = uniform(rng, 0.0, bounds.width);
		let scatter_y = uniform(rng, 0.0, bounds.height);
		let base = Particle {
			x,
			y: 0.0,
			shape: Shape::Flake { size: 0.0 },
			speed: 0.0,
			opacity: 1.0,
			drift: 0.0,
			rotation: 0.0,
			rotation_speed: 0.0,
			turbulence: 0.0,
			phase: 0.0,
			wind_resistance: 0.0,
			sway: None,
			color: Palette::SNOW.colors[0],
		};

		let mut p = match kind {
			EffectKind::Rain => {
				let length = uniform(rng, 10.0, 30.0);
				Particle {
					y: -length,
					shape: Shape::Raindrop { length },
					speed: uniform(rng, 2.0, 8.0),
					opacity: uniform(rng, 0.1, 0.4),
					color: Palette::RAIN.pick(rng),
					..base
				}
			}
			EffectKind::Sakura => {
				let size = uniform(rng, 7.0, 20.0) * size_mult;
				let variant = match rng.gen_range(0..3) {
					0 => PetalVariant::Heart,
					1 => PetalVariant::DoubleNotch,
					_ => PetalVariant::Rounded,
				};
				Particle {
					y: -20.0,
					shape: Shape::Petal { variant, size },
					speed: uniform(rng, 0.35, 1.15),
					opacity: uniform(rng, 0.7, 1.0),
					drift: uniform(rng, -0.3, 0.3),
					rotation_speed: uniform(rng, -1.0, 1.0),
					rotation: uniform(rng, 0.0, TAU),
					turbulence: uniform(rng, 0.25, 0.75),
					phase: uniform(rng, 0.0, TAU),
					color: Palette::SAKURA.pick(rng),
					..base
				}
			}
			EffectKind::Snow => Particle {
				y: -20.0,
				shape: Shape::Flake {
					size: uniform(rng, 2.0, 8.0) * size_mult,
				},
				speed: uniform(rng, 0.5, 2.0),
				opacity: uniform(rng, 0.4, 1.0),
				drift: uniform(rng, -0.25, 0.25),
				rotation_speed: uniform(rng, -1.0, 1.0),
				color: Palette::SNOW.pick(rng),
				..base
			},
			EffectKind::AutumnLeaves => {
				let variant = if rng.gen_bool(0.5) {
					LeafVariant::Maple
				} else {
					LeafVariant::Ginkgo
				};
				let palette = match variant {
					LeafVariant::Maple => Palette::MAPLE,
					LeafVariant::Ginkgo => Palette::GINKGO,
				};
				Particle {
					y: -50.0,
					shape: Shape::Leaf {
						variant,
						size: uniform(rng, 7.0, 17.0) * size_mult,
					},
					speed: uniform(rng, 0.8, 2.0),
					opacity: uniform(rng, 0.6, 1.0),
					drift: uniform(rng, -0.5, 0.5),
					rotation_speed: uniform(rng, -1.5, 1.5),
					rotation: uniform(rng, 0.0, TAU),
					sway: Some(Sway {
						amplitude: uniform(rng, 20.0, 50.0),
						speed: uniform(rng, 0.02, 0.05),
						offset: uniform(rng, 0.0, TAU),
					}),
					color: palette.pick(rng),
					..base
				}
			}
			EffectKind::SummerWillow => Particle {
				y: -30.0,
				shape: Shape::Willow {
					length: uniform(rng, 15.0, 40.0),
					width: uniform(rng, 3.0, 7.0),
					curvature: uniform(rng, 0.1, 0.4),
				},
				speed: uniform(rng, 0.4, 1.2),
				opacity: uniform(rng, 0.5, 0.9),
				drift: uniform(rng, -1.0, 1.0),
				rotation_speed: uniform(rng, -1.25, 1.25),
				rotation: uniform(rng, 0.0, TAU),
				sway: Some(Sway {
					amplitude: uniform(rng, 50.0, 110.0),
					speed: uniform(rng, 0.02, 0.045),
					offset: uniform(rng, 0.0, TAU),
				}),
				wind_resistance: uniform(rng, 0.3, 1.0),
				turbulence: uniform(rng, 0.0, 0.5),
				color: Palette::WILLOW.pick(rng),
				..base
			},
		};

		if initial {
			p.y = scatter_y;
		}
		p
	}

	/// Horizontal sway offset applied when drawing (leaf-like particles only).
	pub fn sway_offset(&self, now: f64) -> f64 {
		match self.sway {
			Some(s) => ((now * 0.001) * s.speed + s.offset).sin() * s.amplitude,
			None => 0.0,
		}
	}

	/// Advance one frame of motion for `kind` under the current wind.
	pub fn advance(&mut self, kind: EffectKind, wind: f64, now: f64) {
		match kind {
			EffectKind::Rain => {
				self.y += self.speed;
			}
			EffectKind::Sakura => {
				let t = now / 1000.0;
				let sway = (t * (0.8 + self.turbulence) + self.phase).sin()
					* (0.6 + self.turbulence * 1.4);
				self.x += wind + self.drift + sway * 0.6;
				self.y += self.speed + (t * 0.9 + self.phase).cos() * 0.15;
				self.rotation +=
					self.rotation_speed * 0.015 + (t * 0.6 + self.phase).sin() * 0.002;
			}
			EffectKind::Snow | EffectKind::AutumnLeaves => {
				self.x += wind + self.drift;
				self.y += self.speed;
				self.rotation += self.rotation_speed * 0.02;
			}
			EffectKind::SummerWillow => {
				let force = wind * self.wind_resistance;
				let turbulence_x = (now * 0.001 * self.turbulence).sin() * 0.5;
				let turbulence_y = (now * 0.0015 * self.turbulence).cos() * 0.3;
				self.x += force + self.drift + turbulence_x;
				self.y += self.speed + force.abs() * 0.1 + turbulence_y;
				self.rotation += self.rotation_speed * 0.02 + force.abs() * 0.01;
			}
		}
	}
}

/// Fixed-size particle collection for one effect.
#[derive(Clone, Debug)]
pub struct ParticleField {
	pub kind: EffectKind,
	pub particles: Vec<Particle>,
	bounds: Bounds,
	size_mult: f64,
}

impl ParticleField {
	/// Populate a field for a viewport of the given size, scattered over its height.
	pub fn new<R: Rng + ?Sized>(kind: EffectKind, bounds: Bounds, rng: &mut R) -> Self {
		let (min, max) = kind.density_bounds();
		let count = compute_density(bounds.width, kind.density_factor(), min, max);
		let size_mult = if kind.uses_size_multiplier() {
			size_multiplier(bounds.width)
		} else {
			1.0
		};

		let particles = (0..count)
			.map(|_| Particle::spawn(kind, bounds, size_mult, true, rng))
			.collect();

		Self {
			kind,
			particles,
			bounds,
			size_mult,
		}
	}

	pub fn bounds(&self) -> Bounds {
		self.bounds
	}

	pub fn size_multiplier(&self) -> f64 {
		self.size_mult
	}

	/// Move every particle one frame and recycle the ones that left the canvas.
	pub fn step<R: Rng + ?Sized>(&mut self, wind: f64, now: f64, rng: &mut R) {
		for i in 0..self.particles.len() {
			self.particles[i].advance(self.kind, wind, now);
			self.contain(i, rng);
		}
	}

	/// Apply the edge policy to one particle.
	pub fn contain<R: Rng + ?Sized>(&mut self, index: usize, rng: &mut R) -> Containment {
		let (kind, bounds, size_mult) = (self.kind, self.bounds, self.size_mult);
		let margin = kind.margin();
		let Some(p) = self.particles.get_mut(index) else {
			return Containment::Inside;
		};

		let mut outcome = Containment::Inside;
		let off_left = p.x < -margin;
		let off_right = p.x > bounds.width + margin;

		match kind.edge_policy() {
			EdgePolicy::Wrap => {
				if off_left {
					p.x = bounds.width + margin;
					outcome = Containment::Wrapped;
				} else if off_right {
					p.x = -margin;
					outcome = Containment::Wrapped;
				}
				if p.y > bounds.height + margin {
					*p = Particle::spawn(kind, bounds, size_mult, false, rng);
					outcome = Containment::Respawned;
				}
			}
			EdgePolicy::Respawn => {
				if p.y > bounds.height + margin || off_left || off_right {
					*p = Particle::spawn(kind, bounds, size_mult, false, rng);
					outcome = Containment::Respawned;
				}
			}
		}
		outcome
	}

	/// Adopt a new canvas size. Existing particles keep their positions.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.bounds = Bounds { width, height };
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand_chacha::ChaCha8Rng;

	const VIEW: Bounds = Bounds {
		width: 1024.0,
		height: 768.0,
	};

	fn rng() -> ChaCha8Rng {
		ChaCha8Rng::seed_from_u64(2024)
	}

	#[test]
	fn field_sizes_follow_density() {
		let mut rng = rng();
		assert_eq!(
			ParticleField::new(EffectKind::Sakura, VIEW, &mut rng).particles.len(),
			68
		);
		assert_eq!(
			ParticleField::new(EffectKind::Rain, VIEW, &mut rng).particles.len(),
			409
		);
		assert_eq!(
			ParticleField::new(EffectKind::Snow, VIEW, &mut rng).particles.len(),
			128
		);
		assert_eq!(
			ParticleField::new(EffectKind::SummerWillow, VIEW, &mut rng)
				.particles
				.len(),
			102
		);
		let narrow = Bounds {
			width: 100.0,
			height: 600.0,
		};
		assert_eq!(
			ParticleField::new(EffectKind::AutumnLeaves, narrow, &mut rng)
				.particles
				.len(),
			8
		);
	}

	#[test]
	fn initial_particles_scatter_over_canvas() {
		let mut rng = rng();
		let field = ParticleField::new(EffectKind::Sakura, VIEW, &mut rng);
		for p in &field.particles {
			assert!(p.y >= 0.0 && p.y < VIEW.height);
			assert!(p.x >= 0.0 && p.x < VIEW.width);
		}
		let mean = field.particles.iter().map(|p| p.y).sum::<f64>() / 68.0;
		assert!(mean > VIEW.height * 0.3 && mean < VIEW.height * 0.7);
	}

	#[test]
	fn factory_ranges() {
		let mut rng = rng();
		let mult = 1.2;
		for _ in 0..300 {
			let rain = Particle::spawn(EffectKind::Rain, VIEW, 1.0, false, &mut rng);
			let Shape::Raindrop { length } = rain.shape else {
				panic!("rain must be a raindrop");
			};
			assert!((10.0..30.0).contains(&length));
			assert!((2.0..8.0).contains(&rain.speed));
			assert!((0.1..0.4).contains(&rain.opacity));
			assert_eq!(rain.y, -length);

			let petal = Particle::spawn(EffectKind::Sakura, VIEW, mult, false, &mut rng);
			let Shape::Petal { size, .. } = petal.shape else {
				panic!("sakura must be a petal");
			};
			assert!((7.0 * mult..20.0 * mult).contains(&size));
			assert!((0.35..1.15).contains(&petal.speed));
			assert!(petal.drift.abs() <= 0.3);
			assert!(petal.rotation_speed.abs() <= 1.0);
			assert!((0.25..0.75).contains(&petal.turbulence));
			assert!(Palette::SAKURA.contains(petal.color));
			assert_eq!(petal.y, -20.0);

			let flake = Particle::spawn(EffectKind::Snow, VIEW, mult, false, &mut rng);
			let Shape::Flake { size } = flake.shape else {
				panic!("snow must be a flake");
			};
			assert!((2.0 * mult..8.0 * mult).contains(&size));
			assert!((0.5..2.0).contains(&flake.speed));
			assert!(flake.drift.abs() <= 0.25);

			let leaf = Particle::spawn(EffectKind::AutumnLeaves, VIEW, mult, false, &mut rng);
			let Shape::Leaf { variant, size } = leaf.shape else {
				panic!("autumn must be a leaf");
			};
			assert!((7.0 * mult..17.0 * mult).contains(&size));
			assert!((0.8..2.0).contains(&leaf.speed));
			let sway = leaf.sway.expect("leaves sway");
			assert!((20.0..50.0).contains(&sway.amplitude));
			match variant {
				LeafVariant::Maple => assert!(Palette::MAPLE.contains(leaf.color)),
				LeafVariant::Ginkgo => assert!(Palette::GINKGO.contains(leaf.color)),
			}

			let willow = Particle::spawn(EffectKind::SummerWillow, VIEW, 1.0, false, &mut rng);
			let Shape::Willow {
				length,
				width,
				curvature,
			} = willow.shape
			else {
				panic!("willow must be a willow leaf");
			};
			assert!((15.0..40.0).contains(&length));
			assert!((3.0..7.0).contains(&width));
			assert!((0.1..0.4).contains(&curvature));
			assert!((0.3..1.0).contains(&willow.wind_resistance));
			assert!((50.0..110.0).contains(&willow.sway.expect("willow sways").amplitude));
			assert!(Palette::WILLOW.contains(willow.color));
		}
	}

	#[test]
	fn both_leaf_variants_and_all_petals_appear() {
		let mut rng = rng();
		let leaves: Vec<_> = (0..100)
			.map(|_| Particle::spawn(EffectKind::AutumnLeaves, VIEW, 1.0, true, &mut rng).shape)
			.collect();
		assert!(leaves.iter().any(|s| matches!(
			s,
			Shape::Leaf {
				variant: LeafVariant::Maple,
				..
			}
		)));
		assert!(leaves.iter().any(|s| matches!(
			s,
			Shape::Leaf {
				variant: LeafVariant::Ginkgo,
				..
			}
		)));

		let petals: Vec<_> = (0..100)
			.map(|_| Particle::spawn(EffectKind::Sakura, VIEW, 1.0, true, &mut rng).shape)
			.collect();
		for v in [
			PetalVariant::Heart,
			PetalVariant::DoubleNotch,
			PetalVariant::Rounded,
		] {
			assert!(petals
				.iter()
				.any(|s| matches!(s, Shape::Petal { variant, .. } if *variant == v)));
		}
	}

	#[test]
	fn respawn_keeps_particles_contained() {
		for kind in [
			EffectKind::Rain,
			EffectKind::Sakura,
			EffectKind::AutumnLeaves,
			EffectKind::SummerWillow,
		] {
			let mut rng = rng();
			let mut field = ParticleField::new(kind, VIEW, &mut rng);
			let margin = kind.margin();
			for frame in 0..2000 {
				let wind = ((frame as f64) * 0.01).sin() * kind.wind().range;
				field.step(wind, frame as f64 * 16.7, &mut rng);
				for p in &field.particles {
					assert!(p.y <= VIEW.height + margin, "{kind} escaped the bottom");
					assert!(p.x >= -margin && p.x <= VIEW.width + margin);
				}
			}
		}
	}

	#[test]
	fn bottom_exit_respawns_above_canvas() {
		let mut rng = rng();
		let mut field = ParticleField::new(EffectKind::Rain, VIEW, &mut rng);
		field.particles[0].y = VIEW.height + 51.0;
		assert_eq!(field.contain(0, &mut rng), Containment::Respawned);
		let p = &field.particles[0];
		assert!(p.y < 0.0);
		assert!(p.x >= 0.0 && p.x < VIEW.width);
	}

	#[test]
	fn sideways_exit_respawns_for_leaves() {
		let mut rng = rng();
		let mut field = ParticleField::new(EffectKind::SummerWillow, VIEW, &mut rng);
		field.particles[3].x = -61.0;
		field.particles[3].y = 100.0;
		assert_eq!(field.contain(3, &mut rng), Containment::Respawned);
		assert_eq!(field.particles[3].y, -30.0);
	}

	#[test]
	fn snow_wraps_horizontally_without_touching_other_fields() {
		let mut rng = rng();
		let mut field = ParticleField::new(EffectKind::Snow, VIEW, &mut rng);

		field.particles[0].x = -20.5;
		let before = field.particles[0].clone();
		assert_eq!(field.contain(0, &mut rng), Containment::Wrapped);
		let after = &field.particles[0];
		assert_eq!(after.x, VIEW.width + 20.0);
		assert_eq!(after.y, before.y);
		assert_eq!(after.speed, before.speed);
		assert_eq!(after.shape, before.shape);

		field.particles[1].x = VIEW.width + 20.5;
		let before = field.particles[1].clone();
		assert_eq!(field.contain(1, &mut rng), Containment::Wrapped);
		assert_eq!(field.particles[1].x, -20.0);
		assert_eq!(field.particles[1].y, before.y);
	}

	#[test]
	fn snow_bottom_exit_respawns() {
		let mut rng = rng();
		let mut field = ParticleField::new(EffectKind::Snow, VIEW, &mut rng);
		field.particles[2].y = VIEW.height + 21.0;
		assert_eq!(field.contain(2, &mut rng), Containment::Respawned);
		assert_eq!(field.particles[2].y, -20.0);
	}

	#[test]
	fn rain_falls_straight() {
		let mut rng = rng();
		let mut field = ParticleField::new(EffectKind::Rain, VIEW, &mut rng);
		field.particles[0].y = 10.0;
		let (x, speed) = (field.particles[0].x, field.particles[0].speed);
		field.step(3.0, 1000.0, &mut rng);
		assert_eq!(field.particles[0].x, x);
		assert_eq!(field.particles[0].y, 10.0 + speed);
	}

	#[test]
	fn snow_moves_with_wind_and_drift() {
		let mut rng = rng();
		let mut field = ParticleField::new(EffectKind::Snow, VIEW, &mut rng);
		field.particles[0].x = 500.0;
		field.particles[0].y = 100.0;
		let p = field.particles[0].clone();
		field.step(0.4, 0.0, &mut rng);
		let q = &field.particles[0];
		assert!((q.x - (500.0 + 0.4 + p.drift)).abs() < 1e-9);
		assert!((q.y - (100.0 + p.speed)).abs() < 1e-9);
		assert!((q.rotation - (p.rotation + p.rotation_speed * 0.02)).abs() < 1e-9);
	}

	#[test]
	fn sway_offset_is_bounded() {
		let mut rng = rng();
		let leaf = Particle::spawn(EffectKind::AutumnLeaves, VIEW, 1.0, true, &mut rng);
		let amp = leaf.sway.expect("leaves sway").amplitude;
		for t in 0..100 {
			assert!(leaf.sway_offset(t as f64 * 977.0).abs() <= amp);
		}
		let flake = Particle::spawn(EffectKind::Snow, VIEW, 1.0, true, &mut rng);
		assert_eq!(flake.sway_offset(1234.0), 0.0);
	}

	#[test]
	fn resize_updates_bounds_only() {
		let mut rng = rng();
		let mut field = ParticleField::new(EffectKind::SummerWillow, VIEW, &mut rng);
		let count = field.particles.len();
		field.resize(400.0, 300.0);
		assert_eq!(field.bounds().width, 400.0);
		assert_eq!(field.particles.len(), count);
		assert_eq!(field.size_multiplier(), 1.0);
	}

	#[test]
	fn empty_canvas_does_not_panic() {
		let mut rng = rng();
		let zero = Bounds {
			width: 0.0,
			height: 0.0,
		};
		let field = ParticleField::new(EffectKind::Snow, zero, &mut rng);
		assert!(field.particles.is_empty());
		let p = Particle::spawn(EffectKind::Sakura, zero, 1.0, true, &mut rng);
		assert_eq!((p.x, p.y), (0.0, 0.0));
	}
}
