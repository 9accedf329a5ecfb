//! Seasonal falling-particle backgrounds.
//!
//! Five effects share one engine:
//! - Rain: thin vertical streaks for tsuyu and the fallback seasons
//! - Sakura: swaying petals in spring
//! - Summer willow: long curved leaves that sway in the wind
//! - Autumn leaves: tumbling maple and ginkgo
//! - Snow: flakes and stars that wrap at the sides
//!
//! Each effect draws on its own fixed, click-through canvas. Particle counts
//! scale with viewport width; a slowly retargeting wind pushes everything
//! sideways. The [`Orchestrator`] keeps at most one effect alive at a time.
//!
//! # Example
//!
//! ```ignore
//! use shuka_effects::{CanvasSpawner, Orchestrator, Season};
//!
//! let mut effects = Orchestrator::new(CanvasSpawner, true, Season::Spring);
//! effects.set_season(Season::Spring);
//! effects.toggle_effects(false);
//! ```

mod canvas;
pub mod clock;
mod controller;
pub mod density;
mod error;
mod kinds;
pub mod particles;
mod render;
pub mod theme;
pub mod wind;

pub use canvas::{CanvasEffect, CanvasSpawner};
pub use controller::{EffectController, EffectHandle, EffectSpawner, Orchestrator};
pub use error::EffectError;
pub use kinds::{EdgePolicy, EffectKind, Season, full_screen_canvas_css};
