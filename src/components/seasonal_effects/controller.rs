//! Effect lifecycle and season orchestration.
//!
//! An [`EffectController`] owns at most one live instance of its effect. The
//! [`Orchestrator`] holds one controller per kind and keeps at most one of them
//! live: every season change or global toggle disables all effects first,
//! then enables only the effect mapped to the current season.
//!
//! Instances come from an [`EffectSpawner`], so the lifecycle rules here run
//! the same against real canvases and against test doubles.

use log::{debug, error, info};

use super::error::EffectError;
use super::kinds::{EffectKind, Season};

/// A live effect instance.
pub trait EffectHandle {
	fn kind(&self) -> EffectKind;

	/// Show the instance again after it was hidden.
	fn reveal(&self);

	/// Stop animating and detach. Must tolerate repeated calls.
	fn destroy(&mut self);
}

/// Creates live instances of an effect.
pub trait EffectSpawner {
	type Handle: EffectHandle;

	fn spawn(&mut self, kind: EffectKind) -> Result<Self::Handle, EffectError>;
}

/// Lifecycle owner for a single effect kind.
pub struct EffectController<H> {
	kind: EffectKind,
	instance: Option<H>,
}

impl<H: EffectHandle> EffectController<H> {
	pub fn new(kind: EffectKind) -> Self {
		Self {
			kind,
			instance: None,
		}
	}

	pub fn kind(&self) -> EffectKind {
		self.kind
	}

	pub fn instance(&self) -> Option<&H> {
		self.instance.as_ref()
	}

	pub fn is_active(&self) -> bool {
		self.instance.is_some()
	}

	/// Start the effect if effects are globally enabled.
	///
	/// An existing instance is revealed rather than rebuilt. Spawn failures
	/// are logged and leave the controller empty.
	pub fn enable<S>(&mut self, globally_enabled: bool, spawner: &mut S)
	where
		S: EffectSpawner<Handle = H>,
	{
		if !globally_enabled {
			return;
		}
		if let Some(ref existing) = self.instance {
			existing.reveal();
			return;
		}
		match spawner.spawn(self.kind) {
			Ok(handle) => {
				debug!("seasonal-effects: enabled {}", self.kind);
				self.instance = Some(handle);
			}
			Err(e) => error!("seasonal-effects: failed to start {}: {}", self.kind, e),
		}
	}

	/// Destroy the live instance, if any.
	pub fn disable(&mut self) {
		if let Some(mut handle) = self.instance.take() {
			handle.destroy();
			debug!("seasonal-effects: disabled {}", self.kind);
		}
	}
}

/// Keeps exactly the current season's effect running.
pub struct Orchestrator<S: EffectSpawner> {
	spawner: S,
	enabled: bool,
	season: Season,
	controllers: [EffectController<S::Handle>; 5],
}

impl<S: EffectSpawner> Orchestrator<S> {
	/// Idle orchestrator; nothing runs until [`Self::set_season`] or
	/// [`Self::toggle_effects`] is called.
	pub fn new(spawner: S, enabled: bool, season: Season) -> Self {
		Self {
			spawner,
			enabled,
			season,
			controllers: EffectKind::ALL.map(EffectController::new),
		}
	}

	pub fn is_enabled(&self) -> bool {
		self.enabled
	}

	pub fn season(&self) -> Season {
		self.season
	}

	pub fn spawner(&self) -> &S {
		&self.spawner
	}

	pub fn instance(&self, kind: EffectKind) -> Option<&S::Handle> {
		self.controllers[kind.index()].instance()
	}

	/// Kinds that currently have a live instance.
	pub fn active_kinds(&self) -> Vec<EffectKind> {
		self.controllers
			.iter()
			.filter(|c| c.is_active())
			.map(|c| c.kind())
			.collect()
	}

	pub fn enable(&mut self, kind: EffectKind) {
		let enabled = self.enabled;
		self.controllers[kind.index()].enable(enabled, &mut self.spawner);
	}

	pub fn disable(&mut self, kind: EffectKind) {
		self.controllers[kind.index()].disable();
	}

	pub fn disable_all(&mut self) {
		for c in &mut self.controllers {
			c.disable();
		}
	}

	/// Flip the global flag. Disabling tears everything down; enabling
	/// starts the current season's effect.
	pub fn toggle_effects(&mut self, enabled: bool) {
		self.enabled = enabled;
		self.disable_all();
		if enabled {
			self.enable(self.season.effect());
		}
		info!(
			"seasonal-effects: effects {}",
			if enabled { "enabled" } else { "disabled" }
		);
	}

	/// Switch to `season`, replacing whatever effect was running.
	pub fn set_season(&mut self, season: Season) {
		self.season = season;
		self.disable_all();
		if self.enabled {
			self.enable(season.effect());
		}
		info!(
			"seasonal-effects: season {:?} -> {}",
			season,
			season.effect()
		);
	}
}
