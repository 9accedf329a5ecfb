//! A live effect mounted into the page.
//!
//! [`CanvasEffect::mount`] appends a full-screen canvas to `<body>`, builds the
//! particle field and starts a `requestAnimationFrame` loop. The loop stops
//! when the running flag is cleared or the canvas leaves the document;
//! [`CanvasEffect::destroy`] clears the flag, cancels the pending frame and
//! removes the canvas.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::clock::{DeltaClock, now_ms};
use super::controller::{EffectHandle, EffectSpawner};
use super::error::EffectError;
use super::kinds::EffectKind;
use super::particles::{Bounds, ParticleField};
use super::render;
use super::wind::{WindState, update_wind};

/// Frames longer than this (seconds) are logged as stalls.
const STALL_SECS: f64 = 1.0;

/// Mutable per-frame simulation state.
struct Simulation {
	field: ParticleField,
	wind: WindState,
	clock: DeltaClock,
	rng: ChaCha8Rng,
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// One running seasonal effect and the canvas it draws on.
pub struct CanvasEffect {
	kind: EffectKind,
	canvas: HtmlCanvasElement,
	sim: Rc<RefCell<Simulation>>,
	running: Rc<Cell<bool>>,
	pending_frame: Rc<Cell<Option<i32>>>,
	animate: FrameCallback,
	on_resize: Option<Closure<dyn FnMut()>>,
}

fn viewport_size(window: &Window) -> (f64, f64) {
	let width = window
		.inner_width()
		.ok()
		.and_then(|v| v.as_f64())
		.unwrap_or(0.0);
	let height = window
		.inner_height()
		.ok()
		.and_then(|v| v.as_f64())
		.unwrap_or(0.0);
	(width, height)
}

fn request_frame(window: &Window, cb: &Closure<dyn FnMut()>) -> Option<i32> {
	match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
		Ok(id) => Some(id),
		Err(e) => {
			warn!("seasonal-effects: requestAnimationFrame failed: {:?}", e);
			None
		}
	}
}

impl CanvasEffect {
	/// Create the canvas, attach it and start animating.
	///
	/// Fails if the page has no body or the browser cannot provide a 2D
	/// context; nothing is left attached in that case.
	pub fn mount(kind: EffectKind) -> Result<Self, EffectError> {
		let window = web_sys::window().ok_or(EffectError::NoWindow)?;
		let document = window.document().ok_or(EffectError::NoDocument)?;
		let body = document.body().ok_or(EffectError::NoBody)?;

		let canvas: HtmlCanvasElement = document
			.create_element("canvas")?
			.dyn_into()
			.map_err(|_| EffectError::Js("created element is not a canvas".into()))?;
		canvas.set_class_name(kind.canvas_class());

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")?
			.ok_or(EffectError::NoContext)?
			.dyn_into()
			.map_err(|_| EffectError::NoContext)?;

		let (w, h) = viewport_size(&window);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		body.append_child(&canvas)?;

		let mut rng = ChaCha8Rng::from_entropy();
		let field = ParticleField::new(
			kind,
			Bounds {
				width: w,
				height: h,
			},
			&mut rng,
		);
		info!(
			"seasonal-effects: mounted {} with {} particles ({}x{})",
			kind,
			field.particles.len(),
			w,
			h
		);

		let start = now_ms();
		let sim = Rc::new(RefCell::new(Simulation {
			field,
			wind: WindState::new(start),
			clock: DeltaClock::new(start),
			rng,
		}));
		let running = Rc::new(Cell::new(true));
		let pending_frame: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
		let animate: FrameCallback = Rc::new(RefCell::new(None));

		let on_resize = if kind.tracks_resize() {
			let (sim_resize, canvas_resize) = (sim.clone(), canvas.clone());
			let cb: Closure<dyn FnMut()> = Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = viewport_size(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				sim_resize.borrow_mut().field.resize(nw, nh);
			});
			if let Err(e) =
				window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref())
			{
				canvas.remove();
				return Err(e.into());
			}
			Some(cb)
		} else {
			None
		};

		let (sim_anim, running_anim, canvas_anim, pending_anim, animate_inner) = (
			sim.clone(),
			running.clone(),
			canvas.clone(),
			pending_frame.clone(),
			animate.clone(),
		);
		*animate.borrow_mut() = Some(Closure::new(move || {
			pending_anim.set(None);
			// Stale callback after destroy or detach: drop the frame.
			if !running_anim.get() || !canvas_anim.is_connected() {
				return;
			}

			{
				let mut guard = sim_anim.borrow_mut();
				let s = &mut *guard;
				let tick = s.clock.tick();
				if tick.delta_sec > STALL_SECS {
					debug!(
						"seasonal-effects: {} resumed after {:.1}s stall",
						s.field.kind, tick.delta_sec
					);
				}
				let wind = update_wind(&mut s.wind, tick.now, &s.field.kind.wind(), &mut s.rng);
				render::draw_field(&ctx, &s.field, wind, tick.now);
				s.field.step(wind, tick.now, &mut s.rng);
			}

			if running_anim.get() {
				let callback = animate_inner.borrow();
				if let (Some(win), Some(cb)) = (web_sys::window(), callback.as_ref()) {
					pending_anim.set(request_frame(&win, cb));
				}
			}
		}));
		if let Some(ref cb) = *animate.borrow() {
			pending_frame.set(request_frame(&window, cb));
		}

		let effect = Self {
			kind,
			canvas,
			sim,
			running,
			pending_frame,
			animate,
			on_resize,
		};
		effect.publish(true);
		Ok(effect)
	}

	pub fn kind(&self) -> EffectKind {
		self.kind
	}

	pub fn canvas(&self) -> &HtmlCanvasElement {
		&self.canvas
	}

	pub fn is_running(&self) -> bool {
		self.running.get()
	}

	pub fn particle_count(&self) -> usize {
		self.sim.borrow().field.particles.len()
	}

	/// Expose (or clear) the canvas on `window` for debugging from the console.
	fn publish(&self, live: bool) {
		let Some(window) = web_sys::window() else {
			return;
		};
		let value: JsValue = if live {
			self.canvas.clone().into()
		} else {
			JsValue::NULL
		};
		let key = JsValue::from_str(self.kind.global_key());
		if let Err(e) = js_sys::Reflect::set(&window, &key, &value) {
			warn!("seasonal-effects: could not publish {}: {:?}", self.kind, e);
		}
	}

	/// Make a hidden canvas visible again.
	pub fn reveal(&self) {
		if let Err(e) = self.canvas.style().set_property("display", "") {
			warn!("seasonal-effects: could not reveal {}: {:?}", self.kind, e);
		}
	}

	/// Stop the loop and detach everything. Safe to call more than once.
	pub fn destroy(&mut self) {
		let was_running = self.running.replace(false);

		if let Some(window) = web_sys::window() {
			if let Some(id) = self.pending_frame.take() {
				let _ = window.cancel_animation_frame(id);
			}
			if let Some(cb) = self.on_resize.take() {
				let _ = window
					.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
		// The pending frame is cancelled, so the callback can be dropped.
		self.animate.borrow_mut().take();

		if self.canvas.is_connected() {
			self.canvas.remove();
		}
		if was_running {
			self.publish(false);
			info!("seasonal-effects: destroyed {}", self.kind);
		}
	}
}

impl Drop for CanvasEffect {
	fn drop(&mut self) {
		self.destroy();
	}
}

impl EffectHandle for CanvasEffect {
	fn kind(&self) -> EffectKind {
		self.kind
	}

	fn reveal(&self) {
		CanvasEffect::reveal(self);
	}

	fn destroy(&mut self) {
		CanvasEffect::destroy(self);
	}
}

/// Mounts effects as canvases in the current document.
#[derive(Clone, Copy, Debug, Default)]
pub struct CanvasSpawner;

impl EffectSpawner for CanvasSpawner {
	type Handle = CanvasEffect;

	fn spawn(&mut self, kind: EffectKind) -> Result<CanvasEffect, EffectError> {
		CanvasEffect::mount(kind)
	}
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
	use super::*;
	use crate::components::seasonal_effects::{Orchestrator, Season};
	use wasm_bindgen_test::*;

	wasm_bindgen_test_configure!(run_in_browser);

	fn count(selector: &str) -> u32 {
		web_sys::window()
			.and_then(|w| w.document())
			.and_then(|d| d.query_selector_all(selector).ok())
			.map(|list| list.length())
			.unwrap_or(0)
	}

	fn effect_canvases() -> u32 {
		EffectKind::ALL
			.iter()
			.map(|k| count(&format!(".{}", k.canvas_class())))
			.sum()
	}

	fn global(key: &str) -> JsValue {
		let window = web_sys::window().unwrap();
		js_sys::Reflect::get(&window, &JsValue::from_str(key)).unwrap()
	}

	#[wasm_bindgen_test]
	fn mount_attaches_and_destroy_detaches() {
		let mut effect = CanvasEffect::mount(EffectKind::Sakura).unwrap();
		assert_eq!(count(".sakura-canvas"), 1);
		assert!(effect.is_running());
		assert!(global("sakuraEffect").is_instance_of::<HtmlCanvasElement>());

		effect.destroy();
		effect.destroy();
		assert_eq!(count(".sakura-canvas"), 0);
		assert!(global("sakuraEffect").is_null());
		assert!(!effect.is_running());
	}

	#[wasm_bindgen_test]
	fn willow_destroy_releases_listener_and_frame() {
		let mut effect = CanvasEffect::mount(EffectKind::SummerWillow).unwrap();
		assert!(effect.on_resize.is_some());
		assert!(effect.pending_frame.get().is_some());

		effect.destroy();
		assert!(effect.on_resize.is_none());
		assert!(effect.pending_frame.get().is_none());
		assert!(effect.animate.borrow().is_none());
		assert_eq!(count(".summer-willow-canvas"), 0);
	}

	#[wasm_bindgen_test]
	fn detached_canvas_drops_frame_without_rearming() {
		let effect = CanvasEffect::mount(EffectKind::Snow).unwrap();
		let scheduled = effect.pending_frame.get().unwrap();
		web_sys::window()
			.unwrap()
			.cancel_animation_frame(scheduled)
			.unwrap();
		effect.canvas().remove();

		{
			let animate = effect.animate.borrow();
			let cb: &js_sys::Function = animate.as_ref().unwrap().as_ref().unchecked_ref();
			cb.call0(&JsValue::NULL).unwrap();
		}
		assert!(effect.pending_frame.get().is_none());
	}

	#[wasm_bindgen_test]
	fn global_disable_twice_leaves_no_canvas() {
		let mut effects = Orchestrator::new(CanvasSpawner, true, Season::Spring);
		effects.set_season(Season::Spring);
		assert_eq!(count(".sakura-canvas"), 1);

		effects.toggle_effects(false);
		effects.toggle_effects(false);
		assert_eq!(effect_canvases(), 0);
		assert!(global("sakuraEffect").is_null());
	}

	#[wasm_bindgen_test]
	fn spring_to_winter_swaps_canvases() {
		let mut effects = Orchestrator::new(CanvasSpawner, true, Season::Spring);
		effects.set_season(Season::Spring);
		effects.set_season(Season::Winter);
		assert_eq!(count(".snow-canvas"), 1);
		assert_eq!(count(".sakura-canvas"), 0);
		assert_eq!(effect_canvases(), 1);

		effects.disable_all();
		assert_eq!(effect_canvases(), 0);
	}
}
