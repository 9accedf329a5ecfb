//! shuka-effects: seasonal canvas backgrounds for the Shūka site.
//!
//! This crate provides a WASM-based layer of falling particles (rain, sakura,
//! snow, autumn leaves, willow) that follows the season selected by the host
//! page, plus an on/off switch.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use serde::Deserialize;
use wasm_bindgen::prelude::*;
use web_sys::{
	HtmlInputElement, HtmlScriptElement, MutationObserver, MutationObserverInit, Window,
};

#[cfg(target_arch = "wasm32")]
use getrandom as _;

pub mod components;

pub use components::seasonal_effects::{
	CanvasEffect, CanvasSpawner, EffectError, EffectKind, Orchestrator, Season,
};

/// Body attribute the host page uses to announce the season.
const SEASON_ATTR: &str = "data-season";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("seasonal-effects: logging initialized");
}

/// Boot options embedded by the host page.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct EffectsConfig {
	#[serde(default = "enabled_by_default")]
	pub enabled: bool,
	#[serde(default)]
	pub season: Option<Season>,
}

fn enabled_by_default() -> bool {
	true
}

impl Default for EffectsConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			season: None,
		}
	}
}

/// Load boot options from a script element with id="effects-config".
/// Expected format: JSON with { enabled: bool, season: "spring" | ... }
fn load_config() -> Option<EffectsConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("effects-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<EffectsConfig>(&json_text) {
		Ok(config) => {
			info!(
				"seasonal-effects: config enabled={} season={:?}",
				config.enabled, config.season
			);
			Some(config)
		}
		Err(e) => {
			warn!("seasonal-effects: failed to parse config: {}", e);
			None
		}
	}
}

/// Id of the effects on/off checkbox.
const TOGGLE_ID: &str = "effect-toggle-checkbox";

/// Season currently declared on `<body>`, if any.
fn body_season() -> Option<Season> {
	let body = web_sys::window()?.document()?.body()?;
	body.get_attribute(SEASON_ATTR).map(|v| Season::parse(&v))
}

/// Season for an observed attribute value. A removed attribute means tsuyu.
fn season_from_attr(value: Option<&str>) -> Season {
	value.map(Season::parse).unwrap_or_default()
}

/// Config wins over the page attribute; tsuyu is the fallback.
fn initial_season(config: &EffectsConfig, from_body: Option<Season>) -> Season {
	config.season.or(from_body).unwrap_or_default()
}

/// Push `data-season` changes on `<body>` into `set_season`.
///
/// The observer lives as long as the page.
fn watch_body_season(set_season: WriteSignal<Season>) -> Result<(), EffectError> {
	let window = web_sys::window().ok_or(EffectError::NoWindow)?;
	let document = window.document().ok_or(EffectError::NoDocument)?;
	let body = document.body().ok_or(EffectError::NoBody)?;

	let observed = body.clone();
	let cb: Closure<dyn FnMut(js_sys::Array, MutationObserver)> =
		Closure::new(move |_records: js_sys::Array, _observer: MutationObserver| {
			let value = observed.get_attribute(SEASON_ATTR);
			set_season.set(season_from_attr(value.as_deref()));
		});
	let observer = MutationObserver::new(cb.as_ref().unchecked_ref())?;

	let options = MutationObserverInit::new();
	options.set_attributes(true);
	let filter = js_sys::Array::of1(&JsValue::from_str(SEASON_ATTR));
	options.set_attribute_filter(&filter);
	observer.observe_with_options(&body, &options)?;

	cb.forget();
	Ok(())
}

/// Wire up a checkbox the host page already renders.
///
/// Returns `Ok(false)` when the page has none, in which case `App` renders
/// its own.
fn bind_host_toggle(checked: bool, set_enabled: WriteSignal<bool>) -> Result<bool, EffectError> {
	let window = web_sys::window().ok_or(EffectError::NoWindow)?;
	let document = window.document().ok_or(EffectError::NoDocument)?;
	let Some(element) = document.get_element_by_id(TOGGLE_ID) else {
		return Ok(false);
	};
	let input: HtmlInputElement = element
		.dyn_into()
		.map_err(|_| EffectError::Js(format!("#{TOGGLE_ID} is not an input")))?;
	input.set_checked(checked);

	let target = input.clone();
	let cb: Closure<dyn FnMut()> = Closure::new(move || set_enabled.set(target.checked()));
	input.add_event_listener_with_callback("change", cb.as_ref().unchecked_ref())?;
	cb.forget();
	info!("seasonal-effects: bound host #{}", TOGGLE_ID);
	Ok(true)
}

/// Main application component.
/// Injects the effect stylesheets, renders the on/off switch and keeps the
/// running effect in step with the season and the switch.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config().unwrap_or_default();
	let season0 = initial_season(&config, body_season());
	let (season, set_season) = signal(season0);
	let (enabled, set_enabled) = signal(config.enabled);

	if let Err(e) = watch_body_season(set_season) {
		warn!("seasonal-effects: cannot watch {}: {}", SEASON_ATTR, e);
	}

	let host_toggle = bind_host_toggle(config.enabled, set_enabled).unwrap_or_else(|e| {
		warn!("seasonal-effects: cannot bind #{}: {}", TOGGLE_ID, e);
		false
	});

	let effects = Rc::new(RefCell::new(Orchestrator::new(
		CanvasSpawner,
		config.enabled,
		season0,
	)));

	Effect::new(move |prev: Option<(Season, bool)>| {
		let (s, on) = (season.get(), enabled.get());
		let mut effects = effects.borrow_mut();
		match prev {
			None => effects.set_season(s),
			Some((prev_season, was_on)) => {
				if was_on && !on {
					effects.toggle_effects(false);
				}
				if prev_season != s {
					effects.set_season(s);
				}
				if !was_on && on {
					effects.toggle_effects(true);
				}
			}
		}
		(s, on)
	});

	view! {
		{EffectKind::ALL
			.into_iter()
			.map(|kind| view! { <Style id=kind.style_id()>{kind.stylesheet()}</Style> })
			.collect_view()}

		{(!host_toggle)
			.then(|| {
				view! {
					<label class="effect-toggle">
						<input
							type="checkbox"
							id=TOGGLE_ID
							prop:checked=move || enabled.get()
							on:change=move |ev| set_enabled.set(event_target_checked(&ev))
						/>
						<span class="effect-toggle-label">"Seasonal effects"</span>
					</label>
				}
			})}
	}
}
