//! Errors raised while mounting an effect into the page.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures while creating or attaching an effect canvas.
#[derive(Debug, Error)]
pub enum EffectError {
	#[error("no global window")]
	NoWindow,

	#[error("window has no document")]
	NoDocument,

	#[error("document has no body")]
	NoBody,

	/// The browser refused to hand out a 2D drawing context.
	#[error("2d canvas context unavailable")]
	NoContext,

	#[error("DOM call failed: {0}")]
	Js(String),
}

impl From<JsValue> for EffectError {
	fn from(value: JsValue) -> Self {
		EffectError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}
