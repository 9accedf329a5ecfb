//! Frame clock built on `performance.now()`.

/// One clock sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tick {
	/// Seconds since the previous sample.
	pub delta_sec: f64,
	/// Timestamp of this sample in milliseconds.
	pub now: f64,
}

/// Produces elapsed time between successive frames.
#[derive(Clone, Debug)]
pub struct DeltaClock {
	last: f64,
}

impl DeltaClock {
	pub fn new(now: f64) -> Self {
		Self { last: now }
	}

	pub fn tick_at(&mut self, now: f64) -> Tick {
		let delta_sec = (now - self.last) / 1000.0;
		self.last = now;
		Tick { delta_sec, now }
	}

	pub fn tick(&mut self) -> Tick {
		self.tick_at(now_ms())
	}
}

/// Monotonic milliseconds from the window's `Performance` object.
///
/// Falls back to `Date.now()` when no performance timer is exposed.
pub fn now_ms() -> f64 {
	web_sys::window()
		.and_then(|w| w.performance())
		.map(|p| p.now())
		.unwrap_or_else(js_sys::Date::now)
}
