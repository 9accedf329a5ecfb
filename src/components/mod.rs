//! UI components.

pub mod seasonal_effects;
