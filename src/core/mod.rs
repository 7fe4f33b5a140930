//! Core layer - the scene read interface and fundamental types.
//!
//! This module provides:
//! - [`SceneReader`] - the trait every scene source implements
//! - [`TimeCode`] - default / earliest / explicit time selection
//! - [`Value`] - typed attribute values with checked casts
//! - [`TimeSamples`] - default value plus sorted time samples

mod sample;
mod time_samples;
mod traits;
mod value;

pub use sample::{Interpolation, SampleInterp, TimeCode};
pub use time_samples::{Resolved, TimeSamples};
pub use traits::{PrimvarInfo, SceneReader};
pub use value::{FromValue, Value, ValueTypeName};
