//! Engine controller for managing search and game state.
//!
//! Runs one search at a time on a worker thread, enforces its limits and
//! forwards its progress to a single consumer over a bounded channel.

mod controller;
pub mod time;

pub use controller::{EngineConfig, EngineController, SearchParams, EVENT_CHANNEL_CAPACITY};
pub use time::{Clock, TimeConfig, TimeControl, TimeLimits};
