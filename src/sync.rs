//! Synchronization primitives for the chess engine.
//!
//! Provides thread-safe utilities for search control.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Why a search was asked to stop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// `stop`, `quit` or a new command that supersedes the search
    User,
    /// Depth, node or time limit reached
    Limit,
}

const RUNNING: u8 = 0;
const STOPPED_BY_USER: u8 = 1;
const STOPPED_BY_LIMIT: u8 = 2;

/// A thread-safe stop flag for controlling search termination.
///
/// Wraps a shared `AtomicU8` so the search can tell a user stop from an
/// exhausted limit. The first reason recorded wins.
#[derive(Clone, Debug)]
pub struct StopFlag(Arc<AtomicU8>);

impl StopFlag {
    /// Create a new stop flag (initially not stopped).
    #[must_use]
    pub fn new() -> Self {
        StopFlag(Arc::new(AtomicU8::new(RUNNING)))
    }

    /// Check if the stop flag is set.
    #[inline]
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed) != RUNNING
    }

    #[inline]
    #[must_use]
    pub fn reason(&self) -> Option<StopReason> {
        match self.0.load(Ordering::Acquire) {
            STOPPED_BY_USER => Some(StopReason::User),
            STOPPED_BY_LIMIT => Some(StopReason::Limit),
            _ => None,
        }
    }

    /// Set the stop flag, keeping an earlier reason if there is one.
    #[inline]
    pub fn stop(&self, reason: StopReason) {
        let code = match reason {
            StopReason::User => STOPPED_BY_USER,
            StopReason::Limit => STOPPED_BY_LIMIT,
        };
        let _ = self
            .0
            .compare_exchange(RUNNING, code, Ordering::AcqRel, Ordering::Acquire);
    }

    /// Clear the stop flag.
    #[inline]
    pub fn reset(&self) {
        self.0.store(RUNNING, Ordering::Release);
    }
}

impl Default for StopFlag {
    fn default() -> Self {
        Self::new()
    }
}
