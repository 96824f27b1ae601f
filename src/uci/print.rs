//! Formatting of engine output lines.

use std::fmt::Write as _;

use crate::board::{SearchIterationInfo, SearchOutcome};
use crate::engine::{EngineConfig, TimeLimits};

pub const ENGINE_NAME: &str = concat!("chess_core ", env!("CARGO_PKG_VERSION"));
pub const ENGINE_AUTHOR: &str = "the chess_core developers";

/// `info depth .. nodes .. score .. pv .. time ..` for one iteration.
#[must_use]
pub fn format_info(info: &SearchIterationInfo) -> String {
    let mut line = format!("info depth {} nodes {}", info.depth, info.nodes);
    match info.mate_in {
        Some(moves) => {
            let _ = write!(line, " score mate {moves}");
        }
        None => {
            let _ = write!(line, " score cp {}", info.score);
        }
    }
    if !info.pv.is_empty() {
        line.push_str(" pv");
        for mv in &info.pv {
            let _ = write!(line, " {mv}");
        }
    }
    let _ = write!(line, " time {}", info.time_ms);
    line
}

#[must_use]
pub fn format_bestmove(outcome: &SearchOutcome) -> String {
    match outcome.best_move {
        Some(mv) => format!("bestmove {mv}"),
        None => "bestmove (none)".to_string(),
    }
}

#[must_use]
pub fn format_info_string(message: &str) -> String {
    format!("info string {message}")
}

/// Debug diagnostic describing the time budget of a search.
#[must_use]
pub fn format_time_info(limits: &TimeLimits, config: &EngineConfig) -> String {
    let ms = |limit: Option<std::time::Duration>| {
        limit.map_or_else(|| "none".to_string(), |d| d.as_millis().to_string())
    };
    format_info_string(&format!(
        "time soft {} hard {} overhead {}",
        ms(limits.soft),
        ms(limits.hard),
        config.time.move_overhead_ms
    ))
}
