//! UCI options and how they map onto [`EngineConfig`].

use crate::board::{Evaluator, MoveOrderer};
use crate::engine::EngineConfig;

use super::UciError;

pub const MOVE_OVERHEAD_MAX: u64 = 5000;
pub const NODES_MAX: u64 = 1_000_000_000;

/// `option` lines advertised in reply to `uci`, showing current values.
#[must_use]
pub fn option_lines(config: &EngineConfig) -> Vec<String> {
    vec![
        format!(
            "option name Move Overhead type spin default {} min 0 max {MOVE_OVERHEAD_MAX}",
            config.time.move_overhead_ms
        ),
        format!(
            "option name Nodes type spin default {} min 0 max {NODES_MAX}",
            config.default_nodes.unwrap_or(0)
        ),
        combo(
            "Evaluator",
            config.evaluator.name(),
            &Evaluator::ALL.map(Evaluator::name),
        ),
        combo(
            "Ordering",
            config.orderer.name(),
            &MoveOrderer::ALL.map(MoveOrderer::name),
        ),
    ]
}

fn combo(name: &str, default: &str, vars: &[&str]) -> String {
    let mut line = format!("option name {name} type combo default {default}");
    for var in vars {
        line.push_str(" var ");
        line.push_str(var);
    }
    line
}

fn parse_spin(value: Option<&str>, max: u64) -> Option<u64> {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|&v| v <= max)
}

/// Apply `setoption name <name> value <value>`.
///
/// Names are matched case-insensitively. The configuration is left alone
/// when the name is unknown or the value does not fit the option.
pub fn apply_setoption(
    config: &mut EngineConfig,
    name: &str,
    value: Option<&str>,
) -> Result<(), UciError> {
    let invalid = || UciError::InvalidOption {
        name: name.to_string(),
        value: value.unwrap_or_default().to_string(),
    };

    match name.trim().to_ascii_lowercase().as_str() {
        "move overhead" => {
            config.time.move_overhead_ms =
                parse_spin(value, MOVE_OVERHEAD_MAX).ok_or_else(invalid)?;
        }
        "nodes" => {
            let nodes = parse_spin(value, NODES_MAX).ok_or_else(invalid)?;
            config.default_nodes = (nodes > 0).then_some(nodes);
        }
        "evaluator" => {
            config.evaluator = value
                .and_then(|v| v.trim().parse().ok())
                .ok_or_else(invalid)?;
        }
        "ordering" => {
            config.orderer = value
                .and_then(|v| v.trim().parse().ok())
                .ok_or_else(invalid)?;
        }
        _ => return Err(invalid()),
    }

    log::info!("option '{name}' set to {value:?}");
    Ok(())
}
