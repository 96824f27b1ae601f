//! Parsing of UCI input lines into typed commands.

use crate::board::{Color, Position};
use crate::engine::{Clock, SearchParams, TimeControl};

use super::UciError;

/// Where a `position` command starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionBase {
    StartPos,
    Fen(String),
}

/// Arguments of a `go` command, as sent by the GUI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoParams {
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: Option<u64>,
    pub binc: Option<u64>,
    pub movestogo: Option<u64>,
    pub depth: Option<u32>,
    pub nodes: Option<u64>,
    pub movetime: Option<u64>,
    pub searchmoves: Vec<String>,
    pub infinite: bool,
}

impl GoParams {
    /// Pick the clock that applies to `side`.
    ///
    /// `movetime` wins over a clock; a bare depth or node limit searches
    /// without a time limit.
    #[must_use]
    pub fn time_control(&self, side: Color) -> TimeControl {
        let (time, inc) = match side {
            Color::White => (self.wtime, self.winc),
            Color::Black => (self.btime, self.binc),
        };
        if let Some(movetime) = self.movetime {
            TimeControl::MoveTime(movetime)
        } else if let Some(remaining_ms) = time {
            TimeControl::Clock(Clock {
                remaining_ms,
                increment_ms: inc.unwrap_or(0),
                moves_to_go: self.movestogo,
            })
        } else if self.depth.is_some() || self.nodes.is_some() {
            TimeControl::Depth
        } else {
            TimeControl::Infinite
        }
    }

    /// Resolve the request against `pos`.
    ///
    /// `searchmoves` entries that are not legal here are skipped with a
    /// warning.
    pub fn to_search_params(&self, pos: &mut Position) -> SearchParams {
        let search_moves = self
            .searchmoves
            .iter()
            .filter_map(|uci| match pos.parse_move(uci) {
                Ok(mv) => Some(mv),
                Err(err) => {
                    log::warn!("skipping searchmove: {err}");
                    None
                }
            })
            .collect();

        SearchParams {
            depth: self.depth,
            nodes: self.nodes,
            time_control: self.time_control(pos.side_to_move()),
            search_moves,
            infinite: self.infinite,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciCommand {
    Uci,
    Debug(bool),
    IsReady,
    SetOption { name: String, value: Option<String> },
    UciNewGame,
    Position { base: PositionBase, moves: Vec<String> },
    Go(GoParams),
    Stop,
    Quit,
    /// Non-standard: leaf counts per root move
    Perft(usize),
}

/// Parse one input line. Blank lines give `Ok(None)`.
pub fn parse_uci_command(line: &str) -> Result<Option<UciCommand>, UciError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some((&keyword, args)) = parts.split_first() else {
        return Ok(None);
    };

    let cmd = match keyword {
        "uci" => UciCommand::Uci,
        "isready" => UciCommand::IsReady,
        "ucinewgame" => UciCommand::UciNewGame,
        "stop" => UciCommand::Stop,
        "quit" => UciCommand::Quit,
        "debug" => match args.first() {
            Some(&"on") => UciCommand::Debug(true),
            Some(&"off") => UciCommand::Debug(false),
            _ => return Err(protocol("debug expects 'on' or 'off'")),
        },
        "setoption" => parse_setoption(args)?,
        "position" => parse_position(args)?,
        "go" => UciCommand::Go(parse_go(args)?),
        "perft" => {
            let depth = args
                .first()
                .and_then(|d| d.parse::<usize>().ok())
                .filter(|&d| d > 0)
                .ok_or_else(|| protocol("perft expects a positive depth"))?;
            UciCommand::Perft(depth)
        }
        other => return Err(protocol(format!("unknown command '{other}'"))),
    };

    Ok(Some(cmd))
}

fn protocol(msg: impl Into<String>) -> UciError {
    UciError::Protocol(msg.into())
}

fn parse_setoption(args: &[&str]) -> Result<UciCommand, UciError> {
    let mut name_parts: Vec<&str> = Vec::new();
    let mut value_parts: Vec<&str> = Vec::new();
    let mut in_value = None;

    for &part in args {
        match part {
            "name" if in_value.is_none() => in_value = Some(false),
            "value" if in_value == Some(false) => in_value = Some(true),
            _ => match in_value {
                Some(false) => name_parts.push(part),
                Some(true) => value_parts.push(part),
                None => return Err(protocol("setoption expects 'name'")),
            },
        }
    }

    if name_parts.is_empty() {
        return Err(protocol("setoption is missing an option name"));
    }

    Ok(UciCommand::SetOption {
        name: name_parts.join(" "),
        value: (!value_parts.is_empty()).then(|| value_parts.join(" ")),
    })
}

fn parse_position(args: &[&str]) -> Result<UciCommand, UciError> {
    let moves_at = args.iter().position(|&p| p == "moves");
    let (head, tail) = match moves_at {
        Some(i) => (&args[..i], &args[i + 1..]),
        None => (args, &[][..]),
    };

    let base = match head.split_first() {
        Some((&"startpos", [])) => PositionBase::StartPos,
        Some((&"fen", fields)) if !fields.is_empty() => PositionBase::Fen(fields.join(" ")),
        _ => return Err(protocol("position expects 'startpos' or 'fen <fen>'")),
    };

    Ok(UciCommand::Position {
        base,
        moves: tail.iter().map(|m| (*m).to_string()).collect(),
    })
}

const GO_KEYWORDS: [&str; 11] = [
    "wtime",
    "btime",
    "winc",
    "binc",
    "movestogo",
    "depth",
    "nodes",
    "movetime",
    "searchmoves",
    "infinite",
    "ponder",
];

fn parse_go(args: &[&str]) -> Result<GoParams, UciError> {
    fn value<T: std::str::FromStr>(
        keyword: &str,
        iter: &mut std::iter::Peekable<std::slice::Iter<'_, &str>>,
    ) -> Result<T, UciError> {
        iter.next()
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| protocol(format!("go {keyword} expects a number")))
    }

    // Some GUIs send a negative clock once the flag has fallen
    fn clock(
        keyword: &str,
        iter: &mut std::iter::Peekable<std::slice::Iter<'_, &str>>,
    ) -> Result<u64, UciError> {
        value::<i64>(keyword, iter).map(|ms| ms.max(0).unsigned_abs())
    }

    let mut params = GoParams::default();
    let mut iter = args.iter().peekable();

    while let Some(&keyword) = iter.next() {
        match keyword {
            "wtime" => params.wtime = Some(clock(keyword, &mut iter)?),
            "btime" => params.btime = Some(clock(keyword, &mut iter)?),
            "winc" => params.winc = Some(clock(keyword, &mut iter)?),
            "binc" => params.binc = Some(clock(keyword, &mut iter)?),
            "movestogo" => params.movestogo = Some(value(keyword, &mut iter)?),
            "depth" => params.depth = Some(value(keyword, &mut iter)?),
            "nodes" => params.nodes = Some(value(keyword, &mut iter)?),
            "movetime" => params.movetime = Some(value(keyword, &mut iter)?),
            "infinite" => params.infinite = true,
            "searchmoves" => {
                while let Some(mv) = iter.next_if(|p| !GO_KEYWORDS.contains(*p)) {
                    params.searchmoves.push((*mv).to_string());
                }
            }
            // Pondering is not supported; a ponder search is treated as normal
            "ponder" => log::debug!("ignoring 'go ponder'"),
            other => return Err(protocol(format!("unknown go argument '{other}'"))),
        }
    }

    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> UciCommand {
        parse_uci_command(line).unwrap().unwrap()
    }

    #[test]
    fn test_blank_line_is_ignored() {
        assert_eq!(parse_uci_command("   ").unwrap(), None);
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("uci"), UciCommand::Uci);
        assert_eq!(parse("  isready  "), UciCommand::IsReady);
        assert_eq!(parse("debug on"), UciCommand::Debug(true));
        assert_eq!(parse("debug off"), UciCommand::Debug(false));
        assert_eq!(parse("perft 3"), UciCommand::Perft(3));
        assert!(parse_uci_command("debug maybe").is_err());
        assert!(parse_uci_command("perft 0").is_err());
    }

    #[test]
    fn test_unknown_command_is_protocol_error() {
        let err = parse_uci_command("fly away").unwrap_err();
        assert!(matches!(err, UciError::Protocol(_)));
        assert!(err.to_string().contains("fly"));
    }

    #[test]
    fn test_setoption_multi_word_name() {
        assert_eq!(
            parse("setoption name Move Overhead value 120"),
            UciCommand::SetOption {
                name: "Move Overhead".to_string(),
                value: Some("120".to_string()),
            }
        );
        assert_eq!(
            parse("setoption name Ordering"),
            UciCommand::SetOption {
                name: "Ordering".to_string(),
                value: None,
            }
        );
        assert!(parse_uci_command("setoption value 3").is_err());
    }

    #[test]
    fn test_position_startpos_with_moves() {
        assert_eq!(
            parse("position startpos moves e2e4 e7e5"),
            UciCommand::Position {
                base: PositionBase::StartPos,
                moves: vec!["e2e4".to_string(), "e7e5".to_string()],
            }
        );
    }

    #[test]
    fn test_position_fen() {
        let fen = "8/8/8/5K1k/8/8/8/5R2 w - - 0 1";
        assert_eq!(
            parse(&format!("position fen {fen}")),
            UciCommand::Position {
                base: PositionBase::Fen(fen.to_string()),
                moves: Vec::new(),
            }
        );
        assert!(parse_uci_command("position").is_err());
        assert!(parse_uci_command("position fen moves e2e4").is_err());
    }

    #[test]
    fn test_go_arguments() {
        let UciCommand::Go(go) =
            parse("go wtime 1000 btime 2000 winc 10 binc 20 movestogo 5 depth 7 nodes 900")
        else {
            panic!("expected go");
        };
        assert_eq!(go.wtime, Some(1000));
        assert_eq!(go.btime, Some(2000));
        assert_eq!(go.winc, Some(10));
        assert_eq!(go.binc, Some(20));
        assert_eq!(go.movestogo, Some(5));
        assert_eq!(go.depth, Some(7));
        assert_eq!(go.nodes, Some(900));
        assert!(!go.infinite);
    }

    #[test]
    fn test_go_searchmoves_stop_at_keyword() {
        let UciCommand::Go(go) = parse("go searchmoves e2e4 d2d4 infinite") else {
            panic!("expected go");
        };
        assert_eq!(go.searchmoves, ["e2e4", "d2d4"]);
        assert!(go.infinite);
    }

    #[test]
    fn test_go_bad_number() {
        assert!(parse_uci_command("go depth deep").is_err());
        assert!(parse_uci_command("go movetime").is_err());
    }

    #[test]
    fn test_go_negative_clock_is_zero() {
        let UciCommand::Go(go) = parse("go wtime -30 btime 1000") else {
            panic!("expected go");
        };
        assert_eq!(go.wtime, Some(0));
    }

    #[test]
    fn test_time_control_selection() {
        let go = GoParams {
            wtime: Some(60_000),
            btime: Some(30_000),
            binc: Some(500),
            ..Default::default()
        };
        assert_eq!(
            go.time_control(Color::Black),
            TimeControl::Clock(Clock {
                remaining_ms: 30_000,
                increment_ms: 500,
                moves_to_go: None,
            })
        );

        let movetime = GoParams {
            wtime: Some(60_000),
            movetime: Some(250),
            ..Default::default()
        };
        assert_eq!(
            movetime.time_control(Color::White),
            TimeControl::MoveTime(250)
        );

        let depth = GoParams {
            depth: Some(4),
            ..Default::default()
        };
        assert_eq!(depth.time_control(Color::White), TimeControl::Depth);
        assert_eq!(
            GoParams::default().time_control(Color::White),
            TimeControl::Infinite
        );
    }

    #[test]
    fn test_search_params_skip_illegal_searchmoves() {
        let mut pos = Position::startpos();
        let go = GoParams {
            searchmoves: vec!["e2e4".to_string(), "e2e5".to_string()],
            depth: Some(2),
            ..Default::default()
        };
        let params = go.to_search_params(&mut pos);
        assert_eq!(params.search_moves.len(), 1);
        assert_eq!(params.search_moves[0].to_string(), "e2e4");
        assert_eq!(params.depth, Some(2));
        assert_eq!(params.time_control, TimeControl::Depth);
    }
}
