//! Universal Chess Interface (UCI) protocol implementation.
//!
//! Handles communication with chess GUIs following the UCI specification.
//! A reader thread forwards stdin lines over a channel; the session loop
//! selects over those lines and the search events of its
//! [`EngineController`], so `stop` and `isready` are answered while a
//! search runs.

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Instant;

use crossbeam_channel::{select, unbounded, Receiver};
use thiserror::Error;

use crate::board::{FenError, MoveParseError, Position, SearchEvent, Tables};
use crate::engine::{EngineConfig, EngineController};

pub mod command;
pub mod options;
pub mod print;

pub use command::{parse_uci_command, GoParams, PositionBase, UciCommand};

/// Errors reported back to the GUI as `info string`.
#[derive(Error, Debug)]
pub enum UciError {
    #[error("invalid FEN: {0}")]
    Fen(#[from] FenError),
    #[error("invalid move: {0}")]
    MoveParse(#[from] MoveParseError),
    #[error("invalid option '{name}' with value '{value}'")]
    InvalidOption { name: String, value: String },
    #[error("{0}")]
    Protocol(String),
    #[error("could not start search: {0}")]
    Spawn(#[source] io::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Build the position a `position` command describes.
///
/// Nothing is returned unless the FEN and every move are valid, so a
/// failed command leaves the caller's position untouched.
pub fn build_position(
    base: &PositionBase,
    moves: &[String],
    tables: Tables,
) -> Result<Position, UciError> {
    let mut pos = match base {
        PositionBase::StartPos => Position::startpos_with(tables),
        PositionBase::Fen(fen) => Position::from_fen_with(fen, tables)?,
    };
    for mv in moves {
        pos.make_move_uci(mv)?;
    }
    Ok(pos)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// One UCI conversation writing to `out`.
pub struct UciSession<W: Write> {
    out: W,
    controller: EngineController,
    debug: bool,
}

impl<W: Write> UciSession<W> {
    pub fn new(out: W) -> Self {
        Self::with_config(out, EngineConfig::default())
    }

    pub fn with_config(out: W, config: EngineConfig) -> Self {
        UciSession {
            out,
            controller: EngineController::new(config),
            debug: false,
        }
    }

    #[must_use]
    pub fn controller(&self) -> &EngineController {
        &self.controller
    }

    /// Consume the session, returning the output sink.
    pub fn into_output(mut self) -> W {
        let _ = self.controller.stop_search();
        self.out
    }

    /// Process commands until `quit` or until the command channel closes.
    pub fn run(&mut self, commands: &Receiver<String>) -> io::Result<()> {
        let events = self.controller.events().clone();
        loop {
            select! {
                recv(commands) -> line => {
                    let Ok(line) = line else {
                        log::debug!("input closed, shutting down");
                        self.shutdown()?;
                        return Ok(());
                    };
                    if self.handle_line(&line)? == Flow::Quit {
                        return Ok(());
                    }
                }
                recv(events) -> event => {
                    if let Ok(event) = event {
                        let finished = matches!(event, SearchEvent::BestMove(_));
                        self.emit_event(event)?;
                        if finished {
                            self.controller.reap();
                        }
                    }
                }
            }
        }
    }

    /// Handle one input line. Protocol errors are reported to the GUI; only
    /// output failures are returned.
    fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        let result = parse_uci_command(line).and_then(|cmd| match cmd {
            Some(cmd) => self.execute(cmd),
            None => Ok(Flow::Continue),
        });
        match result {
            Ok(flow) => Ok(flow),
            Err(UciError::Io(err)) => Err(err),
            Err(err) => {
                log::warn!("{err} (input: {line:?})");
                self.send(&print::format_info_string(&err.to_string()))?;
                Ok(Flow::Continue)
            }
        }
    }

    fn execute(&mut self, cmd: UciCommand) -> Result<Flow, UciError> {
        match cmd {
            UciCommand::Uci => {
                self.send(&format!("id name {}", print::ENGINE_NAME))?;
                self.send(&format!("id author {}", print::ENGINE_AUTHOR))?;
                for line in options::option_lines(self.controller.config()) {
                    self.send(&line)?;
                }
                self.send("uciok")?;
            }
            UciCommand::Debug(on) => self.debug = on,
            UciCommand::IsReady => self.send("readyok")?,
            UciCommand::SetOption { name, value } => {
                options::apply_setoption(self.controller.config_mut(), &name, value.as_deref())?;
            }
            UciCommand::UciNewGame => {
                self.finish_search()?;
                self.controller.new_game();
            }
            UciCommand::Position { base, moves } => {
                let pos = build_position(&base, &moves, self.controller.position().tables())?;
                self.controller.set_position(pos);
            }
            UciCommand::Go(go) => self.go(&go)?,
            UciCommand::Stop => self.controller.signal_stop(),
            UciCommand::Quit => {
                self.shutdown()?;
                return Ok(Flow::Quit);
            }
            UciCommand::Perft(depth) => self.perft(depth)?,
        }
        Ok(Flow::Continue)
    }

    fn go(&mut self, go: &GoParams) -> Result<(), UciError> {
        let mut pos = self.controller.position().clone();
        let params = go.to_search_params(&mut pos);

        if self.debug {
            let config = *self.controller.config();
            self.send(&print::format_info_string(&format!(
                "go depth {:?} nodes {:?} infinite {} searchmoves {}",
                params.depth,
                params.nodes.or(config.default_nodes),
                params.infinite,
                params.search_moves.len()
            )))?;
            if !params.infinite && !params.time_control.is_unlimited() {
                let limits = params.time_control.limits(&config.time);
                self.send(&print::format_time_info(&limits, &config))?;
            }
        }

        let leftover = self
            .controller
            .start_search(params)
            .map_err(UciError::Spawn)?;
        for event in leftover {
            self.emit_event(event)?;
        }
        Ok(())
    }

    fn perft(&mut self, depth: usize) -> Result<(), UciError> {
        self.finish_search()?;
        let mut pos = self.controller.position().clone();
        let start = Instant::now();
        let mut total = 0;
        for (mv, nodes) in pos.perft_divide(depth) {
            total += nodes;
            self.send(&format!("{mv}: {nodes}"))?;
        }
        self.send("")?;
        self.send(&format!("Nodes searched: {total}"))?;
        if self.debug {
            self.send(&print::format_info_string(&format!(
                "perft depth {depth} time {}",
                start.elapsed().as_millis()
            )))?;
        }
        Ok(())
    }

    /// Stop a running search and flush what it still had to say.
    fn finish_search(&mut self) -> io::Result<()> {
        for event in self.controller.stop_search() {
            self.emit_event(event)?;
        }
        Ok(())
    }

    fn shutdown(&mut self) -> io::Result<()> {
        self.finish_search()?;
        self.out.flush()
    }

    fn emit_event(&mut self, event: SearchEvent) -> io::Result<()> {
        match event {
            SearchEvent::Info(info) => self.send(&print::format_info(&info)),
            SearchEvent::BestMove(outcome) => self.send(&print::format_bestmove(&outcome)),
        }
    }

    fn send(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{line}")?;
        self.out.flush()
    }
}

/// Forward stdin lines into a channel from a dedicated thread.
fn spawn_stdin_reader() -> io::Result<Receiver<String>> {
    let (tx, rx) = unbounded();
    thread::Builder::new()
        .name("uci-reader".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        log::warn!("failed to read stdin: {err}");
                        break;
                    }
                }
            }
        })?;
    Ok(rx)
}

/// Run the UCI protocol over stdin/stdout until `quit` or end of input.
pub fn run_uci_loop() -> io::Result<()> {
    let commands = spawn_stdin_reader()?;
    let stdout = io::stdout();
    let mut session = UciSession::new(stdout.lock());
    session.run(&commands)
}
