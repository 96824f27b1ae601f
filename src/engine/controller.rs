//! Engine controller implementation.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, SendTimeoutError, Sender};
use parking_lot::Mutex;

use super::time::{TimeConfig, TimeControl, TimeLimits};
use crate::board::{
    iterative_deepening, Evaluator, Move, MoveOrderer, Position, SearchConfig, SearchEvent,
    SearchStatus,
};
use crate::sync::{StopFlag, StopReason};

/// Search thread stack size (32 MB)
const SEARCH_STACK_SIZE: usize = 32 * 1024 * 1024;
const HARD_STOP_MARGIN_MS: u64 = 5;

/// Capacity of the event channel between the search and its consumer
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// How long a progress event may wait for room before it is dropped
const INFO_SEND_TIMEOUT: Duration = Duration::from_millis(50);

/// Maximum sleep duration when polling time limits (avoids excessive CPU wake-ups)
const MAX_POLL_SLEEP_MS: u64 = 5;

/// Poll interval while an infinite search holds its best move
const HOLD_POLL_MS: u64 = 10;

/// Engine-level settings, built from UCI options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineConfig {
    pub evaluator: Evaluator,
    pub orderer: MoveOrderer,
    pub time: TimeConfig,
    /// Node limit applied when `go` names none
    pub default_nodes: Option<u64>,
}

/// Search parameters for starting a new search
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    /// Maximum depth to search (None = unlimited)
    pub depth: Option<u32>,
    pub nodes: Option<u64>,
    pub time_control: TimeControl,
    /// Restrict the root to these moves (empty = all)
    pub search_moves: Vec<Move>,
    /// Hold the best move until stopped
    pub infinite: bool,
}

/// Active search job state
struct SearchJob {
    stop: StopFlag,
    handle: JoinHandle<()>,
    /// Optional handle to the timer thread enforcing hard stops
    timer_handle: Option<JoinHandle<()>>,
}

impl SearchJob {
    fn join(self) {
        if self.handle.join().is_err() {
            log::warn!("search thread panicked");
        }
        if let Some(timer) = self.timer_handle {
            let _ = timer.join();
        }
    }
}

/// Owns the current position and runs at most one search at a time.
///
/// Progress and the final best move arrive on [`EngineController::events`].
/// After a [`SearchEvent::BestMove`] has been received, call
/// [`EngineController::reap`] to release the finished worker.
pub struct EngineController {
    position: Position,
    config: EngineConfig,
    status: Arc<Mutex<SearchStatus>>,
    event_tx: Sender<SearchEvent>,
    event_rx: Receiver<SearchEvent>,
    current_job: Option<SearchJob>,
}

impl EngineController {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let (event_tx, event_rx) = bounded(EVENT_CHANNEL_CAPACITY);
        EngineController {
            position: Position::startpos(),
            config,
            status: Arc::new(Mutex::new(SearchStatus::Idle)),
            event_tx,
            event_rx,
            current_job: None,
        }
    }

    /// Receiving end of the search event channel.
    #[must_use]
    pub fn events(&self) -> &Receiver<SearchEvent> {
        &self.event_rx
    }

    #[must_use]
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Replace the position. A running search keeps its own copy.
    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut EngineConfig {
        &mut self.config
    }

    #[must_use]
    pub fn status(&self) -> SearchStatus {
        *self.status.lock()
    }

    /// Check if there's an active search
    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.current_job.is_some()
    }

    /// Reset the board to starting position
    pub fn new_game(&mut self) {
        self.position = Position::startpos_with(self.position.tables());
    }

    fn build_search_config(&self, params: &SearchParams, soft: Option<Duration>) -> SearchConfig {
        SearchConfig {
            max_depth: params.depth,
            node_limit: params.nodes.or(self.config.default_nodes),
            soft_time: soft,
            search_moves: params.search_moves.clone(),
            evaluator: self.config.evaluator,
            orderer: self.config.orderer,
        }
    }

    fn spawn_hard_stop_timer(
        deadline: Instant,
        stop: StopFlag,
        status: Arc<Mutex<SearchStatus>>,
    ) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("search-timer".to_string())
            .spawn(move || loop {
                if stop.is_stopped() || status.lock().is_finished() {
                    break;
                }
                let now = Instant::now();
                if now >= deadline {
                    log::debug!("hard time limit reached");
                    stop.stop(StopReason::Limit);
                    break;
                }
                let sleep_for = (deadline - now).min(Duration::from_millis(MAX_POLL_SLEEP_MS));
                thread::sleep(sleep_for);
            })
    }

    /// Start a search on a copy of the current position.
    ///
    /// Any earlier search is stopped first; its remaining events are
    /// returned so the caller can still deliver them.
    pub fn start_search(&mut self, params: SearchParams) -> io::Result<Vec<SearchEvent>> {
        let leftover = self.stop_search();

        let start = Instant::now();
        let limits = if params.infinite {
            TimeLimits::UNLIMITED
        } else {
            params.time_control.limits(&self.config.time)
        };
        let config = self.build_search_config(&params, limits.soft);
        log::info!(
            "search started: depth {:?} nodes {:?} soft {:?} hard {:?} infinite {}",
            config.max_depth,
            config.node_limit,
            limits.soft,
            limits.hard,
            params.infinite
        );

        let stop = StopFlag::new();
        *self.status.lock() = SearchStatus::Running;

        let timer_handle = match limits.hard {
            Some(hard) => {
                let margin = Duration::from_millis(HARD_STOP_MARGIN_MS);
                let deadline = start + hard.saturating_sub(margin).max(Duration::from_millis(1));
                let timer =
                    Self::spawn_hard_stop_timer(deadline, stop.clone(), Arc::clone(&self.status));
                match timer {
                    Ok(handle) => Some(handle),
                    Err(err) => {
                        *self.status.lock() = SearchStatus::Idle;
                        return Err(err);
                    }
                }
            }
            None => None,
        };

        let mut position = self.position.clone();
        let worker_stop = stop.clone();
        let status = Arc::clone(&self.status);
        let tx = self.event_tx.clone();
        let infinite = params.infinite;

        let spawned = thread::Builder::new()
            .name("search".to_string())
            .stack_size(SEARCH_STACK_SIZE)
            .spawn(move || {
                let outcome = iterative_deepening(&mut position, &config, &worker_stop, |info| {
                    match tx.send_timeout(SearchEvent::Info(info.clone()), INFO_SEND_TIMEOUT) {
                        Ok(()) | Err(SendTimeoutError::Disconnected(_)) => {}
                        Err(SendTimeoutError::Timeout(_)) => {
                            log::debug!("dropped info event for depth {}", info.depth);
                        }
                    }
                });

                // UCI forbids a best move before `stop` in infinite mode
                if infinite {
                    while !worker_stop.is_stopped() {
                        thread::sleep(Duration::from_millis(HOLD_POLL_MS));
                    }
                }

                log::info!(
                    "search {}: depth {} nodes {} score {}",
                    outcome.status,
                    outcome.depth,
                    outcome.nodes,
                    outcome.score
                );
                *status.lock() = outcome.status;
                let _ = tx.send(SearchEvent::BestMove(outcome));
            });

        let handle = match spawned {
            Ok(handle) => handle,
            Err(err) => {
                stop.stop(StopReason::User);
                if let Some(timer) = timer_handle {
                    let _ = timer.join();
                }
                *self.status.lock() = SearchStatus::Idle;
                return Err(err);
            }
        };

        self.current_job = Some(SearchJob {
            stop,
            handle,
            timer_handle,
        });
        Ok(leftover)
    }

    /// Ask the running search to stop without waiting for it.
    pub fn signal_stop(&self) {
        if let Some(job) = &self.current_job {
            job.stop.stop(StopReason::User);
        }
    }

    /// Release a search whose best move has already been received.
    pub fn reap(&mut self) {
        if let Some(job) = self.current_job.take() {
            job.join();
        }
    }

    /// Stop any active search and wait for it.
    ///
    /// Returns the events that were still queued, ending with the best move.
    pub fn stop_search(&mut self) -> Vec<SearchEvent> {
        let Some(job) = self.current_job.take() else {
            return Vec::new();
        };
        job.stop.stop(StopReason::User);

        let mut events = Vec::new();
        loop {
            match self
                .event_rx
                .recv_timeout(Duration::from_millis(HOLD_POLL_MS))
            {
                Ok(event) => {
                    let done = matches!(event, SearchEvent::BestMove(_));
                    events.push(event);
                    if done {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    if job.handle.is_finished() && self.event_rx.is_empty() {
                        break;
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        job.join();
        events
    }
}

impl Default for EngineController {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Drop for EngineController {
    fn drop(&mut self) {
        let _ = self.stop_search();
    }
}
