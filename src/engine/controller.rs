//! Engine controller implementation.

use std::any::Any;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{EngineError, EngineOptions};
use crate::board::search::{
    mcts, rollout, search, MctsLimits, MctsReport, MctsStrategy, RolloutTally,
    SearchIterationInfo, SearchLimits, SearchResult,
};
use crate::board::{Move, Position};
use crate::perft::{perft, split_perft};
use crate::sync::StopFlag;
use crate::tt::TranspositionCache;

/// Search thread stack size (32 MB)
const SEARCH_STACK_SIZE: usize = 32 * 1024 * 1024;

/// Whether a background session is attached to the controller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Searching,
}

/// One live background search
pub struct SearchJob {
    stop: StopFlag,
    handle: JoinHandle<()>,
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        *msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "unknown panic payload"
    }
}

impl SearchJob {
    /// Signal stop without waiting
    pub fn signal_stop(&self) {
        self.stop.stop();
    }

    /// Whether the worker has returned and only needs joining
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop the search and wait for the thread to finish.
    ///
    /// A worker that panicked is logged and otherwise treated as cancelled.
    pub fn stop_and_wait(self) {
        self.stop.stop();
        if let Err(payload) = self.handle.join() {
            log::error!("search worker panicked: {}", panic_message(payload.as_ref()));
        }
    }
}

/// Engine controller: the live position, the shared cache and at most one
/// background search session.
///
/// Dropping the controller stops and joins any live session before the
/// cache is released.
pub struct EngineController {
    position: Position,
    cache: Arc<TranspositionCache>,
    current_job: Option<SearchJob>,
    options: EngineOptions,
    rng: StdRng,
}

impl EngineController {
    #[must_use]
    pub fn new(options: EngineOptions) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        EngineController {
            position: Position::new(),
            cache: Arc::new(TranspositionCache::new(options.hash_mb)),
            current_job: None,
            options,
            rng,
        }
    }

    #[must_use]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[must_use]
    pub fn cache(&self) -> &TranspositionCache {
        &self.cache
    }

    #[must_use]
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.current_job.is_some() {
            SessionState::Searching
        } else {
            SessionState::Idle
        }
    }

    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.current_job.is_some()
    }

    /// Join a session whose worker has already returned
    pub fn reap_finished(&mut self) {
        if self.current_job.as_ref().is_some_and(SearchJob::is_finished) {
            self.stop_search();
        }
    }

    /// Stop any active search and wait for it. A no-op when idle.
    pub fn stop_search(&mut self) {
        if let Some(job) = self.current_job.take() {
            job.stop_and_wait();
            log::debug!("search session joined");
        }
    }

    /// Signal stop to active search (non-blocking)
    pub fn signal_stop(&self) {
        if let Some(job) = &self.current_job {
            job.signal_stop();
        }
    }

    fn ensure_idle(&mut self) -> Result<(), EngineError> {
        self.reap_finished();
        if self.is_searching() {
            return Err(EngineError::SearchInProgress);
        }
        Ok(())
    }

    /// Replace the live position
    pub fn set_position(&mut self, position: Position) -> Result<(), EngineError> {
        self.ensure_idle()?;
        self.position = position;
        Ok(())
    }

    /// Replace the live position from FEN text (or `startpos`). On error the
    /// live position is untouched.
    pub fn set_position_fen(&mut self, fen: &str) -> Result<(), EngineError> {
        self.ensure_idle()?;
        self.position = fen.parse()?;
        Ok(())
    }

    /// Apply moves in order, stopping at the first one that is not legal.
    ///
    /// Returns the number applied. Moves before a rejected one stay applied.
    pub fn apply_moves<'a, I>(&mut self, moves: I) -> Result<usize, EngineError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.ensure_idle()?;
        let mut applied = 0;
        for text in moves {
            self.position
                .make_move_str(text)
                .map_err(|error| EngineError::IllegalMove { error, applied })?;
            applied += 1;
        }
        Ok(applied)
    }

    /// Back to the start position with an empty cache
    pub fn new_game(&mut self) -> Result<(), EngineError> {
        self.ensure_idle()?;
        self.position = Position::new();
        self.cache.clear();
        Ok(())
    }

    pub fn clear_cache(&mut self) -> Result<(), EngineError> {
        self.ensure_idle()?;
        self.cache.clear();
        Ok(())
    }

    /// Perft on the live position, sharing the cache
    pub fn perft(&mut self, depth: u32) -> Result<u64, EngineError> {
        self.ensure_idle()?;
        let mut pos = self.position.clone();
        Ok(perft(Some(&self.cache), &mut pos, depth.max(1) as i32))
    }

    /// Split perft on the live position, sharing the cache
    pub fn split(&mut self, depth: u32) -> Result<Vec<(Move, u64)>, EngineError> {
        self.ensure_idle()?;
        let mut pos = self.position.clone();
        Ok(split_perft(Some(&self.cache), &mut pos, depth.max(1) as i32))
    }

    /// Start a fixed-depth session on a copy of the live position, stopping
    /// and joining any previous one first.
    ///
    /// `on_info` runs after every completed iteration and `on_complete` once
    /// at the end, both on the search thread.
    pub fn start_search<I, C>(&mut self, limits: SearchLimits, on_info: I, on_complete: C)
    where
        I: FnMut(&SearchIterationInfo) + Send + 'static,
        C: FnOnce(SearchResult) + Send + 'static,
    {
        let position = self.position.clone();
        let cache = Arc::clone(&self.cache);
        log::debug!("starting search {limits:?} on {}", position.to_fen());
        self.start_search_with(move |stop| {
            let result = search(&position, &cache, limits, stop, on_info);
            on_complete(result);
        });
    }

    /// Run `work` as the background session. It receives the session's stop
    /// flag and should return promptly once it is raised.
    pub fn start_search_with<F>(&mut self, work: F)
    where
        F: FnOnce(&StopFlag) + Send + 'static,
    {
        self.stop_search();

        let stop = StopFlag::new();
        let worker_stop = stop.clone();
        let spawned = thread::Builder::new()
            .name("search".to_string())
            .stack_size(SEARCH_STACK_SIZE)
            .spawn(move || work(&worker_stop));

        match spawned {
            Ok(handle) => self.current_job = Some(SearchJob { stop, handle }),
            Err(e) => log::error!("failed to spawn search thread: {e}"),
        }
    }

    /// Monte-Carlo search on the calling thread. Any background session is
    /// stopped first.
    pub fn run_mcts(&mut self, strategy: MctsStrategy, limits: MctsLimits) -> MctsReport {
        self.stop_search();
        mcts(
            &self.position,
            strategy,
            limits,
            self.options.rollout_plies,
            &mut self.rng,
        )
    }

    /// Play `games` random games from the live position. `on_progress` is
    /// called after every `report_every` games with the running tally.
    pub fn run_rollouts<F>(&mut self, games: u64, report_every: u64, mut on_progress: F) -> RolloutTally
    where
        F: FnMut(&RolloutTally, Duration),
    {
        let start = Instant::now();
        let mut tally = RolloutTally::default();
        for game in 1..=games {
            let result = rollout(self.position.clone(), self.options.rollout_plies, &mut self.rng);
            tally.record(result);
            if report_every > 0 && game % report_every == 0 {
                on_progress(&tally, start.elapsed());
            }
        }
        tally
    }

    /// Stop any session and release the engine
    pub fn shutdown(mut self) {
        self.stop_search();
    }
}

impl Drop for EngineController {
    fn drop(&mut self) {
        self.stop_search();
        log::debug!("engine controller released");
    }
}
