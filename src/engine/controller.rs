//! Engine controller implementation.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use crate::board::search::{search, SearchConfig, SearchResult, SearchStats};
use crate::board::{MoveError, Piece};
use crate::game::{Game, MoveOutcome, MoveRecord};

/// Search thread stack size (8 MB)
const SEARCH_STACK_SIZE: usize = 8 * 1024 * 1024;

/// Active search job state
struct SearchJob {
    /// Handle to the search thread
    handle: JoinHandle<()>,
    /// Delivers the result once the search finishes
    receiver: Receiver<(SearchResult, SearchStats)>,
    /// Hash and snapshot index of the searched position
    hash: u64,
    snapshot: usize,
}

impl SearchJob {
    /// Wait for the thread to finish, discarding any result
    fn wait(self) {
        if self.handle.join().is_err() {
            log::error!("search thread panicked");
        }
    }
}

/// What [`GameController::poll_search`] found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchUpdate {
    /// No search is running
    Idle,
    /// The search has not finished yet
    Running,
    /// The search finished and its move, if any, was played
    Finished {
        result: SearchResult,
        record: Option<MoveRecord>,
    },
    /// The search finished for a position that is no longer on the board
    Discarded { result: SearchResult },
}

/// Owns a game and runs at most one background search over it.
///
/// The search works on a clone of the position and hands its result back
/// over a channel. While it runs, moves and promotions are refused; reads
/// and snapshot navigation stay available. A result whose position was
/// navigated away from is discarded rather than played.
pub struct GameController {
    game: Game,
    config: SearchConfig,
    current_job: Option<SearchJob>,
}

impl Default for GameController {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl GameController {
    /// Create a controller for a new game
    #[must_use]
    pub fn new(config: SearchConfig) -> Self {
        Self::with_game(Game::new(), config)
    }

    #[must_use]
    pub fn with_game(game: Game, config: SearchConfig) -> Self {
        GameController {
            game,
            config,
            current_job: None,
        }
    }

    #[must_use]
    pub fn game(&self) -> &Game {
        &self.game
    }

    #[must_use]
    pub fn config(&self) -> SearchConfig {
        self.config
    }

    /// Change the depth used by later searches
    pub fn set_depth(&mut self, depth: u32) {
        self.config = self.config.with_depth(depth);
    }

    /// Check if there's an active search
    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.current_job.is_some()
    }

    /// Start searching the current position on a background thread.
    ///
    /// Refused while another search runs, while a promotion is pending, once
    /// the game is over, or when the session is corrupted.
    pub fn start_search(&mut self) -> Result<(), MoveError> {
        if self.current_job.is_some() {
            return Err(MoveError::SearchInProgress);
        }
        if let Some(violation) = self.game.corruption() {
            return Err(MoveError::Corrupted(violation.clone()));
        }
        if let Some(square) = self.game.promotion_square() {
            return Err(MoveError::PromotionPending { square });
        }
        if self.game.status().is_over() {
            return Err(MoveError::GameOver);
        }

        let position = self.game.position().clone();
        let hash = position.hash();
        let config = self.config;
        let (sender, receiver) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("search".to_string())
            .stack_size(SEARCH_STACK_SIZE)
            .spawn(move || {
                let outcome = search(&position, &config);
                // The controller may have been dropped meanwhile
                let _ = sender.send(outcome);
            })
            .expect("failed to spawn search thread");

        log::debug!("search started at depth {}", config.depth);
        self.current_job = Some(SearchJob {
            handle,
            receiver,
            hash,
            snapshot: self.game.current_snapshot_index(),
        });
        Ok(())
    }

    /// Check for a finished search without blocking.
    ///
    /// A finished result is played through [`Game::make_move`]; a resulting
    /// promotion is resolved to a queen.
    pub fn poll_search(&mut self) -> Result<SearchUpdate, MoveError> {
        let Some(job) = &self.current_job else {
            return Ok(SearchUpdate::Idle);
        };
        match job.receiver.try_recv() {
            Ok((result, stats)) => self.finish_search(result, stats),
            Err(TryRecvError::Empty) => Ok(SearchUpdate::Running),
            Err(TryRecvError::Disconnected) => {
                if let Some(job) = self.current_job.take() {
                    job.wait();
                }
                Ok(SearchUpdate::Idle)
            }
        }
    }

    /// Block until the running search finishes, then handle it like
    /// [`GameController::poll_search`].
    pub fn wait_for_search(&mut self) -> Result<SearchUpdate, MoveError> {
        let Some(job) = &self.current_job else {
            return Ok(SearchUpdate::Idle);
        };
        match job.receiver.recv() {
            Ok((result, stats)) => self.finish_search(result, stats),
            Err(_) => {
                if let Some(job) = self.current_job.take() {
                    job.wait();
                }
                Ok(SearchUpdate::Idle)
            }
        }
    }

    fn finish_search(
        &mut self,
        result: SearchResult,
        stats: SearchStats,
    ) -> Result<SearchUpdate, MoveError> {
        let Some(job) = self.current_job.take() else {
            return Ok(SearchUpdate::Idle);
        };
        let (hash, snapshot) = (job.hash, job.snapshot);
        job.wait();
        log::debug!(
            "search finished: score {} after {} nodes",
            result.score,
            stats.nodes
        );

        if self.game.position().hash() != hash || self.game.current_snapshot_index() != snapshot
        {
            log::debug!("position changed during search, result discarded");
            return Ok(SearchUpdate::Discarded { result });
        }

        let Some(mv) = result.best_move else {
            return Ok(SearchUpdate::Finished {
                result,
                record: None,
            });
        };
        let record = match self.game.make_move(mv.from.index(), mv.to.index())? {
            MoveOutcome::Moved(record) => record,
            MoveOutcome::PromotionPending { .. } => self.game.promote_pawn(Piece::Queen)?,
        };
        Ok(SearchUpdate::Finished {
            result,
            record: Some(record),
        })
    }

    /// Play a move for the human side; refused while a search runs.
    pub fn make_move(&mut self, from: usize, to: usize) -> Result<MoveOutcome, MoveError> {
        if self.current_job.is_some() {
            return Err(MoveError::SearchInProgress);
        }
        self.game.make_move(from, to)
    }

    /// Resolve a pending promotion; refused while a search runs.
    pub fn promote_pawn(&mut self, piece: Piece) -> Result<MoveRecord, MoveError> {
        if self.current_job.is_some() {
            return Err(MoveError::SearchInProgress);
        }
        self.game.promote_pawn(piece)
    }

    /// Navigate to an earlier or later snapshot; allowed during a search.
    pub fn restore_snapshot(&mut self, index: usize) -> bool {
        self.game.restore_snapshot(index)
    }

    /// Reset to the starting position, waiting for any running search
    pub fn new_game(&mut self) {
        if let Some(job) = self.current_job.take() {
            job.wait();
        }
        self.game = Game::new();
    }
}

impl Drop for GameController {
    fn drop(&mut self) {
        if let Some(job) = self.current_job.take() {
            job.wait();
        }
    }
}
