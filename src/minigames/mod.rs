//! Brain training mini-games
//!
//! Each game is a round engine: a self-contained session state machine that
//! moves `NotStarted -> InRound -> (Feedback -> InRound)* -> Completed` and
//! yields a single [`GameOutcome`] when it completes.

pub mod memory;
pub mod pattern;
pub mod logic;
pub mod puzzles;

use std::time::Duration;

pub use logic::{Answer, LogicGame, LogicView};
pub use memory::{MemoryGame, MemoryView};
pub use pattern::{PatternGame, PatternView};
pub use puzzles::{LogicPuzzle, PuzzleBank, PuzzleKind};

/// Where a session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// Created but not started
    NotStarted,
    /// Waiting for player input
    InRound,
    /// A timed pause (flip-back, playback, answer reveal); input is ignored
    Feedback,
    /// Finished; the outcome is available
    Completed,
}

impl RoundPhase {
    pub fn accepts_input(&self) -> bool {
        matches!(self, RoundPhase::InRound)
    }
}

/// Result of a finished session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOutcome {
    pub won: bool,
    pub score: u32,
}

/// The three mini-games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MiniGameKind {
    Memory,
    Pattern,
    Logic,
}

impl MiniGameKind {
    pub fn name(&self) -> &'static str {
        match self {
            MiniGameKind::Memory => "Memory Match",
            MiniGameKind::Pattern => "Pattern Recognition",
            MiniGameKind::Logic => "Logic Puzzles",
        }
    }

    pub fn blurb(&self) -> &'static str {
        match self {
            MiniGameKind::Memory => "Find matching pairs of flowers",
            MiniGameKind::Pattern => "Watch the pattern and repeat it back",
            MiniGameKind::Logic => "Solve logic puzzles against the clock",
        }
    }
}

/// Behaviour shared by every round engine
pub trait RoundEngine {
    fn kind(&self) -> MiniGameKind;

    fn phase(&self) -> RoundPhase;

    /// Score accumulated so far
    fn score(&self) -> u32;

    /// Advance the engine clock and fire any transitions that became due
    fn update(&mut self, delta: Duration);

    /// The session outcome. Returns `Some` exactly once, after completion.
    fn take_outcome(&mut self) -> Option<GameOutcome>;

    /// Drop every pending timed transition
    fn cancel_pending(&mut self);

    fn is_completed(&self) -> bool {
        self.phase() == RoundPhase::Completed
    }
}

/// Holds a finished session's outcome until it is taken
#[derive(Debug, Clone, Default)]
pub(crate) struct OutcomeSlot {
    outcome: Option<GameOutcome>,
    taken: bool,
}

impl OutcomeSlot {
    /// Store the outcome. Later calls for the same session are ignored.
    pub(crate) fn set(&mut self, won: bool, score: u32) {
        if self.outcome.is_none() && !self.taken {
            self.outcome = Some(GameOutcome { won, score });
        }
    }

    pub(crate) fn take(&mut self) -> Option<GameOutcome> {
        let outcome = self.outcome.take();
        if outcome.is_some() {
            self.taken = true;
        }
        outcome
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_taken_once() {
        let mut slot = OutcomeSlot::default();
        assert!(slot.take().is_none());

        slot.set(true, 10);
        slot.set(false, 0);
        assert_eq!(slot.take(), Some(GameOutcome { won: true, score: 10 }));
        assert!(slot.take().is_none());

        slot.set(true, 99);
        assert!(slot.take().is_none());
    }

    #[test]
    fn test_only_in_round_accepts_input() {
        assert!(RoundPhase::InRound.accepts_input());
        assert!(!RoundPhase::Feedback.accepts_input());
        assert!(!RoundPhase::NotStarted.accepts_input());
        assert!(!RoundPhase::Completed.accepts_input());
    }
}
