//! Pattern Recognition
//!
//! Simon-style: the game plays a growing sequence of tiles and the player
//! repeats it. A wrong tile costs a life and replays the same sequence.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;

use super::{GameOutcome, MiniGameKind, OutcomeSlot, RoundEngine, RoundPhase};
use crate::game::{TimerId, Timeline};

/// Number of tiles on the board
pub const TILE_COUNT: usize = 6;
/// Lives at the start of a session
pub const START_LIVES: u32 = 3;

/// Tile colours as RGB, indexed by tile
pub const TILE_COLORS: [(u8, u8, u8); TILE_COUNT] = [
    (0xef, 0x44, 0x44),
    (0x3b, 0x82, 0xf6),
    (0x10, 0xb9, 0x81),
    (0xf5, 0x9e, 0x0b),
    (0x8b, 0x5c, 0xf6),
    (0xec, 0x48, 0x99),
];

const START_DELAY: Duration = Duration::from_millis(1000);
const STEP_GAP: Duration = Duration::from_millis(600);
const STEP_LIT: Duration = Duration::from_millis(400);
const RETRY_DELAY: Duration = Duration::from_millis(1000);
const NEXT_ROUND_DELAY: Duration = Duration::from_millis(1500);
const PRESS_FLASH: Duration = Duration::from_millis(200);

/// Rounds needed to win at a player level
pub fn max_rounds_for_level(level: u32) -> u32 {
    5 + level * 2
}

/// Points for a correctly repeated sequence
pub fn round_score(sequence_len: usize, lives: u32) -> u32 {
    sequence_len as u32 * 50 + lives * 25
}

#[derive(Debug, Clone, Copy)]
enum PatternEvent {
    /// Append a tile and play the sequence
    BeginRound,
    /// Light the tile at this step of the sequence
    Light(usize),
    Dim,
    PlaybackDone,
    /// Play the current sequence again after a mistake
    Replay,
    ClearFlash,
}

/// Read-only state for rendering
#[derive(Debug, Clone, Copy)]
pub struct PatternView<'a> {
    pub level: u32,
    pub round: u32,
    pub max_rounds: u32,
    pub lives: u32,
    pub score: u32,
    pub phase: RoundPhase,
    pub sequence_len: usize,
    /// How many tiles of the sequence the player has repeated this attempt
    pub progress: usize,
    pub showing_pattern: bool,
    /// Tile lit by playback
    pub lit: Option<usize>,
    /// Tile briefly highlighted by a player press
    pub flash: Option<usize>,
    pub sequence: &'a [usize],
}

pub struct PatternGame {
    level: u32,
    max_rounds: u32,
    sequence: Vec<usize>,
    input: Vec<usize>,
    round: u32,
    lives: u32,
    score: u32,
    phase: RoundPhase,
    showing_pattern: bool,
    lit: Option<usize>,
    flash: Option<usize>,
    flash_timer: Option<TimerId>,
    timeline: Timeline<PatternEvent>,
    outcome: OutcomeSlot,
    rng: StdRng,
}

impl PatternGame {
    pub fn new(level: u32, rng: StdRng) -> Self {
        Self {
            level,
            max_rounds: max_rounds_for_level(level),
            sequence: Vec::new(),
            input: Vec::new(),
            round: 1,
            lives: START_LIVES,
            score: 0,
            phase: RoundPhase::NotStarted,
            showing_pattern: false,
            lit: None,
            flash: None,
            flash_timer: None,
            timeline: Timeline::new(),
            outcome: OutcomeSlot::default(),
            rng,
        }
    }

    /// Reset the board and begin round 1 after a short delay
    pub fn start(&mut self) {
        self.timeline.clear();
        self.outcome.reset();
        self.sequence.clear();
        self.input.clear();
        self.round = 1;
        self.lives = START_LIVES;
        self.score = 0;
        self.lit = None;
        self.flash = None;
        self.flash_timer = None;
        self.showing_pattern = false;
        self.phase = RoundPhase::Feedback;
        self.timeline.schedule(START_DELAY, PatternEvent::BeginRound);
    }

    /// Press a tile. Returns false if the press was ignored.
    pub fn press(&mut self, tile: usize) -> bool {
        if !self.phase.accepts_input() || tile >= TILE_COUNT {
            return false;
        }

        self.flash = Some(tile);
        if let Some(id) = self.flash_timer.take() {
            self.timeline.cancel(id);
        }
        self.flash_timer = Some(self.timeline.schedule(PRESS_FLASH, PatternEvent::ClearFlash));

        self.input.push(tile);
        let step = self.input.len() - 1;

        if self.sequence.get(step) != Some(&tile) {
            self.miss();
        } else if self.input.len() == self.sequence.len() {
            self.finish_round();
        }
        true
    }

    fn miss(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        log::debug!("Pattern miss on round {}, {} lives left", self.round, self.lives);

        if self.lives == 0 {
            self.complete(false);
        } else {
            self.input.clear();
            self.phase = RoundPhase::Feedback;
            self.timeline.schedule(RETRY_DELAY, PatternEvent::Replay);
        }
    }

    fn finish_round(&mut self) {
        self.score += round_score(self.sequence.len(), self.lives);

        if self.round >= self.max_rounds {
            self.complete(true);
        } else {
            self.round += 1;
            self.phase = RoundPhase::Feedback;
            self.timeline.schedule(NEXT_ROUND_DELAY, PatternEvent::BeginRound);
        }
    }

    fn complete(&mut self, won: bool) {
        self.phase = RoundPhase::Completed;
        self.showing_pattern = false;
        self.lit = None;
        self.flash = None;
        self.flash_timer = None;
        self.timeline.clear();
        self.outcome.set(won, self.score);
        log::debug!("Pattern game over: won={} score={}", won, self.score);
    }

    fn play_sequence(&mut self) {
        self.phase = RoundPhase::Feedback;
        self.showing_pattern = true;
        self.input.clear();
        self.lit = None;

        let mut at = Duration::ZERO;
        for step in 0..self.sequence.len() {
            at += STEP_GAP;
            self.timeline.schedule(at, PatternEvent::Light(step));
            at += STEP_LIT;
            self.timeline.schedule(at, PatternEvent::Dim);
        }
        self.timeline.schedule(at, PatternEvent::PlaybackDone);
    }

    fn handle(&mut self, event: PatternEvent) {
        match event {
            PatternEvent::BeginRound => {
                let tile = self.rng.gen_range(0..TILE_COUNT);
                self.sequence.push(tile);
                self.play_sequence();
            }
            PatternEvent::Replay => self.play_sequence(),
            PatternEvent::Light(step) => self.lit = self.sequence.get(step).copied(),
            PatternEvent::Dim => self.lit = None,
            PatternEvent::PlaybackDone => {
                self.showing_pattern = false;
                self.phase = RoundPhase::InRound;
            }
            PatternEvent::ClearFlash => {
                self.flash = None;
                self.flash_timer = None;
            }
        }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn sequence(&self) -> &[usize] {
        &self.sequence
    }

    pub fn view(&self) -> PatternView<'_> {
        PatternView {
            level: self.level,
            round: self.round,
            max_rounds: self.max_rounds,
            lives: self.lives,
            score: self.score,
            phase: self.phase,
            sequence_len: self.sequence.len(),
            progress: self.input.len(),
            showing_pattern: self.showing_pattern,
            lit: self.lit,
            flash: self.flash,
            sequence: &self.sequence,
        }
    }
}

impl RoundEngine for PatternGame {
    fn kind(&self) -> MiniGameKind {
        MiniGameKind::Pattern
    }

    fn phase(&self) -> RoundPhase {
        self.phase
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn update(&mut self, delta: Duration) {
        let deadline = self.timeline.deadline(delta);
        while let Some(event) = self.timeline.pop_until(deadline) {
            self.handle(event);
        }
        self.timeline.settle_at(deadline);
    }

    fn take_outcome(&mut self) -> Option<GameOutcome> {
        self.outcome.take()
    }

    fn cancel_pending(&mut self) {
        self.timeline.clear();
        self.flash_timer = None;
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn started(level: u32) -> PatternGame {
        let mut game = PatternGame::new(level, StdRng::seed_from_u64(42));
        game.start();
        game
    }

    /// Let any pending playback or pause finish
    fn settle(game: &mut PatternGame) {
        game.update(Duration::from_secs(60));
    }

    fn replay(game: &mut PatternGame) {
        let sequence = game.sequence().to_vec();
        for tile in sequence {
            assert!(game.press(tile));
        }
    }

    fn wrong_tile(game: &PatternGame) -> usize {
        let expected = game.sequence()[game.view().progress];
        (expected + 1) % TILE_COUNT
    }

    #[test]
    fn test_start_delay_then_playback() {
        let mut game = started(1);
        assert_eq!(game.phase(), RoundPhase::Feedback);
        assert!(game.sequence().is_empty());

        game.update(Duration::from_millis(1000));
        assert_eq!(game.sequence().len(), 1);
        assert!(game.view().showing_pattern);
        assert!(!game.press(0));

        game.update(Duration::from_millis(600));
        assert_eq!(game.view().lit, Some(game.sequence()[0]));
        game.update(Duration::from_millis(400));
        assert_eq!(game.view().lit, None);
        assert_eq!(game.phase(), RoundPhase::InRound);
    }

    #[test]
    fn test_correct_round_scores_and_grows() {
        let mut game = started(1);
        settle(&mut game);
        replay(&mut game);

        assert_eq!(game.score(), round_score(1, 3));
        assert_eq!(game.round(), 2);
        assert_eq!(game.phase(), RoundPhase::Feedback);

        settle(&mut game);
        assert_eq!(game.sequence().len(), 2);
        assert_eq!(game.phase(), RoundPhase::InRound);
    }

    #[test]
    fn test_miss_replays_same_sequence() {
        let mut game = started(1);
        settle(&mut game);
        replay(&mut game);
        settle(&mut game);

        let before = game.sequence().to_vec();
        let wrong = wrong_tile(&game);
        game.press(wrong);
        assert_eq!(game.lives(), 2);
        assert_eq!(game.phase(), RoundPhase::Feedback);

        settle(&mut game);
        assert_eq!(game.sequence(), before.as_slice());
        assert_eq!(game.view().progress, 0);
    }

    #[test]
    fn test_lose_all_lives_on_round_two() {
        let mut game = started(1);
        assert_eq!(game.max_rounds(), 7);
        settle(&mut game);
        replay(&mut game);
        settle(&mut game);

        for _ in 0..3 {
            let wrong = wrong_tile(&game);
            game.press(wrong);
            settle(&mut game);
        }

        assert!(game.is_completed());
        assert_eq!(
            game.take_outcome(),
            Some(GameOutcome { won: false, score: 125 })
        );
        assert!(!game.press(0));
    }

    #[test]
    fn test_win_after_max_rounds() {
        let mut game = started(1);
        let mut expected = 0;
        for round in 1..=7 {
            settle(&mut game);
            assert_eq!(game.round(), round);
            replay(&mut game);
            expected += round_score(round as usize, 3);
        }

        assert!(game.is_completed());
        assert_eq!(
            game.take_outcome(),
            Some(GameOutcome { won: true, score: expected })
        );
    }

    #[test]
    fn test_press_flash_clears() {
        let mut game = started(1);
        settle(&mut game);
        replay(&mut game);
        assert!(game.view().flash.is_some());
        game.update(PRESS_FLASH);
        assert!(game.view().flash.is_none());
    }

    #[test]
    fn test_cancel_pending_freezes_engine() {
        let mut game = started(1);
        game.cancel_pending();
        game.update(Duration::from_secs(10));
        assert!(game.sequence().is_empty());
    }
}
