//! Logic Puzzles
//!
//! Multiple-choice puzzles against a per-puzzle clock. Running out of time
//! counts as a wrong answer. The session always ends as a win; the score is
//! what varies.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::puzzles::{LogicPuzzle, PuzzleBank};
use super::{GameOutcome, MiniGameKind, OutcomeSlot, RoundEngine, RoundPhase};
use crate::game::{TimerId, Timeline};

/// Time allowed for each puzzle
pub const TIME_PER_PUZZLE: Duration = Duration::from_secs(30);
/// Pause while the answer is revealed
pub const REVEAL_DELAY: Duration = Duration::from_millis(2000);

/// Puzzles in a session at a player level, bounded by the pool size
pub fn puzzle_count_for_level(level: u32, pool_size: usize) -> usize {
    (5 + level as usize).min(pool_size)
}

/// Points for a correct answer
pub fn answer_score(difficulty: u32, remaining_seconds: u32) -> u32 {
    100 + difficulty * 50 + remaining_seconds * 5
}

/// How the current puzzle was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Chosen(usize),
    TimedOut,
}

#[derive(Debug, Clone, Copy)]
enum LogicEvent {
    Timeout,
    Advance,
}

/// Read-only state for rendering
#[derive(Debug, Clone, Copy)]
pub struct LogicView<'a> {
    pub level: u32,
    pub puzzle: Option<&'a LogicPuzzle>,
    /// Zero-based position in the session
    pub index: usize,
    pub total: usize,
    pub remaining_seconds: u32,
    pub score: u32,
    pub correct_answers: u32,
    pub phase: RoundPhase,
    /// Set while the answer is being revealed
    pub answer: Option<Answer>,
}

pub struct LogicGame {
    level: u32,
    pool: Vec<LogicPuzzle>,
    /// Shuffled draw order into `pool`
    deck: Vec<usize>,
    deck_pos: usize,
    total: usize,
    index: usize,
    current: Option<usize>,
    deadline: Duration,
    timeout: Option<TimerId>,
    answer: Option<Answer>,
    correct_answers: u32,
    score: u32,
    phase: RoundPhase,
    timeline: Timeline<LogicEvent>,
    outcome: OutcomeSlot,
    rng: StdRng,
}

impl LogicGame {
    pub fn new(level: u32, bank: &PuzzleBank, rng: StdRng) -> Self {
        let pool: Vec<LogicPuzzle> = bank.eligible(level).into_iter().cloned().collect();
        Self {
            level,
            total: puzzle_count_for_level(level, bank.len()),
            pool,
            deck: Vec::new(),
            deck_pos: 0,
            index: 0,
            current: None,
            deadline: Duration::ZERO,
            timeout: None,
            answer: None,
            correct_answers: 0,
            score: 0,
            phase: RoundPhase::NotStarted,
            timeline: Timeline::new(),
            outcome: OutcomeSlot::default(),
            rng,
        }
    }

    pub fn start(&mut self) {
        self.timeline.clear();
        self.outcome.reset();
        self.deck.clear();
        self.deck_pos = 0;
        self.index = 0;
        self.correct_answers = 0;
        self.score = 0;
        self.answer = None;
        self.current = None;
        self.timeout = None;

        if self.pool.is_empty() || self.total == 0 {
            log::warn!("No logic puzzles available at level {}", self.level);
            self.complete();
            return;
        }
        self.next_puzzle();
    }

    /// Choose an option for the current puzzle. Returns false if ignored.
    pub fn answer(&mut self, option: usize) -> bool {
        if !self.phase.accepts_input() {
            return false;
        }
        let Some((correct, difficulty, id)) = self.current_puzzle().and_then(|puzzle| {
            (option < puzzle.options.len())
                .then(|| (puzzle.correct, puzzle.difficulty, puzzle.id.clone()))
        }) else {
            return false;
        };

        if option == correct {
            let points = answer_score(difficulty, self.remaining_seconds());
            self.score += points;
            self.correct_answers += 1;
            log::debug!("Logic puzzle {} correct (+{})", id, points);
        }
        self.reveal(Answer::Chosen(option));
        true
    }

    /// Whole seconds left on the current puzzle, rounded up
    pub fn remaining_seconds(&self) -> u32 {
        if self.phase != RoundPhase::InRound {
            return 0;
        }
        let left = self.deadline.saturating_sub(self.timeline.now());
        left.as_millis().div_ceil(1000) as u32
    }

    fn reveal(&mut self, answer: Answer) {
        if let Some(id) = self.timeout.take() {
            self.timeline.cancel(id);
        }
        self.answer = Some(answer);
        self.phase = RoundPhase::Feedback;
        self.timeline.schedule(REVEAL_DELAY, LogicEvent::Advance);
    }

    fn next_puzzle(&mut self) {
        if self.deck_pos >= self.deck.len() {
            self.deck = (0..self.pool.len()).collect();
            self.deck.shuffle(&mut self.rng);
            self.deck_pos = 0;
        }
        self.current = Some(self.deck[self.deck_pos]);
        self.deck_pos += 1;

        self.answer = None;
        self.deadline = self.timeline.deadline(TIME_PER_PUZZLE);
        self.timeout = Some(self.timeline.schedule(TIME_PER_PUZZLE, LogicEvent::Timeout));
        self.phase = RoundPhase::InRound;
    }

    fn handle(&mut self, event: LogicEvent) {
        match event {
            LogicEvent::Timeout => {
                self.timeout = None;
                if self.phase == RoundPhase::InRound {
                    log::debug!("Logic puzzle {} timed out", self.index + 1);
                    self.reveal(Answer::TimedOut);
                }
            }
            LogicEvent::Advance => {
                if self.index + 1 >= self.total {
                    self.complete();
                } else {
                    self.index += 1;
                    self.next_puzzle();
                }
            }
        }
    }

    fn complete(&mut self) {
        self.phase = RoundPhase::Completed;
        self.timeline.clear();
        self.timeout = None;
        self.outcome.set(true, self.score);
        log::debug!(
            "Logic game completed: {}/{} correct, score {}",
            self.correct_answers,
            self.total,
            self.score
        );
    }

    pub fn current_puzzle(&self) -> Option<&LogicPuzzle> {
        self.current.and_then(|idx| self.pool.get(idx))
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    pub fn view(&self) -> LogicView<'_> {
        LogicView {
            level: self.level,
            puzzle: self.current_puzzle(),
            index: self.index,
            total: self.total,
            remaining_seconds: self.remaining_seconds(),
            score: self.score,
            correct_answers: self.correct_answers,
            phase: self.phase,
            answer: self.answer,
        }
    }
}

impl RoundEngine for LogicGame {
    fn kind(&self) -> MiniGameKind {
        MiniGameKind::Logic
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
        self.timeout = None;
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::minigames::puzzles::default_puzzles;

    fn started(level: u32) -> LogicGame {
        let mut game = LogicGame::new(level, &PuzzleBank::with_defaults(), StdRng::seed_from_u64(3));
        game.start();
        game
    }

    fn correct_option(game: &LogicGame) -> usize {
        game.current_puzzle().unwrap().correct
    }

    fn wrong_option(game: &LogicGame) -> usize {
        (correct_option(game) + 1) % 4
    }

    #[test]
    fn test_session_length() {
        assert_eq!(started(1).total(), 6);
        assert_eq!(started(2).total(), 7);
        assert_eq!(started(10).total(), 8);
    }

    #[test]
    fn test_only_eligible_puzzles_drawn() {
        let mut game = started(1);
        for _ in 0..game.total() {
            assert!(game.current_puzzle().unwrap().difficulty <= 2);
            game.answer(0);
            game.update(REVEAL_DELAY);
        }
        assert!(game.is_completed());
    }

    #[test]
    fn test_correct_answer_scores_with_time_bonus() {
        let mut game = started(1);
        game.update(Duration::from_millis(4500));
        assert_eq!(game.remaining_seconds(), 26);

        let difficulty = game.current_puzzle().unwrap().difficulty;
        assert!(game.answer(correct_option(&game)));
        assert_eq!(game.score(), answer_score(difficulty, 26));
        assert_eq!(game.correct_answers(), 1);
        assert_eq!(game.phase(), RoundPhase::Feedback);
    }

    #[test]
    fn test_wrong_answer_scores_nothing() {
        let mut game = started(1);
        game.answer(wrong_option(&game));
        assert_eq!(game.score(), 0);
        assert_eq!(game.view().answer, Some(Answer::Chosen(wrong_option(&game))));
    }

    #[test]
    fn test_out_of_range_option_ignored() {
        let mut game = started(1);
        assert!(!game.answer(4));
        assert_eq!(game.phase(), RoundPhase::InRound);
        assert_eq!(game.view().answer, None);

        // The same puzzle still takes a real answer afterwards
        assert!(game.answer(correct_option(&game)));
        assert_eq!(game.correct_answers(), 1);
    }

    #[test]
    fn test_answers_ignored_during_reveal() {
        let mut game = started(1);
        game.answer(wrong_option(&game));
        assert!(!game.answer(correct_option(&game)));
        assert_eq!(game.score(), 0);

        game.update(REVEAL_DELAY);
        assert_eq!(game.phase(), RoundPhase::InRound);
        assert_eq!(game.view().index, 1);
        assert_eq!(game.remaining_seconds(), 30);
    }

    #[test]
    fn test_timeout_counts_as_wrong() {
        let mut game = started(1);
        game.update(TIME_PER_PUZZLE);
        assert_eq!(game.view().answer, Some(Answer::TimedOut));
        assert_eq!(game.phase(), RoundPhase::Feedback);
        assert!(!game.answer(correct_option(&game)));
    }

    #[test]
    fn test_answer_cancels_timeout() {
        let mut game = started(1);
        game.answer(correct_option(&game));
        game.update(REVEAL_DELAY);
        let score = game.score();

        // The first puzzle's timeout must not leak into the second
        game.update(Duration::from_secs(29));
        assert_eq!(game.phase(), RoundPhase::InRound);
        assert_eq!(game.score(), score);
    }

    #[test]
    fn test_all_timeouts_still_win() {
        let mut game = started(1);
        game.update(Duration::from_secs(600));
        assert!(game.is_completed());
        assert_eq!(game.take_outcome(), Some(GameOutcome { won: true, score: 0 }));
        assert!(game.take_outcome().is_none());
    }

    #[test]
    fn test_empty_pool_completes_immediately() {
        let hard_only: Vec<LogicPuzzle> = default_puzzles()
            .into_iter()
            .filter(|p| p.difficulty == 3)
            .collect();
        let mut game = LogicGame::new(1, &PuzzleBank::new(hard_only), StdRng::seed_from_u64(1));
        game.start();
        assert!(game.is_completed());
        assert_eq!(game.take_outcome(), Some(GameOutcome { won: true, score: 0 }));
    }
}
