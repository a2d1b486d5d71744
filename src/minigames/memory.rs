//! Memory Match
//!
//! Pair-matching over a shuffled deck. Two face-up cards that don't match
//! flip back after a short delay; a match stays face up for good.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::{GameOutcome, MiniGameKind, OutcomeSlot, RoundEngine, RoundPhase};
use crate::game::Timeline;

/// Card faces, one per possible pair
pub const SYMBOLS: [&str; 12] = [
    "🌸", "🌺", "🌻", "🌷", "🌹", "🌼", "🪷", "🌾", "🍀", "🌿", "🍄", "🌵",
];

/// How long a mismatched pair stays visible
pub const FLIP_BACK_DELAY: Duration = Duration::from_millis(1000);

/// Difficulty tier for a player level (1..=4)
pub fn difficulty_for_level(level: u32) -> u32 {
    level.clamp(1, 4)
}

/// Number of pairs dealt at a player level
pub fn pair_count_for_level(level: u32) -> usize {
    4 + 2 * difficulty_for_level(level) as usize
}

/// Final score for a completed deck
pub fn memory_score(moves: u32, difficulty: u32) -> u32 {
    (1000 + difficulty * 200).saturating_sub(moves * 10)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryCard {
    pub symbol: &'static str,
    pub face_up: bool,
    pub matched: bool,
}

#[derive(Debug, Clone, Copy)]
enum MemoryEvent {
    FlipBack(usize, usize),
}

/// Read-only state for rendering
#[derive(Debug, Clone, Copy)]
pub struct MemoryView<'a> {
    pub level: u32,
    pub cards: &'a [MemoryCard],
    pub moves: u32,
    pub matched_pairs: usize,
    pub pair_count: usize,
    pub phase: RoundPhase,
    pub score: u32,
}

pub struct MemoryGame {
    level: u32,
    difficulty: u32,
    pair_count: usize,
    cards: Vec<MemoryCard>,
    /// Indices of unmatched cards currently face up (at most two)
    face_up: Vec<usize>,
    matched_pairs: usize,
    moves: u32,
    score: u32,
    phase: RoundPhase,
    timeline: Timeline<MemoryEvent>,
    outcome: OutcomeSlot,
    rng: StdRng,
}

impl MemoryGame {
    pub fn new(level: u32, rng: StdRng) -> Self {
        let difficulty = difficulty_for_level(level);
        Self {
            level,
            difficulty,
            pair_count: pair_count_for_level(level),
            cards: Vec::new(),
            face_up: Vec::with_capacity(2),
            matched_pairs: 0,
            moves: 0,
            score: 0,
            phase: RoundPhase::NotStarted,
            timeline: Timeline::new(),
            outcome: OutcomeSlot::default(),
            rng,
        }
    }

    /// Deal a freshly shuffled deck. Restarting discards any pending flip-back.
    pub fn start(&mut self) {
        let mut symbols: Vec<&'static str> = SYMBOLS[..self.pair_count]
            .iter()
            .chain(SYMBOLS[..self.pair_count].iter())
            .copied()
            .collect();
        symbols.shuffle(&mut self.rng);

        self.cards = symbols
            .into_iter()
            .map(|symbol| MemoryCard {
                symbol,
                face_up: false,
                matched: false,
            })
            .collect();
        self.face_up.clear();
        self.matched_pairs = 0;
        self.moves = 0;
        self.score = 0;
        self.timeline.clear();
        self.outcome.reset();
        self.phase = RoundPhase::InRound;

        log::debug!("Memory game dealt {} pairs", self.pair_count);
    }

    /// Turn a card face up. Returns false if the flip was ignored.
    pub fn flip(&mut self, index: usize) -> bool {
        if !self.phase.accepts_input() || self.face_up.len() >= 2 {
            return false;
        }
        let Some(card) = self.cards.get_mut(index) else {
            return false;
        };
        if card.matched || card.face_up {
            return false;
        }

        card.face_up = true;
        self.face_up.push(index);

        if self.face_up.len() == 2 {
            self.resolve_pair();
        }
        true
    }

    fn resolve_pair(&mut self) {
        let (first, second) = (self.face_up[0], self.face_up[1]);
        self.moves += 1;

        if self.cards[first].symbol == self.cards[second].symbol {
            self.cards[first].matched = true;
            self.cards[second].matched = true;
            self.matched_pairs += 1;
            self.face_up.clear();

            if self.matched_pairs == self.pair_count {
                self.complete();
            }
        } else {
            self.phase = RoundPhase::Feedback;
            self.timeline
                .schedule(FLIP_BACK_DELAY, MemoryEvent::FlipBack(first, second));
        }
    }

    fn handle(&mut self, event: MemoryEvent) {
        match event {
            MemoryEvent::FlipBack(first, second) => {
                for idx in [first, second] {
                    if let Some(card) = self.cards.get_mut(idx) {
                        card.face_up = false;
                    }
                }
                self.face_up.clear();
                if self.phase == RoundPhase::Feedback {
                    self.phase = RoundPhase::InRound;
                }
            }
        }
    }

    fn complete(&mut self) {
        self.score = memory_score(self.moves, self.difficulty);
        self.phase = RoundPhase::Completed;
        self.timeline.clear();
        self.outcome.set(true, self.score);
        log::debug!("Memory game completed in {} moves, score {}", self.moves, self.score);
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn pair_count(&self) -> usize {
        self.pair_count
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn cards(&self) -> &[MemoryCard] {
        &self.cards
    }

    pub fn view(&self) -> MemoryView<'_> {
        MemoryView {
            level: self.level,
            cards: &self.cards,
            moves: self.moves,
            matched_pairs: self.matched_pairs,
            pair_count: self.pair_count,
            phase: self.phase,
            score: self.score,
        }
    }
}

impl RoundEngine for MemoryGame {
    fn kind(&self) -> MiniGameKind {
        MiniGameKind::Memory
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
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn game(level: u32) -> MemoryGame {
        let mut game = MemoryGame::new(level, StdRng::seed_from_u64(7));
        game.start();
        game
    }

    /// Index pairs of matching cards, in deck order of first appearance
    fn pairs(game: &MemoryGame) -> Vec<(usize, usize)> {
        let cards = game.cards();
        let mut pairs = Vec::new();
        for i in 0..cards.len() {
            if let Some(j) = (i + 1..cards.len()).find(|&j| cards[j].symbol == cards[i].symbol) {
                pairs.push((i, j));
            }
        }
        pairs
    }

    #[test]
    fn test_deck_size_by_level() {
        assert_eq!(game(1).cards().len(), 12);
        assert_eq!(game(2).cards().len(), 16);
        assert_eq!(game(4).cards().len(), 24);
        assert_eq!(game(9).cards().len(), 24);
        assert_eq!(pairs(&game(4)).len(), 12);
    }

    #[test]
    fn test_not_started_ignores_flips() {
        let mut game = MemoryGame::new(1, StdRng::seed_from_u64(1));
        assert!(!game.flip(0));
        assert_eq!(game.phase(), RoundPhase::NotStarted);
    }

    #[test]
    fn test_mismatch_flips_back_after_delay() {
        let mut game = game(1);
        let pairs = pairs(&game);
        let (a, _) = pairs[0];
        let (b, _) = pairs[1];

        assert!(game.flip(a));
        assert!(game.flip(b));
        assert_eq!(game.moves(), 1);
        assert_eq!(game.phase(), RoundPhase::Feedback);

        // Clicks during the flip-back delay are ignored
        assert!(!game.flip(pairs[2].0));

        game.update(Duration::from_millis(999));
        assert!(game.cards()[a].face_up);

        game.update(Duration::from_millis(1));
        assert_eq!(game.phase(), RoundPhase::InRound);
        assert!(!game.cards()[a].face_up);
        assert!(!game.cards()[b].face_up);
    }

    #[test]
    fn test_same_card_twice_is_ignored() {
        let mut game = game(1);
        assert!(game.flip(3));
        assert!(!game.flip(3));
        assert_eq!(game.moves(), 0);
    }

    #[test]
    fn test_match_is_permanent() {
        let mut game = game(1);
        let (a, b) = pairs(&game)[0];
        game.flip(a);
        game.flip(b);

        assert!(game.cards()[a].matched && game.cards()[b].matched);
        assert_eq!(game.phase(), RoundPhase::InRound);
        assert!(!game.flip(a));
        game.update(Duration::from_secs(5));
        assert!(game.cards()[a].face_up);
    }

    #[test]
    fn test_complete_in_eight_moves() {
        let mut game = game(1);
        let pairs = pairs(&game);
        assert_eq!(pairs.len(), 6);

        // Two misses first
        for k in 0..2 {
            game.flip(pairs[k].0);
            game.flip(pairs[k + 1].0);
            game.update(FLIP_BACK_DELAY);
        }
        for &(a, b) in &pairs {
            game.flip(a);
            game.flip(b);
        }

        assert_eq!(game.moves(), 8);
        assert!(game.is_completed());
        assert_eq!(
            game.take_outcome(),
            Some(GameOutcome { won: true, score: 1120 })
        );
        assert!(game.take_outcome().is_none());
    }

    #[test]
    fn test_score_floor_at_zero() {
        assert_eq!(memory_score(8, 1), 1120);
        assert_eq!(memory_score(500, 1), 0);
    }

    #[test]
    fn test_restart_cancels_pending_flip_back() {
        let mut game = game(1);
        let pairs = pairs(&game);
        game.flip(pairs[0].0);
        game.flip(pairs[1].0);

        game.start();
        let (a, _) = self::pairs(&game)[0];
        assert!(game.flip(a));
        game.update(Duration::from_secs(2));
        assert!(game.cards()[a].face_up);
    }
}
