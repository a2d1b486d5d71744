//! Logic puzzle definitions

use serde::{Deserialize, Serialize};

/// Puzzle category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PuzzleKind {
    Sequence,
    Math,
    Spatial,
}

impl PuzzleKind {
    pub fn name(&self) -> &'static str {
        match self {
            PuzzleKind::Sequence => "Sequence",
            PuzzleKind::Math => "Math",
            PuzzleKind::Spatial => "Spatial",
        }
    }
}

/// A multiple-choice question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicPuzzle {
    pub id: String,
    pub kind: PuzzleKind,
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`
    pub correct: usize,
    pub difficulty: u32,
}

impl LogicPuzzle {
    fn new(
        id: &str,
        kind: PuzzleKind,
        question: &str,
        options: [&str; 4],
        correct: usize,
        difficulty: u32,
    ) -> Self {
        Self {
            id: id.to_string(),
            kind,
            question: question.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct,
            difficulty,
        }
    }

    /// A puzzle is usable if its answer index points at an option
    pub fn is_valid(&self) -> bool {
        self.correct < self.options.len()
    }
}

/// The full puzzle pool
#[derive(Debug, Clone, Default)]
pub struct PuzzleBank {
    puzzles: Vec<LogicPuzzle>,
}

impl PuzzleBank {
    /// Build a bank, dropping puzzles whose answer index is out of range
    pub fn new(puzzles: Vec<LogicPuzzle>) -> Self {
        let puzzles = puzzles
            .into_iter()
            .filter(|p| {
                let ok = p.is_valid();
                if !ok {
                    log::warn!("Puzzle '{}' has no option {}; skipped", p.id, p.correct);
                }
                ok
            })
            .collect();
        Self { puzzles }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_puzzles())
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    pub fn all(&self) -> &[LogicPuzzle] {
        &self.puzzles
    }

    /// Puzzles at most one difficulty step above the player's level
    pub fn eligible(&self, level: u32) -> Vec<&LogicPuzzle> {
        self.puzzles
            .iter()
            .filter(|p| p.difficulty <= level + 1)
            .collect()
    }
}

/// Built-in puzzle pool
pub fn default_puzzles() -> Vec<LogicPuzzle> {
    use PuzzleKind::*;

    vec![
        LogicPuzzle::new(
            "1",
            Sequence,
            "What comes next in the sequence: 2, 4, 8, 16, ?",
            ["24", "32", "20", "18"],
            1,
            1,
        ),
        LogicPuzzle::new(
            "2",
            Math,
            "If a magical flower doubles every day and fills a garden in 30 days, when is the garden half full?",
            ["Day 15", "Day 29", "Day 25", "Day 28"],
            1,
            2,
        ),
        LogicPuzzle::new(
            "3",
            Spatial,
            "Which shape completes the pattern: ○ △ ○ △ ?",
            ["○", "△", "□", "♦"],
            0,
            1,
        ),
        LogicPuzzle::new(
            "4",
            Sequence,
            "Complete the pattern: 1, 1, 2, 3, 5, 8, ?",
            ["11", "13", "10", "15"],
            1,
            3,
        ),
        LogicPuzzle::new(
            "5",
            Math,
            "A garden has 3 magical trees. Each tree has 4 branches. Each branch has 5 leaves. How many leaves total?",
            ["60", "45", "50", "55"],
            0,
            2,
        ),
        LogicPuzzle::new(
            "6",
            Spatial,
            "If you rotate ↑ clockwise 90 degrees, what do you get?",
            ["↓", "→", "←", "↑"],
            1,
            2,
        ),
        LogicPuzzle::new(
            "7",
            Sequence,
            "What's the missing number: 3, 6, 12, ?, 48",
            ["18", "24", "20", "30"],
            1,
            2,
        ),
        LogicPuzzle::new(
            "8",
            Math,
            "A magical pond doubles its lily pads each day. If it has 8 lily pads on day 3, how many on day 1?",
            ["1", "2", "4", "6"],
            1,
            3,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let bank = PuzzleBank::with_defaults();
        assert_eq!(bank.len(), 8);
        assert!(bank.all().iter().all(LogicPuzzle::is_valid));
    }

    #[test]
    fn test_eligible_by_level() {
        let bank = PuzzleBank::with_defaults();
        assert_eq!(bank.eligible(1).len(), 6);
        assert_eq!(bank.eligible(2).len(), 8);
        assert!(bank.eligible(1).iter().all(|p| p.difficulty <= 2));
    }

    #[test]
    fn test_invalid_puzzles_dropped() {
        let mut puzzles = default_puzzles();
        puzzles[0].correct = 9;
        assert_eq!(PuzzleBank::new(puzzles).len(), 7);
    }
}
