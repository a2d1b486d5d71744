//! First-run walkthrough

/// One page of the tutorial
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TutorialStep {
    pub title: &'static str,
    pub body: &'static str,
    pub icon: &'static str,
}

pub const TUTORIAL_STEPS: [TutorialStep; 6] = [
    TutorialStep {
        title: "Welcome to Mindgarden!",
        body: "Train your brain and build the garden of your dreams. Complete challenges to earn coins and unlock magical plants.",
        icon: "🧠",
    },
    TutorialStep {
        title: "Brain Training Games",
        body: "Play three kinds of brain games: Memory Match, Pattern Recognition and Logic Puzzles. Each one tests a different skill.",
        icon: "🎯",
    },
    TutorialStep {
        title: "Earn Coins & Experience",
        body: "Win games to earn coins and experience. Higher scores and win streaks give you more rewards.",
        icon: "⭐",
    },
    TutorialStep {
        title: "Build Your Garden",
        body: "Spend coins on plants. Magical plants unlock as you level up.",
        icon: "🌺",
    },
    TutorialStep {
        title: "Level Up",
        body: "Every 100 experience points is a new level. Higher levels make the games harder and unlock rarer plants.",
        icon: "🎊",
    },
    TutorialStep {
        title: "Achievements & Streaks",
        body: "Complete achievements and keep your win streak going. Check your progress any time from the menu.",
        icon: "🥇",
    },
];

/// Cursor over the tutorial pages
#[derive(Debug, Clone, Default)]
pub struct Tutorial {
    current: usize,
}

impl Tutorial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> &'static TutorialStep {
        &TUTORIAL_STEPS[self.current]
    }

    /// Zero-based page index
    pub fn index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        TUTORIAL_STEPS.len()
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == TUTORIAL_STEPS.len()
    }

    /// Move forward. Returns false on the last page.
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Move back. Returns false on the first page.
    pub fn prev(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    pub fn rewind(&mut self) {
        self.current = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_pages() {
        let mut tutorial = Tutorial::new();
        assert!(!tutorial.prev());
        for _ in 0..5 {
            assert!(tutorial.next());
        }
        assert!(tutorial.is_last());
        assert!(!tutorial.next());
        assert_eq!(tutorial.step().title, "Achievements & Streaks");

        tutorial.rewind();
        assert_eq!(tutorial.index(), 0);
    }
}
