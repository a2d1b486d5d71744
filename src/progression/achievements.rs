//! Achievements
//!
//! A fixed catalog of milestones, each with a bounded progress counter and a
//! one-way unlock flag.

use serde::{Deserialize, Serialize};

/// Identifier for every achievement in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    FirstWin,
    CoinCollector,
    StreakMaster,
    GardenStarter,
    LevelUp,
}

impl AchievementId {
    /// Stable string key, as written to save files
    pub fn key(&self) -> &'static str {
        match self {
            AchievementId::FirstWin => "first_win",
            AchievementId::CoinCollector => "coin_collector",
            AchievementId::StreakMaster => "streak_master",
            AchievementId::GardenStarter => "garden_starter",
            AchievementId::LevelUp => "level_up",
        }
    }

    /// Parse a save-file key. Unknown keys yield `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        ACHIEVEMENTS.iter().map(|def| def.id).find(|id| id.key() == key)
    }

    /// Static definition for this achievement
    pub fn def(&self) -> &'static AchievementDef {
        // Catalog order matches declaration order
        &ACHIEVEMENTS[*self as usize]
    }
}

/// Achievement definition
#[derive(Debug, Clone, Copy)]
pub struct AchievementDef {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub max_progress: u32,
}

/// The full catalog, in display order
pub const ACHIEVEMENTS: [AchievementDef; 5] = [
    AchievementDef {
        id: AchievementId::FirstWin,
        name: "First Victory",
        description: "Win your first brain training game",
        icon: "🏆",
        max_progress: 1,
    },
    AchievementDef {
        id: AchievementId::CoinCollector,
        name: "Coin Collector",
        description: "Collect 100 coins",
        icon: "🪙",
        max_progress: 100,
    },
    AchievementDef {
        id: AchievementId::StreakMaster,
        name: "Streak Master",
        description: "Get a 10-game winning streak",
        icon: "🔥",
        max_progress: 10,
    },
    AchievementDef {
        id: AchievementId::GardenStarter,
        name: "Garden Starter",
        description: "Plant your first magical plant",
        icon: "🌱",
        max_progress: 1,
    },
    AchievementDef {
        id: AchievementId::LevelUp,
        name: "Level Up",
        description: "Reach level 5",
        icon: "⭐",
        max_progress: 5,
    },
];

/// Unlock state and progress of a single achievement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub unlocked: bool,
    pub progress: u32,
    pub max_progress: u32,
}

impl Achievement {
    fn from_def(def: &AchievementDef) -> Self {
        Self {
            id: def.id,
            unlocked: false,
            progress: 0,
            max_progress: def.max_progress,
        }
    }

    pub fn name(&self) -> &'static str {
        self.id.def().name
    }

    pub fn description(&self) -> &'static str {
        self.id.def().description
    }

    pub fn icon(&self) -> &'static str {
        self.id.def().icon
    }

    /// Progress as a fraction in [0, 1]
    pub fn ratio(&self) -> f64 {
        if self.max_progress == 0 {
            return 0.0;
        }
        f64::from(self.progress.min(self.max_progress)) / f64::from(self.max_progress)
    }
}

/// Tracks every achievement in the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementTracker {
    achievements: Vec<Achievement>,
}

impl AchievementTracker {
    /// Fresh tracker with the full catalog locked
    pub fn new() -> Self {
        Self {
            achievements: ACHIEVEMENTS.iter().map(Achievement::from_def).collect(),
        }
    }

    /// Rebuild a tracker from saved records.
    ///
    /// Records are laid over the default catalog by id, so entries missing
    /// from the save stay at their defaults. Saved progress is clamped to the
    /// catalog's bound.
    pub fn from_saved(records: impl IntoIterator<Item = Achievement>) -> Self {
        let mut tracker = Self::new();
        for record in records {
            if let Some(slot) = tracker.find_mut(record.id) {
                slot.progress = record.progress.min(slot.max_progress);
                slot.unlocked = record.unlocked;
            }
        }
        tracker
    }

    pub fn all(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn get(&self, id: AchievementId) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id == id)
    }

    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.get(id).is_some_and(|a| a.unlocked)
    }

    pub fn unlocked_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.unlocked).count()
    }

    /// Set progress toward an achievement, unlocking it once the bound is reached.
    ///
    /// Ignored for ids missing from the tracker and for achievements that are
    /// already unlocked.
    pub fn update_progress(&mut self, id: AchievementId, progress: u32) {
        let Some(achievement) = self.find_mut(id) else {
            return;
        };
        if achievement.unlocked {
            return;
        }

        achievement.progress = progress.min(achievement.max_progress);
        if achievement.progress >= achievement.max_progress {
            achievement.unlocked = true;
            log::info!("Achievement unlocked: {}", id.key());
        }
    }

    /// Unlock an achievement regardless of its progress.
    /// Returns true if this call changed it from locked to unlocked.
    pub fn unlock(&mut self, id: AchievementId) -> bool {
        let Some(achievement) = self.find_mut(id) else {
            return false;
        };
        if achievement.unlocked {
            return false;
        }
        achievement.unlocked = true;
        achievement.progress = achievement.max_progress;
        log::info!("Achievement unlocked: {}", id.key());
        true
    }

    fn find_mut(&mut self, id: AchievementId) -> Option<&mut Achievement> {
        self.achievements.iter_mut().find(|a| a.id == id)
    }
}

impl Default for AchievementTracker {
    fn default() -> Self {
        Self::new()
    }
}
