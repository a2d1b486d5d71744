//! Player progression store
//!
//! Owns coins, experience, streaks and game totals together with the
//! achievement tracker, and persists them to the progress slot.

use serde::{Deserialize, Serialize};

use super::achievements::{Achievement, AchievementId, AchievementTracker};
use super::xp::{coins_for_win, experience_into_level, level_for_experience, XP_PER_WIN};
use crate::save::{ProgressSave, SharedStore, StorageError, PROGRESS_SLOT};

/// Snapshot of the player's progression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProgress {
    pub coins: u32,
    pub experience: u32,
    /// Always `experience / 100 + 1`
    pub level: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    pub games_played: u32,
    pub games_won: u32,
    pub total_score: u64,
}

impl Default for PlayerProgress {
    fn default() -> Self {
        Self {
            coins: 0,
            experience: 0,
            level: 1,
            current_streak: 0,
            best_streak: 0,
            games_played: 0,
            games_won: 0,
            total_score: 0,
        }
    }
}

impl PlayerProgress {
    /// Experience earned toward the next level
    pub fn experience_into_level(&self) -> u32 {
        experience_into_level(self.experience)
    }

    /// Fraction of games won, 0.0 when nothing has been played
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            f64::from(self.games_won) / f64::from(self.games_played)
        }
    }
}

/// Progression state plus the slot it is persisted to
pub struct ProgressionStore {
    progress: PlayerProgress,
    achievements: AchievementTracker,
    storage: SharedStore,
}

impl ProgressionStore {
    /// Fresh store with default progress. Call [`ProgressionStore::load_game`]
    /// to pick up a previous session.
    pub fn new(storage: SharedStore) -> Self {
        Self {
            progress: PlayerProgress::default(),
            achievements: AchievementTracker::new(),
            storage,
        }
    }

    pub fn progress(&self) -> &PlayerProgress {
        &self.progress
    }

    pub fn coins(&self) -> u32 {
        self.progress.coins
    }

    pub fn level(&self) -> u32 {
        self.progress.level
    }

    pub fn achievements(&self) -> &[Achievement] {
        self.achievements.all()
    }

    pub fn tracker(&self) -> &AchievementTracker {
        &self.achievements
    }

    pub fn add_coins(&mut self, amount: u32) {
        self.progress.coins = self.progress.coins.saturating_add(amount);
        self.achievements
            .update_progress(AchievementId::CoinCollector, self.progress.coins);
    }

    /// Deduct coins if the player can afford it. Returns false (and changes
    /// nothing) when they cannot.
    pub fn spend_coins(&mut self, amount: u32) -> bool {
        if self.progress.coins >= amount {
            self.progress.coins -= amount;
            true
        } else {
            false
        }
    }

    pub fn add_experience(&mut self, amount: u32) {
        let old_level = self.progress.level;
        self.progress.experience = self.progress.experience.saturating_add(amount);
        self.progress.level = level_for_experience(self.progress.experience);

        if self.progress.level > old_level {
            log::info!("Level up: {} -> {}", old_level, self.progress.level);
            self.achievements
                .update_progress(AchievementId::LevelUp, self.progress.level);
        }
    }

    pub fn increment_streak(&mut self) {
        self.progress.current_streak = self.progress.current_streak.saturating_add(1);
        self.progress.best_streak = self.progress.best_streak.max(self.progress.current_streak);
        self.achievements
            .update_progress(AchievementId::StreakMaster, self.progress.current_streak);
    }

    pub fn reset_streak(&mut self) {
        self.progress.current_streak = 0;
    }

    /// Record the outcome of a finished mini-game session.
    ///
    /// This is the only path by which game results touch streaks, coins and
    /// experience.
    pub fn record_game(&mut self, won: bool, score: u32) {
        self.progress.games_played = self.progress.games_played.saturating_add(1);
        self.progress.total_score = self.progress.total_score.saturating_add(u64::from(score));

        if won {
            self.progress.games_won = self.progress.games_won.saturating_add(1);
            self.increment_streak();
            self.add_coins(coins_for_win(score));
            self.add_experience(XP_PER_WIN);

            if self.progress.games_won == 1 {
                self.unlock_achievement(AchievementId::FirstWin);
            }
        } else {
            self.reset_streak();
        }

        log::info!(
            "Recorded game: won={} score={} (played {}, won {})",
            won,
            score,
            self.progress.games_played,
            self.progress.games_won
        );
    }

    pub fn unlock_achievement(&mut self, id: AchievementId) -> bool {
        self.achievements.unlock(id)
    }

    pub fn update_achievement_progress(&mut self, id: AchievementId, progress: u32) {
        self.achievements.update_progress(id, progress);
    }

    /// Write the full state to the progress slot
    pub fn save_game(&self) -> Result<(), StorageError> {
        let save = ProgressSave::capture(&self.progress, self.achievements.all());
        let json = serde_json::to_string_pretty(&save)?;
        self.storage.write(PROGRESS_SLOT, &json)?;
        log::info!("Progress saved");
        Ok(())
    }

    /// Restore state from the progress slot.
    ///
    /// A missing slot leaves the current state alone; an unreadable or
    /// corrupt one is logged and also leaves it alone.
    pub fn load_game(&mut self) {
        let data = match self.storage.read(PROGRESS_SLOT) {
            Ok(Some(data)) => data,
            Ok(None) => {
                log::info!("No saved progress, starting fresh");
                return;
            }
            Err(e) => {
                log::warn!("Failed to read progress: {}", e);
                return;
            }
        };

        match ProgressSave::from_json_lenient(&data) {
            Ok(save) => {
                self.apply(&save);
                log::info!(
                    "Progress loaded: level {}, {} coins",
                    self.progress.level,
                    self.progress.coins
                );
            }
            Err(e) => log::warn!("Failed to parse saved progress: {}", e),
        }
    }

    /// Restore defaults and delete the saved slot
    pub fn reset_game(&mut self) -> Result<(), StorageError> {
        self.progress = PlayerProgress::default();
        self.achievements = AchievementTracker::new();
        self.storage.remove(PROGRESS_SLOT)?;
        log::info!("Progress reset");
        Ok(())
    }

    fn apply(&mut self, save: &ProgressSave) {
        let games_played = save.games_played;
        self.progress = PlayerProgress {
            coins: save.coins,
            experience: save.experience,
            // Level is derived, never trusted from disk
            level: level_for_experience(save.experience),
            current_streak: save.current_streak,
            best_streak: save.best_streak.max(save.current_streak),
            games_played,
            games_won: save.games_won.min(games_played),
            total_score: save.total_score,
        };
        self.achievements = AchievementTracker::from_saved(save.known_achievements());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::save::{KeyValueStore, MemoryStore};

    fn store() -> (ProgressionStore, MemoryStore) {
        let memory = MemoryStore::new();
        (ProgressionStore::new(Arc::new(memory.clone())), memory)
    }

    #[test]
    fn test_defaults() {
        let (store, _) = store();
        assert_eq!(store.progress(), &PlayerProgress::default());
        assert_eq!(store.level(), 1);
    }

    #[test]
    fn test_spend_coins_never_negative() {
        let (mut store, _) = store();
        store.add_coins(30);

        assert!(!store.spend_coins(31));
        assert_eq!(store.coins(), 30);
        assert!(store.spend_coins(30));
        assert_eq!(store.coins(), 0);
        assert!(!store.spend_coins(1));
        assert_eq!(store.coins(), 0);
    }

    #[test]
    fn test_add_coins_tracks_collector() {
        let (mut store, _) = store();
        store.add_coins(60);
        store.spend_coins(50);
        store.add_coins(30);

        let collector = store.tracker().get(AchievementId::CoinCollector).unwrap();
        assert_eq!(collector.progress, 40);
        assert!(!collector.unlocked);

        store.add_coins(70);
        assert!(store.tracker().is_unlocked(AchievementId::CoinCollector));
    }

    #[test]
    fn test_level_up_feeds_achievement() {
        let (mut store, _) = store();
        store.add_experience(250);
        assert_eq!(store.level(), 3);
        assert_eq!(store.tracker().get(AchievementId::LevelUp).unwrap().progress, 3);

        store.add_experience(200);
        assert_eq!(store.level(), 5);
        assert!(store.tracker().is_unlocked(AchievementId::LevelUp));
    }

    #[test]
    fn test_streaks() {
        let (mut store, _) = store();
        for _ in 0..4 {
            store.increment_streak();
        }
        store.reset_streak();
        store.increment_streak();

        assert_eq!(store.progress().current_streak, 1);
        assert_eq!(store.progress().best_streak, 4);
        assert_eq!(
            store.tracker().get(AchievementId::StreakMaster).unwrap().progress,
            1
        );
    }

    #[test]
    fn test_first_win_scenario() {
        let (mut store, _) = store();
        store.record_game(true, 250);

        let progress = store.progress();
        assert_eq!(progress.coins, 12);
        assert_eq!(progress.experience, 20);
        assert_eq!(progress.level, 1);
        assert_eq!(progress.games_played, 1);
        assert_eq!(progress.games_won, 1);
        assert_eq!(progress.total_score, 250);
        assert_eq!(progress.current_streak, 1);
        assert!(store.tracker().is_unlocked(AchievementId::FirstWin));
    }

    #[test]
    fn test_loss_resets_streak_only() {
        let (mut store, _) = store();
        store.record_game(true, 100);
        store.record_game(true, 100);
        store.record_game(false, 75);

        let progress = store.progress();
        assert_eq!(progress.current_streak, 0);
        assert_eq!(progress.best_streak, 2);
        assert_eq!(progress.games_played, 3);
        assert_eq!(progress.games_won, 2);
        assert_eq!(progress.total_score, 275);
        assert_eq!(progress.coins, 22);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let (mut store, memory) = store();
        store.record_game(true, 1120);
        store.record_game(false, 40);
        store.record_game(true, 300);
        store.spend_coins(5);
        store.save_game().unwrap();

        let mut fresh = ProgressionStore::new(Arc::new(memory));
        fresh.load_game();
        assert_eq!(fresh.progress(), store.progress());
        assert_eq!(fresh.achievements(), store.achievements());
    }

    #[test]
    fn test_load_missing_slot_keeps_defaults() {
        let (mut store, _) = store();
        store.load_game();
        assert_eq!(store.progress(), &PlayerProgress::default());
    }

    #[test]
    fn test_load_corrupt_slot_keeps_defaults() {
        let (mut store, memory) = store();
        memory.write(PROGRESS_SLOT, "{ this is not json").unwrap();
        store.load_game();
        assert_eq!(store.progress(), &PlayerProgress::default());
        assert_eq!(store.achievements().len(), 5);
    }

    #[test]
    fn test_load_rederives_level_and_clamps_wins() {
        let (mut store, memory) = store();
        memory
            .write(
                PROGRESS_SLOT,
                r#"{"experience": 420, "level": 99, "gamesPlayed": 2, "gamesWon": 9}"#,
            )
            .unwrap();
        store.load_game();
        assert_eq!(store.level(), 5);
        assert_eq!(store.progress().games_won, 2);
    }

    #[test]
    fn test_oversized_counters_survive_another_game() {
        let (mut store, memory) = store();
        memory
            .write(
                PROGRESS_SLOT,
                r#"{"gamesPlayed": 99999999999, "currentStreak": 99999999999}"#,
            )
            .unwrap();
        store.load_game();
        assert_eq!(store.progress().games_played, 0);
        assert_eq!(store.progress().current_streak, 0);

        store.record_game(true, 100);
        assert_eq!(store.progress().games_played, 1);
        assert_eq!(store.progress().current_streak, 1);
    }

    #[test]
    fn test_counters_saturate_at_max() {
        let (mut store, memory) = store();
        let max = u32::MAX;
        memory
            .write(
                PROGRESS_SLOT,
                &format!(
                    r#"{{"gamesPlayed": {max}, "gamesWon": {max}, "currentStreak": {max}, "bestStreak": {max}, "totalScore": {}}}"#,
                    u64::MAX
                ),
            )
            .unwrap();
        store.load_game();

        store.record_game(true, 100);
        store.record_game(true, 100);
        let progress = store.progress();
        assert_eq!(progress.games_played, max);
        assert_eq!(progress.games_won, max);
        assert_eq!(progress.current_streak, max);
        assert_eq!(progress.best_streak, max);
        assert_eq!(progress.total_score, u64::MAX);
    }

    #[test]
    fn test_reset_deletes_slot() {
        let (mut store, memory) = store();
        store.record_game(true, 500);
        store.save_game().unwrap();
        assert!(memory.contains(PROGRESS_SLOT));

        store.reset_game().unwrap();
        assert!(!memory.contains(PROGRESS_SLOT));
        assert_eq!(store.progress(), &PlayerProgress::default());
        assert_eq!(store.tracker().unlocked_count(), 0);
    }
}
