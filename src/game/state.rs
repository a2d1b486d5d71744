//! Game state machine
//!
//! Owns the stores, the active mini-game, and the transitions between screens.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use super::time::AmbientTime;
use super::tutorial::Tutorial;
use crate::config::GameConfig;
use crate::data::DataManager;
use crate::garden::{snap_to_grid, GardenItem, GardenStore, PlantCatalog};
use crate::minigames::{
    GameOutcome, LogicGame, MemoryGame, MiniGameKind, PatternGame, RoundEngine,
};
use crate::progression::{AchievementId, ProgressionStore};
use crate::save::{SharedStore, StorageError};

/// Growth ticks between garden autosaves
const GARDEN_AUTOSAVE_TICKS: u32 = 60;
/// Messages kept in the log
const MAX_MESSAGES: usize = 50;

/// The main game struct that holds all game data
pub struct Game {
    mode: GameMode,
    config: GameConfig,
    data: DataManager,
    progression: ProgressionStore,
    garden: GardenStore,
    /// The running (or just finished) mini-game
    active: Option<ActiveGame>,
    /// Outcome of the most recent session, for the results banner
    last_outcome: Option<(MiniGameKind, GameOutcome)>,
    tutorial: Tutorial,
    growth: AmbientTime,
    ticks_since_save: u32,
    messages: Vec<GameMessage>,
    rng: StdRng,
}

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    Menu,
    Tutorial,
    Memory,
    Pattern,
    Logic,
    Garden,
    Achievements,
    Quit,
}

impl GameMode {
    pub fn minigame(&self) -> Option<MiniGameKind> {
        match self {
            GameMode::Memory => Some(MiniGameKind::Memory),
            GameMode::Pattern => Some(MiniGameKind::Pattern),
            GameMode::Logic => Some(MiniGameKind::Logic),
            _ => None,
        }
    }
}

impl From<MiniGameKind> for GameMode {
    fn from(kind: MiniGameKind) -> Self {
        match kind {
            MiniGameKind::Memory => GameMode::Memory,
            MiniGameKind::Pattern => GameMode::Pattern,
            MiniGameKind::Logic => GameMode::Logic,
        }
    }
}

/// Why a plant purchase was refused. Nothing is changed on error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PurchaseError {
    #[error("Unknown plant '{0}'")]
    UnknownPlant(String),
    #[error("{name} unlocks at level {required}")]
    Locked { name: String, required: u32 },
    #[error("{name} costs {cost} coins, you have {available}")]
    InsufficientCoins {
        name: String,
        cost: u32,
        available: u32,
    },
}

/// The mini-game currently in play
pub enum ActiveGame {
    Memory(MemoryGame),
    Pattern(PatternGame),
    Logic(LogicGame),
}

impl ActiveGame {
    pub fn as_engine(&self) -> &dyn RoundEngine {
        match self {
            ActiveGame::Memory(game) => game,
            ActiveGame::Pattern(game) => game,
            ActiveGame::Logic(game) => game,
        }
    }

    pub fn as_engine_mut(&mut self) -> &mut dyn RoundEngine {
        match self {
            ActiveGame::Memory(game) => game,
            ActiveGame::Pattern(game) => game,
            ActiveGame::Logic(game) => game,
        }
    }
}

/// A message to display in the status log
#[derive(Debug, Clone)]
pub struct GameMessage {
    pub text: String,
    pub category: MessageCategory,
}

/// Categories for message coloring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageCategory {
    Reward,
    Achievement,
    Garden,
    System,
    Warning,
}

impl Game {
    /// Create a game over the given storage and load both save slots
    pub fn new(config: GameConfig, storage: SharedStore, data: DataManager) -> Self {
        Self::with_rng(config, storage, data, StdRng::from_entropy())
    }

    /// Like [`Game::new`] with a fixed random source
    pub fn with_rng(
        config: GameConfig,
        storage: SharedStore,
        data: DataManager,
        rng: StdRng,
    ) -> Self {
        let mut progression = ProgressionStore::new(storage.clone());
        progression.load_game();
        let mut garden = GardenStore::new(storage);
        garden.load_garden();

        Self {
            mode: GameMode::Menu,
            growth: AmbientTime::new(config.growth_interval()),
            config,
            data,
            progression,
            garden,
            active: None,
            last_outcome: None,
            tutorial: Tutorial::new(),
            ticks_since_save: 0,
            messages: Vec::new(),
            rng,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Switch screens. Leaving a mini-game abandons it without recording.
    pub fn set_mode(&mut self, mode: GameMode) {
        if mode == self.mode {
            return;
        }
        log::debug!("Mode transition: {:?} -> {:?}", self.mode, mode);

        if self.mode.minigame().is_some() {
            self.abandon_minigame();
        }
        if mode == GameMode::Tutorial {
            self.tutorial.rewind();
        }
        self.mode = mode;
    }

    /// Build a fresh engine for the player's level and switch to its screen.
    /// Any previous engine is dropped with its pending timers.
    pub fn start_minigame(&mut self, kind: MiniGameKind) {
        self.abandon_minigame();

        let level = self.progression.level();
        let rng = StdRng::seed_from_u64(self.rng.gen());
        let active = match kind {
            MiniGameKind::Memory => {
                let mut game = MemoryGame::new(level, rng);
                game.start();
                ActiveGame::Memory(game)
            }
            MiniGameKind::Pattern => {
                let mut game = PatternGame::new(level, rng);
                game.start();
                ActiveGame::Pattern(game)
            }
            MiniGameKind::Logic => {
                let mut game = LogicGame::new(level, &self.data.puzzles, rng);
                game.start();
                ActiveGame::Logic(game)
            }
        };

        log::info!("Starting {} at level {}", kind.name(), level);
        self.active = Some(active);
        self.last_outcome = None;
        self.mode = kind.into();
        // An engine can finish during start (e.g. no puzzles to ask)
        self.collect_outcome();
    }

    fn abandon_minigame(&mut self) {
        if let Some(mut active) = self.active.take() {
            let engine = active.as_engine_mut();
            if !engine.is_completed() {
                log::debug!("Abandoning {}", engine.kind().name());
            }
            engine.cancel_pending();
        }
    }

    /// Update game state (called every frame)
    pub fn update(&mut self, delta: Duration) {
        if let Some(active) = self.active.as_mut() {
            active.as_engine_mut().update(delta);
        }
        self.collect_outcome();

        let ticks = self.growth.update(delta);
        if ticks > 0 {
            for _ in 0..ticks {
                self.garden.grow_plants();
            }
            self.ticks_since_save += ticks;
            if self.ticks_since_save >= GARDEN_AUTOSAVE_TICKS && !self.garden.is_empty() {
                self.ticks_since_save = 0;
                if let Err(e) = self.garden.save_garden() {
                    log::warn!("Failed to autosave garden: {}", e);
                }
            }
        }
    }

    /// Forward a finished session's outcome to the progression store, once
    fn collect_outcome(&mut self) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let engine = active.as_engine_mut();
        let kind = engine.kind();
        if let Some(outcome) = engine.take_outcome() {
            self.finish_session(kind, outcome);
        }
    }

    fn finish_session(&mut self, kind: MiniGameKind, outcome: GameOutcome) {
        let level_before = self.progression.level();
        let coins_before = self.progression.coins();
        let unlocked_before: Vec<AchievementId> = self.unlocked_ids();

        self.progression.record_game(outcome.won, outcome.score);
        self.last_outcome = Some((kind, outcome));

        if outcome.won {
            let earned = self.progression.coins() - coins_before;
            self.add_message(
                format!("{} won! Score {}, +{} coins", kind.name(), outcome.score, earned),
                MessageCategory::Reward,
            );
        } else {
            self.add_message(
                format!("{} lost with score {}", kind.name(), outcome.score),
                MessageCategory::System,
            );
        }

        let level = self.progression.level();
        if level > level_before {
            self.add_message(format!("Level up! You are now level {}", level), MessageCategory::Reward);
        }
        self.announce_unlocks(&unlocked_before);

        if let Err(e) = self.progression.save_game() {
            log::warn!("Failed to save progress: {}", e);
        }
    }

    fn unlocked_ids(&self) -> Vec<AchievementId> {
        self.progression
            .achievements()
            .iter()
            .filter(|a| a.unlocked)
            .map(|a| a.id)
            .collect()
    }

    fn announce_unlocks(&mut self, before: &[AchievementId]) {
        let newly: Vec<&'static str> = self
            .progression
            .achievements()
            .iter()
            .filter(|a| a.unlocked && !before.contains(&a.id))
            .map(|a| a.name())
            .collect();
        for name in newly {
            self.add_message(format!("Achievement unlocked: {}", name), MessageCategory::Achievement);
        }
    }

    /// Buy a plant and place it on the grid, returning the new item's id.
    ///
    /// Catalog lookup, level gate and payment all happen before anything is
    /// mutated.
    pub fn purchase_plant(&mut self, plant_id: &str, x: i32, y: i32) -> Result<String, PurchaseError> {
        let plant = self
            .data
            .plants
            .get(plant_id)
            .ok_or_else(|| PurchaseError::UnknownPlant(plant_id.to_string()))?;

        if !plant.is_unlocked_at(self.progression.level()) {
            return Err(PurchaseError::Locked {
                name: plant.name.clone(),
                required: plant.unlock_level,
            });
        }
        if !self.progression.spend_coins(plant.cost) {
            return Err(PurchaseError::InsufficientCoins {
                name: plant.name.clone(),
                cost: plant.cost,
                available: self.progression.coins(),
            });
        }

        let (x, y) = snap_to_grid(x, y);
        let id = self.garden.add_plant(&plant.id, x, y);
        let (name, magical) = (plant.name.clone(), plant.magical);

        let unlocked_before = self.unlocked_ids();
        if magical {
            self.progression.unlock_achievement(AchievementId::GardenStarter);
        }
        self.announce_unlocks(&unlocked_before);
        self.add_message(format!("Planted a {}", name), MessageCategory::Garden);

        if let Err(e) = self.save_all() {
            log::warn!("Failed to save after purchase: {}", e);
        }
        Ok(id)
    }

    /// Move a placed plant, snapping to the grid
    pub fn move_plant(&mut self, id: &str, x: i32, y: i32) -> bool {
        let (x, y) = snap_to_grid(x, y);
        let moved = self.garden.move_plant(id, x, y);
        if moved {
            if let Err(e) = self.garden.save_garden() {
                log::warn!("Failed to save garden: {}", e);
            }
        }
        moved
    }

    /// Dig up a plant. Coins are not refunded.
    pub fn remove_plant(&mut self, id: &str) -> Option<GardenItem> {
        let removed = self.garden.remove_plant(id)?;
        if let Err(e) = self.garden.save_garden() {
            log::warn!("Failed to save garden: {}", e);
        }
        Some(removed)
    }

    /// Wipe progress and garden, including both save slots
    pub fn reset_all(&mut self) -> Result<(), StorageError> {
        self.abandon_minigame();
        self.last_outcome = None;
        self.messages.clear();
        self.progression.reset_game()?;
        self.garden.clear_garden()?;
        self.add_message("All progress reset", MessageCategory::Warning);
        Ok(())
    }

    /// Write both save slots
    pub fn save_all(&self) -> Result<(), StorageError> {
        self.progression.save_game()?;
        self.garden.save_garden()
    }

    // Mini-game input

    /// Flip a memory card. Returns false if ignored.
    pub fn flip_card(&mut self, index: usize) -> bool {
        let flipped = match self.active.as_mut() {
            Some(ActiveGame::Memory(game)) => game.flip(index),
            _ => false,
        };
        self.collect_outcome();
        flipped
    }

    /// Press a pattern tile. Returns false if ignored.
    pub fn press_tile(&mut self, tile: usize) -> bool {
        let pressed = match self.active.as_mut() {
            Some(ActiveGame::Pattern(game)) => game.press(tile),
            _ => false,
        };
        self.collect_outcome();
        pressed
    }

    /// Answer the current logic puzzle. Returns false if ignored.
    pub fn answer_puzzle(&mut self, option: usize) -> bool {
        let answered = match self.active.as_mut() {
            Some(ActiveGame::Logic(game)) => game.answer(option),
            _ => false,
        };
        self.collect_outcome();
        answered
    }

    // Accessors

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn catalog(&self) -> &PlantCatalog {
        &self.data.plants
    }

    pub fn progression(&self) -> &ProgressionStore {
        &self.progression
    }

    pub fn garden(&self) -> &GardenStore {
        &self.garden
    }

    pub fn active(&self) -> Option<&ActiveGame> {
        self.active.as_ref()
    }

    pub fn last_outcome(&self) -> Option<(MiniGameKind, GameOutcome)> {
        self.last_outcome
    }

    pub fn tutorial(&self) -> &Tutorial {
        &self.tutorial
    }

    pub fn tutorial_mut(&mut self) -> &mut Tutorial {
        &mut self.tutorial
    }

    pub fn messages(&self) -> &[GameMessage] {
        &self.messages
    }

    /// Add a message to the log
    pub fn add_message(&mut self, text: impl Into<String>, category: MessageCategory) {
        self.messages.push(GameMessage {
            text: text.into(),
            category,
        });
        if self.messages.len() > MAX_MESSAGES {
            self.messages.remove(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::minigames::RoundPhase;
    use crate::save::{MemoryStore, GARDEN_SLOT, PROGRESS_SLOT};

    fn game_with(store: &MemoryStore) -> Game {
        Game::with_rng(
            GameConfig::default(),
            Arc::new(store.clone()),
            DataManager::default(),
            StdRng::seed_from_u64(11),
        )
    }

    fn rich_game(store: &MemoryStore, coins: u32) -> Game {
        let mut game = game_with(store);
        game.progression.add_coins(coins);
        game
    }

    #[test]
    fn test_starts_in_menu() {
        let game = game_with(&MemoryStore::new());
        assert_eq!(game.mode(), GameMode::Menu);
        assert!(game.active().is_none());
        assert_eq!(game.progression().level(), 1);
    }

    #[test]
    fn test_purchase_spends_snaps_and_saves() {
        let store = MemoryStore::new();
        let mut game = rich_game(&store, 30);

        let id = game.purchase_plant("sunflower", 45, 70).unwrap();
        assert_eq!(game.progression().coins(), 20);

        let item = game.garden().get(&id).unwrap();
        assert_eq!((item.x, item.y), (32, 64));
        assert!(store.contains(GARDEN_SLOT));
        assert!(store.contains(PROGRESS_SLOT));
    }

    #[test]
    fn test_purchase_errors_change_nothing() {
        let mut game = rich_game(&MemoryStore::new(), 12);

        assert_eq!(
            game.purchase_plant("cactus", 0, 0),
            Err(PurchaseError::UnknownPlant("cactus".into()))
        );
        assert!(matches!(
            game.purchase_plant("fairy_tree", 0, 0),
            Err(PurchaseError::Locked { required: 8, .. })
        ));
        assert!(matches!(
            game.purchase_plant("rose", 0, 0),
            Err(PurchaseError::InsufficientCoins { cost: 15, available: 12, .. })
        ));

        assert_eq!(game.progression().coins(), 12);
        assert!(game.garden().is_empty());
    }

    #[test]
    fn test_magical_plant_unlocks_garden_starter() {
        let mut game = rich_game(&MemoryStore::new(), 500);
        game.progression.add_experience(200);
        assert_eq!(game.progression().level(), 3);

        game.purchase_plant("sunflower", 0, 0).unwrap();
        assert!(!game.progression().tracker().is_unlocked(AchievementId::GardenStarter));

        game.purchase_plant("magic_mushroom", 32, 0).unwrap();
        assert!(game.progression().tracker().is_unlocked(AchievementId::GardenStarter));
    }

    #[test]
    fn test_outcome_recorded_once_and_saved() {
        let store = MemoryStore::new();
        let mut game = game_with(&store);
        game.start_minigame(MiniGameKind::Logic);
        assert_eq!(game.mode(), GameMode::Logic);

        // Let every puzzle time out
        game.update(Duration::from_secs(600));
        game.update(Duration::from_secs(1));

        let progress = game.progression().progress();
        assert_eq!(progress.games_played, 1);
        assert_eq!(progress.games_won, 1);
        assert_eq!(progress.coins, 10);
        assert!(game.progression().tracker().is_unlocked(AchievementId::FirstWin));
        assert!(store.contains(PROGRESS_SLOT));
        assert_eq!(
            game.last_outcome(),
            Some((MiniGameKind::Logic, GameOutcome { won: true, score: 0 }))
        );
    }

    #[test]
    fn test_leaving_minigame_abandons_it() {
        let mut game = game_with(&MemoryStore::new());
        game.start_minigame(MiniGameKind::Pattern);
        game.set_mode(GameMode::Menu);

        assert!(game.active().is_none());
        game.update(Duration::from_secs(600));
        assert_eq!(game.progression().progress().games_played, 0);
    }

    #[test]
    fn test_restart_replaces_engine() {
        let mut game = game_with(&MemoryStore::new());
        game.start_minigame(MiniGameKind::Memory);
        assert!(game.flip_card(0));
        game.start_minigame(MiniGameKind::Memory);

        let Some(ActiveGame::Memory(memory)) = game.active() else {
            panic!("memory game should be active");
        };
        assert_eq!(memory.phase(), RoundPhase::InRound);
        assert!(memory.cards().iter().all(|c| !c.face_up));
    }

    #[test]
    fn test_input_for_other_game_ignored() {
        let mut game = game_with(&MemoryStore::new());
        assert!(!game.flip_card(0));
        game.start_minigame(MiniGameKind::Memory);
        assert!(!game.press_tile(0));
        assert!(!game.answer_puzzle(0));
    }

    #[test]
    fn test_growth_tick() {
        let mut game = rich_game(&MemoryStore::new(), 10);
        let id = game.purchase_plant("sunflower", 0, 0).unwrap();

        game.update(Duration::from_millis(500));
        assert_eq!(game.garden().get(&id).unwrap().growth, 0.0);
        game.update(Duration::from_millis(1600));
        let growth = game.garden().get(&id).unwrap().growth;
        assert!((growth - 0.002).abs() < 1e-6);
    }

    #[test]
    fn test_state_survives_restart() {
        let store = MemoryStore::new();
        let id = {
            let mut game = rich_game(&store, 25);
            game.purchase_plant("rose", 64, 64).unwrap()
        };

        let game = game_with(&store);
        assert_eq!(game.progression().coins(), 10);
        assert!(game.garden().get(&id).is_some());
    }

    #[test]
    fn test_reset_all_clears_both_slots() {
        let store = MemoryStore::new();
        let mut game = rich_game(&store, 25);
        game.purchase_plant("rose", 0, 0).unwrap();

        game.reset_all().unwrap();
        assert_eq!(game.progression().coins(), 0);
        assert!(game.garden().is_empty());
        assert!(!store.contains(PROGRESS_SLOT));
        assert!(!store.contains(GARDEN_SLOT));
    }
}
