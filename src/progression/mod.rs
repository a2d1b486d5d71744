//! Progression systems
//!
//! Experience and levels, achievements, and the store that owns them.

pub mod xp;
pub mod achievements;
pub mod store;

pub use achievements::{Achievement, AchievementDef, AchievementId, AchievementTracker, ACHIEVEMENTS};
pub use store::{PlayerProgress, ProgressionStore};
pub use xp::{level_for_experience, level_title, XP_PER_LEVEL};
