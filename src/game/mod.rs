//! Game module - Session coordination and timing

mod state;
mod time;
mod tutorial;

pub use state::{ActiveGame, Game, GameMessage, GameMode, MessageCategory, PurchaseError};
pub use time::{AmbientTime, TimerId, Timeline};
pub use tutorial::{Tutorial, TutorialStep, TUTORIAL_STEPS};
