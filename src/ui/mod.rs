//! User Interface module
//!
//! Terminal UI using ratatui: one screen per game mode.

pub mod app;
pub mod widgets;

pub use app::App;
