//! Experience and leveling
//!
//! Levels are a flat 100 XP apart: level = experience / 100 + 1.

/// Experience needed to advance one level
pub const XP_PER_LEVEL: u32 = 100;

/// Experience awarded for every won game
pub const XP_PER_WIN: u32 = 20;

/// Derive the level for a total amount of experience
pub fn level_for_experience(experience: u32) -> u32 {
    experience / XP_PER_LEVEL + 1
}

/// Experience earned inside the current level (0..100)
pub fn experience_into_level(experience: u32) -> u32 {
    experience % XP_PER_LEVEL
}

/// Coins awarded for a win with the given score
pub fn coins_for_win(score: u32) -> u32 {
    10 + score / 100
}

/// Get a title/rank based on level
pub fn level_title(level: u32) -> &'static str {
    match level {
        0..=1 => "Seedling",
        2..=3 => "Sprout",
        4..=5 => "Gardener",
        6..=8 => "Botanist",
        9..=12 => "Herbalist",
        13..=19 => "Grove Keeper",
        _ => "Archdruid",
    }
}
