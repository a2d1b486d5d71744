//! Save data structures
//!
//! What goes into each slot, and lenient decoding that falls back to defaults
//! field by field when a slot is partial or hand-edited.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::garden::GardenItem;
use crate::progression::{Achievement, AchievementId, PlayerProgress};

/// Player progress slot contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSave {
    pub coins: u32,
    pub experience: u32,
    pub level: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    pub games_played: u32,
    pub games_won: u32,
    pub total_score: u64,
    pub achievements: Vec<AchievementRecord>,
}

/// One achievement as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementRecord {
    pub id: String,
    pub unlocked: bool,
    pub progress: u32,
    pub max_progress: u32,
}

impl ProgressSave {
    pub fn capture(progress: &PlayerProgress, achievements: &[Achievement]) -> Self {
        Self {
            coins: progress.coins,
            experience: progress.experience,
            level: progress.level,
            current_streak: progress.current_streak,
            best_streak: progress.best_streak,
            games_played: progress.games_played,
            games_won: progress.games_won,
            total_score: progress.total_score,
            achievements: achievements
                .iter()
                .map(|a| AchievementRecord {
                    id: a.id.key().to_string(),
                    unlocked: a.unlocked,
                    progress: a.progress,
                    max_progress: a.max_progress,
                })
                .collect(),
        }
    }

    /// Decode a slot, tolerating missing or mistyped fields.
    /// Counters too large for a u32 are treated as missing.
    ///
    /// Only fails when the text is not a JSON object at all.
    pub fn from_json_lenient(data: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(data)?;
        let object = match value {
            Value::Object(map) => map,
            other => {
                return Err(serde::de::Error::custom(format!(
                    "expected an object, found {}",
                    kind_of(&other)
                )))
            }
        };

        let field = |name: &str| -> u32 {
            object
                .get(name)
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0)
        };

        let achievements = object
            .get("achievements")
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(record_from_value).collect())
            .unwrap_or_default();

        Ok(Self {
            coins: field("coins"),
            experience: field("experience"),
            level: field("level").max(1),
            current_streak: field("currentStreak"),
            best_streak: field("bestStreak"),
            games_played: field("gamesPlayed"),
            games_won: field("gamesWon"),
            total_score: object
                .get("totalScore")
                .and_then(Value::as_u64)
                .unwrap_or(0),
            achievements,
        })
    }

    /// Saved achievements whose ids are still in the catalog
    pub fn known_achievements(&self) -> Vec<Achievement> {
        self.achievements
            .iter()
            .filter_map(|record| {
                let id = AchievementId::from_key(&record.id)?;
                Some(Achievement {
                    id,
                    unlocked: record.unlocked,
                    progress: record.progress,
                    max_progress: id.def().max_progress,
                })
            })
            .collect()
    }
}

fn record_from_value(value: &Value) -> Option<AchievementRecord> {
    let object = value.as_object()?;
    let number = |name: &str| {
        object
            .get(name)
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0)
    };
    Some(AchievementRecord {
        id: object.get("id")?.as_str()?.to_string(),
        unlocked: object
            .get("unlocked")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        progress: number("progress"),
        max_progress: number("maxProgress"),
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Garden slot contents: the placed items in placement order
pub type GardenSave = Vec<GardenItem>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_defaults_missing_fields() {
        let save = ProgressSave::from_json_lenient(r#"{"coins": 42}"#).unwrap();
        assert_eq!(save.coins, 42);
        assert_eq!(save.experience, 0);
        assert_eq!(save.level, 1);
        assert!(save.achievements.is_empty());
    }

    #[test]
    fn test_lenient_ignores_mistyped_fields() {
        let save = ProgressSave::from_json_lenient(
            r#"{"coins": "lots", "experience": 150, "bestStreak": -4, "achievements": 7}"#,
        )
        .unwrap();
        assert_eq!(save.coins, 0);
        assert_eq!(save.experience, 150);
        assert_eq!(save.best_streak, 0);
        assert!(save.achievements.is_empty());
    }

    #[test]
    fn test_lenient_drops_out_of_range_counters() {
        let save = ProgressSave::from_json_lenient(
            r#"{"coins": 12, "gamesPlayed": 99999999999, "currentStreak": 4294967296}"#,
        )
        .unwrap();
        assert_eq!(save.coins, 12);
        assert_eq!(save.games_played, 0);
        assert_eq!(save.current_streak, 0);
    }

    #[test]
    fn test_lenient_rejects_non_objects() {
        assert!(ProgressSave::from_json_lenient("not json").is_err());
        assert!(ProgressSave::from_json_lenient("[1, 2]").is_err());
    }

    #[test]
    fn test_known_achievements_skip_unknown_ids() {
        let save = ProgressSave::from_json_lenient(
            r#"{"achievements": [
                {"id": "first_win", "unlocked": true, "progress": 1, "maxProgress": 1},
                {"id": "retired_badge", "unlocked": true, "progress": 3, "maxProgress": 3},
                {"unlocked": true}
            ]}"#,
        )
        .unwrap();

        let known = save.known_achievements();
        assert_eq!(known.len(), 1);
        assert_eq!(known[0].id, AchievementId::FirstWin);
        assert!(known[0].unlocked);
    }
}
