//! Domain events consumed by the gamification engine.
//!
//! Every completion in the outer application produces one of these events;
//! the engine matches them against active challenge rules and folds the
//! resulting reward deltas into the profile.

use serde::{Deserialize, Serialize};

/// An event the gamification engine reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GamificationEvent {
    /// A task transitioned to DONE. Tags come along for rule predicates.
    TaskCompleted { task_id: i64, tags: Vec<String> },
    /// A focus session finished.
    FocusCompleted {
        session_id: i64,
        duration_secs: u32,
        task_id: Option<i64>,
    },
    /// The daily streak advanced to a new value.
    StreakUpdated { new_streak: u32 },
}

impl GamificationEvent {
    /// Short name used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            GamificationEvent::TaskCompleted { .. } => "TaskCompleted",
            GamificationEvent::FocusCompleted { .. } => "FocusCompleted",
            GamificationEvent::StreakUpdated { .. } => "StreakUpdated",
        }
    }
}
