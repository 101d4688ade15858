//! Task-side state the engine owns: the per-task completion marker and
//! surprise tasks.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Per-task engine state. `was_completed_once` is the idempotency guard:
/// task status updates persist on every toggle, but gamification side
/// effects fire only on the first completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskState {
    pub task_id: i64,
    pub done: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub was_completed_once: bool,
}

impl TaskState {
    pub fn new(task_id: i64) -> Self {
        TaskState {
            task_id,
            done: false,
            completed_at: None,
            was_completed_once: false,
        }
    }
}

/// A time-boxed bonus task offered to the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurpriseTask {
    pub id: i64,
    pub profile_id: i64,
    pub description: String,
    pub reward_id: i64,
    pub expires_at: DateTime<Utc>,
    pub completed: bool,
    /// Date the task was offered to the player, if it has been.
    pub shown_on: Option<NaiveDate>,
}
