//! History ledger entries and streak reward definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a ledger entry was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryReason {
    TaskCompleted,
    FocusCompleted,
    DailyReward,
    ChallengeCompleted,
    SurpriseTaskCompleted,
}

impl HistoryReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryReason::TaskCompleted => "TASK_COMPLETED",
            HistoryReason::FocusCompleted => "FOCUS_COMPLETED",
            HistoryReason::DailyReward => "DAILY_REWARD",
            HistoryReason::ChallengeCompleted => "CHALLENGE_COMPLETED",
            HistoryReason::SurpriseTaskCompleted => "SURPRISE_TASK_COMPLETED",
        }
    }

    pub fn parse(s: &str) -> Option<HistoryReason> {
        match s {
            "TASK_COMPLETED" => Some(HistoryReason::TaskCompleted),
            "FOCUS_COMPLETED" => Some(HistoryReason::FocusCompleted),
            "DAILY_REWARD" => Some(HistoryReason::DailyReward),
            "CHALLENGE_COMPLETED" => Some(HistoryReason::ChallengeCompleted),
            "SURPRISE_TASK_COMPLETED" => Some(HistoryReason::SurpriseTaskCompleted),
            _ => None,
        }
    }
}

/// One XP/coin movement on a profile. Written only when a delta is
/// non-zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub profile_id: i64,
    pub at: DateTime<Utc>,
    pub delta_xp: i64,
    pub delta_coins: i64,
    pub reason: HistoryReason,
    /// Task or session the entry came from, when applicable.
    pub source_id: Option<i64>,
}

/// Maps a streak day to the reward claimed on that day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakReward {
    pub streak_day: u32,
    pub reward_id: i64,
}
