//! Challenges, their rules and per-profile progress rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a challenge. UPCOMING -> ACTIVE is driven by an external
/// scheduler; ACTIVE -> COMPLETED by the engine; ACTIVE -> EXPIRED
/// externally when the end date passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChallengeStatus {
    Upcoming,
    Active,
    Completed,
    Expired,
}

impl ChallengeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengeStatus::Upcoming => "UPCOMING",
            ChallengeStatus::Active => "ACTIVE",
            ChallengeStatus::Completed => "COMPLETED",
            ChallengeStatus::Expired => "EXPIRED",
        }
    }

    pub fn parse(s: &str) -> Option<ChallengeStatus> {
        match s {
            "UPCOMING" => Some(ChallengeStatus::Upcoming),
            "ACTIVE" => Some(ChallengeStatus::Active),
            "COMPLETED" => Some(ChallengeStatus::Completed),
            "EXPIRED" => Some(ChallengeStatus::Expired),
            _ => None,
        }
    }
}

/// How often a rule's progress counter resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChallengePeriod {
    Once,
    Daily,
    Weekly,
    Monthly,
    /// Valid for the challenge's whole start/end window.
    Event,
}

impl ChallengePeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengePeriod::Once => "ONCE",
            ChallengePeriod::Daily => "DAILY",
            ChallengePeriod::Weekly => "WEEKLY",
            ChallengePeriod::Monthly => "MONTHLY",
            ChallengePeriod::Event => "EVENT",
        }
    }

    pub fn parse(s: &str) -> Option<ChallengePeriod> {
        match s {
            "ONCE" => Some(ChallengePeriod::Once),
            "DAILY" => Some(ChallengePeriod::Daily),
            "WEEKLY" => Some(ChallengePeriod::Weekly),
            "MONTHLY" => Some(ChallengePeriod::Monthly),
            "EVENT" => Some(ChallengePeriod::Event),
            _ => None,
        }
    }
}

/// What kind of event a rule counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChallengeType {
    TaskCompletion,
    FocusSession,
    DailyStreak,
}

impl ChallengeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengeType::TaskCompletion => "TASK_COMPLETION",
            ChallengeType::FocusSession => "FOCUS_SESSION",
            ChallengeType::DailyStreak => "DAILY_STREAK",
        }
    }

    pub fn parse(s: &str) -> Option<ChallengeType> {
        match s {
            "TASK_COMPLETION" => Some(ChallengeType::TaskCompletion),
            "FOCUS_SESSION" => Some(ChallengeType::FocusSession),
            "DAILY_STREAK" => Some(ChallengeType::DailyStreak),
            _ => None,
        }
    }
}

/// A timed goal composed of one or more rules, yielding a reward on full
/// completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub status: ChallengeStatus,
    pub period: ChallengePeriod,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub reward_id: i64,
}

/// A single countable condition belonging to a challenge. Immutable once
/// created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeRule {
    pub id: i64,
    pub challenge_id: i64,
    pub rule_type: ChallengeType,
    pub target: u32,
    pub period: ChallengePeriod,
    /// Optional JSON condition document, see [`crate::condition`].
    pub condition: Option<String>,
}

/// Per (profile, challenge, rule) progress counter. Created lazily on the
/// first matching event; stale rows outside their period window count as
/// zero rather than being deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeProgress {
    pub profile_id: i64,
    pub challenge_id: i64,
    pub rule_id: i64,
    pub progress: u32,
    pub completed: bool,
    pub last_updated: DateTime<Utc>,
}
