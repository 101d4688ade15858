//! Persistence interfaces consumed by the engine.
//!
//! The engine never touches a database directly: every operation runs
//! against [`GamificationStore`], and multi-step mutations are wrapped in a
//! [`UnitOfWork`] transaction that commits or rolls back as a whole. The
//! bundled SQLite implementation lives in [`db`].

pub mod db;

pub use db::GamificationDb;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::Result;
use crate::model::{
    Challenge, ChallengeProgress, ChallengeRule, ChallengeStatus, HistoryEntry, Plant, PlantKind,
    Profile, Reward, StreakReward, SurpriseTask, TaskState,
};

/// Repository surface for all engine state. One call = one query; the
/// caller decides the transaction boundary via [`UnitOfWork`].
pub trait GamificationStore {
    // Profiles
    fn get_profile(&self, id: i64) -> Result<Profile>;
    fn get_profile_by_user(&self, user_id: i64) -> Result<Profile>;
    fn insert_profile(&self, profile: &Profile) -> Result<i64>;
    fn update_profile(&self, profile: &Profile) -> Result<()>;

    // Reward catalog
    fn get_reward(&self, id: i64) -> Result<Reward>;
    fn insert_reward(&self, reward: &Reward) -> Result<i64>;

    // Challenges, rules and progress
    fn active_challenges(&self) -> Result<Vec<Challenge>>;
    fn get_challenge(&self, id: i64) -> Result<Challenge>;
    fn insert_challenge(&self, challenge: &Challenge) -> Result<i64>;
    fn set_challenge_status(&self, id: i64, status: ChallengeStatus) -> Result<()>;
    fn rules_for_challenge(&self, challenge_id: i64) -> Result<Vec<ChallengeRule>>;
    fn insert_rule(&self, rule: &ChallengeRule) -> Result<i64>;
    fn get_progress(
        &self,
        profile_id: i64,
        challenge_id: i64,
        rule_id: i64,
    ) -> Result<Option<ChallengeProgress>>;
    fn progress_for_challenge(
        &self,
        profile_id: i64,
        challenge_id: i64,
    ) -> Result<Vec<ChallengeProgress>>;
    fn upsert_progress(&self, progress: &ChallengeProgress) -> Result<()>;

    // Badges (earned cross-refs; grant is idempotent)
    fn has_badge(&self, profile_id: i64, badge_id: i64) -> Result<bool>;
    fn grant_badge(&self, profile_id: i64, badge_id: i64, at: DateTime<Utc>) -> Result<()>;

    // Virtual garden
    fn plants(&self, profile_id: i64) -> Result<Vec<Plant>>;
    fn get_plant(&self, id: i64) -> Result<Plant>;
    fn insert_plant(&self, plant: &Plant) -> Result<i64>;
    fn update_plant(&self, plant: &Plant) -> Result<()>;
    fn has_plant_kind(&self, profile_id: i64, kind: PlantKind) -> Result<bool>;
    fn water_all_plants(&self, profile_id: i64, at: DateTime<Utc>) -> Result<()>;

    // Surprise tasks
    fn get_surprise_task(&self, id: i64) -> Result<SurpriseTask>;
    fn insert_surprise_task(&self, task: &SurpriseTask) -> Result<i64>;
    fn update_surprise_task(&self, task: &SurpriseTask) -> Result<()>;
    fn surprise_task_shown_on(
        &self,
        profile_id: i64,
        date: NaiveDate,
    ) -> Result<Option<SurpriseTask>>;
    /// Uncompleted, unexpired, never-shown tasks.
    fn available_surprise_tasks(
        &self,
        profile_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Vec<SurpriseTask>>;

    // Streak reward definitions
    fn streak_reward_for(&self, streak_day: u32) -> Result<Option<StreakReward>>;
    fn streak_rewards_in_range(&self, from_day: u32, to_day: u32) -> Result<Vec<StreakReward>>;
    fn insert_streak_reward(&self, definition: &StreakReward) -> Result<()>;

    // History ledger
    fn insert_history(&self, entry: &HistoryEntry) -> Result<i64>;
    fn history(&self, profile_id: i64, limit: u32) -> Result<Vec<HistoryEntry>>;

    // Task state (status + idempotency marker)
    fn task_state(&self, task_id: i64) -> Result<TaskState>;
    fn set_task_done(&self, task_id: i64, done: bool, at: DateTime<Utc>) -> Result<()>;
    fn mark_completed_once(&self, task_id: i64) -> Result<()>;
}

/// All-or-nothing execution of a multi-step mutation. An `Err` from the
/// closure aborts the transaction; nothing inside is persisted.
pub trait UnitOfWork {
    fn run_in_transaction<T>(
        &mut self,
        f: impl FnOnce(&dyn GamificationStore) -> Result<T>,
    ) -> Result<T>;

    /// Read-only access outside any transaction (snapshot consistency is
    /// acceptable for projections).
    fn read<T>(&self, f: impl FnOnce(&dyn GamificationStore) -> Result<T>) -> Result<T>;
}
