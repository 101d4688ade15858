//! Engine data model: profiles, the reward catalog, challenges and their
//! rules, the virtual garden, surprise tasks and the history ledger.

pub mod challenge;
pub mod garden;
pub mod history;
pub mod profile;
pub mod reward;
pub mod task;

pub use challenge::{
    Challenge, ChallengePeriod, ChallengeProgress, ChallengeRule, ChallengeStatus, ChallengeType,
};
pub use garden::{Plant, PlantHealth, PlantKind, GROWTH_STAGE_THRESHOLDS, MAX_GROWTH_STAGE};
pub use history::{HistoryEntry, HistoryReason, StreakReward};
pub use profile::Profile;
pub use reward::{Reward, RewardKind};
pub use task::{SurpriseTask, TaskState};
