//! Engine operations. Each submodule is one use case; mutating
//! operations are written to run inside a [`UnitOfWork`] transaction.
//!
//! [`UnitOfWork`]: crate::store::UnitOfWork

pub mod claim;
pub mod focus;
pub mod garden;
pub mod preview;
pub mod progress;
pub mod reward;
pub mod surprise;
pub mod task_completion;

pub use claim::{claim_daily_reward, ClaimSummary};
pub use focus::{complete_focus_session, FocusSummary};
pub use garden::{garden_report, grant_growth_points, water_plants, PlantReport};
pub use preview::{daily_reward_preview, DailyRewardPreview, PreviewEntry};
pub use progress::process_event;
pub use reward::{apply_reward, resolve_duplicate};
pub use surprise::{accept_surprise_task, pick_surprise_task};
pub use task_completion::{set_task_status, TaskCompletionSummary};

/// Net currency change produced by one or more reward applications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewardOutcome {
    pub delta_xp: i64,
    pub delta_coins: i64,
}

impl RewardOutcome {
    pub fn is_zero(&self) -> bool {
        self.delta_xp == 0 && self.delta_coins == 0
    }

    pub fn add(&mut self, other: RewardOutcome) {
        self.delta_xp += other.delta_xp;
        self.delta_coins += other.delta_coins;
    }
}
