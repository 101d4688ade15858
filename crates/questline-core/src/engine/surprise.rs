//! Surprise task selection and acceptance.

use rand::seq::SliceRandom;
use tracing::info;

use crate::clock::Clock;
use crate::engine::{reward, RewardOutcome};
use crate::model::{HistoryEntry, HistoryReason, SurpriseTask};
use crate::store::UnitOfWork;
use crate::{GamificationError, Result};

/// The surprise task to show for today. The task already shown today is
/// sticky; otherwise one of the unexpired, never-shown tasks is picked
/// at random and stamped with today's date.
pub fn pick_surprise_task(
    uow: &mut impl UnitOfWork,
    profile_id: i64,
    clock: &dyn Clock,
) -> Result<Option<SurpriseTask>> {
    let now = clock.now_utc();
    let today = clock.today_utc();

    uow.run_in_transaction(|store| {
        if let Some(task) = store.surprise_task_shown_on(profile_id, today)? {
            return Ok(Some(task));
        }
        let candidates = store.available_surprise_tasks(profile_id, now)?;
        let Some(mut task) = candidates.choose(&mut rand::thread_rng()).cloned() else {
            return Ok(None);
        };
        task.shown_on = Some(today);
        store.update_surprise_task(&task)?;
        info!(task_id = task.id, "surprise task picked for today");
        Ok(Some(task))
    })
}

/// Complete a surprise task and apply its reward. Expired or already
/// completed tasks are rejected with `InvalidState`.
pub fn accept_surprise_task(
    uow: &mut impl UnitOfWork,
    task_id: i64,
    clock: &dyn Clock,
) -> Result<RewardOutcome> {
    let now = clock.now_utc();

    uow.run_in_transaction(|store| {
        let mut task = store.get_surprise_task(task_id)?;
        if task.completed {
            return Err(GamificationError::invalid_state(
                "surprise task already completed",
            ));
        }
        if task.expires_at <= now {
            return Err(GamificationError::invalid_state("surprise task expired"));
        }

        let task_reward = store.get_reward(task.reward_id)?;
        let outcome = reward::apply_reward(store, task.profile_id, &task_reward, now)?;

        let mut profile = store.get_profile(task.profile_id)?;
        profile.apply_delta(outcome.delta_xp, outcome.delta_coins, now);
        store.update_profile(&profile)?;

        task.completed = true;
        store.update_surprise_task(&task)?;

        if !outcome.is_zero() {
            store.insert_history(&HistoryEntry {
                id: 0,
                profile_id: task.profile_id,
                at: now,
                delta_xp: outcome.delta_xp,
                delta_coins: outcome.delta_coins,
                reason: HistoryReason::SurpriseTaskCompleted,
                source_id: Some(task.id),
            })?;
        }

        info!(task_id, delta_xp = outcome.delta_xp, "surprise task completed");
        Ok(outcome)
    })
}
