//! Task completion fan-out with a once-only reward guard.
//!
//! Status toggles are always persisted. Gamification side effects (base
//! rewards, challenge progress, plant growth) run only on a task's
//! first ever completion; the marker that records this survives later
//! un-done/done toggles.

use tracing::{debug, info};

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::engine::{garden, progress, reward, RewardOutcome};
use crate::events::GamificationEvent;
use crate::model::{HistoryEntry, HistoryReason, Reward, RewardKind};
use crate::store::UnitOfWork;
use crate::Result;

/// What a status change produced.
#[derive(Debug, Clone, Copy)]
pub struct TaskCompletionSummary {
    /// True when this call handed out the one-time completion rewards.
    pub first_completion: bool,
    pub outcome: RewardOutcome,
}

/// Persist a task's done/not-done status. On the first transition to
/// done, apply base rewards, dispatch the completion event through the
/// challenge pipeline, and grow the selected plant, all in one
/// transaction.
#[allow(clippy::too_many_arguments)]
pub fn set_task_status(
    uow: &mut impl UnitOfWork,
    profile_id: i64,
    task_id: i64,
    done: bool,
    tags: &[String],
    selected_plant_id: Option<i64>,
    config: &EngineConfig,
    clock: &dyn Clock,
) -> Result<TaskCompletionSummary> {
    let now = clock.now_utc();

    uow.run_in_transaction(|store| {
        store.set_task_done(task_id, done, now)?;
        if !done {
            return Ok(TaskCompletionSummary {
                first_completion: false,
                outcome: RewardOutcome::default(),
            });
        }

        let state = store.task_state(task_id)?;
        if state.was_completed_once {
            debug!(task_id, "task completed before, skipping rewards");
            return Ok(TaskCompletionSummary {
                first_completion: false,
                outcome: RewardOutcome::default(),
            });
        }

        let mut base = RewardOutcome::default();
        base.add(reward::apply_reward(
            store,
            profile_id,
            &Reward::transient("task xp", RewardKind::Experience, &config.base_xp_value),
            now,
        )?);
        base.add(reward::apply_reward(
            store,
            profile_id,
            &Reward::transient("task coins", RewardKind::Coins, &config.base_coin_value),
            now,
        )?);

        let event = GamificationEvent::TaskCompleted {
            task_id,
            tags: tags.to_vec(),
        };
        let mut total = base;
        total.add(progress::process_event(store, profile_id, &event, now)?);

        if let Some(plant_id) = selected_plant_id {
            garden::grant_growth_points(store, plant_id, config.growth_points_per_completion)?;
        }
        store.mark_completed_once(task_id)?;

        if !total.is_zero() {
            let mut profile = store.get_profile(profile_id)?;
            profile.apply_delta(total.delta_xp, total.delta_coins, now);
            store.update_profile(&profile)?;
        }
        // Challenge deltas get their own ledger entries; this one covers
        // the base completion reward only.
        if !base.is_zero() {
            store.insert_history(&HistoryEntry {
                id: 0,
                profile_id,
                at: now,
                delta_xp: base.delta_xp,
                delta_coins: base.delta_coins,
                reason: HistoryReason::TaskCompleted,
                source_id: Some(task_id),
            })?;
        }

        info!(
            task_id,
            delta_xp = total.delta_xp,
            delta_coins = total.delta_coins,
            "task completed for the first time"
        );
        Ok(TaskCompletionSummary {
            first_completion: true,
            outcome: total,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use crate::clock::FixedClock;
    use crate::model::{Plant, PlantKind, Profile};
    use crate::store::GamificationDb;

    fn setup() -> (GamificationDb, i64, FixedClock) {
        let mut db = GamificationDb::open_memory().unwrap();
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap());
        let id = db
            .run_in_transaction(|store| store.insert_profile(&Profile::new(1, clock.0)))
            .unwrap();
        (db, id, clock)
    }

    #[test]
    fn first_completion_grants_base_rewards() {
        let (mut db, id, clock) = setup();
        let summary = set_task_status(
            &mut db,
            id,
            7,
            true,
            &[],
            None,
            &EngineConfig::default(),
            &clock,
        )
        .unwrap();
        assert!(summary.first_completion);
        assert_eq!(summary.outcome.delta_xp, 10);
        assert_eq!(summary.outcome.delta_coins, 2);

        let profile = db.read(|store| store.get_profile(id)).unwrap();
        assert_eq!(profile.experience, 10);
        assert_eq!(profile.coins, 2);
        let entries = db.read(|store| store.history(id, 10)).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].reason, HistoryReason::TaskCompleted);
    }

    #[test]
    fn toggling_done_twice_rewards_once() {
        let (mut db, id, clock) = setup();
        let config = EngineConfig::default();
        set_task_status(&mut db, id, 7, true, &[], None, &config, &clock).unwrap();
        set_task_status(&mut db, id, 7, false, &[], None, &config, &clock).unwrap();
        let summary =
            set_task_status(&mut db, id, 7, true, &[], None, &config, &clock).unwrap();
        assert!(!summary.first_completion);
        assert!(summary.outcome.is_zero());

        let profile = db.read(|store| store.get_profile(id)).unwrap();
        assert_eq!(profile.experience, 10);
        assert_eq!(profile.coins, 2);

        // Status itself still toggled every time.
        let state = db.read(|store| store.task_state(7)).unwrap();
        assert!(state.done);
        assert!(state.was_completed_once);
    }

    #[test]
    fn selected_plant_receives_growth_points() {
        let (mut db, id, clock) = setup();
        let plant_id = db
            .run_in_transaction(|store| {
                store.insert_plant(&Plant::sprout(id, PlantKind::Bonsai, clock.0))
            })
            .unwrap();
        set_task_status(
            &mut db,
            id,
            7,
            true,
            &[],
            Some(plant_id),
            &EngineConfig::default(),
            &clock,
        )
        .unwrap();
        let plant = db.read(|store| store.get_plant(plant_id)).unwrap();
        assert_eq!(plant.growth_points, 2);
    }

    #[test]
    fn undone_toggle_has_no_side_effects() {
        let (mut db, id, clock) = setup();
        let summary = set_task_status(
            &mut db,
            id,
            7,
            false,
            &[],
            None,
            &EngineConfig::default(),
            &clock,
        )
        .unwrap();
        assert!(!summary.first_completion);
        let profile = db.read(|store| store.get_profile(id)).unwrap();
        assert_eq!(profile.experience, 0);
        let state = db.read(|store| store.task_state(7)).unwrap();
        assert!(!state.done);
        assert!(!state.was_completed_once);
    }
}
