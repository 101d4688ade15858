//! Focus session completion.
//!
//! Sessions shorter than the configured minimum still refresh the
//! profile's activity timestamp but earn nothing. Qualifying sessions
//! get the fixed base rewards, run through the challenge pipeline, and
//! grow the selected plant.

use tracing::{debug, info};

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::engine::{garden, progress, reward, RewardOutcome};
use crate::events::GamificationEvent;
use crate::model::{HistoryEntry, HistoryReason, Reward, RewardKind};
use crate::store::UnitOfWork;
use crate::Result;

#[derive(Debug, Clone, Copy)]
pub struct FocusSummary {
    /// False when the session was too short to earn anything.
    pub rewarded: bool,
    pub outcome: RewardOutcome,
}

#[allow(clippy::too_many_arguments)]
pub fn complete_focus_session(
    uow: &mut impl UnitOfWork,
    profile_id: i64,
    session_id: i64,
    duration_secs: u32,
    task_id: Option<i64>,
    selected_plant_id: Option<i64>,
    config: &EngineConfig,
    clock: &dyn Clock,
) -> Result<FocusSummary> {
    let now = clock.now_utc();

    uow.run_in_transaction(|store| {
        let mut profile = store.get_profile(profile_id)?;

        if duration_secs < config.min_focus_duration_secs {
            debug!(session_id, duration_secs, "session below reward minimum");
            profile.apply_delta(0, 0, now);
            store.update_profile(&profile)?;
            return Ok(FocusSummary {
                rewarded: false,
                outcome: RewardOutcome::default(),
            });
        }

        let mut base = RewardOutcome::default();
        base.add(reward::apply_reward(
            store,
            profile_id,
            &Reward::transient("focus xp", RewardKind::Experience, &config.base_xp_value),
            now,
        )?);
        base.add(reward::apply_reward(
            store,
            profile_id,
            &Reward::transient("focus coins", RewardKind::Coins, &config.base_coin_value),
            now,
        )?);

        let event = GamificationEvent::FocusCompleted {
            session_id,
            duration_secs,
            task_id,
        };
        let mut total = base;
        total.add(progress::process_event(store, profile_id, &event, now)?);

        if let Some(plant_id) = selected_plant_id {
            garden::grant_growth_points(store, plant_id, config.growth_points_per_completion)?;
        }

        profile.apply_delta(total.delta_xp, total.delta_coins, now);
        store.update_profile(&profile)?;
        // Challenge deltas are ledgered separately by the progress
        // pipeline.
        if !base.is_zero() {
            store.insert_history(&HistoryEntry {
                id: 0,
                profile_id,
                at: now,
                delta_xp: base.delta_xp,
                delta_coins: base.delta_coins,
                reason: HistoryReason::FocusCompleted,
                source_id: Some(session_id),
            })?;
        }

        info!(session_id, duration_secs, delta_xp = total.delta_xp, "focus session rewarded");
        Ok(FocusSummary {
            rewarded: true,
            outcome: total,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use crate::clock::FixedClock;
    use crate::model::Profile;
    use crate::store::GamificationDb;

    fn setup() -> (GamificationDb, i64, FixedClock) {
        let mut db = GamificationDb::open_memory().unwrap();
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap());
        let id = db
            .run_in_transaction(|store| {
                store.insert_profile(&Profile::new(
                    1,
                    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
                ))
            })
            .unwrap();
        (db, id, clock)
    }

    #[test]
    fn qualifying_session_earns_base_rewards() {
        let (mut db, id, clock) = setup();
        let summary = complete_focus_session(
            &mut db,
            id,
            1,
            1500,
            None,
            None,
            &EngineConfig::default(),
            &clock,
        )
        .unwrap();
        assert!(summary.rewarded);
        assert_eq!(summary.outcome.delta_xp, 10);
        assert_eq!(summary.outcome.delta_coins, 2);

        let entries = db.read(|store| store.history(id, 10)).unwrap();
        assert_eq!(entries[0].reason, HistoryReason::FocusCompleted);
    }

    #[test]
    fn short_session_only_refreshes_activity() {
        let (mut db, id, clock) = setup();
        let summary = complete_focus_session(
            &mut db,
            id,
            1,
            120,
            None,
            None,
            &EngineConfig::default(),
            &clock,
        )
        .unwrap();
        assert!(!summary.rewarded);

        let profile = db.read(|store| store.get_profile(id)).unwrap();
        assert_eq!(profile.experience, 0);
        assert_eq!(profile.coins, 0);
        assert_eq!(profile.last_active, clock.0);
        assert!(db.read(|store| store.history(id, 10)).unwrap().is_empty());
    }

    #[test]
    fn repeated_sessions_keep_rewarding() {
        let (mut db, id, clock) = setup();
        let config = EngineConfig::default();
        complete_focus_session(&mut db, id, 1, 1500, None, None, &config, &clock).unwrap();
        complete_focus_session(&mut db, id, 2, 1500, None, None, &config, &clock).unwrap();
        let profile = db.read(|store| store.get_profile(id)).unwrap();
        assert_eq!(profile.experience, 20);
        assert_eq!(profile.coins, 4);
    }
}
