//! Daily streak claim.
//!
//! One claim per UTC calendar day. A claim on the day after the last
//! one extends the streak; any longer gap (or a first claim) restarts
//! it at 1. The streak day selects a reward definition, duplicates fall
//! back to the configured substitute, and the resulting `StreakUpdated`
//! event is dispatched back through the challenge pipeline so
//! streak-type rules advance in the same transaction.

use tracing::info;

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::engine::{progress, reward, RewardOutcome};
use crate::events::GamificationEvent;
use crate::model::{HistoryEntry, HistoryReason, Reward};
use crate::store::UnitOfWork;
use crate::{GamificationError, Result};

/// What a successful claim produced.
#[derive(Debug, Clone)]
pub struct ClaimSummary {
    pub new_streak: u32,
    pub reward: Reward,
    pub outcome: RewardOutcome,
}

pub fn claim_daily_reward(
    uow: &mut impl UnitOfWork,
    profile_id: i64,
    config: &EngineConfig,
    clock: &dyn Clock,
) -> Result<ClaimSummary> {
    let now = clock.now_utc();
    let today = clock.today_utc();

    uow.run_in_transaction(|store| {
        let mut profile = store.get_profile(profile_id)?;
        if profile.last_claimed_date.is_some_and(|d| d >= today) {
            return Err(GamificationError::invalid_state(
                "daily reward already claimed today",
            ));
        }

        let new_streak = match profile.last_claimed_date {
            Some(last) if (today - last).num_days() == 1 => profile.current_streak + 1,
            _ => 1,
        };

        let definition = store.streak_reward_for(new_streak)?.ok_or_else(|| {
            GamificationError::not_found("streak reward definition", i64::from(new_streak))
        })?;
        let claim_reward = resolve(store, profile_id, definition.reward_id, config)?;

        let base = reward::apply_reward(store, profile_id, &claim_reward, now)?;
        let mut total = base;
        total.add(progress::process_event(
            store,
            profile_id,
            &GamificationEvent::StreakUpdated { new_streak },
            now,
        )?);

        profile.record_claim(new_streak, today);
        profile.apply_delta(total.delta_xp, total.delta_coins, now);
        store.update_profile(&profile)?;

        // Streak-challenge deltas are ledgered by the progress pipeline;
        // this entry covers the streak reward itself.
        if !base.is_zero() {
            store.insert_history(&HistoryEntry {
                id: 0,
                profile_id,
                at: now,
                delta_xp: base.delta_xp,
                delta_coins: base.delta_coins,
                reason: HistoryReason::DailyReward,
                source_id: Some(i64::from(new_streak)),
            })?;
        }

        info!(profile_id, new_streak, reward = %claim_reward.name, "daily reward claimed");
        Ok(ClaimSummary {
            new_streak,
            reward: claim_reward,
            outcome: total,
        })
    })
}

fn resolve(
    store: &dyn crate::store::GamificationStore,
    profile_id: i64,
    reward_id: i64,
    config: &EngineConfig,
) -> Result<Reward> {
    let base = store.get_reward(reward_id)?;
    reward::resolve_duplicate(store, profile_id, base, config)
}
