//! Reward application. Turns a catalog entry into currency deltas or a
//! grant side effect against the store.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::engine::RewardOutcome;
use crate::formula;
use crate::model::{Plant, Reward, RewardKind};
use crate::store::GamificationStore;
use crate::Result;

/// Apply `reward` to the profile. COINS and EXPERIENCE evaluate the
/// value formula at the profile's current level and come back as a
/// delta; BADGE and PLANT are granted directly against the store; THEME
/// is a cosmetic preference with no ledger footprint. The caller folds
/// the returned deltas into the profile.
pub fn apply_reward(
    store: &dyn GamificationStore,
    profile_id: i64,
    reward: &Reward,
    now: DateTime<Utc>,
) -> Result<RewardOutcome> {
    match reward.kind {
        RewardKind::Experience => {
            let level = store.get_profile(profile_id)?.level;
            Ok(RewardOutcome {
                delta_xp: formula::evaluate(&reward.value, level)?,
                delta_coins: 0,
            })
        }
        RewardKind::Coins => {
            let level = store.get_profile(profile_id)?.level;
            Ok(RewardOutcome {
                delta_xp: 0,
                delta_coins: formula::evaluate(&reward.value, level)?,
            })
        }
        RewardKind::Badge => {
            let badge_id = reward.badge_id()?;
            store.grant_badge(profile_id, badge_id, now)?;
            info!(profile_id, badge_id, "badge granted");
            Ok(RewardOutcome::default())
        }
        RewardKind::Plant => {
            let kind = reward.plant_kind()?;
            store.insert_plant(&Plant::sprout(profile_id, kind, now))?;
            info!(profile_id, kind = kind.as_str(), "plant granted");
            Ok(RewardOutcome::default())
        }
        RewardKind::Theme => {
            debug!(profile_id, theme = %reward.value, "theme reward, no ledger effect");
            Ok(RewardOutcome::default())
        }
    }
}

/// Substitute the configured fallback reward when the profile already
/// owns the badge or plant kind this reward would grant. Used by the
/// daily-claim flow so a streak day never hands out a duplicate.
pub fn resolve_duplicate(
    store: &dyn GamificationStore,
    profile_id: i64,
    reward: Reward,
    config: &EngineConfig,
) -> Result<Reward> {
    let fallback_id = match reward.kind {
        RewardKind::Badge if store.has_badge(profile_id, reward.badge_id()?)? => {
            config.duplicate_badge_fallback_reward_id
        }
        RewardKind::Plant if store.has_plant_kind(profile_id, reward.plant_kind()?)? => {
            config.duplicate_plant_fallback_reward_id
        }
        _ => return Ok(reward),
    };
    debug!(profile_id, reward_id = reward.id, fallback_id, "duplicate reward, substituting");
    store.get_reward(fallback_id)
}
