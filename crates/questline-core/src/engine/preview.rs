//! Read-only daily reward projection, used to render the claim screen.
//! No locking; runs against a plain read view of the store.

use chrono::NaiveDate;

use crate::model::Reward;
use crate::store::GamificationStore;
use crate::Result;

/// One upcoming streak day and its reward.
#[derive(Debug, Clone)]
pub struct PreviewEntry {
    pub streak_day: u32,
    pub reward: Reward,
    /// True for the day a claim right now would land on.
    pub is_today: bool,
}

#[derive(Debug, Clone)]
pub struct DailyRewardPreview {
    pub can_claim_today: bool,
    /// The streak day a claim today would reach (or the current day when
    /// today is already claimed).
    pub prospective_streak: u32,
    /// The seven-day reward page containing the prospective day. Pages
    /// are aligned blocks (days 1-7, 8-14, ...), not a rolling window.
    pub entries: Vec<PreviewEntry>,
}

pub fn daily_reward_preview(
    store: &dyn GamificationStore,
    profile_id: i64,
    today: NaiveDate,
) -> Result<DailyRewardPreview> {
    let profile = store.get_profile(profile_id)?;
    let can_claim_today = profile.last_claimed_date.map_or(true, |d| d < today);
    let prospective_streak = if !can_claim_today {
        profile.current_streak
    } else {
        match profile.last_claimed_date {
            Some(last) if (today - last).num_days() == 1 => profile.current_streak + 1,
            _ => 1,
        }
    };

    // Page start aligned to weekly blocks: day 5 shows days 1-7, day 8
    // shows days 8-14.
    let from = ((prospective_streak.max(1) - 1) / 7) * 7 + 1;
    let definitions = store.streak_rewards_in_range(from, from + 6)?;
    let mut entries = Vec::with_capacity(definitions.len());
    for definition in definitions {
        entries.push(PreviewEntry {
            streak_day: definition.streak_day,
            reward: store.get_reward(definition.reward_id)?,
            is_today: can_claim_today && definition.streak_day == prospective_streak,
        });
    }

    Ok(DailyRewardPreview {
        can_claim_today,
        prospective_streak,
        entries,
    })
}
