//! Player profile: level, experience, coins and streak state.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Experience needed to clear level 1.
pub const BASE_EXPERIENCE: i64 = 100;

/// A player's gamification profile. Owned exclusively by the engine and
/// mutated only through reward application and streak claims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub user_id: i64,
    pub level: u32,
    /// Never negative; clamped after every delta.
    pub experience: i64,
    /// Never negative; clamped after every delta.
    pub coins: i64,
    pub experience_for_next_level: i64,
    pub last_active: DateTime<Utc>,
    pub current_streak: u32,
    /// `None` until the first daily claim.
    pub last_claimed_date: Option<NaiveDate>,
    pub max_streak: u32,
}

impl Profile {
    /// Fresh level-1 profile for a user.
    pub fn new(user_id: i64, now: DateTime<Utc>) -> Self {
        Profile {
            id: 0,
            user_id,
            level: 1,
            experience: 0,
            coins: 0,
            experience_for_next_level: experience_required_for(1),
            last_active: now,
            current_streak: 0,
            last_claimed_date: None,
            max_streak: 0,
        }
    }

    /// Fold an XP/coin delta into the profile, clamping at 0 and cascading
    /// any level-ups. `now` becomes the new last-active timestamp.
    pub fn apply_delta(&mut self, delta_xp: i64, delta_coins: i64, now: DateTime<Utc>) {
        self.experience = (self.experience + delta_xp).max(0);
        self.coins = (self.coins + delta_coins).max(0);
        self.last_active = now;
        self.recalculate_level();
    }

    /// Carry excess experience over into new levels until below threshold.
    fn recalculate_level(&mut self) {
        while self.experience >= self.experience_for_next_level {
            self.experience -= self.experience_for_next_level;
            self.level += 1;
            self.experience_for_next_level = experience_required_for(self.level);
        }
    }

    /// Record a successful daily claim.
    pub fn record_claim(&mut self, new_streak: u32, today: NaiveDate) {
        self.current_streak = new_streak;
        self.last_claimed_date = Some(today);
        self.max_streak = self.max_streak.max(new_streak);
    }
}

/// Experience threshold for clearing `level`: `100 * level^2`.
pub fn experience_required_for(level: u32) -> i64 {
    let level = i64::from(level.max(1));
    BASE_EXPERIENCE * level * level
}
