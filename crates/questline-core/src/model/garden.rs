//! Virtual garden plants: growth stages and derived health.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Highest growth stage a plant can reach.
pub const MAX_GROWTH_STAGE: u8 = 9;

/// Cumulative growth points required to reach stage `i + 1`.
pub const GROWTH_STAGE_THRESHOLDS: [i64; 9] =
    [50, 120, 250, 450, 700, 1000, 1400, 1900, 2500];

/// Species available in the garden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlantKind {
    Sunflower,
    Cactus,
    Fern,
    Rose,
    Bonsai,
}

impl PlantKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlantKind::Sunflower => "SUNFLOWER",
            PlantKind::Cactus => "CACTUS",
            PlantKind::Fern => "FERN",
            PlantKind::Rose => "ROSE",
            PlantKind::Bonsai => "BONSAI",
        }
    }

    /// Case-insensitive token parse.
    pub fn parse(s: &str) -> Option<PlantKind> {
        match s.to_ascii_uppercase().as_str() {
            "SUNFLOWER" => Some(PlantKind::Sunflower),
            "CACTUS" => Some(PlantKind::Cactus),
            "FERN" => Some(PlantKind::Fern),
            "ROSE" => Some(PlantKind::Rose),
            "BONSAI" => Some(PlantKind::Bonsai),
            _ => None,
        }
    }
}

/// Derived watering health; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlantHealth {
    Healthy,
    NeedsWater,
    Wilted,
}

/// A plant instance in a profile's garden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    pub id: i64,
    pub profile_id: i64,
    pub kind: PlantKind,
    /// 0..=MAX_GROWTH_STAGE
    pub growth_stage: u8,
    /// Monotone; never decreases.
    pub growth_points: i64,
    pub last_watered: DateTime<Utc>,
}

impl Plant {
    /// New plant at stage 0. `last_watered` is backdated a day so a freshly
    /// granted plant can be watered immediately.
    pub fn sprout(profile_id: i64, kind: PlantKind, now: DateTime<Utc>) -> Self {
        Plant {
            id: 0,
            profile_id,
            kind,
            growth_stage: 0,
            growth_points: 0,
            last_watered: now - chrono::Duration::days(1),
        }
    }

    /// Add growth points, advancing at most one stage when the next
    /// threshold is crossed. A plant at max stage ignores grants entirely.
    /// Returns true when the stage changed.
    pub fn apply_growth(&mut self, points: i64) -> bool {
        if points <= 0 || self.growth_stage >= MAX_GROWTH_STAGE {
            return false;
        }
        self.growth_points += points;
        let next_threshold = GROWTH_STAGE_THRESHOLDS[self.growth_stage as usize];
        if self.growth_points >= next_threshold {
            self.growth_stage += 1;
            return true;
        }
        false
    }

    /// Watering health as of `today`.
    pub fn health(&self, today: NaiveDate) -> PlantHealth {
        let days = (today - self.last_watered.date_naive()).num_days();
        if days <= 1 {
            PlantHealth::Healthy
        } else if days == 2 {
            PlantHealth::NeedsWater
        } else {
            PlantHealth::Wilted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn plant() -> Plant {
        Plant::sprout(1, PlantKind::Sunflower, Utc::now())
    }

    #[test]
    fn points_below_threshold_keep_stage() {
        let mut p = plant();
        for _ in 0..3 {
            assert!(!p.apply_growth(10));
        }
        assert_eq!(p.growth_stage, 0);
        assert_eq!(p.growth_points, 30);
    }

    #[test]
    fn crossing_threshold_advances_exactly_once() {
        let mut p = plant();
        p.growth_points = 45;
        assert!(p.apply_growth(10));
        assert_eq!(p.growth_stage, 1);
        assert_eq!(p.growth_points, 55);
        // Still short of the stage-2 threshold at 120.
        assert!(!p.apply_growth(10));
        assert_eq!(p.growth_stage, 1);
    }

    #[test]
    fn one_grant_advances_at_most_one_stage() {
        let mut p = plant();
        assert!(p.apply_growth(500));
        assert_eq!(p.growth_stage, 1);
    }

    #[test]
    fn max_stage_ignores_grants() {
        let mut p = plant();
        p.growth_stage = MAX_GROWTH_STAGE;
        p.growth_points = 2500;
        assert!(!p.apply_growth(100));
        assert_eq!(p.growth_points, 2500);
    }

    #[test]
    fn health_thresholds() {
        let watered = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        let mut p = plant();
        p.last_watered = watered;
        let day = |d| NaiveDate::from_ymd_opt(2024, 6, d).unwrap();
        assert_eq!(p.health(day(1)), PlantHealth::Healthy);
        assert_eq!(p.health(day(2)), PlantHealth::Healthy);
        assert_eq!(p.health(day(3)), PlantHealth::NeedsWater);
        assert_eq!(p.health(day(4)), PlantHealth::Wilted);
    }
}
