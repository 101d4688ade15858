//! Reward catalog entries.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::garden::PlantKind;

/// What a reward grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RewardKind {
    Coins,
    Experience,
    Badge,
    Plant,
    Theme,
}

impl RewardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RewardKind::Coins => "COINS",
            RewardKind::Experience => "EXPERIENCE",
            RewardKind::Badge => "BADGE",
            RewardKind::Plant => "PLANT",
            RewardKind::Theme => "THEME",
        }
    }

    pub fn parse(s: &str) -> Option<RewardKind> {
        match s {
            "COINS" => Some(RewardKind::Coins),
            "EXPERIENCE" => Some(RewardKind::Experience),
            "BADGE" => Some(RewardKind::Badge),
            "PLANT" => Some(RewardKind::Plant),
            "THEME" => Some(RewardKind::Theme),
            _ => None,
        }
    }
}

/// An immutable reward catalog entry. `value` is either a numeric formula
/// (see [`crate::formula`]) or a grant token, depending on `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub kind: RewardKind,
    pub value: String,
}

impl Reward {
    /// Transient catalog entry; the engine uses these for fixed base
    /// rewards that never live in the catalog table.
    pub fn transient(name: &str, kind: RewardKind, value: &str) -> Self {
        Reward {
            id: 0,
            name: name.to_string(),
            description: String::new(),
            kind,
            value: value.to_string(),
        }
    }

    /// Badge id encoded in a BADGE reward's value.
    pub fn badge_id(&self) -> Result<i64, ValidationError> {
        self.value
            .trim()
            .parse()
            .map_err(|_| ValidationError::BadGrantToken {
                kind: "BADGE",
                value: self.value.clone(),
            })
    }

    /// Plant kind encoded in a PLANT reward's value.
    pub fn plant_kind(&self) -> Result<PlantKind, ValidationError> {
        PlantKind::parse(self.value.trim()).ok_or_else(|| ValidationError::BadGrantToken {
            kind: "PLANT",
            value: self.value.clone(),
        })
    }
}
