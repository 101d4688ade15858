//! Reward value formulas.
//!
//! Reward magnitudes are stored as strings in the reward catalog:
//!
//! - `"25"` -- literal amount
//! - `"LEVEL*5"` -- scales linearly with player level
//! - `"BASE*10*1.5"` -- `floor(10 * 1.5^(level-1))`
//!
//! The grammar is parsed once into a typed [`RewardFormula`] and evaluated
//! against the profile's current level. Numeric results never go below 0.

use std::str::FromStr;

use crate::error::{Result, ValidationError};

/// A parsed reward magnitude formula.
#[derive(Debug, Clone, PartialEq)]
pub enum RewardFormula {
    /// Fixed amount. May be negative in the catalog (penalties), but
    /// evaluation floors the result at 0.
    Literal(i64),
    /// `level * multiplier`
    PerLevel(i64),
    /// `floor(base * factor^(level-1))`
    Exponential { base: i64, factor: f64 },
}

impl FromStr for RewardFormula {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let upper = trimmed.to_ascii_uppercase();

        if let Some(rest) = upper.strip_prefix("LEVEL*") {
            let multiplier: i64 = rest
                .trim()
                .parse()
                .map_err(|_| ValidationError::MalformedFormula(trimmed.to_string()))?;
            if multiplier < 0 {
                return Err(ValidationError::NegativeTerm {
                    what: "multiplier",
                    formula: trimmed.to_string(),
                });
            }
            return Ok(RewardFormula::PerLevel(multiplier));
        }

        if upper.starts_with("BASE*") {
            let parts: Vec<&str> = trimmed.split('*').collect();
            if parts.len() != 3 {
                return Err(ValidationError::MalformedFormula(trimmed.to_string()));
            }
            let base: i64 = parts[1]
                .trim()
                .parse()
                .map_err(|_| ValidationError::MalformedFormula(trimmed.to_string()))?;
            let factor: f64 = parts[2]
                .trim()
                .parse()
                .map_err(|_| ValidationError::MalformedFormula(trimmed.to_string()))?;
            if factor < 0.0 {
                return Err(ValidationError::NegativeTerm {
                    what: "factor",
                    formula: trimmed.to_string(),
                });
            }
            return Ok(RewardFormula::Exponential { base, factor });
        }

        trimmed
            .parse()
            .map(RewardFormula::Literal)
            .map_err(|_| ValidationError::MalformedFormula(trimmed.to_string()))
    }
}

impl RewardFormula {
    /// Evaluate against a player level (level >= 1). Floored at 0.
    pub fn evaluate(&self, level: u32) -> i64 {
        let level = level.max(1);
        let raw = match *self {
            RewardFormula::Literal(v) => v,
            RewardFormula::PerLevel(multiplier) => i64::from(level) * multiplier,
            RewardFormula::Exponential { base, factor } => {
                (base as f64 * factor.powi(level as i32 - 1)).floor() as i64
            }
        };
        raw.max(0)
    }
}

/// Parse and evaluate a reward value string in one step.
pub fn evaluate(value: &str, level: u32) -> Result<i64> {
    let formula: RewardFormula = value.parse()?;
    Ok(formula.evaluate(level))
}
