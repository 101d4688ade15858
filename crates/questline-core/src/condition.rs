//! Challenge rule condition predicates.
//!
//! A rule may carry a JSON condition document narrowing which events count:
//!
//! ```json
//! { "tags": ["work", "deep"], "minDurationMinutes": 25, "minStreak": 3 }
//! ```
//!
//! Absent fields are always satisfied. A condition that fails to parse is a
//! non-fatal non-match: the rule simply does not apply, and the parse error
//! is logged rather than propagated.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::events::GamificationEvent;

/// Structured condition attached to a [`crate::model::ChallengeRule`].
///
/// Field names keep the catalog's camelCase JSON keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuleCondition {
    /// Tags that must all be present on a completed task (case-insensitive).
    pub tags: Option<Vec<String>>,
    /// Minimum focus session length, in minutes.
    pub min_duration_minutes: Option<u32>,
    /// Streak must be at least this value.
    pub min_streak: Option<u32>,
    /// Streak must be exactly this value.
    pub exact_streak: Option<u32>,
}

/// Evaluate a rule's raw condition document against an event.
///
/// An absent or empty document always matches; a malformed one never does
/// (logged, not raised).
pub fn condition_allows(rule_id: i64, raw: Option<&str>, event: &GamificationEvent) -> bool {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return true;
    };
    match serde_json::from_str::<RuleCondition>(raw) {
        Ok(cond) => cond.matches(event),
        Err(err) => {
            warn!(rule_id, %err, "unparseable rule condition, rule will not match");
            false
        }
    }
}

impl RuleCondition {
    /// Does this condition accept the event?
    pub fn matches(&self, event: &GamificationEvent) -> bool {
        match event {
            GamificationEvent::TaskCompleted { tags, .. } => {
                let Some(required) = &self.tags else { return true };
                let have: Vec<String> = tags.iter().map(|t| t.to_lowercase()).collect();
                required
                    .iter()
                    .all(|req| have.contains(&req.to_lowercase()))
            }
            GamificationEvent::FocusCompleted { duration_secs, .. } => {
                match self.min_duration_minutes {
                    // Widened so a huge catalog value cannot overflow u32.
                    Some(min) => u64::from(*duration_secs) >= u64::from(min) * 60,
                    None => true,
                }
            }
            GamificationEvent::StreakUpdated { new_streak } => {
                if let Some(min) = self.min_streak {
                    if *new_streak < min {
                        return false;
                    }
                }
                if let Some(exact) = self.exact_streak {
                    if *new_streak != exact {
                        return false;
                    }
                }
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_event(tags: &[&str]) -> GamificationEvent {
        GamificationEvent::TaskCompleted {
            task_id: 1,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn empty_condition_matches_everything() {
        let cond = RuleCondition::default();
        assert!(cond.matches(&task_event(&[])));
        assert!(cond.matches(&GamificationEvent::StreakUpdated { new_streak: 1 }));
    }

    #[test]
    fn tag_match_is_case_insensitive_and_requires_all() {
        let raw = Some(r#"{"tags":["Work","Deep"]}"#);
        assert!(condition_allows(1, raw, &task_event(&["deep", "WORK", "extra"])));
        assert!(!condition_allows(1, raw, &task_event(&["work"])));
    }

    #[test]
    fn min_duration_compares_in_seconds() {
        let raw = Some(r#"{"minDurationMinutes":25}"#);
        let short = GamificationEvent::FocusCompleted {
            session_id: 1,
            duration_secs: 25 * 60 - 1,
            task_id: None,
        };
        let exact = GamificationEvent::FocusCompleted {
            session_id: 1,
            duration_secs: 25 * 60,
            task_id: None,
        };
        assert!(!condition_allows(1, raw, &short));
        assert!(condition_allows(1, raw, &exact));
    }

    #[test]
    fn huge_minimum_duration_does_not_overflow() {
        // u32::MAX minutes times 60 exceeds u32; the rule simply never
        // matches instead of panicking.
        let raw = Some(r#"{"minDurationMinutes":4294967295}"#);
        let session = GamificationEvent::FocusCompleted {
            session_id: 1,
            duration_secs: u32::MAX,
            task_id: None,
        };
        assert!(!condition_allows(1, raw, &session));
    }

    #[test]
    fn streak_bounds() {
        let min = Some(r#"{"minStreak":3}"#);
        assert!(!condition_allows(1, min, &GamificationEvent::StreakUpdated { new_streak: 2 }));
        assert!(condition_allows(1, min, &GamificationEvent::StreakUpdated { new_streak: 3 }));

        let exact = Some(r#"{"exactStreak":7}"#);
        assert!(!condition_allows(1, exact, &GamificationEvent::StreakUpdated { new_streak: 8 }));
        assert!(condition_allows(1, exact, &GamificationEvent::StreakUpdated { new_streak: 7 }));
    }

    #[test]
    fn absent_condition_matches_but_malformed_does_not() {
        let event = task_event(&["anything"]);
        assert!(condition_allows(1, None, &event));
        assert!(condition_allows(1, Some("  "), &event));
        assert!(!condition_allows(1, Some("{not json"), &event));
    }
}
