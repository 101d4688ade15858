//! Event-driven challenge progress.
//!
//! A completion event fans out over every rule of every ACTIVE
//! challenge. Applicable rules advance their progress row; a rule
//! reaching its target triggers the challenge completion check, which
//! awards the challenge reward at most once per period cycle (the
//! status flip to COMPLETED takes it out of the active set).

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::condition::condition_allows;
use crate::engine::{reward, RewardOutcome};
use crate::events::GamificationEvent;
use crate::model::{
    Challenge, ChallengeProgress, ChallengeRule, ChallengeStatus, ChallengeType, HistoryEntry,
    HistoryReason,
};
use crate::period::is_valid_for_period;
use crate::store::GamificationStore;
use crate::Result;

/// Run `event` through every active challenge and sum the deltas of any
/// challenges completed by it. Callers fold the outcome into the
/// profile; this function only touches progress rows, challenge status,
/// and grant tables.
pub fn process_event(
    store: &dyn GamificationStore,
    profile_id: i64,
    event: &GamificationEvent,
    now: DateTime<Utc>,
) -> Result<RewardOutcome> {
    let mut outcome = RewardOutcome::default();
    debug!(profile_id, event = event.kind(), "dispatching event");
    for challenge in store.active_challenges()? {
        let rules = store.rules_for_challenge(challenge.id)?;
        if rules.is_empty() {
            // A challenge without rules has nothing to complete.
            continue;
        }
        let mut newly_completed = false;
        for rule in &rules {
            if !rule_applies(rule, event) {
                continue;
            }
            if update_progress(store, profile_id, rule, now)? {
                newly_completed = true;
            }
        }
        if newly_completed {
            outcome.add(evaluate_challenge(store, profile_id, &challenge, &rules, now)?);
        }
    }
    Ok(outcome)
}

/// Type match plus condition predicate.
fn rule_applies(rule: &ChallengeRule, event: &GamificationEvent) -> bool {
    let type_matches = matches!(
        (rule.rule_type, event),
        (ChallengeType::TaskCompletion, GamificationEvent::TaskCompleted { .. })
            | (ChallengeType::FocusSession, GamificationEvent::FocusCompleted { .. })
            | (ChallengeType::DailyStreak, GamificationEvent::StreakUpdated { .. })
    );
    type_matches && condition_allows(rule.id, rule.condition.as_deref(), event)
}

/// Advance one rule's progress row. Returns true when the rule newly
/// reached its target. A row that is already completed and still inside
/// its period window is left alone; a stale row counts from zero.
fn update_progress(
    store: &dyn GamificationStore,
    profile_id: i64,
    rule: &ChallengeRule,
    now: DateTime<Utc>,
) -> Result<bool> {
    let existing = store.get_progress(profile_id, rule.challenge_id, rule.id)?;
    let base = match &existing {
        Some(row) if is_valid_for_period(rule.period, row.last_updated, now) => {
            if row.completed {
                return Ok(false);
            }
            row.progress
        }
        _ => 0,
    };
    let progress = base + 1;
    let completed = progress >= rule.target;
    store.upsert_progress(&ChallengeProgress {
        profile_id,
        challenge_id: rule.challenge_id,
        rule_id: rule.id,
        progress,
        completed,
        last_updated: now,
    })?;
    debug!(rule_id = rule.id, progress, completed, "rule progress updated");
    Ok(completed)
}

/// The challenge completes iff every rule has a progress row that is
/// both completed and still period-valid right now.
fn evaluate_challenge(
    store: &dyn GamificationStore,
    profile_id: i64,
    challenge: &Challenge,
    rules: &[ChallengeRule],
    now: DateTime<Utc>,
) -> Result<RewardOutcome> {
    let progress = store.progress_for_challenge(profile_id, challenge.id)?;
    let all_satisfied = rules.iter().all(|rule| {
        progress.iter().any(|row| {
            row.rule_id == rule.id
                && row.completed
                && is_valid_for_period(rule.period, row.last_updated, now)
        })
    });
    if !all_satisfied {
        return Ok(RewardOutcome::default());
    }

    store.set_challenge_status(challenge.id, ChallengeStatus::Completed)?;
    let challenge_reward = store.get_reward(challenge.reward_id)?;
    let outcome = reward::apply_reward(store, profile_id, &challenge_reward, now)?;
    if !outcome.is_zero() {
        store.insert_history(&HistoryEntry {
            id: 0,
            profile_id,
            at: now,
            delta_xp: outcome.delta_xp,
            delta_coins: outcome.delta_coins,
            reason: HistoryReason::ChallengeCompleted,
            source_id: Some(challenge.id),
        })?;
    }
    info!(
        challenge_id = challenge.id,
        name = %challenge.name,
        delta_xp = outcome.delta_xp,
        delta_coins = outcome.delta_coins,
        "challenge completed"
    );
    Ok(outcome)
}
