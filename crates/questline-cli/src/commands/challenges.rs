//! Challenge commands.

use chrono::{DateTime, Duration, Utc};
use clap::Subcommand;
use questline_core::{
    Challenge, ChallengePeriod, ChallengeRule, ChallengeStatus, ChallengeType, Clock, Reward,
    RewardKind, SystemClock, UnitOfWork,
};

use super::CliContext;

#[derive(Subcommand)]
pub enum ChallengeAction {
    /// List active challenges with the acting user's progress
    List,
    /// Create a single-rule challenge
    Add {
        /// Challenge name
        name: String,
        /// Rule type (TASK_COMPLETION, FOCUS_SESSION, DAILY_STREAK)
        #[arg(long)]
        rule_type: String,
        /// Completions needed
        #[arg(long, default_value = "1")]
        target: u32,
        /// Progress window (ONCE, DAILY, WEEKLY, MONTHLY, EVENT)
        #[arg(long, default_value = "DAILY")]
        period: String,
        /// JSON condition predicate for the rule
        #[arg(long)]
        condition: Option<String>,
        /// Reward kind
        #[arg(long, default_value = "EXPERIENCE")]
        reward_kind: String,
        /// Reward value (formula string or grant token)
        #[arg(long, default_value = "LEVEL*10")]
        reward_value: String,
        /// Days until the challenge expires
        #[arg(long, default_value = "7")]
        days: i64,
    },
}

pub fn run(action: ChallengeAction, ctx: &CliContext) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = ctx.open_db()?;

    match action {
        ChallengeAction::List => {
            let profile = ctx.profile(&db)?;
            let challenges = db.read(|store| store.active_challenges())?;
            if challenges.is_empty() {
                println!("no active challenges");
                return Ok(());
            }
            for challenge in challenges {
                println!(
                    "#{} {} (until {})",
                    challenge.id,
                    challenge.name,
                    challenge.end_at.format("%Y-%m-%d")
                );
                let rules = db.read(|store| store.rules_for_challenge(challenge.id))?;
                for rule in rules {
                    let progress = db
                        .read(|store| store.get_progress(profile.id, challenge.id, rule.id))?
                        .map_or(0, |row| row.progress);
                    println!(
                        "  rule #{}: {} {}/{} per {}",
                        rule.id,
                        rule.rule_type.as_str(),
                        progress,
                        rule.target,
                        rule.period.as_str()
                    );
                }
            }
        }
        ChallengeAction::Add {
            name,
            rule_type,
            target,
            period,
            condition,
            reward_kind,
            reward_value,
            days,
        } => {
            let rule_type = ChallengeType::parse(&rule_type.to_uppercase())
                .ok_or_else(|| format!("unknown rule type '{rule_type}'"))?;
            let period = ChallengePeriod::parse(&period.to_uppercase())
                .ok_or_else(|| format!("unknown period '{period}'"))?;
            let reward_kind = RewardKind::parse(&reward_kind.to_uppercase())
                .ok_or_else(|| format!("unknown reward kind '{reward_kind}'"))?;
            let now: DateTime<Utc> = SystemClock.now_utc();

            // Reward, challenge and rule land together or not at all.
            let challenge_id = db.run_in_transaction(|store| {
                let reward_id = store.insert_reward(&Reward::transient(
                    &format!("{name} reward"),
                    reward_kind,
                    &reward_value,
                ))?;
                let challenge_id = store.insert_challenge(&Challenge {
                    id: 0,
                    name: name.clone(),
                    description: String::new(),
                    status: ChallengeStatus::Active,
                    period,
                    start_at: now,
                    end_at: now + Duration::days(days),
                    reward_id,
                })?;
                store.insert_rule(&ChallengeRule {
                    id: 0,
                    challenge_id,
                    rule_type,
                    target,
                    period,
                    condition,
                })?;
                Ok(challenge_id)
            })?;
            println!("created challenge #{challenge_id} '{name}'");
        }
    }
    Ok(())
}
