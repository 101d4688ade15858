//! Daily streak claim commands.

use clap::Subcommand;
use questline_core::engine::{claim_daily_reward, daily_reward_preview};
use questline_core::{Clock, Reward, RewardKind, StreakReward, SystemClock, UnitOfWork};

use super::CliContext;

#[derive(Subcommand)]
pub enum ClaimAction {
    /// Claim today's streak reward
    Now,
    /// Show the upcoming streak reward window
    Preview,
    /// Define the reward for a streak day
    Define {
        /// Streak day the reward is for
        day: u32,
        /// Reward kind (COINS, EXPERIENCE, BADGE, PLANT, THEME)
        #[arg(long, default_value = "COINS")]
        kind: String,
        /// Reward value (formula string or grant token)
        #[arg(long)]
        value: String,
        /// Display name
        #[arg(long)]
        name: Option<String>,
    },
}

pub fn run(action: ClaimAction, ctx: &CliContext) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = ctx.open_db()?;
    let profile = ctx.profile(&db)?;

    match action {
        ClaimAction::Now => {
            let config = ctx.load_config()?;
            let summary = claim_daily_reward(&mut db, profile.id, &config, &SystemClock)?;
            println!(
                "claimed streak day {}: {} (+{} xp, +{} coins)",
                summary.new_streak,
                summary.reward.name,
                summary.outcome.delta_xp,
                summary.outcome.delta_coins
            );
        }
        ClaimAction::Preview => {
            let today = SystemClock.today_utc();
            let preview = db.read(|store| daily_reward_preview(store, profile.id, today))?;
            if preview.can_claim_today {
                println!("claimable today: streak day {}", preview.prospective_streak);
            } else {
                println!("already claimed today (streak day {})", preview.prospective_streak);
            }
            for entry in &preview.entries {
                let marker = if entry.is_today { " <- today" } else { "" };
                println!(
                    "  day {:>3}: {} [{}]{}",
                    entry.streak_day,
                    entry.reward.name,
                    entry.reward.kind.as_str(),
                    marker
                );
            }
        }
        ClaimAction::Define { day, kind, value, name } => {
            let kind = RewardKind::parse(&kind.to_uppercase())
                .ok_or_else(|| format!("unknown reward kind '{kind}'"))?;
            let name = name.unwrap_or_else(|| format!("streak day {day}"));
            db.run_in_transaction(|store| {
                let reward_id = store.insert_reward(&Reward::transient(&name, kind, &value))?;
                store.insert_streak_reward(&StreakReward {
                    streak_day: day,
                    reward_id,
                })
            })?;
            println!("streak day {day} now rewards '{name}'");
        }
    }
    Ok(())
}
