//! Surprise task commands.

use chrono::Duration;
use clap::Subcommand;
use questline_core::engine::{accept_surprise_task, pick_surprise_task};
use questline_core::{Clock, Reward, RewardKind, SurpriseTask, SystemClock, UnitOfWork};

use super::CliContext;

#[derive(Subcommand)]
pub enum SurpriseAction {
    /// Show (or select) today's surprise task
    Pick,
    /// Complete a surprise task and collect its reward
    Accept {
        /// Surprise task ID
        id: i64,
    },
    /// Add a surprise task to the pool
    Add {
        /// What the player has to do
        description: String,
        /// Reward kind
        #[arg(long, default_value = "EXPERIENCE")]
        reward_kind: String,
        /// Reward value (formula string or grant token)
        #[arg(long, default_value = "30")]
        reward_value: String,
        /// Hours until the task expires
        #[arg(long, default_value = "48")]
        expires_hours: i64,
    },
}

pub fn run(action: SurpriseAction, ctx: &CliContext) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = ctx.open_db()?;
    let profile = ctx.profile(&db)?;

    match action {
        SurpriseAction::Pick => {
            match pick_surprise_task(&mut db, profile.id, &SystemClock)? {
                Some(task) => println!("#{}: {}", task.id, task.description),
                None => println!("no surprise task available today"),
            }
        }
        SurpriseAction::Accept { id } => {
            let outcome = accept_surprise_task(&mut db, id, &SystemClock)?;
            println!(
                "surprise task {id} completed: +{} xp, +{} coins",
                outcome.delta_xp, outcome.delta_coins
            );
        }
        SurpriseAction::Add {
            description,
            reward_kind,
            reward_value,
            expires_hours,
        } => {
            let kind = RewardKind::parse(&reward_kind.to_uppercase())
                .ok_or_else(|| format!("unknown reward kind '{reward_kind}'"))?;
            let now = SystemClock.now_utc();
            // Reward and task land together or not at all.
            let id = db.run_in_transaction(|store| {
                let reward_id = store.insert_reward(&Reward::transient(
                    "surprise reward",
                    kind,
                    &reward_value,
                ))?;
                store.insert_surprise_task(&SurpriseTask {
                    id: 0,
                    profile_id: profile.id,
                    description: description.clone(),
                    reward_id,
                    expires_at: now + Duration::hours(expires_hours),
                    completed: false,
                    shown_on: None,
                })
            })?;
            println!("added surprise task #{id}");
        }
    }
    Ok(())
}
