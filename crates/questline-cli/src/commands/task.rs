//! Task completion commands.

use clap::Subcommand;
use questline_core::engine::set_task_status;
use questline_core::SystemClock;

use super::CliContext;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Mark a task done (first completion grants rewards)
    Complete {
        /// Task ID
        id: i64,
        /// Comma-separated task tags, matched against challenge rules
        #[arg(long)]
        tags: Option<String>,
        /// Plant receiving the growth points
        #[arg(long)]
        plant: Option<i64>,
    },
    /// Mark a task not done again
    Reopen {
        /// Task ID
        id: i64,
    },
}

pub fn run(action: TaskAction, ctx: &CliContext) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = ctx.open_db()?;
    let config = ctx.load_config()?;
    let profile = ctx.profile(&db)?;

    match action {
        TaskAction::Complete { id, tags, plant } => {
            let tags: Vec<String> = tags
                .map(|raw| raw.split(',').map(|t| t.trim().to_string()).collect())
                .unwrap_or_default();
            let summary = set_task_status(
                &mut db,
                profile.id,
                id,
                true,
                &tags,
                plant,
                &config,
                &SystemClock,
            )?;
            if summary.first_completion {
                println!(
                    "task {id} completed: +{} xp, +{} coins",
                    summary.outcome.delta_xp, summary.outcome.delta_coins
                );
            } else {
                println!("task {id} completed (already rewarded before)");
            }
        }
        TaskAction::Reopen { id } => {
            set_task_status(&mut db, profile.id, id, false, &[], None, &config, &SystemClock)?;
            println!("task {id} reopened");
        }
    }
    Ok(())
}
