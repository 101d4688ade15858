//! Focus session commands.

use clap::Subcommand;
use questline_core::engine::complete_focus_session;
use questline_core::SystemClock;

use super::CliContext;

#[derive(Subcommand)]
pub enum FocusAction {
    /// Record a finished focus session
    Complete {
        /// Session ID
        id: i64,
        /// Session length in minutes
        #[arg(long)]
        minutes: u32,
        /// Task the session was spent on
        #[arg(long)]
        task: Option<i64>,
        /// Plant receiving the growth points
        #[arg(long)]
        plant: Option<i64>,
    },
}

pub fn run(action: FocusAction, ctx: &CliContext) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = ctx.open_db()?;
    let config = ctx.load_config()?;
    let profile = ctx.profile(&db)?;

    match action {
        FocusAction::Complete {
            id,
            minutes,
            task,
            plant,
        } => {
            let summary = complete_focus_session(
                &mut db,
                profile.id,
                id,
                minutes * 60,
                task,
                plant,
                &config,
                &SystemClock,
            )?;
            if summary.rewarded {
                println!(
                    "session {id} ({minutes} min): +{} xp, +{} coins",
                    summary.outcome.delta_xp, summary.outcome.delta_coins
                );
            } else {
                println!("session {id} ({minutes} min): too short for rewards");
            }
        }
    }
    Ok(())
}
