//! Reward history commands.

use clap::Subcommand;
use questline_core::UnitOfWork;

use super::CliContext;

#[derive(Subcommand)]
pub enum HistoryAction {
    /// Show the most recent ledger entries
    Show {
        /// Number of entries
        #[arg(long, default_value = "20")]
        limit: u32,
    },
}

pub fn run(action: HistoryAction, ctx: &CliContext) -> Result<(), Box<dyn std::error::Error>> {
    let db = ctx.open_db()?;
    let profile = ctx.profile(&db)?;

    match action {
        HistoryAction::Show { limit } => {
            let entries = db.read(|store| store.history(profile.id, limit))?;
            if entries.is_empty() {
                println!("no history yet");
                return Ok(());
            }
            for entry in entries {
                let source = entry
                    .source_id
                    .map_or(String::new(), |id| format!(" (#{id})"));
                println!(
                    "{}  {:+} xp  {:+} coins  {}{}",
                    entry.at.format("%Y-%m-%d %H:%M"),
                    entry.delta_xp,
                    entry.delta_coins,
                    entry.reason.as_str(),
                    source
                );
            }
        }
    }
    Ok(())
}
