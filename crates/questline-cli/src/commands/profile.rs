//! Profile commands.

use clap::Subcommand;
use questline_core::{Profile, SystemClock, Clock, UnitOfWork};

use super::CliContext;

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Create a fresh level-1 profile for the acting user
    Init,
    /// Show the acting user's profile
    Show,
}

pub fn run(action: ProfileAction, ctx: &CliContext) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = ctx.open_db()?;
    match action {
        ProfileAction::Init => {
            let now = SystemClock.now_utc();
            let id = db
                .run_in_transaction(|store| store.insert_profile(&Profile::new(ctx.user_id, now)))?;
            println!("created profile {id} for user {}", ctx.user_id);
        }
        ProfileAction::Show => {
            let p = ctx.profile(&db)?;
            println!("profile #{} (user {})", p.id, p.user_id);
            println!(
                "  level {}  xp {}/{}  coins {}",
                p.level, p.experience, p.experience_for_next_level, p.coins
            );
            println!(
                "  streak {} (best {})  last claim {}",
                p.current_streak,
                p.max_streak,
                p.last_claimed_date
                    .map_or_else(|| "never".to_string(), |d| d.to_string())
            );
        }
    }
    Ok(())
}
