//! Garden commands.

use clap::Subcommand;
use questline_core::engine::{garden_report, water_plants};
use questline_core::{Clock, Plant, PlantKind, SystemClock, UnitOfWork};

use super::CliContext;

#[derive(Subcommand)]
pub enum GardenAction {
    /// Show the garden with health states
    Show,
    /// Water all plants (once per day)
    Water {
        /// Plant that gets the bonus growth points
        #[arg(long)]
        plant: Option<i64>,
    },
    /// Add a plant to the garden
    Plant {
        /// Plant kind (SUNFLOWER, CACTUS, FERN, ROSE, BONSAI)
        kind: String,
    },
}

pub fn run(action: GardenAction, ctx: &CliContext) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = ctx.open_db()?;
    let profile = ctx.profile(&db)?;

    match action {
        GardenAction::Show => {
            let today = SystemClock.today_utc();
            let report = db.read(|store| garden_report(store, profile.id, today))?;
            if report.is_empty() {
                println!("the garden is empty");
                return Ok(());
            }
            for entry in report {
                println!(
                    "#{} {} stage {} ({} pts) {:?}",
                    entry.plant.id,
                    entry.plant.kind.as_str(),
                    entry.plant.growth_stage,
                    entry.plant.growth_points,
                    entry.health
                );
            }
        }
        GardenAction::Water { plant } => {
            let config = ctx.load_config()?;
            water_plants(&mut db, profile.id, plant, &config, &SystemClock)?;
            println!("garden watered");
        }
        GardenAction::Plant { kind } => {
            let kind = PlantKind::parse(&kind)
                .ok_or_else(|| format!("unknown plant kind '{kind}'"))?;
            let now = SystemClock.now_utc();
            let id = db.run_in_transaction(|store| {
                store.insert_plant(&Plant::sprout(profile.id, kind, now))
            })?;
            println!("planted {} as #{id}", kind.as_str());
        }
    }
    Ok(())
}
