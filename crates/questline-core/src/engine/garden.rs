//! Virtual garden growth and watering.

use chrono::NaiveDate;
use tracing::info;

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::model::{Plant, PlantHealth};
use crate::store::{GamificationStore, UnitOfWork};
use crate::{GamificationError, Result};

/// A plant together with its derived health state.
#[derive(Debug, Clone)]
pub struct PlantReport {
    pub plant: Plant,
    pub health: PlantHealth,
}

/// Add growth points to one plant and persist it. Returns true when the
/// grant crossed a stage threshold.
pub fn grant_growth_points(
    store: &dyn GamificationStore,
    plant_id: i64,
    points: i64,
) -> Result<bool> {
    let mut plant = store.get_plant(plant_id)?;
    let advanced = plant.apply_growth(points);
    store.update_plant(&plant)?;
    if advanced {
        info!(plant_id, stage = plant.growth_stage, "plant advanced a growth stage");
    }
    Ok(advanced)
}

/// Water the whole garden. Allowed once per UTC day: every plant gets
/// the same watering timestamp, and only the selected plant receives
/// the bonus growth points.
pub fn water_plants(
    uow: &mut impl UnitOfWork,
    profile_id: i64,
    selected_plant_id: Option<i64>,
    config: &EngineConfig,
    clock: &dyn Clock,
) -> Result<()> {
    let now = clock.now_utc();
    let today = clock.today_utc();

    uow.run_in_transaction(|store| {
        let plants = store.plants(profile_id)?;
        if plants.is_empty() {
            return Err(GamificationError::invalid_state("no plants to water"));
        }
        if plants
            .iter()
            .any(|p| p.last_watered.date_naive() >= today)
        {
            return Err(GamificationError::invalid_state(
                "plants already watered today",
            ));
        }

        store.water_all_plants(profile_id, now)?;
        if let Some(plant_id) = selected_plant_id {
            grant_growth_points(store, plant_id, config.watering_bonus_points)?;
        }
        info!(profile_id, count = plants.len(), "garden watered");
        Ok(())
    })
}

/// Read-only view of a profile's plants with health derived from the
/// last watering date.
pub fn garden_report(
    store: &dyn GamificationStore,
    profile_id: i64,
    today: NaiveDate,
) -> Result<Vec<PlantReport>> {
    Ok(store
        .plants(profile_id)?
        .into_iter()
        .map(|plant| PlantReport {
            health: plant.health(today),
            plant,
        })
        .collect())
}
