//! CLI subcommand implementations, one module per area.

use std::path::PathBuf;

use questline_core::{EngineConfig, GamificationDb, Profile, Result, UnitOfWork};

pub mod challenges;
pub mod claim;
pub mod focus;
pub mod garden;
pub mod history;
pub mod profile;
pub mod surprise;
pub mod task;

/// Shared command context built from the global CLI options.
pub struct CliContext {
    pub db_path: PathBuf,
    pub config_path: Option<PathBuf>,
    pub user_id: i64,
}

impl CliContext {
    pub fn open_db(&self) -> Result<GamificationDb> {
        GamificationDb::open(&self.db_path)
    }

    pub fn load_config(&self) -> Result<EngineConfig> {
        match &self.config_path {
            Some(path) => EngineConfig::load(path),
            None => Ok(EngineConfig::default()),
        }
    }

    /// The acting user's profile.
    pub fn profile(&self, db: &GamificationDb) -> Result<Profile> {
        db.read(|store| store.get_profile_by_user(self.user_id))
    }
}
