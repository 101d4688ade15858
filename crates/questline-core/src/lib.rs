//! # Questline Core Library
//!
//! Core business logic for the Questline gamification engine. It reacts
//! to domain events (task completed, focus session completed, streak
//! advanced) and mutates a player's profile, challenge progress, badges,
//! plants, and reward history, all behind an atomic unit-of-work
//! boundary. The CLI binary is a thin layer over this library.
//!
//! ## Architecture
//!
//! - **Formula**: reward value grammar (`<int>`, `LEVEL*n`, `BASE*b*f`)
//!   evaluated at the profile's current level
//! - **Events & conditions**: typed completion events matched against
//!   per-rule JSON predicates
//! - **Engine**: one module per use case (claim, task completion, focus,
//!   garden, surprise tasks, previews), each running inside a single
//!   transaction
//! - **Store**: repository trait with a bundled SQLite implementation
//!
//! ## Key Components
//!
//! - [`GamificationDb`]: SQLite persistence and the unit of work
//! - [`EngineConfig`]: tunable constants (base rewards, growth, fallbacks)
//! - [`engine::process_event`]: the challenge progress pipeline
//! - [`GamificationError`]: error kinds surfaced to callers

pub mod clock;
pub mod condition;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod formula;
pub mod model;
pub mod period;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::EngineConfig;
pub use engine::RewardOutcome;
pub use error::{GamificationError, Result, StorageError, ValidationError};
pub use events::GamificationEvent;
pub use model::{
    Challenge, ChallengePeriod, ChallengeProgress, ChallengeRule, ChallengeStatus, ChallengeType,
    HistoryEntry, HistoryReason, Plant, PlantHealth, PlantKind, Profile, Reward, RewardKind,
    StreakReward, SurpriseTask, TaskState,
};
pub use store::{GamificationDb, GamificationStore, UnitOfWork};
