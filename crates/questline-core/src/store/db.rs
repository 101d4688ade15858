//! SQLite-backed store and transactional unit of work.
//!
//! Schema is created on open. Timestamps are stored as RFC 3339 text,
//! dates as `YYYY-MM-DD`. Engine operations run through
//! [`UnitOfWork::run_in_transaction`], which maps onto a real SQLite
//! transaction: an error from any step rolls the whole mutation back.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{GamificationError, Result, StorageError};
use crate::model::{
    Challenge, ChallengePeriod, ChallengeProgress, ChallengeRule, ChallengeStatus, ChallengeType,
    HistoryEntry, HistoryReason, Plant, PlantKind, Profile, Reward, RewardKind, StreakReward,
    SurpriseTask, TaskState,
};
use crate::store::{GamificationStore, UnitOfWork};

/// SQLite database holding all engine state.
pub struct GamificationDb {
    conn: Connection,
}

impl GamificationDb {
    /// Open (and migrate) the database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(|e| StorageError::OpenFailed(e.to_string()))?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (tests and throwaway runs).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::OpenFailed(e.to_string()))?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS profiles (
                    id          INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id     INTEGER NOT NULL UNIQUE,
                    level       INTEGER NOT NULL,
                    experience  INTEGER NOT NULL,
                    coins       INTEGER NOT NULL,
                    experience_for_next_level INTEGER NOT NULL,
                    last_active TEXT NOT NULL,
                    current_streak INTEGER NOT NULL DEFAULT 0,
                    last_claimed_date TEXT,
                    max_streak  INTEGER NOT NULL DEFAULT 0
                );

                CREATE TABLE IF NOT EXISTS rewards (
                    id          INTEGER PRIMARY KEY AUTOINCREMENT,
                    name        TEXT NOT NULL,
                    description TEXT NOT NULL DEFAULT '',
                    kind        TEXT NOT NULL,
                    value       TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS challenges (
                    id          INTEGER PRIMARY KEY AUTOINCREMENT,
                    name        TEXT NOT NULL,
                    description TEXT NOT NULL DEFAULT '',
                    status      TEXT NOT NULL,
                    period      TEXT NOT NULL,
                    start_at    TEXT NOT NULL,
                    end_at      TEXT NOT NULL,
                    reward_id   INTEGER NOT NULL
                );

                CREATE TABLE IF NOT EXISTS challenge_rules (
                    id           INTEGER PRIMARY KEY AUTOINCREMENT,
                    challenge_id INTEGER NOT NULL,
                    rule_type    TEXT NOT NULL,
                    target       INTEGER NOT NULL,
                    period       TEXT NOT NULL,
                    condition    TEXT
                );

                CREATE TABLE IF NOT EXISTS challenge_progress (
                    profile_id   INTEGER NOT NULL,
                    challenge_id INTEGER NOT NULL,
                    rule_id      INTEGER NOT NULL,
                    progress     INTEGER NOT NULL,
                    completed    INTEGER NOT NULL,
                    last_updated TEXT NOT NULL,
                    PRIMARY KEY (profile_id, challenge_id, rule_id)
                );

                CREATE TABLE IF NOT EXISTS earned_badges (
                    profile_id INTEGER NOT NULL,
                    badge_id   INTEGER NOT NULL,
                    earned_at  TEXT NOT NULL,
                    PRIMARY KEY (profile_id, badge_id)
                );

                CREATE TABLE IF NOT EXISTS plants (
                    id            INTEGER PRIMARY KEY AUTOINCREMENT,
                    profile_id    INTEGER NOT NULL,
                    kind          TEXT NOT NULL,
                    growth_stage  INTEGER NOT NULL,
                    growth_points INTEGER NOT NULL,
                    last_watered  TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS surprise_tasks (
                    id          INTEGER PRIMARY KEY AUTOINCREMENT,
                    profile_id  INTEGER NOT NULL,
                    description TEXT NOT NULL,
                    reward_id   INTEGER NOT NULL,
                    expires_at  TEXT NOT NULL,
                    completed   INTEGER NOT NULL DEFAULT 0,
                    shown_on    TEXT
                );

                CREATE TABLE IF NOT EXISTS streak_rewards (
                    streak_day INTEGER PRIMARY KEY,
                    reward_id  INTEGER NOT NULL
                );

                CREATE TABLE IF NOT EXISTS history (
                    id          INTEGER PRIMARY KEY AUTOINCREMENT,
                    profile_id  INTEGER NOT NULL,
                    at          TEXT NOT NULL,
                    delta_xp    INTEGER NOT NULL,
                    delta_coins INTEGER NOT NULL,
                    reason      TEXT NOT NULL,
                    source_id   INTEGER
                );

                CREATE TABLE IF NOT EXISTS task_state (
                    task_id            INTEGER PRIMARY KEY,
                    done               INTEGER NOT NULL DEFAULT 0,
                    completed_at       TEXT,
                    was_completed_once INTEGER NOT NULL DEFAULT 0
                );

                CREATE INDEX IF NOT EXISTS idx_rules_challenge
                    ON challenge_rules(challenge_id);
                CREATE INDEX IF NOT EXISTS idx_progress_challenge
                    ON challenge_progress(profile_id, challenge_id);
                CREATE INDEX IF NOT EXISTS idx_plants_profile
                    ON plants(profile_id);
                CREATE INDEX IF NOT EXISTS idx_history_profile_at
                    ON history(profile_id, at);",
            )
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))?;
        Ok(())
    }
}

impl UnitOfWork for GamificationDb {
    fn run_in_transaction<T>(
        &mut self,
        f: impl FnOnce(&dyn GamificationStore) -> Result<T>,
    ) -> Result<T> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| GamificationError::Transaction(e.to_string()))?;
        let store = SqlStore { conn: &tx };
        match f(&store) {
            Ok(value) => {
                tx.commit()
                    .map_err(|e| GamificationError::Transaction(e.to_string()))?;
                Ok(value)
            }
            // Transaction rolls back on drop; the step's own error kind
            // is what callers match on.
            Err(err) => Err(err),
        }
    }

    fn read<T>(&self, f: impl FnOnce(&dyn GamificationStore) -> Result<T>) -> Result<T> {
        f(&SqlStore { conn: &self.conn })
    }
}

/// A store view over a connection or an open transaction.
struct SqlStore<'a> {
    conn: &'a Connection,
}

fn encode_dt(at: DateTime<Utc>) -> String {
    at.to_rfc3339()
}

fn decode_dt(table: &'static str, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            StorageError::CorruptRow {
                table,
                message: format!("bad timestamp '{raw}': {e}"),
            }
            .into()
        })
}

fn encode_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn decode_date(table: &'static str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| {
        StorageError::CorruptRow {
            table,
            message: format!("bad date '{raw}': {e}"),
        }
        .into()
    })
}

fn decode_token<T>(
    table: &'static str,
    raw: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T> {
    parse(raw).ok_or_else(|| {
        StorageError::CorruptRow {
            table,
            message: format!("unknown token '{raw}'"),
        }
        .into()
    })
}

type ProfileRow = (
    i64,
    i64,
    u32,
    i64,
    i64,
    i64,
    String,
    u32,
    Option<String>,
    u32,
);

fn profile_from_row(row: ProfileRow) -> Result<Profile> {
    let (id, user_id, level, experience, coins, next, last_active, streak, claimed, max_streak) =
        row;
    Ok(Profile {
        id,
        user_id,
        level,
        experience,
        coins,
        experience_for_next_level: next,
        last_active: decode_dt("profiles", &last_active)?,
        current_streak: streak,
        last_claimed_date: claimed
            .map(|raw| decode_date("profiles", &raw))
            .transpose()?,
        max_streak,
    })
}

const PROFILE_COLS: &str = "id, user_id, level, experience, coins, \
     experience_for_next_level, last_active, current_streak, last_claimed_date, max_streak";

impl SqlStore<'_> {
    fn profile_row(&self, sql: &str, key: i64) -> Result<Option<Profile>> {
        let row: Option<ProfileRow> = self
            .conn
            .query_row(sql, params![key], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                    row.get(7)?,
                    row.get(8)?,
                    row.get(9)?,
                ))
            })
            .optional()?;
        row.map(profile_from_row).transpose()
    }
}

impl GamificationStore for SqlStore<'_> {
    fn get_profile(&self, id: i64) -> Result<Profile> {
        let sql = format!("SELECT {PROFILE_COLS} FROM profiles WHERE id = ?1");
        self.profile_row(&sql, id)?
            .ok_or_else(|| GamificationError::not_found("profile", id))
    }

    fn get_profile_by_user(&self, user_id: i64) -> Result<Profile> {
        let sql = format!("SELECT {PROFILE_COLS} FROM profiles WHERE user_id = ?1");
        self.profile_row(&sql, user_id)?
            .ok_or_else(|| GamificationError::not_found("profile for user", user_id))
    }

    fn insert_profile(&self, profile: &Profile) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO profiles (user_id, level, experience, coins,
                experience_for_next_level, last_active, current_streak,
                last_claimed_date, max_streak)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                profile.user_id,
                profile.level,
                profile.experience,
                profile.coins,
                profile.experience_for_next_level,
                encode_dt(profile.last_active),
                profile.current_streak,
                profile.last_claimed_date.map(encode_date),
                profile.max_streak,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_profile(&self, profile: &Profile) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE profiles SET level = ?2, experience = ?3, coins = ?4,
                experience_for_next_level = ?5, last_active = ?6,
                current_streak = ?7, last_claimed_date = ?8, max_streak = ?9
             WHERE id = ?1",
            params![
                profile.id,
                profile.level,
                profile.experience,
                profile.coins,
                profile.experience_for_next_level,
                encode_dt(profile.last_active),
                profile.current_streak,
                profile.last_claimed_date.map(encode_date),
                profile.max_streak,
            ],
        )?;
        if changed == 0 {
            return Err(GamificationError::not_found("profile", profile.id));
        }
        Ok(())
    }

    fn get_reward(&self, id: i64) -> Result<Reward> {
        let row: Option<(i64, String, String, String, String)> = self
            .conn
            .query_row(
                "SELECT id, name, description, kind, value FROM rewards WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                    ))
                },
            )
            .optional()?;
        let (id, name, description, kind, value) =
            row.ok_or_else(|| GamificationError::not_found("reward", id))?;
        Ok(Reward {
            id,
            name,
            description,
            kind: decode_token("rewards", &kind, RewardKind::parse)?,
            value,
        })
    }

    fn insert_reward(&self, reward: &Reward) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO rewards (name, description, kind, value) VALUES (?1, ?2, ?3, ?4)",
            params![
                reward.name,
                reward.description,
                reward.kind.as_str(),
                reward.value
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn active_challenges(&self) -> Result<Vec<Challenge>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, status, period, start_at, end_at, reward_id
             FROM challenges WHERE status = 'ACTIVE' ORDER BY id",
        )?;
        let rows = stmt.query_map([], challenge_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()?
            .into_iter()
            .map(challenge_from_row)
            .collect()
    }

    fn get_challenge(&self, id: i64) -> Result<Challenge> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, description, status, period, start_at, end_at, reward_id
                 FROM challenges WHERE id = ?1",
                params![id],
                challenge_row,
            )
            .optional()?;
        let raw = row.ok_or_else(|| GamificationError::not_found("challenge", id))?;
        challenge_from_row(raw)
    }

    fn insert_challenge(&self, challenge: &Challenge) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO challenges (name, description, status, period, start_at, end_at, reward_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                challenge.name,
                challenge.description,
                challenge.status.as_str(),
                challenge.period.as_str(),
                encode_dt(challenge.start_at),
                encode_dt(challenge.end_at),
                challenge.reward_id,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn set_challenge_status(&self, id: i64, status: ChallengeStatus) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE challenges SET status = ?2 WHERE id = ?1",
            params![id, status.as_str()],
        )?;
        if changed == 0 {
            return Err(GamificationError::not_found("challenge", id));
        }
        Ok(())
    }

    fn rules_for_challenge(&self, challenge_id: i64) -> Result<Vec<ChallengeRule>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, challenge_id, rule_type, target, period, condition
             FROM challenge_rules WHERE challenge_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![challenge_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, u32>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, Option<String>>(5)?,
            ))
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>()?
            .into_iter()
            .map(|(id, challenge_id, rule_type, target, period, condition)| {
                Ok(ChallengeRule {
                    id,
                    challenge_id,
                    rule_type: decode_token("challenge_rules", &rule_type, ChallengeType::parse)?,
                    target,
                    period: decode_token("challenge_rules", &period, ChallengePeriod::parse)?,
                    condition,
                })
            })
            .collect()
    }

    fn insert_rule(&self, rule: &ChallengeRule) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO challenge_rules (challenge_id, rule_type, target, period, condition)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                rule.challenge_id,
                rule.rule_type.as_str(),
                rule.target,
                rule.period.as_str(),
                rule.condition,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_progress(
        &self,
        profile_id: i64,
        challenge_id: i64,
        rule_id: i64,
    ) -> Result<Option<ChallengeProgress>> {
        let row: Option<(u32, bool, String)> = self
            .conn
            .query_row(
                "SELECT progress, completed, last_updated FROM challenge_progress
                 WHERE profile_id = ?1 AND challenge_id = ?2 AND rule_id = ?3",
                params![profile_id, challenge_id, rule_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;
        row.map(|(progress, completed, last_updated)| {
            Ok(ChallengeProgress {
                profile_id,
                challenge_id,
                rule_id,
                progress,
                completed,
                last_updated: decode_dt("challenge_progress", &last_updated)?,
            })
        })
        .transpose()
    }

    fn progress_for_challenge(
        &self,
        profile_id: i64,
        challenge_id: i64,
    ) -> Result<Vec<ChallengeProgress>> {
        let mut stmt = self.conn.prepare(
            "SELECT rule_id, progress, completed, last_updated FROM challenge_progress
             WHERE profile_id = ?1 AND challenge_id = ?2",
        )?;
        let rows = stmt.query_map(params![profile_id, challenge_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, u32>(1)?,
                row.get::<_, bool>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>()?
            .into_iter()
            .map(|(rule_id, progress, completed, last_updated)| {
                Ok(ChallengeProgress {
                    profile_id,
                    challenge_id,
                    rule_id,
                    progress,
                    completed,
                    last_updated: decode_dt("challenge_progress", &last_updated)?,
                })
            })
            .collect()
    }

    fn upsert_progress(&self, progress: &ChallengeProgress) -> Result<()> {
        self.conn.execute(
            "INSERT INTO challenge_progress
                (profile_id, challenge_id, rule_id, progress, completed, last_updated)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT (profile_id, challenge_id, rule_id) DO UPDATE SET
                progress = excluded.progress,
                completed = excluded.completed,
                last_updated = excluded.last_updated",
            params![
                progress.profile_id,
                progress.challenge_id,
                progress.rule_id,
                progress.progress,
                progress.completed,
                encode_dt(progress.last_updated),
            ],
        )?;
        Ok(())
    }

    fn has_badge(&self, profile_id: i64, badge_id: i64) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM earned_badges WHERE profile_id = ?1 AND badge_id = ?2",
            params![profile_id, badge_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn grant_badge(&self, profile_id: i64, badge_id: i64, at: DateTime<Utc>) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO earned_badges (profile_id, badge_id, earned_at)
             VALUES (?1, ?2, ?3)",
            params![profile_id, badge_id, encode_dt(at)],
        )?;
        Ok(())
    }

    fn plants(&self, profile_id: i64) -> Result<Vec<Plant>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, profile_id, kind, growth_stage, growth_points, last_watered
             FROM plants WHERE profile_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![profile_id], plant_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()?
            .into_iter()
            .map(plant_from_row)
            .collect()
    }

    fn get_plant(&self, id: i64) -> Result<Plant> {
        let row = self
            .conn
            .query_row(
                "SELECT id, profile_id, kind, growth_stage, growth_points, last_watered
                 FROM plants WHERE id = ?1",
                params![id],
                plant_row,
            )
            .optional()?;
        let raw = row.ok_or_else(|| GamificationError::not_found("plant", id))?;
        plant_from_row(raw)
    }

    fn insert_plant(&self, plant: &Plant) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO plants (profile_id, kind, growth_stage, growth_points, last_watered)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                plant.profile_id,
                plant.kind.as_str(),
                plant.growth_stage,
                plant.growth_points,
                encode_dt(plant.last_watered),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_plant(&self, plant: &Plant) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE plants SET growth_stage = ?2, growth_points = ?3, last_watered = ?4
             WHERE id = ?1",
            params![
                plant.id,
                plant.growth_stage,
                plant.growth_points,
                encode_dt(plant.last_watered),
            ],
        )?;
        if changed == 0 {
            return Err(GamificationError::not_found("plant", plant.id));
        }
        Ok(())
    }

    fn has_plant_kind(&self, profile_id: i64, kind: PlantKind) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM plants WHERE profile_id = ?1 AND kind = ?2",
            params![profile_id, kind.as_str()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn water_all_plants(&self, profile_id: i64, at: DateTime<Utc>) -> Result<()> {
        self.conn.execute(
            "UPDATE plants SET last_watered = ?2 WHERE profile_id = ?1",
            params![profile_id, encode_dt(at)],
        )?;
        Ok(())
    }

    fn get_surprise_task(&self, id: i64) -> Result<SurpriseTask> {
        let row = self
            .conn
            .query_row(
                "SELECT id, profile_id, description, reward_id, expires_at, completed, shown_on
                 FROM surprise_tasks WHERE id = ?1",
                params![id],
                surprise_row,
            )
            .optional()?;
        let raw = row.ok_or_else(|| GamificationError::not_found("surprise task", id))?;
        surprise_from_row(raw)
    }

    fn insert_surprise_task(&self, task: &SurpriseTask) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO surprise_tasks
                (profile_id, description, reward_id, expires_at, completed, shown_on)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                task.profile_id,
                task.description,
                task.reward_id,
                encode_dt(task.expires_at),
                task.completed,
                task.shown_on.map(encode_date),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_surprise_task(&self, task: &SurpriseTask) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE surprise_tasks SET completed = ?2, shown_on = ?3 WHERE id = ?1",
            params![task.id, task.completed, task.shown_on.map(encode_date)],
        )?;
        if changed == 0 {
            return Err(GamificationError::not_found("surprise task", task.id));
        }
        Ok(())
    }

    fn surprise_task_shown_on(
        &self,
        profile_id: i64,
        date: NaiveDate,
    ) -> Result<Option<SurpriseTask>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, profile_id, description, reward_id, expires_at, completed, shown_on
                 FROM surprise_tasks
                 WHERE profile_id = ?1 AND shown_on = ?2 AND completed = 0",
                params![profile_id, encode_date(date)],
                surprise_row,
            )
            .optional()?;
        row.map(surprise_from_row).transpose()
    }

    fn available_surprise_tasks(
        &self,
        profile_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Vec<SurpriseTask>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, profile_id, description, reward_id, expires_at, completed, shown_on
             FROM surprise_tasks
             WHERE profile_id = ?1 AND completed = 0 AND shown_on IS NULL AND expires_at > ?2
             ORDER BY id",
        )?;
        let rows = stmt.query_map(params![profile_id, encode_dt(now)], surprise_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()?
            .into_iter()
            .map(surprise_from_row)
            .collect()
    }

    fn streak_reward_for(&self, streak_day: u32) -> Result<Option<StreakReward>> {
        let row: Option<i64> = self
            .conn
            .query_row(
                "SELECT reward_id FROM streak_rewards WHERE streak_day = ?1",
                params![streak_day],
                |row| row.get(0),
            )
            .optional()?;
        Ok(row.map(|reward_id| StreakReward {
            streak_day,
            reward_id,
        }))
    }

    fn streak_rewards_in_range(&self, from_day: u32, to_day: u32) -> Result<Vec<StreakReward>> {
        let mut stmt = self.conn.prepare(
            "SELECT streak_day, reward_id FROM streak_rewards
             WHERE streak_day BETWEEN ?1 AND ?2 ORDER BY streak_day",
        )?;
        let rows = stmt.query_map(params![from_day, to_day], |row| {
            Ok(StreakReward {
                streak_day: row.get(0)?,
                reward_id: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn insert_streak_reward(&self, definition: &StreakReward) -> Result<()> {
        self.conn.execute(
            "INSERT INTO streak_rewards (streak_day, reward_id) VALUES (?1, ?2)",
            params![definition.streak_day, definition.reward_id],
        )?;
        Ok(())
    }

    fn insert_history(&self, entry: &HistoryEntry) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO history (profile_id, at, delta_xp, delta_coins, reason, source_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.profile_id,
                encode_dt(entry.at),
                entry.delta_xp,
                entry.delta_coins,
                entry.reason.as_str(),
                entry.source_id,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn history(&self, profile_id: i64, limit: u32) -> Result<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, profile_id, at, delta_xp, delta_coins, reason, source_id
             FROM history WHERE profile_id = ?1 ORDER BY at DESC, id DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![profile_id, limit], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, Option<i64>>(6)?,
            ))
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>()?
            .into_iter()
            .map(|(id, profile_id, at, delta_xp, delta_coins, reason, source_id)| {
                Ok(HistoryEntry {
                    id,
                    profile_id,
                    at: decode_dt("history", &at)?,
                    delta_xp,
                    delta_coins,
                    reason: decode_token("history", &reason, HistoryReason::parse)?,
                    source_id,
                })
            })
            .collect()
    }

    fn task_state(&self, task_id: i64) -> Result<TaskState> {
        let row: Option<(bool, Option<String>, bool)> = self
            .conn
            .query_row(
                "SELECT done, completed_at, was_completed_once FROM task_state WHERE task_id = ?1",
                params![task_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;
        match row {
            Some((done, completed_at, was_completed_once)) => Ok(TaskState {
                task_id,
                done,
                completed_at: completed_at
                    .map(|raw| decode_dt("task_state", &raw))
                    .transpose()?,
                was_completed_once,
            }),
            None => Ok(TaskState::new(task_id)),
        }
    }

    fn set_task_done(&self, task_id: i64, done: bool, at: DateTime<Utc>) -> Result<()> {
        let completed_at = done.then(|| encode_dt(at));
        self.conn.execute(
            "INSERT INTO task_state (task_id, done, completed_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (task_id) DO UPDATE SET
                done = excluded.done,
                completed_at = excluded.completed_at",
            params![task_id, done, completed_at],
        )?;
        Ok(())
    }

    fn mark_completed_once(&self, task_id: i64) -> Result<()> {
        self.conn.execute(
            "INSERT INTO task_state (task_id, done, was_completed_once)
             VALUES (?1, 1, 1)
             ON CONFLICT (task_id) DO UPDATE SET was_completed_once = 1",
            params![task_id],
        )?;
        Ok(())
    }
}

type ChallengeRow = (i64, String, String, String, String, String, String, i64);

fn challenge_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ChallengeRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
    ))
}

fn challenge_from_row(raw: ChallengeRow) -> Result<Challenge> {
    let (id, name, description, status, period, start_at, end_at, reward_id) = raw;
    Ok(Challenge {
        id,
        name,
        description,
        status: decode_token("challenges", &status, ChallengeStatus::parse)?,
        period: decode_token("challenges", &period, ChallengePeriod::parse)?,
        start_at: decode_dt("challenges", &start_at)?,
        end_at: decode_dt("challenges", &end_at)?,
        reward_id,
    })
}

type PlantRow = (i64, i64, String, u8, i64, String);

fn plant_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PlantRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn plant_from_row(raw: PlantRow) -> Result<Plant> {
    let (id, profile_id, kind, growth_stage, growth_points, last_watered) = raw;
    Ok(Plant {
        id,
        profile_id,
        kind: decode_token("plants", &kind, PlantKind::parse)?,
        growth_stage,
        growth_points,
        last_watered: decode_dt("plants", &last_watered)?,
    })
}

type SurpriseRow = (i64, i64, String, i64, String, bool, Option<String>);

fn surprise_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SurpriseRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn surprise_from_row(raw: SurpriseRow) -> Result<SurpriseTask> {
    let (id, profile_id, description, reward_id, expires_at, completed, shown_on) = raw;
    Ok(SurpriseTask {
        id,
        profile_id,
        description,
        reward_id,
        expires_at: decode_dt("surprise_tasks", &expires_at)?,
        completed,
        shown_on: shown_on
            .map(|raw| decode_date("surprise_tasks", &raw))
            .transpose()?,
    })
}
