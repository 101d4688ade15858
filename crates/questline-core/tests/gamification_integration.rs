//! End-to-end scenarios across claim, task completion, challenges and
//! the garden, all against a real (in-memory and on-disk) SQLite store.

use chrono::{Duration, TimeZone, Utc};
use tempfile::tempdir;

use questline_core::engine::{
    claim_daily_reward, complete_focus_session, process_event, set_task_status, water_plants,
};
use questline_core::{
    Challenge, ChallengePeriod, ChallengeRule, ChallengeStatus, ChallengeType, EngineConfig,
    FixedClock, GamificationDb, GamificationError, HistoryReason, Plant, PlantKind, Profile,
    Reward, RewardKind, StreakReward, UnitOfWork,
};

fn clock_at(day: u32, hour: u32) -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2024, 6, day, hour, 0, 0).unwrap())
}

fn new_db() -> (GamificationDb, i64) {
    let mut db = GamificationDb::open_memory().unwrap();
    let profile_id = db
        .run_in_transaction(|store| store.insert_profile(&Profile::new(1, clock_at(1, 0).0)))
        .unwrap();
    (db, profile_id)
}

fn seed_streak_rewards(db: &mut GamificationDb, days: std::ops::RangeInclusive<u32>) {
    db.run_in_transaction(|store| {
        for day in days {
            let reward_id = store.insert_reward(&Reward::transient(
                &format!("streak day {day}"),
                RewardKind::Coins,
                "LEVEL*10",
            ))?;
            store.insert_streak_reward(&StreakReward {
                streak_day: day,
                reward_id,
            })?;
        }
        Ok(())
    })
    .unwrap();
}

#[test]
fn database_persists_across_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("questline.db");

    let profile_id = {
        let mut db = GamificationDb::open(&path).unwrap();
        db.run_in_transaction(|store| store.insert_profile(&Profile::new(1, clock_at(1, 0).0)))
            .unwrap()
    };

    let db = GamificationDb::open(&path).unwrap();
    let profile = db.read(|store| store.get_profile(profile_id)).unwrap();
    assert_eq!(profile.user_id, 1);
    assert_eq!(profile.level, 1);
}

#[test]
fn three_day_claim_run_builds_a_streak() {
    let (mut db, profile_id) = new_db();
    seed_streak_rewards(&mut db, 1..=7);
    let config = EngineConfig::default();

    for day in 1..=3 {
        let summary = claim_daily_reward(&mut db, profile_id, &config, &clock_at(day, 9)).unwrap();
        assert_eq!(summary.new_streak, day);
    }

    let profile = db.read(|store| store.get_profile(profile_id)).unwrap();
    assert_eq!(profile.current_streak, 3);
    assert_eq!(profile.max_streak, 3);
    // LEVEL*10 at level 1, three times.
    assert_eq!(profile.coins, 30);
}

#[test]
fn double_claim_is_rejected_without_side_effects() {
    let (mut db, profile_id) = new_db();
    seed_streak_rewards(&mut db, 1..=2);
    let config = EngineConfig::default();
    let clock = clock_at(1, 9);

    claim_daily_reward(&mut db, profile_id, &config, &clock).unwrap();
    let before = db.read(|store| store.get_profile(profile_id)).unwrap();

    let err = claim_daily_reward(&mut db, profile_id, &config, &clock).unwrap_err();
    assert!(matches!(err, GamificationError::InvalidState(_)));

    let after = db.read(|store| store.get_profile(profile_id)).unwrap();
    assert_eq!(after, before);
    assert_eq!(db.read(|store| store.history(profile_id, 10)).unwrap().len(), 1);
}

#[test]
fn streak_claim_advances_streak_challenges() {
    let (mut db, profile_id) = new_db();
    seed_streak_rewards(&mut db, 1..=7);
    let config = EngineConfig::default();

    db.run_in_transaction(|store| {
        let reward_id =
            store.insert_reward(&Reward::transient("tenacity", RewardKind::Experience, "60"))?;
        let challenge_id = store.insert_challenge(&Challenge {
            id: 0,
            name: "three day streak".into(),
            description: String::new(),
            status: ChallengeStatus::Active,
            period: ChallengePeriod::Once,
            start_at: clock_at(1, 0).0,
            end_at: clock_at(30, 0).0,
            reward_id,
        })?;
        store.insert_rule(&ChallengeRule {
            id: 0,
            challenge_id,
            rule_type: ChallengeType::DailyStreak,
            target: 1,
            period: ChallengePeriod::Once,
            condition: Some(r#"{"minStreak":3}"#.to_string()),
        })?;
        Ok(())
    })
    .unwrap();

    for day in 1..=2 {
        claim_daily_reward(&mut db, profile_id, &config, &clock_at(day, 9)).unwrap();
    }
    let profile = db.read(|store| store.get_profile(profile_id)).unwrap();
    assert_eq!(profile.experience, 0);

    // Day 3 reaches minStreak 3 and the rule finally matches.
    claim_daily_reward(&mut db, profile_id, &config, &clock_at(3, 9)).unwrap();
    let profile = db.read(|store| store.get_profile(profile_id)).unwrap();
    assert_eq!(profile.experience, 60);
}

#[test]
fn task_completion_fans_out_to_challenges_and_garden() {
    let (mut db, profile_id) = new_db();
    let config = EngineConfig::default();
    let clock = clock_at(10, 14);

    let plant_id = db
        .run_in_transaction(|store| {
            let plant_id =
                store.insert_plant(&Plant::sprout(profile_id, PlantKind::Sunflower, clock.0))?;
            let reward_id =
                store.insert_reward(&Reward::transient("finisher", RewardKind::Coins, "50"))?;
            let challenge_id = store.insert_challenge(&Challenge {
                id: 0,
                name: "finish one task".into(),
                description: String::new(),
                status: ChallengeStatus::Active,
                period: ChallengePeriod::Daily,
                start_at: clock.0 - Duration::days(1),
                end_at: clock.0 + Duration::days(1),
                reward_id,
            })?;
            store.insert_rule(&ChallengeRule {
                id: 0,
                challenge_id,
                rule_type: ChallengeType::TaskCompletion,
                target: 1,
                period: ChallengePeriod::Daily,
                condition: None,
            })?;
            Ok(plant_id)
        })
        .unwrap();

    let summary = set_task_status(
        &mut db,
        profile_id,
        42,
        true,
        &["work".to_string()],
        Some(plant_id),
        &config,
        &clock,
    )
    .unwrap();
    assert!(summary.first_completion);
    // Base 10 XP / 2 coins plus the 50 coin challenge reward.
    assert_eq!(summary.outcome.delta_xp, 10);
    assert_eq!(summary.outcome.delta_coins, 52);

    let profile = db.read(|store| store.get_profile(profile_id)).unwrap();
    assert_eq!(profile.experience, 10);
    assert_eq!(profile.coins, 52);

    let plant = db.read(|store| store.get_plant(plant_id)).unwrap();
    assert_eq!(plant.growth_points, config.growth_points_per_completion);

    // Base reward and challenge completion each get their own ledger
    // entry, newest first.
    let entries = db.read(|store| store.history(profile_id, 10)).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].reason, HistoryReason::TaskCompleted);
    assert_eq!(entries[0].source_id, Some(42));
    assert_eq!(entries[0].delta_xp, 10);
    assert_eq!(entries[0].delta_coins, 2);
    assert_eq!(entries[1].reason, HistoryReason::ChallengeCompleted);
    assert_eq!(entries[1].delta_coins, 50);
}

#[test]
fn done_undone_done_rewards_exactly_once() {
    let (mut db, profile_id) = new_db();
    let config = EngineConfig::default();
    let clock = clock_at(10, 14);

    set_task_status(&mut db, profile_id, 7, true, &[], None, &config, &clock).unwrap();
    set_task_status(&mut db, profile_id, 7, false, &[], None, &config, &clock).unwrap();
    set_task_status(&mut db, profile_id, 7, true, &[], None, &config, &clock).unwrap();

    let profile = db.read(|store| store.get_profile(profile_id)).unwrap();
    assert_eq!(profile.experience, 10);
    assert_eq!(profile.coins, 2);
    assert_eq!(db.read(|store| store.history(profile_id, 10)).unwrap().len(), 1);
}

#[test]
fn level_up_happens_inside_the_same_transaction() {
    let (mut db, profile_id) = new_db();
    seed_streak_rewards(&mut db, 1..=1);
    let config = EngineConfig::default();

    // 100 XP is exactly the level 1 -> 2 requirement.
    db.run_in_transaction(|store| {
        let reward_id =
            store.insert_reward(&Reward::transient("big xp", RewardKind::Experience, "100"))?;
        let challenge_id = store.insert_challenge(&Challenge {
            id: 0,
            name: "level up".into(),
            description: String::new(),
            status: ChallengeStatus::Active,
            period: ChallengePeriod::Daily,
            start_at: clock_at(9, 0).0,
            end_at: clock_at(11, 0).0,
            reward_id,
        })?;
        store.insert_rule(&ChallengeRule {
            id: 0,
            challenge_id,
            rule_type: ChallengeType::FocusSession,
            target: 1,
            period: ChallengePeriod::Daily,
            condition: None,
        })?;
        Ok(())
    })
    .unwrap();

    complete_focus_session(
        &mut db,
        profile_id,
        1,
        1500,
        None,
        None,
        &config,
        &clock_at(10, 10),
    )
    .unwrap();

    let profile = db.read(|store| store.get_profile(profile_id)).unwrap();
    // 10 base + 100 challenge XP crosses the 100 XP threshold, leaving
    // 10 XP into level 2.
    assert_eq!(profile.level, 2);
    assert_eq!(profile.experience, 10);
    assert_eq!(profile.experience_for_next_level, 400);
}

#[test]
fn weekly_rule_progress_survives_a_day_boundary() {
    let (mut db, profile_id) = new_db();

    db.run_in_transaction(|store| {
        let reward_id =
            store.insert_reward(&Reward::transient("weekly", RewardKind::Coins, "20"))?;
        let challenge_id = store.insert_challenge(&Challenge {
            id: 0,
            name: "weekly grind".into(),
            description: String::new(),
            status: ChallengeStatus::Active,
            period: ChallengePeriod::Weekly,
            start_at: clock_at(10, 0).0,
            end_at: clock_at(17, 0).0,
            reward_id,
        })?;
        store.insert_rule(&ChallengeRule {
            id: 0,
            challenge_id,
            rule_type: ChallengeType::TaskCompletion,
            target: 2,
            period: ChallengePeriod::Weekly,
            condition: None,
        })?;
        Ok(())
    })
    .unwrap();

    let event = |task_id| questline_core::GamificationEvent::TaskCompleted {
        task_id,
        tags: vec![],
    };

    // 2024-06-10 and 2024-06-11 are both ISO week 24.
    let first = db
        .run_in_transaction(|store| process_event(store, profile_id, &event(1), clock_at(10, 9).0))
        .unwrap();
    assert!(first.is_zero());
    let second = db
        .run_in_transaction(|store| process_event(store, profile_id, &event(2), clock_at(11, 9).0))
        .unwrap();
    assert_eq!(second.delta_coins, 20);
}

#[test]
fn watering_gates_per_day_and_feeds_the_selected_plant() {
    let (mut db, profile_id) = new_db();
    let config = EngineConfig::default();

    let (first, second) = db
        .run_in_transaction(|store| {
            let a = store.insert_plant(&Plant::sprout(profile_id, PlantKind::Fern, clock_at(9, 0).0))?;
            let b = store.insert_plant(&Plant::sprout(profile_id, PlantKind::Rose, clock_at(9, 0).0))?;
            Ok((a, b))
        })
        .unwrap();

    water_plants(&mut db, profile_id, Some(first), &config, &clock_at(10, 8)).unwrap();
    let err = water_plants(&mut db, profile_id, Some(first), &config, &clock_at(10, 20)).unwrap_err();
    assert!(matches!(err, GamificationError::InvalidState(_)));

    // Next day is fine again, bonus to the other plant this time.
    water_plants(&mut db, profile_id, Some(second), &config, &clock_at(11, 8)).unwrap();

    let plant_a = db.read(|store| store.get_plant(first)).unwrap();
    let plant_b = db.read(|store| store.get_plant(second)).unwrap();
    assert_eq!(plant_a.growth_points, config.watering_bonus_points);
    assert_eq!(plant_b.growth_points, config.watering_bonus_points);
    assert_eq!(plant_a.last_watered, clock_at(11, 8).0);
}
