//! Shared test utilities for progress integration tests

#![allow(dead_code)]

use chrono::{DateTime, Duration, Local, TimeZone};
use tempfile::TempDir;

use quizquest::clock::ManualClock;
use quizquest::progress::ProgressManager;
use quizquest::store::{ProgressDb, Repository};
use quizquest::QuizResult;

/// Noon on the given day of March 2025
pub fn day(d: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(2025, 3, d, 12, 0, 0).unwrap()
}

/// Progress database in a temp dir, kept alive by the returned guard
pub fn open_repo() -> (TempDir, Repository<ProgressDb>) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db = ProgressDb::open(&temp_dir.path().join("progress.db"))
        .expect("Failed to open progress db");
    (temp_dir, Repository::new(db))
}

pub type TestManager<'a> = ProgressManager<ProgressDb, &'a ManualClock>;

/// Manager with a registered learner
pub fn registered_manager(clock: &ManualClock) -> (TempDir, TestManager<'_>) {
    let (dir, repo) = open_repo();
    let manager = ProgressManager::new(repo, clock);
    manager
        .register("Ana", "ana@example.com")
        .expect("Failed to register learner");
    (dir, manager)
}

/// Result dated at the clock's current time
pub fn result_now(
    clock: &ManualClock,
    quiz_id: &str,
    subject_id: &str,
    score: u32,
    total: u32,
    seconds: f64,
) -> QuizResult {
    use quizquest::clock::Clock;
    QuizResult::new(
        quiz_id,
        subject_id,
        score,
        total,
        total - score,
        seconds,
        clock.now(),
    )
}

/// Move the clock forward a few minutes so results keep distinct timestamps
pub fn tick(clock: &ManualClock) {
    clock.advance(Duration::minutes(3));
}
