//! Streak tracking helpers
//!
//! Streaks count consecutive local calendar days with at least one completed
//! quiz. All comparisons use the local date, never elapsed hours.

use chrono::{DateTime, Local, NaiveDate};

/// How a new activity relates to the previous one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakStep {
    /// No previous activity recorded
    First,
    /// Same calendar day as the previous activity
    SameDay,
    /// The day right after the previous activity
    NextDay,
    /// One or more days were skipped
    Broken,
}

/// Whole calendar days from `earlier` to `later` (negative if reversed)
pub fn days_between(earlier: DateTime<Local>, later: DateTime<Local>) -> i64 {
    (later.date_naive() - earlier.date_naive()).num_days()
}

pub fn same_day(a: DateTime<Local>, b: DateTime<Local>) -> bool {
    a.date_naive() == b.date_naive()
}

/// Classify an activity at `now` against the last recorded one
pub fn classify(last_activity: Option<DateTime<Local>>, now: DateTime<Local>) -> StreakStep {
    let Some(last) = last_activity else {
        return StreakStep::First;
    };

    match days_between(last, now) {
        1 => StreakStep::NextDay,
        d if d > 1 => StreakStep::Broken,
        _ => StreakStep::SameDay,
    }
}

/// Whether a streak reward may still be granted today
pub fn reward_available(last_reward: Option<DateTime<Local>>, now: DateTime<Local>) -> bool {
    match last_reward {
        None => true,
        Some(last) => last.date_naive() < now.date_naive(),
    }
}

/// The seven local dates ending at `now`, oldest first
pub fn last_seven_days(now: DateTime<Local>) -> [NaiveDate; 7] {
    let today = now.date_naive();
    std::array::from_fn(|i| today - chrono::Days::new((6 - i) as u64))
}
