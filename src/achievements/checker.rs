//! Achievement checking logic
//!
//! One function per category. Each receives the category's catalog entries in
//! evaluation order and returns the first entry the student has not earned
//! whose criterion holds. Checks are pure; granting happens in the evaluator.

use chrono::{DateTime, Duration, Local};

use super::definitions::{Achievement, Criterion, PRECISION_REQUIRED_SUBJECTS};
use super::streaks;
use crate::domain::QuizResult;
use crate::student::Student;

/// Minimum accuracy for any velocity achievement
const VELOCITY_MIN_ACCURACY: f64 = 70.0;

/// Minimum question count for any velocity achievement
const VELOCITY_MIN_QUESTIONS: u32 = 5;

/// Faster averages than this are treated as automated answering
const ANTI_BOT_MIN_SECONDS: f64 = 5.0;

/// Window in which repeated runs of the same quiz cannot earn precision
const PRECISION_COOLDOWN_SECS: i64 = 3600;

fn first_unearned<'a>(
    candidates: &'a [&'static Achievement],
    student: &'a Student,
) -> impl Iterator<Item = &'static Achievement> + 'a {
    candidates
        .iter()
        .copied()
        .filter(|a| !student.has_achievement(a.id.as_str()))
}

/// Check velocity achievements. `candidates` must be sorted by points,
/// highest first, so the best qualifying tier wins.
pub fn check_velocity(
    result: &QuizResult,
    student: &Student,
    candidates: &[&'static Achievement],
) -> Option<&'static Achievement> {
    if result.score_percentage() < VELOCITY_MIN_ACCURACY
        || result.total_questions < VELOCITY_MIN_QUESTIONS
    {
        return None;
    }

    if velocity_already_rewarded(&result.quiz_id, student, candidates) {
        return None;
    }

    let avg_time = result.avg_time_per_question();
    if avg_time < ANTI_BOT_MIN_SECONDS {
        return None;
    }

    let accuracy = result.score_percentage();
    first_unearned(candidates, student).find(|a| match a.criterion {
        Criterion::Velocity {
            max_seconds_per_question,
            min_accuracy,
        } => avg_time <= max_seconds_per_question && accuracy >= min_accuracy,
        _ => false,
    })
}

/// Whether any stored result for `quiz_id` is already fast enough for a
/// velocity achievement the student holds. Rescans the full history.
fn velocity_already_rewarded(
    quiz_id: &str,
    student: &Student,
    candidates: &[&'static Achievement],
) -> bool {
    let earned_limits: Vec<f64> = candidates
        .iter()
        .filter(|a| student.has_achievement(a.id.as_str()))
        .filter_map(|a| match a.criterion {
            Criterion::Velocity {
                max_seconds_per_question,
                ..
            } => Some(max_seconds_per_question),
            _ => None,
        })
        .collect();

    if earned_limits.is_empty() {
        return false;
    }

    student
        .quiz_results
        .iter()
        .filter(|r| r.quiz_id == quiz_id)
        .any(|r| {
            let avg = r.avg_time_per_question();
            earned_limits.iter().any(|max| avg <= *max)
        })
}

/// Check precision achievements. Only perfect results qualify.
pub fn check_precision(
    result: &QuizResult,
    student: &Student,
    candidates: &[&'static Achievement],
    now: DateTime<Local>,
) -> Option<&'static Achievement> {
    if !result.is_perfect() {
        return None;
    }

    let accuracy = result.score_percentage();
    first_unearned(candidates, student).find(|a| match a.criterion {
        Criterion::Precision {
            min_accuracy,
            min_questions,
        } => {
            accuracy >= min_accuracy
                && result.total_questions >= min_questions
                && precision_cooldown_clear(&result.quiz_id, student, now)
        }
        Criterion::PrecisionStreak {
            required_quizzes,
            min_accuracy,
        } => precision_streak_holds(student, required_quizzes, min_accuracy),
        Criterion::PrecisionAllSubjects { min_accuracy } => {
            all_subjects_precise(student, min_accuracy)
        }
        _ => false,
    })
}

/// At most one result for the quiz (the current one) in the last hour
fn precision_cooldown_clear(quiz_id: &str, student: &Student, now: DateTime<Local>) -> bool {
    let window_start = now - Duration::seconds(PRECISION_COOLDOWN_SECS);
    let recent = student
        .quiz_results
        .iter()
        .filter(|r| r.quiz_id == quiz_id && r.date > window_start)
        .count();
    recent <= 1
}

/// The trailing `required` results all meet `min_accuracy`
fn precision_streak_holds(student: &Student, required: usize, min_accuracy: f64) -> bool {
    let results = &student.quiz_results;
    if results.len() < required {
        return false;
    }
    results[results.len() - required..]
        .iter()
        .all(|r| r.score_percentage() >= min_accuracy)
}

fn all_subjects_precise(student: &Student, min_accuracy: f64) -> bool {
    PRECISION_REQUIRED_SUBJECTS.iter().all(|subject| {
        student
            .quiz_results
            .iter()
            .any(|r| r.subject_id == *subject && r.score_percentage() >= min_accuracy)
    })
}

/// Check streak achievements; at most one streak reward per calendar day
pub fn check_consistency(
    student: &Student,
    candidates: &[&'static Achievement],
    now: DateTime<Local>,
) -> Option<&'static Achievement> {
    if !streaks::reward_available(student.last_streak_reward_date, now) {
        return None;
    }

    first_unearned(candidates, student).find(|a| match a.criterion {
        Criterion::Consistency { required_days } => student.current_streak >= required_days,
        _ => false,
    })
}

/// Check subject diversity achievements
pub fn check_explorer(
    student: &Student,
    candidates: &[&'static Achievement],
) -> Option<&'static Achievement> {
    let explored = student.subjects_explored_count();
    first_unearned(candidates, student).find(|a| match a.criterion {
        Criterion::Explorer { required_subjects } => explored >= required_subjects,
        _ => false,
    })
}

/// Check perfect score achievements. Only perfect results qualify.
pub fn check_perfectionist(
    result: &QuizResult,
    student: &Student,
    candidates: &[&'static Achievement],
) -> Option<&'static Achievement> {
    if !result.is_perfect() {
        return None;
    }

    first_unearned(candidates, student).find(|a| match a.criterion {
        Criterion::Perfectionist {
            required_perfect,
            allow_retries,
        } => perfect_count(student, allow_retries) >= required_perfect,
        Criterion::PerfectAbsolute {
            min_accuracy,
            max_seconds_per_question,
        } => {
            result.score_percentage() >= min_accuracy
                && result.avg_time_per_question() <= max_seconds_per_question
        }
        _ => false,
    })
}

/// Perfect results in history; distinct quizzes unless retries count
fn perfect_count(student: &Student, allow_retries: bool) -> usize {
    let perfect = student.quiz_results.iter().filter(|r| r.is_perfect());
    if allow_retries {
        perfect.count()
    } else {
        let mut quiz_ids: Vec<&str> = perfect.map(|r| r.quiz_id.as_str()).collect();
        quiz_ids.sort_unstable();
        quiz_ids.dedup();
        quiz_ids.len()
    }
}
