//! Achievement evaluator
//!
//! Runs the category checks against a freshly recorded result and grants
//! qualifying achievements through [`Student::add_achievement`], which enforces
//! the daily point cap.

use chrono::{DateTime, Local};

use super::checker::{
    check_consistency, check_explorer, check_perfectionist, check_precision, check_velocity,
};
use super::definitions::{Achievement, AchievementIndex, AchievementKind};
use super::streaks::same_day;
use crate::domain::QuizResult;
use crate::student::{DAILY_ACHIEVEMENT_POINT_CAP, Student};

/// More completed quizzes than this in one day stop all achievement grants
pub const DAILY_QUIZ_LIMIT: u32 = 20;

/// An achievement that was just granted
#[derive(Debug, Clone)]
pub struct UnlockedAchievement {
    pub achievement: &'static Achievement,
    pub earned_at: DateTime<Local>,
}

/// Earned vs total achievements
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AchievementProgress {
    pub earned: usize,
    pub total: usize,
}

impl AchievementProgress {
    /// Percentage earned (0.0 - 100.0)
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        self.earned as f32 / self.total as f32 * 100.0
    }
}

/// Stateless achievement evaluation over an injected catalog index
#[derive(Clone, Copy)]
pub struct AchievementEvaluator {
    index: &'static AchievementIndex,
}

impl Default for AchievementEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl AchievementEvaluator {
    /// Evaluator over the built-in catalog
    pub fn new() -> Self {
        Self {
            index: Achievement::index(),
        }
    }

    /// Evaluate every category for `result`, which must already be recorded
    /// on `student`. Grants at most one achievement per category and returns
    /// only those actually granted.
    pub fn evaluate(
        &self,
        result: &QuizResult,
        student: &mut Student,
        now: DateTime<Local>,
    ) -> Vec<UnlockedAchievement> {
        let mut unlocked = Vec::new();

        if !self.can_earn_more(student, now) {
            tracing::debug!(
                quiz_id = %result.quiz_id,
                daily_quiz_count = student.daily_quiz_count,
                "Achievement evaluation skipped by daily limits"
            );
            return unlocked;
        }

        for kind in AchievementKind::ALL {
            let candidates = self.index.of_kind(kind);
            let found = match kind {
                AchievementKind::Velocity => check_velocity(result, student, candidates),
                AchievementKind::Precision => check_precision(result, student, candidates, now),
                AchievementKind::Consistency => check_consistency(student, candidates, now),
                AchievementKind::Explorer => check_explorer(student, candidates),
                AchievementKind::Perfectionist => check_perfectionist(result, student, candidates),
            };

            let Some(achievement) = found else {
                continue;
            };

            if student.add_achievement(achievement, now) {
                tracing::info!(
                    achievement = achievement.id.as_str(),
                    points = achievement.points,
                    "Achievement unlocked"
                );
                unlocked.push(UnlockedAchievement {
                    achievement,
                    earned_at: now,
                });
            }
        }

        unlocked
    }

    /// Global gate checked once before any category
    pub fn can_earn_more(&self, student: &Student, now: DateTime<Local>) -> bool {
        let capped_today = student
            .last_achievement_date
            .is_some_and(|last| same_day(last, now))
            && student.achievement_points_today >= DAILY_ACHIEVEMENT_POINT_CAP;

        !capped_today && student.daily_quiz_count <= DAILY_QUIZ_LIMIT
    }

    pub fn achievement_progress(&self, student: &Student) -> AchievementProgress {
        AchievementProgress {
            earned: student.earned_achievements().len(),
            total: Achievement::total_count(),
        }
    }

    /// Most recently earned achievements, newest first
    pub fn recent_achievements(&self, student: &Student, limit: usize) -> Vec<UnlockedAchievement> {
        let mut recent: Vec<UnlockedAchievement> = student
            .earned_achievements()
            .into_iter()
            .filter_map(|state| {
                Some(UnlockedAchievement {
                    achievement: state.definition()?,
                    earned_at: state.earned_at?,
                })
            })
            .collect();
        recent.sort_by(|a, b| b.earned_at.cmp(&a.earned_at));
        recent.truncate(limit);
        recent
    }
}
