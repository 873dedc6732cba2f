//! Persistent learner aggregate
//!
//! [`Student`] holds identity, points and level, per-achievement state,
//! streak and daily anti-exploit counters, and the full result history. It is
//! loaded whole, mutated through [`Student::add_quiz_result`] and
//! [`Student::add_achievement`], and stored whole.

use std::collections::BTreeSet;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::achievements::levels::{LevelProgress, QuizRewards, level_for_points};
use crate::achievements::streaks::{self, StreakStep};
use crate::achievements::{ACHIEVEMENTS, Achievement, AchievementKind};
use crate::catalog::QuizCatalog;
use crate::domain::QuizResult;

/// Maximum achievement points that can be earned per calendar day
pub const DAILY_ACHIEVEMENT_POINT_CAP: u32 = 50;

/// Number of results reported by [`Student::recent_results`]
const RECENT_RESULTS: usize = 5;

/// Per-student status of one achievement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementStatus {
    Locked,
    Unlocked,
    Earned,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementState {
    pub id: String,
    pub status: AchievementStatus,
    pub earned_at: Option<DateTime<Local>>,
}

impl AchievementState {
    fn unlocked(id: &str) -> Self {
        Self {
            id: id.to_string(),
            status: AchievementStatus::Unlocked,
            earned_at: None,
        }
    }

    pub fn is_earned(&self) -> bool {
        self.status == AchievementStatus::Earned
    }

    /// Catalog entry for this state, if the id is still known
    pub fn definition(&self) -> Option<&'static Achievement> {
        Achievement::get(&self.id)
    }
}

/// Completion of one subject
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectProgress {
    pub subject_id: String,
    pub completed: usize,
    pub total: usize,
}

impl SubjectProgress {
    /// Completion percentage (0.0 - 100.0)
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        (self.completed as f32 / self.total as f32 * 100.0).min(100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: String,
    pub registration_date: DateTime<Local>,

    pub total_points: u32,
    pub level: u32,
    /// Kept for record compatibility; levels derive from `total_points`
    pub experience_points: u32,

    pub achievements: Vec<AchievementState>,
    pub last_achievement_date: Option<DateTime<Local>>,
    pub achievement_points_today: u32,

    pub current_streak: u32,
    pub best_streak: u32,
    pub last_activity_date: Option<DateTime<Local>>,
    pub last_streak_reward_date: Option<DateTime<Local>>,

    /// Seconds
    pub total_study_time: f64,
    pub completed_quizzes: Vec<String>,
    pub quiz_results: Vec<QuizResult>,
    pub subjects_explored: BTreeSet<String>,

    pub daily_quiz_count: u32,
    pub last_quiz_date: Option<DateTime<Local>>,
}

impl Student {
    /// New learner with every catalog achievement unlocked
    pub fn new(name: impl Into<String>, email: impl Into<String>, now: DateTime<Local>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            email: email.into(),
            registration_date: now,
            total_points: 0,
            level: 1,
            experience_points: 0,
            achievements: ACHIEVEMENTS
                .iter()
                .map(|a| AchievementState::unlocked(a.id.as_str()))
                .collect(),
            last_achievement_date: None,
            achievement_points_today: 0,
            current_streak: 0,
            best_streak: 0,
            last_activity_date: None,
            last_streak_reward_date: None,
            total_study_time: 0.0,
            completed_quizzes: Vec::new(),
            quiz_results: Vec::new(),
            subjects_explored: BTreeSet::new(),
            daily_quiz_count: 0,
            last_quiz_date: None,
        }
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Record a finished attempt. Call exactly once per result.
    pub fn add_quiz_result(&mut self, result: QuizResult, now: DateTime<Local>) {
        self.total_points += QuizRewards::for_result(&result);

        if !self.completed_quizzes.contains(&result.quiz_id) {
            self.completed_quizzes.push(result.quiz_id.clone());
        }
        self.subjects_explored.insert(result.subject_id.clone());
        self.total_study_time += result.completion_time;
        self.quiz_results.push(result);

        self.update_streak(now);
        self.update_daily_counters(now);
        self.update_level();
    }

    /// Grant an achievement subject to the daily point cap.
    ///
    /// Returns true only when the achievement became earned by this call.
    pub fn add_achievement(&mut self, achievement: &Achievement, now: DateTime<Local>) -> bool {
        let id = achievement.id.as_str();
        let Some(index) = self.achievements.iter().position(|s| s.id == id) else {
            return false;
        };
        if self.achievements[index].is_earned() {
            return false;
        }

        let same_day = self
            .last_achievement_date
            .is_some_and(|last| streaks::same_day(last, now));
        if !same_day {
            self.achievement_points_today = 0;
        }

        if self.achievement_points_today + achievement.points > DAILY_ACHIEVEMENT_POINT_CAP {
            tracing::debug!(
                achievement = id,
                points_today = self.achievement_points_today,
                "Daily achievement cap reached"
            );
            return false;
        }

        let state = &mut self.achievements[index];
        state.status = AchievementStatus::Earned;
        state.earned_at = Some(now);

        self.total_points += achievement.points;
        self.achievement_points_today += achievement.points;
        self.last_achievement_date = Some(now);

        if achievement.kind == AchievementKind::Consistency {
            self.last_streak_reward_date = Some(now);
        }

        self.update_level();
        true
    }

    fn update_streak(&mut self, now: DateTime<Local>) {
        match streaks::classify(self.last_activity_date, now) {
            StreakStep::First => {
                self.current_streak = 1;
                self.best_streak = self.best_streak.max(1);
            }
            StreakStep::NextDay => {
                self.current_streak += 1;
                self.best_streak = self.best_streak.max(self.current_streak);
            }
            StreakStep::Broken => self.current_streak = 1,
            StreakStep::SameDay => {}
        }
        self.last_activity_date = Some(now);
    }

    fn update_daily_counters(&mut self, now: DateTime<Local>) {
        let same_day = self
            .last_quiz_date
            .is_some_and(|last| streaks::same_day(last, now));
        if same_day {
            self.daily_quiz_count += 1;
        } else {
            self.daily_quiz_count = 1;
        }
        self.last_quiz_date = Some(now);
    }

    /// Raise the level to match total points; never lowers it
    pub fn update_level(&mut self) {
        self.level = self.level.max(level_for_points(self.total_points));
    }

    /// Add states for catalog achievements missing from this record.
    ///
    /// Returns the number of states added.
    pub fn sync_with_catalog(&mut self) -> usize {
        let mut added = 0;
        for achievement in ACHIEVEMENTS {
            let id = achievement.id.as_str();
            if !self.achievements.iter().any(|s| s.id == id) {
                self.achievements.push(AchievementState::unlocked(id));
                added += 1;
            }
        }
        added
    }

    // ========================================================================
    // Reset utilities
    // ========================================================================

    /// Return every earned achievement to unlocked
    pub fn reset_achievements(&mut self) {
        for state in &mut self.achievements {
            if state.is_earned() {
                state.status = AchievementStatus::Unlocked;
                state.earned_at = None;
            }
        }
    }

    /// Wipe progression and history, keeping identity
    pub fn reset_progress(&mut self) {
        let fresh = Student::new(
            self.name.clone(),
            self.email.clone(),
            self.registration_date,
        );
        *self = Student {
            id: std::mem::take(&mut self.id),
            ..fresh
        };
    }

    /// Overwrite the current streak, treating `now` as the last activity
    pub fn set_streak(&mut self, days: u32, now: DateTime<Local>) {
        self.current_streak = days;
        self.best_streak = self.best_streak.max(days);
        self.last_activity_date = Some(now);
    }

    // ========================================================================
    // Projections
    // ========================================================================

    /// Mean score percentage over all results (0.0 without history)
    pub fn average_score(&self) -> f64 {
        if self.quiz_results.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.quiz_results.iter().map(|r| r.score_percentage()).sum();
        sum / self.quiz_results.len() as f64
    }

    /// Distinct quizzes completed
    pub fn total_quizzes_completed(&self) -> usize {
        self.completed_quizzes.len()
    }

    pub fn subjects_explored_count(&self) -> usize {
        self.subjects_explored.len()
    }

    /// Last five results, oldest first
    pub fn recent_results(&self) -> &[QuizResult] {
        let start = self.quiz_results.len().saturating_sub(RECENT_RESULTS);
        &self.quiz_results[start..]
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|s| s.id == id && s.is_earned())
    }

    pub fn earned_achievements(&self) -> Vec<&AchievementState> {
        self.achievements.iter().filter(|s| s.is_earned()).collect()
    }

    /// States whose catalog entry has the given kind
    pub fn achievements_by_kind(&self, kind: AchievementKind) -> Vec<&AchievementState> {
        self.achievements
            .iter()
            .filter(|s| s.definition().is_some_and(|a| a.kind == kind))
            .collect()
    }

    /// Distinct quizzes completed per catalog subject
    pub fn progress_by_subject(&self, catalog: &QuizCatalog) -> Vec<SubjectProgress> {
        catalog
            .subjects()
            .iter()
            .map(|subject| {
                let completed = subject
                    .quizzes
                    .iter()
                    .filter(|q| self.completed_quizzes.contains(&q.id))
                    .count();
                SubjectProgress {
                    subject_id: subject.id.clone(),
                    completed,
                    total: subject.quizzes.len(),
                }
            })
            .collect()
    }

    /// Results per day over the last week; index 0 is six days ago, 6 is today
    pub fn weekly_activity(&self, now: DateTime<Local>) -> [u32; 7] {
        let days = streaks::last_seven_days(now);
        let mut activity = [0; 7];
        for result in &self.quiz_results {
            let day = result.date.date_naive();
            if let Some(slot) = days.iter().position(|d| *d == day) {
                activity[slot] += 1;
            }
        }
        activity
    }

    pub fn level_progress(&self) -> LevelProgress {
        LevelProgress::new(self.level, self.total_points)
    }
}
