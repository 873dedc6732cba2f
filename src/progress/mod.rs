//! Progress orchestration
//!
//! [`ProgressManager`] loads the stored learner, applies a change and writes
//! the whole record back. Every operation is a no-op when no learner has been
//! registered; only storage failures surface as errors.

mod stats;

pub use stats::{DashboardStats, ProfileStats, format_study_time};

use std::collections::BTreeMap;

use anyhow::{Result, bail};
use chrono::Duration;

use crate::achievements::levels::{QuizRewards, title_for_level};
use crate::achievements::{AchievementEvaluator, AchievementKind, UnlockedAchievement};
use crate::catalog::QuizCatalog;
use crate::clock::Clock;
use crate::config::AppSettings;
use crate::domain::QuizResult;
use crate::store::{Repository, Storage};
use crate::student::{AchievementState, Student};

/// Number of achievements listed on the dashboard
const DASHBOARD_RECENT_ACHIEVEMENTS: usize = 3;

/// A level up event
#[derive(Debug, Clone, PartialEq)]
pub struct LevelUp {
    pub old_level: u32,
    pub new_level: u32,
    pub new_title: &'static str,
}

/// Outcome of recording one finished quiz
#[derive(Debug, Clone)]
pub struct QuizCompletion {
    /// Base points from the result itself
    pub base_points: u32,
    pub unlocked: Vec<UnlockedAchievement>,
    pub total_points: u32,
    pub level_up: Option<LevelUp>,
}

/// Points before and after a rebuild
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recalculation {
    pub points_before: u32,
    pub points_after: u32,
    pub achievements_earned: usize,
}

pub struct ProgressManager<S: Storage, C: Clock> {
    repo: Repository<S>,
    clock: C,
    evaluator: AchievementEvaluator,
}

impl<S: Storage, C: Clock> ProgressManager<S, C> {
    pub fn new(repo: Repository<S>, clock: C) -> Self {
        Self::with_evaluator(repo, clock, AchievementEvaluator::new())
    }

    pub fn with_evaluator(repo: Repository<S>, clock: C, evaluator: AchievementEvaluator) -> Self {
        Self {
            repo,
            clock,
            evaluator,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    // ========================================================================
    // Learner lifecycle
    // ========================================================================

    /// Create and store a new learner, replacing any existing one
    pub fn register(&self, name: &str, email: &str) -> Result<Student> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            bail!("Name must not be empty");
        }
        if !email.contains('@') {
            bail!("Invalid email address: {email}");
        }

        let student = Student::new(name, email, self.clock.now());
        self.repo.save_student(&student)?;
        tracing::info!(student_id = %student.id, "Registered learner");
        Ok(student)
    }

    /// Stored learner, with achievement states brought up to date with the
    /// catalog
    pub fn current_student(&self) -> Result<Option<Student>> {
        let Some(mut student) = self.repo.load_student()? else {
            return Ok(None);
        };
        let added = student.sync_with_catalog();
        if added > 0 {
            tracing::debug!(added, "Added new catalog achievements to learner");
        }
        Ok(Some(student))
    }

    pub fn is_first_time(&self) -> Result<bool> {
        Ok(self.repo.load_settings()?.is_first_time)
    }

    // ========================================================================
    // Quiz completion
    // ========================================================================

    /// Record a finished quiz and grant any achievements it earns
    pub fn process_quiz_completion(&self, result: &QuizResult) -> Result<Option<QuizCompletion>> {
        let Some(mut student) = self.current_student()? else {
            tracing::warn!(quiz_id = %result.quiz_id, "No learner registered, result dropped");
            return Ok(None);
        };

        let old_level = student.level;
        let base_points = QuizRewards::for_result(result);

        student.add_quiz_result(result.clone(), self.clock.now());
        let unlocked = self.evaluator.evaluate(result, &mut student, self.clock.now());

        self.repo.save_student(&student)?;

        tracing::info!(
            quiz_id = %result.quiz_id,
            score = %result.score_display(),
            base_points,
            achievements = unlocked.len(),
            total_points = student.total_points,
            level = student.level,
            "Quiz completed"
        );

        let level_up = (student.level > old_level).then(|| LevelUp {
            old_level,
            new_level: student.level,
            new_title: title_for_level(student.level),
        });

        Ok(Some(QuizCompletion {
            base_points,
            unlocked,
            total_points: student.total_points,
            level_up,
        }))
    }

    /// Rebuild points and achievements from the stored result history
    pub fn recalculate_achievements(&self) -> Result<Option<Recalculation>> {
        let Some(mut student) = self.current_student()? else {
            return Ok(None);
        };

        let points_before = student.total_points;
        let now = self.clock.now();

        student.reset_achievements();
        student.achievement_points_today = 0;
        student.last_achievement_date = None;
        student.last_streak_reward_date = None;
        student.total_points = student.quiz_results.iter().map(QuizRewards::for_result).sum();
        student.level = 1;
        student.update_level();

        let history = student.quiz_results.clone();
        for result in &history {
            self.evaluator.evaluate(result, &mut student, now);
        }

        self.repo.save_student(&student)?;

        let recalculation = Recalculation {
            points_before,
            points_after: student.total_points,
            achievements_earned: student.earned_achievements().len(),
        };
        tracing::info!(
            points_before,
            points_after = recalculation.points_after,
            "Achievements recalculated"
        );
        Ok(Some(recalculation))
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    pub fn dashboard_stats(&self) -> Result<Option<DashboardStats>> {
        let Some(student) = self.current_student()? else {
            return Ok(None);
        };

        let progress = self.evaluator.achievement_progress(&student);
        let level = student.level_progress();

        Ok(Some(DashboardStats {
            total_points: student.total_points,
            level: student.level,
            level_title: level.title(),
            progress_to_next_level: level.progress_to_next(),
            experience_needed: level.points_needed(),
            current_streak: student.current_streak,
            best_streak: student.best_streak,
            average_score: student.average_score(),
            total_quizzes: student.total_quizzes_completed(),
            subjects_explored: student.subjects_explored_count(),
            achievements_earned: progress.earned,
            achievements_total: progress.total,
            achievement_percentage: progress.percentage(),
            recent_achievements: self
                .evaluator
                .recent_achievements(&student, DASHBOARD_RECENT_ACHIEVEMENTS),
            weekly_activity: student.weekly_activity(self.clock.now()),
            total_study_time: student.total_study_time,
        }))
    }

    pub fn profile_stats(&self, catalog: &QuizCatalog) -> Result<Option<ProfileStats>> {
        let Some(student) = self.current_student()? else {
            return Ok(None);
        };

        let mut achievements_by_kind: BTreeMap<AchievementKind, Vec<AchievementState>> =
            BTreeMap::new();
        for state in student.earned_achievements() {
            if let Some(definition) = state.definition() {
                achievements_by_kind
                    .entry(definition.kind)
                    .or_default()
                    .push(state.clone());
            }
        }

        Ok(Some(ProfileStats {
            student_name: student.name.clone(),
            student_email: student.email.clone(),
            registration_date: student.registration_date,
            total_points: student.total_points,
            level: student.level,
            current_streak: student.current_streak,
            best_streak: student.best_streak,
            total_study_time: student.total_study_time,
            average_score: student.average_score(),
            total_quizzes: student.total_quizzes_completed(),
            progress_by_subject: student.progress_by_subject(catalog),
            achievements_by_kind,
            recent_results: student.recent_results().to_vec(),
        }))
    }

    /// Every achievement state grouped by kind (empty without a learner)
    pub fn achievements_by_kind(&self) -> Result<BTreeMap<AchievementKind, Vec<AchievementState>>> {
        let Some(student) = self.current_student()? else {
            return Ok(BTreeMap::new());
        };

        Ok(AchievementKind::ALL
            .into_iter()
            .map(|kind| {
                let states = student
                    .achievements_by_kind(kind)
                    .into_iter()
                    .cloned()
                    .collect();
                (kind, states)
            })
            .collect())
    }

    /// Whether anything was earned in the last 24 hours
    pub fn has_new_achievements(&self) -> Result<bool> {
        let Some(student) = self.current_student()? else {
            return Ok(false);
        };

        let since = self.clock.now() - Duration::hours(24);
        Ok(student
            .achievements
            .iter()
            .any(|s| s.earned_at.is_some_and(|at| at > since)))
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Wipe all progress, keeping the learner's identity
    pub fn reset_user_progress(&self) -> Result<bool> {
        let Some(mut student) = self.current_student()? else {
            return Ok(false);
        };
        student.reset_progress();
        self.repo.save_student(&student)?;
        tracing::info!(student_id = %student.id, "Learner progress reset");
        Ok(true)
    }

    /// Set the current streak directly
    pub fn update_streak(&self, days: u32) -> Result<bool> {
        let Some(mut student) = self.current_student()? else {
            return Ok(false);
        };
        student.set_streak(days, self.clock.now());
        self.repo.save_student(&student)?;
        tracing::info!(days, "Streak updated");
        Ok(true)
    }

    pub fn settings(&self) -> Result<AppSettings> {
        self.repo.load_settings()
    }

    pub fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        self.repo.save_settings(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::store::ProgressDb;
    use chrono::{DateTime, Local, TimeZone};

    fn noon(day: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap()
    }

    fn manager(clock: &ManualClock) -> ProgressManager<ProgressDb, &ManualClock> {
        let repo = Repository::new(ProgressDb::open_in_memory().unwrap());
        ProgressManager::new(repo, clock)
    }

    #[test]
    fn test_no_learner_is_noop() {
        let clock = ManualClock::new(noon(10));
        let manager = manager(&clock);
        let result = QuizResult::new("bio_001", "biologia", 10, 10, 0, 100.0, noon(10));

        assert!(manager.process_quiz_completion(&result).unwrap().is_none());
        assert!(manager.recalculate_achievements().unwrap().is_none());
        assert!(manager.dashboard_stats().unwrap().is_none());
        assert!(manager.achievements_by_kind().unwrap().is_empty());
        assert!(!manager.has_new_achievements().unwrap());
        assert!(!manager.reset_user_progress().unwrap());
        assert!(!manager.update_streak(5).unwrap());
        assert!(manager.is_first_time().unwrap());
    }

    #[test]
    fn test_register_validates_and_persists() {
        let clock = ManualClock::new(noon(10));
        let manager = manager(&clock);
        assert!(manager.register("  ", "a@b.c").is_err());
        assert!(manager.register("Ana", "nope").is_err());

        let student = manager.register(" Ana ", "ana@example.com").unwrap();
        assert_eq!(student.name, "Ana");
        assert!(!manager.is_first_time().unwrap());
        assert_eq!(manager.current_student().unwrap(), Some(student));
    }

    #[test]
    fn test_completion_persists_and_reports() {
        let clock = ManualClock::new(noon(10));
        let manager = manager(&clock);
        manager.register("Ana", "ana@example.com").unwrap();

        let result = QuizResult::new("bio_001", "biologia", 10, 10, 0, 100.0, noon(10));
        let completion = manager.process_quiz_completion(&result).unwrap().unwrap();
        assert_eq!(completion.base_points, 40);
        assert_eq!(completion.unlocked.len(), 3);
        assert_eq!(completion.total_points, 80);
        assert!(completion.level_up.is_none());

        let stored = manager.current_student().unwrap().unwrap();
        assert_eq!(stored.total_points, 80);
        assert_eq!(stored.quiz_results.len(), 1);
        assert!(manager.has_new_achievements().unwrap());

        clock.advance_days(2);
        assert!(!manager.has_new_achievements().unwrap());
    }

    #[test]
    fn test_update_streak_and_reset() {
        let clock = ManualClock::new(noon(10));
        let manager = manager(&clock);
        manager.register("Ana", "ana@example.com").unwrap();

        assert!(manager.update_streak(6).unwrap());
        let student = manager.current_student().unwrap().unwrap();
        assert_eq!((student.current_streak, student.best_streak), (6, 6));

        assert!(manager.reset_user_progress().unwrap());
        let student = manager.current_student().unwrap().unwrap();
        assert_eq!((student.current_streak, student.best_streak), (0, 0));
        assert_eq!(student.name, "Ana");
    }

    #[test]
    fn test_achievements_by_kind_covers_catalog() {
        let clock = ManualClock::new(noon(10));
        let manager = manager(&clock);
        manager.register("Ana", "ana@example.com").unwrap();

        let grouped = manager.achievements_by_kind().unwrap();
        assert_eq!(grouped.len(), 5);
        assert_eq!(grouped[&AchievementKind::Velocity].len(), 3);
        assert_eq!(grouped[&AchievementKind::Explorer].len(), 2);
    }

    #[test]
    fn test_settings_roundtrip() {
        let clock = ManualClock::new(noon(10));
        let manager = manager(&clock);
        let mut settings = manager.settings().unwrap();
        settings.is_dark_mode = true;
        settings.selected_language = "en".to_string();
        manager.save_settings(&settings).unwrap();
        assert_eq!(manager.settings().unwrap(), settings);
    }
}
