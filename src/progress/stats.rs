//! Read-only projections for the dashboard and profile screens

use std::collections::BTreeMap;

use chrono::{DateTime, Local};

use crate::achievements::{AchievementKind, UnlockedAchievement};
use crate::domain::QuizResult;
use crate::student::{AchievementState, SubjectProgress};

#[derive(Debug, Clone)]
pub struct DashboardStats {
    pub total_points: u32,
    pub level: u32,
    pub level_title: &'static str,
    /// 0.0 - 1.0
    pub progress_to_next_level: f32,
    pub experience_needed: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    pub average_score: f64,
    pub total_quizzes: usize,
    pub subjects_explored: usize,
    pub achievements_earned: usize,
    pub achievements_total: usize,
    pub achievement_percentage: f32,
    pub recent_achievements: Vec<UnlockedAchievement>,
    /// Index 0 is six days ago, 6 is today
    pub weekly_activity: [u32; 7],
    /// Seconds
    pub total_study_time: f64,
}

#[derive(Debug, Clone)]
pub struct ProfileStats {
    pub student_name: String,
    pub student_email: String,
    pub registration_date: DateTime<Local>,
    pub total_points: u32,
    pub level: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    pub total_study_time: f64,
    pub average_score: f64,
    pub total_quizzes: usize,
    pub progress_by_subject: Vec<SubjectProgress>,
    /// Earned achievements grouped by kind
    pub achievements_by_kind: BTreeMap<AchievementKind, Vec<AchievementState>>,
    pub recent_results: Vec<QuizResult>,
}

/// "1h 05m", "12m 30s" or "45s"
pub fn format_study_time(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else if minutes > 0 {
        format!("{minutes}m {secs:02}s")
    } else {
        format!("{secs}s")
    }
}
