//! Gamification system: achievements, levels and streaks
//!
//! The catalog is static. Evaluation is pure checking plus granting through
//! the student aggregate, which owns the daily point budget.

pub mod checker;
mod definitions;
mod evaluator;
pub mod levels;
pub mod streaks;

pub use definitions::{
    ACHIEVEMENTS, Achievement, AchievementId, AchievementIndex, AchievementKind, Criterion,
    Difficulty, PRECISION_REQUIRED_SUBJECTS,
};
pub use evaluator::{
    AchievementEvaluator, AchievementProgress, DAILY_QUIZ_LIMIT, UnlockedAchievement,
};
pub use levels::{LevelProgress, exp_for_level, level_for_points};
