//! Level system
//!
//! Levels follow a quadratic curve over total points: reaching level `L`
//! (for `L >= 2`) requires `(L - 1)^2 * 75 + 150` points.

/// Cumulative points required to reach `level`
pub fn exp_for_level(level: u32) -> u32 {
    if level <= 1 {
        return 0;
    }
    let steps = level - 1;
    steps * steps * 75 + 150
}

/// Highest level whose threshold is covered by `points`
pub fn level_for_points(points: u32) -> u32 {
    let mut level = 1;
    while exp_for_level(level + 1) <= points {
        level += 1;
    }
    level
}

/// Display title for a level band
pub fn title_for_level(level: u32) -> &'static str {
    match level {
        0..=1 => "Beginner",
        2..=3 => "Learner",
        4..=6 => "Scholar",
        7..=9 => "Expert",
        _ => "Master",
    }
}

/// Position of a point total within its level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelProgress {
    pub level: u32,
    pub total_points: u32,
    /// Points required for the current level
    pub current_level_exp: u32,
    /// Points required for the next level
    pub next_level_exp: u32,
}

impl LevelProgress {
    pub fn new(level: u32, total_points: u32) -> Self {
        Self {
            level,
            total_points,
            current_level_exp: exp_for_level(level),
            next_level_exp: exp_for_level(level + 1),
        }
    }

    /// Calculate progress to next level (0.0 - 1.0)
    pub fn progress_to_next(&self) -> f32 {
        let span = self.next_level_exp.saturating_sub(self.current_level_exp);
        if span == 0 {
            return 1.0;
        }
        let in_level = self.total_points.saturating_sub(self.current_level_exp);
        (in_level as f32 / span as f32).min(1.0)
    }

    /// Points still missing for the next level
    pub fn points_needed(&self) -> u32 {
        self.next_level_exp.saturating_sub(self.total_points)
    }

    pub fn title(&self) -> &'static str {
        title_for_level(self.level)
    }
}

/// Base points awarded for a finished quiz, before achievements
pub struct QuizRewards;

impl QuizRewards {
    /// Points per correct answer
    pub const PER_CORRECT: u32 = 2;

    /// Bonus for a passing result
    pub const PASSED: u32 = 10;

    /// Bonus at 90% or more
    pub const EXCELLENT: u32 = 5;

    /// Extra bonus at 100%, on top of the 90% bonus
    pub const PERFECT: u32 = 5;

    /// Total base points for a result
    pub fn for_result(result: &crate::domain::QuizResult) -> u32 {
        let pct = result.score_percentage();
        let mut points = result.score * Self::PER_CORRECT;
        if result.passed {
            points += Self::PASSED;
        }
        if pct >= 90.0 {
            points += Self::EXCELLENT;
        }
        if pct == 100.0 {
            points += Self::PERFECT;
        }
        points
    }
}
