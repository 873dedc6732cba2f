use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Fraction of correct answers required to pass a quiz
pub const PASSING_RATIO: f64 = 0.70;

/// Immutable outcome of one quiz attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    pub quiz_id: String,
    pub subject_id: String,
    pub score: u32,
    pub total_questions: u32,
    pub penalty_count: u32,
    /// Seconds elapsed between session start and completion
    pub completion_time: f64,
    pub date: DateTime<Local>,
    pub passed: bool,
}

impl QuizResult {
    /// Build a result, deriving `passed` from the score ratio.
    ///
    /// `total_questions` must be at least 1; percentages are undefined otherwise.
    pub fn new(
        quiz_id: impl Into<String>,
        subject_id: impl Into<String>,
        score: u32,
        total_questions: u32,
        penalty_count: u32,
        completion_time: f64,
        date: DateTime<Local>,
    ) -> Self {
        let passed = score as f64 / total_questions as f64 >= PASSING_RATIO;
        Self {
            quiz_id: quiz_id.into(),
            subject_id: subject_id.into(),
            score,
            total_questions,
            penalty_count,
            completion_time,
            date,
            passed,
        }
    }

    /// Score as a percentage of the question count (0.0 - 100.0)
    pub fn score_percentage(&self) -> f64 {
        100.0 * self.score as f64 / self.total_questions as f64
    }

    /// Every drawn question answered correctly
    pub fn is_perfect(&self) -> bool {
        self.score_percentage() == 100.0
    }

    pub fn avg_time_per_question(&self) -> f64 {
        self.completion_time / self.total_questions as f64
    }

    /// "score/total", e.g. "7/10"
    pub fn score_display(&self) -> String {
        format!("{}/{}", self.score, self.total_questions)
    }
}
