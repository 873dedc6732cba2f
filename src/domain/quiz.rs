use serde::{Deserialize, Serialize};

/// A single multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub options: Vec<String>,
    /// Must be one of `options`
    pub correct_answer: String,
}

impl Question {
    pub fn new(prompt: impl Into<String>, options: &[&str], correct_answer: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer: correct_answer.into(),
        }
    }

    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }

    /// Whether the correct answer is one of the offered options
    pub fn is_well_formed(&self) -> bool {
        self.options.iter().any(|o| o == &self.correct_answer)
    }
}

/// A quiz from the static catalog
///
/// `is_completed`, `best_score` and `attempts` are display hints only; the
/// authoritative attempt history lives in the student's results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub subject_id: String,
    /// Number of questions drawn per attempt
    pub min_questions: usize,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub best_score: u32,
    #[serde(default)]
    pub attempts: u32,
}

fn default_language() -> String {
    "es".to_string()
}

impl Quiz {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        subject_id: impl Into<String>,
        min_questions: usize,
        questions: Vec<Question>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subject_id: subject_id.into(),
            min_questions,
            language: default_language(),
            questions,
            is_completed: false,
            best_score: 0,
            attempts: 0,
        }
    }
}

/// A subject grouping several quizzes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub icon: String,
    /// Hex color hint, e.g. "#4CAF50"
    pub color: String,
    #[serde(default)]
    pub quizzes: Vec<Quiz>,
}
