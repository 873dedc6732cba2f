//! Built-in subject and quiz catalog
//!
//! The catalog is static content embedded at compile time. It is parsed and
//! validated once when loaded, so sessions can rely on well-formed questions.

use std::collections::HashMap;

use crate::domain::{Quiz, Subject};

const BUILTIN_SUBJECTS: &str = include_str!("subjects.yaml");

/// Error type for catalog loading
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Duplicate quiz id: {0}")]
    DuplicateQuiz(String),

    #[error("Quiz {quiz_id} declares subject {declared} but is listed under {listed}")]
    SubjectMismatch {
        quiz_id: String,
        declared: String,
        listed: String,
    },

    #[error("Quiz {quiz_id} draws {min_questions} questions but only has {available}")]
    NotEnoughQuestions {
        quiz_id: String,
        min_questions: usize,
        available: usize,
    },

    #[error("Quiz {quiz_id}, question {index}: correct answer is not one of the options")]
    InvalidQuestion { quiz_id: String, index: usize },
}

/// Read-only collection of subjects with quiz lookup
#[derive(Debug, Clone)]
pub struct QuizCatalog {
    subjects: Vec<Subject>,
    /// quiz id -> (subject index, quiz index)
    quiz_index: HashMap<String, (usize, usize)>,
}

impl QuizCatalog {
    /// Load the catalog shipped with the binary
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_yaml(BUILTIN_SUBJECTS)
    }

    /// Parse and validate a YAML list of subjects
    pub fn from_yaml(content: &str) -> Result<Self, CatalogError> {
        let subjects: Vec<Subject> = serde_yaml::from_str(content)?;
        Self::from_subjects(subjects)
    }

    pub fn from_subjects(subjects: Vec<Subject>) -> Result<Self, CatalogError> {
        let mut quiz_index = HashMap::new();

        for (s_idx, subject) in subjects.iter().enumerate() {
            for (q_idx, quiz) in subject.quizzes.iter().enumerate() {
                validate_quiz(subject, quiz)?;
                if quiz_index.insert(quiz.id.clone(), (s_idx, q_idx)).is_some() {
                    return Err(CatalogError::DuplicateQuiz(quiz.id.clone()));
                }
            }
        }

        Ok(Self {
            subjects,
            quiz_index,
        })
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    /// Find a quiz and the subject it belongs to
    pub fn quiz(&self, quiz_id: &str) -> Option<(&Subject, &Quiz)> {
        let (s_idx, q_idx) = *self.quiz_index.get(quiz_id)?;
        let subject = &self.subjects[s_idx];
        Some((subject, &subject.quizzes[q_idx]))
    }

    /// Number of quizzes offered for a subject (0 if unknown)
    pub fn quiz_count(&self, subject_id: &str) -> usize {
        self.subject(subject_id).map(|s| s.quizzes.len()).unwrap_or(0)
    }
}

fn validate_quiz(subject: &Subject, quiz: &Quiz) -> Result<(), CatalogError> {
    if quiz.subject_id != subject.id {
        return Err(CatalogError::SubjectMismatch {
            quiz_id: quiz.id.clone(),
            declared: quiz.subject_id.clone(),
            listed: subject.id.clone(),
        });
    }

    if quiz.min_questions == 0 || quiz.questions.len() < quiz.min_questions {
        return Err(CatalogError::NotEnoughQuestions {
            quiz_id: quiz.id.clone(),
            min_questions: quiz.min_questions,
            available: quiz.questions.len(),
        });
    }

    if let Some(index) = quiz.questions.iter().position(|q| !q.is_well_formed()) {
        return Err(CatalogError::InvalidQuestion {
            quiz_id: quiz.id.clone(),
            index,
        });
    }

    Ok(())
}
