//! Core domain types for quizquest

mod quiz;
mod result;

pub use quiz::{Question, Quiz, Subject};
pub use result::{QuizResult, PASSING_RATIO};
