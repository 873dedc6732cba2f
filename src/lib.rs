//! QuizQuest - offline quiz trainer
//!
//! A single learner takes multiple-choice quizzes from a built-in catalog and
//! earns points, levels, daily streaks and achievements. The core is
//! synchronous and single-writer: each operation loads the learner record,
//! applies one change and stores it back.
//!
//! ## Layers
//!
//! 1. **Session**: [`session::QuizSession`] runs one attempt and yields a
//!    [`domain::QuizResult`].
//!
//! 2. **Progression**: [`student::Student`] accumulates results; the
//!    [`achievements::AchievementEvaluator`] grants achievements under a daily
//!    point budget.
//!
//! 3. **Orchestration**: [`progress::ProgressManager`] ties both to a
//!    [`store::Storage`] and a [`clock::Clock`].

pub mod achievements;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod domain;
pub mod progress;
pub mod session;
pub mod store;
pub mod student;

pub use domain::*;
