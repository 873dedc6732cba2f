//! Quiz session and answer state machine
//!
//! A [`QuizSession`] tracks one in-progress attempt: which questions were
//! drawn, the running score, penalties and the answer recorded per question.
//! Indices are 0-based and must be in range; calling into a session after it
//! has completed is a programming error and panics.

use chrono::{DateTime, Local};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::domain::{Question, Quiz, QuizResult};

/// Penalties tolerated before the attempt must restart
pub const MAX_PENALTIES: u32 = 3;

/// What the caller should do after a session operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Keep going with the current or next question
    Continue,
    /// Penalty limit exceeded, the caller must `reset()` the session
    RestartRequired,
    /// All drawn questions have been passed
    Completed,
}

/// Error type for session construction
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Quiz {0} has no questions to draw")]
    EmptyQuiz(String),

    #[error("Quiz {quiz_id} draws {required} questions but only has {available}")]
    NotEnoughQuestions {
        quiz_id: String,
        required: usize,
        available: usize,
    },
}

/// One attempt at a quiz
#[derive(Debug, Clone)]
pub struct QuizSession {
    quiz: Quiz,
    selected: Vec<Question>,
    current_index: usize,
    /// Signed so a revoke can never underflow mid-update
    score: i32,
    penalty_count: u32,
    /// Empty string = unanswered
    selected_answers: Vec<String>,
    processed: Vec<bool>,
    started_at: DateTime<Local>,
}

impl QuizSession {
    /// Start a session, drawing questions with the thread-local RNG
    pub fn new(quiz: Quiz, now: DateTime<Local>) -> Result<Self, SessionError> {
        Self::with_rng(quiz, now, &mut rand::thread_rng())
    }

    /// Start a session drawing questions from `rng`
    pub fn with_rng<R: Rng + ?Sized>(
        quiz: Quiz,
        now: DateTime<Local>,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        if quiz.questions.is_empty() || quiz.min_questions == 0 {
            return Err(SessionError::EmptyQuiz(quiz.id.clone()));
        }
        if quiz.questions.len() < quiz.min_questions {
            return Err(SessionError::NotEnoughQuestions {
                quiz_id: quiz.id.clone(),
                required: quiz.min_questions,
                available: quiz.questions.len(),
            });
        }

        let mut session = Self {
            quiz,
            selected: Vec::new(),
            current_index: 0,
            score: 0,
            penalty_count: 0,
            selected_answers: Vec::new(),
            processed: Vec::new(),
            started_at: now,
        };
        session.draw_questions(rng);
        Ok(session)
    }

    /// Draw a fresh subset of `min_questions` questions without replacement
    fn draw_questions<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let count = self.quiz.min_questions;
        self.selected = self
            .quiz
            .questions
            .choose_multiple(rng, count)
            .cloned()
            .collect();
        self.selected.shuffle(rng);
        self.selected_answers = vec![String::new(); count];
        self.processed = vec![false; count];
    }

    // ========================================
    // ANSWER STATE MACHINE
    // ========================================

    /// Score the answer confirmed for the current question
    pub fn process_answer(&mut self, answer: &str) -> SessionOutcome {
        let idx = self.current_index;
        let is_correct = self.selected[idx].is_correct(answer);

        if !self.processed[idx] {
            self.processed[idx] = true;
            self.selected_answers[idx] = answer.to_string();

            if is_correct {
                self.score += 1;
            } else {
                self.penalty_count += 1;
            }
        } else if self.selected_answers[idx] != answer {
            if self.selected[idx].is_correct(&self.selected_answers[idx]) {
                self.score -= 1;
            }

            // A wrong answer replacing a wrong answer is penalized again
            if is_correct {
                self.score += 1;
            } else {
                self.penalty_count += 1;
            }

            self.selected_answers[idx] = answer.to_string();
        }

        if self.penalty_count > MAX_PENALTIES {
            tracing::debug!(
                "[SESSION] quiz:{} penalty limit exceeded ({})",
                self.quiz.id,
                self.penalty_count
            );
            return SessionOutcome::RestartRequired;
        }

        SessionOutcome::Continue
    }

    /// Step back one question, re-opening the question being left for scoring
    ///
    /// Penalties are never refunded.
    pub fn process_back_navigation(&mut self) {
        if self.current_index == 0 {
            return;
        }

        let idx = self.current_index;
        if self.processed[idx] {
            self.processed[idx] = false;
            if self.selected[idx].is_correct(&self.selected_answers[idx]) {
                self.score -= 1;
            }
        }

        self.current_index -= 1;
    }

    pub fn move_to_next_question(&mut self) -> SessionOutcome {
        self.current_index += 1;

        if self.current_index >= self.quiz.min_questions {
            return SessionOutcome::Completed;
        }

        SessionOutcome::Continue
    }

    /// Options of a question in a new random order on every call
    pub fn shuffled_options(&self, index: usize) -> Vec<String> {
        self.shuffled_options_with(index, &mut rand::thread_rng())
    }

    pub fn shuffled_options_with<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> Vec<String> {
        let mut options = self.selected[index].options.clone();
        options.shuffle(rng);
        options
    }

    /// Answer recorded for a question, if any
    pub fn previous_answer(&self, index: usize) -> Option<&str> {
        let answer = self.selected_answers[index].as_str();
        (!answer.is_empty()).then_some(answer)
    }

    /// Start over with a fresh draw of questions
    pub fn reset(&mut self, now: DateTime<Local>) {
        self.reset_with_rng(now, &mut rand::thread_rng());
    }

    pub fn reset_with_rng<R: Rng + ?Sized>(&mut self, now: DateTime<Local>, rng: &mut R) {
        self.current_index = 0;
        self.score = 0;
        self.penalty_count = 0;
        self.started_at = now;
        self.draw_questions(rng);
    }

    /// Derive the immutable result of this attempt
    ///
    /// The score is clamped to `[0, total]`.
    pub fn finish(&self, now: DateTime<Local>) -> QuizResult {
        let total = self.quiz.min_questions as u32;
        let score = self.score.clamp(0, total as i32) as u32;
        let elapsed_ms = (now - self.started_at).num_milliseconds().max(0);

        QuizResult::new(
            self.quiz.id.clone(),
            self.quiz.subject_id.clone(),
            score,
            total,
            self.penalty_count,
            elapsed_ms as f64 / 1000.0,
            now,
        )
    }

    // ========================================
    // ACCESSORS
    // ========================================

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    /// Questions drawn for this attempt, in play order
    pub fn questions(&self) -> &[Question] {
        &self.selected
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.selected.get(self.current_index)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn min_questions(&self) -> usize {
        self.quiz.min_questions
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn penalty_count(&self) -> u32 {
        self.penalty_count
    }

    pub fn selected_answers(&self) -> &[String] {
        &self.selected_answers
    }

    pub fn processed_questions(&self) -> &[bool] {
        &self.processed
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn is_completed(&self) -> bool {
        self.current_index >= self.quiz.min_questions
    }

    /// Fraction of the attempt reached, counting the current question
    pub fn progress_percentage(&self) -> f32 {
        (self.current_index + 1) as f32 / self.quiz.min_questions as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use chrono::{Duration, TimeZone};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn start() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    fn sample_quiz(question_count: usize, min_questions: usize) -> Quiz {
        let questions = (0..question_count)
            .map(|i| {
                let right = format!("right-{i}");
                let wrong_a = format!("wrong-a-{i}");
                let wrong_b = format!("wrong-b-{i}");
                Question::new(
                    format!("Question {i}"),
                    &[right.as_str(), wrong_a.as_str(), wrong_b.as_str()],
                    right.clone(),
                )
            })
            .collect();
        Quiz::new("quiz_1", "Sample", "biologia", min_questions, questions)
    }

    fn session(question_count: usize, min_questions: usize) -> QuizSession {
        let mut rng = StdRng::seed_from_u64(7);
        QuizSession::with_rng(sample_quiz(question_count, min_questions), start(), &mut rng).unwrap()
    }

    fn right(session: &QuizSession, idx: usize) -> String {
        session.questions()[idx].correct_answer.clone()
    }

    fn wrong(session: &QuizSession, idx: usize, which: usize) -> String {
        session.questions()[idx]
            .options
            .iter()
            .filter(|o| **o != session.questions()[idx].correct_answer)
            .nth(which)
            .unwrap()
            .clone()
    }

    #[test]
    fn test_draws_subset_without_replacement() {
        let s = session(8, 5);
        assert_eq!(s.questions().len(), 5);
        assert_eq!(s.selected_answers().len(), 5);
        assert_eq!(s.processed_questions().len(), 5);

        let mut prompts: Vec<&str> = s.questions().iter().map(|q| q.prompt.as_str()).collect();
        prompts.sort();
        prompts.dedup();
        assert_eq!(prompts.len(), 5);
    }

    #[test]
    fn test_rejects_unplayable_quiz() {
        let err = QuizSession::new(sample_quiz(0, 5), start()).unwrap_err();
        assert!(matches!(err, SessionError::EmptyQuiz(_)));

        let err = QuizSession::new(sample_quiz(3, 5), start()).unwrap_err();
        assert!(matches!(
            err,
            SessionError::NotEnoughQuestions {
                required: 5,
                available: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_first_answer_scores_or_penalizes() {
        let mut s = session(5, 5);
        let answer = right(&s, 0);
        assert_eq!(s.process_answer(&answer), SessionOutcome::Continue);
        assert_eq!(s.score(), 1);
        assert!(s.processed_questions()[0]);
        assert_eq!(s.previous_answer(0), Some(answer.as_str()));

        s.move_to_next_question();
        let answer = wrong(&s, 1, 0);
        s.process_answer(&answer);
        assert_eq!(s.score(), 1);
        assert_eq!(s.penalty_count(), 1);
        assert_eq!(s.previous_answer(2), None);
    }

    #[test]
    fn test_same_answer_twice_is_noop() {
        let mut s = session(5, 5);
        let answer = wrong(&s, 0, 0);
        s.process_answer(&answer);
        s.process_answer(&answer);
        assert_eq!(s.score(), 0);
        assert_eq!(s.penalty_count(), 1);

        let mut s = session(5, 5);
        let answer = right(&s, 0);
        s.process_answer(&answer);
        s.process_answer(&answer);
        assert_eq!(s.score(), 1);
        assert_eq!(s.penalty_count(), 0);
    }

    #[test]
    fn test_changing_answers() {
        let mut s = session(5, 5);

        // correct -> wrong revokes the point and penalizes
        s.process_answer(&right(&s, 0));
        s.process_answer(&wrong(&s, 0, 0));
        assert_eq!(s.score(), 0);
        assert_eq!(s.penalty_count(), 1);

        // wrong -> different wrong penalizes again
        s.process_answer(&wrong(&s, 0, 1));
        assert_eq!(s.score(), 0);
        assert_eq!(s.penalty_count(), 2);

        // wrong -> correct restores the point, penalties stay
        s.process_answer(&right(&s, 0));
        assert_eq!(s.score(), 1);
        assert_eq!(s.penalty_count(), 2);
        assert_eq!(s.previous_answer(0), Some(right(&s, 0).as_str()));
    }

    #[test]
    fn test_restart_required_after_fourth_penalty() {
        let mut s = session(5, 5);
        let outcomes: Vec<SessionOutcome> = [0, 1, 0, 1]
            .iter()
            .map(|which| {
                let answer = wrong(&s, 0, *which);
                s.process_answer(&answer)
            })
            .collect();

        assert_eq!(
            outcomes,
            vec![
                SessionOutcome::Continue,
                SessionOutcome::Continue,
                SessionOutcome::Continue,
                SessionOutcome::RestartRequired,
            ]
        );

        // Stays required until reset, even for a correct answer
        let answer = right(&s, 0);
        assert_eq!(s.process_answer(&answer), SessionOutcome::RestartRequired);
        assert_eq!(s.penalty_count(), 4);

        s.reset(start() + Duration::minutes(5));
        assert_eq!(s.penalty_count(), 0);
        assert_eq!(s.score(), 0);
        assert_eq!(s.current_index(), 0);
        assert!(s.processed_questions().iter().all(|p| !p));
        assert!(s.selected_answers().iter().all(|a| a.is_empty()));
        assert_eq!(s.started_at(), start() + Duration::minutes(5));
    }

    #[test]
    fn test_back_navigation_reopens_question_being_left() {
        let mut s = session(5, 5);
        s.process_answer(&right(&s, 0));
        s.move_to_next_question();
        s.process_answer(&right(&s, 1));
        s.move_to_next_question();
        assert_eq!(s.score(), 2);

        // Leaving an unanswered question changes nothing
        s.process_back_navigation();
        assert_eq!(s.current_index(), 1);
        assert_eq!(s.score(), 2);

        // Leaving the answered question revokes its point
        s.process_back_navigation();
        assert_eq!(s.current_index(), 0);
        assert_eq!(s.score(), 1);
        assert!(!s.processed_questions()[1]);

        // At the first question back is a no-op
        s.process_back_navigation();
        assert_eq!(s.current_index(), 0);
        assert_eq!(s.score(), 1);
    }

    #[test]
    fn test_back_navigation_never_refunds_penalties() {
        let mut s = session(5, 5);
        s.move_to_next_question();
        s.process_answer(&wrong(&s, 1, 0));
        s.process_back_navigation();
        assert_eq!(s.penalty_count(), 1);
        assert_eq!(s.score(), 0);
        assert!(!s.processed_questions()[1]);
    }

    #[test]
    fn test_full_pass_completes_and_finishes() {
        let mut s = session(6, 5);
        let mut outcome = SessionOutcome::Continue;
        for idx in 0..5 {
            let answer = if idx == 2 { wrong(&s, idx, 0) } else { right(&s, idx) };
            assert_eq!(s.process_answer(&answer), SessionOutcome::Continue);
            outcome = s.move_to_next_question();
        }
        assert_eq!(outcome, SessionOutcome::Completed);
        assert!(s.is_completed());
        assert!(s.current_question().is_none());
        assert_eq!(s.score(), 4);

        let result = s.finish(start() + Duration::seconds(50));
        assert_eq!(result.score, 4);
        assert_eq!(result.total_questions, 5);
        assert_eq!(result.penalty_count, 1);
        assert_eq!(result.completion_time, 50.0);
        assert!(result.passed);
        assert_eq!(result.quiz_id, "quiz_1");
        assert_eq!(result.subject_id, "biologia");
    }

    #[test]
    fn test_shuffled_options_keep_the_same_set() {
        let s = session(5, 5);
        let mut rng = StdRng::seed_from_u64(99);
        let mut shuffled = s.shuffled_options_with(0, &mut rng);
        let mut original = s.questions()[0].options.clone();
        shuffled.sort();
        original.sort();
        assert_eq!(shuffled, original);
    }

    #[test]
    fn test_shuffled_options_reshuffle_on_every_call() {
        let s = session(5, 5);
        let mut rng = StdRng::seed_from_u64(99);
        let orders: HashSet<Vec<String>> = (0..30)
            .map(|_| s.shuffled_options_with(0, &mut rng))
            .collect();
        assert!(orders.len() > 1);

        let orders: HashSet<Vec<String>> = (0..30).map(|_| s.shuffled_options(0)).collect();
        assert!(orders.len() > 1);
    }

    #[test]
    fn test_progress_percentage() {
        let mut s = session(5, 5);
        assert!((s.progress_percentage() - 0.2).abs() < f32::EPSILON);
        s.move_to_next_question();
        assert!((s.progress_percentage() - 0.4).abs() < f32::EPSILON);
    }

    #[test]
    #[should_panic]
    fn test_answer_after_completion_panics() {
        let mut s = session(5, 1);
        s.move_to_next_question();
        s.process_answer("anything");
    }
}
