//! Subjects command implementation

use quizquest::catalog::QuizCatalog;

/// List subjects and their quizzes
pub fn subjects_command(catalog: &QuizCatalog) {
    for subject in catalog.subjects() {
        println!("{} [{}]", subject.name, subject.id);
        for quiz in &subject.quizzes {
            println!(
                "    {:<10} {} ({} questions)",
                quiz.id, quiz.title, quiz.min_questions
            );
        }
    }
}
