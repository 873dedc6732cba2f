//! Interactive quiz in the terminal

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, anyhow, bail};

use quizquest::catalog::QuizCatalog;
use quizquest::clock::Clock;
use quizquest::session::{MAX_PENALTIES, QuizSession, SessionOutcome};

use super::{Manager, print_no_learner};

/// Run one attempt of `quiz_id` and record the result
pub fn play_command(manager: &Manager, catalog: &QuizCatalog, quiz_id: &str) -> Result<()> {
    if manager.current_student()?.is_none() {
        print_no_learner();
        return Ok(());
    }

    let (subject, quiz) = catalog
        .quiz(quiz_id)
        .ok_or_else(|| anyhow!("Unknown quiz: {quiz_id}"))?;

    let clock = manager.clock();
    let mut session = QuizSession::new(quiz.clone(), clock.now())?;

    println!("{} - {}", subject.name, quiz.title);
    println!("Answer with the option number, `b` to go back, `q` to quit.\n");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while !session.is_completed() {
        let index = session.current_index();
        let options = session.shuffled_options(index);
        let prompt = session.questions()[index].prompt.clone();

        println!(
            "[{}/{}] {}",
            index + 1,
            session.min_questions(),
            prompt
        );
        for (n, option) in options.iter().enumerate() {
            println!("  {}) {}", n + 1, option);
        }
        if let Some(previous) = session.previous_answer(index) {
            println!("  (previous answer: {previous})");
        }
        print!("> ");
        io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next() else {
            bail!("Input closed before the quiz finished");
        };
        let line = line.context("Failed to read answer")?;

        let choice = match line.trim() {
            "q" => {
                println!("Quiz abandoned, nothing recorded.");
                return Ok(());
            }
            "b" => {
                session.process_back_navigation();
                continue;
            }
            other => other.parse::<usize>().ok().filter(|n| (1..=options.len()).contains(n)),
        };
        let Some(choice) = choice else {
            println!("Enter a number between 1 and {}.", options.len());
            continue;
        };

        let answer = &options[choice - 1];
        let correct = session.questions()[index].is_correct(answer);

        if session.process_answer(answer) == SessionOutcome::RestartRequired {
            println!(
                "\nMore than {MAX_PENALTIES} mistakes. Starting over with new questions.\n"
            );
            session.reset(clock.now());
            continue;
        }

        if correct {
            println!("Correct!\n");
        } else {
            println!(
                "Wrong. Mistakes: {}/{}\n",
                session.penalty_count(),
                MAX_PENALTIES
            );
        }

        if session.move_to_next_question() == SessionOutcome::Completed {
            break;
        }
    }

    let result = session.finish(clock.now());
    println!(
        "Score {} ({:.0}%) in {:.0}s - {}",
        result.score_display(),
        result.score_percentage(),
        result.completion_time,
        if result.passed { "passed" } else { "failed" }
    );

    let Some(completion) = manager.process_quiz_completion(&result)? else {
        print_no_learner();
        return Ok(());
    };

    println!("+{} points", completion.base_points);
    for unlocked in &completion.unlocked {
        println!(
            "Achievement unlocked: {} (+{})",
            unlocked.achievement.title, unlocked.achievement.points
        );
    }
    if let Some(level_up) = &completion.level_up {
        println!(
            "Level up! {} -> {} ({})",
            level_up.old_level, level_up.new_level, level_up.new_title
        );
    }
    println!("Total: {} points", completion.total_points);
    Ok(())
}
