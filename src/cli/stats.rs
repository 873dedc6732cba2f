//! Dashboard, profile and achievement listings

use anyhow::Result;

use quizquest::achievements::AchievementKind;
use quizquest::catalog::QuizCatalog;
use quizquest::progress::format_study_time;
use quizquest::student::AchievementStatus;

use super::{Manager, print_no_learner};

/// Width of the text progress bar
const BAR_WIDTH: usize = 20;

fn bar(fraction: f32) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * BAR_WIDTH as f32).round()) as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

pub fn dashboard_command(manager: &Manager) -> Result<()> {
    let Some(stats) = manager.dashboard_stats()? else {
        print_no_learner();
        return Ok(());
    };

    println!("Level {} - {}", stats.level, stats.level_title);
    println!(
        "  {} {} points ({} to next level)",
        bar(stats.progress_to_next_level),
        stats.total_points,
        stats.experience_needed
    );
    println!(
        "Streak: {} days (best {})",
        stats.current_streak, stats.best_streak
    );
    println!(
        "Quizzes: {}  Subjects: {}  Average: {:.1}%  Study time: {}",
        stats.total_quizzes,
        stats.subjects_explored,
        stats.average_score,
        format_study_time(stats.total_study_time)
    );
    println!(
        "Achievements: {}/{} ({:.0}%)",
        stats.achievements_earned, stats.achievements_total, stats.achievement_percentage
    );
    for unlocked in &stats.recent_achievements {
        println!(
            "  {} (+{}) {}",
            unlocked.achievement.title,
            unlocked.achievement.points,
            unlocked.earned_at.format("%Y-%m-%d")
        );
    }

    let week: Vec<String> = stats.weekly_activity.iter().map(u32::to_string).collect();
    println!("Last 7 days: {}", week.join(" "));
    Ok(())
}

pub fn profile_command(manager: &Manager, catalog: &QuizCatalog) -> Result<()> {
    let Some(stats) = manager.profile_stats(catalog)? else {
        print_no_learner();
        return Ok(());
    };

    println!("{} <{}>", stats.student_name, stats.student_email);
    println!(
        "Member since {}",
        stats.registration_date.format("%Y-%m-%d")
    );
    println!(
        "Level {}  {} points  streak {} (best {})",
        stats.level, stats.total_points, stats.current_streak, stats.best_streak
    );

    println!("\nSubjects:");
    for progress in &stats.progress_by_subject {
        let name = catalog
            .subject(&progress.subject_id)
            .map(|s| s.name.as_str())
            .unwrap_or(progress.subject_id.as_str());
        println!(
            "  {:<12} {} {}/{}",
            name,
            bar(progress.percentage() / 100.0),
            progress.completed,
            progress.total
        );
    }

    if !stats.achievements_by_kind.is_empty() {
        println!("\nEarned achievements:");
        for (kind, states) in &stats.achievements_by_kind {
            let titles: Vec<&str> = states
                .iter()
                .filter_map(|s| s.definition())
                .map(|a| a.title)
                .collect();
            println!("  {:<14} {}", kind.label(), titles.join(", "));
        }
    }

    if !stats.recent_results.is_empty() {
        println!("\nRecent results:");
        for result in stats.recent_results.iter().rev() {
            println!(
                "  {} {:<8} {:>5} {}",
                result.date.format("%Y-%m-%d %H:%M"),
                result.quiz_id,
                result.score_display(),
                if result.passed { "passed" } else { "failed" }
            );
        }
    }
    Ok(())
}

pub fn achievements_command(manager: &Manager) -> Result<()> {
    let grouped = manager.achievements_by_kind()?;
    if grouped.is_empty() {
        print_no_learner();
        return Ok(());
    }

    for kind in AchievementKind::ALL {
        let Some(states) = grouped.get(&kind) else {
            continue;
        };
        println!("{}", kind.label());
        for state in states {
            let Some(achievement) = state.definition() else {
                continue;
            };
            let mark = match state.status {
                AchievementStatus::Earned => "x",
                AchievementStatus::Unlocked => " ",
                AchievementStatus::Locked => "-",
            };
            println!(
                "  [{}] {:<20} {:>3} pts  {:<6}  {}",
                mark,
                achievement.title,
                achievement.points,
                achievement.difficulty.label(),
                achievement.description
            );
        }
    }

    if manager.has_new_achievements()? {
        println!("\nNew achievements earned in the last 24 hours!");
    }
    Ok(())
}
