//! Learner management commands

use anyhow::Result;

use super::{Manager, print_no_learner};

pub fn register_command(manager: &Manager, name: &str, email: &str) -> Result<()> {
    if let Some(existing) = manager.current_student()? {
        println!("Replacing learner {} <{}>", existing.name, existing.email);
    }
    let student = manager.register(name, email)?;
    println!("Welcome, {}!", student.name);
    Ok(())
}

pub fn recalculate_command(manager: &Manager) -> Result<()> {
    match manager.recalculate_achievements()? {
        Some(r) => println!(
            "Recalculated: {} -> {} points, {} achievements earned",
            r.points_before, r.points_after, r.achievements_earned
        ),
        None => print_no_learner(),
    }
    Ok(())
}

pub fn reset_command(manager: &Manager, yes: bool) -> Result<()> {
    if !yes {
        println!("This erases all points, achievements and history. Re-run with --yes to confirm.");
        return Ok(());
    }
    if manager.reset_user_progress()? {
        println!("Progress reset.");
    } else {
        print_no_learner();
    }
    Ok(())
}

pub fn streak_command(manager: &Manager, days: u32) -> Result<()> {
    if manager.update_streak(days)? {
        println!("Streak set to {days} days.");
    } else {
        print_no_learner();
    }
    Ok(())
}

pub fn settings_command(
    manager: &Manager,
    dark_mode: Option<bool>,
    language: Option<String>,
) -> Result<()> {
    let mut settings = manager.settings()?;
    let changed = dark_mode.is_some() || language.is_some();

    if let Some(dark) = dark_mode {
        settings.is_dark_mode = dark;
    }
    if let Some(lang) = language {
        settings.selected_language = lang;
    }
    if changed {
        manager.save_settings(&settings)?;
    }

    println!("dark_mode  = {}", settings.is_dark_mode);
    println!("language   = {}", settings.selected_language);
    println!("first_time = {}", settings.is_first_time);
    Ok(())
}
