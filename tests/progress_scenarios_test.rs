//! End-to-end progression scenarios through the progress manager

mod common;

use std::collections::BTreeSet;

use quizquest::achievements::{
    Achievement, AchievementKind, PRECISION_REQUIRED_SUBJECTS, exp_for_level, level_for_points,
};
use quizquest::clock::ManualClock;
use quizquest::student::{DAILY_ACHIEVEMENT_POINT_CAP, Student};
use quizquest::QuizResult;

use common::{day, registered_manager, result_now, tick};

fn kinds(unlocked: &[quizquest::achievements::UnlockedAchievement]) -> Vec<AchievementKind> {
    unlocked.iter().map(|u| u.achievement.kind).collect()
}

#[test]
fn test_perfect_first_quiz_base_points() {
    let mut student = Student::new("Ana", "ana@example.com", day(1));
    let result = QuizResult::new("bio_001", "biologia", 10, 10, 0, 100.0, day(1));
    assert_eq!(result.avg_time_per_question(), 10.0);

    student.add_quiz_result(result, day(1));
    assert_eq!(student.total_points, 10 * 2 + 10 + 5 + 5);
    assert_eq!(student.level, 1);
    assert!(exp_for_level(2) > 40);
}

#[test]
fn test_one_result_can_grant_several_categories() {
    let clock = ManualClock::new(day(10));
    let (_dir, manager) = registered_manager(&clock);

    // 9/10 at 20s per question: nothing qualifies yet
    let first = result_now(&clock, "bio_001", "biologia", 9, 10, 200.0);
    let completion = manager.process_quiz_completion(&first).unwrap().unwrap();
    assert!(completion.unlocked.is_empty());

    tick(&clock);
    // perfect run in another subject at 6s per question
    let second = result_now(&clock, "mat_001", "matematicas", 10, 10, 60.0);
    let completion = manager.process_quiz_completion(&second).unwrap().unwrap();
    assert_eq!(
        kinds(&completion.unlocked),
        vec![
            AchievementKind::Velocity,
            AchievementKind::Precision,
            AchievementKind::Explorer
        ]
    );

    // Flash 30 + Sharpshooter 10 + Curious 10 uses the whole budget,
    // so the perfectionist grant is refused
    let student = manager.current_student().unwrap().unwrap();
    assert_eq!(student.achievement_points_today, DAILY_ACHIEVEMENT_POINT_CAP);
    assert!(!student.has_achievement("perfectionist_first"));

    // each achievement is granted at most once
    let ids: BTreeSet<&str> = completion
        .unlocked
        .iter()
        .map(|u| u.achievement.id.as_str())
        .collect();
    assert_eq!(ids.len(), completion.unlocked.len());
}

#[test]
fn test_velocity_anti_bot_floor() {
    let clock = ManualClock::new(day(10));
    let (_dir, manager) = registered_manager(&clock);

    // 4.5s per question with a perfect score
    let result = result_now(&clock, "bio_001", "biologia", 10, 10, 45.0);
    let completion = manager.process_quiz_completion(&result).unwrap().unwrap();
    assert!(!kinds(&completion.unlocked).contains(&AchievementKind::Velocity));

    let student = manager.current_student().unwrap().unwrap();
    for achievement in Achievement::of_kind(AchievementKind::Velocity) {
        assert!(!student.has_achievement(achievement.id.as_str()));
    }
}

#[test]
fn test_daily_cap_over_many_quizzes() {
    let clock = ManualClock::new(day(10));
    let (_dir, manager) = registered_manager(&clock);

    let quizzes = [
        ("bio_001", "biologia"),
        ("fis_001", "fisica"),
        ("qui_001", "quimica"),
        ("mat_001", "matematicas"),
        ("bio_002", "biologia"),
        ("fis_002", "fisica"),
    ];

    let mut granted_today = 0;
    for (quiz_id, subject_id) in quizzes {
        let result = result_now(&clock, quiz_id, subject_id, 10, 10, 55.0);
        let completion = manager.process_quiz_completion(&result).unwrap().unwrap();
        granted_today += completion
            .unlocked
            .iter()
            .map(|u| u.achievement.points)
            .sum::<u32>();

        let student = manager.current_student().unwrap().unwrap();
        assert!(student.achievement_points_today <= DAILY_ACHIEVEMENT_POINT_CAP);
        tick(&clock);
    }
    assert!(granted_today <= DAILY_ACHIEVEMENT_POINT_CAP);

    // the budget is available again the next day
    clock.advance_days(1);
    let result = result_now(&clock, "qui_002", "quimica", 10, 10, 55.0);
    let completion = manager.process_quiz_completion(&result).unwrap().unwrap();
    assert!(!completion.unlocked.is_empty());
}

#[test]
fn test_too_many_quizzes_in_one_day_stop_grants() {
    let clock = ManualClock::new(day(10));
    let (_dir, manager) = registered_manager(&clock);

    // 20 failing attempts earn nothing but count toward the daily limit
    for _ in 0..20 {
        let result = result_now(&clock, "bio_001", "biologia", 2, 10, 100.0);
        manager.process_quiz_completion(&result).unwrap();
        tick(&clock);
    }

    let result = result_now(&clock, "mat_001", "matematicas", 10, 10, 100.0);
    let completion = manager.process_quiz_completion(&result).unwrap().unwrap();
    assert!(completion.unlocked.is_empty());

    let student = manager.current_student().unwrap().unwrap();
    assert_eq!(student.daily_quiz_count, 21);
}

#[test]
fn test_streak_law() {
    let clock = ManualClock::new(day(3));
    let (_dir, manager) = registered_manager(&clock);

    for _ in 0..3 {
        let result = result_now(&clock, "bio_001", "biologia", 6, 10, 100.0);
        manager.process_quiz_completion(&result).unwrap();
        clock.advance_days(1);
    }
    let student = manager.current_student().unwrap().unwrap();
    assert_eq!(student.current_streak, 3);

    // gap of several days
    clock.advance_days(3);
    let result = result_now(&clock, "bio_001", "biologia", 6, 10, 100.0);
    manager.process_quiz_completion(&result).unwrap();
    let student = manager.current_student().unwrap().unwrap();
    assert_eq!(student.current_streak, 1);
    assert_eq!(student.best_streak, 3);
}

#[test]
fn test_streak_reward_on_third_day() {
    let clock = ManualClock::new(day(3));
    let (_dir, manager) = registered_manager(&clock);

    let mut last = None;
    for _ in 0..3 {
        let result = result_now(&clock, "bio_001", "biologia", 6, 10, 100.0);
        last = manager.process_quiz_completion(&result).unwrap();
        clock.advance_days(1);
    }

    let completion = last.unwrap();
    assert_eq!(kinds(&completion.unlocked), vec![AchievementKind::Consistency]);
    let student = manager.current_student().unwrap().unwrap();
    assert!(student.has_achievement("consistency_streak_3"));
    assert!(student.last_streak_reward_date.is_some());
}

#[test]
fn test_level_invariant_holds() {
    let clock = ManualClock::new(day(1));
    let (_dir, manager) = registered_manager(&clock);

    let quizzes = ["bio_001", "bio_002", "mat_001", "mat_002"];
    for n in 0..12 {
        let quiz_id = quizzes[n % quizzes.len()];
        let subject = if quiz_id.starts_with("bio") {
            "biologia"
        } else {
            "matematicas"
        };
        let result = result_now(&clock, quiz_id, subject, 5, 5, 40.0);
        manager.process_quiz_completion(&result).unwrap();

        let student = manager.current_student().unwrap().unwrap();
        assert_eq!(student.level, level_for_points(student.total_points));
        assert!(exp_for_level(student.level) <= student.total_points);
        assert!(student.total_points < exp_for_level(student.level + 1));

        clock.advance_days(1);
    }
}

#[test]
fn test_all_subjects_precision_is_unreachable_with_builtin_catalog() {
    let clock = ManualClock::new(day(1));
    let (_dir, manager) = registered_manager(&clock);

    let catalog = quizquest::catalog::QuizCatalog::builtin().unwrap();
    for subject in catalog.subjects() {
        for quiz in &subject.quizzes {
            let result = result_now(&clock, &quiz.id, &subject.id, 5, 5, 40.0);
            manager.process_quiz_completion(&result).unwrap();
            clock.advance_days(1);
        }
    }

    // "computacion" and "geografia" have no quizzes, so this never unlocks
    let student = manager.current_student().unwrap().unwrap();
    assert_eq!(student.subjects_explored_count(), catalog.subjects().len());
    assert!(!student.has_achievement("precision_polymath"));

    let missing: Vec<&str> = PRECISION_REQUIRED_SUBJECTS
        .iter()
        .copied()
        .filter(|id| catalog.subject(id).is_none())
        .collect();
    assert_eq!(missing, vec!["computacion", "geografia"]);
}
