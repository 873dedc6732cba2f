//! Achievement definitions and metadata
//!
//! All achievements are defined here with their unlock criteria and rewards.
//! The catalog is immutable; [`AchievementIndex`] provides id and kind lookups
//! built once on first use.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Subjects that must all have a qualifying result for
/// [`Criterion::PrecisionAllSubjects`].
///
/// "computacion" and "geografia" are not offered by the built-in catalog, so
/// the achievement using this set cannot currently be earned.
pub const PRECISION_REQUIRED_SUBJECTS: &[&str] =
    &["biologia", "matematicas", "computacion", "geografia"];

/// Unique identifier for each achievement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AchievementId {
    // Velocity
    Sprinter,
    Lightning,
    Flash,

    // Precision
    Sharpshooter,
    SteadyAim,
    Polymath,

    // Consistency
    Streak3,
    Streak7,
    Streak30,

    // Explorer
    Curious,
    Explorer,

    // Perfectionist
    FirstPerfect,
    PerfectCollection,
    Flawless,
}

impl AchievementId {
    /// Get the string ID used in persisted student records
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sprinter => "velocity_sprinter",
            Self::Lightning => "velocity_lightning",
            Self::Flash => "velocity_flash",
            Self::Sharpshooter => "precision_sharpshooter",
            Self::SteadyAim => "precision_steady_aim",
            Self::Polymath => "precision_polymath",
            Self::Streak3 => "consistency_streak_3",
            Self::Streak7 => "consistency_streak_7",
            Self::Streak30 => "consistency_streak_30",
            Self::Curious => "explorer_curious",
            Self::Explorer => "explorer_explorer",
            Self::FirstPerfect => "perfectionist_first",
            Self::PerfectCollection => "perfectionist_collection",
            Self::Flawless => "perfectionist_flawless",
        }
    }

    /// Parse from a persisted string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "velocity_sprinter" => Some(Self::Sprinter),
            "velocity_lightning" => Some(Self::Lightning),
            "velocity_flash" => Some(Self::Flash),
            "precision_sharpshooter" => Some(Self::Sharpshooter),
            "precision_steady_aim" => Some(Self::SteadyAim),
            "precision_polymath" => Some(Self::Polymath),
            "consistency_streak_3" => Some(Self::Streak3),
            "consistency_streak_7" => Some(Self::Streak7),
            "consistency_streak_30" => Some(Self::Streak30),
            "explorer_curious" => Some(Self::Curious),
            "explorer_explorer" => Some(Self::Explorer),
            "perfectionist_first" => Some(Self::FirstPerfect),
            "perfectionist_collection" => Some(Self::PerfectCollection),
            "perfectionist_flawless" => Some(Self::Flawless),
            _ => None,
        }
    }
}

impl std::fmt::Display for AchievementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Achievement category, also the unit of "one grant per evaluation"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementKind {
    Velocity,
    Precision,
    Consistency,
    Explorer,
    Perfectionist,
}

impl AchievementKind {
    /// Evaluation order
    pub const ALL: [AchievementKind; 5] = [
        Self::Velocity,
        Self::Precision,
        Self::Consistency,
        Self::Explorer,
        Self::Perfectionist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Velocity => "velocity",
            Self::Precision => "precision",
            Self::Consistency => "consistency",
            Self::Explorer => "explorer",
            Self::Perfectionist => "perfectionist",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Velocity => "Velocity",
            Self::Precision => "Precision",
            Self::Consistency => "Consistency",
            Self::Explorer => "Explorer",
            Self::Perfectionist => "Perfectionist",
        }
    }
}

/// Cosmetic tier; has no effect on granting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Bronze,
    Silver,
    Gold,
}

impl Difficulty {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
        }
    }
}

/// Typed unlock rule. Accuracies are percentages (0-100).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Criterion {
    Velocity {
        max_seconds_per_question: f64,
        min_accuracy: f64,
    },
    Precision {
        min_accuracy: f64,
        min_questions: u32,
    },
    /// The last `required_quizzes` results all meet `min_accuracy`
    PrecisionStreak {
        required_quizzes: usize,
        min_accuracy: f64,
    },
    /// Every subject in [`PRECISION_REQUIRED_SUBJECTS`] has a qualifying result
    PrecisionAllSubjects { min_accuracy: f64 },
    Consistency { required_days: u32 },
    Explorer { required_subjects: usize },
    Perfectionist {
        required_perfect: usize,
        /// Count repeated perfect runs of the same quiz
        allow_retries: bool,
    },
    PerfectAbsolute {
        min_accuracy: f64,
        max_seconds_per_question: f64,
    },
}

/// Achievement definition with all metadata
#[derive(Debug, Clone)]
pub struct Achievement {
    pub id: AchievementId,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub points: u32,
    pub difficulty: Difficulty,
    pub kind: AchievementKind,
    pub criterion: Criterion,
}

/// All achievement definitions
pub static ACHIEVEMENTS: &[Achievement] = &[
    // === VELOCITY ===
    Achievement {
        id: AchievementId::Sprinter,
        title: "Sprinter",
        description: "Pass a quiz averaging 15 seconds or less per question",
        icon: "hare",
        points: 10,
        difficulty: Difficulty::Bronze,
        kind: AchievementKind::Velocity,
        criterion: Criterion::Velocity {
            max_seconds_per_question: 15.0,
            min_accuracy: 70.0,
        },
    },
    Achievement {
        id: AchievementId::Lightning,
        title: "Lightning",
        description: "Score 80% or more averaging 10 seconds or less per question",
        icon: "bolt",
        points: 20,
        difficulty: Difficulty::Silver,
        kind: AchievementKind::Velocity,
        criterion: Criterion::Velocity {
            max_seconds_per_question: 10.0,
            min_accuracy: 80.0,
        },
    },
    Achievement {
        id: AchievementId::Flash,
        title: "Flash",
        description: "Score 90% or more averaging 8 seconds or less per question",
        icon: "bolt.circle",
        points: 30,
        difficulty: Difficulty::Gold,
        kind: AchievementKind::Velocity,
        criterion: Criterion::Velocity {
            max_seconds_per_question: 8.0,
            min_accuracy: 90.0,
        },
    },
    // === PRECISION ===
    Achievement {
        id: AchievementId::Sharpshooter,
        title: "Sharpshooter",
        description: "Get every answer right in a quiz of 5 or more questions",
        icon: "target",
        points: 10,
        difficulty: Difficulty::Bronze,
        kind: AchievementKind::Precision,
        criterion: Criterion::Precision {
            min_accuracy: 100.0,
            min_questions: 5,
        },
    },
    Achievement {
        id: AchievementId::SteadyAim,
        title: "Steady Aim",
        description: "Score 90% or more in 3 quizzes in a row",
        icon: "scope",
        points: 20,
        difficulty: Difficulty::Silver,
        kind: AchievementKind::Precision,
        criterion: Criterion::PrecisionStreak {
            required_quizzes: 3,
            min_accuracy: 90.0,
        },
    },
    Achievement {
        id: AchievementId::Polymath,
        title: "Polymath",
        description: "Score 90% or more in biology, math, computing and geography",
        icon: "graduationcap",
        points: 30,
        difficulty: Difficulty::Gold,
        kind: AchievementKind::Precision,
        criterion: Criterion::PrecisionAllSubjects { min_accuracy: 90.0 },
    },
    // === CONSISTENCY ===
    Achievement {
        id: AchievementId::Streak3,
        title: "On a Roll",
        description: "Study 3 days in a row",
        icon: "flame",
        points: 10,
        difficulty: Difficulty::Bronze,
        kind: AchievementKind::Consistency,
        criterion: Criterion::Consistency { required_days: 3 },
    },
    Achievement {
        id: AchievementId::Streak7,
        title: "Week Warrior",
        description: "Study 7 days in a row",
        icon: "flame.fill",
        points: 20,
        difficulty: Difficulty::Silver,
        kind: AchievementKind::Consistency,
        criterion: Criterion::Consistency { required_days: 7 },
    },
    Achievement {
        id: AchievementId::Streak30,
        title: "Unstoppable",
        description: "Study 30 days in a row",
        icon: "calendar",
        points: 40,
        difficulty: Difficulty::Gold,
        kind: AchievementKind::Consistency,
        criterion: Criterion::Consistency { required_days: 30 },
    },
    // === EXPLORER ===
    Achievement {
        id: AchievementId::Curious,
        title: "Curious Mind",
        description: "Take quizzes in 2 different subjects",
        icon: "map",
        points: 10,
        difficulty: Difficulty::Bronze,
        kind: AchievementKind::Explorer,
        criterion: Criterion::Explorer {
            required_subjects: 2,
        },
    },
    Achievement {
        id: AchievementId::Explorer,
        title: "Explorer",
        description: "Take quizzes in 4 different subjects",
        icon: "globe",
        points: 25,
        difficulty: Difficulty::Gold,
        kind: AchievementKind::Explorer,
        criterion: Criterion::Explorer {
            required_subjects: 4,
        },
    },
    // === PERFECTIONIST ===
    Achievement {
        id: AchievementId::FirstPerfect,
        title: "First Perfect",
        description: "Finish a quiz with a perfect score",
        icon: "star",
        points: 10,
        difficulty: Difficulty::Bronze,
        kind: AchievementKind::Perfectionist,
        criterion: Criterion::Perfectionist {
            required_perfect: 1,
            allow_retries: true,
        },
    },
    Achievement {
        id: AchievementId::PerfectCollection,
        title: "Perfect Collection",
        description: "Get a perfect score in 5 different quizzes",
        icon: "star.square",
        points: 30,
        difficulty: Difficulty::Gold,
        kind: AchievementKind::Perfectionist,
        criterion: Criterion::Perfectionist {
            required_perfect: 5,
            allow_retries: false,
        },
    },
    Achievement {
        id: AchievementId::Flawless,
        title: "Flawless",
        description: "Get a perfect score averaging 6 seconds or less per question",
        icon: "crown",
        points: 25,
        difficulty: Difficulty::Gold,
        kind: AchievementKind::Perfectionist,
        criterion: Criterion::PerfectAbsolute {
            min_accuracy: 100.0,
            max_seconds_per_question: 6.0,
        },
    },
];

/// Lookup tables over [`ACHIEVEMENTS`]
pub struct AchievementIndex {
    by_id: HashMap<&'static str, &'static Achievement>,
    by_kind: HashMap<AchievementKind, Vec<&'static Achievement>>,
}

static INDEX: Lazy<AchievementIndex> = Lazy::new(|| AchievementIndex::build(ACHIEVEMENTS));

impl AchievementIndex {
    /// Build the index. Entries keep catalog order within a kind, except
    /// velocity which is sorted by points, highest first.
    pub fn build(catalog: &'static [Achievement]) -> Self {
        let mut by_id = HashMap::new();
        let mut by_kind: HashMap<AchievementKind, Vec<&'static Achievement>> = HashMap::new();

        for achievement in catalog {
            by_id.insert(achievement.id.as_str(), achievement);
            by_kind.entry(achievement.kind).or_default().push(achievement);
        }

        if let Some(velocity) = by_kind.get_mut(&AchievementKind::Velocity) {
            velocity.sort_by(|a, b| b.points.cmp(&a.points));
        }

        Self { by_id, by_kind }
    }

    pub fn get(&self, id: &str) -> Option<&'static Achievement> {
        self.by_id.get(id).copied()
    }

    pub fn of_kind(&self, kind: AchievementKind) -> &[&'static Achievement] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Achievement {
    /// Process-wide index over the built-in catalog
    pub fn index() -> &'static AchievementIndex {
        &INDEX
    }

    /// Get achievement definition by persisted string ID
    pub fn get(id: &str) -> Option<&'static Achievement> {
        INDEX.get(id)
    }

    /// Definitions of one kind, in evaluation order
    pub fn of_kind(kind: AchievementKind) -> &'static [&'static Achievement] {
        INDEX.of_kind(kind)
    }

    /// Get total number of achievements
    pub fn total_count() -> usize {
        ACHIEVEMENTS.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_roundtrip() {
        for achievement in ACHIEVEMENTS {
            let id = achievement.id.as_str();
            assert_eq!(AchievementId::from_str(id), Some(achievement.id));
            assert_eq!(Achievement::get(id).map(|a| a.id), Some(achievement.id));
        }
        assert!(Achievement::get("unknown").is_none());
    }

    #[test]
    fn test_criterion_matches_kind() {
        for achievement in ACHIEVEMENTS {
            let expected = match achievement.criterion {
                Criterion::Velocity { .. } => AchievementKind::Velocity,
                Criterion::Precision { .. }
                | Criterion::PrecisionStreak { .. }
                | Criterion::PrecisionAllSubjects { .. } => AchievementKind::Precision,
                Criterion::Consistency { .. } => AchievementKind::Consistency,
                Criterion::Explorer { .. } => AchievementKind::Explorer,
                Criterion::Perfectionist { .. } | Criterion::PerfectAbsolute { .. } => {
                    AchievementKind::Perfectionist
                }
            };
            assert_eq!(achievement.kind, expected, "{}", achievement.id);
        }
    }

    #[test]
    fn test_velocity_sorted_by_points_desc() {
        let points: Vec<u32> = Achievement::of_kind(AchievementKind::Velocity)
            .iter()
            .map(|a| a.points)
            .collect();
        assert_eq!(points, vec![30, 20, 10]);
    }

    #[test]
    fn test_other_kinds_keep_catalog_order() {
        let ids: Vec<AchievementId> = Achievement::of_kind(AchievementKind::Precision)
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(
            ids,
            vec![
                AchievementId::Sharpshooter,
                AchievementId::SteadyAim,
                AchievementId::Polymath
            ]
        );
    }

    #[test]
    fn test_every_kind_has_entries() {
        for kind in AchievementKind::ALL {
            assert!(!Achievement::of_kind(kind).is_empty(), "{}", kind.as_str());
        }
        assert_eq!(Achievement::total_count(), 14);
    }
}
