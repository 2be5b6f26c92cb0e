//! Badge rule set
//!
//! Badges are a static table of pure predicates over a [`UserProgress`]
//! snapshot. Only the resulting id is ever persisted.

use crate::path::NODES_PER_PATH;
use crate::types::UserProgress;

/// Flat XP bonus for every newly earned badge
pub const BADGE_BONUS_XP: u64 = 25;

/// Grouping shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeCategory {
    /// Big Quest milestones
    Quests,
    /// Journal milestones
    Journaling,
    /// Streak milestones
    Consistency,
    /// Fitness milestones
    Fitness,
}

/// A badge and its unlock rule
#[derive(Debug, Clone, Copy)]
pub struct Badge {
    /// Persisted identifier
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// What earns it
    pub description: &'static str,
    /// Dashboard grouping
    pub category: BadgeCategory,
    /// Unlock predicate
    pub check: fn(&UserProgress) -> bool,
}

impl Badge {
    /// Evaluate the predicate
    #[inline]
    #[must_use]
    pub fn is_satisfied(&self, snapshot: &UserProgress) -> bool {
        (self.check)(snapshot)
    }

    /// Look up a badge by id
    #[must_use]
    pub fn find(id: &str) -> Option<&'static Badge> {
        BADGES.iter().find(|b| b.id == id)
    }
}

/// The full catalog, in evaluation order
pub static BADGES: [Badge; 10] = [
    Badge {
        id: "first_quest",
        name: "First Quest",
        description: "Complete your first Big Quest.",
        category: BadgeCategory::Quests,
        check: |p| !p.completed_nodes.is_empty(),
    },
    Badge {
        id: "pathfinder",
        name: "Pathfinder",
        description: "Complete 3 Big Quests.",
        category: BadgeCategory::Quests,
        check: |p| p.completed_nodes.len() >= 3,
    },
    Badge {
        id: "trailblazer",
        name: "Trailblazer",
        description: "Complete all nodes on your path.",
        category: BadgeCategory::Quests,
        check: |p| p.completed_path_nodes() >= NODES_PER_PATH,
    },
    Badge {
        id: "scribe",
        name: "Scribe",
        description: "Write your first journal entry.",
        category: BadgeCategory::Journaling,
        check: |p| !p.journal.is_empty(),
    },
    Badge {
        id: "diarist",
        name: "Diarist",
        description: "Write 5 journal entries.",
        category: BadgeCategory::Journaling,
        check: |p| p.journal.len() >= 5,
    },
    Badge {
        id: "storyteller",
        name: "Storyteller",
        description: "Write 15 journal entries.",
        category: BadgeCategory::Journaling,
        check: |p| p.journal.len() >= 15,
    },
    Badge {
        id: "week_streak",
        name: "Week Streak",
        description: "Maintain a 7-day quest streak.",
        category: BadgeCategory::Consistency,
        check: |p| p.streak >= 7,
    },
    Badge {
        id: "month_streak",
        name: "Month Streak",
        description: "Maintain a 30-day quest streak.",
        category: BadgeCategory::Consistency,
        check: |p| p.streak >= 30,
    },
    Badge {
        id: "first_steps",
        name: "First Steps",
        description: "Complete your first day of fitness challenges.",
        category: BadgeCategory::Fitness,
        check: |p| p.daily_fitness.as_ref().is_some_and(|f| f.all_completed()),
    },
    Badge {
        id: "energizer",
        name: "Energizer",
        description: "Complete fitness challenges 5 times.",
        category: BadgeCategory::Fitness,
        check: |p| p.fitness_completions >= 5,
    },
];

/// Badges whose predicate holds for `snapshot` and that it does not hold yet.
#[must_use]
pub fn newly_earned(snapshot: &UserProgress) -> Vec<&'static Badge> {
    BADGES
        .iter()
        .filter(|b| !snapshot.has_badge(b.id) && b.is_satisfied(snapshot))
        .collect()
}

/// Badges held by `snapshot`, in catalog order
#[must_use]
pub fn earned(snapshot: &UserProgress) -> Vec<&'static Badge> {
    BADGES.iter().filter(|b| snapshot.has_badge(b.id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::NodeId;
    use crate::types::{DailyFitness, FitnessTask, JournalEntry, JournalSource, TaskId};
    use chrono::{NaiveDate, Utc};

    fn ids(badges: &[&Badge]) -> Vec<&'static str> {
        badges.iter().map(|b| b.id).collect()
    }

    #[test]
    fn empty_profile_earns_nothing() {
        assert!(newly_earned(&UserProgress::default()).is_empty());
    }

    #[test]
    fn held_badges_are_not_reported_again() {
        let mut p = UserProgress::default();
        p.completed_nodes.push(NodeId::from("r1"));
        assert_eq!(ids(&newly_earned(&p)), vec!["first_quest"]);
        p.badges.push("first_quest".into());
        assert!(newly_earned(&p).is_empty());
    }

    #[test]
    fn journal_milestones() {
        let mut p = UserProgress::default();
        for _ in 0..5 {
            p.journal.push(JournalEntry::new("x", JournalSource::Journal, Utc::now()));
        }
        assert_eq!(ids(&newly_earned(&p)), vec!["scribe", "diarist"]);
    }

    #[test]
    fn trailblazer_ignores_fitness_nodes() {
        let mut p = UserProgress::default();
        p.completed_nodes = ["r1", "r2", "r3", "r4", "r5", "fit1"].into_iter().map(NodeId::from).collect();
        assert!(!Badge::find("trailblazer").unwrap().is_satisfied(&p));
        p.completed_nodes.push(NodeId::from("r6"));
        assert!(Badge::find("trailblazer").unwrap().is_satisfied(&p));
    }

    #[test]
    fn first_steps_needs_a_non_empty_completed_set() {
        let mut p = UserProgress::default();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        p.daily_fitness = Some(DailyFitness { date, tasks: vec![] });
        assert!(!Badge::find("first_steps").unwrap().is_satisfied(&p));
        p.daily_fitness = Some(DailyFitness {
            date,
            tasks: (1..=5)
                .map(|level| FitnessTask {
                    id: TaskId::new(),
                    text: "move".into(),
                    completed: true,
                    level,
                })
                .collect(),
        });
        assert!(Badge::find("first_steps").unwrap().is_satisfied(&p));
    }

    #[test]
    fn catalog_ids_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for badge in &BADGES {
            assert!(seen.insert(badge.id), "duplicate {}", badge.id);
        }
    }
}
