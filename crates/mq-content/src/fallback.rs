//! Fallback content pools
//!
//! Used whenever generation fails. Each category pool holds exactly one
//! journaling entry, so the result can always be forced to carry exactly one
//! journaling task.

use chrono::NaiveDate;
use mq_progress::{BigQuest, Category, DailyContent, DailyFitness, FitnessTask, Path, Task, TaskId};
use rand::Rng;

/// A pooled small task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolTask {
    /// Task text
    pub text: &'static str,
    /// Whether the task is answered in writing
    pub is_journaling: bool,
}

const fn pool_task(text: &'static str, is_journaling: bool) -> PoolTask {
    PoolTask { text, is_journaling }
}

/// Resilience pool
pub static RESILIENCE_POOL: [PoolTask; 3] = [
    pool_task(
        "Take a moment to identify one small thing you can control right now, and tidy it up.",
        false,
    ),
    pool_task(
        "Write down a challenge you've overcome in the past. What strength did you show?",
        true,
    ),
    pool_task(
        "Think of a time you felt strong. What did that feel like in your body? Try to sit in that feeling for a minute.",
        false,
    ),
];

/// Focus pool
pub static FOCUS_POOL: [PoolTask; 3] = [
    pool_task(
        "For five minutes, put your phone in another room and focus on a single, non-digital task.",
        false,
    ),
    pool_task(
        "Describe a place where you feel calm and focused. What makes it that way?",
        true,
    ),
    pool_task(
        "Listen to a song without any distractions. Try to pick out one instrument and follow it all the way through.",
        false,
    ),
];

/// Positivity pool
pub static POSITIVITY_POOL: [PoolTask; 3] = [
    pool_task(
        "Find something in nature\u{2014}a cloud, a plant, a bird\u{2014}and watch it for a full minute.",
        false,
    ),
    pool_task(
        "Jot down one nice thing someone did for you recently, no matter how small.",
        true,
    ),
    pool_task(
        "Send a quick message to a friend simply saying you're thinking of them.",
        false,
    ),
];

/// Big Quest used when generation fails
pub const FALLBACK_BIG_QUEST: &str = "Spend 10 minutes organizing or simplifying one part of your digital life (like clearing old files or sorting bookmarks), then note how it felt.";

/// Fitness pool, two entries per level 1..=5
pub static FITNESS_POOL: [[&str; 2]; 5] = [
    [
        "Complete 5 minutes of gentle, full-body stretching.",
        "Do 3 minutes of neck, shoulder, and wrist rolls.",
    ],
    [
        "Perform 20 jumping jacks to get your heart rate up.",
        "Do 15 high knees on each side.",
    ],
    [
        "Go for a 10-minute brisk walk, either outside or in place.",
        "Complete 3 sets of 10 bodyweight squats.",
    ],
    [
        "Hold a 45-second plank to engage your core.",
        "Perform 2 sets of 8 push-ups (on knees if needed).",
    ],
    [
        "Follow a 5-minute cool-down stretch video.",
        "Practice 3 minutes of deep belly breathing to relax.",
    ],
];

/// The pool for a category
#[must_use]
pub fn pool(category: Category) -> &'static [PoolTask] {
    match category {
        Category::Resilience => &RESILIENCE_POOL,
        Category::Focus => &FOCUS_POOL,
        Category::Positivity => &POSITIVITY_POOL,
    }
}

fn pick<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> &'a T {
    &items[rng.random_range(0..items.len())]
}

fn pick_matching<R: Rng + ?Sized>(category: Category, journaling: bool, rng: &mut R) -> PoolTask {
    let candidates: Vec<PoolTask> = pool(category)
        .iter()
        .copied()
        .filter(|t| t.is_journaling == journaling)
        .collect();
    *pick(&candidates, rng)
}

/// One pooled task per category with exactly one journaling task.
///
/// With no journaling pick, the Resilience task becomes its pool's
/// journaling entry. With several, the first is kept and the others are
/// redrawn from their pools' non-journaling entries.
pub fn fallback_tasks<R: Rng + ?Sized>(rng: &mut R) -> Vec<PoolTask> {
    let mut picks: Vec<PoolTask> = Category::ALL.iter().map(|c| *pick(pool(*c), rng)).collect();

    let journaling = picks.iter().filter(|t| t.is_journaling).count();
    if journaling == 0 {
        picks[0] = pick_matching(Category::Resilience, true, rng);
    } else if journaling > 1 {
        let mut kept = false;
        for (category, task) in Category::ALL.iter().zip(picks.iter_mut()) {
            if !task.is_journaling {
                continue;
            }
            if kept {
                *task = pick_matching(*category, false, rng);
            } else {
                kept = true;
            }
        }
    }
    picks
}

/// Fallback daily content for `path`
pub fn fallback_daily_content<R: Rng + ?Sized>(path: Path, today: NaiveDate, rng: &mut R) -> DailyContent {
    let tasks = Category::ALL
        .iter()
        .zip(fallback_tasks(rng))
        .map(|(category, t)| Task::new(*category, t.text, t.is_journaling))
        .collect();
    DailyContent {
        date: today,
        tasks,
        big_quest: BigQuest {
            path,
            text: FALLBACK_BIG_QUEST.to_string(),
        },
        all_small_tasks_completed: false,
    }
}

/// Fallback fitness set, one pooled task per level
pub fn fallback_fitness<R: Rng + ?Sized>(today: NaiveDate, rng: &mut R) -> DailyFitness {
    let tasks = FITNESS_POOL
        .iter()
        .zip(1u8..)
        .map(|(options, level)| FitnessTask {
            id: TaskId::new(),
            text: (*pick(options, rng)).to_string(),
            completed: false,
            level,
        })
        .collect();
    DailyFitness { date: today, tasks }
}
