//! Generated-text parsing and validation
//!
//! Replies are expected to be a bare JSON object, possibly wrapped in a
//! markdown code fence. Anything short of the full shape is rejected so the
//! caller can fall back.

use crate::error::ContentError;
use chrono::NaiveDate;
use mq_progress::{BigQuest, Category, DailyContent, DailyFitness, FitnessTask, Path, Task, TaskId};
use serde::Deserialize;

/// Daily small tasks per day
pub const DAILY_TASK_COUNT: usize = 3;

/// Fitness tasks per day, one per level
pub const FITNESS_TASK_COUNT: usize = 5;

#[derive(Debug, Deserialize)]
struct GeneratedDaily {
    daily_tasks: Vec<GeneratedTask>,
    big_quest: GeneratedQuest,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedTask {
    category: String,
    task: String,
    is_journaling: bool,
}

#[derive(Debug, Deserialize)]
struct GeneratedQuest {
    path: String,
    task: String,
}

#[derive(Debug, Deserialize)]
struct GeneratedFitness {
    fitness_tasks: Vec<GeneratedFitnessTask>,
}

#[derive(Debug, Deserialize)]
struct GeneratedFitnessTask {
    level: u8,
    task: String,
}

/// Remove markdown code-fence markers and surrounding whitespace
#[must_use]
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

fn decode<'a, T: Deserialize<'a>>(text: &'a str) -> Result<T, ContentError> {
    serde_json::from_str(text).map_err(|e| {
        if e.is_data() {
            ContentError::Schema(e.to_string())
        } else {
            ContentError::NotJson(e.to_string())
        }
    })
}

fn required_text(text: String, field: &str) -> Result<String, ContentError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ContentError::Schema(format!("{field} is empty")));
    }
    Ok(trimmed.to_string())
}

/// Parse and validate a daily task reply.
///
/// Requires one task per category, exactly one of them journaling, and a
/// Big Quest with a known path and non-empty text. Tasks get fresh ids and
/// are listed in category order.
pub fn parse_daily_content(text: &str, today: NaiveDate) -> Result<DailyContent, ContentError> {
    let cleaned = strip_code_fences(text);
    let generated: GeneratedDaily = decode(&cleaned)?;

    if generated.daily_tasks.len() != DAILY_TASK_COUNT {
        return Err(ContentError::Schema(format!(
            "expected {DAILY_TASK_COUNT} daily tasks, got {}",
            generated.daily_tasks.len()
        )));
    }

    let mut tasks = Vec::with_capacity(DAILY_TASK_COUNT);
    for raw in generated.daily_tasks {
        let category: Category = raw
            .category
            .parse()
            .map_err(|e: mq_progress::ModelError| ContentError::Schema(e.to_string()))?;
        if tasks.iter().any(|t: &Task| t.category == category) {
            return Err(ContentError::Schema(format!("duplicate category {category:?}")));
        }
        let text = required_text(raw.task, "task")?;
        tasks.push(Task::new(category, text, raw.is_journaling));
    }

    let journaling = tasks.iter().filter(|t| t.is_journaling).count();
    if journaling != 1 {
        return Err(ContentError::Schema(format!(
            "expected exactly one journaling task, got {journaling}"
        )));
    }
    tasks.sort_by_key(|t| Category::ALL.iter().position(|c| *c == t.category));

    let path: Path = generated
        .big_quest
        .path
        .parse()
        .map_err(|e: mq_progress::ModelError| ContentError::Schema(e.to_string()))?;
    let big_quest = BigQuest {
        path,
        text: required_text(generated.big_quest.task, "big_quest.task")?,
    };

    Ok(DailyContent {
        date: today,
        tasks,
        big_quest,
        all_small_tasks_completed: false,
    })
}

/// Parse and validate a fitness reply: five tasks covering levels 1 through 5.
pub fn parse_fitness(text: &str, today: NaiveDate) -> Result<DailyFitness, ContentError> {
    let cleaned = strip_code_fences(text);
    let generated: GeneratedFitness = decode(&cleaned)?;

    if generated.fitness_tasks.len() != FITNESS_TASK_COUNT {
        return Err(ContentError::Schema(format!(
            "expected {FITNESS_TASK_COUNT} fitness tasks, got {}",
            generated.fitness_tasks.len()
        )));
    }

    let mut tasks: Vec<FitnessTask> = Vec::with_capacity(FITNESS_TASK_COUNT);
    for raw in generated.fitness_tasks {
        if !(1..=5).contains(&raw.level) {
            return Err(ContentError::Schema(format!("fitness level {} out of range", raw.level)));
        }
        if tasks.iter().any(|t| t.level == raw.level) {
            return Err(ContentError::Schema(format!("duplicate fitness level {}", raw.level)));
        }
        tasks.push(FitnessTask {
            id: TaskId::new(),
            text: required_text(raw.task, "fitness task")?,
            completed: false,
            level: raw.level,
        });
    }
    tasks.sort_by_key(|t| t.level);

    Ok(DailyFitness { date: today, tasks })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    const DAILY: &str = r#"{
        "daily_tasks": [
            {"category": "Focus", "task": "Single-task for ten minutes.", "isJournaling": false},
            {"category": "Resilience", "task": "Write about a hard day you got through.", "isJournaling": true},
            {"category": "Positivity", "task": "Thank someone.", "isJournaling": false}
        ],
        "big_quest": {"path": "resilience", "task": "Plan a small comeback."}
    }"#;

    #[test]
    fn strips_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  {}  "), "{}");
    }

    #[test]
    fn parses_fenced_daily_content() {
        let content = parse_daily_content(&format!("```json\n{DAILY}\n```"), today()).unwrap();
        assert_eq!(content.date, today());
        let categories: Vec<_> = content.tasks.iter().map(|t| t.category).collect();
        assert_eq!(categories, Category::ALL.to_vec());
        assert!(content.tasks[0].is_journaling);
        assert!(content.tasks.iter().all(|t| !t.completed));
        assert_eq!(content.big_quest.path, Path::Resilience);
        assert!(!content.all_small_tasks_completed);
    }

    #[test]
    fn task_ids_are_unique() {
        let content = parse_daily_content(DAILY, today()).unwrap();
        assert_ne!(content.tasks[0].id, content.tasks[1].id);
        assert_ne!(content.tasks[1].id, content.tasks[2].id);
    }

    #[test]
    fn rejects_prose() {
        let err = parse_daily_content("Here are your tasks!", today()).unwrap_err();
        assert!(matches!(err, ContentError::NotJson(_)));
    }

    #[test]
    fn rejects_missing_big_quest() {
        let err = parse_daily_content(r#"{"daily_tasks": []}"#, today()).unwrap_err();
        assert!(matches!(err, ContentError::Schema(_)));
    }

    #[test]
    fn rejects_wrong_journaling_count() {
        let none = DAILY.replace("\"isJournaling\": true", "\"isJournaling\": false");
        assert!(matches!(parse_daily_content(&none, today()), Err(ContentError::Schema(_))));
        let two = DAILY.replace(
            "\"Thank someone.\", \"isJournaling\": false",
            "\"Thank someone.\", \"isJournaling\": true",
        );
        assert!(matches!(parse_daily_content(&two, today()), Err(ContentError::Schema(_))));
    }

    #[test]
    fn rejects_unknown_category_and_blank_text() {
        let unknown = DAILY.replace("\"Focus\"", "\"Calm\"");
        assert!(parse_daily_content(&unknown, today()).is_err());
        let blank = DAILY.replace("Thank someone.", "  ");
        assert!(parse_daily_content(&blank, today()).is_err());
    }

    #[test]
    fn parses_fitness_in_level_order() {
        let raw = r#"{"fitness_tasks": [
            {"level": 3, "task": "Walk."},
            {"level": 1, "task": "Stretch."},
            {"level": 5, "task": "Breathe."},
            {"level": 2, "task": "Jumping jacks."},
            {"level": 4, "task": "Plank."}
        ]}"#;
        let fitness = parse_fitness(raw, today()).unwrap();
        let levels: Vec<u8> = fitness.tasks.iter().map(|t| t.level).collect();
        assert_eq!(levels, vec![1, 2, 3, 4, 5]);
        assert_eq!(fitness.tasks[0].text, "Stretch.");
    }

    #[test]
    fn rejects_short_or_duplicated_fitness() {
        let short = r#"{"fitness_tasks": [{"level": 1, "task": "Stretch."}]}"#;
        assert!(parse_fitness(short, today()).is_err());
        let dup = r#"{"fitness_tasks": [
            {"level": 1, "task": "a"}, {"level": 1, "task": "b"}, {"level": 2, "task": "c"},
            {"level": 3, "task": "d"}, {"level": 4, "task": "e"}
        ]}"#;
        assert!(parse_fitness(dup, today()).is_err());
    }
}
