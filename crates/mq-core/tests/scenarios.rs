//! End-to-end progression scenarios over the in-memory store

use mq_content::ContentSource;
use mq_core::{ControllerError, JournalContext, Notice, StoreError};
use mq_progress::{Category, Mood, NodeId, Path, UserProgress};
use mq_test_utils::{daily_reply, day, fitness_reply, profile, profile_for_today, Harness};
use pretty_assertions::assert_eq;

fn count(h: &Harness, pred: impl Fn(&Notice) -> bool) -> usize {
    h.notices.snapshot().iter().filter(|n| pred(n)).count()
}

async fn next_day(h: &Harness) {
    h.clock.advance_days(1);
    h.generator.push_ok(daily_reply(h.progress().main_path));
    h.generator.push_ok(fitness_reply());
    h.refresh().run(&h.user).await.unwrap();
}

#[tokio::test]
async fn new_user_first_day() {
    let today = day(2024, 6, 3);
    let h = Harness::with_profile(profile_for_today(Path::Resilience, today), today);

    h.finish_small_tasks().await;
    let p = h.progress();
    assert_eq!(p.xp, 30);
    assert_eq!(p.level, 1);
    assert!(p.daily_content.as_ref().unwrap().all_small_tasks_completed);
    assert_eq!(p.unlocked_nodes, vec![NodeId::from("r1")]);
    assert_eq!(p.completed_tasks_history.len(), 3);
    assert_eq!(p.hydration.level, 1);
    assert_eq!(p.journal.len(), 1);

    let outcome = h
        .controller
        .complete_node_task(&h.user, &NodeId::from("r1"))
        .await
        .unwrap();
    let p = h.progress();
    assert_eq!(p.completed_nodes, vec![NodeId::from("r1")]);
    assert_eq!(p.streak, 1);
    assert_eq!(p.last_quest_date, Some(today));
    assert!(outcome.badges.contains(&"first_quest"));
    assert_eq!(p.xp, 30 + 50 + 25 * outcome.badges.len() as u64);
    assert!(p.has_badge("first_quest"));
    assert_eq!(
        p.completed_node_tasks.get("r1-2024-06-03").map(String::as_str),
        Some("Plan one small adventure.")
    );
    assert_eq!(count(&h, |n| matches!(n, Notice::FitnessHubUnlocked)), 1);
}

#[tokio::test]
async fn streak_grows_on_consecutive_days_and_hub_notice_fires_once() {
    let today = day(2024, 6, 3);
    let h = Harness::with_profile(profile_for_today(Path::Focus, today), today);

    h.finish_small_tasks().await;
    h.controller.complete_node_task(&h.user, &NodeId::from("f1")).await.unwrap();

    next_day(&h).await;
    h.finish_small_tasks().await;
    assert_eq!(h.progress().unlocked_nodes, vec![NodeId::from("f1"), NodeId::from("f2")]);
    h.controller.complete_node_task(&h.user, &NodeId::from("f2")).await.unwrap();

    assert_eq!(h.progress().streak, 2);
    assert_eq!(count(&h, |n| matches!(n, Notice::FitnessHubUnlocked)), 1);
}

#[tokio::test]
async fn a_missed_day_resets_the_streak() {
    let today = day(2024, 6, 3);
    let h = Harness::with_profile(profile_for_today(Path::Positivity, today), today);

    h.finish_small_tasks().await;
    h.controller.complete_node_task(&h.user, &NodeId::from("p1")).await.unwrap();

    h.clock.advance_days(1);
    next_day(&h).await;
    h.finish_small_tasks().await;
    h.controller.complete_node_task(&h.user, &NodeId::from("p2")).await.unwrap();

    assert_eq!(h.progress().streak, 1);
}

#[tokio::test]
async fn second_quest_on_the_same_day_is_rejected() {
    let today = day(2024, 6, 3);
    let mut start = profile_for_today(Path::Resilience, today);
    start.unlocked_nodes = vec![NodeId::from("r1")];
    let h = Harness::with_profile(start, today);

    h.finish_small_tasks().await;
    h.controller.complete_node_task(&h.user, &NodeId::from("r1")).await.unwrap();
    let before = h.progress();

    let err = h
        .controller
        .complete_node_task(&h.user, &NodeId::from("r2"))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    let after = h.progress();
    assert_eq!(after.xp, before.xp);
    assert_eq!(after.streak, 1);
    assert_eq!(after.completed_nodes, before.completed_nodes);
}

#[tokio::test]
async fn quest_needs_small_tasks_and_an_unlocked_node() {
    let today = day(2024, 6, 3);
    let h = Harness::with_profile(profile_for_today(Path::Resilience, today), today);

    let err = h.controller.complete_node_task(&h.user, &NodeId::from("r1")).await.unwrap_err();
    assert!(err.is_validation());

    h.finish_small_tasks().await;
    for locked in ["r2", "f1", "fit1"] {
        let err = h
            .controller
            .complete_node_task(&h.user, &NodeId::from(locked))
            .await
            .unwrap_err();
        assert!(err.is_validation(), "{locked}");
    }
    assert!(h.progress().completed_nodes.is_empty());
}

#[tokio::test]
async fn hydration_goal_pays_once() {
    let today = day(2024, 6, 3);
    let h = Harness::with_profile(profile_for_today(Path::Focus, today), today);

    for _ in 0..8 {
        h.controller.log_water_intake(&h.user, false).await.unwrap();
    }
    let p = h.progress();
    assert_eq!(p.hydration.level, 8);
    assert_eq!(p.xp, 20);

    let ninth = h.controller.log_water_intake(&h.user, false).await.unwrap();
    assert_eq!(ninth.xp_awarded, 0);
    assert_eq!(h.progress().xp, 20);
    assert_eq!(h.progress().hydration.level, 8);
    assert_eq!(count(&h, |n| matches!(n, Notice::HydrationGoalReached { .. })), 1);
}

#[tokio::test]
async fn silent_water_log_still_pays_but_says_nothing() {
    let today = day(2024, 6, 3);
    let mut start = profile_for_today(Path::Focus, today);
    start.hydration.level = 7;
    let h = Harness::with_profile(start, today);

    let outcome = h.controller.log_water_intake(&h.user, true).await.unwrap();
    assert_eq!(outcome.xp_awarded, 20);
    assert_eq!(count(&h, |n| matches!(n, Notice::HydrationGoalReached { .. })), 0);
}

#[tokio::test]
async fn mood_check_in_pays_once_per_day_and_overwrites() {
    let today = day(2024, 6, 3);
    let h = Harness::with_profile(profile(Path::Focus), today);

    h.controller.record_mood(&h.user, 5).await.unwrap();
    h.controller.record_mood(&h.user, 3).await.unwrap();

    let p = h.progress();
    assert_eq!(p.xp, 5);
    assert_eq!(p.last_mood_date, Some(today));
    assert_eq!(p.mood_history.len(), 1);
    assert_eq!(p.mood_history[0].mood, 3);
    assert_eq!(count(&h, |n| matches!(n, Notice::MoodPrompt { mood: Mood::Neutral })), 1);
}

#[tokio::test]
async fn invalid_mood_is_rejected_without_writing() {
    let today = day(2024, 6, 3);
    let h = Harness::with_profile(profile(Path::Focus), today);

    let err = h.controller.record_mood(&h.user, 6).await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(h.progress(), profile(Path::Focus));
    assert_eq!(count(&h, |n| matches!(n, Notice::Error(_))), 1);
}

#[tokio::test]
async fn sustained_low_mood_shows_support_once_per_week() {
    let today = day(2024, 6, 3);
    let h = Harness::with_profile(profile(Path::Resilience), today);
    let support = |n: &Notice| matches!(n, Notice::SupportResources { .. });

    h.controller.record_mood(&h.user, 1).await.unwrap();
    h.clock.advance_days(1);
    h.controller.record_mood(&h.user, 2).await.unwrap();
    assert_eq!(count(&h, support), 0);

    h.clock.advance_days(1);
    h.controller.record_mood(&h.user, 1).await.unwrap();
    assert_eq!(count(&h, support), 1);
    assert_eq!(h.progress().last_support_message_date, Some(day(2024, 6, 5)));

    h.clock.advance_days(1);
    h.controller.record_mood(&h.user, 1).await.unwrap();
    assert_eq!(count(&h, support), 1);

    h.clock.advance_days(7);
    h.controller.record_mood(&h.user, 2).await.unwrap();
    assert_eq!(count(&h, support), 2);
    assert_eq!(h.progress().last_support_message_date, Some(day(2024, 6, 13)));
}

#[tokio::test]
async fn journaling_task_needs_ten_characters() {
    let today = day(2024, 6, 3);
    let h = Harness::with_profile(profile_for_today(Path::Focus, today), today);
    let task = h.journaling_task();

    let err = h
        .controller
        .complete_journaling_task(&h.user, task.id, "   too short ")
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(h.progress().journal.is_empty());

    h.controller
        .complete_journaling_task(&h.user, task.id, "  A kind stranger held the door.  ")
        .await
        .unwrap();
    let p = h.progress();
    assert_eq!(p.journal[0].entry, "A kind stranger held the door.");
    assert_eq!(p.journal[0].task_text.as_deref(), Some(task.text.as_str()));
    assert_eq!(p.journal[0].path, Some(Path::Positivity));
    assert_eq!(p.xp, 10);
}

#[tokio::test]
async fn task_guards() {
    let today = day(2024, 6, 3);
    let h = Harness::with_profile(profile_for_today(Path::Focus, today), today);
    let focus = h.task_id(Category::Focus);

    h.controller.complete_simple_task(&h.user, focus).await.unwrap();
    let again = h.controller.complete_simple_task(&h.user, focus).await.unwrap_err();
    assert!(again.is_validation());

    let journaling = h.journaling_task();
    let needs_entry = h.controller.complete_simple_task(&h.user, journaling.id).await.unwrap_err();
    assert!(needs_entry.is_validation());
    assert_eq!(h.progress().xp, 10);

    h.clock.advance_days(1);
    let stale = h
        .controller
        .complete_simple_task(&h.user, h.task_id(Category::Resilience))
        .await
        .unwrap_err();
    assert!(stale.is_validation());
}

#[tokio::test]
async fn six_days_unlock_the_whole_path_and_no_more() {
    let today = day(2024, 6, 3);
    let h = Harness::with_profile(profile_for_today(Path::Resilience, today), today);

    for _ in 0..7 {
        h.finish_small_tasks().await;
        next_day(&h).await;
    }
    let unlocked: Vec<String> = h.progress().unlocked_nodes.iter().map(|n| n.0.clone()).collect();
    assert_eq!(unlocked, vec!["r1", "r2", "r3", "r4", "r5", "r6"]);
}

#[tokio::test]
async fn task_history_is_capped() {
    let today = day(2024, 6, 3);
    let mut start = profile_for_today(Path::Focus, today);
    start.completed_tasks_history = (0..49).map(|i| format!("old {i}")).collect();
    let h = Harness::with_profile(start, today);

    h.finish_small_tasks().await;
    let history = h.progress().completed_tasks_history;
    assert_eq!(history.len(), 50);
    assert_eq!(history[0], "old 2");
    assert_eq!(history[49], "Write about a small kindness.");
}

#[tokio::test]
async fn fitness_set_completion_pays_and_counts() {
    let today = day(2024, 6, 3);
    let h = Harness::with_profile(profile_for_today(Path::Focus, today), today);
    let ids: Vec<_> = h.progress().daily_fitness.unwrap().tasks.iter().map(|t| t.id).collect();

    for id in &ids[..4] {
        let outcome = h.controller.complete_fitness_task(&h.user, *id).await.unwrap();
        assert_eq!(outcome.xp_awarded, 0);
    }
    let last = h.controller.complete_fitness_task(&h.user, ids[4]).await.unwrap();
    assert_eq!(last.badges, vec!["first_steps"]);
    assert_eq!(last.xp_awarded, 50);

    let p = h.progress();
    assert_eq!(p.fitness_completions, 1);
    assert!(p.daily_fitness.unwrap().all_completed());
    assert_eq!(count(&h, |n| matches!(n, Notice::FitnessComplete { xp: 25 })), 1);

    let again = h.controller.complete_fitness_task(&h.user, ids[0]).await.unwrap_err();
    assert!(again.is_validation());
}

#[tokio::test]
async fn editing_an_entry_clears_its_insight() {
    let today = day(2024, 6, 3);
    let h = Harness::with_profile(profile(Path::Focus), today);

    let id = h
        .controller
        .save_journal_entry(&h.user, "I felt stuck at work today.", JournalContext::journal())
        .await
        .unwrap();
    h.generator.push_ok("It sounds like a heavy day.");
    h.controller.generate_journal_insights(&h.user, id).await.unwrap();
    assert_eq!(
        h.progress().journal_entry(id).unwrap().insights.as_deref(),
        Some("It sounds like a heavy day.")
    );
    let written = h.progress().journal_entry(id).unwrap().date;

    h.clock.advance_days(2);
    h.controller
        .update_journal_entry(&h.user, id, "Work felt lighter after a walk.")
        .await
        .unwrap();
    let entry = h.progress().journal_entry(id).cloned().unwrap();
    assert_eq!(entry.entry, "Work felt lighter after a walk.");
    assert_eq!(entry.insights, None);
    assert_eq!(entry.date, written + chrono::Duration::days(2));

    h.generator.push_ok("A walk can change a lot.");
    h.controller.generate_journal_insights(&h.user, id).await.unwrap();
    assert_eq!(
        h.progress().journal_entry(id).unwrap().insights.as_deref(),
        Some("A walk can change a lot.")
    );
    assert!(h.generator.prompts().last().unwrap().contains("Work felt lighter after a walk."));
}

#[tokio::test]
async fn failed_insight_leaves_entry_unchanged() {
    let today = day(2024, 6, 3);
    let h = Harness::with_profile(profile(Path::Focus), today);
    let id = h
        .controller
        .save_journal_entry(&h.user, "Quiet evening.", JournalContext::journal())
        .await
        .unwrap();
    let before = h.progress();

    let err = h.controller.generate_journal_insights(&h.user, id).await.unwrap_err();
    assert!(matches!(err, ControllerError::Generation(_)));
    assert_eq!(h.progress(), before);
    assert_eq!(count(&h, |n| matches!(n, Notice::Error(_))), 1);
}

#[tokio::test]
async fn journal_entries_are_validated_and_badged() {
    let today = day(2024, 6, 3);
    let h = Harness::with_profile(profile(Path::Focus), today);

    let err = h
        .controller
        .save_journal_entry(&h.user, "   ", JournalContext::journal())
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(h.progress().journal.is_empty());

    h.controller
        .save_journal_entry(&h.user, "Feeling down.", JournalContext::mood(Mood::Down))
        .await
        .unwrap();
    let p = h.progress();
    assert_eq!(p.journal[0].mood, Some(2));
    assert!(p.has_badge("scribe"));
    assert_eq!(p.xp, 25);
}

#[tokio::test]
async fn deleting_an_entry() {
    let today = day(2024, 6, 3);
    let h = Harness::with_profile(profile(Path::Focus), today);
    let id = h
        .controller
        .save_journal_entry(&h.user, "To be removed.", JournalContext::journal())
        .await
        .unwrap();

    h.controller.delete_journal_entry(&h.user, id).await.unwrap();
    assert!(h.progress().journal.is_empty());
    assert!(h.controller.delete_journal_entry(&h.user, id).await.unwrap_err().is_validation());
    assert!(h.progress().has_badge("scribe"));
}

#[tokio::test]
async fn write_failure_is_reported_and_nothing_changes() {
    let today = day(2024, 6, 3);
    let h = Harness::with_profile(profile_for_today(Path::Focus, today), today);
    let before = h.progress();
    h.store.set_failing(true);

    let err = h
        .controller
        .complete_simple_task(&h.user, h.task_id(Category::Focus))
        .await
        .unwrap_err();
    assert!(matches!(err, ControllerError::Store(StoreError::Backend(_))));
    assert_eq!(h.progress(), before);
    assert!(h
        .notices
        .snapshot()
        .contains(&Notice::Error("Could not complete the task. Please try again.".into())));
}

#[tokio::test]
async fn missing_profile_is_not_found() {
    let h = Harness::new(day(2024, 6, 3));
    let err = h.controller.record_mood(&h.user, 3).await.unwrap_err();
    assert!(matches!(err, ControllerError::Store(StoreError::NotFound(_))));
}

#[tokio::test]
async fn begin_journey_creates_once() {
    let h = Harness::new(day(2024, 6, 3));

    let err = h.controller.begin_journey(&h.user, "  ", 1, Path::Focus).await.unwrap_err();
    assert!(err.is_validation());
    assert!(h.store.inner().get(&h.user).is_none());

    let created = h.controller.begin_journey(&h.user, " Ada ", 2, Path::Focus).await.unwrap();
    assert_eq!(created.display_name, "Ada");
    assert_eq!(created.level, 1);
    assert_eq!(created.hydration.level, 0);

    let again = h.controller.begin_journey(&h.user, "Bob", 1, Path::Resilience).await.unwrap_err();
    assert!(matches!(again, ControllerError::Store(StoreError::AlreadyExists(_))));
    let stored: UserProgress = h.progress();
    assert_eq!(stored.display_name, "Ada");
    assert_eq!(stored.main_path, Path::Focus);
}

#[tokio::test]
async fn unknown_avatar_is_rejected() {
    let h = Harness::new(day(2024, 6, 3));
    let err = h.controller.begin_journey(&h.user, "Ada", 9, Path::Focus).await.unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn refresh_falls_back_on_server_error() {
    let today = day(2024, 6, 3);
    let h = Harness::with_profile(profile(Path::Focus), today);

    let report = h.refresh().run(&h.user).await.unwrap();
    assert!(matches!(report.tasks, Some(ContentSource::Fallback { .. })));
    assert!(matches!(report.fitness, Some(ContentSource::Fallback { .. })));
    assert!(report.hydration_reset);

    let p = h.progress();
    let content = p.daily_content.unwrap();
    assert_eq!(content.date, today);
    assert_eq!(content.tasks.len(), 3);
    assert_eq!(content.tasks.iter().filter(|t| t.is_journaling).count(), 1);
    assert_eq!(p.daily_fitness.unwrap().tasks.len(), 5);
    assert_eq!(count(&h, |n| matches!(n, Notice::Fallback { .. })), 2);
}

#[tokio::test]
async fn refresh_uses_generated_content_and_skips_fresh_days() {
    let today = day(2024, 6, 3);
    let mut start = profile(Path::Positivity);
    start.completed_tasks_history = vec!["Call a friend.".into()];
    let h = Harness::with_profile(start, today);
    h.generator.push_ok(format!("```json\n{}\n```", daily_reply(Path::Positivity)));
    h.generator.push_ok(fitness_reply());

    let report = h.refresh().run(&h.user).await.unwrap();
    assert_eq!(report.tasks, Some(ContentSource::Generated));
    assert_eq!(report.fitness, Some(ContentSource::Generated));
    let prompts = h.generator.prompts();
    assert!(prompts[0].contains("- Call a friend."));
    assert!(prompts[0].contains("Monday, 2024-06-03"));

    let second = h.refresh().run(&h.user).await.unwrap();
    assert_eq!(second.tasks, None);
    assert_eq!(second.fitness, None);
    assert!(!second.hydration_reset);
    assert_eq!(h.generator.prompts().len(), 2);
}

#[tokio::test]
async fn refresh_resets_yesterdays_hydration() {
    let today = day(2024, 6, 3);
    let mut start = profile_for_today(Path::Focus, today);
    start.hydration.level = 6;
    let h = Harness::with_profile(start, today);

    h.clock.advance_days(1);
    let report = h.refresh().run(&h.user).await.unwrap();
    assert!(report.hydration_reset);
    let hydration = h.progress().hydration;
    assert_eq!(hydration.level, 0);
    assert_eq!(hydration.last_log_date, Some(day(2024, 6, 4)));
}
