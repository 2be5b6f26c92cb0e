//! Sign-in, snapshot cache and first-day flow

use mq_content::{ContentKind, ContentState};
use mq_core::{AuthError, ControllerError, LocalAuth, Session};
use mq_progress::{Path, UserId};
use mq_test_utils::{daily_reply, day, fitness_reply, Harness};
use pretty_assertions::assert_eq;

fn auth() -> LocalAuth {
    LocalAuth::new().with_token("good-token", UserId::new("tester"))
}

#[tokio::test]
async fn onboarding_then_first_day() {
    let h = Harness::new(day(2024, 6, 3));
    let session = Session::start(&auth(), Some("good-token"), &h.services).await.unwrap();
    assert_eq!(session.user(), &h.user);
    assert!(session.needs_onboarding());
    assert_eq!(session.open_day().await.unwrap(), None);

    session
        .controller()
        .begin_journey(session.user(), "Ada", 3, Path::Resilience)
        .await
        .unwrap();
    assert!(!session.needs_onboarding());
    assert_eq!(session.snapshot().unwrap().display_name, "Ada");

    h.generator.push_ok(daily_reply(Path::Resilience));
    h.generator.push_ok(fitness_reply());
    let report = session.open_day().await.unwrap().unwrap();
    assert!(report.tasks.is_some());
    assert_eq!(session.refresh().state(ContentKind::Tasks), ContentState::Fresh);

    let snapshot = session.snapshot().unwrap();
    assert_eq!(snapshot.daily_content.unwrap().date, day(2024, 6, 3));
    assert_eq!(snapshot.daily_fitness.unwrap().tasks.len(), 5);
}

#[tokio::test]
async fn unknown_token_falls_back_to_anonymous() {
    let h = Harness::new(day(2024, 6, 3));
    let session = Session::start(&auth(), Some("stale-token"), &h.services).await.unwrap();
    assert!(session.user().to_string().starts_with("anon-"));
    assert!(session.needs_onboarding());
}

#[tokio::test]
async fn sign_in_failure_is_an_auth_error() {
    let h = Harness::new(day(2024, 6, 3));
    let err = Session::start(&auth().without_anonymous(), None, &h.services)
        .await
        .unwrap_err();
    assert!(matches!(err, ControllerError::Auth(AuthError::Rejected(_))));
}

#[tokio::test]
async fn snapshot_follows_writes_until_dropped() {
    let h = Harness::new(day(2024, 6, 3));
    let session = Session::start(&auth(), Some("good-token"), &h.services).await.unwrap();
    assert_eq!(h.store.inner().listener_count(&h.user), 1);

    session
        .controller()
        .begin_journey(session.user(), "Ada", 1, Path::Focus)
        .await
        .unwrap();
    session.controller().record_mood(session.user(), 4).await.unwrap();
    assert_eq!(session.snapshot().unwrap().xp, 5);

    drop(session);
    assert_eq!(h.store.inner().listener_count(&h.user), 0);
}
