use std::sync::Arc;

use lessons_core::catalog::Catalog;
use lessons_core::model::{Lesson, LessonId, ProgressSnapshot, QuizQuestion, Section, UserId};
use lessons_core::time::fixed_clock;
use services::{
    LearningLoopService, LessonStep, ProgressService, QuizAdvance, QuizNav, SessionError,
    SnapshotSource, StaticIdentity,
};
use storage::repository::{
    InMemoryRepository, ProgressRepository, ProgressRow, Storage, StorageError,
};

fn lesson(n: u32) -> Lesson {
    Lesson::new(
        LessonId::new(format!("lesson{n}")).unwrap(),
        format!("Lesson {n}"),
        "short",
        Section::new("Intro", "intro body").unwrap(),
        Section::new("Rules", "rules body").unwrap(),
        Section::new("Examples", "examples body").unwrap(),
    )
    .unwrap()
}

fn quiz(n: u32) -> (LessonId, Vec<QuizQuestion>) {
    let id = LessonId::new(format!("lesson{n}")).unwrap();
    let questions = (0..3)
        .map(|i| {
            QuizQuestion::new(format!("Q{i}"), vec!["a".into(), "b".into(), "c".into()], 1)
                .unwrap()
        })
        .collect();
    (id, questions)
}

fn catalog() -> Arc<Catalog> {
    Arc::new(
        Catalog::new(
            vec![lesson(1), lesson(2), lesson(3)],
            vec![quiz(1), quiz(2), quiz(3)],
        )
        .unwrap(),
    )
}

fn loop_service(progress: ProgressService) -> LearningLoopService {
    LearningLoopService::new(fixed_clock(), catalog(), progress)
}

fn lesson_id(n: u32) -> LessonId {
    LessonId::new(format!("lesson{n}")).unwrap()
}

/// Answer every question of the active quiz with the given option.
fn answer_all(session: &mut services::LessonSession, option: usize) {
    while session.step() != LessonStep::Quiz {
        session.next();
    }
    for _ in 0..session.total_questions() {
        session.select_answer(option).unwrap();
        session.navigate_quiz(QuizNav::Next).unwrap();
    }
}

struct FailingRepository;

#[async_trait::async_trait]
impl ProgressRepository for FailingRepository {
    async fn upsert_row(&self, _row: &ProgressRow) -> Result<(), StorageError> {
        Err(StorageError::Connection("remote unavailable".into()))
    }

    async fn rows_for_user(&self, _user_id: UserId) -> Result<Vec<ProgressRow>, StorageError> {
        Err(StorageError::Connection("remote unavailable".into()))
    }
}

#[tokio::test]
async fn empty_snapshot_unlocks_only_first_lesson() {
    let repo = Arc::new(InMemoryRepository::new());
    let svc = loop_service(ProgressService::new(repo));
    let user = UserId::new_v4();

    let load = svc.load_progress(user).await;
    assert_eq!(load.source(), SnapshotSource::Remote);

    let snapshot = load.into_snapshot();
    assert_eq!(svc.unlocked_lessons(&snapshot), vec![lesson_id(1)]);
    assert_eq!(svc.completion_percent(&snapshot), 0);
}

#[tokio::test]
async fn passing_quiz_unlocks_next_lesson_and_persists() {
    let repo = Arc::new(InMemoryRepository::new());
    let svc = loop_service(ProgressService::new(repo.clone()));
    let user = UserId::new_v4();

    let mut snapshot = svc.load_progress(user).await.into_snapshot();
    let mut session = svc.open_lesson(lesson_id(1), &snapshot).unwrap();
    answer_all(&mut session, 1);

    let completion = svc.finish_quiz(user, &mut snapshot, &session).await.unwrap();
    assert!(completion.outcome.passed());
    assert_eq!(completion.outcome.score(), 3);
    let report = completion.save.expect("passing result is persisted");
    assert!(report.is_complete());

    assert!(snapshot.get(&lesson_id(1)).completed());
    assert_eq!(
        svc.unlocked_lessons(&snapshot),
        vec![lesson_id(1), lesson_id(2)]
    );
    assert_eq!(svc.completion_percent(&snapshot), 33);

    // A fresh load sees the durable state, including the stored score.
    let reloaded = svc.load_progress(user).await.into_snapshot();
    let record = reloaded.get(&lesson_id(1));
    assert!(record.completed());
    assert!(record.quiz_completed());
    assert_eq!(record.quiz_score(), 3);
    assert!(svc.open_lesson(lesson_id(2), &reloaded).is_ok());
}

#[tokio::test]
async fn failing_quiz_keeps_lesson_locked_and_saves_nothing() {
    let repo = Arc::new(InMemoryRepository::new());
    let svc = loop_service(ProgressService::new(repo.clone()));
    let user = UserId::new_v4();

    let mut snapshot = svc.load_progress(user).await.into_snapshot();
    let mut session = svc.open_lesson(lesson_id(1), &snapshot).unwrap();

    // One of three correct: score 1, below the threshold of 3.
    while session.step() != LessonStep::Quiz {
        session.next();
    }
    session.select_answer(1).unwrap();
    session.navigate_quiz(QuizNav::Next).unwrap();
    session.select_answer(0).unwrap();
    session.navigate_quiz(QuizNav::Next).unwrap();
    session.select_answer(0).unwrap();
    let advance = session.navigate_quiz(QuizNav::Next).unwrap();
    assert!(matches!(advance, QuizAdvance::Finished(o) if !o.passed()));

    let completion = svc.finish_quiz(user, &mut snapshot, &session).await.unwrap();
    assert!(!completion.outcome.passed());
    assert!(completion.save.is_none());

    assert!(!snapshot.get(&lesson_id(1)).completed());
    assert!(matches!(
        svc.open_lesson(lesson_id(2), &snapshot),
        Err(SessionError::Locked(_))
    ));
    assert_eq!(repo.row_count().unwrap(), 0);

    // The failed attempt can be retried with a clean slate.
    session.retry().unwrap();
    assert_eq!(session.answered_count(), 0);
}

#[tokio::test]
async fn opening_locked_lesson_is_rejected() {
    let svc = loop_service(ProgressService::new(Storage::in_memory().progress));
    let snapshot = ProgressSnapshot::new();

    let err = svc.open_lesson(lesson_id(2), &snapshot).unwrap_err();
    assert!(matches!(err, SessionError::Locked(_)));
}

#[tokio::test]
async fn remote_failure_degrades_to_default_snapshot() {
    let svc = loop_service(ProgressService::new(Arc::new(FailingRepository)));
    let user = UserId::new_v4();

    let load = svc.load_progress(user).await;
    assert_eq!(load.source(), SnapshotSource::Default);
    assert!(load.source().is_degraded());

    let snapshot = load.into_snapshot();
    assert_eq!(snapshot.len(), 3);
    assert_eq!(snapshot.completed_count(), 0);
    assert_eq!(svc.unlocked_lessons(&snapshot), vec![lesson_id(1)]);
}

#[tokio::test]
async fn remote_failure_falls_back_to_cached_progress() {
    let cache = Arc::new(InMemoryRepository::new());
    let user = UserId::new_v4();

    // Seed the cache as a previous successful session would have.
    {
        let seeded = loop_service(ProgressService::new(cache.clone()));
        let mut snapshot = seeded.load_progress(user).await.into_snapshot();
        let mut session = seeded.open_lesson(lesson_id(1), &snapshot).unwrap();
        answer_all(&mut session, 1);
        seeded
            .finish_quiz(user, &mut snapshot, &session)
            .await
            .unwrap();
    }

    let svc = loop_service(
        ProgressService::new(Arc::new(FailingRepository)).with_cache(cache),
    );
    let load = svc.load_progress(user).await;
    assert_eq!(load.source(), SnapshotSource::Cache);

    let snapshot = load.into_snapshot();
    assert!(snapshot.get(&lesson_id(1)).completed());
    assert!(svc.open_lesson(lesson_id(2), &snapshot).is_ok());
}

#[tokio::test]
async fn save_failures_are_reported_per_lesson() {
    let cache = Arc::new(InMemoryRepository::new());
    let svc = loop_service(
        ProgressService::new(Arc::new(FailingRepository)).with_cache(cache.clone()),
    );
    let user = UserId::new_v4();

    let mut snapshot = svc.load_progress(user).await.into_snapshot();
    let mut session = svc.open_lesson(lesson_id(1), &snapshot).unwrap();
    answer_all(&mut session, 1);

    let completion = svc.finish_quiz(user, &mut snapshot, &session).await.unwrap();
    let report = completion.save.expect("pass attempts a save");
    assert!(!report.is_complete());
    // Every lesson entry is attempted independently and reported.
    assert_eq!(report.failed().len(), 3);
    assert!(report.saved().is_empty());

    // The mirrored cache still has the completion, so a degraded reload
    // does not lose the just-earned progress.
    let reloaded = svc.load_progress(user).await;
    assert_eq!(reloaded.source(), SnapshotSource::Cache);
    assert!(reloaded.snapshot().get(&lesson_id(1)).completed());
}

#[tokio::test]
async fn identity_gate_requires_signed_in_user() {
    let repo = Arc::new(InMemoryRepository::new());
    let svc = loop_service(ProgressService::new(repo));

    let err = svc
        .load_progress_for(&StaticIdentity::signed_out())
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::NotSignedIn));

    let user = UserId::new_v4();
    let load = svc
        .load_progress_for(&StaticIdentity::signed_in(user))
        .await
        .unwrap();
    assert_eq!(load.source(), SnapshotSource::Remote);
}

#[tokio::test]
async fn finishing_without_revealed_result_is_rejected() {
    let repo = Arc::new(InMemoryRepository::new());
    let svc = loop_service(ProgressService::new(repo));
    let user = UserId::new_v4();

    let mut snapshot = svc.load_progress(user).await.into_snapshot();
    let session = svc.open_lesson(lesson_id(1), &snapshot).unwrap();

    let err = svc
        .finish_quiz(user, &mut snapshot, &session)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::ResultNotRevealed));
}
