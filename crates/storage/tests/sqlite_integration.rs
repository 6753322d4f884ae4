use lessons_core::model::{LessonId, ProgressRecord, UserId};
use lessons_core::time::fixed_now;
use storage::repository::{ProgressRepository, ProgressRow, Storage};
use storage::sqlite::SqliteRepository;

fn build_row(user_id: UserId, lesson: &str, completed: bool, score: u32) -> ProgressRow {
    let mut record = ProgressRecord::default();
    if completed {
        record.mark_completed(score);
    }
    ProgressRow::from_record(user_id, LessonId::new(lesson).unwrap(), record, fixed_now())
}

#[tokio::test]
async fn sqlite_roundtrip_persists_progress() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let user = UserId::new_v4();
    repo.upsert_row(&build_row(user, "lesson1", true, 3))
        .await
        .unwrap();
    repo.upsert_row(&build_row(user, "lesson2", false, 0))
        .await
        .unwrap();

    let rows = repo.rows_for_user(user).await.expect("fetch");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].lesson_id.as_str(), "lesson1");
    assert!(rows[0].completed);
    assert!(rows[0].quiz_completed);
    assert_eq!(rows[0].quiz_score, 3);
    assert_eq!(rows[0].current_step, 4);
    assert!(!rows[1].completed);

    let record = rows[0].clone().into_record().unwrap();
    assert!(record.completed());
}

#[tokio::test]
async fn sqlite_upsert_is_idempotent_and_last_write_wins() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_upsert?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let user = UserId::new_v4();
    let row = build_row(user, "lesson1", false, 0);

    repo.upsert_row(&row).await.unwrap();
    repo.upsert_row(&row).await.unwrap();

    let rows = repo.rows_for_user(user).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0], row);

    // A later write for the same key replaces the stored row.
    let passed = build_row(user, "lesson1", true, 5);
    repo.upsert_row(&passed).await.unwrap();

    let rows = repo.rows_for_user(user).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].completed);
    assert_eq!(rows[0].quiz_score, 5);
}

#[tokio::test]
async fn storage_aggregate_connects_and_migrates() {
    let storage = Storage::sqlite("sqlite:file:memdb_aggregate?mode=memory&cache=shared")
        .await
        .expect("storage");

    let user = UserId::new_v4();
    storage
        .progress
        .upsert_row(&build_row(user, "lesson1", false, 0))
        .await
        .unwrap();

    let rows = storage.progress.rows_for_user(user).await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn sqlite_isolates_users() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_users?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let alice = UserId::new_v4();
    let bob = UserId::new_v4();
    repo.upsert_row(&build_row(alice, "lesson1", true, 3))
        .await
        .unwrap();

    assert_eq!(repo.rows_for_user(alice).await.unwrap().len(), 1);
    assert!(repo.rows_for_user(bob).await.unwrap().is_empty());
}
