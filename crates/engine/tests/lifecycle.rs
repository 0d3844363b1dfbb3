//! Integration tests for week seeding and rollover.

use assert_matches::assert_matches;
use chrono::{DateTime, TimeZone, Utc};
use sqlx::PgPool;

use rota_core::CategoryTargets;
use rota_db::models::person::RegisterPerson;
use rota_db::models::status::InstanceStatus;
use rota_db::repositories::{PersonRepo, TaskInstanceRepo, WeekRepo};
use rota_db::seed::{seed_task_types, TASK_TYPE_DEFINITIONS};
use rota_engine::lifecycle::{check_and_rollover, ensure_active_week, Rollover};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Tuesday morning, ISO week 3 of 2025. Its deadline is Friday 12:00.
fn tuesday() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 14, 9, 0, 0).unwrap()
}

/// Saturday of the same ISO week, past the Friday 12:00 deadline.
fn saturday() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 18, 9, 0, 0).unwrap()
}

async fn register(pool: &PgPool, external_id: i64, name: &str) -> i64 {
    let input = RegisterPerson {
        external_id,
        name: name.to_string(),
        username: None,
    };
    PersonRepo::register_if_missing(pool, &input).await.unwrap().0.id
}

// ---------------------------------------------------------------------------
// Test: cold start creates the week with one instance per task type
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn ensure_active_week_cold_start(pool: PgPool) {
    seed_task_types(&pool).await.unwrap();

    let ensured = ensure_active_week(&pool, tuesday()).await.unwrap();
    assert!(ensured.week_created);
    assert_eq!(ensured.week.year, 2025);
    assert_eq!(ensured.week.week_number, 3);
    assert_eq!(ensured.created_instances, TASK_TYPE_DEFINITIONS.len() as u64);
    assert_eq!(ensured.total_task_types, TASK_TYPE_DEFINITIONS.len() as i64);

    // Monday 00:00 through Friday 12:00.
    assert_eq!(
        ensured.week.start_at,
        Utc.with_ymd_and_hms(2025, 1, 13, 0, 0, 0).unwrap()
    );
    assert_eq!(
        ensured.week.deadline,
        Utc.with_ymd_and_hms(2025, 1, 17, 12, 0, 0).unwrap()
    );
}

// ---------------------------------------------------------------------------
// Test: a second call in the same ISO week changes nothing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn ensure_active_week_is_idempotent(pool: PgPool) {
    seed_task_types(&pool).await.unwrap();

    let first = ensure_active_week(&pool, tuesday()).await.unwrap();
    let second = ensure_active_week(&pool, tuesday()).await.unwrap();

    assert!(!second.week_created);
    assert_eq!(second.week.id, first.week.id);
    assert_eq!(second.created_instances, 0);

    let instances = TaskInstanceRepo::list_with_tasks(&pool, first.week.id)
        .await
        .unwrap();
    assert_eq!(instances.len(), TASK_TYPE_DEFINITIONS.len());
}

// ---------------------------------------------------------------------------
// Test: rollover is a no-op before the deadline
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn rollover_not_due_before_deadline(pool: PgPool) {
    seed_task_types(&pool).await.unwrap();
    let targets = CategoryTargets::default();

    ensure_active_week(&pool, tuesday()).await.unwrap();
    let outcome = check_and_rollover(&pool, &targets, tuesday()).await.unwrap();
    assert_matches!(outcome, Rollover::NotDue);
}

// ---------------------------------------------------------------------------
// Test: rollover with no open week just starts one
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn rollover_starts_week_when_none_open(pool: PgPool) {
    seed_task_types(&pool).await.unwrap();
    let targets = CategoryTargets::default();

    let outcome = check_and_rollover(&pool, &targets, tuesday()).await.unwrap();
    let ensured = assert_matches!(outcome, Rollover::Started { ensured } => ensured);
    assert!(ensured.week_created);
    assert_eq!(ensured.week.week_number, 3);
}

// ---------------------------------------------------------------------------
// Test: past-deadline rollover closes the week, snapshots stragglers, and
// seeds the successor
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn rollover_past_deadline_with_stragglers(pool: PgPool) {
    seed_task_types(&pool).await.unwrap();
    let targets = CategoryTargets::default();

    let ensured = ensure_active_week(&pool, tuesday()).await.unwrap();
    let old_week_id = ensured.week.id;

    let ana = register(&pool, 100, "Ana").await;
    register(&pool, 200, "Ben").await;
    let instances = TaskInstanceRepo::list_with_tasks(&pool, old_week_id)
        .await
        .unwrap();
    for instance in &instances[..3] {
        TaskInstanceRepo::mark_completed(&pool, instance.id, ana)
            .await
            .unwrap();
    }

    // Saturday is still ISO week 3, so the successor lands on the same
    // identity and the store stays without an open week until the next
    // Monday tick.
    let outcome = check_and_rollover(&pool, &targets, saturday()).await.unwrap();
    let (snapshot, ensured) = assert_matches!(
        outcome,
        Rollover::RolledOver { snapshot, ensured } => (snapshot, ensured)
    );

    assert_eq!(snapshot.week.id, old_week_id);
    assert_eq!(snapshot.completed_count, 3);
    assert_eq!(snapshot.total, targets.overall_total());
    assert_eq!(snapshot.remaining, targets.overall_total() - 3);
    assert_eq!(snapshot.contributions, vec![("Ana".to_string(), 3)]);
    assert_eq!(snapshot.non_contributors, vec!["Ben".to_string()]);

    assert!(!ensured.week_created);
    assert_eq!(ensured.week.id, old_week_id);

    let closed = WeekRepo::find_by_id(&pool, old_week_id)
        .await
        .unwrap()
        .unwrap();
    assert!(closed.closed);
    assert!(WeekRepo::find_open(&pool).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Test: the Monday after a rollover opens a fresh week with a pending set
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn next_monday_opens_fresh_week(pool: PgPool) {
    seed_task_types(&pool).await.unwrap();
    let targets = CategoryTargets::default();

    let ensured = ensure_active_week(&pool, tuesday()).await.unwrap();
    let ana = register(&pool, 100, "Ana").await;
    let first_instance = TaskInstanceRepo::list_with_tasks(&pool, ensured.week.id)
        .await
        .unwrap()[0]
        .id;
    TaskInstanceRepo::mark_completed(&pool, first_instance, ana)
        .await
        .unwrap();

    check_and_rollover(&pool, &targets, saturday()).await.unwrap();

    let monday = Utc.with_ymd_and_hms(2025, 1, 20, 0, 5, 0).unwrap();
    let outcome = check_and_rollover(&pool, &targets, monday).await.unwrap();
    let next = assert_matches!(outcome, Rollover::Started { ensured } => ensured);

    assert!(next.week_created);
    assert_eq!(next.week.week_number, 4);
    let instances = TaskInstanceRepo::list_with_tasks(&pool, next.week.id)
        .await
        .unwrap();
    assert_eq!(instances.len(), TASK_TYPE_DEFINITIONS.len());
    assert!(instances
        .iter()
        .all(|i| i.status_id == InstanceStatus::Pending.id()));
}
