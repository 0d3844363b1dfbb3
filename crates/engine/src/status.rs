//! Progress aggregation over the open week.
//!
//! All functions read through an open connection so the lifecycle can run
//! them inside its rollover transaction.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use sqlx::PgConnection;

use rota_core::progress::progress_bar;
use rota_core::types::DbId;
use rota_core::{CategoryTargets, DomainError};
use rota_db::models::status::InstanceStatus;
use rota_db::models::task_instance::InstanceWithTask;
use rota_db::models::week::Week;
use rota_db::repositories::{PersonRepo, TaskInstanceRepo, WeekRepo};

use crate::error::EngineResult;

/// What a caller wants to do with the tasks it is listing; drives the
/// status filter on selection lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    Complete,
    Amend,
    Ask,
    OptOut,
}

impl TaskAction {
    /// Whether an instance belongs in a selection list for this action.
    fn admits(self, status_id: i16) -> bool {
        match self {
            TaskAction::Complete => status_id == InstanceStatus::Pending.id(),
            TaskAction::Amend => status_id == InstanceStatus::Completed.id(),
            TaskAction::Ask | TaskAction::OptOut => true,
        }
    }
}

/// Per-category completion against its fixed target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryStatus {
    pub completed: i64,
    pub target: i64,
}

/// A completed task and who completed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedTask {
    pub task_name: String,
    pub person_name: Option<String>,
}

/// Full status of the open week.
#[derive(Debug, Clone, Serialize)]
pub struct DetailedStatus {
    pub week: Week,
    pub by_category: BTreeMap<String, CategoryStatus>,
    pub completed_tasks: Vec<CompletedTask>,
    pub completed_count: i64,
    /// Sum of targets for the categories actually present this week.
    pub overall_total: i64,
    pub overall_bar: String,
    /// Every present category meets its target.
    pub done: bool,
    /// Active people with zero completions, in registration order.
    pub not_contributed: Vec<String>,
}

/// Compact status of the open week.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSummary {
    pub week: Week,
    pub completed_count: i64,
    /// Sum of every configured category target.
    pub total: i64,
    pub overall_bar: String,
}

/// Rollover snapshot of a week that is about to close.
#[derive(Debug, Clone, Serialize)]
pub struct WeekSnapshot {
    pub week: Week,
    pub total: i64,
    pub completed_count: i64,
    pub remaining: i64,
    /// Per-person completed counts, largest first.
    pub contributions: Vec<(String, i64)>,
    /// Active people with zero completions, alphabetical.
    pub non_contributors: Vec<String>,
}

/// Category rows for a selection menu.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryProgress {
    /// `None` when no week is open; selection lists render empty then.
    pub week: Option<Week>,
    pub categories: Vec<CategoryCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub completed: i64,
    /// Instances admitted by the requested action, not the weekly target.
    pub total: i64,
}

/// Task rows for a selection menu within one category.
#[derive(Debug, Clone, Serialize)]
pub struct TasksByCategory {
    pub week: Option<Week>,
    pub tasks: Vec<TaskRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRow {
    pub instance_id: DbId,
    pub name: String,
    pub estimated_duration_minutes: Option<i32>,
    pub status_id: i16,
}

fn is_completed(instance: &InstanceWithTask) -> bool {
    instance.status_id == InstanceStatus::Completed.id()
}

/// Detailed status of the open week; `no_active_week` when none is open.
pub async fn detailed_status(
    conn: &mut PgConnection,
    targets: &CategoryTargets,
) -> EngineResult<DetailedStatus> {
    let week = WeekRepo::find_open(&mut *conn)
        .await?
        .ok_or(DomainError::NoActiveWeek)?;

    let instances = TaskInstanceRepo::list_with_tasks(&mut *conn, week.id).await?;
    let completed_tasks: Vec<CompletedTask> =
        TaskInstanceRepo::completed_with_names(&mut *conn, week.id)
            .await?
            .into_iter()
            .map(|(task_name, person_name)| CompletedTask {
                task_name,
                person_name,
            })
            .collect();

    let mut by_category: BTreeMap<String, CategoryStatus> = BTreeMap::new();
    for instance in &instances {
        let entry = by_category
            .entry(instance.category.clone())
            .or_insert(CategoryStatus {
                completed: 0,
                target: targets.target_for(&instance.category),
            });
        if is_completed(instance) {
            entry.completed += 1;
        }
    }

    let completed_count = completed_tasks.len() as i64;
    let overall_total: i64 = by_category.values().map(|status| status.target).sum();
    let done = by_category
        .values()
        .all(|status| status.completed >= status.target);

    let completers: HashSet<DbId> = instances
        .iter()
        .filter(|instance| is_completed(instance))
        .filter_map(|instance| instance.completed_by)
        .collect();
    let not_contributed: Vec<String> = PersonRepo::list_active(&mut *conn)
        .await?
        .into_iter()
        .filter(|person| !completers.contains(&person.id))
        .map(|person| person.name)
        .collect();

    Ok(DetailedStatus {
        overall_bar: progress_bar(completed_count, overall_total),
        week,
        by_category,
        completed_tasks,
        completed_count,
        overall_total,
        done,
        not_contributed,
    })
}

/// Compact status of the open week.
pub async fn status_summary(
    conn: &mut PgConnection,
    targets: &CategoryTargets,
) -> EngineResult<StatusSummary> {
    let week = WeekRepo::find_open(&mut *conn)
        .await?
        .ok_or(DomainError::NoActiveWeek)?;
    let completed_count = TaskInstanceRepo::count_completed(&mut *conn, week.id).await?;
    let total = targets.overall_total();
    Ok(StatusSummary {
        overall_bar: progress_bar(completed_count, total),
        week,
        completed_count,
        total,
    })
}

/// Snapshot of a week for the rollover summary. `None` when the week row
/// cannot be read back.
pub async fn week_snapshot(
    conn: &mut PgConnection,
    targets: &CategoryTargets,
    week_id: DbId,
) -> EngineResult<Option<WeekSnapshot>> {
    let Some(week) = WeekRepo::find_by_id(&mut *conn, week_id).await? else {
        return Ok(None);
    };

    let completed_count = TaskInstanceRepo::count_completed(&mut *conn, week_id).await?;
    let contributions = TaskInstanceRepo::contributions(&mut *conn, week_id).await?;

    let contributed: HashSet<&str> = contributions
        .iter()
        .map(|(name, _)| name.as_str())
        .collect();
    let mut non_contributors: Vec<String> = PersonRepo::list_active(&mut *conn)
        .await?
        .into_iter()
        .filter(|person| !contributed.contains(person.name.as_str()))
        .map(|person| person.name)
        .collect();
    non_contributors.sort();

    let total = targets.overall_total();
    Ok(Some(WeekSnapshot {
        week,
        total,
        completed_count,
        remaining: total - completed_count,
        contributions,
        non_contributors,
    }))
}

/// Per-category instance counts filtered by the requested action.
pub async fn category_progress(
    conn: &mut PgConnection,
    action: TaskAction,
) -> EngineResult<CategoryProgress> {
    let Some(week) = WeekRepo::find_open(&mut *conn).await? else {
        return Ok(CategoryProgress {
            week: None,
            categories: Vec::new(),
        });
    };

    let instances = TaskInstanceRepo::list_with_tasks(&mut *conn, week.id).await?;
    let mut categories: BTreeMap<String, CategoryCount> = BTreeMap::new();
    for instance in &instances {
        let entry = categories
            .entry(instance.category.clone())
            .or_insert_with(|| CategoryCount {
                category: instance.category.clone(),
                completed: 0,
                total: 0,
            });
        if action.admits(instance.status_id) {
            entry.total += 1;
        }
        if is_completed(instance) {
            entry.completed += 1;
        }
    }

    Ok(CategoryProgress {
        week: Some(week),
        categories: categories.into_values().collect(),
    })
}

/// Instances of one category admitted by the action, sorted by task name.
pub async fn tasks_by_category(
    conn: &mut PgConnection,
    category: &str,
    action: TaskAction,
) -> EngineResult<TasksByCategory> {
    let Some(week) = WeekRepo::find_open(&mut *conn).await? else {
        return Ok(TasksByCategory {
            week: None,
            tasks: Vec::new(),
        });
    };

    let tasks: Vec<TaskRow> = TaskInstanceRepo::list_with_tasks(&mut *conn, week.id)
        .await?
        .into_iter()
        .filter(|instance| instance.category == category)
        .filter(|instance| action.admits(instance.status_id))
        .map(|instance| TaskRow {
            instance_id: instance.id,
            name: instance.task_name,
            estimated_duration_minutes: instance.estimated_duration_minutes,
            status_id: instance.status_id,
        })
        .collect();

    Ok(TasksByCategory {
        week: Some(week),
        tasks,
    })
}
