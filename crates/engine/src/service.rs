//! The service facade consumed by the presentation/transport layer.
//!
//! Every verb is synchronous request/response. Expected domain conditions
//! come back as `EngineError::Domain`; infrastructure faults as
//! `EngineError::Database`. Each mutation is one transaction against the
//! store; there is no observation point between its eligibility reads
//! and its writes.

use chrono::Utc;
use serde::Serialize;

use rota_core::matching::{resolve_by_name, MatchOutcome};
use rota_core::types::{DbId, ExternalId};
use rota_core::{CategoryTargets, DomainError};
use rota_db::models::opt_out::OptOutListing;
use rota_db::models::person::{Person, RegisterPerson};
use rota_db::models::status::{InstanceStatus, LogAction};
use rota_db::models::task_instance::TaskInstance;
use rota_db::models::task_type::TaskType;
use rota_db::models::week::Week;
use rota_db::repositories::{
    CompletionLogRepo, OptOutRepo, PersonRepo, TaskInstanceRepo, TaskTypeRepo, WeekRepo,
};
use rota_db::DbPool;

use crate::error::EngineResult;
use crate::lifecycle::{self, EnsuredWeek, Rollover};
use crate::reminder::{self, ReminderPayload};
use crate::status::{
    self, CategoryProgress, DetailedStatus, StatusSummary, TaskAction, TasksByCategory,
};

const UNKNOWN_TASK: &str = "Unknown task";
const UNKNOWN_PERSON: &str = "Unknown";

/// Result of a successful `complete`.
#[derive(Debug, Clone, Serialize)]
pub struct Completion {
    pub person_name: String,
    pub task_name: String,
    /// The person's completions within this week, including this one.
    pub personal_count: i64,
    /// Overall target total minus the week's completed count.
    pub remaining: i64,
    pub week_id: DbId,
}

/// Result of a successful `amend`.
#[derive(Debug, Clone, Serialize)]
pub struct Amendment {
    pub task_name: String,
    pub amended_by: String,
    pub original_completer: String,
}

/// Result of a successful `create_opt_out`.
#[derive(Debug, Clone, Serialize)]
pub struct OptOutCreated {
    pub person_name: String,
    pub task_name: String,
    pub reason: String,
}

/// One category of the catalog listing with its weekly target.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryCatalog {
    pub category: String,
    pub target: i64,
    pub tasks: Vec<TaskType>,
}

/// A person's stats view.
#[derive(Debug, Clone, Serialize)]
pub struct MyStats {
    pub person: Person,
    pub current_week: Option<Week>,
    /// Task names completed this week, sorted.
    pub week_tasks: Vec<String>,
    pub all_time: i64,
    /// Task names opted out of, sorted.
    pub opt_out_names: Vec<String>,
}

/// The lifecycle engine's front door.
#[derive(Debug, Clone)]
pub struct RotaService {
    pool: DbPool,
    targets: CategoryTargets,
}

impl RotaService {
    pub fn new(pool: DbPool, targets: CategoryTargets) -> Self {
        Self { pool, targets }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn targets(&self) -> &CategoryTargets {
        &self.targets
    }

    // --- People ---

    /// Register-if-missing. Returns the person and whether the row is new.
    pub async fn register_person(
        &self,
        external_id: ExternalId,
        name: &str,
        username: Option<&str>,
    ) -> EngineResult<(Person, bool)> {
        let input = RegisterPerson {
            external_id,
            name: name.to_string(),
            username: username.map(str::to_string),
        };
        Ok(PersonRepo::register_if_missing(&self.pool, &input).await?)
    }

    /// Stats for one person across the open week and all time.
    pub async fn my_stats(&self, external_id: ExternalId) -> EngineResult<MyStats> {
        let mut conn = self.pool.acquire().await?;
        let person = PersonRepo::find_by_external_id(&mut *conn, external_id)
            .await?
            .ok_or(DomainError::NotRegistered)?;

        let current_week = WeekRepo::find_open(&mut *conn).await?;
        let week_tasks = match &current_week {
            Some(week) => {
                TaskInstanceRepo::completed_task_names(&mut *conn, week.id, person.id).await?
            }
            None => Vec::new(),
        };
        let all_time = TaskInstanceRepo::count_all_time_by(&mut *conn, person.id).await?;
        let opt_out_names = OptOutRepo::task_names_for_person(&mut *conn, person.id).await?;

        Ok(MyStats {
            person,
            current_week,
            week_tasks,
            all_time,
            opt_out_names,
        })
    }

    // --- Catalog ---

    /// The full catalog grouped by category with each category's target.
    pub async fn list_task_catalog(&self) -> EngineResult<Vec<CategoryCatalog>> {
        let tasks = TaskTypeRepo::list_all(&self.pool).await?;
        let mut groups: Vec<CategoryCatalog> = Vec::new();
        for task in tasks {
            match groups.last_mut() {
                Some(group) if group.category == task.category => group.tasks.push(task),
                _ => groups.push(CategoryCatalog {
                    target: self.targets.target_for(&task.category),
                    category: task.category.clone(),
                    tasks: vec![task],
                }),
            }
        }
        Ok(groups)
    }

    /// The instance and its task type, for an instructions view.
    pub async fn task_instructions(
        &self,
        instance_id: DbId,
    ) -> EngineResult<Option<(TaskInstance, TaskType)>> {
        let mut conn = self.pool.acquire().await?;
        let Some(instance) = TaskInstanceRepo::find_by_id(&mut *conn, instance_id).await? else {
            return Ok(None);
        };
        let Some(task) = TaskTypeRepo::find_by_id(&mut *conn, instance.task_type_id).await? else {
            return Ok(None);
        };
        Ok(Some((instance, task)))
    }

    // --- Status views ---

    pub async fn detailed_status(&self) -> EngineResult<DetailedStatus> {
        let mut conn = self.pool.acquire().await?;
        status::detailed_status(&mut conn, &self.targets).await
    }

    pub async fn status_summary(&self) -> EngineResult<StatusSummary> {
        let mut conn = self.pool.acquire().await?;
        status::status_summary(&mut conn, &self.targets).await
    }

    pub async fn category_progress(&self, action: TaskAction) -> EngineResult<CategoryProgress> {
        let mut conn = self.pool.acquire().await?;
        status::category_progress(&mut conn, action).await
    }

    pub async fn tasks_by_category(
        &self,
        category: &str,
        action: TaskAction,
    ) -> EngineResult<TasksByCategory> {
        let mut conn = self.pool.acquire().await?;
        status::tasks_by_category(&mut conn, category, action).await
    }

    // --- Transitions ---

    /// pending → completed, atomically. Losing a race against another
    /// completer reports `invalid_task`, exactly like acting on a task
    /// that was already done.
    pub async fn complete(
        &self,
        instance_id: DbId,
        external_id: ExternalId,
        message_ref: Option<i64>,
    ) -> EngineResult<Completion> {
        let mut tx = self.pool.begin().await?;

        let person = PersonRepo::find_by_external_id(&mut *tx, external_id)
            .await?
            .ok_or(DomainError::NotRegistered)?;

        let instance = TaskInstanceRepo::lock_by_id(&mut *tx, instance_id)
            .await?
            .filter(|instance| instance.status_id == InstanceStatus::Pending.id())
            .ok_or(DomainError::InvalidTask)?;

        if let Some(opt_out) =
            OptOutRepo::find_by_person_task(&mut *tx, person.id, instance.task_type_id).await?
        {
            let task_name = TaskTypeRepo::find_by_id(&mut *tx, instance.task_type_id)
                .await?
                .map(|task| task.name)
                .unwrap_or_else(|| UNKNOWN_TASK.to_string());
            return Err(DomainError::OptedOut {
                task_name,
                reason: opt_out.reason,
            }
            .into());
        }

        if !TaskInstanceRepo::mark_completed(&mut *tx, instance.id, person.id).await? {
            return Err(DomainError::InvalidTask.into());
        }
        CompletionLogRepo::append(
            &mut *tx,
            instance.id,
            person.id,
            LogAction::Completed,
            message_ref,
        )
        .await?;

        let week = WeekRepo::find_by_id(&mut *tx, instance.week_id)
            .await?
            .ok_or(DomainError::MissingWeek)?;
        let completed_count = TaskInstanceRepo::count_completed(&mut *tx, week.id).await?;
        let personal_count =
            TaskInstanceRepo::count_completed_by(&mut *tx, week.id, person.id).await?;
        let task_name = TaskTypeRepo::find_by_id(&mut *tx, instance.task_type_id)
            .await?
            .map(|task| task.name)
            .unwrap_or_else(|| UNKNOWN_TASK.to_string());

        tx.commit().await?;

        Ok(Completion {
            person_name: person.name,
            task_name,
            personal_count,
            remaining: self.targets.overall_total() - completed_count,
            week_id: week.id,
        })
    }

    /// completed → pending, atomically. Clears completer and timestamp and
    /// appends an `amended` log entry.
    pub async fn amend(
        &self,
        instance_id: DbId,
        external_id: ExternalId,
        message_ref: Option<i64>,
    ) -> EngineResult<Amendment> {
        let mut tx = self.pool.begin().await?;

        let person = PersonRepo::find_by_external_id(&mut *tx, external_id)
            .await?
            .ok_or(DomainError::NotRegistered)?;

        let instance = TaskInstanceRepo::lock_by_id(&mut *tx, instance_id)
            .await?
            .filter(|instance| instance.status_id == InstanceStatus::Completed.id())
            .ok_or(DomainError::InvalidTask)?;

        let task_name = TaskTypeRepo::find_by_id(&mut *tx, instance.task_type_id)
            .await?
            .map(|task| task.name)
            .unwrap_or_else(|| UNKNOWN_TASK.to_string());
        let original_completer = match instance.completed_by {
            Some(completer_id) => PersonRepo::find_by_id(&mut *tx, completer_id)
                .await?
                .map(|completer| completer.name)
                .unwrap_or_else(|| UNKNOWN_PERSON.to_string()),
            None => UNKNOWN_PERSON.to_string(),
        };

        if !TaskInstanceRepo::mark_pending(&mut *tx, instance.id).await? {
            return Err(DomainError::InvalidTask.into());
        }
        CompletionLogRepo::append(
            &mut *tx,
            instance.id,
            person.id,
            LogAction::Amended,
            message_ref,
        )
        .await?;

        tx.commit().await?;

        Ok(Amendment {
            task_name,
            amended_by: person.name,
            original_completer,
        })
    }

    // --- Opt-outs ---

    /// Record a standing exemption. The task query resolves exact-first
    /// with a deterministic tie-break; equally good candidates surface as
    /// `ambiguous_task` rather than an arbitrary pick.
    pub async fn create_opt_out(
        &self,
        external_id: ExternalId,
        task_query: &str,
        reason: &str,
    ) -> EngineResult<OptOutCreated> {
        let mut tx = self.pool.begin().await?;

        let person = PersonRepo::find_by_external_id(&mut *tx, external_id)
            .await?
            .ok_or(DomainError::NotRegistered)?;

        let catalog = TaskTypeRepo::list_all(&mut *tx).await?;
        let task = match resolve_by_name(&catalog, |task| &task.name, task_query) {
            MatchOutcome::Found(task) => task,
            MatchOutcome::NotFound => {
                return Err(DomainError::TaskNotFound {
                    query: task_query.to_string(),
                }
                .into())
            }
            MatchOutcome::Ambiguous(candidates) => {
                return Err(DomainError::AmbiguousTask {
                    query: task_query.to_string(),
                    candidates,
                }
                .into())
            }
        };

        if let Some(existing) =
            OptOutRepo::find_by_person_task(&mut *tx, person.id, task.id).await?
        {
            return Err(DomainError::AlreadyOptedOut {
                task_name: task.name.clone(),
                reason: existing.reason,
            }
            .into());
        }

        OptOutRepo::insert(&mut *tx, person.id, task.id, reason).await?;
        tx.commit().await?;

        Ok(OptOutCreated {
            person_name: person.name,
            task_name: task.name.clone(),
            reason: reason.to_string(),
        })
    }

    /// All opt-outs, sorted by task then person, optionally filtered by a
    /// task-name substring.
    pub async fn list_opt_outs(
        &self,
        task_filter: Option<&str>,
    ) -> EngineResult<Vec<OptOutListing>> {
        Ok(OptOutRepo::list_detailed(&self.pool, task_filter).await?)
    }

    // --- Lifecycle ---

    pub async fn ensure_active_week(&self) -> EngineResult<EnsuredWeek> {
        lifecycle::ensure_active_week(&self.pool, Utc::now()).await
    }

    pub async fn check_and_rollover(&self) -> EngineResult<Rollover> {
        lifecycle::check_and_rollover(&self.pool, &self.targets, Utc::now()).await
    }

    pub async fn build_reminder_payload(&self) -> EngineResult<ReminderPayload> {
        let mut conn = self.pool.acquire().await?;
        reminder::build_reminder_payload(&mut conn, &self.targets, Utc::now()).await
    }
}
