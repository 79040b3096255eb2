// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::{extract::Path, Extension, Json};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::application::dto::task_request::{AssignTaskDto, UpdateTaskStatusDto};
use crate::domain::models::task::{TaskEvent, TaskStatus};
use crate::domain::repositories::plan_repository::PlanRepository;
use crate::domain::repositories::task_repository::{RepositoryError, TaskRepository};
use crate::domain::services::stats_service::StatsService;
use crate::infrastructure::metrics;
use crate::presentation::errors::AppError;
use crate::presentation::middleware::auth_middleware::CurrentUser;

/// 列出计划内的任务（按模型返回顺序）
pub async fn list_tasks(
    Extension(tasks): Extension<Arc<dyn TaskRepository>>,
    Path(plan_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let tasks = tasks.list_by_plan(plan_id).await?;
    Ok(Json(json!(tasks)))
}

/// 任务状态转换端点
///
/// 每次转换都追加一条事件日志行。完成转换会驱动统计更新，
/// 并在计划的全部任务进入终态时把计划标记为完成。
pub async fn update_task_status(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(tasks): Extension<Arc<dyn TaskRepository>>,
    Extension(plans): Extension<Arc<dyn PlanRepository>>,
    Extension(stats): Extension<Arc<StatsService>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTaskStatusDto>,
) -> Result<Json<Value>, AppError> {
    payload.validate()?;

    let task = tasks.find_by_id(id).await?.ok_or(RepositoryError::NotFound)?;

    let task = task.transition(payload.status, payload.actual_minutes)?;
    let task = tasks.update(&task).await?;

    let event = TaskEvent {
        id: Uuid::new_v4(),
        task_id: task.id,
        user_id: user.id,
        event_type: task.status,
        metadata: json!({ "actual_minutes": payload.actual_minutes }),
        created_at: Utc::now().into(),
    };
    tasks.record_event(&event).await?;
    metrics::record_task_transition(&task.status.to_string());

    if task.status == TaskStatus::Completed {
        let plan = plans
            .find_by_id(task.plan_id)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        stats
            .record_completion(user.id, plan.home_id, 1, task.minutes_for_stats())
            .await?;

        // Close out the plan when nothing actionable remains
        let siblings = tasks.list_by_plan(task.plan_id).await?;
        if siblings.iter().all(|t| t.status.is_terminal()) {
            let total_actual: i32 = siblings
                .iter()
                .filter(|t| t.status == TaskStatus::Completed)
                .map(|t| t.minutes_for_stats())
                .sum();
            let finished = plan.finish(total_actual);
            plans.update(&finished).await?;
            info!(plan = %finished.id, "Plan completed");
        }
    }

    Ok(Json(json!(task)))
}

/// 任务指派端点
pub async fn assign_task(
    Extension(tasks): Extension<Arc<dyn TaskRepository>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignTaskDto>,
) -> Result<Json<Value>, AppError> {
    let task = tasks.set_assignee(id, payload.assignee_id).await?;
    Ok(Json(json!(task)))
}
