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

use crate::domain::models::task::{Task, TaskEvent};
use crate::domain::repositories::task_repository::{RepositoryError, TaskRepository};
use crate::infrastructure::database::entities::{task as task_entity, task_event};
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// 任务仓库实现
///
/// 基于SeaORM实现的任务与任务事件数据访问层
#[derive(Clone)]
pub struct TaskRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl TaskRepositoryImpl {
    /// 创建新的任务仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn string_vec(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

impl From<task_entity::Model> for Task {
    fn from(model: task_entity::Model) -> Self {
        Self {
            id: model.id,
            plan_id: model.plan_id,
            room_id: model.room_id,
            title: model.title,
            description_steps: string_vec(&model.description_steps),
            category: model.category.parse().unwrap_or_default(),
            priority: model.priority,
            estimated_minutes: model.estimated_minutes,
            actual_minutes: model.actual_minutes,
            difficulty: model.difficulty,
            supplies: string_vec(&model.supplies),
            safety_notes: string_vec(&model.safety_notes),
            status: model.status.parse().unwrap_or_default(),
            assignee_id: model.assignee_id,
            sort_order: model.sort_order,
            started_at: model.started_at,
            completed_at: model.completed_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Task> for task_entity::ActiveModel {
    fn from(task: Task) -> Self {
        Self {
            id: Set(task.id),
            plan_id: Set(task.plan_id),
            room_id: Set(task.room_id),
            title: Set(task.title.clone()),
            description_steps: Set(json!(task.description_steps)),
            category: Set(task.category.to_string()),
            priority: Set(task.priority),
            estimated_minutes: Set(task.estimated_minutes),
            actual_minutes: Set(task.actual_minutes),
            difficulty: Set(task.difficulty),
            supplies: Set(json!(task.supplies)),
            safety_notes: Set(json!(task.safety_notes)),
            status: Set(task.status.to_string()),
            assignee_id: Set(task.assignee_id),
            sort_order: Set(task.sort_order),
            started_at: Set(task.started_at),
            completed_at: Set(task.completed_at),
            created_at: Set(task.created_at),
            updated_at: Set(task.updated_at),
        }
    }
}

#[async_trait]
impl TaskRepository for TaskRepositoryImpl {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, RepositoryError> {
        let model = task_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn list_by_plan(&self, plan_id: Uuid) -> Result<Vec<Task>, RepositoryError> {
        let models = task_entity::Entity::find()
            .filter(task_entity::Column::PlanId.eq(plan_id))
            .order_by_asc(task_entity::Column::SortOrder)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update(&self, task: &Task) -> Result<Task, RepositoryError> {
        let model: task_entity::ActiveModel = task.clone().into();
        let updated_model = model.update(self.db.as_ref()).await?;
        Ok(updated_model.into())
    }

    async fn set_assignee(
        &self,
        id: Uuid,
        assignee_id: Option<Uuid>,
    ) -> Result<Task, RepositoryError> {
        let model = task_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let mut active: task_entity::ActiveModel = model.into();
        active.assignee_id = Set(assignee_id);
        active.updated_at = Set(chrono::Utc::now().into());

        let updated = active.update(self.db.as_ref()).await?;
        Ok(updated.into())
    }

    async fn record_event(&self, event: &TaskEvent) -> Result<(), RepositoryError> {
        let model = task_event::ActiveModel {
            id: Set(event.id),
            task_id: Set(event.task_id),
            user_id: Set(event.user_id),
            event_type: Set(event.event_type.to_string()),
            metadata: Set(event.metadata.clone()),
            created_at: Set(event.created_at),
        };

        model.insert(self.db.as_ref()).await?;
        Ok(())
    }
}
