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

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::plan::{Plan, PlanStatus};
use crate::domain::models::scan::Scan;
use crate::domain::repositories::plan_repository::{PlanAcceptance, PlanRepository};
use crate::domain::repositories::task_repository::RepositoryError;
use crate::infrastructure::database::entities::{plan, scan, task};

/// 计划仓库实现
///
/// 接受一次分析是跨三张表的写入，在单个事务中完成
#[derive(Clone)]
pub struct PlanRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl PlanRepositoryImpl {
    /// 创建新的计划仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<plan::Model> for Plan {
    fn from(model: plan::Model) -> Self {
        Self {
            id: model.id,
            scan_id: model.scan_id,
            room_id: model.room_id,
            home_id: model.home_id,
            user_id: model.user_id,
            name: model.name,
            status: model.status.parse().unwrap_or_default(),
            is_template: model.is_template,
            total_estimated_minutes: model.total_estimated_minutes,
            total_actual_minutes: model.total_actual_minutes,
            started_at: model.started_at,
            completed_at: model.completed_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<scan::Model> for Scan {
    fn from(model: scan::Model) -> Self {
        Self {
            id: model.id,
            room_id: model.room_id,
            user_id: model.user_id,
            image_url: model.image_url,
            thumbnail_url: model.thumbnail_url,
            ai_model: model.ai_model,
            ai_raw_json: model.ai_raw_json,
            score_before: model.score_before,
            score_after: model.score_after,
            keep_image: model.keep_image,
            created_at: model.created_at,
        }
    }
}

#[async_trait]
impl PlanRepository for PlanRepositoryImpl {
    async fn accept_analysis(
        &self,
        acceptance: PlanAcceptance,
    ) -> Result<(Scan, Plan), RepositoryError> {
        let txn = self.db.begin().await?;
        let now = Utc::now().fixed_offset();
        let analysis = &acceptance.analysis;

        let scan_model = scan::ActiveModel {
            id: Set(Uuid::new_v4()),
            room_id: Set(acceptance.room_id),
            user_id: Set(acceptance.user_id),
            image_url: Set(acceptance.image_url.clone()),
            thumbnail_url: Set(None),
            ai_model: Set(acceptance.ai_model.clone()),
            ai_raw_json: Set(serde_json::to_value(analysis).unwrap_or_default()),
            score_before: Set(Some(analysis.before_score as i32)),
            score_after: Set(None),
            keep_image: Set(acceptance.image_url.is_some()),
            created_at: Set(now),
        };
        let inserted_scan = scan_model.insert(&txn).await?;

        let plan_model = plan::ActiveModel {
            id: Set(Uuid::new_v4()),
            scan_id: Set(Some(inserted_scan.id)),
            room_id: Set(acceptance.room_id),
            home_id: Set(acceptance.home_id),
            user_id: Set(acceptance.user_id),
            name: Set(acceptance.plan_name.clone()),
            status: Set(PlanStatus::Active.to_string()),
            is_template: Set(false),
            total_estimated_minutes: Set(analysis.total_estimated_minutes as i32),
            total_actual_minutes: Set(None),
            started_at: Set(None),
            completed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let inserted_plan = plan_model.insert(&txn).await?;

        // Tasks keep the model's returned order as an explicit sort key
        for (index, proposed) in analysis.tasks.iter().enumerate() {
            let task_model = task::ActiveModel {
                id: Set(Uuid::new_v4()),
                plan_id: Set(inserted_plan.id),
                room_id: Set(acceptance.room_id),
                title: Set(proposed.title.clone()),
                description_steps: Set(json!(proposed.description_steps)),
                category: Set(proposed.category.to_string()),
                priority: Set(proposed.priority as i32),
                estimated_minutes: Set(proposed.estimated_minutes as i32),
                actual_minutes: Set(None),
                difficulty: Set(proposed.difficulty as i32),
                supplies: Set(json!(proposed.supplies)),
                safety_notes: Set(json!(proposed.safety_notes)),
                status: Set("pending".to_string()),
                assignee_id: Set(None),
                sort_order: Set(index as i32),
                started_at: Set(None),
                completed_at: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
            };
            task_model.insert(&txn).await?;
        }

        txn.commit().await?;
        Ok((inserted_scan.into(), inserted_plan.into()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Plan>, RepositoryError> {
        let model = plan::Entity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(model.map(Into::into))
    }

    async fn list_by_home(&self, home_id: Uuid) -> Result<Vec<Plan>, RepositoryError> {
        let models = plan::Entity::find()
            .filter(plan::Column::HomeId.eq(home_id))
            .order_by_desc(plan::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update(&self, updated: &Plan) -> Result<Plan, RepositoryError> {
        let model = plan::Entity::find_by_id(updated.id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let mut active: plan::ActiveModel = model.into();
        active.name = Set(updated.name.clone());
        active.status = Set(updated.status.to_string());
        active.total_estimated_minutes = Set(updated.total_estimated_minutes);
        active.total_actual_minutes = Set(updated.total_actual_minutes);
        active.started_at = Set(updated.started_at);
        active.completed_at = Set(updated.completed_at);
        active.updated_at = Set(Utc::now().fixed_offset());

        let saved = active.update(self.db.as_ref()).await?;
        Ok(saved.into())
    }
}
