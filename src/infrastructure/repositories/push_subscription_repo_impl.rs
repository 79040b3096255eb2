// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::repositories::push_subscription_repository::{
    PushSubscription, PushSubscriptionRepository,
};
use crate::domain::repositories::task_repository::RepositoryError;
use crate::infrastructure::database::entities::push_subscription;

/// 推送订阅仓库实现
#[derive(Clone)]
pub struct PushSubscriptionRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl PushSubscriptionRepositoryImpl {
    /// 创建新的推送订阅仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<push_subscription::Model> for PushSubscription {
    fn from(model: push_subscription::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            endpoint: model.endpoint,
            p256dh: model.p256dh,
            auth: model.auth,
            created_at: model.created_at,
        }
    }
}

#[async_trait]
impl PushSubscriptionRepository for PushSubscriptionRepositoryImpl {
    async fn upsert(
        &self,
        user_id: Uuid,
        endpoint: &str,
        p256dh: &str,
        auth: &str,
    ) -> Result<PushSubscription, RepositoryError> {
        let existing = push_subscription::Entity::find()
            .filter(push_subscription::Column::Endpoint.eq(endpoint))
            .one(self.db.as_ref())
            .await?;

        let saved = match existing {
            Some(model) => {
                let mut active: push_subscription::ActiveModel = model.into();
                active.user_id = Set(user_id);
                active.p256dh = Set(p256dh.to_string());
                active.auth = Set(auth.to_string());
                active.update(self.db.as_ref()).await?
            }
            None => {
                let model = push_subscription::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(user_id),
                    endpoint: Set(endpoint.to_string()),
                    p256dh: Set(p256dh.to_string()),
                    auth: Set(auth.to_string()),
                    created_at: Set(Utc::now().fixed_offset()),
                };
                model.insert(self.db.as_ref()).await?
            }
        };

        Ok(saved.into())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<PushSubscription>, RepositoryError> {
        let models = push_subscription::Entity::find()
            .filter(push_subscription::Column::UserId.eq(user_id))
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn delete_by_endpoint(&self, endpoint: &str) -> Result<(), RepositoryError> {
        push_subscription::Entity::delete_many()
            .filter(push_subscription::Column::Endpoint.eq(endpoint))
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }
}
