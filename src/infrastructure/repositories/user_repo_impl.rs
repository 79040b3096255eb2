// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::user::{SubscriptionStatus, SubscriptionTier, UserProfile};
use crate::domain::repositories::task_repository::RepositoryError;
use crate::domain::repositories::user_repository::UserRepository;
use crate::infrastructure::database::entities::user;

/// 用户仓库实现
#[derive(Clone)]
pub struct UserRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl UserRepositoryImpl {
    /// 创建新的用户仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<user::Model> for UserProfile {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            full_name: model.full_name,
            avatar_url: model.avatar_url,
            subscription_tier: model.subscription_tier.parse().unwrap_or_default(),
            subscription_status: model
                .subscription_status
                .as_deref()
                .and_then(|s| s.parse::<SubscriptionStatus>().ok()),
            billing_customer_id: model.billing_customer_id,
            trial_ends_at: model.trial_ends_at,
            scans_this_month: model.scans_this_month,
            last_scan_reset: model.last_scan_reset,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, RepositoryError> {
        let model = user::Entity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(model.map(Into::into))
    }

    async fn ensure_exists(&self, id: Uuid, email: &str) -> Result<UserProfile, RepositoryError> {
        if let Some(existing) = user::Entity::find_by_id(id).one(self.db.as_ref()).await? {
            return Ok(existing.into());
        }

        let now = Utc::now().fixed_offset();
        let model = user::ActiveModel {
            id: Set(id),
            email: Set(email.to_string()),
            full_name: Set(None),
            avatar_url: Set(None),
            subscription_tier: Set(SubscriptionTier::Free.to_string()),
            subscription_status: Set(None),
            billing_customer_id: Set(None),
            trial_ends_at: Set(None),
            scans_this_month: Set(0),
            last_scan_reset: Set(Utc::now().date_naive()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = model.insert(self.db.as_ref()).await?;
        Ok(inserted.into())
    }

    async fn increment_scans(&self, id: Uuid) -> Result<(), RepositoryError> {
        let model = user::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let scans = model.scans_this_month;
        let mut active: user::ActiveModel = model.into();
        active.scans_this_month = Set(scans + 1);
        active.updated_at = Set(Utc::now().fixed_offset());
        active.update(self.db.as_ref()).await?;

        Ok(())
    }

    async fn find_by_billing_customer(
        &self,
        customer_id: &str,
    ) -> Result<Option<UserProfile>, RepositoryError> {
        let model = user::Entity::find()
            .filter(user::Column::BillingCustomerId.eq(customer_id))
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn set_billing_customer(
        &self,
        id: Uuid,
        customer_id: &str,
    ) -> Result<(), RepositoryError> {
        let model = user::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let mut active: user::ActiveModel = model.into();
        active.billing_customer_id = Set(Some(customer_id.to_string()));
        active.updated_at = Set(Utc::now().fixed_offset());
        active.update(self.db.as_ref()).await?;

        Ok(())
    }

    async fn update_subscription(
        &self,
        id: Uuid,
        tier: SubscriptionTier,
        status: Option<SubscriptionStatus>,
        trial_ends_at: Option<DateTime<FixedOffset>>,
    ) -> Result<(), RepositoryError> {
        let model = user::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let mut active: user::ActiveModel = model.into();
        active.subscription_tier = Set(tier.to_string());
        active.subscription_status = Set(status.map(|s| s.to_string()));
        active.trial_ends_at = Set(trial_ends_at);
        active.updated_at = Set(Utc::now().fixed_offset());
        active.update(self.db.as_ref()).await?;

        Ok(())
    }
}
