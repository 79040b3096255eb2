// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::home::{Home, HomeMember, MemberRole};
use crate::domain::repositories::home_repository::HomeRepository;
use crate::domain::repositories::task_repository::RepositoryError;
use crate::infrastructure::database::entities::{home, home_member};

/// 家庭仓库实现
#[derive(Clone)]
pub struct HomeRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl HomeRepositoryImpl {
    /// 创建新的家庭仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<home::Model> for Home {
    fn from(model: home::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            owner_id: model.owner_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<home_member::Model> for HomeMember {
    fn from(model: home_member::Model) -> Self {
        Self {
            id: model.id,
            home_id: model.home_id,
            user_id: model.user_id,
            role: model.role.parse().unwrap_or_default(),
            invited_email: model.invited_email,
            invite_token: model.invite_token,
            joined_at: model.joined_at,
            created_at: model.created_at,
        }
    }
}

#[async_trait]
impl HomeRepository for HomeRepositoryImpl {
    async fn create(&self, name: &str, owner_id: Uuid) -> Result<Home, RepositoryError> {
        let txn = self.db.begin().await?;
        let now = Utc::now().fixed_offset();

        let home_model = home::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            owner_id: Set(owner_id),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let inserted = home_model.insert(&txn).await?;

        let membership = home_member::ActiveModel {
            id: Set(Uuid::new_v4()),
            home_id: Set(inserted.id),
            user_id: Set(Some(owner_id)),
            role: Set(MemberRole::Owner.to_string()),
            invited_email: Set(None),
            invite_token: Set(None),
            joined_at: Set(Some(now)),
            created_at: Set(now),
        };
        membership.insert(&txn).await?;

        txn.commit().await?;
        Ok(inserted.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Home>, RepositoryError> {
        let model = home::Entity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(model.map(Into::into))
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Home>, RepositoryError> {
        let memberships = home_member::Entity::find()
            .filter(home_member::Column::UserId.eq(user_id))
            .all(self.db.as_ref())
            .await?;

        let home_ids: Vec<Uuid> = memberships.iter().map(|m| m.home_id).collect();
        if home_ids.is_empty() {
            return Ok(vec![]);
        }

        let homes = home::Entity::find()
            .filter(home::Column::Id.is_in(home_ids))
            .all(self.db.as_ref())
            .await?;

        Ok(homes.into_iter().map(Into::into).collect())
    }

    async fn find_membership(
        &self,
        home_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<HomeMember>, RepositoryError> {
        let model = home_member::Entity::find()
            .filter(home_member::Column::HomeId.eq(home_id))
            .filter(home_member::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn has_any_membership(&self, user_id: Uuid) -> Result<bool, RepositoryError> {
        let count = home_member::Entity::find()
            .filter(home_member::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await?;
        Ok(count > 0)
    }

    async fn list_members(&self, home_id: Uuid) -> Result<Vec<HomeMember>, RepositoryError> {
        let models = home_member::Entity::find()
            .filter(home_member::Column::HomeId.eq(home_id))
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn create_invite(
        &self,
        home_id: Uuid,
        invited_email: &str,
        invite_token: &str,
    ) -> Result<HomeMember, RepositoryError> {
        let model = home_member::ActiveModel {
            id: Set(Uuid::new_v4()),
            home_id: Set(home_id),
            user_id: Set(None),
            role: Set(MemberRole::Member.to_string()),
            invited_email: Set(Some(invited_email.to_string())),
            invite_token: Set(Some(invite_token.to_string())),
            joined_at: Set(None),
            created_at: Set(Utc::now().fixed_offset()),
        };

        let inserted = model.insert(self.db.as_ref()).await?;
        Ok(inserted.into())
    }

    async fn find_invite(
        &self,
        invite_token: &str,
    ) -> Result<Option<HomeMember>, RepositoryError> {
        let model = home_member::Entity::find()
            .filter(home_member::Column::InviteToken.eq(invite_token))
            .filter(home_member::Column::UserId.is_null())
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn redeem_invite(
        &self,
        invite_token: &str,
        user_id: Uuid,
    ) -> Result<HomeMember, RepositoryError> {
        let model = home_member::Entity::find()
            .filter(home_member::Column::InviteToken.eq(invite_token))
            .filter(home_member::Column::UserId.is_null())
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let mut active: home_member::ActiveModel = model.into();
        active.user_id = Set(Some(user_id));
        active.joined_at = Set(Some(Utc::now().fixed_offset()));

        let updated = active.update(self.db.as_ref()).await?;
        Ok(updated.into())
    }
}
