// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::room::Room;
use crate::domain::repositories::room_repository::{NewRoom, RoomRepository};
use crate::domain::repositories::task_repository::RepositoryError;
use crate::infrastructure::database::entities::room;

/// 房间仓库实现
#[derive(Clone)]
pub struct RoomRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl RoomRepositoryImpl {
    /// 创建新的房间仓库实例
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

impl From<room::Model> for Room {
    fn from(model: room::Model) -> Self {
        Self {
            id: model.id,
            home_id: model.home_id,
            name: model.name,
            room_type: model.room_type,
            icon: model.icon,
            size_hint: model.size_hint,
            sensitivity_tags: string_vec(&model.sensitivity_tags),
            sort_order: model.sort_order,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[async_trait]
impl RoomRepository for RoomRepositoryImpl {
    async fn create(&self, new_room: NewRoom) -> Result<Room, RepositoryError> {
        let now = Utc::now().fixed_offset();
        let model = room::ActiveModel {
            id: Set(Uuid::new_v4()),
            home_id: Set(new_room.home_id),
            name: Set(new_room.name),
            room_type: Set(new_room.room_type),
            icon: Set(new_room.icon),
            size_hint: Set(new_room.size_hint),
            sensitivity_tags: Set(json!(new_room.sensitivity_tags)),
            sort_order: Set(new_room.sort_order),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = model.insert(self.db.as_ref()).await?;
        Ok(inserted.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Room>, RepositoryError> {
        let model = room::Entity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(model.map(Into::into))
    }

    async fn list_by_home(&self, home_id: Uuid) -> Result<Vec<Room>, RepositoryError> {
        let models = room::Entity::find()
            .filter(room::Column::HomeId.eq(home_id))
            .order_by_asc(room::Column::SortOrder)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update(&self, updated: &Room) -> Result<Room, RepositoryError> {
        let model = room::Entity::find_by_id(updated.id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let mut active: room::ActiveModel = model.into();
        active.name = Set(updated.name.clone());
        active.room_type = Set(updated.room_type.clone());
        active.icon = Set(updated.icon.clone());
        active.size_hint = Set(updated.size_hint.clone());
        active.sensitivity_tags = Set(json!(updated.sensitivity_tags));
        active.sort_order = Set(updated.sort_order);
        active.updated_at = Set(Utc::now().fixed_offset());

        let saved = active.update(self.db.as_ref()).await?;
        Ok(saved.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let model = room::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?;

        model.delete(self.db.as_ref()).await?;
        Ok(())
    }
}
