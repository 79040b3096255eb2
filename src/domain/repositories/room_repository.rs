// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::room::Room;
use crate::domain::repositories::task_repository::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 新房间数据
#[derive(Debug, Clone)]
pub struct NewRoom {
    pub home_id: Uuid,
    pub name: String,
    pub room_type: String,
    pub icon: Option<String>,
    pub size_hint: Option<String>,
    pub sensitivity_tags: Vec<String>,
    pub sort_order: i32,
}

/// 房间仓库特质
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// 创建房间
    async fn create(&self, room: NewRoom) -> Result<Room, RepositoryError>;
    /// 根据ID查找房间
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Room>, RepositoryError>;
    /// 按排序键列出家庭内的全部房间
    async fn list_by_home(&self, home_id: Uuid) -> Result<Vec<Room>, RepositoryError>;
    /// 更新房间
    async fn update(&self, room: &Room) -> Result<Room, RepositoryError>;
    /// 删除房间
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}
