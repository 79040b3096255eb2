// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::badge::{Badge, UserBadge};
use crate::domain::repositories::task_repository::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 徽章仓库特质
#[async_trait]
pub trait BadgeRepository: Send + Sync {
    /// 列出全部徽章定义
    async fn list_all(&self) -> Result<Vec<Badge>, RepositoryError>;
    /// 列出用户已获得的徽章
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<UserBadge>, RepositoryError>;
    /// 授予徽章（幂等：已授予时不重复写入）
    async fn grant(&self, user_id: Uuid, badge_id: Uuid) -> Result<(), RepositoryError>;
}
