// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::preferences::{CleaningStandard, DetailLevel, UserPreferences};
use crate::domain::repositories::task_repository::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 偏好更新数据
#[derive(Debug, Clone)]
pub struct PreferencesUpdate {
    pub detail_level: DetailLevel,
    pub cleaning_standard: CleaningStandard,
    pub restrictions: Vec<String>,
    pub minutes_per_day: i32,
    pub days_per_week: Vec<i32>,
}

/// 偏好仓库特质
///
/// 每个 (用户, 家庭) 组合持有唯一一行偏好
#[async_trait]
pub trait PreferencesRepository: Send + Sync {
    /// 查找用户在某家庭中的偏好
    async fn find(
        &self,
        user_id: Uuid,
        home_id: Uuid,
    ) -> Result<Option<UserPreferences>, RepositoryError>;
    /// 写入偏好，不存在则创建
    async fn upsert(
        &self,
        user_id: Uuid,
        home_id: Uuid,
        update: PreferencesUpdate,
    ) -> Result<UserPreferences, RepositoryError>;
}
