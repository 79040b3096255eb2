// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::stats::{DailyStats, UserStats};
use crate::domain::repositories::task_repository::RepositoryError;
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

/// 统计仓库特质
///
/// 统计行只由进度追踪服务改写；单日聚合由事件日志派生，
/// 不单独存储。
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// 查找统计行，不存在则创建全零行
    async fn find_or_create(
        &self,
        user_id: Uuid,
        home_id: Uuid,
    ) -> Result<UserStats, RepositoryError>;
    /// 写回统计行
    async fn update(&self, stats: &UserStats) -> Result<UserStats, RepositoryError>;
    /// 按日历日聚合完成事件（自 since 起，含事件数与实际分钟数）
    async fn daily_stats(
        &self,
        user_id: Uuid,
        since: NaiveDate,
    ) -> Result<Vec<DailyStats>, RepositoryError>;
}
