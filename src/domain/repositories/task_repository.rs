// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::task::{Task, TaskEvent};
use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// 仓库错误类型
///
/// 各仓库接口共用的错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
}

/// 任务仓库特质
///
/// 定义任务与任务事件的数据访问接口。任务事件是追加式日志，
/// 只有插入操作。
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// 根据ID查找任务
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, RepositoryError>;
    /// 按排序键列出计划内的所有任务
    async fn list_by_plan(&self, plan_id: Uuid) -> Result<Vec<Task>, RepositoryError>;
    /// 更新任务
    async fn update(&self, task: &Task) -> Result<Task, RepositoryError>;
    /// 设置或清除任务指派
    async fn set_assignee(
        &self,
        id: Uuid,
        assignee_id: Option<Uuid>,
    ) -> Result<Task, RepositoryError>;
    /// 追加一条任务事件
    async fn record_event(&self, event: &TaskEvent) -> Result<(), RepositoryError>;
}
