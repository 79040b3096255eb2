// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::task_repository::RepositoryError;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 浏览器推送订阅
///
/// 每个浏览器端点一行；同一端点重复订阅时覆盖密钥
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushSubscription {
    /// 订阅唯一标识符
    pub id: Uuid,
    /// 用户ID
    pub user_id: Uuid,
    /// 推送端点URL（唯一键）
    pub endpoint: String,
    /// 客户端公钥
    pub p256dh: String,
    /// 认证密钥
    pub auth: String,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
}

/// 推送订阅仓库特质
#[async_trait]
pub trait PushSubscriptionRepository: Send + Sync {
    /// 以端点为键写入订阅（存在则覆盖密钥与归属用户）
    async fn upsert(
        &self,
        user_id: Uuid,
        endpoint: &str,
        p256dh: &str,
        auth: &str,
    ) -> Result<PushSubscription, RepositoryError>;
    /// 列出用户的全部订阅
    async fn list_for_user(&self, user_id: Uuid)
        -> Result<Vec<PushSubscription>, RepositoryError>;
    /// 按端点删除订阅（推送网关报告永久失效时调用）
    async fn delete_by_endpoint(&self, endpoint: &str) -> Result<(), RepositoryError>;
}
