// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::user::{SubscriptionStatus, SubscriptionTier, UserProfile};
use crate::domain::repositories::task_repository::RepositoryError;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

/// 用户仓库特质
///
/// 用户身份行在首次见到某个已认证用户时惰性镜像创建
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 根据ID查找用户
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, RepositoryError>;
    /// 确保用户行存在（不存在则以身份提供商数据创建）
    async fn ensure_exists(&self, id: Uuid, email: &str) -> Result<UserProfile, RepositoryError>;
    /// 本月扫描计数加一
    async fn increment_scans(&self, id: Uuid) -> Result<(), RepositoryError>;
    /// 根据计费客户ID查找用户
    async fn find_by_billing_customer(
        &self,
        customer_id: &str,
    ) -> Result<Option<UserProfile>, RepositoryError>;
    /// 记录计费客户ID
    async fn set_billing_customer(
        &self,
        id: Uuid,
        customer_id: &str,
    ) -> Result<(), RepositoryError>;
    /// 更新订阅档位与状态
    async fn update_subscription(
        &self,
        id: Uuid,
        tier: SubscriptionTier,
        status: Option<SubscriptionStatus>,
        trial_ends_at: Option<DateTime<FixedOffset>>,
    ) -> Result<(), RepositoryError>;
}
