// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// 认证错误类型
#[derive(Error, Debug)]
pub enum AuthError {
    /// 无会话或令牌无效
    #[error("No autorizado")]
    Unauthenticated,

    /// 身份提供商调用失败
    #[error("Identity provider error: {0}")]
    Provider(String),
}

/// 已认证用户
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    /// 用户ID
    pub id: Uuid,
    /// 邮箱
    pub email: String,
}

/// 会话
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    /// 访问令牌
    pub access_token: String,
    /// 刷新令牌
    pub refresh_token: Option<String>,
    /// 会话归属用户
    pub user: AuthUser,
}

/// 认证网关特质
///
/// 会话由外部身份提供商持有。本服务只做两件事：
/// 用授权码交换会话（登录回调），以及校验请求携带的
/// 访问令牌并取回用户身份（受保护端点）。
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// 用授权码交换会话
    async fn exchange_code(&self, code: &str) -> Result<AuthSession, AuthError>;
    /// 校验访问令牌并返回用户身份
    async fn get_user(&self, access_token: &str) -> Result<AuthUser, AuthError>;
}
