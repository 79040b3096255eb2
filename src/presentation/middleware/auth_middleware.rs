// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use crate::domain::models::user::UserProfile;
use crate::domain::repositories::user_repository::UserRepository;
use crate::domain::services::auth_gateway::AuthGateway;

/// 当前已认证用户
///
/// 认证中间件解析令牌成功后注入请求扩展
#[derive(Clone)]
pub struct CurrentUser(pub UserProfile);

/// 认证状态
#[derive(Clone)]
pub struct AuthState {
    /// 身份提供商网关
    pub gateway: Arc<dyn AuthGateway>,
    /// 用户仓库（惰性镜像用户行）
    pub users: Arc<dyn UserRepository>,
}

/// 认证中间件
///
/// 校验请求携带的Bearer访问令牌：令牌交给身份提供商验证，
/// 首次见到的用户在本地惰性创建档案行，随后把档案注入
/// 请求扩展供处理器使用。
///
/// # 参数
///
/// * `state` - 认证状态
/// * `req` - HTTP请求
/// * `next` - 下一个中间件
///
/// # 返回值
///
/// * `Ok(Response)` - 认证成功的响应
/// * `Err(StatusCode)` - 认证失败的状态码
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let path = req.uri().path();
    debug!("AuthMiddleware processing path: {}", path);

    let token = {
        let auth_header = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .ok_or(StatusCode::UNAUTHORIZED)?;

        if !auth_header.starts_with("Bearer ") {
            return Err(StatusCode::UNAUTHORIZED);
        }

        auth_header[7..].to_string()
    };

    let auth_user = state
        .gateway
        .get_user(&token)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let profile = state
        .users
        .ensure_exists(auth_user.id, &auth_user.email)
        .await
        .map_err(|e| {
            tracing::error!("Failed to mirror user profile: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    req.extensions_mut().insert(auth_user.id);
    req.extensions_mut().insert(CurrentUser(profile));

    Ok(next.run(req).await)
}
