// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::Query,
    response::{IntoResponse, Redirect},
    Extension,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use crate::config::settings::Settings;
use crate::domain::repositories::home_repository::HomeRepository;
use crate::domain::repositories::user_repository::UserRepository;
use crate::domain::services::auth_gateway::AuthGateway;

/// 认证回调查询参数
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// 授权码
    pub code: Option<String>,
    /// 登录后的跳转目标
    pub redirect: Option<String>,
}

/// 认证回调端点
///
/// 用授权码向身份提供商交换会话。已认证但还没有任何家庭
/// 成员关系的用户被引导到入门流程而不是请求的目标页。
/// 交换失败一律回到登录页。
pub async fn callback(
    Extension(settings): Extension<Arc<Settings>>,
    Extension(gateway): Extension<Arc<dyn AuthGateway>>,
    Extension(users): Extension<Arc<dyn UserRepository>>,
    Extension(homes): Extension<Arc<dyn HomeRepository>>,
    Query(query): Query<CallbackQuery>,
) -> impl IntoResponse {
    let app_url = &settings.server.app_url;

    // Only path-relative redirect targets are honored
    let redirect_target = match query.redirect.as_deref() {
        Some(target) if target.starts_with('/') && url::Url::parse(target).is_err() => target,
        _ => "/dashboard",
    };

    let Some(code) = query.code.as_deref() else {
        return Redirect::to(&format!("{}/login?error=auth", app_url));
    };

    let session = match gateway.exchange_code(code).await {
        Ok(session) => session,
        Err(e) => {
            warn!("Code exchange failed: {}", e);
            return Redirect::to(&format!("{}/login?error=auth", app_url));
        }
    };

    if let Err(e) = users
        .ensure_exists(session.user.id, &session.user.email)
        .await
    {
        warn!("Failed to mirror user on login: {}", e);
        return Redirect::to(&format!("{}/login?error=auth", app_url));
    }

    match homes.has_any_membership(session.user.id).await {
        Ok(false) => Redirect::to(&format!("{}/onboarding", app_url)),
        Ok(true) => Redirect::to(&format!("{}{}", app_url, redirect_target)),
        Err(e) => {
            warn!("Membership lookup failed: {}", e);
            Redirect::to(&format!("{}/login?error=auth", app_url))
        }
    }
}
