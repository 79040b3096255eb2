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

use axum::{http::HeaderMap, Extension, Json};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::error;

use crate::config::settings::Settings;
use crate::domain::services::billing_service::{
    parse_billing_event, verify_webhook_signature, BillingError, SubscriptionService,
};
use crate::presentation::errors::AppError;
use crate::presentation::middleware::auth_middleware::CurrentUser;

/// 发起结账会话
///
/// 计费未启用时直接应答503，不触达提供商
pub async fn checkout(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(settings): Extension<Arc<Settings>>,
    Extension(subscriptions): Extension<Arc<SubscriptionService>>,
) -> Result<Json<Value>, AppError> {
    if !settings.billing.enabled {
        return Err(BillingError::NotConfigured.into());
    }

    let url = subscriptions.start_checkout(&user).await?;
    Ok(Json(json!({ "url": url })))
}

/// 打开自助管理门户
pub async fn portal(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(settings): Extension<Arc<Settings>>,
    Extension(subscriptions): Extension<Arc<SubscriptionService>>,
) -> Result<Json<Value>, AppError> {
    if !settings.billing.enabled {
        return Err(BillingError::NotConfigured.into());
    }

    let url = subscriptions.open_portal(&user).await?;
    Ok(Json(json!({ "url": url })))
}

/// 订阅生命周期webhook端点
///
/// 签名校验使用原始请求体；事件处理失败记录日志并返回500，
/// 让提供商按自己的策略重试投递
pub async fn webhook(
    Extension(settings): Extension<Arc<Settings>>,
    Extension(subscriptions): Extension<Arc<SubscriptionService>>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<Value>, AppError> {
    if !settings.billing.enabled {
        return Err(BillingError::NotConfigured.into());
    }

    let secret = settings
        .billing
        .webhook_secret
        .as_deref()
        .ok_or(BillingError::NotConfigured)?;

    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or(BillingError::InvalidSignature)?;

    verify_webhook_signature(&body, signature, secret)?;

    let payload: Value = serde_json::from_str(&body)
        .map_err(|e| anyhow::anyhow!("Invalid webhook payload: {}", e))?;

    let event = parse_billing_event(&payload);
    if let Err(e) = subscriptions.apply_event(event).await {
        error!("Webhook processing error: {}", e);
        return Err(e.into());
    }

    Ok(Json(json!({ "received": true })))
}
