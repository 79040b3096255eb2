// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{Extension, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::application::dto::push_request::{
    NotificationPrefsRequestDto, SendPushRequestDto, SubscribeRequestDto,
};
use crate::config::settings::Settings;
use crate::domain::repositories::notification_prefs_repository::{
    NotificationPrefsRepository, NotificationPrefsUpdate,
};
use crate::domain::repositories::push_subscription_repository::PushSubscriptionRepository;
use crate::domain::services::push_service::{NotificationError, NotificationService, PushPayload};
use crate::presentation::errors::AppError;
use crate::presentation::middleware::auth_middleware::CurrentUser;

/// 订阅推送端点
///
/// 以端点URL为键做覆盖写入：同一浏览器重复订阅不会产生
/// 多行，换密钥时旧行被更新
pub async fn subscribe(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(settings): Extension<Arc<Settings>>,
    Extension(subscriptions): Extension<Arc<dyn PushSubscriptionRepository>>,
    Json(payload): Json<SubscribeRequestDto>,
) -> Result<Json<Value>, AppError> {
    if settings.push.vapid_private_key.is_none() {
        return Err(NotificationError::NotConfigured.into());
    }

    if payload.subscription.endpoint.is_empty() {
        return Err(anyhow::anyhow!("Suscripción inválida").into());
    }

    let keys = payload.subscription.keys.as_ref();
    let p256dh = keys.and_then(|k| k.p256dh.as_deref()).unwrap_or_default();
    let auth = keys.and_then(|k| k.auth.as_deref()).unwrap_or_default();

    subscriptions
        .upsert(user.id, &payload.subscription.endpoint, p256dh, auth)
        .await?;

    Ok(Json(json!({ "success": true })))
}

/// 发送推送端点
///
/// 向目标用户（缺省为当前用户）的全部订阅扇出通知，
/// 推送网关报告永久失效的端点被当场清理
pub async fn send(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(settings): Extension<Arc<Settings>>,
    Extension(notifications): Extension<Arc<NotificationService>>,
    Json(payload): Json<SendPushRequestDto>,
) -> Result<Json<Value>, AppError> {
    if settings.push.vapid_private_key.is_none() {
        return Err(NotificationError::NotConfigured.into());
    }

    let target = payload.user_id.unwrap_or(user.id);
    let defaults = PushPayload::default();
    let message = PushPayload {
        title: payload.title.unwrap_or(defaults.title),
        body: payload.body.unwrap_or(defaults.body),
        url: payload.url.unwrap_or(defaults.url),
    };

    let outcome = notifications.notify_user(target, &message).await?;
    Ok(Json(json!({ "sent": outcome.sent, "total": outcome.total })))
}

/// 查询当前用户的通知偏好（不存在时以默认值创建）
pub async fn get_notification_prefs(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(prefs): Extension<Arc<dyn NotificationPrefsRepository>>,
) -> Result<Json<Value>, AppError> {
    let prefs = prefs.find_or_create(user.id).await?;
    Ok(Json(json!(prefs)))
}

/// 更新当前用户的通知偏好
pub async fn update_notification_prefs(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(prefs): Extension<Arc<dyn NotificationPrefsRepository>>,
    Json(payload): Json<NotificationPrefsRequestDto>,
) -> Result<Json<Value>, AppError> {
    let prefs = prefs
        .upsert(
            user.id,
            NotificationPrefsUpdate {
                daily_reminder: payload.daily_reminder,
                daily_reminder_time: payload.daily_reminder_time,
                due_reminders: payload.due_reminders,
                achievement_notifications: payload.achievement_notifications,
                quiet_hours_start: payload.quiet_hours_start,
                quiet_hours_end: payload.quiet_hours_end,
            },
        )
        .await?;

    Ok(Json(json!(prefs)))
}
