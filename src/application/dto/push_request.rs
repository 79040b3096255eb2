// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 浏览器推送订阅请求DTO
///
/// 负载形状与浏览器 `PushSubscription.toJSON()` 一致
#[derive(Debug, Deserialize, Serialize)]
pub struct SubscribeRequestDto {
    /// 浏览器侧订阅对象
    pub subscription: BrowserSubscriptionDto,
}

/// 浏览器订阅对象
#[derive(Debug, Deserialize, Serialize)]
pub struct BrowserSubscriptionDto {
    /// 推送端点URL
    pub endpoint: String,
    /// 加密密钥对
    pub keys: Option<SubscriptionKeysDto>,
}

/// 订阅加密密钥
#[derive(Debug, Deserialize, Serialize)]
pub struct SubscriptionKeysDto {
    /// 客户端公钥
    pub p256dh: Option<String>,
    /// 认证密钥
    pub auth: Option<String>,
}

/// 通知偏好更新请求DTO
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPrefsRequestDto {
    /// 是否启用每日提醒
    pub daily_reminder: bool,
    /// 每日提醒时刻（"HH:MM"）
    pub daily_reminder_time: String,
    /// 是否启用到期提醒
    pub due_reminders: bool,
    /// 是否启用成就通知
    pub achievement_notifications: bool,
    /// 免打扰开始时刻
    pub quiet_hours_start: Option<String>,
    /// 免打扰结束时刻
    pub quiet_hours_end: Option<String>,
}

/// 推送发送请求DTO
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendPushRequestDto {
    /// 目标用户ID，缺省为当前用户
    pub user_id: Option<Uuid>,
    /// 通知标题
    pub title: Option<String>,
    /// 通知正文
    pub body: Option<String>,
    /// 点击后打开的路径
    pub url: Option<String>,
}
