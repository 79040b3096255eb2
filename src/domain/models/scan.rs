// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 房间扫描记录
///
/// 一次拍照分析的持久快照：图片地址、使用的模型名称、
/// 模型返回的原始JSON以及清洁度评分。图片本体是交给外部
/// 对象存储的不透明数据，这里只保留访问URL。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scan {
    /// 扫描唯一标识符
    pub id: Uuid,
    /// 被扫描的房间ID
    pub room_id: Uuid,
    /// 发起扫描的用户ID
    pub user_id: Uuid,
    /// 图片URL
    pub image_url: Option<String>,
    /// 缩略图URL
    pub thumbnail_url: Option<String>,
    /// 使用的模型名称
    pub ai_model: String,
    /// 模型返回的原始JSON
    pub ai_raw_json: serde_json::Value,
    /// 清洁前评分（0-100）
    pub score_before: Option<i32>,
    /// 清洁后评分（0-100）
    pub score_after: Option<i32>,
    /// 是否保留图片
    pub keep_image: bool,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
}
