// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::analysis::RoomAnalysis;

/// 计划接受请求数据传输对象
///
/// 客户端确认一份分析结果后提交：携带分析本体与可选的
/// 图片数据（保留图片时落到对象存储）
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptPlanRequestDto {
    /// 目标房间ID
    pub room_id: Uuid,
    /// 所属家庭ID
    pub home_id: Uuid,
    /// base64编码的JPEG图片（可选，保留图片时提供）
    pub image_base64: Option<String>,
    /// 被接受的分析结果
    pub analysis: RoomAnalysis,
}
