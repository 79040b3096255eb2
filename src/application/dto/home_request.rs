// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::models::preferences::{CleaningStandard, DetailLevel};

/// 创建家庭请求DTO
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateHomeDto {
    /// 家庭名称
    #[validate(length(min = 1, max = 80))]
    pub name: String,
}

/// 邀请成员请求DTO
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct InviteMemberDto {
    /// 被邀请邮箱
    #[validate(email)]
    pub email: String,
}

/// 创建/更新房间请求DTO
#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RoomRequestDto {
    /// 房间名称
    #[validate(length(min = 1, max = 80))]
    pub name: String,
    /// 房间类型
    pub room_type: String,
    /// 显示图标
    pub icon: Option<String>,
    /// 尺寸提示
    pub size_hint: Option<String>,
    /// 敏感特征标签
    #[serde(default)]
    pub sensitivity_tags: Vec<String>,
    /// 排序键
    #[serde(default)]
    pub sort_order: i32,
}

/// 偏好更新请求DTO
#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesRequestDto {
    /// 详略程度
    pub detail_level: DetailLevel,
    /// 清洁标准
    pub cleaning_standard: CleaningStandard,
    /// 限制清单
    #[serde(default)]
    pub restrictions: Vec<String>,
    /// 每日可用分钟数
    #[validate(range(min = 5, max = 480))]
    pub minutes_per_day: i32,
    /// 每周可用天（1=周一..7=周日）
    #[serde(default)]
    pub days_per_week: Vec<i32>,
}
