// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 房间实体
///
/// 家庭内的一个空间。`sensitivity_tags` 记录表面与居住者
/// 特征（例如硬木地板、宠物），在分析时原样传入提示词。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// 房间唯一标识符
    pub id: Uuid,
    /// 所属家庭ID
    pub home_id: Uuid,
    /// 房间名称
    pub name: String,
    /// 房间类型（living、kitchen、bathroom、bedroom等）
    pub room_type: String,
    /// 显示图标
    pub icon: Option<String>,
    /// 尺寸提示
    pub size_hint: Option<String>,
    /// 敏感特征标签
    pub sensitivity_tags: Vec<String>,
    /// 排序键
    pub sort_order: i32,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
}

/// 新家庭的默认房间集合
pub const DEFAULT_ROOMS: &[(&str, &str, &str)] = &[
    ("living", "Living", "Sofa"),
    ("kitchen", "Cocina", "ChefHat"),
    ("bathroom", "Baño", "Bath"),
    ("bedroom", "Dormitorio", "Bed"),
];
