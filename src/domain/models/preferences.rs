// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 用户清洁偏好
///
/// 每个用户在每个家庭中持有一行偏好，驱动提示词的详略
/// 与清洁标准，并携带模型不得违反的限制清单。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPreferences {
    /// 偏好唯一标识符
    pub id: Uuid,
    /// 用户ID
    pub user_id: Uuid,
    /// 家庭ID
    pub home_id: Uuid,
    /// 任务描述详略程度
    pub detail_level: DetailLevel,
    /// 清洁标准
    pub cleaning_standard: CleaningStandard,
    /// 限制清单（模型不得建议违反这些限制的产品或方法）
    pub restrictions: Vec<String>,
    /// 每日可用分钟数
    pub minutes_per_day: i32,
    /// 每周可用天（1=周一..7=周日）
    pub days_per_week: Vec<i32>,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
}

/// 任务描述详略程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DetailLevel {
    /// 非常简短，每个任务至多1-2步
    Brief,
    /// 清晰描述，每个任务2-4步
    #[default]
    Normal,
    /// 完整详细的步骤
    Detailed,
}

impl fmt::Display for DetailLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DetailLevel::Brief => write!(f, "brief"),
            DetailLevel::Normal => write!(f, "normal"),
            DetailLevel::Detailed => write!(f, "detailed"),
        }
    }
}

impl FromStr for DetailLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brief" => Ok(DetailLevel::Brief),
            "normal" => Ok(DetailLevel::Normal),
            "detailed" => Ok(DetailLevel::Detailed),
            _ => Err(()),
        }
    }
}

/// 清洁标准
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CleaningStandard {
    /// 快速清洁，优先可见且影响大的任务
    #[default]
    Quick,
    /// 深度清洁，包含耗时的彻底清洁任务
    Deep,
}

impl fmt::Display for CleaningStandard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CleaningStandard::Quick => write!(f, "quick"),
            CleaningStandard::Deep => write!(f, "deep"),
        }
    }
}

impl FromStr for CleaningStandard {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quick" => Ok(CleaningStandard::Quick),
            "deep" => Ok(CleaningStandard::Deep),
            _ => Err(()),
        }
    }
}
