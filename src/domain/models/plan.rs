// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 清洁计划实体
///
/// 一个计划由一次被接受的AI分析生成，归属于一个房间和一个家庭，
/// 持有一组有序的任务。当其所有任务进入终态时计划转为Completed。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// 计划唯一标识符
    pub id: Uuid,
    /// 来源扫描ID（模板计划可为空）
    pub scan_id: Option<Uuid>,
    /// 所属房间ID
    pub room_id: Uuid,
    /// 所属家庭ID
    pub home_id: Uuid,
    /// 创建者用户ID
    pub user_id: Uuid,
    /// 计划名称
    pub name: String,
    /// 计划状态
    pub status: PlanStatus,
    /// 是否为模板
    pub is_template: bool,
    /// 预计总耗时（分钟）
    pub total_estimated_minutes: i32,
    /// 实际总耗时（分钟），完成后填写
    pub total_actual_minutes: Option<i32>,
    /// 开始时间
    pub started_at: Option<DateTime<FixedOffset>>,
    /// 完成时间
    pub completed_at: Option<DateTime<FixedOffset>>,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
}

/// 计划状态枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// 草稿，尚未被接受
    #[default]
    Draft,
    /// 进行中
    Active,
    /// 已完成，所有任务进入终态
    Completed,
    /// 已取消
    Cancelled,
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlanStatus::Draft => write!(f, "draft"),
            PlanStatus::Active => write!(f, "active"),
            PlanStatus::Completed => write!(f, "completed"),
            PlanStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for PlanStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PlanStatus::Draft),
            "active" => Ok(PlanStatus::Active),
            "completed" => Ok(PlanStatus::Completed),
            "cancelled" => Ok(PlanStatus::Cancelled),
            _ => Err(()),
        }
    }
}

impl Plan {
    /// 标记计划完成
    ///
    /// 记录实际总耗时并设置完成时间戳
    pub fn finish(mut self, total_actual_minutes: i32) -> Self {
        self.status = PlanStatus::Completed;
        self.total_actual_minutes = Some(total_actual_minutes);
        self.completed_at = Some(Utc::now().into());
        self.updated_at = Utc::now().into();
        self
    }
}
