// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::models::preferences::{CleaningStandard, DetailLevel};
use crate::domain::models::task::TaskCategory;

/// 房间分析结果
///
/// 视觉模型对一张房间照片的结构化评估。属于瞬态数据：
/// 被用户接受后分解为一行扫描记录、一行计划与若干任务行，
/// 本体不单独持久化（原始JSON随扫描记录保留）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomAnalysis {
    /// 模型猜测的房间名称
    pub room_guess: Option<String>,
    /// 房间猜测置信度（0-100）
    pub room_confidence: Option<f64>,
    /// 观察到的问题列表
    pub observations: Vec<Observation>,
    /// 建议的任务列表（按视觉影响排序）
    pub tasks: Vec<ProposedTask>,
    /// 预计总耗时（分钟）
    pub total_estimated_minutes: i64,
    /// 建议的周期性任务
    #[serde(default)]
    pub suggested_recurring_tasks: Vec<RecurringSuggestion>,
    /// 清洁前评分（0=非常脏，100=一尘不染）
    pub before_score: i64,
    /// 总体状态摘要
    pub summary: String,
    /// 快速见效任务摘要（10分钟内可做什么）
    pub quick_wins_summary: Option<String>,
}

/// 单条观察
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// 问题描述
    pub description: String,
    /// 严重程度
    pub severity: Severity,
    /// 位置（可选）
    pub location: Option<String>,
    /// 模型无法看清时标记为不确定
    #[serde(default)]
    pub uncertain: bool,
}

/// 观察严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// 轻微
    Low,
    /// 中等
    Medium,
    /// 严重
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

impl FromStr for Severity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            _ => Err(()),
        }
    }
}

/// 模型建议的单个任务
///
/// 尚未落库的任务提案，被接受后按返回顺序转换为任务行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedTask {
    /// 任务标题
    pub title: String,
    /// 执行步骤
    #[serde(default)]
    pub description_steps: Vec<String>,
    /// 类别
    pub category: TaskCategory,
    /// 预计耗时（分钟，1-120）
    pub estimated_minutes: i64,
    /// 难度（1-5）
    pub difficulty: i64,
    /// 优先级（1-10，1最优先）
    pub priority: i64,
    /// 所需用品
    #[serde(default)]
    pub supplies: Vec<String>,
    /// 安全提示
    #[serde(default)]
    pub safety_notes: Vec<String>,
    /// 是否可指派给其他成员
    #[serde(default = "default_true")]
    pub assignable: bool,
    /// 是否为5分钟内可完成的快速任务
    #[serde(default)]
    pub quick_win: bool,
}

fn default_true() -> bool {
    true
}

/// 周期性任务建议
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringSuggestion {
    /// 任务标题
    pub title: String,
    /// 类别
    pub category: TaskCategory,
    /// 建议周期（天）
    pub frequency_days: i64,
    /// 建议理由
    pub reason: String,
}

/// 分析偏好
///
/// 一次分析请求随附的偏好快照：详略、标准、限制与空间特征
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisPreferences {
    /// 详略程度
    pub detail_level: DetailLevel,
    /// 清洁标准
    pub cleaning_standard: CleaningStandard,
    /// 限制清单，逐条原样进入提示词
    #[serde(default)]
    pub restrictions: Vec<String>,
    /// 空间敏感特征，逐条原样进入提示词
    #[serde(default)]
    pub sensitivity_tags: Vec<String>,
}
