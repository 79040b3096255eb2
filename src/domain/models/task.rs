// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// 清洁任务实体
///
/// 表示清洁计划中的单个可执行动作。任务携带类别、优先级、
/// 难度和时间估算等元数据，并遵循单向的状态机：
/// Pending → InProgress → Completed，或 Pending → Skipped。
/// 进入 Completed 或 Skipped 后不再允许任何状态转换。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// 任务唯一标识符
    pub id: Uuid,
    /// 所属计划ID
    pub plan_id: Uuid,
    /// 所属房间ID
    pub room_id: Uuid,
    /// 任务标题
    pub title: String,
    /// 执行步骤列表（自由文本，按顺序）
    pub description_steps: Vec<String>,
    /// 任务类别
    pub category: TaskCategory,
    /// 优先级，1为最高，10为最低
    pub priority: i32,
    /// 预计耗时（分钟）
    pub estimated_minutes: i32,
    /// 实际耗时（分钟），完成后可选填写
    pub actual_minutes: Option<i32>,
    /// 难度，1到5
    pub difficulty: i32,
    /// 所需用品清单
    pub supplies: Vec<String>,
    /// 安全提示
    pub safety_notes: Vec<String>,
    /// 任务状态
    pub status: TaskStatus,
    /// 指派的成员ID（可选）
    pub assignee_id: Option<Uuid>,
    /// 计划内排序键（模型返回顺序）
    pub sort_order: i32,
    /// 开始执行时间
    pub started_at: Option<DateTime<FixedOffset>>,
    /// 完成时间
    pub completed_at: Option<DateTime<FixedOffset>>,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
}

/// 任务类别枚举
///
/// 封闭枚举，与视觉模型约定的类别一一对应。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    /// 整理归位
    Order,
    /// 除尘
    Dust,
    /// 台面与表面
    Surfaces,
    /// 地板
    Floor,
    /// 垃圾
    Trash,
    /// 衣物
    Laundry,
    /// 厨房
    Kitchen,
    /// 卫生间
    Bathroom,
    /// 通用
    #[default]
    General,
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            TaskCategory::Order => "order",
            TaskCategory::Dust => "dust",
            TaskCategory::Surfaces => "surfaces",
            TaskCategory::Floor => "floor",
            TaskCategory::Trash => "trash",
            TaskCategory::Laundry => "laundry",
            TaskCategory::Kitchen => "kitchen",
            TaskCategory::Bathroom => "bathroom",
            TaskCategory::General => "general",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for TaskCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "order" => Ok(TaskCategory::Order),
            "dust" => Ok(TaskCategory::Dust),
            "surfaces" => Ok(TaskCategory::Surfaces),
            "floor" => Ok(TaskCategory::Floor),
            "trash" => Ok(TaskCategory::Trash),
            "laundry" => Ok(TaskCategory::Laundry),
            "kitchen" => Ok(TaskCategory::Kitchen),
            "bathroom" => Ok(TaskCategory::Bathroom),
            "general" => Ok(TaskCategory::General),
            _ => Err(()),
        }
    }
}

/// 任务状态枚举
///
/// 状态转换遵循以下流程：
/// Pending → InProgress → Completed，或 Pending → Skipped。
/// Completed 与 Skipped 为终态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// 待处理
    #[default]
    Pending,
    /// 进行中
    InProgress,
    /// 已完成
    Completed,
    /// 已跳过
    Skipped,
}

impl TaskStatus {
    /// 判断是否为终态（完成或跳过）
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Skipped)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::InProgress => write!(f, "in_progress"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Skipped => write!(f, "skipped"),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            "skipped" => Ok(TaskStatus::Skipped),
            _ => Err(()),
        }
    }
}

/// 任务状态转换事件
///
/// 追加式日志行，记录一次任务状态变化。事件日志是统计
/// 重算的事实来源，永不更新或删除。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskEvent {
    /// 事件唯一标识符
    pub id: Uuid,
    /// 关联任务ID
    pub task_id: Uuid,
    /// 触发事件的用户ID
    pub user_id: Uuid,
    /// 事件类型（即新状态）
    pub event_type: TaskStatus,
    /// 自由元数据，例如 actual_minutes
    pub metadata: serde_json::Value,
    /// 事件时间
    pub created_at: DateTime<FixedOffset>,
}

/// 领域错误类型
#[derive(Error, Debug)]
pub enum DomainError {
    /// 无效的状态转换，当任务状态转换不符合业务规则时发生
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: TaskStatus, to: TaskStatus },

    /// 验证错误，当输入数据不符合领域规则时发生
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl Task {
    /// 开始任务
    ///
    /// 将任务状态从Pending变更为InProgress
    ///
    /// # 返回值
    ///
    /// * `Ok(Task)` - 已开始的任务
    /// * `Err(DomainError)` - 状态转换失败
    pub fn start(mut self) -> Result<Self, DomainError> {
        match self.status {
            TaskStatus::Pending => {
                self.status = TaskStatus::InProgress;
                self.started_at = Some(Utc::now().into());
                self.updated_at = Utc::now().into();
                Ok(self)
            }
            from => Err(DomainError::InvalidStateTransition {
                from,
                to: TaskStatus::InProgress,
            }),
        }
    }

    /// 完成任务
    ///
    /// 从Pending（单击直接完成）或InProgress变更为Completed，
    /// 可选记录实际耗时
    ///
    /// # 参数
    ///
    /// * `actual_minutes` - 实际耗时（分钟），未提供时保持为空
    ///
    /// # 返回值
    ///
    /// * `Ok(Task)` - 已完成的任务
    /// * `Err(DomainError)` - 状态转换失败
    pub fn complete(mut self, actual_minutes: Option<i32>) -> Result<Self, DomainError> {
        match self.status {
            TaskStatus::Pending | TaskStatus::InProgress => {
                self.status = TaskStatus::Completed;
                self.completed_at = Some(Utc::now().into());
                self.updated_at = Utc::now().into();
                if actual_minutes.is_some() {
                    self.actual_minutes = actual_minutes;
                }
                Ok(self)
            }
            from => Err(DomainError::InvalidStateTransition {
                from,
                to: TaskStatus::Completed,
            }),
        }
    }

    /// 跳过任务
    ///
    /// 仅允许从Pending变更为Skipped
    ///
    /// # 返回值
    ///
    /// * `Ok(Task)` - 已跳过的任务
    /// * `Err(DomainError)` - 状态转换失败
    pub fn skip(mut self) -> Result<Self, DomainError> {
        match self.status {
            TaskStatus::Pending => {
                self.status = TaskStatus::Skipped;
                self.completed_at = Some(Utc::now().into());
                self.updated_at = Utc::now().into();
                Ok(self)
            }
            from => Err(DomainError::InvalidStateTransition {
                from,
                to: TaskStatus::Skipped,
            }),
        }
    }

    /// 应用一次状态转换
    ///
    /// 根据目标状态分派到对应的转换方法
    pub fn transition(
        self,
        to: TaskStatus,
        actual_minutes: Option<i32>,
    ) -> Result<Self, DomainError> {
        match to {
            TaskStatus::InProgress => self.start(),
            TaskStatus::Completed => self.complete(actual_minutes),
            TaskStatus::Skipped => self.skip(),
            TaskStatus::Pending => Err(DomainError::InvalidStateTransition {
                from: self.status,
                to,
            }),
        }
    }

    /// 计入统计的耗时：实际耗时优先，缺省回退到估算值
    pub fn minutes_for_stats(&self) -> i32 {
        self.actual_minutes.unwrap_or(self.estimated_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task(status: TaskStatus) -> Task {
        Task {
            id: Uuid::new_v4(),
            plan_id: Uuid::new_v4(),
            room_id: Uuid::new_v4(),
            title: "Limpiar la mesa del comedor".to_string(),
            description_steps: vec!["Retirar objetos".to_string()],
            category: TaskCategory::Surfaces,
            priority: 2,
            estimated_minutes: 10,
            actual_minutes: None,
            difficulty: 2,
            supplies: vec![],
            safety_notes: vec![],
            status,
            assignee_id: None,
            sort_order: 0,
            started_at: None,
            completed_at: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_pending_to_in_progress_to_completed() {
        let task = sample_task(TaskStatus::Pending);
        let task = task.start().unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert!(task.started_at.is_some());

        let task = task.complete(Some(8)).unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.actual_minutes, Some(8));
        assert!(task.completed_at.is_some());
    }

    #[test]
    fn test_pending_completes_directly() {
        let task = sample_task(TaskStatus::Pending);
        let task = task.complete(None).unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.actual_minutes, None);
    }

    #[test]
    fn test_skip_only_from_pending() {
        let task = sample_task(TaskStatus::Pending);
        assert!(task.skip().is_ok());

        let task = sample_task(TaskStatus::InProgress);
        assert!(matches!(
            task.skip(),
            Err(DomainError::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn test_no_transition_out_of_terminal_states() {
        for terminal in [TaskStatus::Completed, TaskStatus::Skipped] {
            let task = sample_task(terminal);
            assert!(task.clone().start().is_err());
            assert!(task.clone().complete(None).is_err());
            assert!(task.skip().is_err());
        }
    }

    #[test]
    fn test_minutes_for_stats_falls_back_to_estimate() {
        let mut task = sample_task(TaskStatus::Completed);
        assert_eq!(task.minutes_for_stats(), 10);
        task.actual_minutes = Some(25);
        assert_eq!(task.minutes_for_stats(), 25);
    }

    #[test]
    fn test_category_round_trip() {
        for s in [
            "order",
            "dust",
            "surfaces",
            "floor",
            "trash",
            "laundry",
            "kitchen",
            "bathroom",
            "general",
        ] {
            let cat: TaskCategory = s.parse().unwrap();
            assert_eq!(cat.to_string(), s);
        }
        assert!("garage".parse::<TaskCategory>().is_err());
    }
}
