// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::models::task::TaskStatus;

/// 任务状态更新请求DTO
#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskStatusDto {
    /// 目标状态
    pub status: TaskStatus,

    /// 实际耗时（分钟，完成时可选提供）
    #[validate(range(min = 0, max = 1440))]
    pub actual_minutes: Option<i32>,
}

/// 任务指派请求DTO
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignTaskDto {
    /// 被指派成员的用户ID，传空解除指派
    pub assignee_id: Option<Uuid>,
}
