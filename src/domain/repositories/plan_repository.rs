// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::analysis::RoomAnalysis;
use crate::domain::models::plan::Plan;
use crate::domain::models::scan::Scan;
use crate::domain::repositories::task_repository::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 计划接受数据
///
/// 一次分析被接受时需要落库的全部内容：扫描快照元数据与
/// 分析结果本体。任务行按分析返回顺序生成，排序键取下标。
#[derive(Debug, Clone)]
pub struct PlanAcceptance {
    /// 房间ID
    pub room_id: Uuid,
    /// 家庭ID
    pub home_id: Uuid,
    /// 用户ID
    pub user_id: Uuid,
    /// 计划名称
    pub plan_name: String,
    /// 图片URL（已交给对象存储）
    pub image_url: Option<String>,
    /// 使用的模型名称
    pub ai_model: String,
    /// 分析结果
    pub analysis: RoomAnalysis,
}

/// 计划仓库特质
///
/// 接受操作在单个事务中写入扫描、计划与任务行
#[async_trait]
pub trait PlanRepository: Send + Sync {
    /// 接受一次分析：创建扫描行、计划行与全部任务行
    async fn accept_analysis(
        &self,
        acceptance: PlanAcceptance,
    ) -> Result<(Scan, Plan), RepositoryError>;
    /// 根据ID查找计划
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Plan>, RepositoryError>;
    /// 列出家庭内的计划（新→旧）
    async fn list_by_home(&self, home_id: Uuid) -> Result<Vec<Plan>, RepositoryError>;
    /// 更新计划
    async fn update(&self, plan: &Plan) -> Result<Plan, RepositoryError>;
}
