// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{extract::Path, Extension, Json};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::repositories::badge_repository::BadgeRepository;
use crate::domain::repositories::home_repository::HomeRepository;
use crate::domain::repositories::stats_repository::StatsRepository;
use crate::domain::repositories::task_repository::RepositoryError;
use crate::domain::services::stats_service::StatsService;
use crate::presentation::errors::AppError;
use crate::presentation::middleware::auth_middleware::CurrentUser;

/// 用户进度端点
///
/// 返回统计行、已获得的徽章与最近30天的单日聚合历史。
/// 单日聚合是从事件日志按需派生的，不落库。
pub async fn get_stats(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(homes): Extension<Arc<dyn HomeRepository>>,
    Extension(stats_repo): Extension<Arc<dyn StatsRepository>>,
    Extension(badges): Extension<Arc<dyn BadgeRepository>>,
    Extension(stats_service): Extension<Arc<StatsService>>,
    Path(home_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    homes
        .find_membership(home_id, user.id)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    let stats = stats_repo.find_or_create(user.id, home_id).await?;
    let earned = badges.list_for_user(user.id).await?;
    let daily = stats_service.daily_history(user.id).await?;

    Ok(Json(json!({
        "stats": stats,
        "badges": earned,
        "daily": daily,
    })))
}
