// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{extract::Path, http::StatusCode, Extension, Json};
use base64::Engine;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::dto::plan_request::AcceptPlanRequestDto;
use crate::config::settings::Settings;
use crate::domain::models::user::SubscriptionTier;
use crate::domain::repositories::home_repository::HomeRepository;
use crate::domain::repositories::plan_repository::{PlanAcceptance, PlanRepository};
use crate::domain::repositories::room_repository::RoomRepository;
use crate::domain::repositories::storage_repository::StorageRepository;
use crate::domain::repositories::task_repository::RepositoryError;
use crate::domain::repositories::user_repository::UserRepository;
use crate::presentation::errors::AppError;
use crate::presentation::middleware::auth_middleware::CurrentUser;

/// 接受一次分析，生成计划
///
/// 单次接受写入一行扫描、一行计划与N行任务（按模型返回
/// 顺序），免费档用户的月度计数随后加一。图片若随请求提供，
/// 先交给对象存储，数据库只记录URL。
pub async fn accept_plan(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(settings): Extension<Arc<Settings>>,
    Extension(homes): Extension<Arc<dyn HomeRepository>>,
    Extension(rooms): Extension<Arc<dyn RoomRepository>>,
    Extension(plans): Extension<Arc<dyn PlanRepository>>,
    Extension(users): Extension<Arc<dyn UserRepository>>,
    Extension(storage): Extension<Arc<dyn StorageRepository>>,
    Json(payload): Json<AcceptPlanRequestDto>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    homes
        .find_membership(payload.home_id, user.id)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    let room = rooms
        .find_by_id(payload.room_id)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    // Store the image first so the scan row can reference it
    let image_url = match payload.image_base64.as_deref() {
        Some(encoded) if !encoded.is_empty() => {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(encoded)
                .map_err(|_| anyhow::anyhow!("Imagen inválida"))?;
            let key = format!("scans/{}/{}.jpg", user.id, Uuid::new_v4());
            match storage.save(&key, &bytes).await {
                Ok(()) => {
                    let base = settings.storage.public_base_url.clone().unwrap_or_default();
                    Some(format!("{}/{}", base, key))
                }
                Err(e) => {
                    // The plan is still worth saving without its photo
                    warn!("Failed to store scan image: {}", e);
                    None
                }
            }
        }
        _ => None,
    };

    let acceptance = PlanAcceptance {
        room_id: room.id,
        home_id: payload.home_id,
        user_id: user.id,
        plan_name: format!("Plan de limpieza - {}", room.name),
        image_url,
        ai_model: settings.ai.model.clone(),
        analysis: payload.analysis,
    };

    let (scan, plan) = plans.accept_analysis(acceptance).await?;

    if user.subscription_tier == SubscriptionTier::Free {
        users.increment_scans(user.id).await?;
    }

    info!(user = %user.id, plan = %plan.id, "Plan accepted");

    Ok((StatusCode::CREATED, Json(json!({ "scan": scan, "plan": plan }))))
}

/// 查询单个计划
pub async fn get_plan(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(homes): Extension<Arc<dyn HomeRepository>>,
    Extension(plans): Extension<Arc<dyn PlanRepository>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let plan = plans.find_by_id(id).await?.ok_or(RepositoryError::NotFound)?;

    homes
        .find_membership(plan.home_id, user.id)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    Ok(Json(json!(plan)))
}

/// 列出家庭内的计划
pub async fn list_plans(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(homes): Extension<Arc<dyn HomeRepository>>,
    Extension(plans): Extension<Arc<dyn PlanRepository>>,
    Path(home_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    homes
        .find_membership(home_id, user.id)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    let plans = plans.list_by_home(home_id).await?;
    Ok(Json(json!(plans)))
}
