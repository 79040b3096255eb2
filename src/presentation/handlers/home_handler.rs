// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{extract::Path, http::StatusCode, Extension, Json};
use rand::distr::{Alphanumeric, SampleString};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::application::dto::home_request::{CreateHomeDto, InviteMemberDto, PreferencesRequestDto};
use crate::domain::models::room::DEFAULT_ROOMS;
use crate::domain::repositories::home_repository::HomeRepository;
use crate::domain::repositories::preferences_repository::{
    PreferencesRepository, PreferencesUpdate,
};
use crate::domain::repositories::room_repository::{NewRoom, RoomRepository};
use crate::domain::repositories::stats_repository::StatsRepository;
use crate::domain::repositories::task_repository::RepositoryError;
use crate::presentation::errors::AppError;
use crate::presentation::middleware::auth_middleware::CurrentUser;

/// 创建家庭端点
///
/// 入门流程的核心写入：家庭行、所有者成员关系、默认房间集、
/// 默认偏好与全零统计行
pub async fn create_home<R: HomeRepository>(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(homes): Extension<Arc<R>>,
    Extension(rooms): Extension<Arc<dyn RoomRepository>>,
    Extension(preferences): Extension<Arc<dyn PreferencesRepository>>,
    Extension(stats): Extension<Arc<dyn StatsRepository>>,
    Json(payload): Json<CreateHomeDto>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    payload.validate()?;

    let home = homes.create(&payload.name, user.id).await?;

    for (index, (room_type, name, icon)) in DEFAULT_ROOMS.iter().enumerate() {
        rooms
            .create(NewRoom {
                home_id: home.id,
                name: name.to_string(),
                room_type: room_type.to_string(),
                icon: Some(icon.to_string()),
                size_hint: None,
                sensitivity_tags: vec![],
                sort_order: index as i32,
            })
            .await?;
    }

    preferences
        .upsert(
            user.id,
            home.id,
            PreferencesUpdate {
                detail_level: Default::default(),
                cleaning_standard: Default::default(),
                restrictions: vec![],
                minutes_per_day: 30,
                days_per_week: vec![1, 2, 3, 4, 5],
            },
        )
        .await?;

    stats.find_or_create(user.id, home.id).await?;

    info!(home = %home.id, owner = %user.id, "Home created");
    Ok((StatusCode::CREATED, Json(json!(home))))
}

/// 列出当前用户所属的家庭
pub async fn list_homes<R: HomeRepository>(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(homes): Extension<Arc<R>>,
) -> Result<Json<Value>, AppError> {
    let homes = homes.list_by_user(user.id).await?;
    Ok(Json(json!(homes)))
}

/// 列出家庭成员
pub async fn list_members<R: HomeRepository>(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(homes): Extension<Arc<R>>,
    Path(home_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    homes
        .find_membership(home_id, user.id)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    let members = homes.list_members(home_id).await?;
    Ok(Json(json!(members)))
}

/// 发出成员邀请
///
/// 邀请以URL安全的随机令牌发出，兑换前成员行不绑定用户
pub async fn invite_member<R: HomeRepository>(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(homes): Extension<Arc<R>>,
    Path(home_id): Path<Uuid>,
    Json(payload): Json<InviteMemberDto>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    payload.validate()?;

    homes
        .find_membership(home_id, user.id)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    let token = Alphanumeric.sample_string(&mut rand::rng(), 32);
    let invite = homes.create_invite(home_id, &payload.email, &token).await?;

    Ok((StatusCode::CREATED, Json(json!(invite))))
}

/// 查询邀请详情
///
/// 邀请页在兑换前展示家庭名称与受邀邮箱
pub async fn get_invite<R: HomeRepository>(
    Extension(homes): Extension<Arc<R>>,
    Path(token): Path<String>,
) -> Result<Json<Value>, AppError> {
    let invite = homes
        .find_invite(&token)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    let home = homes
        .find_by_id(invite.home_id)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    Ok(Json(json!({ "invite": invite, "home": home })))
}

/// 兑换邀请令牌
///
/// 兑换的同时为新成员建立全零统计行
pub async fn accept_invite<R: HomeRepository>(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(homes): Extension<Arc<R>>,
    Extension(stats): Extension<Arc<dyn StatsRepository>>,
    Path(token): Path<String>,
) -> Result<Json<Value>, AppError> {
    let membership = homes.redeem_invite(&token, user.id).await?;
    stats.find_or_create(user.id, membership.home_id).await?;

    info!(home = %membership.home_id, user = %user.id, "Invite redeemed");
    Ok(Json(json!(membership)))
}

/// 查询当前用户在某家庭中的偏好
pub async fn get_preferences(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(preferences): Extension<Arc<dyn PreferencesRepository>>,
    Path(home_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let prefs = preferences
        .find(user.id, home_id)
        .await?
        .ok_or(RepositoryError::NotFound)?;
    Ok(Json(json!(prefs)))
}

/// 更新当前用户在某家庭中的偏好
pub async fn update_preferences(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(preferences): Extension<Arc<dyn PreferencesRepository>>,
    Path(home_id): Path<Uuid>,
    Json(payload): Json<PreferencesRequestDto>,
) -> Result<Json<Value>, AppError> {
    payload.validate()?;

    let prefs = preferences
        .upsert(
            user.id,
            home_id,
            PreferencesUpdate {
                detail_level: payload.detail_level,
                cleaning_standard: payload.cleaning_standard,
                restrictions: payload.restrictions,
                minutes_per_day: payload.minutes_per_day,
                days_per_week: payload.days_per_week,
            },
        )
        .await?;

    Ok(Json(json!(prefs)))
}
