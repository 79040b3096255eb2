// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{extract::Path, http::StatusCode, Extension, Json};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::application::dto::home_request::RoomRequestDto;
use crate::domain::repositories::home_repository::HomeRepository;
use crate::domain::repositories::room_repository::{NewRoom, RoomRepository};
use crate::domain::repositories::task_repository::RepositoryError;
use crate::presentation::errors::AppError;
use crate::presentation::middleware::auth_middleware::CurrentUser;

/// 创建房间
pub async fn create_room(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(homes): Extension<Arc<dyn HomeRepository>>,
    Extension(rooms): Extension<Arc<dyn RoomRepository>>,
    Path(home_id): Path<Uuid>,
    Json(payload): Json<RoomRequestDto>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    payload.validate()?;

    homes
        .find_membership(home_id, user.id)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    let room = rooms
        .create(NewRoom {
            home_id,
            name: payload.name,
            room_type: payload.room_type,
            icon: payload.icon,
            size_hint: payload.size_hint,
            sensitivity_tags: payload.sensitivity_tags,
            sort_order: payload.sort_order,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(json!(room))))
}

/// 列出家庭内的房间
pub async fn list_rooms(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(homes): Extension<Arc<dyn HomeRepository>>,
    Extension(rooms): Extension<Arc<dyn RoomRepository>>,
    Path(home_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    homes
        .find_membership(home_id, user.id)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    let rooms = rooms.list_by_home(home_id).await?;
    Ok(Json(json!(rooms)))
}

/// 更新房间
pub async fn update_room(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(homes): Extension<Arc<dyn HomeRepository>>,
    Extension(rooms): Extension<Arc<dyn RoomRepository>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RoomRequestDto>,
) -> Result<Json<Value>, AppError> {
    payload.validate()?;

    let mut room = rooms.find_by_id(id).await?.ok_or(RepositoryError::NotFound)?;

    homes
        .find_membership(room.home_id, user.id)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    room.name = payload.name;
    room.room_type = payload.room_type;
    room.icon = payload.icon;
    room.size_hint = payload.size_hint;
    room.sensitivity_tags = payload.sensitivity_tags;
    room.sort_order = payload.sort_order;

    let room = rooms.update(&room).await?;
    Ok(Json(json!(room)))
}

/// 删除房间
pub async fn delete_room(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(homes): Extension<Arc<dyn HomeRepository>>,
    Extension(rooms): Extension<Arc<dyn RoomRepository>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let room = rooms.find_by_id(id).await?.ok_or(RepositoryError::NotFound)?;

    homes
        .find_membership(room.home_id, user.id)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    rooms.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
