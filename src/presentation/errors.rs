// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::models::task::DomainError;
use crate::domain::repositories::task_repository::RepositoryError;
use crate::domain::services::auth_gateway::AuthError;
use crate::domain::services::billing_service::BillingError;
use crate::domain::services::push_service::{NotificationError, PushError};
use crate::domain::services::vision::AnalysisError;

/// 应用错误类型
///
/// 封装所有可能的应用层错误，提供统一的错误处理接口。
/// 错误体一律为 `{ "error": <面向用户的消息> }`，细节只进日志。
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_message = self.0.to_string();

        let status = if let Some(auth) = self.0.downcast_ref::<AuthError>() {
            match auth {
                AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
                AuthError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else if let Some(analysis) = self.0.downcast_ref::<AnalysisError>() {
            match analysis {
                AnalysisError::QuotaExceeded { .. } => StatusCode::BAD_REQUEST,
                // Configuration, upstream, empty and parse failures all surface as 500
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else if let Some(billing) = self.0.downcast_ref::<BillingError>() {
            match billing {
                BillingError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
                BillingError::InvalidSignature => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else if let Some(notification) = self.0.downcast_ref::<NotificationError>() {
            match notification {
                NotificationError::NoSubscriptions => StatusCode::NOT_FOUND,
                NotificationError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else if let Some(push) = self.0.downcast_ref::<PushError>() {
            match push {
                PushError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else if self.0.downcast_ref::<DomainError>().is_some() {
            StatusCode::BAD_REQUEST
        } else if self.0.downcast_ref::<validator::ValidationErrors>().is_some() {
            StatusCode::BAD_REQUEST
        } else {
            match self.0.downcast_ref::<RepositoryError>() {
                Some(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
                Some(RepositoryError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
                None => {
                    // 检查是否为验证错误（包含特定关键词）
                    if error_message.contains("requerida")
                        || error_message.contains("inválida")
                        || error_message.contains("cannot be empty")
                        || error_message.contains("required")
                    {
                        StatusCode::BAD_REQUEST
                    } else {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                }
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
