// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::{Extension, Json};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::application::dto::analyze_request::AnalyzeRequestDto;
use crate::domain::models::analysis::AnalysisPreferences;
use crate::domain::services::analysis_service::AnalysisService;
use crate::infrastructure::metrics;
use crate::presentation::errors::AppError;
use crate::presentation::middleware::auth_middleware::CurrentUser;

/// 图片分析端点
///
/// 额度检查先于一切外部调用；分析成功（含修复路径）返回
/// 完整的分析JSON，本端点不做任何数据库写入。
pub async fn analyze(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(service): Extension<Arc<AnalysisService>>,
    Json(payload): Json<AnalyzeRequestDto>,
) -> Result<Json<Value>, AppError> {
    if payload.image_base64.is_empty() {
        return Err(anyhow::anyhow!("Imagen requerida").into());
    }

    if let Err(e) = service.check_scan_quota(&user) {
        metrics::record_analysis("quota_rejected");
        return Err(e.into());
    }

    let preferences: AnalysisPreferences = payload.preferences.into();
    let analysis = match service
        .analyze(
            &payload.image_base64,
            payload.selected_room.as_deref(),
            payload.room_type.as_deref(),
            &preferences,
        )
        .await
    {
        Ok(analysis) => analysis,
        Err(e) => {
            metrics::record_analysis("failed");
            return Err(e.into());
        }
    };

    metrics::record_analysis("ok");
    info!(
        user = %user.id,
        tasks = analysis.tasks.len(),
        before_score = analysis.before_score,
        "Image analysis completed"
    );

    Ok(Json(json!(analysis)))
}
