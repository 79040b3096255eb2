// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error};

use crate::domain::models::analysis::{AnalysisPreferences, RoomAnalysis};
use crate::domain::models::user::{SubscriptionTier, UserProfile};
use crate::domain::services::prompt::build_system_prompt;
use crate::domain::services::schema::validate_or_repair;
use crate::domain::services::vision::{AnalysisError, VisionClient};

/// 分析服务
///
/// 把一张房间照片和用户偏好变成一个类型化的清洁计划：
/// 组装系统指令，调用视觉模型，严格解析返回文本，
/// 校验失败时以缺省值修复。额度检查发生在任何上游调用之前。
pub struct AnalysisService {
    vision: Arc<dyn VisionClient>,
    /// 是否启用计费（未启用时不限制扫描次数）
    billing_enabled: bool,
    /// 免费档每月扫描上限
    free_scan_limit: i32,
}

impl AnalysisService {
    /// 创建分析服务
    pub fn new(vision: Arc<dyn VisionClient>, billing_enabled: bool, free_scan_limit: i32) -> Self {
        Self {
            vision,
            billing_enabled,
            free_scan_limit,
        }
    }

    /// 检查用户的扫描额度
    ///
    /// 计费启用时，免费档用户的月度计数达到上限即拒绝，
    /// 不发起任何外部请求。计数只在计划被接受时递增，
    /// 分析尝试本身不消耗额度。
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 允许继续
    /// * `Err(AnalysisError::QuotaExceeded)` - 额度已用完
    pub fn check_scan_quota(&self, user: &UserProfile) -> Result<(), AnalysisError> {
        if !self.billing_enabled {
            return Ok(());
        }
        if user.subscription_tier == SubscriptionTier::Free
            && user.scans_this_month >= self.free_scan_limit
        {
            return Err(AnalysisError::QuotaExceeded {
                limit: self.free_scan_limit,
            });
        }
        Ok(())
    }

    /// 分析一张房间照片
    ///
    /// # 参数
    ///
    /// * `image_base64` - base64编码的JPEG图片
    /// * `room_name` - 用户选择的房间名称（可选）
    /// * `room_type` - 房间类型（可选）
    /// * `preferences` - 偏好快照
    ///
    /// # 返回值
    ///
    /// * `Ok(RoomAnalysis)` - 校验通过或已修复的分析结果
    /// * `Err(AnalysisError)` - 配置、传输、空响应或JSON解析错误
    pub async fn analyze(
        &self,
        image_base64: &str,
        room_name: Option<&str>,
        room_type: Option<&str>,
        preferences: &AnalysisPreferences,
    ) -> Result<RoomAnalysis, AnalysisError> {
        let system_prompt = build_system_prompt(preferences, room_name, room_type);
        debug!(prompt_len = system_prompt.len(), "Submitting image analysis");

        let content = self
            .vision
            .analyze_image(&system_prompt, image_base64)
            .await?;

        // Parse failure is a hard request failure: no retry, no repair
        let raw: Value = serde_json::from_str(&content).map_err(|e| {
            error!("Failed to parse AI response as JSON: {}", e);
            AnalysisError::InvalidResponse
        })?;

        Ok(validate_or_repair(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::preferences::{CleaningStandard, DetailLevel};
    use crate::domain::models::task::TaskCategory;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    struct CannedVision {
        content: String,
        calls: AtomicUsize,
    }

    impl CannedVision {
        fn new(content: &str) -> Self {
            Self {
                content: content.to_string(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl VisionClient for CannedVision {
        async fn analyze_image(
            &self,
            _system_prompt: &str,
            _image_base64: &str,
        ) -> Result<String, AnalysisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.content.clone())
        }
    }

    fn prefs() -> AnalysisPreferences {
        AnalysisPreferences {
            detail_level: DetailLevel::Normal,
            cleaning_standard: CleaningStandard::Quick,
            restrictions: vec![],
            sensitivity_tags: vec![],
        }
    }

    fn user(tier: SubscriptionTier, scans: i32) -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            email: "ana@example.com".to_string(),
            full_name: None,
            avatar_url: None,
            subscription_tier: tier,
            subscription_status: None,
            billing_customer_id: None,
            trial_ends_at: None,
            scans_this_month: scans,
            last_scan_reset: Utc::now().date_naive(),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_analyze_parses_valid_response() {
        let content = r#"{
            "room_guess": "Dormitorio",
            "room_confidence": 70,
            "observations": [],
            "tasks": [{
                "title": "Hacer la cama",
                "description_steps": ["Estirar sábanas"],
                "category": "order",
                "estimated_minutes": 5,
                "difficulty": 1,
                "priority": 1,
                "supplies": [],
                "safety_notes": [],
                "assignable": true,
                "quick_win": true
            }],
            "total_estimated_minutes": 5,
            "suggested_recurring_tasks": [],
            "before_score": 65,
            "summary": "Dormitorio en buen estado",
            "quick_wins_summary": "La cama en 5 minutos"
        }"#;

        let service = AnalysisService::new(Arc::new(CannedVision::new(content)), false, 5);
        let analysis = service.analyze("aW1n", None, None, &prefs()).await.unwrap();
        assert_eq!(analysis.tasks[0].category, TaskCategory::Order);
        assert!(analysis.tasks[0].quick_win);
    }

    #[tokio::test]
    async fn test_analyze_rejects_non_json_without_repair() {
        let service = AnalysisService::new(
            Arc::new(CannedVision::new("Claro, aquí tienes el plan: ...")),
            false,
            5,
        );
        let err = service
            .analyze("aW1n", None, None, &prefs())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidResponse));
    }

    #[tokio::test]
    async fn test_analyze_repairs_schema_violations() {
        // JSON 合法但不合模式：进入修复路径而不是报错
        let service = AnalysisService::new(
            Arc::new(CannedVision::new(r#"{"tasks": [{"title": "Ordenar"}]}"#)),
            false,
            5,
        );
        let analysis = service.analyze("aW1n", None, None, &prefs()).await.unwrap();
        assert_eq!(analysis.tasks[0].title, "Ordenar");
        assert_eq!(analysis.tasks[0].estimated_minutes, 5);
        assert_eq!(analysis.summary, "Análisis completado");
    }

    #[test]
    fn test_quota_rejects_free_user_at_limit() {
        let vision = Arc::new(CannedVision::new("{}"));
        let service = AnalysisService::new(vision, true, 5);

        let err = service
            .check_scan_quota(&user(SubscriptionTier::Free, 5))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::QuotaExceeded { limit: 5 }));
        assert!(err.to_string().contains("límite de 5"));

        assert!(service
            .check_scan_quota(&user(SubscriptionTier::Free, 4))
            .is_ok());
    }

    #[test]
    fn test_quota_ignores_premium_and_disabled_billing() {
        let vision = Arc::new(CannedVision::new("{}"));

        let service = AnalysisService::new(vision.clone(), true, 5);
        assert!(service
            .check_scan_quota(&user(SubscriptionTier::Premium, 99))
            .is_ok());

        let service = AnalysisService::new(vision, false, 5);
        assert!(service
            .check_scan_quota(&user(SubscriptionTier::Free, 99))
            .is_ok());
    }
}
