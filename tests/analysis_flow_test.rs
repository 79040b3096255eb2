// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 分析流程集成测试
//!
//! 用本地mock服务器扮演视觉模型接口，端到端验证
//! 提示词提交、严格解析与缺省修复三条路径。

use std::sync::Arc;

use limpia::config::settings::AiSettings;
use limpia::domain::models::analysis::AnalysisPreferences;
use limpia::domain::models::preferences::{CleaningStandard, DetailLevel};
use limpia::domain::models::task::TaskCategory;
use limpia::domain::services::analysis_service::AnalysisService;
use limpia::domain::services::vision::{AnalysisError, VisionClient};
use limpia::infrastructure::services::openai_vision::OpenAiVisionClient;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ai_settings(base_url: &str) -> AiSettings {
    AiSettings {
        api_key: Some("sk-test".to_string()),
        model: "gpt-4o".to_string(),
        api_base_url: base_url.to_string(),
        max_tokens: 4096,
    }
}

fn preferences() -> AnalysisPreferences {
    AnalysisPreferences {
        detail_level: DetailLevel::Brief,
        cleaning_standard: CleaningStandard::Quick,
        restrictions: vec!["no usar lejía".to_string()],
        sensitivity_tags: vec!["suelo de madera".to_string()],
    }
}

fn completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [ { "message": { "content": content } } ]
    })
}

#[tokio::test]
async fn analysis_round_trip_returns_typed_plan() {
    let server = MockServer::start().await;
    let content = r#"{
        "room_guess": "Cocina",
        "room_confidence": 90,
        "observations": [
            { "description": "Encimera con migas", "severity": "medium", "location": null, "uncertain": false }
        ],
        "tasks": [
            {
                "title": "Limpiar la encimera",
                "description_steps": ["Despejar", "Pasar bayeta"],
                "category": "surfaces",
                "estimated_minutes": 10,
                "difficulty": 2,
                "priority": 1,
                "supplies": ["bayeta"],
                "safety_notes": [],
                "assignable": true,
                "quick_win": true
            }
        ],
        "total_estimated_minutes": 10,
        "suggested_recurring_tasks": [],
        "before_score": 55,
        "summary": "La cocina necesita una pasada rápida",
        "quick_wins_summary": "Encimera en 10 minutos"
    }"#;

    // 限制与特征必须逐字出现在提交给模型的指令里
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("no usar lejía"))
        .and(body_string_contains("suelo de madera"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(content)))
        .mount(&server)
        .await;

    let client = Arc::new(OpenAiVisionClient::new(&ai_settings(&server.uri())));
    let service = AnalysisService::new(client, false, 5);

    let analysis = service
        .analyze("aW1hZ2Vu", Some("Cocina"), Some("kitchen"), &preferences())
        .await
        .unwrap();

    assert_eq!(analysis.room_guess.as_deref(), Some("Cocina"));
    assert_eq!(analysis.tasks.len(), 1);
    assert_eq!(analysis.tasks[0].category, TaskCategory::Surfaces);
    assert!(analysis.tasks[0].quick_win);
    assert_eq!(analysis.before_score, 55);
}

#[tokio::test]
async fn malformed_body_is_a_hard_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            "Claro, aquí tienes el plan de limpieza en una lista:",
        )))
        .mount(&server)
        .await;

    let client = Arc::new(OpenAiVisionClient::new(&ai_settings(&server.uri())));
    let service = AnalysisService::new(client, false, 5);

    let err = service
        .analyze("aW1hZ2Vu", None, None, &preferences())
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidResponse));
}

#[tokio::test]
async fn schema_violations_are_repaired_not_failed() {
    let server = MockServer::start().await;
    // JSON合法，但任务字段残缺且难度越界
    let content = r#"{
        "tasks": [
            { "title": "Recoger juguetes", "category": "order", "difficulty": 9 }
        ],
        "before_score": 45,
        "summary": "Sala desordenada"
    }"#;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(content)))
        .mount(&server)
        .await;

    let client = Arc::new(OpenAiVisionClient::new(&ai_settings(&server.uri())));
    let service = AnalysisService::new(client, false, 5);

    let analysis = service
        .analyze("aW1hZ2Vu", None, None, &preferences())
        .await
        .unwrap();

    let task = &analysis.tasks[0];
    assert_eq!(task.title, "Recoger juguetes");
    assert_eq!(task.category, TaskCategory::Order);
    assert_eq!(task.difficulty, 3);
    assert_eq!(task.estimated_minutes, 5);
    assert_eq!(task.priority, 5);
    assert!(task.assignable);
    assert_eq!(analysis.before_score, 45);
    assert_eq!(analysis.summary, "Sala desordenada");
}

#[tokio::test]
async fn upstream_errors_surface_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let client = Arc::new(OpenAiVisionClient::new(&ai_settings(&server.uri())));
    let service = AnalysisService::new(client, false, 5);

    let err = service
        .analyze("aW1hZ2Vu", None, None, &preferences())
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::Upstream(_)));
}

#[tokio::test]
async fn vision_client_sends_data_url_and_json_mode() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("data:image/jpeg;base64,aW1hZ2Vu"))
        .and(body_string_contains("json_object"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("{}")))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiVisionClient::new(&ai_settings(&server.uri()));
    let content = client.analyze_image("prompt", "aW1hZ2Vu").await.unwrap();
    assert_eq!(content, "{}");
}
