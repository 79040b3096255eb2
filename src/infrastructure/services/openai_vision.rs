// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::error;

use crate::config::settings::AiSettings;
use crate::domain::services::vision::{AnalysisError, VisionClient};

/// 视觉模型客户端实现
///
/// 调用OpenAI兼容的chat completions接口，图片以base64数据URL
/// 形式随消息提交，并要求模型只返回一个JSON对象。
///
/// # 配置
///
/// - `ai.api_key` - API密钥（缺失时所有调用返回配置错误）
/// - `ai.model` - 模型名称（默认 gpt-4o）
/// - `ai.api_base_url` - API基础URL
/// - `ai.max_tokens` - 生成令牌上限
pub struct OpenAiVisionClient {
    api_key: Option<String>,
    model: String,
    api_base_url: String,
    max_tokens: u32,
    client: reqwest::Client,
}

impl OpenAiVisionClient {
    /// 从配置创建客户端
    pub fn new(settings: &AiSettings) -> Self {
        Self {
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            api_base_url: settings.api_base_url.clone(),
            max_tokens: settings.max_tokens,
            client: reqwest::Client::new(),
        }
    }

    /// 使用的模型名称（记录到扫描行）
    pub fn model_name(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl VisionClient for OpenAiVisionClient {
    async fn analyze_image(
        &self,
        system_prompt: &str,
        image_base64: &str,
    ) -> Result<String, AnalysisError> {
        let api_key = self.api_key.as_ref().ok_or(AnalysisError::NotConfigured)?;

        let request_body = json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": [
                {
                    "role": "system",
                    "content": system_prompt
                },
                {
                    "role": "user",
                    "content": [
                        {
                            "type": "image_url",
                            "image_url": {
                                "url": format!("data:image/jpeg;base64,{}", image_base64),
                                "detail": "high"
                            }
                        },
                        {
                            "type": "text",
                            "text": "Analiza esta imagen y genera el plan de limpieza en formato JSON."
                        }
                    ]
                }
            ],
            "response_format": { "type": "json_object" }
        });

        let url = format!("{}/chat/completions", self.api_base_url);
        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| AnalysisError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Vision API returned error: {} - {}", status, error_text);
            return Err(AnalysisError::Upstream(format!("HTTP {}", status)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AnalysisError::Upstream(e.to_string()))?;

        match body["choices"][0]["message"]["content"].as_str() {
            Some(content) if !content.trim().is_empty() => Ok(content.to_string()),
            _ => Err(AnalysisError::EmptyResponse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(api_key: Option<&str>, base_url: &str) -> AiSettings {
        AiSettings {
            api_key: api_key.map(String::from),
            model: "gpt-4o".to_string(),
            api_base_url: base_url.to_string(),
            max_tokens: 4096,
        }
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_any_request() {
        let server = MockServer::start().await;
        let client = OpenAiVisionClient::new(&settings(None, &server.uri()));

        let err = client.analyze_image("prompt", "aW1n").await.unwrap_err();
        assert!(matches!(err, AnalysisError::NotConfigured));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_returns_message_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [
                    { "message": { "content": "{\"before_score\": 80}" } }
                ]
            })))
            .mount(&server)
            .await;

        let client = OpenAiVisionClient::new(&settings(Some("sk-test"), &server.uri()));
        let content = client.analyze_image("prompt", "aW1n").await.unwrap();
        assert_eq!(content, "{\"before_score\": 80}");
    }

    #[tokio::test]
    async fn test_http_failure_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = OpenAiVisionClient::new(&settings(Some("sk-test"), &server.uri()));
        let err = client.analyze_image("prompt", "aW1n").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_missing_content_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "choices": [] })),
            )
            .mount(&server)
            .await;

        let client = OpenAiVisionClient::new(&settings(Some("sk-test"), &server.uri()));
        let err = client.analyze_image("prompt", "aW1n").await.unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyResponse));
    }
}
