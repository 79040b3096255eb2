// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::error;
use uuid::Uuid;

use crate::config::settings::{BillingSettings, ServerSettings};
use crate::domain::services::billing_service::{BillingError, BillingProvider};

/// 计费提供商客户端实现
///
/// 提供商的接口使用表单编码的请求体；嵌套参数以
/// `parent[child]` 键名表示。结账与门户会话都是托管页面，
/// 这里只负责创建会话并取回跳转URL。
pub struct StripeBillingProvider {
    secret_key: Option<String>,
    price_id: Option<String>,
    api_base_url: String,
    app_url: String,
    trial_days: i64,
    client: reqwest::Client,
}

impl StripeBillingProvider {
    /// 从配置创建客户端
    pub fn new(billing: &BillingSettings, server: &ServerSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            secret_key: billing.secret_key.clone(),
            price_id: billing.price_id.clone(),
            api_base_url: billing.api_base_url.clone(),
            app_url: server.app_url.clone(),
            trial_days: billing.trial_days,
            client,
        }
    }

    async fn post_form(&self, path: &str, params: &[(String, String)]) -> Result<Value, BillingError> {
        let secret_key = self
            .secret_key
            .as_ref()
            .ok_or(BillingError::NotConfigured)?;

        let body = serde_urlencoded::to_string(params)
            .map_err(|e| BillingError::Provider(e.to_string()))?;

        let response = self
            .client
            .post(format!("{}{}", self.api_base_url, path))
            .header("Authorization", format!("Bearer {}", secret_key))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .map_err(|e| BillingError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Billing API returned error: {} - {}", status, error_text);
            return Err(BillingError::Provider(format!("HTTP {}", status)));
        }

        response
            .json()
            .await
            .map_err(|e| BillingError::Provider(e.to_string()))
    }
}

#[async_trait]
impl BillingProvider for StripeBillingProvider {
    async fn create_customer(&self, email: &str, user_id: Uuid) -> Result<String, BillingError> {
        let params = vec![
            ("email".to_string(), email.to_string()),
            ("metadata[user_id]".to_string(), user_id.to_string()),
        ];

        let body = self.post_form("/customers", &params).await?;
        body["id"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| BillingError::Provider("Customer response missing id".to_string()))
    }

    async fn create_checkout_session(
        &self,
        customer_id: &str,
        user_id: Uuid,
    ) -> Result<String, BillingError> {
        let price_id = self.price_id.as_ref().ok_or(BillingError::NotConfigured)?;

        let params = vec![
            ("customer".to_string(), customer_id.to_string()),
            ("mode".to_string(), "subscription".to_string()),
            ("payment_method_types[0]".to_string(), "card".to_string()),
            ("line_items[0][price]".to_string(), price_id.clone()),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
            (
                "subscription_data[trial_period_days]".to_string(),
                self.trial_days.to_string(),
            ),
            (
                "success_url".to_string(),
                format!("{}/settings?tab=billing&success=true", self.app_url),
            ),
            (
                "cancel_url".to_string(),
                format!("{}/settings?tab=billing&canceled=true", self.app_url),
            ),
            ("metadata[user_id]".to_string(), user_id.to_string()),
        ];

        let body = self.post_form("/checkout/sessions", &params).await?;
        body["url"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| BillingError::Provider("Checkout session missing url".to_string()))
    }

    async fn create_portal_session(&self, customer_id: &str) -> Result<String, BillingError> {
        let params = vec![
            ("customer".to_string(), customer_id.to_string()),
            (
                "return_url".to_string(),
                format!("{}/settings?tab=billing", self.app_url),
            ),
        ];

        let body = self.post_form("/billing_portal/sessions", &params).await?;
        body["url"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| BillingError::Provider("Portal session missing url".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(secret: Option<&str>, base_url: &str) -> StripeBillingProvider {
        let billing = BillingSettings {
            enabled: true,
            secret_key: secret.map(String::from),
            webhook_secret: Some("whsec_test".to_string()),
            price_id: Some("price_123".to_string()),
            api_base_url: base_url.to_string(),
            trial_days: 7,
        };
        let server = ServerSettings {
            host: "0.0.0.0".to_string(),
            port: 3000,
            app_url: "https://app.example".to_string(),
        };
        StripeBillingProvider::new(&billing, &server)
    }

    #[tokio::test]
    async fn test_create_checkout_session_returns_hosted_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/checkout/sessions"))
            .and(body_string_contains("mode=subscription"))
            .and(body_string_contains("line_items%5B0%5D%5Bprice%5D=price_123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "cs_test",
                "url": "https://checkout.example/cs_test"
            })))
            .mount(&server)
            .await;

        let provider = provider(Some("sk_test"), &server.uri());
        let url = provider
            .create_checkout_session("cus_1", Uuid::new_v4())
            .await
            .unwrap();
        assert_eq!(url, "https://checkout.example/cs_test");
    }

    #[tokio::test]
    async fn test_missing_secret_key_is_not_configured() {
        let server = MockServer::start().await;
        let provider = provider(None, &server.uri());
        let err = provider
            .create_customer("ana@example.com", Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, BillingError::NotConfigured));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
