// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use crate::config::settings::AuthSettings;
use crate::domain::services::auth_gateway::{AuthError, AuthGateway, AuthSession, AuthUser};

/// 认证网关实现
///
/// 通过托管身份提供商的HTTP接口交换授权码与校验访问令牌。
/// 提供商拒绝的令牌一律映射为未认证，不区分原因。
pub struct HttpAuthGateway {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    user: UserResponse,
}

#[derive(Deserialize)]
struct UserResponse {
    id: Uuid,
    email: String,
}

impl HttpAuthGateway {
    /// 从配置创建认证网关
    pub fn new(settings: &AuthSettings) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl AuthGateway for HttpAuthGateway {
    async fn exchange_code(&self, code: &str) -> Result<AuthSession, AuthError> {
        let response = self
            .client
            .post(format!(
                "{}/token?grant_type=authorization_code",
                self.base_url
            ))
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "auth_code": code }))
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::Unauthenticated);
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        Ok(AuthSession {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            user: AuthUser {
                id: token.user.id,
                email: token.user.email,
            },
        })
    }

    async fn get_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        let response = self
            .client
            .get(format!("{}/user", self.base_url))
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", access_token))
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::Unauthenticated);
        }

        let user: UserResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        Ok(AuthUser {
            id: user.id,
            email: user.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway(base_url: &str) -> HttpAuthGateway {
        HttpAuthGateway::new(&AuthSettings {
            base_url: base_url.to_string(),
            api_key: "anon-key".to_string(),
        })
    }

    #[tokio::test]
    async fn test_get_user_resolves_identity() {
        let server = MockServer::start().await;
        let user_id = Uuid::new_v4();
        Mock::given(method("GET"))
            .and(path("/user"))
            .and(header("Authorization", "Bearer token-abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": user_id.to_string(),
                "email": "ana@example.com"
            })))
            .mount(&server)
            .await;

        let user = gateway(&server.uri()).get_user("token-abc").await.unwrap();
        assert_eq!(user.id, user_id);
        assert_eq!(user.email, "ana@example.com");
    }

    #[tokio::test]
    async fn test_rejected_token_is_unauthenticated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = gateway(&server.uri()).get_user("bad").await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated));
    }
}
