// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::models::user::{SubscriptionStatus, SubscriptionTier, UserProfile};
use crate::domain::repositories::user_repository::UserRepository;

type HmacSha256 = Hmac<Sha256>;

/// 计费错误类型
#[derive(Error, Debug)]
pub enum BillingError {
    /// 计费未配置，相关端点应答503
    #[error("Billing is not enabled")]
    NotConfigured,

    /// 计费提供商调用失败
    #[error("Error al crear sesión de pago")]
    Provider(String),

    /// Webhook签名缺失或校验失败
    #[error("Invalid webhook signature")]
    InvalidSignature,

    /// 数据访问错误
    #[error("Database error: {0}")]
    Repository(String),
}

/// 计费提供商特质
///
/// 托管支付平台的调用抽象：创建客户、发起结账会话、
/// 打开自助管理门户。全部经由其HTTP接口完成。
#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// 创建计费客户，返回提供商侧客户ID
    async fn create_customer(&self, email: &str, user_id: Uuid) -> Result<String, BillingError>;
    /// 创建订阅结账会话，返回托管页面URL
    async fn create_checkout_session(
        &self,
        customer_id: &str,
        user_id: Uuid,
    ) -> Result<String, BillingError>;
    /// 创建自助管理门户会话，返回托管页面URL
    async fn create_portal_session(&self, customer_id: &str) -> Result<String, BillingError>;
}

/// 订阅生命周期事件
///
/// 从计费提供商的webhook负载解析而来，未识别的事件类型
/// 归入 `Ignored` 并原样确认。
#[derive(Debug, Clone, PartialEq)]
pub enum BillingEvent {
    /// 结账完成：开通高级档并进入试用
    CheckoutCompleted { user_id: Uuid },
    /// 订阅创建或更新：档位由状态推导
    SubscriptionUpdated {
        customer_id: String,
        status: SubscriptionStatus,
        trial_end: Option<DateTime<FixedOffset>>,
    },
    /// 订阅删除：回落到免费档
    SubscriptionDeleted { customer_id: String },
    /// 付款失败：标记逾期
    PaymentFailed { customer_id: String },
    /// 其他事件，确认但不处理
    Ignored,
}

/// 校验webhook签名
///
/// 签名头格式为 `t=<unix秒>,v1=<hex摘要>`，摘要为对
/// `"{t}.{payload}"` 的HMAC-SHA256。时间戳不做容差检查，
/// 只验证完整性。
pub fn verify_webhook_signature(
    payload: &str,
    signature_header: &str,
    secret: &str,
) -> Result<(), BillingError> {
    let mut timestamp = None;
    let mut signature = None;
    for part in signature_header.split(',') {
        match part.split_once('=') {
            Some(("t", v)) => timestamp = Some(v),
            Some(("v1", v)) => signature = Some(v),
            _ => {}
        }
    }

    let (timestamp, signature) = match (timestamp, signature) {
        (Some(t), Some(s)) => (t, s),
        _ => return Err(BillingError::InvalidSignature),
    };

    let message = format!("{}.{}", timestamp, payload);
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| BillingError::InvalidSignature)?;
    mac.update(message.as_bytes());
    let expected = hex::encode(mac.finalize().into_bytes());

    if expected == signature {
        Ok(())
    } else {
        Err(BillingError::InvalidSignature)
    }
}

/// 解析webhook事件负载
///
/// 负载形如 `{"type": "...", "data": {"object": {...}}}`
pub fn parse_billing_event(payload: &Value) -> BillingEvent {
    let event_type = payload.get("type").and_then(Value::as_str).unwrap_or("");
    let object = &payload["data"]["object"];

    match event_type {
        "checkout.session.completed" => {
            let user_id = object["metadata"]["user_id"]
                .as_str()
                .and_then(|s| Uuid::parse_str(s).ok());
            match user_id {
                Some(user_id) => BillingEvent::CheckoutCompleted { user_id },
                None => {
                    warn!("checkout.session.completed without user metadata");
                    BillingEvent::Ignored
                }
            }
        }
        "customer.subscription.created" | "customer.subscription.updated" => {
            let customer_id = match object["customer"].as_str() {
                Some(c) => c.to_string(),
                None => return BillingEvent::Ignored,
            };
            let status = object["status"]
                .as_str()
                .and_then(|s| s.parse::<SubscriptionStatus>().ok())
                .unwrap_or(SubscriptionStatus::Incomplete);
            let trial_end = object["trial_end"]
                .as_i64()
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
                .map(|dt| dt.fixed_offset());
            BillingEvent::SubscriptionUpdated {
                customer_id,
                status,
                trial_end,
            }
        }
        "customer.subscription.deleted" => match object["customer"].as_str() {
            Some(c) => BillingEvent::SubscriptionDeleted {
                customer_id: c.to_string(),
            },
            None => BillingEvent::Ignored,
        },
        "invoice.payment_failed" => match object["customer"].as_str() {
            Some(c) => BillingEvent::PaymentFailed {
                customer_id: c.to_string(),
            },
            None => BillingEvent::Ignored,
        },
        _ => BillingEvent::Ignored,
    }
}

/// 订阅服务
///
/// 协调计费提供商与用户行：发起结账/门户会话，
/// 处理异步订阅生命周期事件并把档位与状态写回用户记录。
pub struct SubscriptionService {
    provider: Arc<dyn BillingProvider>,
    users: Arc<dyn UserRepository>,
    trial_days: i64,
}

impl SubscriptionService {
    /// 创建订阅服务
    pub fn new(
        provider: Arc<dyn BillingProvider>,
        users: Arc<dyn UserRepository>,
        trial_days: i64,
    ) -> Self {
        Self {
            provider,
            users,
            trial_days,
        }
    }

    /// 为当前用户发起结账会话
    ///
    /// 用户还没有计费客户ID时先创建并记录，再返回托管结账URL
    pub async fn start_checkout(&self, user: &UserProfile) -> Result<String, BillingError> {
        let customer_id = match &user.billing_customer_id {
            Some(id) => id.clone(),
            None => {
                let id = self.provider.create_customer(&user.email, user.id).await?;
                self.users
                    .set_billing_customer(user.id, &id)
                    .await
                    .map_err(|e| BillingError::Repository(e.to_string()))?;
                id
            }
        };

        self.provider
            .create_checkout_session(&customer_id, user.id)
            .await
    }

    /// 为当前用户打开自助管理门户
    pub async fn open_portal(&self, user: &UserProfile) -> Result<String, BillingError> {
        let customer_id = user
            .billing_customer_id
            .as_deref()
            .ok_or_else(|| BillingError::Provider("No billing customer".to_string()))?;
        self.provider.create_portal_session(customer_id).await
    }

    /// 处理一条订阅生命周期事件
    ///
    /// 找不到对应用户的事件记录警告后确认，不算失败
    pub async fn apply_event(&self, event: BillingEvent) -> Result<(), BillingError> {
        match event {
            BillingEvent::CheckoutCompleted { user_id } => {
                let trial_ends_at = (Utc::now() + Duration::days(self.trial_days)).fixed_offset();
                self.users
                    .update_subscription(
                        user_id,
                        SubscriptionTier::Premium,
                        Some(SubscriptionStatus::Trialing),
                        Some(trial_ends_at),
                    )
                    .await
                    .map_err(|e| BillingError::Repository(e.to_string()))?;
                info!(user = %user_id, "Checkout completed, premium trial started");
            }
            BillingEvent::SubscriptionUpdated {
                customer_id,
                status,
                trial_end,
            } => {
                let Some(user) = self.find_by_customer(&customer_id).await? else {
                    return Ok(());
                };
                let tier = if status.grants_premium() {
                    SubscriptionTier::Premium
                } else {
                    SubscriptionTier::Free
                };
                self.users
                    .update_subscription(user.id, tier, Some(status), trial_end)
                    .await
                    .map_err(|e| BillingError::Repository(e.to_string()))?;
            }
            BillingEvent::SubscriptionDeleted { customer_id } => {
                let Some(user) = self.find_by_customer(&customer_id).await? else {
                    return Ok(());
                };
                self.users
                    .update_subscription(
                        user.id,
                        SubscriptionTier::Free,
                        Some(SubscriptionStatus::Cancelled),
                        None,
                    )
                    .await
                    .map_err(|e| BillingError::Repository(e.to_string()))?;
            }
            BillingEvent::PaymentFailed { customer_id } => {
                let Some(user) = self.find_by_customer(&customer_id).await? else {
                    return Ok(());
                };
                self.users
                    .update_subscription(
                        user.id,
                        user.subscription_tier,
                        Some(SubscriptionStatus::PastDue),
                        user.trial_ends_at,
                    )
                    .await
                    .map_err(|e| BillingError::Repository(e.to_string()))?;
            }
            BillingEvent::Ignored => {}
        }

        Ok(())
    }

    async fn find_by_customer(
        &self,
        customer_id: &str,
    ) -> Result<Option<UserProfile>, BillingError> {
        let user = self
            .users
            .find_by_billing_customer(customer_id)
            .await
            .map_err(|e| BillingError::Repository(e.to_string()))?;
        if user.is_none() {
            warn!(customer = customer_id, "Billing event for unknown customer");
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sign(payload: &str, secret: &str, timestamp: i64) -> String {
        let message = format!("{}.{}", timestamp, payload);
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(message.as_bytes());
        format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
    }

    #[test]
    fn test_signature_round_trip() {
        let payload = r#"{"type":"invoice.payment_failed"}"#;
        let header = sign(payload, "whsec_test", 1767225600);
        assert!(verify_webhook_signature(payload, &header, "whsec_test").is_ok());
    }

    #[test]
    fn test_signature_rejects_tampered_payload() {
        let header = sign(r#"{"a":1}"#, "whsec_test", 1767225600);
        assert!(matches!(
            verify_webhook_signature(r#"{"a":2}"#, &header, "whsec_test"),
            Err(BillingError::InvalidSignature)
        ));
    }

    #[test]
    fn test_signature_rejects_malformed_header() {
        for header in ["", "v1=abc", "t=123", "garbage"] {
            assert!(verify_webhook_signature("{}", header, "whsec_test").is_err());
        }
    }

    #[test]
    fn test_parse_checkout_completed() {
        let user_id = Uuid::new_v4();
        let payload = json!({
            "type": "checkout.session.completed",
            "data": { "object": { "metadata": { "user_id": user_id.to_string() } } }
        });
        assert_eq!(
            parse_billing_event(&payload),
            BillingEvent::CheckoutCompleted { user_id }
        );
    }

    #[test]
    fn test_parse_subscription_updated_maps_status() {
        let payload = json!({
            "type": "customer.subscription.updated",
            "data": { "object": {
                "customer": "cus_123",
                "status": "past_due",
                "trial_end": null
            } }
        });
        let event = parse_billing_event(&payload);
        assert_eq!(
            event,
            BillingEvent::SubscriptionUpdated {
                customer_id: "cus_123".to_string(),
                status: SubscriptionStatus::PastDue,
                trial_end: None,
            }
        );
    }

    #[test]
    fn test_parse_unknown_event_is_ignored() {
        let payload = json!({ "type": "customer.created", "data": { "object": {} } });
        assert_eq!(parse_billing_event(&payload), BillingEvent::Ignored);
    }

    #[test]
    fn test_parse_subscription_deleted_and_payment_failed() {
        let payload = json!({
            "type": "customer.subscription.deleted",
            "data": { "object": { "customer": "cus_9" } }
        });
        assert_eq!(
            parse_billing_event(&payload),
            BillingEvent::SubscriptionDeleted {
                customer_id: "cus_9".to_string()
            }
        );

        let payload = json!({
            "type": "invoice.payment_failed",
            "data": { "object": { "customer": "cus_9" } }
        });
        assert_eq!(
            parse_billing_event(&payload),
            BillingEvent::PaymentFailed {
                customer_id: "cus_9".to_string()
            }
        );
    }
}
