// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use web_push::{
    ContentEncoding, HyperWebPushClient, SubscriptionInfo, VapidSignatureBuilder, WebPushClient,
    WebPushError, WebPushMessageBuilder,
};

use crate::config::settings::PushSettings;
use crate::domain::repositories::push_subscription_repository::PushSubscription;
use crate::domain::services::push_service::{PushError, PushPayload, PushSender};

/// 浏览器推送发送器实现
///
/// 负载以aes128gcm加密，请求以VAPID私钥签名。推送网关对
/// 已失效端点返回404/410，映射为 `EndpointGone` 供上层清理。
pub struct WebPushSender {
    client: HyperWebPushClient,
    vapid_private_key: Option<String>,
    contact_email: String,
}

impl WebPushSender {
    /// 从配置创建发送器
    pub fn new(settings: &PushSettings) -> Self {
        Self {
            client: HyperWebPushClient::new(),
            vapid_private_key: settings.vapid_private_key.clone(),
            contact_email: settings.contact_email.clone(),
        }
    }

    /// 推送是否已配置
    pub fn is_configured(&self) -> bool {
        self.vapid_private_key.is_some()
    }
}

#[async_trait]
impl PushSender for WebPushSender {
    async fn send(
        &self,
        subscription: &PushSubscription,
        payload: &PushPayload,
    ) -> Result<(), PushError> {
        let private_key = self
            .vapid_private_key
            .as_ref()
            .ok_or(PushError::NotConfigured)?;

        let info = SubscriptionInfo::new(
            subscription.endpoint.clone(),
            subscription.p256dh.clone(),
            subscription.auth.clone(),
        );

        let mut signature = VapidSignatureBuilder::from_base64(private_key, web_push::URL_SAFE_NO_PAD, &info)
            .map_err(|e| PushError::Transport(e.to_string()))?;
        signature.add_claim("sub", format!("mailto:{}", self.contact_email));

        let body =
            serde_json::to_vec(payload).map_err(|e| PushError::Transport(e.to_string()))?;

        let mut builder = WebPushMessageBuilder::new(&info);
        builder.set_payload(ContentEncoding::Aes128Gcm, &body);
        builder.set_vapid_signature(
            signature
                .build()
                .map_err(|e| PushError::Transport(e.to_string()))?,
        );

        let message = builder
            .build()
            .map_err(|e| PushError::Transport(e.to_string()))?;

        match self.client.send(message).await {
            Ok(()) => Ok(()),
            Err(WebPushError::EndpointNotFound) | Err(WebPushError::EndpointNotValid) => {
                Err(PushError::EndpointGone)
            }
            Err(e) => Err(PushError::Transport(e.to_string())),
        }
    }
}
