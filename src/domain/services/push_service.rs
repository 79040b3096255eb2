// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::repositories::push_subscription_repository::{
    PushSubscription, PushSubscriptionRepository,
};

/// 推送错误类型
#[derive(Error, Debug)]
pub enum PushError {
    /// VAPID密钥缺失，推送端点应答503
    #[error("Push notifications are not configured")]
    NotConfigured,

    /// 推送网关报告端点已永久失效（订阅应被清理）
    #[error("Subscription endpoint is gone")]
    EndpointGone,

    /// 其他传输错误
    #[error("Push delivery failed: {0}")]
    Transport(String),
}

/// 通知服务错误类型
#[derive(Error, Debug)]
pub enum NotificationError {
    /// 用户没有任何推送订阅
    #[error("No hay suscripciones")]
    NoSubscriptions,

    /// 推送未配置
    #[error("Push notifications are not configured")]
    NotConfigured,

    /// 数据访问错误
    #[error("Database error: {0}")]
    Repository(String),
}

/// 推送通知负载
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushPayload {
    /// 通知标题
    pub title: String,
    /// 通知正文
    pub body: String,
    /// 点击后打开的应用内路径
    pub url: String,
}

impl Default for PushPayload {
    fn default() -> Self {
        Self {
            title: "CleanHome AI".to_string(),
            body: "Tienes tareas pendientes".to_string(),
            url: "/dashboard".to_string(),
        }
    }
}

/// 推送发送结果
#[derive(Debug, Clone, Serialize)]
pub struct PushOutcome {
    /// 成功送达的订阅数
    pub sent: usize,
    /// 目标订阅总数
    pub total: usize,
}

/// 推送发送器特质
///
/// 浏览器推送传输的抽象。实现方负责VAPID签名与负载加密，
/// 端点被网关标记为永久失效时返回 `EndpointGone`。
#[async_trait]
pub trait PushSender: Send + Sync {
    /// 向单个订阅发送一条通知
    async fn send(
        &self,
        subscription: &PushSubscription,
        payload: &PushPayload,
    ) -> Result<(), PushError>;
}

/// 通知服务
///
/// 把一条通知扇出到用户的全部订阅端点。传输层报告端点
/// 永久失效时当场删除该订阅，其余错误只记录不中断。
pub struct NotificationService {
    sender: Arc<dyn PushSender>,
    subscriptions: Arc<dyn PushSubscriptionRepository>,
}

impl NotificationService {
    /// 创建通知服务
    pub fn new(
        sender: Arc<dyn PushSender>,
        subscriptions: Arc<dyn PushSubscriptionRepository>,
    ) -> Self {
        Self {
            sender,
            subscriptions,
        }
    }

    /// 向用户的全部订阅发送通知
    ///
    /// # 参数
    ///
    /// * `user_id` - 目标用户ID
    /// * `payload` - 通知负载
    ///
    /// # 返回值
    ///
    /// * `Ok(PushOutcome)` - 送达计数
    /// * `Err(NotificationError)` - 无订阅或数据访问错误
    pub async fn notify_user(
        &self,
        user_id: Uuid,
        payload: &PushPayload,
    ) -> Result<PushOutcome, NotificationError> {
        let subscriptions = self
            .subscriptions
            .list_for_user(user_id)
            .await
            .map_err(|e| NotificationError::Repository(e.to_string()))?;

        if subscriptions.is_empty() {
            return Err(NotificationError::NoSubscriptions);
        }

        let total = subscriptions.len();
        let mut sent = 0;

        // Deliveries run concurrently; pruning happens once results settle
        let results = futures::future::join_all(
            subscriptions
                .iter()
                .map(|subscription| self.sender.send(subscription, payload)),
        )
        .await;

        for (subscription, result) in subscriptions.iter().zip(results) {
            match result {
                Ok(()) => {
                    sent += 1;
                }
                Err(PushError::EndpointGone) => {
                    // The push gateway will never accept this endpoint again
                    debug!(endpoint = %subscription.endpoint, "Pruning gone subscription");
                    self.subscriptions
                        .delete_by_endpoint(&subscription.endpoint)
                        .await
                        .map_err(|e| NotificationError::Repository(e.to_string()))?;
                }
                Err(e) => {
                    warn!(endpoint = %subscription.endpoint, "Push delivery failed: {}", e);
                }
            }
        }

        Ok(PushOutcome { sent, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::task_repository::RepositoryError;
    use chrono::Utc;
    use std::sync::Mutex;

    struct InMemorySubscriptions {
        subs: Mutex<Vec<PushSubscription>>,
    }

    impl InMemorySubscriptions {
        fn with(subs: Vec<PushSubscription>) -> Self {
            Self {
                subs: Mutex::new(subs),
            }
        }
    }

    #[async_trait]
    impl PushSubscriptionRepository for InMemorySubscriptions {
        async fn upsert(
            &self,
            user_id: Uuid,
            endpoint: &str,
            p256dh: &str,
            auth: &str,
        ) -> Result<PushSubscription, RepositoryError> {
            let sub = PushSubscription {
                id: Uuid::new_v4(),
                user_id,
                endpoint: endpoint.to_string(),
                p256dh: p256dh.to_string(),
                auth: auth.to_string(),
                created_at: Utc::now().into(),
            };
            let mut subs = self.subs.lock().unwrap();
            subs.retain(|s| s.endpoint != endpoint);
            subs.push(sub.clone());
            Ok(sub)
        }

        async fn list_for_user(
            &self,
            user_id: Uuid,
        ) -> Result<Vec<PushSubscription>, RepositoryError> {
            Ok(self
                .subs
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn delete_by_endpoint(&self, endpoint: &str) -> Result<(), RepositoryError> {
            self.subs.lock().unwrap().retain(|s| s.endpoint != endpoint);
            Ok(())
        }
    }

    struct FlakySender {
        gone_endpoint: String,
    }

    #[async_trait]
    impl PushSender for FlakySender {
        async fn send(
            &self,
            subscription: &PushSubscription,
            _payload: &PushPayload,
        ) -> Result<(), PushError> {
            if subscription.endpoint == self.gone_endpoint {
                Err(PushError::EndpointGone)
            } else {
                Ok(())
            }
        }
    }

    fn subscription(user_id: Uuid, endpoint: &str) -> PushSubscription {
        PushSubscription {
            id: Uuid::new_v4(),
            user_id,
            endpoint: endpoint.to_string(),
            p256dh: "BPubKey".to_string(),
            auth: "authsecret".to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_fan_out_prunes_gone_endpoints() {
        let user_id = Uuid::new_v4();
        let repo = Arc::new(InMemorySubscriptions::with(vec![
            subscription(user_id, "https://push.example/alive"),
            subscription(user_id, "https://push.example/gone"),
        ]));
        let sender = Arc::new(FlakySender {
            gone_endpoint: "https://push.example/gone".to_string(),
        });

        let service = NotificationService::new(sender, repo.clone());
        let outcome = service
            .notify_user(user_id, &PushPayload::default())
            .await
            .unwrap();

        assert_eq!(outcome.sent, 1);
        assert_eq!(outcome.total, 2);

        let remaining = repo.list_for_user(user_id).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].endpoint, "https://push.example/alive");
    }

    #[tokio::test]
    async fn test_no_subscriptions_is_an_error() {
        let repo = Arc::new(InMemorySubscriptions::with(vec![]));
        let sender = Arc::new(FlakySender {
            gone_endpoint: String::new(),
        });
        let service = NotificationService::new(sender, repo);

        let err = service
            .notify_user(Uuid::new_v4(), &PushPayload::default())
            .await
            .unwrap_err();
        assert!(matches!(err, NotificationError::NoSubscriptions));
    }
}
