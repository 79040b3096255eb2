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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含数据库、服务器、身份认证、视觉模型、计费、推送和存储等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 服务器配置
    pub server: ServerSettings,
    /// 身份认证提供商配置
    pub auth: AuthSettings,
    /// 视觉模型配置
    pub ai: AiSettings,
    /// 订阅计费配置
    pub billing: BillingSettings,
    /// 浏览器推送配置
    pub push: PushSettings,
    /// 存储配置
    pub storage: StorageSettings,
    /// 免费额度配置
    pub quota: QuotaSettings,
}

/// 数据库配置设置
#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 服务器配置设置
#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
    /// 前端基础URL（认证回调重定向目标）
    pub app_url: String,
}

/// 身份认证提供商配置设置
///
/// 会话与用户身份由外部托管提供商负责，本服务只通过其
/// HTTP 接口交换授权码并校验访问令牌
#[derive(Debug, Deserialize)]
pub struct AuthSettings {
    /// 提供商基础URL（例如 https://xyz.example.co/auth/v1）
    pub base_url: String,
    /// 提供商API密钥
    pub api_key: String,
}

/// 视觉模型配置设置
#[derive(Debug, Deserialize)]
pub struct AiSettings {
    /// 模型API密钥（缺失时分析端点返回配置错误）
    pub api_key: Option<String>,
    /// 使用的模型名称
    pub model: String,
    /// 模型API基础URL
    pub api_base_url: String,
    /// 单次响应生成令牌上限
    pub max_tokens: u32,
}

/// 订阅计费配置设置
#[derive(Debug, Deserialize)]
pub struct BillingSettings {
    /// 是否启用计费（未启用时计费端点返回503）
    pub enabled: bool,
    /// 计费提供商密钥
    pub secret_key: Option<String>,
    /// Webhook签名密钥
    pub webhook_secret: Option<String>,
    /// 高级订阅价格ID
    pub price_id: Option<String>,
    /// 计费提供商API基础URL
    pub api_base_url: String,
    /// 试用天数
    pub trial_days: i64,
}

/// 浏览器推送配置设置
#[derive(Debug, Deserialize)]
pub struct PushSettings {
    /// VAPID公钥
    pub vapid_public_key: Option<String>,
    /// VAPID私钥（缺失时推送端点返回503）
    pub vapid_private_key: Option<String>,
    /// VAPID联系邮箱
    pub contact_email: String,
}

/// 存储配置设置
#[derive(Debug, Deserialize)]
pub struct StorageSettings {
    /// 存储类型 (local, s3)
    pub storage_type: String,
    /// 本地存储路径 (当 type=local 时使用)
    pub local_path: Option<String>,
    /// 对外可访问的基础URL（拼接扫描图片地址）
    pub public_base_url: Option<String>,
    /// S3 区域
    pub s3_region: Option<String>,
    /// S3 存储桶名称
    pub s3_bucket: Option<String>,
    /// S3 访问密钥
    pub s3_access_key: Option<String>,
    /// S3 密钥
    pub s3_secret_key: Option<String>,
    /// S3 端点 (可选，用于 MinIO 等兼容服务)
    pub s3_endpoint: Option<String>,
}

/// 免费额度配置设置
#[derive(Debug, Deserialize)]
pub struct QuotaSettings {
    /// 免费档每月扫描次数上限（仅在计费启用时生效）
    pub free_scans_per_month: i32,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.app_url", "http://localhost:3000")?
            // Default DB pool settings
            .set_default("database.max_connections", 100)?
            .set_default("database.min_connections", 10)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // Default AI settings
            .set_default("ai.model", "gpt-4o")?
            .set_default("ai.api_base_url", "https://api.openai.com/v1")?
            .set_default("ai.max_tokens", 4096)?
            // Default Billing settings
            .set_default("billing.enabled", false)?
            .set_default("billing.api_base_url", "https://api.stripe.com/v1")?
            .set_default("billing.trial_days", 7)?
            // Default Push settings
            .set_default("push.contact_email", "notifications@cleanhome.ai")?
            // Default Storage settings
            .set_default("storage.storage_type", "local")?
            .set_default("storage.local_path", "./storage")?
            // Default Quota settings
            .set_default("quota.free_scans_per_month", 5)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("LIMPIA").separator("__"));

        builder.build()?.try_deserialize()
    }
}
