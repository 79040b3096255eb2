// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use thiserror::Error;

/// 分析错误类型
///
/// 覆盖分析流程的全部失败形态。注意模式校验失败不在其中：
/// 那条路径总是被缺省修复吸收，不会成为错误。
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// 上游凭据缺失，属于配置错误，不重试
    #[error("API key no configurada")]
    NotConfigured,

    /// 上游HTTP调用失败
    #[error("Error al analizar la imagen")]
    Upstream(String),

    /// 上游返回了空内容
    #[error("Respuesta vacía de la IA")]
    EmptyResponse,

    /// 上游返回的文本不是合法JSON，不重试也不修复
    #[error("Respuesta inválida de la IA")]
    InvalidResponse,

    /// 免费档月度扫描额度已用完
    #[error("Has alcanzado el límite de {limit} escaneos este mes. Actualiza a Premium para escaneos ilimitados.")]
    QuotaExceeded { limit: i32 },
}

/// 视觉模型客户端特质
///
/// 对托管视觉语言模型的一次多模态调用：系统指令加一张
/// base64编码的JPEG图片，要求模型只返回一个JSON对象。
/// 实现方负责凭据检查与HTTP传输，返回模型生成的原始文本。
#[async_trait]
pub trait VisionClient: Send + Sync {
    /// 提交图片与系统指令，返回模型生成的文本内容
    ///
    /// # 参数
    ///
    /// * `system_prompt` - 完整系统指令
    /// * `image_base64` - base64编码的JPEG图片数据
    ///
    /// # 返回值
    ///
    /// * `Ok(String)` - 模型返回的文本（期望为JSON）
    /// * `Err(AnalysisError)` - 配置、传输或空响应错误
    async fn analyze_image(
        &self,
        system_prompt: &str,
        image_base64: &str,
    ) -> Result<String, AnalysisError>;
}
