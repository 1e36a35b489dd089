//! LLM 服务 - 业务能力层
//!
//! 只负责"拼写纠正"能力，不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务

use std::time::Duration;

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use backoff::ExponentialBackoffBuilder;
use tracing::{debug, warn};

use crate::config::Config;

/// 纠正失败时返回消息的固定前缀
pub const ERROR_PREFIX: &str = "Houve erro na chamada da API da OpenAI";

/// 一次纠正调用的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrectionReply {
    /// 纠正后的文本
    Corrected(String),
    /// 调用失败，消息以 [`ERROR_PREFIX`] 开头
    Failed(String),
}

impl CorrectionReply {
    pub fn is_failed(&self) -> bool {
        matches!(self, CorrectionReply::Failed(_))
    }
}

/// 构建拼写纠正提示词
pub fn correction_prompt(text: &str) -> String {
    format!(
        "Por favor, corrija o seguinte texto: '{}' e me retorne somente o texto corrigido como resposta.",
        text
    )
}

/// LLM 服务
///
/// 职责：
/// - 调用 LLM API 纠正单条文本
/// - 提供通用的 LLM 调用接口
/// - 不出现行号 / 表格
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.openai_api_key)
            .with_api_base(&config.openai_api_base_url);

        // 每行只调用一次：5xx / 429 不重试，直接按失败处理
        let no_retry = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();
        let client = Client::with_config(openai_config).with_backoff(no_retry);

        Self {
            client,
            model_name: config.openai_model_name.clone(),
        }
    }

    /// 发送一条用户消息
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（字符串）
    pub async fn send_to_llm(&self, user_message: &str) -> Result<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![ChatCompletionRequestMessage::User(user_msg)])
            .build()?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            anyhow::anyhow!("LLM API 调用失败: {}", e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow::anyhow!("LLM 返回内容为空"))?;

        Ok(content.trim().to_string())
    }

    /// 纠正一条文本的拼写
    ///
    /// 不会返回错误：调用失败时返回 [`CorrectionReply::Failed`]，由调用方决定跳过
    pub async fn correct_text(&self, text: &str) -> CorrectionReply {
        match self.send_to_llm(&correction_prompt(text)).await {
            Ok(corrected) => CorrectionReply::Corrected(corrected),
            Err(e) => CorrectionReply::Failed(format!("{} - {}", ERROR_PREFIX, e)),
        }
    }
}
