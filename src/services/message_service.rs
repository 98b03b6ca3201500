use crate::error::AppResult;
use async_trait::async_trait;
use std::sync::Arc;

/// 外部文本生成服务（纯文本进，纯文本出）
#[async_trait]
pub trait MessageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> AppResult<String>;
}

/// 组装给生成服务的提示词
pub fn build_prompt(prize_name: &str) -> String {
    format!(
        "あなたは「車いすラグビー」の熱血選手です。\n\
         ファンクラブ会員がガチャを回して「{prize_name}」というタイトルの画像を当てました。\n\
         \n\
         このファンに向けて、以下の条件で短いメッセージ（50文字程度）を書いてください。\n\
         \n\
         条件:\n\
         - とてもエネルギッシュで、パッション溢れる口調で。\n\
         - 車いすラグビー用語（タックル、トライ、タイヤ、コートなど）を比喩に使って励ます。\n\
         - 日本語で出力。\n\
         - 絵文字を1つか2つ含める。"
    )
}

/// 祝贺消息生成：上游失败时返回固定消息，调用方永远拿到字符串
#[derive(Clone)]
pub struct MessageService {
    generator: Arc<dyn MessageGenerator>,
    fallback: String,
}

impl MessageService {
    pub fn new(generator: Arc<dyn MessageGenerator>, fallback: impl Into<String>) -> Self {
        Self {
            generator,
            fallback: fallback.into(),
        }
    }

    pub async fn generate_message(&self, prize_name: &str) -> String {
        let prompt = build_prompt(prize_name);
        match self.generator.generate(&prompt).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                log::warn!("Message generator returned empty text, using fallback");
                self.fallback.clone()
            }
            Err(e) => {
                log::error!("Message generation failed, using fallback: {e}");
                self.fallback.clone()
            }
        }
    }
}
