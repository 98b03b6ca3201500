use crate::models::{PrizeImage, SETTINGS_SLOTS};
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::{Engine, alphabet};
use std::collections::BTreeMap;
use thiserror::Error;

/// 标准字母表，`=` 补位可有可无（被聊天软件截掉补位的链接也能解码）
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// 解码得到的槽位覆盖：槽位键 -> 非空 url
pub type SlotOverrides = BTreeMap<String, String>;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("token is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("token is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("settings must be a JSON object")]
    NotAnObject,

    #[error("slot {0} must be a string")]
    InvalidSlot(String),
}

/// 解码分享 token：base64 -> UTF-8 -> JSON 对象
pub fn decode_settings(token: &str) -> Result<SlotOverrides, DecodeError> {
    // 未转义的 '+' 经过查询串解析后会变成空格
    let normalized = token.trim().replace(' ', "+");
    let bytes = LENIENT_STANDARD.decode(normalized)?;
    let text = String::from_utf8(bytes)?;
    let value: serde_json::Value = serde_json::from_str(&text)?;
    let object = value.as_object().ok_or(DecodeError::NotAnObject)?;

    let mut overrides = SlotOverrides::new();
    for key in SETTINGS_SLOTS {
        match object.get(key) {
            None | Some(serde_json::Value::Null) => {}
            Some(serde_json::Value::String(url)) => {
                if !url.is_empty() {
                    overrides.insert(key.to_string(), url.clone());
                }
            }
            Some(_) => return Err(DecodeError::InvalidSlot(key.to_string())),
        }
    }
    Ok(overrides)
}

/// 按槽位顺序把覆盖应用到默认奖品上，只替换 url；
/// 没有对应槽位的奖品原样保留，数量不变。
pub fn apply_overrides(defaults: &[PrizeImage], overrides: &SlotOverrides) -> Vec<PrizeImage> {
    defaults
        .iter()
        .enumerate()
        .map(|(index, prize)| {
            SETTINGS_SLOTS
                .get(index)
                .and_then(|key| overrides.get(*key))
                .map(|url| prize.with_url(url))
                .unwrap_or_else(|| prize.clone())
        })
        .collect()
}

/// 得到生效的奖品列表。任何解码失败都回退到默认奖品，只记录日志。
pub fn resolve_active_prizes(defaults: &[PrizeImage], encoded_config: Option<&str>) -> Vec<PrizeImage> {
    let token = match encoded_config {
        Some(token) if !token.trim().is_empty() => token,
        _ => return defaults.to_vec(),
    };

    match decode_settings(token) {
        Ok(overrides) => {
            log::debug!("Applying {} prize override(s) from shared config", overrides.len());
            apply_overrides(defaults, &overrides)
        }
        Err(e) => {
            log::warn!("Failed to load config from token, using defaults: {e}");
            defaults.to_vec()
        }
    }
}
