use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 稀有度（仅用于展示，不影响抽取概率）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Rarity {
    Normal,
    Rare,
    #[serde(rename = "Super Rare")]
    SuperRare,
}

/// 奖品图片
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PrizeImage {
    /// 稳定标识 (prize_1 / prize_2 / prize_3)
    pub id: String,
    /// 图片地址
    pub url: String,
    /// 展示标题
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<Rarity>,
}

impl PrizeImage {
    pub fn new(id: &str, url: &str, name: &str, rarity: Option<Rarity>) -> Self {
        Self {
            id: id.to_string(),
            url: url.to_string(),
            name: name.to_string(),
            rarity,
        }
    }

    /// 仅替换 url 的副本
    pub fn with_url(&self, url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..self.clone()
        }
    }
}
