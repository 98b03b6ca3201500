use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::PrizeImage;

/// 配置槽位键，按默认奖品顺序一一对应。
/// 新增奖品槽位只需在此追加，并在 [`AdminSettings`] 中增加字段。
pub const SETTINGS_SLOTS: [&str; 3] = ["image1", "image2", "image3"];

/// 管理员设置：槽位 -> 覆盖用图片地址
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AdminSettings {
    #[serde(default)]
    pub image1: String,
    #[serde(default)]
    pub image2: String,
    #[serde(default)]
    pub image3: String,
}

impl AdminSettings {
    /// 用奖品列表的前三个 url 初始化
    pub fn from_prizes(prizes: &[PrizeImage]) -> Self {
        let url_at = |i: usize| prizes.get(i).map(|p| p.url.clone()).unwrap_or_default();
        Self {
            image1: url_at(0),
            image2: url_at(1),
            image3: url_at(2),
        }
    }
}

/// 生成分享链接请求
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShareLinkRequest {
    #[serde(flatten)]
    pub settings: AdminSettings,
    /// 覆盖配置中的基础地址（可选）
    #[serde(default)]
    pub base_url: Option<String>,
}

/// 分享链接响应
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShareLinkResponse {
    pub url: String,
    pub token: String,
}
