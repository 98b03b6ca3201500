use crate::models::{PrizeImage, Rarity};

/// 抽奖历史（单槽）存储键
pub const STORAGE_KEY_HISTORY: &str = "wr_gacha_history";
/// 管理员设置存储键
pub const STORAGE_KEY_SETTINGS: &str = "wr_gacha_admin_settings";

/// 分享链接中的配置参数名
pub const CONFIG_PARAM: &str = "cfg";
/// 管理员模式参数名（值为 "true" 时启用）
pub const ADMIN_PARAM: &str = "admin";

/// 生成失败时的固定消息
pub const FALLBACK_MESSAGE: &str = "ナイス！今月も応援ありがとう！次の試合も全力でぶつかるぜ！🔥";

/// 内置默认奖品（每月更新时替换 url）
pub fn default_prizes() -> Vec<PrizeImage> {
    vec![
        PrizeImage::new(
            "prize_1",
            "https://picsum.photos/id/1015/800/600",
            "競技用車いす - 戦いの相棒",
            Some(Rarity::SuperRare),
        ),
        PrizeImage::new(
            "prize_2",
            "https://picsum.photos/id/1055/800/600",
            "第27回 日本選手権大会",
            Some(Rarity::SuperRare),
        ),
        PrizeImage::new(
            "prize_3",
            "https://picsum.photos/id/1084/800/600",
            "合言葉はワッショイ！",
            Some(Rarity::SuperRare),
        ),
    ]
}
