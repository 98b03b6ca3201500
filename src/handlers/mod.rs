pub mod admin;
pub mod gacha;

pub use admin::admin_config;
pub use gacha::gacha_config;
