use crate::constants::{CONFIG_PARAM, STORAGE_KEY_SETTINGS};
use crate::error::AppResult;
use crate::models::{AdminSettings, PrizeImage};
use crate::storage::{self, SharedStore};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use url::Url;

/// 设置 -> JSON -> base64，得到可放入链接的 token
pub fn encode_settings(settings: &AdminSettings) -> AppResult<String> {
    let json = serde_json::to_string(settings)?;
    Ok(STANDARD.encode(json.as_bytes()))
}

/// 在基础地址上追加 `cfg=<token>`，保留已有的查询参数
pub fn build_shareable_link(base_url: &str, settings: &AdminSettings) -> AppResult<String> {
    let token = encode_settings(settings)?;
    let mut url = Url::parse(base_url)?;
    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != CONFIG_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (k, v) in &retained {
            pairs.append_pair(k, v);
        }
        pairs.append_pair(CONFIG_PARAM, &token);
    }
    Ok(url.into())
}

/// 管理员本地设置（只用于管理员自己测试，会员端只信任链接中的 token）
#[derive(Clone)]
pub struct AdminService {
    store: SharedStore,
    defaults: Vec<PrizeImage>,
}

impl AdminService {
    pub fn new(store: SharedStore, defaults: Vec<PrizeImage>) -> Self {
        Self { store, defaults }
    }

    /// 指定会员（管理员设备）的设置视图
    pub fn for_member(&self, member: &str) -> AdminService {
        AdminService {
            store: storage::scoped(&self.store, member),
            defaults: self.defaults.clone(),
        }
    }

    /// 读取管理员设置；不存在时用默认奖品初始化并保存
    pub fn load_admin_settings(&self) -> AdminSettings {
        match self.store.get(STORAGE_KEY_SETTINGS) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(settings) => return settings,
                Err(e) => log::warn!("Ignoring malformed admin settings: {e}"),
            },
            Ok(None) => {
                let seeded = AdminSettings::from_prizes(&self.defaults);
                if let Err(e) = self.save_admin_settings(&seeded) {
                    log::warn!("Failed to seed admin settings: {e}");
                }
                return seeded;
            }
            Err(e) => log::warn!("Failed to read admin settings: {e}"),
        }
        AdminSettings::from_prizes(&self.defaults)
    }

    pub fn save_admin_settings(&self, settings: &AdminSettings) -> AppResult<()> {
        let raw = serde_json::to_string(settings)?;
        self.store.set(STORAGE_KEY_SETTINGS, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::default_prizes;
    use crate::services::config_resolver::{decode_settings, resolve_active_prizes};
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    fn sample() -> AdminSettings {
        AdminSettings {
            image1: "https://x/a.jpg".into(),
            image2: "".into(),
            image3: "https://x/c.jpg".into(),
        }
    }

    #[test]
    fn test_encode_matches_browser_encoding() {
        let settings = AdminSettings {
            image1: "a".into(),
            image2: "b".into(),
            image3: "c".into(),
        };
        // btoa('{"image1":"a","image2":"b","image3":"c"}')
        assert_eq!(
            encode_settings(&settings).unwrap(),
            "eyJpbWFnZTEiOiJhIiwiaW1hZ2UyIjoiYiIsImltYWdlMyI6ImMifQ=="
        );
    }

    #[test]
    fn test_round_trip_through_resolver() {
        let defaults = default_prizes();
        let settings = AdminSettings {
            image1: "https://img.example.com/2024-03/a.jpg?w=800&h=600".into(),
            image2: "https://img.example.com/2024-03/b.png".into(),
            image3: "https://drive.example.com/uc?id=abc_DEF-123".into(),
        };
        let token = encode_settings(&settings).unwrap();
        let active = resolve_active_prizes(&defaults, Some(&token));

        assert_eq!(active[0].url, settings.image1);
        assert_eq!(active[1].url, settings.image2);
        assert_eq!(active[2].url, settings.image3);
        for (resolved, default) in active.iter().zip(&defaults) {
            assert_eq!(resolved.id, default.id);
            assert_eq!(resolved.name, default.name);
            assert_eq!(resolved.rarity, default.rarity);
        }
    }

    #[test]
    fn test_empty_slot_round_trips_to_default() {
        let defaults = default_prizes();
        let token = encode_settings(&sample()).unwrap();
        let active = resolve_active_prizes(&defaults, Some(&token));
        assert_eq!(active[0].url, "https://x/a.jpg");
        assert_eq!(active[1].url, defaults[1].url);
        assert_eq!(active[2].url, "https://x/c.jpg");
    }

    #[test]
    fn test_shareable_link_carries_decodable_token() {
        let link = build_shareable_link("https://fan.example.com/gacha?lang=ja", &sample()).unwrap();
        let url = Url::parse(&link).unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert_eq!(pairs[0], ("lang".to_string(), "ja".to_string()));
        assert_eq!(pairs[1].0, CONFIG_PARAM);
        let overrides = decode_settings(&pairs[1].1).unwrap();
        assert_eq!(overrides.get("image1").map(String::as_str), Some("https://x/a.jpg"));
        assert!(!overrides.contains_key("image2"));
    }

    #[test]
    fn test_shareable_link_replaces_previous_token() {
        let link = build_shareable_link("https://fan.example.com/?cfg=old", &sample()).unwrap();
        let url = Url::parse(&link).unwrap();
        let tokens: Vec<String> = url
            .query_pairs()
            .filter(|(k, _)| k == CONFIG_PARAM)
            .map(|(_, v)| v.into_owned())
            .collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0], encode_settings(&sample()).unwrap());
    }

    #[test]
    fn test_shareable_link_rejects_invalid_base() {
        assert!(build_shareable_link("not a url", &sample()).is_err());
    }

    #[test]
    fn test_load_seeds_from_defaults_once() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let service = AdminService::new(store.clone(), default_prizes());

        let seeded = service.load_admin_settings();
        assert_eq!(seeded, AdminSettings::from_prizes(&default_prizes()));
        assert!(store.get(STORAGE_KEY_SETTINGS).unwrap().is_some());

        service.save_admin_settings(&sample()).unwrap();
        assert_eq!(service.load_admin_settings(), sample());
    }

    #[test]
    fn test_member_views_are_isolated() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let service = AdminService::new(store, default_prizes());
        service.for_member("admin-pc").save_admin_settings(&sample()).unwrap();

        assert_eq!(service.for_member("admin-pc").load_admin_settings(), sample());
        assert_eq!(
            service.for_member("phone").load_admin_settings(),
            AdminSettings::from_prizes(&default_prizes())
        );
    }

    #[test]
    fn test_malformed_settings_fall_back_to_seed() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        store.set(STORAGE_KEY_SETTINGS, "[1,2,3]").unwrap();
        let service = AdminService::new(store, default_prizes());
        assert_eq!(
            service.load_admin_settings(),
            AdminSettings::from_prizes(&default_prizes())
        );
    }
}
