pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::config::StorageConfig;
use crate::error::AppResult;
use std::sync::Arc;

/// 本地键值存储端口（相当于浏览器的 localStorage）
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&self, key: &str) -> AppResult<()>;
}

pub type SharedStore = Arc<dyn KeyValueStore>;

/// 按会员划分命名空间的视图：键被改写为 `<member>/<key>`
pub struct ScopedStore {
    inner: SharedStore,
    member: String,
}

impl ScopedStore {
    pub fn new(inner: SharedStore, member: &str) -> Self {
        Self {
            inner,
            member: member.to_string(),
        }
    }

    fn scoped_key(&self, key: &str) -> String {
        format!("{}/{}", self.member, key)
    }
}

impl KeyValueStore for ScopedStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(&self.scoped_key(key))
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.inner.set(&self.scoped_key(key), value)
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.inner.remove(&self.scoped_key(key))
    }
}

pub fn scoped(store: &SharedStore, member: &str) -> SharedStore {
    Arc::new(ScopedStore::new(store.clone(), member))
}

/// 根据配置创建存储：配置了路径则使用文件存储，否则使用内存存储
pub fn open_store(config: &StorageConfig) -> AppResult<SharedStore> {
    match config.path.as_deref().filter(|p| !p.trim().is_empty()) {
        Some(path) => {
            log::info!("Using file storage at {path}");
            Ok(Arc::new(FileStore::open(path)?))
        }
        None => {
            log::warn!("No storage path configured, state will not survive restarts");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
