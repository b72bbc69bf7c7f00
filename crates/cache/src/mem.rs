use async_trait::async_trait;
use dashmap::DashMap;
use kabuka_core::cache::error::CacheError;
use kabuka_core::cache::port::Cache;
use tracing::debug;

/// # Summary
/// 基于 DashMap 的内存缓存实现，生命周期与进程相同。
///
/// # Invariants
/// - 所有操作均通过并发哈希表 `DashMap` 执行，保证多线程安全。
/// - 不提供自动过期或容量限制，失效只能通过 `del` / `clear` 显式触发。
pub struct MemCache {
    // 线程安全的 KV 存储容器
    storage: DashMap<String, Vec<u8>>,
}

impl MemCache {
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
        }
    }
}

impl Default for MemCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for MemCache {
    async fn set_raw(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        self.storage.insert(key.to_string(), value);
        Ok(())
    }

    /// # Summary
    /// 获取原始字节数据。
    ///
    /// # Logic
    /// 从哈希表中检索 Key 对应的引用，并将其克隆为独立的所有权对象返回，
    /// 避免持有分片读锁跨越 await。
    async fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.storage.get(key).map(|v| v.value().clone()))
    }

    async fn del(&self, key: &str) -> Result<(), CacheError> {
        self.storage.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<usize, CacheError> {
        let removed = self.storage.len();
        self.storage.clear();
        debug!("MemCache cleared, {} entries removed", removed);
        Ok(removed)
    }

    async fn entry_count(&self) -> Result<usize, CacheError> {
        Ok(self.storage.len())
    }
}
