//! 快取表

use opcache_core::{CacheConfig, CollisionPolicy, OpCacheError, Signature};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// 快取統計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// 命中次數
    pub hits: u64,
    /// 未命中次數
    pub misses: u64,
    /// 新增筆數
    pub inserts: u64,
    /// 取代筆數
    pub replacements: u64,
    /// 拒絕筆數
    pub rejections: u64,
}

impl CacheStats {
    /// 命中率；尚無查詢時為 0
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}

/// 以參數簽名為鍵的句柄快取表
///
/// 快取表只增不減（無淘汰），所有句柄在快取釋放時一併釋放。
/// `get` 只需共享借用，`set` 需要獨佔借用；跨執行緒使用時由呼叫端加鎖。
pub struct OpCache<S: Signature, H> {
    table: HashMap<S, H>,
    policy: CollisionPolicy,
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: u64,
    replacements: u64,
    rejections: u64,
}

impl<S: Signature, H> OpCache<S, H> {
    /// 創建空的快取（預設配置）
    pub fn new() -> Self {
        Self::with_config(&CacheConfig::default())
    }

    /// 依配置創建空的快取
    pub fn with_config(config: &CacheConfig) -> Self {
        Self {
            table: HashMap::with_capacity(config.initial_capacity),
            policy: config.collision_policy,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            inserts: 0,
            replacements: 0,
            rejections: 0,
        }
    }

    /// 查詢句柄；未命中時回傳 `None`，不影響快取表
    pub fn get(&self, signature: &S) -> Option<&H> {
        let found = self.table.get(signature);
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!("快取命中: {}", S::KIND);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("快取未命中: {}", signature.legacy_key());
        }
        found
    }

    /// 存入句柄，快取取得所有權
    ///
    /// 鍵已存在時依碰撞策略處理：
    /// - `Reject`：回傳 `DuplicateKey`，保留原句柄，新句柄隨即釋放
    /// - `Replace`：存入新句柄，回傳被取代的舊句柄
    pub fn set(&mut self, signature: S, handle: H) -> opcache_core::Result<Option<H>> {
        match self.table.entry(signature) {
            Entry::Vacant(slot) => {
                tracing::debug!("存入快取: {}", slot.key().legacy_key());
                slot.insert(handle);
                self.inserts += 1;
                Ok(None)
            }
            Entry::Occupied(mut slot) => match self.policy {
                CollisionPolicy::Reject => {
                    let key = slot.key().legacy_key();
                    tracing::warn!("拒絕覆寫已存在的快取鍵: {}", key);
                    self.rejections += 1;
                    Err(OpCacheError::DuplicateKey(key))
                }
                CollisionPolicy::Replace => {
                    tracing::debug!("取代快取: {}", slot.key().legacy_key());
                    self.replacements += 1;
                    Ok(Some(slot.insert(handle)))
                }
            },
        }
    }

    /// 查詢句柄，未命中時呼叫 `build` 建構並存入
    ///
    /// 建構失敗時快取表不變，錯誤原樣回傳。
    pub fn get_or_try_insert_with<E, F>(&mut self, signature: &S, build: F) -> Result<&H, E>
    where
        F: FnOnce(&S) -> Result<H, E>,
    {
        if self.table.contains_key(signature) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(&self.table[signature]);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("快取未命中，建構運算: {}", signature.legacy_key());
        let handle = build(signature)?;
        self.inserts += 1;
        Ok(self.table.entry(signature.clone()).or_insert(handle))
    }

    /// 檢查簽名是否已快取（不計入統計）
    pub fn contains(&self, signature: &S) -> bool {
        self.table.contains_key(signature)
    }

    /// 快取筆數
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// 快取是否為空
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// 所有已快取的簽名（無特定順序）
    pub fn signatures(&self) -> impl Iterator<Item = &S> {
        self.table.keys()
    }

    /// 碰撞策略
    pub fn collision_policy(&self) -> CollisionPolicy {
        self.policy
    }

    /// 統計快照
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            inserts: self.inserts,
            replacements: self.replacements,
            rejections: self.rejections,
        }
    }
}

impl<S: Signature, H> Default for OpCache<S, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Signature, H> Drop for OpCache<S, H> {
    fn drop(&mut self) {
        if !self.table.is_empty() {
            tracing::debug!("釋放 {} 快取：{} 個句柄", S::KIND, self.table.len());
        }
    }
}
