//! 快取配置模型

use serde::{Deserialize, Serialize};

use crate::{OpCacheError, Result};

/// 運算快取配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// 鍵碰撞策略
    pub collision_policy: CollisionPolicy,

    /// 快取表初始容量
    pub initial_capacity: usize,
}

impl CacheConfig {
    /// 創建新的快取配置
    pub fn new() -> Self {
        Self {
            collision_policy: CollisionPolicy::Reject, // 預設拒絕覆寫（保守策略）
            initial_capacity: 0,
        }
    }

    /// 建構器模式：設置碰撞策略
    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    /// 建構器模式：設置初始容量
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// 從 JSON 載入配置，缺少的欄位使用預設值
    ///
    /// # 範例
    /// ```
    /// # use opcache_core::{CacheConfig, CollisionPolicy};
    /// let config = CacheConfig::from_json(r#"{ "collision_policy": "Replace" }"#).unwrap();
    /// assert_eq!(config.collision_policy, CollisionPolicy::Replace);
    /// assert_eq!(config.initial_capacity, 0);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| OpCacheError::InvalidConfig(e.to_string()))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// 鍵碰撞策略：`set` 遇到已存在的鍵時的處理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionPolicy {
    /// 拒絕：回傳 `DuplicateKey`，保留原有句柄並釋放新句柄
    Reject,
    /// 取代：存入新句柄，舊句柄交還呼叫端釋放
    Replace,
}
