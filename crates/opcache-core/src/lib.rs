//! # OpCache Core
//!
//! 核心類型定義：元素類型、運算種類、參數簽名與快取配置

pub mod config;
pub mod element;
pub mod operation;
pub mod pooling;
pub mod signature;

// Re-export 主要類型
pub use config::{CacheConfig, CollisionPolicy};
pub use element::Element;
pub use operation::{OpKind, Operation};
pub use pooling::{Dims, Pooling2DParams, PoolingAlgorithm};
pub use signature::Signature;

/// 運算快取錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum OpCacheError {
    #[error("快取鍵已存在: {0}")]
    DuplicateKey(String),

    #[error("運算建構失敗: {0}")]
    Construction(String),

    #[error("無效的快取配置: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, OpCacheError>;
