//! # OpCache
//!
//! 計算核心描述物件的記憶化快取：以參數簽名為鍵，重複請求時重用已建構的運算。

pub use opcache_cache::{CacheStats, OpCache, OpFactory, OpHandle, Pooling2DFwdFactory};
pub use opcache_core::{
    CacheConfig, CollisionPolicy, Dims, Element, OpCacheError, OpKind, Operation, Pooling2DParams,
    PoolingAlgorithm, Result, Signature,
};
pub use opcache_dispatch::{Dispatcher, OpBuilder, Pooling2DFwdDispatcher};
