//! # OpCache Cache
//!
//! 運算句柄快取表與依元素類型區分的運算工廠

pub mod factory;
pub mod op_cache;

// Re-export 主要類型
pub use factory::{OpFactory, OpHandle, Pooling2DFwdFactory};
pub use op_cache::{CacheStats, OpCache};
