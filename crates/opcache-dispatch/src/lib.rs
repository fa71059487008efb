//! # OpCache Dispatch
//!
//! 呼叫端：查詢快取、未命中時建構運算並登記

pub mod builder;
pub mod dispatcher;

// Re-export 主要類型
pub use builder::OpBuilder;
pub use dispatcher::{Dispatcher, Pooling2DFwdDispatcher};
