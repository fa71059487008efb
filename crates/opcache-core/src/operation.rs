//! 運算句柄

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Element;

/// 運算種類
///
/// 每種運算擁有自己的鍵前綴，避免不同運算的鍵互相碰撞。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpKind {
    /// 2D 池化前向
    Pooling2DFwd,
}

impl OpKind {
    /// 文字鍵前綴
    pub fn prefix(&self) -> &'static str {
        match self {
            OpKind::Pooling2DFwd => "pooling2d_fwd_",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpKind::Pooling2DFwd => write!(f, "pooling2d_fwd"),
        }
    }
}

/// 已配置的計算核心（不透明句柄）
///
/// 由外部的核心建構子系統提供；快取取得所有權並在自身釋放時一併釋放。
pub trait Operation<T: Element>: fmt::Debug + Send + Sync {
    /// 運算種類
    fn kind(&self) -> OpKind;
}
