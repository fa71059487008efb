//! 運算建構介面

use opcache_cache::OpHandle;
use opcache_core::{Element, Signature};

/// 運算建構端
///
/// 形狀檢查由建構端負責；不合法的簽名以 `OpCacheError::Construction` 回報。
pub trait OpBuilder<T: Element, S: Signature>: Send + Sync {
    /// 依簽名建構運算
    fn build(&self, signature: &S) -> opcache_core::Result<OpHandle<T>>;
}

impl<T, S, F> OpBuilder<T, S> for F
where
    T: Element,
    S: Signature,
    F: Fn(&S) -> opcache_core::Result<OpHandle<T>> + Send + Sync,
{
    fn build(&self, signature: &S) -> opcache_core::Result<OpHandle<T>> {
        self(signature)
    }
}
