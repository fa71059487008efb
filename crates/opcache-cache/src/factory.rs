//! 運算工廠

use opcache_core::{CacheConfig, Element, Operation, Pooling2DParams, Signature};
use std::marker::PhantomData;

use crate::{CacheStats, OpCache};

/// 運算句柄（快取擁有）
pub type OpHandle<T> = Box<dyn Operation<T>>;

/// 依元素類型區分的運算工廠
///
/// 每個 `T` 各自擁有一個獨立實例，由呼叫端建立並以參考傳遞，
/// 不存在全域狀態。
pub struct OpFactory<T: Element, S: Signature> {
    cache: OpCache<S, OpHandle<T>>,
    _element: PhantomData<T>,
}

impl<T: Element, S: Signature> OpFactory<T, S> {
    /// 創建新的工廠
    pub fn new() -> Self {
        Self::with_config(&CacheConfig::default())
    }

    /// 依配置創建工廠
    pub fn with_config(config: &CacheConfig) -> Self {
        tracing::debug!(
            "創建 {}<{}> 工廠，碰撞策略 {:?}",
            S::KIND,
            T::NAME,
            config.collision_policy
        );
        Self {
            cache: OpCache::with_config(config),
            _element: PhantomData,
        }
    }

    /// 查詢已建構的運算；借用期間有效，呼叫端不取得所有權
    pub fn get(&self, signature: &S) -> Option<&dyn Operation<T>> {
        self.cache.get(signature).map(|op| &**op)
    }

    /// 登記新建構的運算，工廠取得所有權
    pub fn set(&mut self, signature: S, op: OpHandle<T>) -> opcache_core::Result<Option<OpHandle<T>>> {
        self.cache.set(signature, op)
    }

    /// 查詢運算，未命中時以 `build` 建構並登記
    pub fn get_or_try_insert_with<E, F>(
        &mut self,
        signature: &S,
        build: F,
    ) -> Result<&dyn Operation<T>, E>
    where
        F: FnOnce(&S) -> Result<OpHandle<T>, E>,
    {
        self.cache
            .get_or_try_insert_with(signature, build)
            .map(|op| &**op)
    }

    /// 檢查簽名是否已登記
    pub fn contains(&self, signature: &S) -> bool {
        self.cache.contains(signature)
    }

    /// 已登記的運算數
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// 工廠是否為空
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// 統計快照
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// 底層快取表
    pub fn cache(&self) -> &OpCache<S, OpHandle<T>> {
        &self.cache
    }
}

impl<T: Element, S: Signature> Default for OpFactory<T, S> {
    fn default() -> Self {
        Self::new()
    }
}

/// 2D 池化前向運算工廠
pub type Pooling2DFwdFactory<T> = OpFactory<T, Pooling2DParams>;

impl<T: Element> OpFactory<T, Pooling2DParams> {
    /// 查詢 2D 池化前向運算
    pub fn get_pooling2d_fwd(&self, params: &Pooling2DParams) -> Option<&dyn Operation<T>> {
        self.get(params)
    }

    /// 登記 2D 池化前向運算
    pub fn set_pooling2d_fwd(
        &mut self,
        params: Pooling2DParams,
        op: OpHandle<T>,
    ) -> opcache_core::Result<Option<OpHandle<T>>> {
        self.set(params, op)
    }
}
