//! 運算分派器

use opcache_cache::{CacheStats, OpFactory};
use opcache_core::{CacheConfig, Element, Operation, Pooling2DParams, Signature};
use parking_lot::{Condvar, Mutex, MutexGuard};
use rayon::prelude::*;
use std::collections::HashSet;

use crate::OpBuilder;

/// 鎖內狀態
struct DispatchState<T: Element, S: Signature> {
    /// 運算工廠
    factory: OpFactory<T, S>,

    /// 預建構中（鎖外建構）的簽名
    building: HashSet<S>,
}

/// 運算分派器
///
/// 工廠本身不加鎖；分派器在整個「查詢 → 未命中 → 建構 → 登記」過程中持有鎖，
/// 預建構中的簽名另行登記為建構中，保證每個簽名最多建構一次。
pub struct Dispatcher<T: Element, S: Signature, B: OpBuilder<T, S>> {
    state: Mutex<DispatchState<T, S>>,

    /// 預建構完成（成功或失敗）時通知
    settled: Condvar,

    /// 運算建構端
    builder: B,
}

impl<T: Element, S: Signature, B: OpBuilder<T, S>> Dispatcher<T, S, B> {
    /// 創建新的分派器
    pub fn new(builder: B) -> Self {
        Self::with_config(builder, &CacheConfig::default())
    }

    /// 依配置創建分派器
    pub fn with_config(builder: B, config: &CacheConfig) -> Self {
        Self {
            state: Mutex::new(DispatchState {
                factory: OpFactory::with_config(config),
                building: HashSet::new(),
            }),
            settled: Condvar::new(),
            builder,
        }
    }

    /// 取得鎖；簽名正在預建構時等待其完成
    fn lock_settled(&self, signature: &S) -> MutexGuard<'_, DispatchState<T, S>> {
        let mut state = self.state.lock();
        while state.building.contains(signature) {
            tracing::debug!("等待預建構完成: {}", signature.legacy_key());
            self.settled.wait(&mut state);
        }
        state
    }

    /// 取得（必要時建構）簽名對應的運算，並在持鎖期間交給 `f` 使用
    ///
    /// 建構端的 `build` 與 `f` 都在持鎖期間執行，且鎖不可重入：
    /// 兩者都不得再呼叫同一個分派器，否則會死鎖。
    pub fn dispatch<R, F>(&self, signature: &S, f: F) -> opcache_core::Result<R>
    where
        F: FnOnce(&dyn Operation<T>) -> R,
    {
        let mut state = self.lock_settled(signature);
        let op = state
            .factory
            .get_or_try_insert_with(signature, |s| self.builder.build(s))?;
        Ok(f(op))
    }

    /// 預先建構尚未快取的運算
    ///
    /// 待建構的簽名先在鎖內登記為建構中，再於鎖外以 rayon 平行建構，最後持鎖登記。
    /// 建構期間同一簽名的 `dispatch` 會等待，其他 `prebuild` 則略過該簽名。
    /// 任一建構失敗時不登記任何運算。回傳實際新增的筆數。
    pub fn prebuild(&self, signatures: &[S]) -> opcache_core::Result<usize> {
        let start_time = std::time::Instant::now();

        let pending: Vec<&S> = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            let mut picked = Vec::new();
            for signature in signatures {
                if state.factory.contains(signature) || state.building.contains(signature) {
                    continue;
                }
                state.building.insert(signature.clone());
                picked.push(signature);
            }
            picked
        };
        tracing::debug!("預建構：{} 個簽名待建構", pending.len());

        let claim = InFlight {
            state: &self.state,
            settled: &self.settled,
            signatures: &pending,
        };

        let built = pending
            .par_iter()
            .map(|s| self.builder.build(s).map(|op| ((*s).clone(), op)))
            .collect::<opcache_core::Result<Vec<_>>>()?;

        let mut inserted = 0;
        {
            let mut state = self.state.lock();
            for (signature, op) in built {
                state.factory.set(signature, op)?;
                inserted += 1;
            }
        }
        drop(claim);

        tracing::info!(
            "{}<{}> 預建構完成：新增 {} 筆，耗時 {:?}",
            S::KIND,
            T::NAME,
            inserted,
            start_time.elapsed()
        );

        Ok(inserted)
    }

    /// 檢查簽名是否已快取
    pub fn contains(&self, signature: &S) -> bool {
        self.state.lock().factory.contains(signature)
    }

    /// 快取筆數
    pub fn len(&self) -> usize {
        self.state.lock().factory.len()
    }

    /// 快取是否為空
    pub fn is_empty(&self) -> bool {
        self.state.lock().factory.is_empty()
    }

    /// 統計快照
    pub fn stats(&self) -> CacheStats {
        self.state.lock().factory.stats()
    }

    /// 取回工廠（連同所有已快取的運算）
    pub fn into_factory(self) -> OpFactory<T, S> {
        self.state.into_inner().factory
    }
}

/// 建構中登記；釋放時（含建構失敗或 panic）撤銷登記並喚醒等待者
struct InFlight<'a, T: Element, S: Signature> {
    state: &'a Mutex<DispatchState<T, S>>,
    settled: &'a Condvar,
    signatures: &'a [&'a S],
}

impl<T: Element, S: Signature> Drop for InFlight<'_, T, S> {
    fn drop(&mut self) {
        if self.signatures.is_empty() {
            return;
        }
        {
            let mut state = self.state.lock();
            for signature in self.signatures {
                state.building.remove(*signature);
            }
        }
        self.settled.notify_all();
    }
}

/// 2D 池化前向運算分派器
pub type Pooling2DFwdDispatcher<T, B> = Dispatcher<T, Pooling2DParams, B>;
