//! 集成測試

use opcache::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 測試用池化運算：記錄建構時的簽名，釋放時計數
#[derive(Debug)]
struct FakePooling {
    params: Pooling2DParams,
    drops: Arc<AtomicUsize>,
}

impl<T: Element> Operation<T> for FakePooling {
    fn kind(&self) -> OpKind {
        OpKind::Pooling2DFwd
    }
}

impl Drop for FakePooling {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

fn fake(params: &Pooling2DParams, drops: &Arc<AtomicUsize>) -> Box<FakePooling> {
    Box::new(FakePooling {
        params: params.clone(),
        drops: drops.clone(),
    })
}

fn scenario() -> Pooling2DParams {
    Pooling2DParams::new(vec![1, 3, 8, 8], vec![1, 3, 4, 4])
        .with_kernel(2, 2)
        .with_stride(2, 2)
        .with_padding(0, 0, 0, 0)
        .with_algorithm(PoolingAlgorithm::Max)
}

#[test]
fn test_get_miss_construct_set_flow() {
    // 場景：呼叫端查詢 → 未命中 → 建構 → 登記 → 再次查詢命中
    let drops = Arc::new(AtomicUsize::new(0));
    let mut factory = Pooling2DFwdFactory::<f32>::new();

    assert!(factory.get_pooling2d_fwd(&scenario()).is_none());

    let op = fake(&scenario(), &drops);
    let op_addr = &*op as *const FakePooling as *const ();
    factory.set_pooling2d_fwd(scenario(), op).unwrap();

    let hit = factory.get_pooling2d_fwd(&scenario()).unwrap();
    assert_eq!(hit as *const _ as *const (), op_addr);
    assert!(format!("{:?}", hit).contains("stride_y: 2"));

    // 步幅不同即為不同簽名
    assert!(factory
        .get_pooling2d_fwd(&scenario().with_stride(1, 1))
        .is_none());

    let stats = factory.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.inserts, 1);
}

#[test]
fn test_factory_drop_releases_all_handles() {
    let drops = Arc::new(AtomicUsize::new(0));

    {
        let mut factory = Pooling2DFwdFactory::<f64>::new();
        for stride in 1..=5 {
            let params = scenario().with_stride(stride, stride);
            factory.set(params.clone(), fake(&params, &drops)).unwrap();
        }
        assert_eq!(factory.len(), 5);
        assert_eq!(drops.load(Ordering::SeqCst), 0);
    }

    assert_eq!(drops.load(Ordering::SeqCst), 5);
}

#[test]
fn test_replace_policy_hands_back_old_handle() {
    let drops = Arc::new(AtomicUsize::new(0));
    let config = CacheConfig::from_json(r#"{ "collision_policy": "Replace" }"#).unwrap();
    let mut factory = Pooling2DFwdFactory::<f32>::with_config(&config);

    factory.set(scenario(), fake(&scenario(), &drops)).unwrap();
    let old = factory
        .set(scenario(), fake(&scenario(), &drops))
        .unwrap()
        .expect("應回傳被取代的句柄");

    assert_eq!(drops.load(Ordering::SeqCst), 0);
    drop(old);
    assert_eq!(drops.load(Ordering::SeqCst), 1);
    assert_eq!(factory.len(), 1);
}

#[test]
fn test_reject_policy_never_leaks() {
    let drops = Arc::new(AtomicUsize::new(0));
    let mut factory = Pooling2DFwdFactory::<f32>::new();

    factory.set(scenario(), fake(&scenario(), &drops)).unwrap();
    let err = factory
        .set(scenario(), fake(&scenario(), &drops))
        .unwrap_err();

    assert!(matches!(err, OpCacheError::DuplicateKey(_)));
    assert_eq!(err.to_string(), format!("快取鍵已存在: {}", scenario().legacy_key()));
    assert_eq!(drops.load(Ordering::SeqCst), 1);

    drop(factory);
    assert_eq!(drops.load(Ordering::SeqCst), 2);
}

#[test]
fn test_dispatcher_shares_factory_across_threads() {
    let drops = Arc::new(AtomicUsize::new(0));
    let builds = Arc::new(AtomicUsize::new(0));

    let builder = {
        let drops = drops.clone();
        let builds = builds.clone();
        move |params: &Pooling2DParams| -> opcache::Result<OpHandle<f32>> {
            builds.fetch_add(1, Ordering::SeqCst);
            Ok(fake(params, &drops))
        }
    };
    let dispatcher = Pooling2DFwdDispatcher::<f32, _>::new(builder);

    let signatures: Vec<Pooling2DParams> = (1..=3)
        .flat_map(|stride| {
            [PoolingAlgorithm::Max, PoolingAlgorithm::AvgExcludePadding]
                .into_iter()
                .map(move |alg| scenario().with_stride(stride, stride).with_algorithm(alg))
        })
        .collect();

    assert_eq!(dispatcher.prebuild(&signatures[..2]).unwrap(), 2);

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for signature in &signatures {
                    dispatcher.dispatch(signature, |op| op.kind()).unwrap();
                }
            });
        }
    });

    assert_eq!(builds.load(Ordering::SeqCst), signatures.len());
    assert_eq!(dispatcher.len(), signatures.len());

    let factory = dispatcher.into_factory();
    for signature in &signatures {
        assert!(factory.contains(signature));
    }
    drop(factory);
    assert_eq!(drops.load(Ordering::SeqCst), signatures.len());
}
