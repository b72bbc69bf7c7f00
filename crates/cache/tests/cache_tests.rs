use kabuka_cache::mem::MemCache;
use kabuka_core::cache::port::{Cache, CacheExt};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Snapshot {
    days: u32,
    closes: Vec<Option<f64>>,
}

#[tokio::test]
async fn test_mem_cache_raw_ops() {
    let cache = MemCache::new();
    let key = "raw_key";
    let value = vec![1, 2, 3, 4];

    cache.set_raw(key, value.clone()).await.unwrap();
    let result = cache.get_raw(key).await.unwrap().unwrap();
    assert_eq!(result, value);

    cache.del(key).await.unwrap();
    assert!(cache.get_raw(key).await.unwrap().is_none());

    // 删除不存在的键同样成功
    cache.del(key).await.unwrap();
}

#[tokio::test]
async fn test_mem_cache_typed_ops() {
    let cache = MemCache::new();
    let item = Snapshot {
        days: 180,
        closes: vec![Some(231.5), None, Some(229.0)],
    };

    cache.set("price_table:180", &item).await.unwrap();
    let result: Snapshot = cache.get("price_table:180").await.unwrap().unwrap();
    assert_eq!(result, item);

    let missing: Option<Snapshot> = cache.get("price_table:30").await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_mem_cache_typed_mismatch_is_deserialize_error() {
    let cache = MemCache::new();
    cache.set_raw("broken", b"not json".to_vec()).await.unwrap();
    let result: Result<Option<Snapshot>, _> = cache.get("broken").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_mem_cache_clear() {
    let cache = MemCache::new();
    cache.set_raw("a", vec![1]).await.unwrap();
    cache.set_raw("b", vec![2]).await.unwrap();
    assert_eq!(cache.entry_count().await.unwrap(), 2);

    assert_eq!(cache.clear().await.unwrap(), 2);
    assert_eq!(cache.entry_count().await.unwrap(), 0);
    assert!(cache.get_raw("a").await.unwrap().is_none());
}
