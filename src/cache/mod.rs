//! 对象缓存
//!
//! 后端以插件形式注册（`moka` 内存缓存、`redis`），启动时按配置选择，失败时回退到 moka。
//! 缓存只存放可随时重建的数据，读写失败不会影响请求结果。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

pub use register::{get_object_cache_plugin, register_object_cache_plugin};

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    // 后端不可用等无法确定的情况
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// `ttl` 为 0 时使用后端默认 TTL
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 读取并反序列化；内容损坏时删除该键
pub async fn get_json<T: DeserializeOwned>(cache: &dyn ObjectCache, key: &str) -> Option<T> {
    match cache.get_raw(key).await {
        CacheResult::Found(json) => match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("Dropping undecodable cache entry {}: {}", key, e);
                cache.remove(key).await;
                None
            }
        },
        _ => None,
    }
}

pub async fn insert_json<T: Serialize>(cache: &dyn ObjectCache, key: String, value: &T, ttl: u64) {
    if let Ok(json) = serde_json::to_string(value) {
        cache.insert_raw(key, json, ttl).await;
    }
}

/// 声明缓存插件，在程序加载时注册构造函数
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ty) => {
        #[::ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register_object_cache_plugin(
                $name,
                ::std::sync::Arc::new(|| -> $crate::cache::register::BoxedObjectCacheFuture {
                    Box::pin(async {
                        let cache: $crate::errors::Result<Box<dyn $crate::cache::ObjectCache>> =
                            <$ty>::new()
                                .map(|c| Box::new(c) as Box<dyn $crate::cache::ObjectCache>)
                                .map_err($crate::errors::SchoolAdminError::cache_connection);
                        cache
                    })
                }),
            );
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapCache(Mutex<HashMap<String, String>>);

    #[async_trait]
    impl ObjectCache for MapCache {
        async fn get_raw(&self, key: &str) -> CacheResult<String> {
            match self.0.lock().unwrap().get(key) {
                Some(v) => CacheResult::Found(v.clone()),
                None => CacheResult::NotFound,
            }
        }

        async fn insert_raw(&self, key: String, value: String, _ttl: u64) {
            self.0.lock().unwrap().insert(key, value);
        }

        async fn remove(&self, key: &str) {
            self.0.lock().unwrap().remove(key);
        }

        async fn invalidate_all(&self) {
            self.0.lock().unwrap().clear();
        }
    }

    #[tokio::test]
    async fn test_json_helpers_drop_corrupt_entries() {
        let cache = MapCache::default();
        insert_json(&cache, "a".to_string(), &vec![1, 2, 3], 0).await;
        assert_eq!(get_json::<Vec<i32>>(&cache, "a").await, Some(vec![1, 2, 3]));

        cache
            .insert_raw("b".to_string(), "not json".to_string(), 0)
            .await;
        assert_eq!(get_json::<Vec<i32>>(&cache, "b").await, None);
        assert_eq!(cache.get_raw("b").await, CacheResult::NotFound);
    }
}
