use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("redis", RedisObjectCache);

/// 单次 SCAN 返回的建议条数
const SCAN_BATCH: usize = 500;

pub struct RedisObjectCache {
    client: redis::Client,
    // 多路复用连接，首次使用时建立
    connection: OnceCell<MultiplexedConnection>,
    key_prefix: String,
    ttl: u64,
}

impl RedisObjectCache {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        let redis_config = &config.cache.redis;

        let client = redis::Client::open(redis_config.url.as_str())
            .map_err(|e| format!("Invalid Redis url {}: {e}", redis_config.url))?;

        // 启动时确认服务可达，失败由调用方回退到内存缓存
        let mut conn = client
            .get_connection()
            .map_err(|e| format!("Redis connection failed: {e}"))?;
        redis::cmd("PING")
            .query::<String>(&mut conn)
            .map_err(|e| format!("Redis ping failed: {e}"))?;

        info!(
            "RedisObjectCache connected with prefix '{}', TTL {}s",
            redis_config.key_prefix, config.cache.default_ttl
        );
        Ok(Self {
            client,
            connection: OnceCell::new(),
            key_prefix: redis_config.key_prefix.clone(),
            ttl: config.cache.default_ttl,
        })
    }

    async fn connection(&self) -> Result<MultiplexedConnection, redis::RedisError> {
        self.connection
            .get_or_try_init(|| self.client.get_multiplexed_async_connection())
            .await
            .cloned()
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl ObjectCache for RedisObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        let mut conn = match self.connection().await {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                return CacheResult::ExistsButNoValue;
            }
        };

        match conn.get::<_, Option<String>>(self.make_key(key)).await {
            Ok(Some(data)) => CacheResult::Found(data),
            Ok(None) => CacheResult::NotFound,
            Err(e) => {
                error!("Failed to get key '{}': {}", key, e);
                CacheResult::ExistsButNoValue
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let Ok(mut conn) = self.connection().await else {
            error!("Redis unavailable, skipping cache insert for {}", key);
            return;
        };

        let ttl = if ttl == 0 { self.ttl } else { ttl };
        if let Err(e) = conn
            .set_ex::<_, _, ()>(self.make_key(&key), value, ttl)
            .await
        {
            error!("Failed to insert key '{}' into cache: {}", key, e);
        }
    }

    async fn remove(&self, key: &str) {
        let Ok(mut conn) = self.connection().await else {
            error!("Redis unavailable, skipping cache removal for {}", key);
            return;
        };

        match conn.del::<_, i64>(self.make_key(key)).await {
            Ok(n) => debug!("Removed {} cache entries for {}", n, key),
            Err(e) => error!("Failed to remove key '{}': {}", key, e),
        }
    }

    /// 删除本服务前缀下的所有键
    async fn invalidate_all(&self) {
        let Ok(mut conn) = self.connection().await else {
            error!("Redis unavailable, skipping cache flush");
            return;
        };

        let pattern = format!("{}*", self.key_prefix);
        let mut cursor: u64 = 0;
        let mut removed = 0usize;
        loop {
            let scanned: redis::RedisResult<(u64, Vec<String>)> = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await;
            let (next, keys) = match scanned {
                Ok(page) => page,
                Err(e) => {
                    error!("Failed to scan cache keys: {}", e);
                    return;
                }
            };
            if !keys.is_empty() {
                removed += keys.len();
                if let Err(e) = conn.del::<_, i64>(keys).await {
                    error!("Failed to delete cache keys: {}", e);
                    return;
                }
            }
            if next == 0 {
                break;
            }
            cursor = next;
        }
        info!("Flushed {} cache entries under '{}'", removed, self.key_prefix);
    }
}
