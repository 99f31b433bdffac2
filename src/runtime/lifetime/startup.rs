use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::errors::{Result, SchoolAdminError};
use crate::storage::Storage;

/// 内存缓存插件名，其他后端不可用时的回退
const FALLBACK_CACHE: &str = "moka";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

async fn build_cache(name: &str) -> Result<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin(name).ok_or_else(|| {
        SchoolAdminError::cache_plugin_not_found(format!("Cache backend '{name}' is not registered"))
    })?;
    constructor().await.map(Arc::from)
}

/// 创建缓存实例，配置的后端不可用时回退到内存缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let cache_type = AppConfig::get().cache.cache_type.as_str();
    warn!("Attempting to create {} cache backend", cache_type);

    match build_cache(cache_type).await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", cache_type);
            Ok(cache)
        }
        Err(e) if cache_type != FALLBACK_CACHE => {
            warn!("Failed to create {} cache: {}", cache_type, e);
            warn!("Falling back to {} (in-memory) cache", FALLBACK_CACHE);
            build_cache(FALLBACK_CACHE).await
        }
        Err(e) => Err(e),
    }
}

/// 准备服务器启动的上下文：存储（含迁移）与缓存
pub async fn prepare_server_startup() -> Result<StartupContext> {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    debug!(
        "Registered cache backends: {:?}",
        crate::cache::register::registered_object_cache_plugins()
    );

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    let cache = create_cache().await?;
    // 迁移后旧的缓存内容可能已失效
    cache.invalidate_all().await;
    warn!("Cache backend initialized and flushed");

    Ok(StartupContext { storage, cache })
}
