//! 带缓存的配置读取，供其他服务使用

use tracing::warn;

use crate::cache::{ObjectCache, get_json, insert_json};
use crate::errors::Result;
use crate::models::TenantContext;
use crate::models::common::months::{DEFAULT_SESSION_START_MONTH, is_valid_month};
use crate::models::configurations::entities::{ConfigurationValue, KnownConfigKey};
use crate::services::masters::resources::configuration_cache_key;
use crate::storage::Storage;

/// 读取启用中的配置值，先查缓存
pub async fn lookup_value(
    storage: &dyn Storage,
    cache: &dyn ObjectCache,
    ctx: &TenantContext,
    key: &str,
) -> Result<Option<ConfigurationValue>> {
    let cache_key = configuration_cache_key(ctx.tenant_id, key);
    if let Some(value) = get_json::<ConfigurationValue>(cache, &cache_key).await {
        return Ok(Some(value));
    }

    let value = storage
        .get_configuration(ctx, key)
        .await?
        .filter(|c| c.is_active)
        .map(|c| ConfigurationValue {
            config_key: c.config_key,
            config_value: c.config_value,
        });

    if let Some(value) = &value {
        insert_json(cache, cache_key, value, 0).await;
    }
    Ok(value)
}

/// 学年起始月份，未配置或取值无效时为四月
pub async fn session_start_month(
    storage: &dyn Storage,
    cache: &dyn ObjectCache,
    ctx: &TenantContext,
) -> Result<i32> {
    let key = KnownConfigKey::SessionStartMonth.as_str();
    let Some(value) = lookup_value(storage, cache, ctx, key).await? else {
        return Ok(DEFAULT_SESSION_START_MONTH);
    };
    Ok(parse_start_month(&value.config_value).unwrap_or_else(|| {
        warn!(
            "Ignoring invalid {} '{}' for tenant {}",
            key, value.config_value, ctx.tenant_code
        );
        DEFAULT_SESSION_START_MONTH
    }))
}

fn parse_start_month(raw: &str) -> Option<i32> {
    raw.trim().parse::<i32>().ok().filter(|m| is_valid_month(*m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_start_month() {
        assert_eq!(parse_start_month(" 6 "), Some(6));
        assert_eq!(parse_start_month("0"), None);
        assert_eq!(parse_start_month("april"), None);
    }
}
