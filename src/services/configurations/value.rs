use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ConfigurationService, lookup_value};
use crate::models::configurations::requests::ConfigurationValueRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::masters::resources::configuration_cache_key;
use crate::services::{error_response, tenant_context};
use crate::utils::validate::normalize_optional;

pub async fn get_value(
    service: &ConfigurationService,
    request: &HttpRequest,
    key: String,
) -> ActixResult<HttpResponse> {
    let ctx = match tenant_context(request) {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);
    let cache = service.get_cache(request);

    match lookup_value(storage.as_ref(), cache.as_ref(), &ctx, &key).await {
        Ok(Some(value)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            value,
            "Configuration retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            format!("Configuration '{key}' not found"),
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn put_value(
    service: &ConfigurationService,
    request: &HttpRequest,
    key: String,
    payload: ConfigurationValueRequest,
) -> ActixResult<HttpResponse> {
    let ctx = match tenant_context(request) {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    if let Err(msg) = payload.validate(&key) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request);
    let cache = service.get_cache(request);
    let description = normalize_optional(payload.description);

    match storage
        .upsert_configuration(&ctx, &key, &payload.config_value, description.as_deref())
        .await
    {
        Ok(configuration) => {
            cache
                .remove(&configuration_cache_key(ctx.tenant_id, &key))
                .await;
            info!(
                "Configuration {} saved in tenant {} by {}",
                key, ctx.tenant_code, ctx.user_id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                configuration,
                "Configuration saved successfully",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
