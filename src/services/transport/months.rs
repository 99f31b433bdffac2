use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;
use uuid::Uuid;

use super::TransportService;
use crate::errors::Result;
use crate::models::transport::entities::TransportPickup;
use crate::models::{ApiResponse, ErrorCode, MonthFlags, TenantContext};
use crate::services::masters::decode;
use crate::services::{error_response, tenant_context};
use crate::storage::{Storage, tables};

async fn load_months(
    storage: &dyn Storage,
    ctx: &TenantContext,
    id: Uuid,
) -> Result<Option<MonthFlags>> {
    match storage
        .find_master(ctx, &tables::TRANSPORT_PICKUPS, id)
        .await?
    {
        Some(row) => Ok(Some(decode::<TransportPickup>(&row)?.months())),
        None => Ok(None),
    }
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::NotFound,
        "Pickup point not found",
    ))
}

pub async fn get_months(
    service: &TransportService,
    request: &HttpRequest,
    id: Uuid,
) -> ActixResult<HttpResponse> {
    let ctx = match tenant_context(request) {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match load_months(storage.as_ref(), &ctx, id).await {
        Ok(Some(months)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            months,
            "Pickup months retrieved successfully",
        ))),
        Ok(None) => Ok(not_found()),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn put_months(
    service: &TransportService,
    request: &HttpRequest,
    id: Uuid,
    flags: MonthFlags,
) -> ActixResult<HttpResponse> {
    let ctx = match tenant_context(request) {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage.update_pickup_months(&ctx, id, flags).await {
        Ok(true) => {
            info!(
                "Pickup {} months set to {:?} in tenant {}",
                id,
                flags.enabled_months(),
                ctx.tenant_code
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                flags,
                "Pickup months updated successfully",
            )))
        }
        Ok(false) => Ok(not_found()),
        Err(e) => Ok(error_response(&e)),
    }
}
