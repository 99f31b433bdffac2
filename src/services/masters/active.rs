use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;
use uuid::Uuid;

use super::{MasterResource, MasterService, ResourceContext, load_record};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, tenant_context};

pub async fn set_active<R: MasterResource>(
    service: &MasterService<R>,
    request: &HttpRequest,
    id: Uuid,
    active: bool,
) -> ActixResult<HttpResponse> {
    let ctx = match tenant_context(request) {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);
    let cache = service.get_cache(request);

    match storage.set_master_active(&ctx, R::TABLE, id, active).await {
        Ok(true) => {}
        Ok(false) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::NotFound,
                format!("{} not found", R::TABLE.label),
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    }
    info!(
        "{} {} set active={} in tenant {}",
        R::TABLE.label,
        id,
        active,
        ctx.tenant_code
    );

    let rc = ResourceContext {
        storage: storage.as_ref(),
        cache: cache.as_ref(),
        tenant: &ctx,
    };
    match load_record::<R>(rc.storage, &ctx, id).await {
        Ok(Some(record)) => {
            service.resource.after_write(&rc, Some(&record)).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                record,
                format!("{} status updated successfully", R::TABLE.label),
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            format!("{} not found", R::TABLE.label),
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
