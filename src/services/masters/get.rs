use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use uuid::Uuid;

use super::{MasterResource, MasterService, load_record};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, tenant_context};

pub async fn get<R: MasterResource>(
    service: &MasterService<R>,
    request: &HttpRequest,
    id: Uuid,
) -> ActixResult<HttpResponse> {
    let ctx = match tenant_context(request) {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match load_record::<R>(storage.as_ref(), &ctx, id).await {
        Ok(Some(record)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            record,
            format!("{} retrieved successfully", R::TABLE.label),
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            format!("{} not found", R::TABLE.label),
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
