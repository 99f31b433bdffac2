use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{MasterResource, MasterService};
use crate::models::ApiResponse;
use crate::services::{error_response, tenant_context};

pub async fn options<R: MasterResource>(
    service: &MasterService<R>,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let ctx = match tenant_context(request) {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage.master_options(&ctx, R::TABLE).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            items,
            format!("{} options retrieved successfully", R::TABLE.label),
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
