use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use uuid::Uuid;

use super::GradeFormulaService;
use super::merge::load_formulas;
use crate::models::ApiResponse;
use crate::services::{error_response, tenant_context};

pub async fn get_formulas(
    service: &GradeFormulaService,
    request: &HttpRequest,
    class_id: Uuid,
) -> ActixResult<HttpResponse> {
    let ctx = match tenant_context(request) {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);
    let cache = service.get_cache(request);

    match load_formulas(storage.as_ref(), cache.as_ref(), &ctx, class_id).await {
        Ok(formulas) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            formulas,
            "Grade formulas retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
