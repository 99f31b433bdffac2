use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;
use uuid::Uuid;

use super::GradeFormulaService;
use super::merge::load_formulas;
use crate::errors::{Result, SchoolAdminError};
use crate::models::grade_formulas::entities::GradeFormulaResponse;
use crate::models::grade_formulas::requests::ReplaceGradeFormulasRequest;
use crate::models::{ApiResponse, TenantContext};
use crate::services::{error_response, tenant_context};
use crate::storage::tables;

pub async fn replace_formulas(
    service: &GradeFormulaService,
    request: &HttpRequest,
    class_id: Uuid,
    payload: ReplaceGradeFormulasRequest,
) -> ActixResult<HttpResponse> {
    let ctx = match tenant_context(request) {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match replace(service, request, &ctx, class_id, &payload).await {
        Ok(formulas) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            formulas,
            "Grade formulas saved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn replace(
    service: &GradeFormulaService,
    request: &HttpRequest,
    ctx: &TenantContext,
    class_id: Uuid,
    payload: &ReplaceGradeFormulasRequest,
) -> Result<GradeFormulaResponse> {
    payload.validate().map_err(SchoolAdminError::validation)?;

    let storage = service.get_storage(request);
    let cache = service.get_cache(request);

    if storage
        .find_master(ctx, &tables::CLASSES, class_id)
        .await?
        .is_none()
    {
        return Err(SchoolAdminError::not_found("Class not found"));
    }

    let components = payload.normalized();
    let count = components.len();
    storage
        .replace_grade_formulas(ctx, class_id, components)
        .await?;
    info!(
        "Grade formulas for class {} replaced with {} components in tenant {}",
        class_id, count, ctx.tenant_code
    );

    load_formulas(storage.as_ref(), cache.as_ref(), ctx, class_id).await
}
