use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{MasterResource, MasterService, ResourceContext, load_record, validate_payload};
use crate::errors::{Result, SchoolAdminError};
use crate::models::{ApiResponse, TenantContext};
use crate::services::{error_response, tenant_context};

pub async fn create<R: MasterResource>(
    service: &MasterService<R>,
    request: &HttpRequest,
    payload: R::Payload,
) -> ActixResult<HttpResponse> {
    let ctx = match tenant_context(request) {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);
    let cache = service.get_cache(request);
    let rc = ResourceContext {
        storage: storage.as_ref(),
        cache: cache.as_ref(),
        tenant: &ctx,
    };

    match create_record(&service.resource, &rc, &ctx, &payload).await {
        Ok(record) => Ok(HttpResponse::Created().json(ApiResponse::success(
            record,
            format!("{} created successfully", R::TABLE.label),
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn create_record<R: MasterResource>(
    resource: &R,
    rc: &ResourceContext<'_>,
    ctx: &TenantContext,
    payload: &R::Payload,
) -> Result<R::Record> {
    validate_payload::<R>(rc, None, payload).await?;
    resource.check(rc, None, payload).await?;

    let id = resource.insert(rc, payload).await?;
    info!(
        "{} {} created in tenant {} by {}",
        R::TABLE.label,
        id,
        ctx.tenant_code,
        ctx.user_id
    );

    let record = load_record::<R>(rc.storage, ctx, id)
        .await?
        .ok_or_else(|| {
            SchoolAdminError::database_operation(format!("{} {id} missing after insert", R::TABLE.label))
        })?;
    resource.after_write(rc, Some(&record)).await;
    Ok(record)
}
