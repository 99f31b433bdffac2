use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;
use uuid::Uuid;

use super::{MasterResource, MasterService, ResourceContext, load_record, validate_payload};
use crate::errors::{Result, SchoolAdminError};
use crate::models::ApiResponse;
use crate::services::{error_response, tenant_context};

pub async fn update<R: MasterResource>(
    service: &MasterService<R>,
    request: &HttpRequest,
    id: Uuid,
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

    match update_record(&service.resource, &rc, id, &payload).await {
        Ok(record) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            record,
            format!("{} updated successfully", R::TABLE.label),
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn update_record<R: MasterResource>(
    resource: &R,
    rc: &ResourceContext<'_>,
    id: Uuid,
    payload: &R::Payload,
) -> Result<R::Record> {
    let not_found = || SchoolAdminError::not_found(format!("{} not found", R::TABLE.label));

    // 旧记录用于失效缓存等后续处理
    let previous = load_record::<R>(rc.storage, rc.tenant, id)
        .await?
        .ok_or_else(not_found)?;

    validate_payload::<R>(rc, Some(id), payload).await?;
    resource.check(rc, Some(id), payload).await?;

    if !resource.update(rc, id, payload).await? {
        return Err(not_found());
    }
    info!(
        "{} {} updated in tenant {} by {}",
        R::TABLE.label,
        id,
        rc.tenant.tenant_code,
        rc.tenant.user_id
    );

    resource.after_write(rc, Some(&previous)).await;
    let record = load_record::<R>(rc.storage, rc.tenant, id)
        .await?
        .ok_or_else(not_found)?;
    resource.after_write(rc, Some(&record)).await;
    Ok(record)
}
