use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;
use uuid::Uuid;

use super::{MasterResource, MasterService, ResourceContext, load_record};
use crate::errors::{Result, SchoolAdminError};
use crate::models::ApiResponse;
use crate::services::{error_response, tenant_context};

pub async fn delete<R: MasterResource>(
    service: &MasterService<R>,
    request: &HttpRequest,
    id: Uuid,
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

    match delete_record(&service.resource, &rc, id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(format!(
            "{} deleted successfully",
            R::TABLE.label
        )))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn delete_record<R: MasterResource>(
    resource: &R,
    rc: &ResourceContext<'_>,
    id: Uuid,
) -> Result<()> {
    let not_found = || SchoolAdminError::not_found(format!("{} not found", R::TABLE.label));
    let record = load_record::<R>(rc.storage, rc.tenant, id)
        .await?
        .ok_or_else(not_found)?;

    let dependents = rc
        .storage
        .master_dependents(rc.tenant, R::TABLE, id)
        .await?;
    if !dependents.is_empty() {
        let used_by = dependents
            .iter()
            .map(|d| format!("{} ({})", d.label, d.count))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(SchoolAdminError::in_use(format!(
            "{} is referenced by: {used_by}",
            R::TABLE.label
        )));
    }

    if !resource.remove(rc, id).await? {
        return Err(not_found());
    }
    info!(
        "{} {} deleted in tenant {} by {}",
        R::TABLE.label,
        id,
        rc.tenant.tenant_code,
        rc.tenant.user_id
    );
    resource.after_write(rc, Some(&record)).await;
    Ok(())
}
