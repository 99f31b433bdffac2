use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{MasterResource, MasterService, decode};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::{GridRequest, GridResponse};
use crate::services::{error_response, tenant_context};

/// DataTables 直接读取顶层的 `draw` / `recordsTotal` / `recordsFiltered` / `data`，
/// 因此表格响应不包裹在 `ApiResponse` 中
pub async fn grid<R: MasterResource>(
    service: &MasterService<R>,
    request: &HttpRequest,
    params: HashMap<String, String>,
) -> ActixResult<HttpResponse> {
    let ctx = match tenant_context(request) {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let config = &AppConfig::get().grid;
    let grid_request =
        GridRequest::from_params(&params, config.default_page_length, config.max_page_length);

    let page = match storage.grid_master(&ctx, R::TABLE, &grid_request).await {
        Ok(page) => page,
        Err(e) => return Ok(error_response(&e)),
    };

    let data: Result<Vec<R::Record>> = page.rows.iter().map(decode::<R::Record>).collect();
    match data {
        Ok(data) => Ok(HttpResponse::Ok().json(GridResponse {
            draw: grid_request.draw,
            records_total: page.total,
            records_filtered: page.filtered,
            data,
        })),
        Err(e) => Ok(error_response(&e)),
    }
}
