use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::masters::{configure_master, no_extra};
use crate::middlewares;
use crate::models::MonthFlags;
use crate::services::TransportService;
use crate::services::masters::resources::{TransportPickups, TransportRoutes};
use crate::services::MasterResource;
use crate::utils::SafeId;

// 懒加载的全局 TransportService 实例
static TRANSPORT_SERVICE: Lazy<TransportService> = Lazy::new(TransportService::new_lazy);

pub async fn get_pickup_months(req: HttpRequest, id: SafeId) -> ActixResult<HttpResponse> {
    TRANSPORT_SERVICE.get_months(&req, id.0).await
}

pub async fn put_pickup_months(
    req: HttpRequest,
    id: SafeId,
    months: web::Json<MonthFlags>,
) -> ActixResult<HttpResponse> {
    TRANSPORT_SERVICE
        .put_months(&req, id.0, months.into_inner())
        .await
}

fn pickup_extra(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/{id}/months")
            .route(web::get().to(get_pickup_months))
            .route(
                web::put()
                    .to(put_pickup_months)
                    .wrap(middlewares::RequireRole::new_any(
                        TransportPickups::write_roles(),
                    )),
            ),
    );
}

// 配置路由
pub fn configure_transport_routes(cfg: &mut web::ServiceConfig) {
    configure_master::<TransportRoutes>(cfg, no_extra);
    configure_master::<TransportPickups>(cfg, pickup_extra);
}
