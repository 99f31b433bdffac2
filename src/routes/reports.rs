use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::StaffRole;
use crate::models::reports::requests::FeeDefaulterQuery;
use crate::services::ReportService;

// 懒加载的全局 ReportService 实例
static REPORT_SERVICE: Lazy<ReportService> = Lazy::new(ReportService::new_lazy);

pub async fn fee_defaulters(
    req: HttpRequest,
    query: web::Query<FeeDefaulterQuery>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE
        .fee_defaulters(&req, query.into_inner())
        .await
}

pub async fn export_fee_defaulters(
    req: HttpRequest,
    query: web::Query<FeeDefaulterQuery>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE
        .export_fee_defaulters(&req, query.into_inner())
        .await
}

// 配置路由
pub fn configure_report_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/reports")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    // 收费报表仅对管理员与收费人员开放
                    .wrap(middlewares::RequireRole::new_any(StaffRole::fee_roles()))
                    .route("/fee-defaulters", web::get().to(fee_defaulters))
                    .route("/fee-defaulters/export", web::get().to(export_fee_defaulters)),
            ),
    );
}
