use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::masters::{configure_master, no_extra};
use crate::middlewares;
use crate::models::StaffRole;
use crate::models::fees::requests::PaymentRequest;
use crate::services::FeeService;
use crate::services::masters::resources::{
    FeeCategories, FeeDiscounts, FeeMapConcessions, FeeMapPlans,
};
use crate::utils::{SafeId, SafeStudentId};

// 懒加载的全局 FeeService 实例
static FEE_SERVICE: Lazy<FeeService> = Lazy::new(FeeService::new_lazy);

pub async fn student_ledger(req: HttpRequest, student_id: SafeStudentId) -> ActixResult<HttpResponse> {
    FEE_SERVICE.student_ledger(&req, student_id.0).await
}

pub async fn record_payment(
    req: HttpRequest,
    ledger_id: SafeId,
    payload: web::Json<PaymentRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE
        .record_payment(&req, ledger_id.0, payload.into_inner())
        .await
}

// 配置路由
pub fn configure_fee_routes(cfg: &mut web::ServiceConfig) {
    configure_master::<FeeCategories>(cfg, no_extra);
    configure_master::<FeeDiscounts>(cfg, no_extra);
    configure_master::<FeeMapPlans>(cfg, no_extra);
    configure_master::<FeeMapConcessions>(cfg, no_extra);

    cfg.service(
        web::scope("/api/v1/fees")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/students/{student_id}/ledger")
                    .route(web::get().to(student_ledger)),
            )
            .service(
                web::resource("/ledger/{id}/payments").route(
                    web::post()
                        .to(record_payment)
                        // 收费人员登记缴费
                        .wrap(middlewares::RequireRole::new_any(StaffRole::fee_roles())),
                ),
            ),
    );
}
