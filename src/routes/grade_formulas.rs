use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::StaffRole;
use crate::models::grade_formulas::requests::ReplaceGradeFormulasRequest;
use crate::services::GradeFormulaService;
use crate::utils::SafeClassId;

// 懒加载的全局 GradeFormulaService 实例
static GRADE_FORMULA_SERVICE: Lazy<GradeFormulaService> =
    Lazy::new(GradeFormulaService::new_lazy);

pub async fn get_formulas(req: HttpRequest, class_id: SafeClassId) -> ActixResult<HttpResponse> {
    GRADE_FORMULA_SERVICE.get(&req, class_id.0).await
}

pub async fn replace_formulas(
    req: HttpRequest,
    class_id: SafeClassId,
    payload: web::Json<ReplaceGradeFormulasRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_FORMULA_SERVICE
        .replace(&req, class_id.0, payload.into_inner())
        .await
}

// 配置路由
pub fn configure_grade_formula_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/grade-formulas")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/{class_id}")
                    .route(web::get().to(get_formulas))
                    .route(
                        web::put()
                            .to(replace_formulas)
                            .wrap(middlewares::RequireRole::new(&StaffRole::Admin)),
                    ),
            ),
    );
}
