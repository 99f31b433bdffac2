use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::masters::{configure_master, no_extra};
use crate::services::DepartmentService;
use crate::services::masters::resources::{Departments, Designations};

// 懒加载的全局 DepartmentService 实例
static DEPARTMENT_SERVICE: Lazy<DepartmentService> = Lazy::new(DepartmentService::new_lazy);

pub async fn department_tree(req: HttpRequest) -> ActixResult<HttpResponse> {
    DEPARTMENT_SERVICE.tree(&req).await
}

fn department_extra(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/tree").route(web::get().to(department_tree)));
}

// 配置路由
pub fn configure_hr_routes(cfg: &mut web::ServiceConfig) {
    configure_master::<Departments>(cfg, department_extra);
    configure_master::<Designations>(cfg, no_extra);
}
