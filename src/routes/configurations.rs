use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::masters::configure_master;
use crate::middlewares;
use crate::models::configurations::requests::ConfigurationValueRequest;
use crate::services::masters::resources::Configurations;
use crate::services::{ConfigurationService, MasterResource};
use crate::utils::SafeConfigKey;

// 懒加载的全局 ConfigurationService 实例
static CONFIGURATION_SERVICE: Lazy<ConfigurationService> =
    Lazy::new(ConfigurationService::new_lazy);

pub async fn get_value(req: HttpRequest, key: SafeConfigKey) -> ActixResult<HttpResponse> {
    CONFIGURATION_SERVICE.get_value(&req, key.0).await
}

pub async fn put_value(
    req: HttpRequest,
    key: SafeConfigKey,
    payload: web::Json<ConfigurationValueRequest>,
) -> ActixResult<HttpResponse> {
    CONFIGURATION_SERVICE
        .put_value(&req, key.0, payload.into_inner())
        .await
}

fn configuration_extra(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/key/{key}")
            .route(web::get().to(get_value))
            .route(
                web::put()
                    .to(put_value)
                    .wrap(middlewares::RequireRole::new_any(
                        Configurations::write_roles(),
                    )),
            ),
    );
}

// 配置路由
pub fn configure_configuration_routes(cfg: &mut web::ServiceConfig) {
    configure_master::<Configurations>(cfg, configuration_extra);
}
