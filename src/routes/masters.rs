//! 通用主数据路由
//!
//! 每个资源挂在自己的前缀下，服务实例放在 scope 的 app_data 中。
//! 资源特有的路由通过 `extra` 注册，必须排在 `/{id}` 之前。

use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::middlewares;
use crate::models::SetActiveRequest;
use crate::services::{MasterResource, MasterService};
use crate::utils::SafeId;

pub async fn grid_post<R: MasterResource>(
    req: HttpRequest,
    service: web::Data<MasterService<R>>,
    form: web::Form<HashMap<String, String>>,
) -> ActixResult<HttpResponse> {
    service.grid(&req, form.into_inner()).await
}

pub async fn grid_get<R: MasterResource>(
    req: HttpRequest,
    service: web::Data<MasterService<R>>,
    query: web::Query<HashMap<String, String>>,
) -> ActixResult<HttpResponse> {
    service.grid(&req, query.into_inner()).await
}

pub async fn list_options<R: MasterResource>(
    req: HttpRequest,
    service: web::Data<MasterService<R>>,
) -> ActixResult<HttpResponse> {
    service.options(&req).await
}

pub async fn get_record<R: MasterResource>(
    req: HttpRequest,
    service: web::Data<MasterService<R>>,
    id: SafeId,
) -> ActixResult<HttpResponse> {
    service.get(&req, id.0).await
}

pub async fn create_record<R: MasterResource>(
    req: HttpRequest,
    service: web::Data<MasterService<R>>,
    payload: web::Json<R::Payload>,
) -> ActixResult<HttpResponse> {
    service.create(&req, payload.into_inner()).await
}

pub async fn update_record<R: MasterResource>(
    req: HttpRequest,
    service: web::Data<MasterService<R>>,
    id: SafeId,
    payload: web::Json<R::Payload>,
) -> ActixResult<HttpResponse> {
    service.update(&req, id.0, payload.into_inner()).await
}

pub async fn delete_record<R: MasterResource>(
    req: HttpRequest,
    service: web::Data<MasterService<R>>,
    id: SafeId,
) -> ActixResult<HttpResponse> {
    service.delete(&req, id.0).await
}

pub async fn set_active<R: MasterResource>(
    req: HttpRequest,
    service: web::Data<MasterService<R>>,
    id: SafeId,
    payload: web::Json<SetActiveRequest>,
) -> ActixResult<HttpResponse> {
    service.set_active(&req, id.0, payload.is_active).await
}

/// 无额外路由
pub fn no_extra(_: &mut web::ServiceConfig) {}

// 配置路由
pub fn configure_master<R: MasterResource>(
    cfg: &mut web::ServiceConfig,
    extra: fn(&mut web::ServiceConfig),
) {
    let write_roles = R::write_roles();

    cfg.service(
        web::scope(R::PATH)
            .app_data(web::Data::new(MasterService::<R>::new_lazy()))
            .wrap(middlewares::RequireJWT)
            .configure(extra)
            .service(
                web::resource("/grid")
                    .route(web::post().to(grid_post::<R>))
                    .route(web::get().to(grid_get::<R>)),
            )
            .service(web::resource("/options").route(web::get().to(list_options::<R>)))
            .service(
                web::resource("").route(
                    web::post()
                        .to(create_record::<R>)
                        .wrap(middlewares::RequireRole::new_any(write_roles)),
                ),
            )
            .service(
                web::resource("/{id}/active").route(
                    web::put()
                        .to(set_active::<R>)
                        .wrap(middlewares::RequireRole::new_any(write_roles)),
                ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_record::<R>))
                    .route(
                        web::put()
                            .to(update_record::<R>)
                            .wrap(middlewares::RequireRole::new_any(write_roles)),
                    )
                    .route(
                        web::delete()
                            .to(delete_record::<R>)
                            .wrap(middlewares::RequireRole::new_any(write_roles)),
                    ),
            ),
    );
}
