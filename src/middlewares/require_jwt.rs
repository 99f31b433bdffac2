/*!
 * JWT 认证中间件
 *
 * 令牌由上游身份服务签发，本服务只负责验签并解析出租户上下文。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * web::scope("/api/v1/classes")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(handler))
 * ```
 *
 * 处理程序中读取上下文：
 *
 * ```rust,ignore
 * async fn handler(req: HttpRequest) -> Result<HttpResponse> {
 *     let ctx = RequireJWT::extract_context(&req);
 *     // ...
 * }
 * ```
 *
 * ## 认证流程
 *
 * 1. 客户端在请求头中包含 `Authorization: Bearer <JWT_TOKEN>`
 * 2. 校验签名、过期时间与 `token_type = "access"`
 * 3. 解析出 `TenantContext`（用户、角色、租户、可选学年）放入请求扩展
 * 4. 任一步骤失败返回 401
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, info};

use super::create_error_response;
use crate::models::{ErrorCode, TenantContext};
use crate::utils::jwt::JwtUtils;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

// 辅助函数：提取并验证 JWT access token
fn extract_context(req: &ServiceRequest) -> Result<TenantContext, String> {
    let token = req
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| "Missing or invalid Authorization header".to_string())?;

    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        "Invalid JWT token".to_string()
    })?;

    claims.into_context()
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求直接放行
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match extract_context(&req) {
                Ok(ctx) => {
                    debug!(
                        "JWT authentication successful for user {} in tenant {}",
                        ctx.user_id, ctx.tenant_code
                    );
                    req.extensions_mut().insert(ctx);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取上下文
impl RequireJWT {
    /// 从请求扩展中提取租户上下文
    ///
    /// 只能在应用了 RequireJWT 的路由中使用
    pub fn extract_context(req: &actix_web::HttpRequest) -> Option<TenantContext> {
        req.extensions().get::<TenantContext>().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AcademicSession, StaffRole};
    use actix_web::{App, HttpRequest, HttpResponse, test, web};
    use uuid::Uuid;

    async fn whoami(req: HttpRequest) -> HttpResponse {
        match RequireJWT::extract_context(&req) {
            Some(ctx) => HttpResponse::Ok().body(ctx.tenant_code),
            None => HttpResponse::InternalServerError().finish(),
        }
    }

    #[actix_web::test]
    async fn test_missing_token_is_rejected() {
        let app = test::init_service(
            App::new().service(
                web::scope("/api")
                    .wrap(RequireJWT)
                    .route("/me", web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/me").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_valid_token_exposes_context() {
        let ctx = TenantContext {
            user_id: Uuid::new_v4(),
            role: StaffRole::Accountant,
            tenant_id: Uuid::new_v4(),
            tenant_code: "SCH42".to_string(),
            session: Some(AcademicSession {
                session_id: Uuid::new_v4(),
                session_year: "2025-26".to_string(),
            }),
        };
        let token = JwtUtils::generate_access_token(&ctx).unwrap();

        let app = test::init_service(
            App::new().service(
                web::scope("/api")
                    .wrap(RequireJWT)
                    .route("/me", web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert_eq!(body, "SCH42");
    }
}
