pub mod academics;

pub mod configurations;

pub mod fees;

pub mod grade_formulas;

pub mod hr;

pub mod masters;

pub mod reports;

pub mod system;

pub mod transport;

pub use academics::configure_academics_routes;
pub use configurations::configure_configuration_routes;
pub use fees::configure_fee_routes;
pub use grade_formulas::configure_grade_formula_routes;
pub use hr::configure_hr_routes;
pub use reports::configure_report_routes;
pub use system::configure_system_routes;
pub use transport::configure_transport_routes;

/// 注册全部 API 路由
pub fn configure_api_routes(cfg: &mut actix_web::web::ServiceConfig) {
    configure_academics_routes(cfg);
    configure_hr_routes(cfg);
    configure_transport_routes(cfg);
    configure_configuration_routes(cfg);
    configure_fee_routes(cfg);
    configure_grade_formula_routes(cfg);
    configure_report_routes(cfg);
    configure_system_routes(cfg);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test, web};
    use serde_json::{Value, json};
    use uuid::Uuid;

    use super::configure_api_routes;
    use crate::cache::ObjectCache;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::models::{AcademicSession, StaffRole, TenantContext};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::utils::jwt::JwtUtils;

    fn bearer(role: StaffRole, tenant_id: Uuid) -> (&'static str, String) {
        let ctx = TenantContext {
            user_id: Uuid::new_v4(),
            role,
            tenant_id,
            tenant_code: "SCH01".to_string(),
            session: Some(AcademicSession {
                session_id: Uuid::from_u128(2025),
                session_year: "2025-26".to_string(),
            }),
        };
        let token = JwtUtils::generate_access_token(&ctx).unwrap();
        ("Authorization", format!("Bearer {token}"))
    }

    macro_rules! api_app {
        () => {{
            let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.unwrap());
            let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_capacity(100, 60));
            test::init_service(
                App::new()
                    .app_data(web::Data::new(storage))
                    .app_data(web::Data::new(cache))
                    .configure(configure_api_routes),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn test_write_routes_enforce_roles() {
        let app = api_app!();
        let tenant_id = Uuid::new_v4();
        let accountant = bearer(StaffRole::Accountant, tenant_id);
        let admin = bearer(StaffRole::Admin, tenant_id);

        let req = test::TestRequest::post()
            .uri("/api/v1/classes")
            .insert_header(accountant.clone())
            .set_json(json!({ "class_name": "VI" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri("/api/v1/classes")
            .insert_header(admin)
            .set_json(json!({ "class_name": "VI" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        // 读取不受角色限制
        let req = test::TestRequest::get()
            .uri("/api/v1/classes/options")
            .insert_header(accountant.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/api/v1/fee-categories")
            .insert_header(accountant)
            .set_json(json!({
                "fee_name": "Tuition",
                "frequency": "monthly",
                "sort_order": 1
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/api/v1/classes")
            .set_json(json!({ "class_name": "VII" }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[actix_web::test]
    async fn test_extra_routes_take_precedence_over_id() {
        let app = api_app!();
        let admin = bearer(StaffRole::Admin, Uuid::new_v4());

        let req = test::TestRequest::get()
            .uri("/api/v1/departments/tree")
            .insert_header(admin.clone())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::put()
            .uri("/api/v1/configurations/key/session.start_month")
            .insert_header(admin.clone())
            .set_json(json!({ "config_value": "6" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/v1/configurations/key/session.start_month")
            .insert_header(admin.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["config_value"], "6");

        // 非 UUID 的 id 仍由 `/{id}` 处理
        let req = test::TestRequest::get()
            .uri("/api/v1/departments/not-a-uuid")
            .insert_header(admin)
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[actix_web::test]
    async fn test_report_scope_leaves_compression_to_app() {
        let app = api_app!();

        let req = test::TestRequest::get()
            .uri("/api/v1/reports/fee-defaulters")
            .insert_header(("Accept-Encoding", "gzip"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(resp.headers().get("content-encoding").is_none());
    }
}
