use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use tracing::error;

use super::SystemService;
use crate::models::system::responses::HealthResponse;
use crate::models::{ApiResponse, AppStartTime, ErrorCode};

pub async fn health(service: &SystemService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();

    let uptime_secs = request
        .app_data::<web::Data<AppStartTime>>()
        .map(|start| {
            chrono::Utc::now()
                .signed_duration_since(start.start_datetime)
                .num_seconds()
        })
        .unwrap_or(0);

    let (database, healthy) = match storage.ping().await {
        Ok(()) => ("ok", true),
        Err(e) => {
            error!("Health check database ping failed: {}", e);
            ("unavailable", false)
        }
    };

    let response = HealthResponse {
        status: if healthy { "ok" } else { "degraded" }.to_string(),
        database: database.to_string(),
        environment: config.app.environment.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs,
    };

    if healthy {
        Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Service is healthy")))
    } else {
        Ok(HttpResponse::ServiceUnavailable().json(ApiResponse::error(
            ErrorCode::InternalServerError,
            response,
            "Database is unavailable",
        )))
    }
}
