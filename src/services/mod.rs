pub mod configurations;
pub mod departments;
pub mod fees;
pub mod grade_formulas;
pub mod masters;
pub mod reports;
pub mod system;
pub mod transport;

pub use configurations::ConfigurationService;
pub use departments::DepartmentService;
pub use fees::FeeService;
pub use grade_formulas::GradeFormulaService;
pub use masters::{MasterResource, MasterService};
pub use reports::ReportService;
pub use system::SystemService;
pub use transport::TransportService;

use actix_web::{HttpRequest, HttpResponse, http::StatusCode};
use tracing::error;

use crate::errors::SchoolAdminError;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, TenantContext};

/// 领域错误到 HTTP 响应的映射
pub(crate) fn error_response(err: &SchoolAdminError) -> HttpResponse {
    let (status, code) = match err {
        SchoolAdminError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::ValidationFailed),
        SchoolAdminError::SessionRequired(_) => {
            (StatusCode::BAD_REQUEST, ErrorCode::SessionRequired)
        }
        SchoolAdminError::InvalidReference(_) => {
            (StatusCode::BAD_REQUEST, ErrorCode::ReferenceNotFound)
        }
        SchoolAdminError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
        SchoolAdminError::Duplicate(_) => (StatusCode::CONFLICT, ErrorCode::DuplicateRecord),
        SchoolAdminError::InUse(_) => (StatusCode::CONFLICT, ErrorCode::RecordInUse),
        SchoolAdminError::CircularReference(_) => {
            (StatusCode::CONFLICT, ErrorCode::CircularReference)
        }
        SchoolAdminError::Authentication(_) => (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized),
        SchoolAdminError::Authorization(_) => (StatusCode::FORBIDDEN, ErrorCode::Forbidden),
        SchoolAdminError::Report(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::ReportGenerationFailed,
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalServerError,
        ),
    };

    if status.is_server_error() {
        error!("{}", err.format_simple());
    }
    HttpResponse::build(status).json(ApiResponse::error_empty(code, err.message()))
}

/// 读取 RequireJWT 放入的租户上下文
pub(crate) fn tenant_context(request: &HttpRequest) -> Result<TenantContext, HttpResponse> {
    RequireJWT::extract_context(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing tenant context",
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (SchoolAdminError::validation("x"), StatusCode::BAD_REQUEST),
            (SchoolAdminError::session_required("x"), StatusCode::BAD_REQUEST),
            (SchoolAdminError::invalid_reference("x"), StatusCode::BAD_REQUEST),
            (SchoolAdminError::not_found("x"), StatusCode::NOT_FOUND),
            (SchoolAdminError::duplicate("x"), StatusCode::CONFLICT),
            (SchoolAdminError::in_use("x"), StatusCode::CONFLICT),
            (SchoolAdminError::circular_reference("x"), StatusCode::CONFLICT),
            (SchoolAdminError::authentication("x"), StatusCode::UNAUTHORIZED),
            (SchoolAdminError::authorization("x"), StatusCode::FORBIDDEN),
            (
                SchoolAdminError::database_operation("x"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(error_response(&err).status(), status, "{err}");
        }
    }
}
