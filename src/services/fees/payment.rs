use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;
use uuid::Uuid;

use super::FeeService;
use crate::models::fees::requests::PaymentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, tenant_context};
use crate::storage::PaymentOutcome;

pub async fn record_payment(
    service: &FeeService,
    request: &HttpRequest,
    ledger_id: Uuid,
    payload: PaymentRequest,
) -> ActixResult<HttpResponse> {
    let ctx = match tenant_context(request) {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    if let Err(msg) = payload.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request);
    match storage
        .record_fee_payment(&ctx, ledger_id, payload.amount)
        .await
    {
        Ok(PaymentOutcome::Recorded(entry)) => {
            info!(
                "Payment of {} recorded on ledger {} in tenant {} by {}",
                payload.amount, ledger_id, ctx.tenant_code, ctx.user_id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                entry,
                "Payment recorded successfully",
            )))
        }
        Ok(PaymentOutcome::NothingDue) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(
                ErrorCode::FeeAlreadySettled,
                "Nothing is due on this ledger entry",
            ),
        )),
        Ok(PaymentOutcome::NotFound) => Ok(HttpResponse::NotFound().json(
            ApiResponse::error_empty(ErrorCode::NotFound, "Ledger entry not found"),
        )),
        Err(e) => Ok(error_response(&e)),
    }
}
