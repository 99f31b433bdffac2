use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use uuid::Uuid;

use super::FeeService;
use crate::errors::{Result, SchoolAdminError};
use crate::models::common::months::academic_position;
use crate::models::fees::entities::round2;
use crate::models::fees::responses::{StudentLedgerItem, StudentLedgerResponse, StudentLedgerRow};
use crate::models::{ApiResponse, TenantContext};
use crate::services::configurations::session_start_month;
use crate::services::{error_response, tenant_context};
use crate::storage::tables;

pub async fn student_ledger(
    service: &FeeService,
    request: &HttpRequest,
    student_id: Uuid,
) -> ActixResult<HttpResponse> {
    let ctx = match tenant_context(request) {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match load_ledger(service, request, &ctx, student_id).await {
        Ok(ledger) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ledger,
            "Student ledger retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn load_ledger(
    service: &FeeService,
    request: &HttpRequest,
    ctx: &TenantContext,
    student_id: Uuid,
) -> Result<StudentLedgerResponse> {
    let storage = service.get_storage(request);
    let cache = service.get_cache(request);

    if storage
        .find_master(ctx, &tables::STUDENTS, student_id)
        .await?
        .is_none()
    {
        return Err(SchoolAdminError::not_found("Student not found"));
    }

    let rows = storage.list_student_ledger(ctx, student_id).await?;
    let start_month = session_start_month(storage.as_ref(), cache.as_ref(), ctx).await?;
    Ok(summarize(student_id, rows, start_month))
}

/// 按学年月份排序并汇总
///
/// 同一月份内保持存储层给出的收费项目顺序。
pub fn summarize(
    student_id: Uuid,
    mut rows: Vec<StudentLedgerRow>,
    start_month: i32,
) -> StudentLedgerResponse {
    rows.sort_by_key(|r| academic_position(r.fee_month, start_month));

    let mut total_amount = 0.0;
    let mut total_concession = 0.0;
    let mut total_paid = 0.0;
    let items: Vec<StudentLedgerItem> = rows
        .into_iter()
        .map(|row| {
            total_amount += row.amount;
            total_concession += row.concession;
            total_paid += row.paid_amount;
            let balance = round2(row.amount - row.concession - row.paid_amount).max(0.0);
            StudentLedgerItem { row, balance }
        })
        .collect();

    let total_balance = round2(items.iter().map(|i| i.balance).sum());
    StudentLedgerResponse {
        student_id,
        items,
        total_amount: round2(total_amount),
        total_concession: round2(total_concession),
        total_paid: round2(total_paid),
        total_balance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fee_name: &str, month: i32, amount: f64, concession: f64, paid: f64) -> StudentLedgerRow {
        StudentLedgerRow {
            id: Uuid::new_v4(),
            fee_map_plan_id: Uuid::new_v4(),
            fee_category_id: Uuid::new_v4(),
            fee_name: fee_name.to_string(),
            fee_month: month,
            amount,
            concession,
            paid_amount: paid,
        }
    }

    #[test]
    fn test_academic_order_from_april() {
        let rows = vec![
            row("Tuition", 1, 1000.0, 0.0, 0.0),
            row("Tuition", 4, 1000.0, 0.0, 0.0),
            row("Transport", 4, 300.0, 0.0, 0.0),
            row("Tuition", 12, 1000.0, 0.0, 0.0),
            row("Tuition", 3, 1000.0, 0.0, 0.0),
        ];
        let ledger = summarize(Uuid::new_v4(), rows, 4);
        let order: Vec<_> = ledger
            .items
            .iter()
            .map(|i| (i.row.fee_month, i.row.fee_name.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                (4, "Tuition"),
                (4, "Transport"),
                (12, "Tuition"),
                (1, "Tuition"),
                (3, "Tuition")
            ]
        );
    }

    #[test]
    fn test_totals_and_balance() {
        let rows = vec![
            row("Tuition", 4, 1000.0, 250.0, 750.0),
            row("Tuition", 5, 1000.0, 250.0, 100.5),
            row("Lab", 5, 99.99, 0.0, 0.0),
        ];
        let ledger = summarize(Uuid::new_v4(), rows, 4);
        assert_eq!(ledger.items[0].balance, 0.0);
        assert_eq!(ledger.items[1].balance, 649.5);
        assert_eq!(ledger.total_amount, 2099.99);
        assert_eq!(ledger.total_concession, 500.0);
        assert_eq!(ledger.total_paid, 850.5);
        assert_eq!(ledger.total_balance, 749.49);
    }
}
