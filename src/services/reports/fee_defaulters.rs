use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ReportService;
use crate::errors::{Result, SchoolAdminError};
use crate::models::common::months::academic_months_through;
use crate::models::fees::entities::round2;
use crate::models::reports::requests::FeeDefaulterQuery;
use crate::models::reports::responses::{FeeDefaulter, FeeDefaulterReport, FeeDefaulterRow};
use crate::models::{ApiResponse, TenantContext};
use crate::services::configurations::session_start_month;
use crate::services::{error_response, tenant_context};

/// 低于此余额视为已结清
const BALANCE_EPSILON: f64 = 0.005;

pub async fn fee_defaulters(
    service: &ReportService,
    request: &HttpRequest,
    query: FeeDefaulterQuery,
) -> ActixResult<HttpResponse> {
    let ctx = match tenant_context(request) {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match build_report(service, request, &ctx, &query).await {
        Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            report,
            "Fee defaulter report generated successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

/// 生成欠费报表数据（JSON 与导出共用）
pub(crate) async fn build_report(
    service: &ReportService,
    request: &HttpRequest,
    ctx: &TenantContext,
    query: &FeeDefaulterQuery,
) -> Result<FeeDefaulterReport> {
    query.validate().map_err(SchoolAdminError::validation)?;

    let storage = service.get_storage(request);
    let cache = service.get_cache(request);

    let start_month = session_start_month(storage.as_ref(), cache.as_ref(), ctx).await?;
    let months = academic_months_through(start_month, query.month);
    let rows = storage
        .fee_defaulter_rows(ctx, query.class_id, query.section_id, &months)
        .await?;

    Ok(assemble(query.month, months, rows))
}

/// 过滤已结清的学生并计算合计；行顺序沿用查询结果（按学生姓名）
pub fn assemble(through_month: i32, months: Vec<i32>, rows: Vec<FeeDefaulterRow>) -> FeeDefaulterReport {
    let items: Vec<FeeDefaulter> = rows
        .into_iter()
        .filter_map(|row| {
            let balance = row.balance();
            (balance > BALANCE_EPSILON).then_some(FeeDefaulter { row, balance })
        })
        .collect();
    let total_balance = round2(items.iter().map(|i| i.balance).sum());

    FeeDefaulterReport {
        through_month,
        months,
        items,
        total_balance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn row(name: &str, amount: f64, concession: f64, paid: f64) -> FeeDefaulterRow {
        FeeDefaulterRow {
            student_id: Uuid::new_v4(),
            admission_no: format!("ADM-{name}"),
            student_name: name.to_string(),
            class_name: "Class 5".to_string(),
            section_name: Some("A".to_string()),
            total_amount: amount,
            total_concession: concession,
            total_paid: paid,
        }
    }

    #[test]
    fn test_settled_students_are_dropped() {
        let report = assemble(
            6,
            vec![4, 5, 6],
            vec![
                row("Asha", 3000.0, 750.0, 1000.0),
                row("Bala", 3000.0, 0.0, 3000.0),
                row("Chitra", 3000.0, 0.0, 2999.996),
            ],
        );
        assert_eq!(report.items.len(), 1);
        assert_eq!(report.items[0].row.student_name, "Asha");
        assert_eq!(report.items[0].balance, 1250.0);
        assert_eq!(report.total_balance, 1250.0);
        assert_eq!(report.months, vec![4, 5, 6]);
    }

    #[test]
    fn test_order_preserved() {
        let report = assemble(
            4,
            vec![4],
            vec![row("Asha", 100.0, 0.0, 0.0), row("Zoya", 50.5, 0.0, 0.0)],
        );
        let names: Vec<_> = report
            .items
            .iter()
            .map(|i| i.row.student_name.as_str())
            .collect();
        assert_eq!(names, vec!["Asha", "Zoya"]);
        assert_eq!(report.total_balance, 150.5);
    }
}
