//! 欠费报表导出

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use rust_xlsxwriter::{Format, Workbook};
use tracing::info;

use super::ReportService;
use super::fee_defaulters::build_report;
use crate::errors::{Result, SchoolAdminError};
use crate::models::reports::requests::FeeDefaulterQuery;
use crate::models::reports::responses::FeeDefaulterReport;
use crate::services::{error_response, tenant_context};

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub async fn export_fee_defaulters(
    service: &ReportService,
    request: &HttpRequest,
    query: FeeDefaulterQuery,
) -> ActixResult<HttpResponse> {
    let ctx = match tenant_context(request) {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    let report = match build_report(service, request, &ctx, &query).await {
        Ok(report) => report,
        Err(e) => return Ok(error_response(&e)),
    };

    match generate_xlsx(&report) {
        Ok(buffer) => {
            info!(
                "Fee defaulter export with {} rows generated for tenant {}",
                report.items.len(),
                ctx.tenant_code
            );
            let timestamp = Utc::now().format("%Y%m%d_%H%M%S").to_string();
            let filename = format!("fee_defaulters_{timestamp}.xlsx");

            Ok(HttpResponse::Ok()
                .content_type(XLSX_CONTENT_TYPE)
                .insert_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{filename}\""),
                ))
                .body(buffer))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

fn month_range(months: &[i32]) -> String {
    let name = |m: &i32| MONTH_NAMES[(*m - 1).rem_euclid(12) as usize];
    match (months.first(), months.last()) {
        (Some(first), Some(last)) if first != last => format!("{} - {}", name(first), name(last)),
        (Some(only), _) => name(only).to_string(),
        _ => String::new(),
    }
}

/// 生成 XLSX 文件
pub fn generate_xlsx(report: &FeeDefaulterReport) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    let title_format = Format::new().set_bold().set_font_size(14);
    let header_format = Format::new().set_bold();
    let money_format = Format::new().set_num_format("#,##0.00");
    let total_format = Format::new().set_bold().set_num_format("#,##0.00");

    let sheet = workbook.add_worksheet().set_name("Fee Defaulters")?;

    sheet.write_string_with_format(0, 0, "Fee Defaulters", &title_format)?;
    sheet.write_string(
        1,
        0,
        format!("Months: {}", month_range(&report.months)),
    )?;

    let headers = [
        "#",
        "Admission No",
        "Student Name",
        "Class",
        "Section",
        "Total Fee",
        "Concession",
        "Paid",
        "Balance",
    ];
    let header_row = 3;
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(header_row, col as u16, *header, &header_format)?;
    }

    let mut row_idx = header_row + 1;
    for (i, item) in report.items.iter().enumerate() {
        let row = &item.row;
        sheet.write_number(row_idx, 0, (i + 1) as f64)?;
        sheet.write_string(row_idx, 1, &row.admission_no)?;
        sheet.write_string(row_idx, 2, &row.student_name)?;
        sheet.write_string(row_idx, 3, &row.class_name)?;
        sheet.write_string(row_idx, 4, row.section_name.as_deref().unwrap_or("-"))?;
        sheet.write_number_with_format(row_idx, 5, row.total_amount, &money_format)?;
        sheet.write_number_with_format(row_idx, 6, row.total_concession, &money_format)?;
        sheet.write_number_with_format(row_idx, 7, row.total_paid, &money_format)?;
        sheet.write_number_with_format(row_idx, 8, item.balance, &money_format)?;
        row_idx += 1;
    }

    sheet.write_string_with_format(row_idx, 7, "Total", &header_format)?;
    sheet.write_number_with_format(row_idx, 8, report.total_balance, &total_format)?;

    sheet.set_column_width(1, 14)?;
    sheet.set_column_width(2, 28)?;
    sheet.set_column_width(3, 14)?;
    for col in 5..=8 {
        sheet.set_column_width(col, 12)?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| SchoolAdminError::report(format!("Failed to write workbook: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reports::responses::{FeeDefaulter, FeeDefaulterRow};
    use uuid::Uuid;

    #[test]
    fn test_month_range() {
        assert_eq!(month_range(&[4, 5, 6]), "Apr - Jun");
        assert_eq!(month_range(&[4]), "Apr");
        assert_eq!(month_range(&[]), "");
    }

    #[test]
    fn test_generate_xlsx_is_zip() {
        let report = FeeDefaulterReport {
            through_month: 5,
            months: vec![4, 5],
            items: vec![FeeDefaulter {
                row: FeeDefaulterRow {
                    student_id: Uuid::new_v4(),
                    admission_no: "A-1".to_string(),
                    student_name: "Asha".to_string(),
                    class_name: "Class 5".to_string(),
                    section_name: None,
                    total_amount: 2000.0,
                    total_concession: 0.0,
                    total_paid: 500.0,
                },
                balance: 1500.0,
            }],
            total_balance: 1500.0,
        };
        let buffer = generate_xlsx(&report).unwrap();
        // XLSX 是 zip 容器
        assert_eq!(&buffer[..2], b"PK");
    }
}
