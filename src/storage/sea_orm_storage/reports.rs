//! 报表查询

use sea_orm::{ConnectionTrait, FromQueryResult};
use uuid::Uuid;

use super::SeaOrmStorage;
use super::sql::SqlBuilder;
use crate::errors::{Result, SchoolAdminError};
use crate::models::{TenantContext, reports::responses::FeeDefaulterRow};
use crate::storage::tables::{CLASSES, SECTIONS, STUDENTS};

impl SeaOrmStorage {
    /// 按学生汇总指定月份的应缴、减免、已缴金额
    pub async fn fee_defaulter_rows_impl(
        &self,
        ctx: &TenantContext,
        class_id: Option<Uuid>,
        section_id: Option<Uuid>,
        months: &[i32],
    ) -> Result<Vec<FeeDefaulterRow>> {
        let session = ctx.require_session()?;
        if months.is_empty() {
            return Ok(Vec::new());
        }

        let mut b = SqlBuilder::new(self.db.get_database_backend());
        b.push("SELECT s.")
            .ident("id")
            .push(" AS student_id, s.")
            .ident("admission_no")
            .push(" AS admission_no, s.")
            .ident("student_name")
            .push(" AS student_name, c.")
            .ident("class_name")
            .push(" AS class_name, sec.")
            .ident("section_name")
            .push(" AS section_name, SUM(")
            .column("l", "amount")
            .push(") AS total_amount, SUM(")
            .column("l", "concession")
            .push(") AS total_concession, SUM(")
            .column("l", "paid_amount")
            .push(") AS total_paid FROM ")
            .ident("student_fee_ledgers")
            .push(" l JOIN ")
            .ident(STUDENTS.table)
            .push(" s ON ")
            .column("s", "id")
            .push(" = ")
            .column("l", "student_id")
            .push(" JOIN ")
            .ident(CLASSES.table)
            .push(" c ON ")
            .column("c", "id")
            .push(" = ")
            .column("s", "class_id")
            .push(" LEFT JOIN ")
            .ident(SECTIONS.table)
            .push(" sec ON ")
            .column("sec", "id")
            .push(" = ")
            .column("s", "section_id")
            .push(" WHERE ")
            .scope("l", ctx.tenant_id, Some(session.session_id))
            .push(" AND ")
            .column("s", "is_deleted")
            .push(" = ")
            .bind(false)
            .push(" AND ")
            .column("l", "fee_month")
            .push(" IN (");
        for (idx, month) in months.iter().enumerate() {
            if idx > 0 {
                b.push(", ");
            }
            b.bind(*month);
        }
        b.push(")");

        if let Some(class_id) = class_id {
            b.push(" AND ").column("s", "class_id").push(" = ").bind(class_id);
        }
        if let Some(section_id) = section_id {
            b.push(" AND ")
                .column("s", "section_id")
                .push(" = ")
                .bind(section_id);
        }

        b.push(" GROUP BY ")
            .column("s", "id")
            .push(", ")
            .column("s", "admission_no")
            .push(", ")
            .column("s", "student_name")
            .push(", ")
            .column("c", "class_name")
            .push(", ")
            .column("sec", "section_name")
            .push(" ORDER BY ")
            .column("s", "student_name")
            .push(" ASC, ")
            .column("s", "admission_no")
            .push(" ASC");

        FeeDefaulterRow::find_by_statement(b.build())
            .all(&self.db)
            .await
            .map_err(|e| SchoolAdminError::report(format!("欠费统计查询失败: {e}")))
    }
}
