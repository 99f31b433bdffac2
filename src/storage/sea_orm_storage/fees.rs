//! 收费存储操作
//!
//! 收费计划与减免的写入都在事务中完成：计划行、学生明细行、减免额要么同时成功，要么全部回滚。

use std::collections::HashSet;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, QueryFilter, Set,
    TransactionTrait, sea_query::Expr,
};
use tracing::info;
use uuid::Uuid;

use super::SeaOrmStorage;
use super::master::{find_as, insert_row, soft_delete_row, update_row};
use super::sql::SqlBuilder;
use crate::entity::student_fee_ledgers::{ActiveModel, Column, Entity as StudentFeeLedgers};
use crate::errors::{Result, SchoolAdminError};
use crate::models::{
    TenantContext,
    fees::{
        entities::{DiscountType, FeeDiscount, FeeMapConcession, FeeMapPlan, round2},
        requests::{FeeMapConcessionRequest, FeeMapPlanRequest},
        responses::StudentLedgerRow,
    },
};
use crate::storage::{
    MasterPayload, PaymentOutcome, ScopeFilter,
    tables::{FEE_DISCOUNTS, FEE_MAP_CONCESSIONS, FEE_MAP_PLANS, STUDENTS},
};

/// 单条 INSERT 的最大行数
const LEDGER_BATCH_SIZE: usize = 200;
/// 小于该值的余额视为已结清
const SETTLED_EPSILON: f64 = 0.005;

#[derive(Debug, FromQueryResult)]
struct StudentIdRow {
    id: Uuid,
}

#[derive(Debug, FromQueryResult)]
struct ConcessionTerms {
    student_id: Uuid,
    discount_type: String,
    discount_value: f64,
}

fn db_error(action: &str) -> impl Fn(sea_orm::DbErr) -> SchoolAdminError + '_ {
    move |e| SchoolAdminError::database_operation(format!("{action}失败: {e}"))
}

fn parse_discount_type(value: &str) -> Result<DiscountType> {
    value
        .parse::<DiscountType>()
        .map_err(SchoolAdminError::database_operation)
}

/// 计划覆盖的在读学生（班级 + 可选分班）
async fn plan_students<C: ConnectionTrait>(
    conn: &C,
    scope: ScopeFilter,
    class_id: Uuid,
    section_id: Option<Uuid>,
) -> Result<Vec<Uuid>> {
    let mut b = SqlBuilder::new(conn.get_database_backend());
    b.push("SELECT t.")
        .ident("id")
        .push(" AS id FROM ")
        .ident(STUDENTS.table)
        .push(" t WHERE ")
        .scope("t", scope.tenant_id, scope.session_id)
        .push(" AND ")
        .column("t", "is_deleted")
        .push(" = ")
        .bind(false)
        .push(" AND ")
        .column("t", "is_active")
        .push(" = ")
        .bind(true)
        .push(" AND ")
        .column("t", "class_id")
        .push(" = ")
        .bind(class_id);
    if let Some(section_id) = section_id {
        b.push(" AND ")
            .column("t", "section_id")
            .push(" = ")
            .bind(section_id);
    }

    let rows = StudentIdRow::find_by_statement(b.build())
        .all(conn)
        .await
        .map_err(db_error("查询计划学生"))?;
    Ok(rows.into_iter().map(|r| r.id).collect())
}

/// 为每个学生、每个勾选月份写入明细行，跳过 `skip` 中已有的 (学生, 月份)
async fn insert_ledger_rows<C: ConnectionTrait>(
    conn: &C,
    ctx: &TenantContext,
    plan_id: Uuid,
    plan: &FeeMapPlanRequest,
    students: &[Uuid],
    skip: &HashSet<(Uuid, i32)>,
) -> Result<usize> {
    let session_id = ctx.require_session()?.session_id;
    let now = chrono::Utc::now().timestamp();
    let months = plan.months.enabled_months();

    let models: Vec<ActiveModel> = students
        .iter()
        .flat_map(|student_id| months.iter().map(move |month| (*student_id, *month)))
        .filter(|key| !skip.contains(key))
        .map(|(student_id, month)| ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(ctx.tenant_id),
            session_id: Set(session_id),
            student_id: Set(student_id),
            fee_map_plan_id: Set(plan_id),
            fee_category_id: Set(plan.fee_category_id),
            fee_month: Set(month),
            amount: Set(plan.amount),
            concession: Set(0.0),
            paid_amount: Set(0.0),
            created_by: Set(ctx.user_id),
            created_date: Set(now),
            modified_by: Set(None),
            modified_date: Set(None),
        })
        .collect();

    let inserted = models.len();
    for chunk in models.chunks(LEDGER_BATCH_SIZE) {
        StudentFeeLedgers::insert_many(chunk.to_vec())
            .exec_without_returning(conn)
            .await
            .map_err(db_error("生成收费明细"))?;
    }
    Ok(inserted)
}

/// 删除计划中尚未缴费的明细
async fn delete_unpaid<C: ConnectionTrait>(
    conn: &C,
    ctx: &TenantContext,
    plan_id: Uuid,
) -> Result<u64> {
    let result = StudentFeeLedgers::delete_many()
        .filter(Column::TenantId.eq(ctx.tenant_id))
        .filter(Column::FeeMapPlanId.eq(plan_id))
        .filter(Column::PaidAmount.lte(0.0))
        .exec(conn)
        .await
        .map_err(db_error("删除未缴明细"))?;
    Ok(result.rows_affected)
}

/// 设置某学生在某计划下所有未缴明细的减免额
async fn set_unpaid_concession<C: ConnectionTrait>(
    conn: &C,
    ctx: &TenantContext,
    plan_id: Uuid,
    student_id: Uuid,
    concession: f64,
) -> Result<u64> {
    let now = chrono::Utc::now().timestamp();
    let result = StudentFeeLedgers::update_many()
        .col_expr(Column::Concession, Expr::value(concession))
        .col_expr(Column::ModifiedBy, Expr::value(ctx.user_id))
        .col_expr(Column::ModifiedDate, Expr::value(now))
        .filter(Column::TenantId.eq(ctx.tenant_id))
        .filter(Column::FeeMapPlanId.eq(plan_id))
        .filter(Column::StudentId.eq(student_id))
        .filter(Column::PaidAmount.lte(0.0))
        .exec(conn)
        .await
        .map_err(db_error("更新减免额"))?;
    Ok(result.rows_affected)
}

/// 计划下所有有效减免及其折扣规则
async fn concession_terms<C: ConnectionTrait>(
    conn: &C,
    ctx: &TenantContext,
    plan_id: Uuid,
) -> Result<Vec<ConcessionTerms>> {
    let mut b = SqlBuilder::new(conn.get_database_backend());
    b.push("SELECT c.")
        .ident("student_id")
        .push(" AS student_id, d.")
        .ident("discount_type")
        .push(" AS discount_type, d.")
        .ident("discount_value")
        .push(" AS discount_value FROM ")
        .ident(FEE_MAP_CONCESSIONS.table)
        .push(" c JOIN ")
        .ident(FEE_DISCOUNTS.table)
        .push(" d ON ")
        .column("d", "id")
        .push(" = ")
        .column("c", "fee_discount_id")
        .push(" WHERE ")
        .column("c", "fee_map_plan_id")
        .push(" = ")
        .bind(plan_id)
        .push(" AND ")
        .column("c", "tenant_id")
        .push(" = ")
        .bind(ctx.tenant_id)
        .push(" AND ")
        .column("c", "is_deleted")
        .push(" = ")
        .bind(false);

    ConcessionTerms::find_by_statement(b.build())
        .all(conn)
        .await
        .map_err(db_error("查询减免规则"))
}

/// 按折扣规则计算并写入减免额
async fn apply_concession_to_ledger<C: ConnectionTrait>(
    conn: &C,
    ctx: &TenantContext,
    scope: ScopeFilter,
    plan_id: Uuid,
    student_id: Uuid,
    discount_id: Uuid,
) -> Result<f64> {
    let plan = find_as::<FeeMapPlan, _>(conn, &FEE_MAP_PLANS, scope, plan_id)
        .await?
        .ok_or_else(|| SchoolAdminError::not_found(format!("Fee plan {plan_id} not found")))?;
    let discount = find_as::<FeeDiscount, _>(conn, &FEE_DISCOUNTS, scope, discount_id)
        .await?
        .ok_or_else(|| {
            SchoolAdminError::not_found(format!("Fee discount {discount_id} not found"))
        })?;

    let concession = parse_discount_type(&discount.discount_type)?
        .concession_for(discount.discount_value, plan.amount);
    set_unpaid_concession(conn, ctx, plan_id, student_id, concession).await?;
    Ok(concession)
}

impl SeaOrmStorage {
    pub async fn create_fee_map_plan_impl(
        &self,
        ctx: &TenantContext,
        plan: &FeeMapPlanRequest,
    ) -> Result<Uuid> {
        let scope = ScopeFilter::resolve(ctx, FEE_MAP_PLANS.scope)?;
        let txn = self.db.begin().await.map_err(db_error("开启事务"))?;

        let plan_id = insert_row(&txn, ctx, &FEE_MAP_PLANS, scope, plan.columns()).await?;
        let students = plan_students(&txn, scope, plan.class_id, plan.section_id).await?;
        let rows =
            insert_ledger_rows(&txn, ctx, plan_id, plan, &students, &HashSet::new()).await?;

        txn.commit().await.map_err(db_error("提交事务"))?;
        info!(
            "Fee plan {} created with {} ledger rows for {} students",
            plan_id,
            rows,
            students.len()
        );
        Ok(plan_id)
    }

    pub async fn update_fee_map_plan_impl(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        plan: &FeeMapPlanRequest,
    ) -> Result<bool> {
        let scope = ScopeFilter::resolve(ctx, FEE_MAP_PLANS.scope)?;
        let txn = self.db.begin().await.map_err(db_error("开启事务"))?;

        if !update_row(&txn, ctx, &FEE_MAP_PLANS, scope, id, plan.columns()).await? {
            return Ok(false);
        }

        let removed = delete_unpaid(&txn, ctx, id).await?;

        // 已缴费的 (学生, 月份) 保留原记录
        let paid: HashSet<(Uuid, i32)> = StudentFeeLedgers::find()
            .filter(Column::TenantId.eq(ctx.tenant_id))
            .filter(Column::FeeMapPlanId.eq(id))
            .all(&txn)
            .await
            .map_err(db_error("查询已缴明细"))?
            .into_iter()
            .map(|row| (row.student_id, row.fee_month))
            .collect();

        let students = plan_students(&txn, scope, plan.class_id, plan.section_id).await?;
        let rows = insert_ledger_rows(&txn, ctx, id, plan, &students, &paid).await?;

        for terms in concession_terms(&txn, ctx, id).await? {
            let concession = parse_discount_type(&terms.discount_type)?
                .concession_for(terms.discount_value, plan.amount);
            set_unpaid_concession(&txn, ctx, id, terms.student_id, concession).await?;
        }

        txn.commit().await.map_err(db_error("提交事务"))?;
        info!(
            "Fee plan {} updated: {} unpaid rows replaced by {}",
            id, removed, rows
        );
        Ok(true)
    }

    pub async fn delete_fee_map_plan_impl(&self, ctx: &TenantContext, id: Uuid) -> Result<bool> {
        let scope = ScopeFilter::resolve(ctx, FEE_MAP_PLANS.scope)?;
        let txn = self.db.begin().await.map_err(db_error("开启事务"))?;

        if !soft_delete_row(&txn, ctx, &FEE_MAP_PLANS, scope, id).await? {
            return Ok(false);
        }
        let removed = delete_unpaid(&txn, ctx, id).await?;

        txn.commit().await.map_err(db_error("提交事务"))?;
        info!("Fee plan {} deleted with {} unpaid rows", id, removed);
        Ok(true)
    }

    pub async fn apply_fee_concession_impl(
        &self,
        ctx: &TenantContext,
        concession: &FeeMapConcessionRequest,
    ) -> Result<Uuid> {
        let scope = ScopeFilter::resolve(ctx, FEE_MAP_CONCESSIONS.scope)?;
        let txn = self.db.begin().await.map_err(db_error("开启事务"))?;

        let id = insert_row(
            &txn,
            ctx,
            &FEE_MAP_CONCESSIONS,
            scope,
            concession.columns(),
        )
        .await?;
        apply_concession_to_ledger(
            &txn,
            ctx,
            scope,
            concession.fee_map_plan_id,
            concession.student_id,
            concession.fee_discount_id,
        )
        .await?;

        txn.commit().await.map_err(db_error("提交事务"))?;
        Ok(id)
    }

    pub async fn update_fee_concession_impl(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        concession: &FeeMapConcessionRequest,
    ) -> Result<bool> {
        let scope = ScopeFilter::resolve(ctx, FEE_MAP_CONCESSIONS.scope)?;
        let txn = self.db.begin().await.map_err(db_error("开启事务"))?;

        let Some(previous) =
            find_as::<FeeMapConcession, _>(&txn, &FEE_MAP_CONCESSIONS, scope, id).await?
        else {
            return Ok(false);
        };

        update_row(
            &txn,
            ctx,
            &FEE_MAP_CONCESSIONS,
            scope,
            id,
            concession.columns(),
        )
        .await?;
        set_unpaid_concession(
            &txn,
            ctx,
            previous.fee_map_plan_id,
            previous.student_id,
            0.0,
        )
        .await?;
        apply_concession_to_ledger(
            &txn,
            ctx,
            scope,
            concession.fee_map_plan_id,
            concession.student_id,
            concession.fee_discount_id,
        )
        .await?;

        txn.commit().await.map_err(db_error("提交事务"))?;
        Ok(true)
    }

    pub async fn remove_fee_concession_impl(&self, ctx: &TenantContext, id: Uuid) -> Result<bool> {
        let scope = ScopeFilter::resolve(ctx, FEE_MAP_CONCESSIONS.scope)?;
        let txn = self.db.begin().await.map_err(db_error("开启事务"))?;

        let Some(previous) =
            find_as::<FeeMapConcession, _>(&txn, &FEE_MAP_CONCESSIONS, scope, id).await?
        else {
            return Ok(false);
        };
        soft_delete_row(&txn, ctx, &FEE_MAP_CONCESSIONS, scope, id).await?;
        set_unpaid_concession(
            &txn,
            ctx,
            previous.fee_map_plan_id,
            previous.student_id,
            0.0,
        )
        .await?;

        txn.commit().await.map_err(db_error("提交事务"))?;
        Ok(true)
    }

    pub async fn list_student_ledger_impl(
        &self,
        ctx: &TenantContext,
        student_id: Uuid,
    ) -> Result<Vec<StudentLedgerRow>> {
        let session = ctx.require_session()?;

        let mut b = SqlBuilder::new(self.db.get_database_backend());
        b.push("SELECT l.")
            .ident("id")
            .push(" AS id, l.")
            .ident("fee_map_plan_id")
            .push(" AS fee_map_plan_id, l.")
            .ident("fee_category_id")
            .push(" AS fee_category_id, c.")
            .ident("fee_name")
            .push(" AS fee_name, l.")
            .ident("fee_month")
            .push(" AS fee_month, l.")
            .ident("amount")
            .push(" AS amount, l.")
            .ident("concession")
            .push(" AS concession, l.")
            .ident("paid_amount")
            .push(" AS paid_amount FROM ")
            .ident("student_fee_ledgers")
            .push(" l JOIN ")
            .ident("fee_categories")
            .push(" c ON ")
            .column("c", "id")
            .push(" = ")
            .column("l", "fee_category_id")
            .push(" WHERE ")
            .scope("l", ctx.tenant_id, Some(session.session_id))
            .push(" AND ")
            .column("l", "student_id")
            .push(" = ")
            .bind(student_id)
            .push(" ORDER BY ")
            .column("c", "sort_order")
            .push(" ASC, ")
            .column("c", "fee_name")
            .push(" ASC, ")
            .column("l", "fee_month")
            .push(" ASC");

        StudentLedgerRow::find_by_statement(b.build())
            .all(&self.db)
            .await
            .map_err(db_error("查询学生收费明细"))
    }

    pub async fn record_fee_payment_impl(
        &self,
        ctx: &TenantContext,
        ledger_id: Uuid,
        amount: f64,
    ) -> Result<PaymentOutcome> {
        let session = ctx.require_session()?;
        let txn = self.db.begin().await.map_err(db_error("开启事务"))?;

        let Some(row) = StudentFeeLedgers::find_by_id(ledger_id)
            .filter(Column::TenantId.eq(ctx.tenant_id))
            .filter(Column::SessionId.eq(session.session_id))
            .one(&txn)
            .await
            .map_err(db_error("查询收费明细"))?
        else {
            return Ok(PaymentOutcome::NotFound);
        };

        let due = round2(row.amount - row.concession - row.paid_amount);
        if due <= SETTLED_EPSILON {
            return Ok(PaymentOutcome::NothingDue);
        }

        // 超出应缴部分不入账
        let paid_amount = round2(row.paid_amount + amount.min(due));
        let mut model: ActiveModel = row.into();
        model.paid_amount = Set(paid_amount);
        model.modified_by = Set(Some(ctx.user_id));
        model.modified_date = Set(Some(chrono::Utc::now().timestamp()));
        let updated = model.update(&txn).await.map_err(db_error("登记缴费"))?;

        txn.commit().await.map_err(db_error("提交事务"))?;
        info!(
            "Payment of {} recorded on ledger {} by {}",
            amount, ledger_id, ctx.user_id
        );
        Ok(PaymentOutcome::Recorded(updated.into_ledger_entry()))
    }
}
