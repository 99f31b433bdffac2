//! 主数据通用读写
//!
//! 所有函数都接受任意 `ConnectionTrait`，既可在连接池上执行，也可在事务中执行。

use sea_orm::{ConnectionTrait, DbBackend, FromQueryResult, QueryResult, Statement, Value};
use uuid::Uuid;

use super::SeaOrmStorage;
use super::grid::{CountRow, build_grid_statements};
use super::sql::SqlBuilder;
use crate::errors::{Result, SchoolAdminError};
use crate::models::{GridRequest, OptionItem, TenantContext};
use crate::storage::{Dependent, GridPage, LabelPart, MasterTable, ScopeFilter, tables};

pub(super) async fn count<C: ConnectionTrait>(conn: &C, stmt: Statement) -> Result<i64> {
    let row = CountRow::find_by_statement(stmt)
        .one(conn)
        .await
        .map_err(|e| SchoolAdminError::database_operation(format!("统计查询失败: {e}")))?;
    Ok(row.map(|r| r.count).unwrap_or(0))
}

/// `WHERE t.id = ? AND <scope> AND t.is_deleted = false`
fn push_id_filter(b: &mut SqlBuilder, alias: &str, scope: ScopeFilter, id: Uuid) {
    b.push(" WHERE ")
        .column(alias, "id")
        .push(" = ")
        .bind(id)
        .push(" AND ")
        .scope(alias, scope.tenant_id, scope.session_id)
        .push(" AND ")
        .column(alias, "is_deleted")
        .push(" = ")
        .bind(false);
}

/// `COALESCE(j0.a, '') || ' - ' || COALESCE(j1.b, '')`，MySQL 使用 `CONCAT`
fn push_option_label(b: &mut SqlBuilder, backend: DbBackend, parts: &[LabelPart]) {
    let mysql = backend == DbBackend::MySql;
    if mysql {
        b.push("CONCAT(");
    }
    for (idx, part) in parts.iter().enumerate() {
        if idx > 0 {
            b.push(if mysql { ", ' - ', " } else { " || ' - ' || " });
        }
        b.push("COALESCE(")
            .column(&format!("j{idx}"), part.display)
            .push(", '')");
    }
    if mysql {
        b.push(")");
    }
}

pub(super) async fn find_row<C: ConnectionTrait>(
    conn: &C,
    table: &MasterTable,
    scope: ScopeFilter,
    id: Uuid,
) -> Result<Option<QueryResult>> {
    let mut b = SqlBuilder::new(conn.get_database_backend());
    b.push("SELECT t.* FROM ").ident(table.table).push(" t");
    push_id_filter(&mut b, "t", scope, id);

    conn.query_one_raw(b.build())
        .await
        .map_err(|e| SchoolAdminError::database_operation(format!("查询{}失败: {e}", table.label)))
}

/// 查询并解码为指定类型
pub(super) async fn find_as<T: FromQueryResult, C: ConnectionTrait>(
    conn: &C,
    table: &MasterTable,
    scope: ScopeFilter,
    id: Uuid,
) -> Result<Option<T>> {
    match find_row(conn, table, scope, id).await? {
        Some(row) => T::from_query_result(&row, "").map(Some).map_err(|e| {
            SchoolAdminError::database_operation(format!("解析{}失败: {e}", table.label))
        }),
        None => Ok(None),
    }
}

pub(super) async fn insert_row<C: ConnectionTrait>(
    conn: &C,
    ctx: &TenantContext,
    table: &MasterTable,
    scope: ScopeFilter,
    columns: Vec<(&'static str, Value)>,
) -> Result<Uuid> {
    let id = Uuid::new_v4();
    let now = chrono::Utc::now().timestamp();

    let mut all: Vec<(&'static str, Value)> = vec![
        ("id", id.into()),
        ("tenant_id", scope.tenant_id.into()),
        ("tenant_code", ctx.tenant_code.clone().into()),
    ];
    if let Some(session_id) = scope.session_id {
        let session_year = ctx
            .session
            .as_ref()
            .map(|s| s.session_year.clone())
            .unwrap_or_default();
        all.push(("session_id", session_id.into()));
        all.push(("session_year", session_year.into()));
    }
    all.push(("created_by", ctx.user_id.into()));
    all.push(("created_date", now.into()));
    all.push(("is_active", true.into()));
    all.push(("is_deleted", false.into()));
    all.extend(columns);

    let mut b = SqlBuilder::new(conn.get_database_backend());
    b.push("INSERT INTO ").ident(table.table).push(" (");
    for (idx, (column, _)) in all.iter().enumerate() {
        if idx > 0 {
            b.push(", ");
        }
        b.ident(column);
    }
    b.push(") VALUES (");
    for (idx, (_, value)) in all.into_iter().enumerate() {
        if idx > 0 {
            b.push(", ");
        }
        b.bind(value);
    }
    b.push(")");

    conn.execute_raw(b.build())
        .await
        .map_err(|e| SchoolAdminError::database_operation(format!("创建{}失败: {e}", table.label)))?;
    Ok(id)
}

/// `UPDATE <table> SET ... , modified_by, modified_date WHERE id AND scope AND 未删除`
pub(super) async fn update_row<C: ConnectionTrait>(
    conn: &C,
    ctx: &TenantContext,
    table: &MasterTable,
    scope: ScopeFilter,
    id: Uuid,
    columns: Vec<(&'static str, Value)>,
) -> Result<bool> {
    let now = chrono::Utc::now().timestamp();

    let mut b = SqlBuilder::new(conn.get_database_backend());
    b.push("UPDATE ").ident(table.table).push(" SET ");
    for (column, value) in columns {
        b.ident(column).push(" = ").bind(value).push(", ");
    }
    b.ident("modified_by")
        .push(" = ")
        .bind(ctx.user_id)
        .push(", ")
        .ident("modified_date")
        .push(" = ")
        .bind(now);
    push_id_filter(&mut b, "", scope, id);

    let result = conn
        .execute_raw(b.build())
        .await
        .map_err(|e| SchoolAdminError::database_operation(format!("更新{}失败: {e}", table.label)))?;
    Ok(result.rows_affected() > 0)
}

pub(super) async fn soft_delete_row<C: ConnectionTrait>(
    conn: &C,
    ctx: &TenantContext,
    table: &MasterTable,
    scope: ScopeFilter,
    id: Uuid,
) -> Result<bool> {
    update_row(conn, ctx, table, scope, id, vec![("is_deleted", true.into())]).await
}

pub(super) async fn duplicate_exists<C: ConnectionTrait>(
    conn: &C,
    table: &MasterTable,
    scope: ScopeFilter,
    columns: &[(&'static str, Value)],
    exclude_id: Option<Uuid>,
) -> Result<bool> {
    let uniqueness = &table.uniqueness;
    if !uniqueness.is_enforced() {
        return Ok(false);
    }
    let value_of = |name: &str| {
        columns
            .iter()
            .find(|(column, _)| *column == name)
            .map(|(_, value)| value.clone())
    };

    let mut b = SqlBuilder::new(conn.get_database_backend());
    b.push("SELECT COUNT(*) AS count FROM ")
        .ident(table.table)
        .push(" t WHERE ")
        .scope("t", scope.tenant_id, scope.session_id)
        .push(" AND ")
        .column("t", "is_deleted")
        .push(" = ")
        .bind(false);

    if uniqueness.name
        && let Some(name_column) = table.name_column
        && let Some(name) = value_of(name_column)
    {
        // 名称忽略大小写
        b.push(" AND LOWER(")
            .column("t", name_column)
            .push(") = LOWER(")
            .bind(name)
            .push(")");
    }
    for column in uniqueness.columns {
        let value = value_of(column).unwrap_or_else(|| Option::<String>::None.into());
        b.push(" AND ").null_safe_eq("t", column, value);
    }
    if let Some(exclude_id) = exclude_id {
        b.push(" AND ").column("t", "id").push(" <> ").bind(exclude_id);
    }

    Ok(count(conn, b.build()).await? > 0)
}

pub(super) async fn reference_exists<C: ConnectionTrait>(
    conn: &C,
    ctx: &TenantContext,
    target: &MasterTable,
    id: Uuid,
) -> Result<bool> {
    let scope = ScopeFilter::resolve(ctx, target.scope)?;
    let mut b = SqlBuilder::new(conn.get_database_backend());
    b.push("SELECT COUNT(*) AS count FROM ")
        .ident(target.table)
        .push(" t");
    push_id_filter(&mut b, "t", scope, id);
    Ok(count(conn, b.build()).await? > 0)
}

pub(super) async fn dependents<C: ConnectionTrait>(
    conn: &C,
    ctx: &TenantContext,
    table: &MasterTable,
    id: Uuid,
) -> Result<Vec<Dependent>> {
    let mut found = Vec::new();
    for (dependent, column) in tables::dependents_of(table.table) {
        let mut b = SqlBuilder::new(conn.get_database_backend());
        b.push("SELECT COUNT(*) AS count FROM ")
            .ident(dependent.table)
            .push(" t WHERE ")
            .column("t", column)
            .push(" = ")
            .bind(id)
            .push(" AND ")
            .column("t", "tenant_id")
            .push(" = ")
            .bind(ctx.tenant_id)
            .push(" AND ")
            .column("t", "is_deleted")
            .push(" = ")
            .bind(false);
        let n = count(conn, b.build()).await?;
        if n > 0 {
            found.push(Dependent {
                label: dependent.label,
                count: n,
            });
        }
    }
    Ok(found)
}

impl SeaOrmStorage {
    pub async fn grid_master_impl(
        &self,
        ctx: &TenantContext,
        table: &'static MasterTable,
        request: &GridRequest,
    ) -> Result<GridPage> {
        let scope = ScopeFilter::resolve(ctx, table.scope)?;
        let stmts = build_grid_statements(self.db.get_database_backend(), table, scope, request);

        let total = count(&self.db, stmts.total).await?;
        let filtered = count(&self.db, stmts.filtered).await?;
        let rows = self.db.query_all_raw(stmts.page).await.map_err(|e| {
            SchoolAdminError::database_operation(format!("查询{}列表失败: {e}", table.label))
        })?;

        Ok(GridPage {
            total,
            filtered,
            rows,
        })
    }

    pub async fn find_master_impl(
        &self,
        ctx: &TenantContext,
        table: &'static MasterTable,
        id: Uuid,
    ) -> Result<Option<QueryResult>> {
        let scope = ScopeFilter::resolve(ctx, table.scope)?;
        find_row(&self.db, table, scope, id).await
    }

    pub async fn master_options_impl(
        &self,
        ctx: &TenantContext,
        table: &'static MasterTable,
    ) -> Result<Vec<OptionItem>> {
        if table.name_column.is_none() && table.option_label.is_empty() {
            return Err(SchoolAdminError::validation(format!(
                "{} has no selectable options",
                table.label
            )));
        }
        let scope = ScopeFilter::resolve(ctx, table.scope)?;
        let backend = self.db.get_database_backend();

        let mut b = SqlBuilder::new(backend);
        b.push("SELECT t.").ident("id").push(" AS id, ");
        match table.name_column {
            Some(name_column) => {
                b.column("t", name_column);
            }
            None => push_option_label(&mut b, backend, table.option_label),
        }
        b.push(" AS name FROM ").ident(table.table).push(" t");
        for (idx, part) in table.option_label.iter().enumerate() {
            let alias = format!("j{idx}");
            b.push(" LEFT JOIN ")
                .ident(part.table)
                .push(" ")
                .push(&alias)
                .push(" ON ")
                .column(&alias, "id")
                .push(" = ")
                .column("t", part.column);
        }
        b.push(" WHERE ")
            .scope("t", scope.tenant_id, scope.session_id)
            .push(" AND ")
            .column("t", "is_deleted")
            .push(" = ")
            .bind(false)
            .push(" AND ")
            .column("t", "is_active")
            .push(" = ")
            .bind(true)
            .push(" ORDER BY ");
        match table.name_column {
            Some(name_column) => {
                b.column("t", table.default_sort)
                    .push(" ASC, ")
                    .column("t", name_column)
                    .push(" ASC");
            }
            None => {
                b.push("name ASC, ").column("t", table.default_sort).push(" ASC");
            }
        }

        OptionItem::find_by_statement(b.build())
            .all(&self.db)
            .await
            .map_err(|e| {
                SchoolAdminError::database_operation(format!("查询{}选项失败: {e}", table.label))
            })
    }

    pub async fn insert_master_impl(
        &self,
        ctx: &TenantContext,
        table: &'static MasterTable,
        columns: Vec<(&'static str, Value)>,
    ) -> Result<Uuid> {
        let scope = ScopeFilter::resolve(ctx, table.scope)?;
        insert_row(&self.db, ctx, table, scope, columns).await
    }

    pub async fn update_master_impl(
        &self,
        ctx: &TenantContext,
        table: &'static MasterTable,
        id: Uuid,
        columns: Vec<(&'static str, Value)>,
    ) -> Result<bool> {
        let scope = ScopeFilter::resolve(ctx, table.scope)?;
        update_row(&self.db, ctx, table, scope, id, columns).await
    }

    pub async fn soft_delete_master_impl(
        &self,
        ctx: &TenantContext,
        table: &'static MasterTable,
        id: Uuid,
    ) -> Result<bool> {
        let scope = ScopeFilter::resolve(ctx, table.scope)?;
        soft_delete_row(&self.db, ctx, table, scope, id).await
    }

    pub async fn set_master_active_impl(
        &self,
        ctx: &TenantContext,
        table: &'static MasterTable,
        id: Uuid,
        active: bool,
    ) -> Result<bool> {
        let scope = ScopeFilter::resolve(ctx, table.scope)?;
        update_row(
            &self.db,
            ctx,
            table,
            scope,
            id,
            vec![("is_active", active.into())],
        )
        .await
    }

    pub async fn master_duplicate_exists_impl(
        &self,
        ctx: &TenantContext,
        table: &'static MasterTable,
        columns: &[(&'static str, Value)],
        exclude_id: Option<Uuid>,
    ) -> Result<bool> {
        let scope = ScopeFilter::resolve(ctx, table.scope)?;
        duplicate_exists(&self.db, table, scope, columns, exclude_id).await
    }

    pub async fn master_reference_exists_impl(
        &self,
        ctx: &TenantContext,
        target: &'static MasterTable,
        id: Uuid,
    ) -> Result<bool> {
        reference_exists(&self.db, ctx, target, id).await
    }

    pub async fn master_dependents_impl(
        &self,
        ctx: &TenantContext,
        table: &'static MasterTable,
        id: Uuid,
    ) -> Result<Vec<Dependent>> {
        dependents(&self.db, ctx, table, id).await
    }
}
