//! 表格分页查询
//!
//! 生成三条语句：当前页（`ROW_NUMBER()` 窗口 CTE）、总数、过滤后总数。

use sea_orm::{DbBackend, FromQueryResult, Statement};

use super::sql::SqlBuilder;
use crate::models::GridRequest;
use crate::storage::{MasterTable, ScopeFilter};
use crate::utils::contains_pattern;

#[derive(Debug, FromQueryResult)]
pub(crate) struct CountRow {
    pub count: i64,
}

pub(crate) struct GridStatements {
    pub page: Statement,
    pub total: Statement,
    pub filtered: Statement,
}

/// 作用域 + 未删除 + 可选搜索条件
fn push_filters(
    b: &mut SqlBuilder,
    table: &MasterTable,
    scope: ScopeFilter,
    search: Option<&str>,
) {
    b.push(" WHERE ")
        .scope("t", scope.tenant_id, scope.session_id)
        .push(" AND ")
        .column("t", "is_deleted")
        .push(" = ")
        .bind(false);

    let Some(search) = search else {
        return;
    };
    let pattern = contains_pattern(search);
    let mut first = true;
    for column in table.searchable_columns() {
        b.push(if first { " AND (" } else { " OR " })
            .push("LOWER(")
            .column("t", column)
            .push(") LIKE ")
            .bind(pattern.clone())
            .push(" ESCAPE '!'");
        first = false;
    }
    if !first {
        b.push(")");
    }
}

fn count_statement(
    backend: DbBackend,
    table: &MasterTable,
    scope: ScopeFilter,
    search: Option<&str>,
) -> Statement {
    let mut b = SqlBuilder::new(backend);
    b.push("SELECT COUNT(*) AS count FROM ")
        .ident(table.table)
        .push(" t");
    push_filters(&mut b, table, scope, search);
    b.build()
}

pub(crate) fn build_grid_statements(
    backend: DbBackend,
    table: &MasterTable,
    scope: ScopeFilter,
    request: &GridRequest,
) -> GridStatements {
    let search = request.search.as_deref();
    let sort_column = request
        .order_column
        .as_deref()
        .and_then(|c| table.sortable_column(c))
        .unwrap_or(table.default_sort);

    let mut b = SqlBuilder::new(backend);
    b.push("WITH grid AS (SELECT ROW_NUMBER() OVER (ORDER BY ")
        .column("t", sort_column)
        .push(" ")
        .push(request.order_dir.as_sql())
        .push(", ")
        .column("t", "id")
        .push(" ASC) AS row_num, t.* FROM ")
        .ident(table.table)
        .push(" t");
    push_filters(&mut b, table, scope, search);
    b.push(") SELECT * FROM grid WHERE row_num > ")
        .bind(request.start as i64)
        .push(" AND row_num <= ")
        .bind(request.end() as i64)
        .push(" ORDER BY row_num");

    GridStatements {
        page: b.build(),
        total: count_statement(backend, table, scope, None),
        filtered: count_statement(backend, table, scope, search),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SortDirection;
    use crate::storage::tables;
    use uuid::Uuid;

    fn scope(session: bool) -> ScopeFilter {
        ScopeFilter {
            tenant_id: Uuid::new_v4(),
            session_id: session.then(Uuid::new_v4),
        }
    }

    fn request(order: Option<&str>, search: Option<&str>) -> GridRequest {
        GridRequest {
            draw: 1,
            start: 10,
            length: 10,
            search: search.map(str::to_string),
            order_column: order.map(str::to_string),
            order_dir: SortDirection::Desc,
        }
    }

    #[test]
    fn test_page_statement_shape() {
        let stmts = build_grid_statements(
            DbBackend::Sqlite,
            &tables::CLASSES,
            scope(true),
            &request(Some("class_name"), None),
        );
        assert_eq!(
            stmts.page.sql,
            concat!(
                r#"WITH grid AS (SELECT ROW_NUMBER() OVER (ORDER BY t."class_name" DESC, t."id" ASC) AS row_num, t.* "#,
                r#"FROM "classes" t WHERE t."tenant_id" = ? AND t."session_id" = ? AND t."is_deleted" = ?) "#,
                "SELECT * FROM grid WHERE row_num > ? AND row_num <= ? ORDER BY row_num"
            )
        );
        assert_eq!(stmts.page.values.map(|v| v.0.len()), Some(5));
    }

    #[test]
    fn test_unknown_sort_column_falls_back() {
        let stmts = build_grid_statements(
            DbBackend::Sqlite,
            &tables::CLASSES,
            scope(true),
            &request(Some("tenant_id; DROP TABLE classes"), None),
        );
        assert!(stmts.page.sql.contains(r#"ORDER BY t."sort_order" DESC"#));
        assert!(!stmts.page.sql.contains("DROP"));
    }

    #[test]
    fn test_search_only_in_filtered_count() {
        let stmts = build_grid_statements(
            DbBackend::Postgres,
            &tables::HOSTELS,
            scope(false),
            &request(None, Some("Boy_s")),
        );
        assert!(!stmts.total.sql.contains("LIKE"));
        assert!(
            stmts
                .filtered
                .sql
                .contains(r#"AND (LOWER(t."hostel_name") LIKE $3 ESCAPE '!' OR "#)
        );
        assert!(!stmts.filtered.sql.contains("session_id"));
        // 三个可搜索列 + 租户 + 删除标记
        assert_eq!(stmts.filtered.values.map(|v| v.0.len()), Some(5));
    }

    #[test]
    fn test_search_ignored_without_searchable_columns() {
        let stmts = build_grid_statements(
            DbBackend::Sqlite,
            &tables::FEE_MAP_PLANS,
            scope(true),
            &request(None, Some("x")),
        );
        assert!(!stmts.filtered.sql.contains("LIKE"));
    }
}
