//! 部门树存储操作

use sea_orm::{ConnectionTrait, FromQueryResult};
use uuid::Uuid;

use super::SeaOrmStorage;
use super::master::count;
use super::sql::SqlBuilder;
use crate::errors::{Result, SchoolAdminError};
use crate::models::{TenantContext, hr::responses::DepartmentNodeRow};

/// 向上追溯的最大层级
const MAX_DEPTH: i32 = 64;

impl SeaOrmStorage {
    /// 检查把 `parent_id` 设为 `id` 的上级部门是否会形成环
    pub async fn department_creates_cycle_impl(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        parent_id: Uuid,
    ) -> Result<bool> {
        if id == parent_id {
            return Ok(true);
        }

        // 从 parent 开始沿 parent_dept_id 向上走，遇到 id 即为环
        let mut b = SqlBuilder::new(self.db.get_database_backend());
        b.push("WITH RECURSIVE ancestors (id, parent_dept_id, depth) AS (SELECT d.")
            .ident("id")
            .push(", d.")
            .ident("parent_dept_id")
            .push(", 1 FROM ")
            .ident("departments")
            .push(" d WHERE ")
            .column("d", "id")
            .push(" = ")
            .bind(parent_id)
            .push(" AND ")
            .column("d", "tenant_id")
            .push(" = ")
            .bind(ctx.tenant_id)
            .push(" UNION ALL SELECT p.")
            .ident("id")
            .push(", p.")
            .ident("parent_dept_id")
            .push(", a.depth + 1 FROM ")
            .ident("departments")
            .push(" p JOIN ancestors a ON ")
            .column("p", "id")
            .push(" = a.parent_dept_id WHERE ")
            .column("p", "tenant_id")
            .push(" = ")
            .bind(ctx.tenant_id)
            .push(" AND a.depth < ")
            .bind(MAX_DEPTH)
            .push(") SELECT COUNT(*) AS count FROM ancestors WHERE id = ")
            .bind(id);

        Ok(count(&self.db, b.build()).await? > 0)
    }

    pub async fn list_department_nodes_impl(
        &self,
        ctx: &TenantContext,
    ) -> Result<Vec<DepartmentNodeRow>> {
        let mut b = SqlBuilder::new(self.db.get_database_backend());
        b.push("SELECT t.* FROM ")
            .ident("departments")
            .push(" t WHERE ")
            .scope("t", ctx.tenant_id, None)
            .push(" AND ")
            .column("t", "is_deleted")
            .push(" = ")
            .bind(false)
            .push(" ORDER BY ")
            .column("t", "department_name")
            .push(" ASC");

        DepartmentNodeRow::find_by_statement(b.build())
            .all(&self.db)
            .await
            .map_err(|e| SchoolAdminError::database_operation(format!("查询部门失败: {e}")))
    }
}
