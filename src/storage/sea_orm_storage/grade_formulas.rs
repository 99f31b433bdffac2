//! 成绩公式存储操作

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use super::SeaOrmStorage;
use crate::entity::grade_formulas::{ActiveModel, Column, Entity as GradeFormulas};
use crate::errors::{Result, SchoolAdminError};
use crate::models::{TenantContext, grade_formulas::entities::GradeComponent};

impl SeaOrmStorage {
    pub async fn list_grade_formulas_impl(
        &self,
        ctx: &TenantContext,
        class_id: Uuid,
    ) -> Result<Vec<GradeComponent>> {
        let session = ctx.require_session()?;

        let rows = GradeFormulas::find()
            .filter(Column::TenantId.eq(ctx.tenant_id))
            .filter(Column::SessionId.eq(session.session_id))
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::SortOrder)
            .order_by_asc(Column::ComponentCode)
            .all(&self.db)
            .await
            .map_err(|e| SchoolAdminError::database_operation(format!("查询成绩公式失败: {e}")))?;

        Ok(rows.into_iter().map(|row| row.into_component()).collect())
    }

    /// 以提交的组成项整体替换班级公式：同编码更新，新编码插入，缺失编码删除
    pub async fn replace_grade_formulas_impl(
        &self,
        ctx: &TenantContext,
        class_id: Uuid,
        components: Vec<GradeComponent>,
    ) -> Result<()> {
        let session_id = ctx.require_session()?.session_id;
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolAdminError::database_operation(format!("开启事务失败: {e}")))?;

        let mut existing: HashMap<String, _> = GradeFormulas::find()
            .filter(Column::TenantId.eq(ctx.tenant_id))
            .filter(Column::SessionId.eq(session_id))
            .filter(Column::ClassId.eq(class_id))
            .all(&txn)
            .await
            .map_err(|e| SchoolAdminError::database_operation(format!("查询成绩公式失败: {e}")))?
            .into_iter()
            .map(|row| (row.component_code.to_ascii_uppercase(), row))
            .collect();

        for component in components {
            let code = component.component_code.to_ascii_uppercase();
            match existing.remove(&code) {
                Some(row) => {
                    let mut model: ActiveModel = row.into();
                    model.component_name = Set(component.component_name);
                    model.weightage = Set(component.weightage);
                    model.max_marks = Set(component.max_marks);
                    model.sort_order = Set(component.sort_order);
                    model.modified_by = Set(Some(ctx.user_id));
                    model.modified_date = Set(Some(now));
                    model.update(&txn).await.map_err(|e| {
                        SchoolAdminError::database_operation(format!("更新成绩公式失败: {e}"))
                    })?;
                }
                None => {
                    let model = ActiveModel {
                        id: Set(Uuid::new_v4()),
                        tenant_id: Set(ctx.tenant_id),
                        session_id: Set(session_id),
                        class_id: Set(class_id),
                        component_code: Set(code),
                        component_name: Set(component.component_name),
                        weightage: Set(component.weightage),
                        max_marks: Set(component.max_marks),
                        sort_order: Set(component.sort_order),
                        created_by: Set(ctx.user_id),
                        created_date: Set(now),
                        modified_by: Set(None),
                        modified_date: Set(None),
                    };
                    model.insert(&txn).await.map_err(|e| {
                        SchoolAdminError::database_operation(format!("新增成绩公式失败: {e}"))
                    })?;
                }
            }
        }

        let stale: Vec<Uuid> = existing.into_values().map(|row| row.id).collect();
        if !stale.is_empty() {
            GradeFormulas::delete_many()
                .filter(Column::Id.is_in(stale))
                .exec(&txn)
                .await
                .map_err(|e| {
                    SchoolAdminError::database_operation(format!("删除成绩公式失败: {e}"))
                })?;
        }

        txn.commit()
            .await
            .map_err(|e| SchoolAdminError::database_operation(format!("提交事务失败: {e}")))?;
        Ok(())
    }
}
