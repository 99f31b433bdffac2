use sea_orm::FromQueryResult;
use serde::Serialize;
use ts_rs::TS;
use uuid::Uuid;

/// 构建部门树所需的最小字段
#[derive(Debug, Clone, FromQueryResult)]
pub struct DepartmentNodeRow {
    pub id: Uuid,
    pub department_name: String,
    pub department_code: Option<String>,
    pub parent_dept_id: Option<Uuid>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/hr.ts")]
pub struct DepartmentNode {
    pub id: Uuid,
    pub department_name: String,
    pub department_code: Option<String>,
    pub parent_dept_id: Option<Uuid>,
    pub is_active: bool,
    pub children: Vec<DepartmentNode>,
}
