use sea_orm::FromQueryResult;
use serde::Serialize;
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromQueryResult, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/hr.ts")]
pub struct Department {
    pub id: Uuid,
    pub department_name: String,
    pub department_code: Option<String>,
    // 上级部门
    pub parent_dept_id: Option<Uuid>,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_date: i64,
    pub modified_by: Option<Uuid>,
    pub modified_date: Option<i64>,
}

#[derive(Debug, Clone, Serialize, FromQueryResult, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/hr.ts")]
pub struct Designation {
    pub id: Uuid,
    pub designation_name: String,
    pub department_id: Option<Uuid>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_date: i64,
    pub modified_by: Option<Uuid>,
    pub modified_date: Option<i64>,
}
