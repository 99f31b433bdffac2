use sea_orm::FromQueryResult;
use serde::Serialize;
use ts_rs::TS;
use uuid::Uuid;

/// 学生收费明细（含收费项目名称与余额）
#[derive(Debug, Clone, Serialize, FromQueryResult, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fees.ts")]
pub struct StudentLedgerRow {
    pub id: Uuid,
    pub fee_map_plan_id: Uuid,
    pub fee_category_id: Uuid,
    pub fee_name: String,
    pub fee_month: i32,
    pub amount: f64,
    pub concession: f64,
    pub paid_amount: f64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fees.ts")]
pub struct StudentLedgerItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub row: StudentLedgerRow,
    pub balance: f64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fees.ts")]
pub struct StudentLedgerResponse {
    pub student_id: Uuid,
    pub items: Vec<StudentLedgerItem>,
    pub total_amount: f64,
    pub total_concession: f64,
    pub total_paid: f64,
    pub total_balance: f64,
}
