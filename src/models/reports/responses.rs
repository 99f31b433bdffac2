use sea_orm::FromQueryResult;
use serde::Serialize;
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromQueryResult, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/reports.ts")]
pub struct FeeDefaulterRow {
    pub student_id: Uuid,
    pub admission_no: String,
    pub student_name: String,
    pub class_name: String,
    pub section_name: Option<String>,
    pub total_amount: f64,
    pub total_concession: f64,
    pub total_paid: f64,
}

impl FeeDefaulterRow {
    pub fn balance(&self) -> f64 {
        crate::models::fees::entities::round2(
            self.total_amount - self.total_concession - self.total_paid,
        )
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/reports.ts")]
pub struct FeeDefaulter {
    #[serde(flatten)]
    #[ts(flatten)]
    pub row: FeeDefaulterRow,
    pub balance: f64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/reports.ts")]
pub struct FeeDefaulterReport {
    pub through_month: i32,
    // 参与统计的月份（学年顺序）
    pub months: Vec<i32>,
    pub items: Vec<FeeDefaulter>,
    pub total_balance: f64,
}
