use serde::Deserialize;
use ts_rs::TS;
use uuid::Uuid;

use crate::models::common::months::is_valid_month;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/reports.ts")]
pub struct FeeDefaulterQuery {
    pub class_id: Option<Uuid>,
    pub section_id: Option<Uuid>,
    // 统计截至的月份（1-12）
    pub month: i32,
}

impl FeeDefaulterQuery {
    pub fn validate(&self) -> Result<(), String> {
        if !is_valid_month(self.month) {
            return Err("Month must be between 1 and 12".to_string());
        }
        if self.section_id.is_some() && self.class_id.is_none() {
            return Err("Section filter requires a class".to_string());
        }
        Ok(())
    }
}
