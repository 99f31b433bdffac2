use sea_orm::FromQueryResult;
use serde::Serialize;
use ts_rs::TS;
use uuid::Uuid;

// 下拉框选项
#[derive(Debug, Clone, Serialize, FromQueryResult, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/common.ts")]
pub struct OptionItem {
    pub id: Uuid,
    pub name: String,
}
