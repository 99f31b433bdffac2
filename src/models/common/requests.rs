use serde::Deserialize;
use ts_rs::TS;

// 启用/停用
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/common.ts")]
pub struct SetActiveRequest {
    pub is_active: bool,
}
