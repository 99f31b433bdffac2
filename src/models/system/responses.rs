use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct HealthResponse {
    pub status: String,      // 服务状态
    pub database: String,    // 数据库状态
    pub environment: String, // 运行环境
    pub version: String,     // 服务版本
    pub uptime_secs: i64,    // 运行时长
}
