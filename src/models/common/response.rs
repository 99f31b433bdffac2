//! JSON 响应信封
//!
//! 除表格查询（DataTables 直接读取 `draw` / `recordsTotal`）和 XLSX 导出外，
//! 所有 `/api/v1` 接口都返回 `{ code, message, data?, timestamp }`。
//! `code` 为 [`ErrorCode`]，成功时为 0；`data` 为空时不输出该字段。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::ErrorCode;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: DateTime<Utc>,
}

impl<T: TS> ApiResponse<T> {
    fn build(code: ErrorCode, data: Option<T>, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data,
            timestamp: Utc::now(),
        }
    }

    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self::build(ErrorCode::Success, Some(data), message)
    }

    /// 失败但仍需带回数据，例如健康检查的明细
    pub fn error(code: ErrorCode, data: T, message: impl Into<String>) -> Self {
        Self::build(code, Some(data), message)
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self::build(ErrorCode::Success, None, message)
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::build(code, None, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_envelope_omits_data() {
        let resp = ApiResponse::error_empty(ErrorCode::RecordInUse, "Class is referenced");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["code"], ErrorCode::RecordInUse as i32);
        assert_eq!(json["message"], "Class is referenced");
        assert!(json.get("data").is_none());
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_error_keeps_payload() {
        let resp = ApiResponse::error(ErrorCode::InternalServerError, 7u32, "degraded");
        assert_eq!(resp.code, ErrorCode::InternalServerError as i32);
        assert_eq!(resp.data, Some(7));

        let ok = ApiResponse::success("VI".to_string(), "Class retrieved successfully");
        assert_eq!(ok.code, 0);
        assert_eq!(ok.data.as_deref(), Some("VI"));
    }
}
