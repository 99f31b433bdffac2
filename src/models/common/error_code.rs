use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1xxx
    BadRequest = 1000,
    ValidationFailed = 1001,
    Unauthorized = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    SessionRequired = 1005,
    InternalServerError = 1099,

    // 主数据错误 2xxx
    DuplicateRecord = 2001,
    RecordInUse = 2002,
    CircularReference = 2003,
    ReferenceNotFound = 2004,

    // 收费错误 3xxx
    FeeAlreadySettled = 3001,

    // 报表错误 4xxx
    ReportGenerationFailed = 4001,
}
