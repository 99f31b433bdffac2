pub mod academics;
pub mod common;
pub mod configurations;
pub mod fees;
pub mod grade_formulas;
pub mod hr;
pub mod reports;
pub mod system;
pub mod transport;

pub use common::{
    AcademicSession, ApiResponse, ErrorCode, GridRequest, GridResponse, MonthFlags, OptionItem,
    SetActiveRequest, SortDirection, StaffRole, TenantContext,
};

// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
