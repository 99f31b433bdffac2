pub mod error_code;
pub mod grid;
pub mod months;
pub mod options;
pub mod requests;
pub mod response;
pub mod tenant;

pub use error_code::ErrorCode;
pub use grid::{GridRequest, GridResponse, SortDirection};
pub use months::MonthFlags;
pub use options::OptionItem;
pub use requests::SetActiveRequest;
pub use response::ApiResponse;
pub use tenant::{AcademicSession, StaffRole, TenantContext};
