//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_school_admin_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum SchoolAdminError {
            $($variant(String),)*
        }

        impl SchoolAdminError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(SchoolAdminError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(SchoolAdminError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(SchoolAdminError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl SchoolAdminError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        SchoolAdminError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_school_admin_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    Duplicate("E010", "Duplicate Record"),
    InUse("E011", "Record In Use"),
    CircularReference("E012", "Circular Reference"),
    Report("E013", "Report Generation Error"),
    Authentication("E014", "Authentication Error"),
    Authorization("E015", "Authorization Error"),
    SessionRequired("E016", "Academic Session Required"),
    InvalidReference("E017", "Invalid Reference"),
}

impl SchoolAdminError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for SchoolAdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SchoolAdminError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for SchoolAdminError {
    fn from(err: sea_orm::DbErr) -> Self {
        SchoolAdminError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for SchoolAdminError {
    fn from(err: std::io::Error) -> Self {
        SchoolAdminError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for SchoolAdminError {
    fn from(err: serde_json::Error) -> Self {
        SchoolAdminError::Serialization(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for SchoolAdminError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        SchoolAdminError::Report(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SchoolAdminError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchoolAdminError::cache_connection("test").code(), "E001");
        assert_eq!(SchoolAdminError::database_config("test").code(), "E003");
        assert_eq!(SchoolAdminError::validation("test").code(), "E007");
        assert_eq!(SchoolAdminError::duplicate("test").code(), "E010");
        assert_eq!(SchoolAdminError::circular_reference("test").code(), "E012");
        assert_eq!(SchoolAdminError::authorization("test").code(), "E015");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            SchoolAdminError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            SchoolAdminError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = SchoolAdminError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = SchoolAdminError::duplicate("Class 'VI' already exists");
        let formatted = err.format_simple();
        assert!(formatted.contains("Duplicate Record"));
        assert!(formatted.contains("Class 'VI' already exists"));
    }

    #[test]
    fn test_db_error_conversion() {
        let err: SchoolAdminError = sea_orm::DbErr::Custom("boom".into()).into();
        assert_eq!(err.code(), "E005");
        assert!(err.message().contains("boom"));
    }
}
