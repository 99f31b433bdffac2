use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// 服务自身读取的配置键
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownConfigKey {
    /// 学年起始月份（1-12）
    SessionStartMonth,
    /// 成绩公式默认组成（JSON 数组）
    GradeFormulaDefaults,
}

impl KnownConfigKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownConfigKey::SessionStartMonth => "session.start_month",
            KnownConfigKey::GradeFormulaDefaults => "grade.formula.defaults",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![
            KnownConfigKey::SessionStartMonth,
            KnownConfigKey::GradeFormulaDefaults,
        ]
    }

    /// 校验已知键的取值格式
    pub fn validate_value(&self, value: &str) -> Result<(), String> {
        match self {
            KnownConfigKey::SessionStartMonth => match value.trim().parse::<i32>() {
                Ok(month) if (1..=12).contains(&month) => Ok(()),
                _ => Err(format!("{} must be a month between 1 and 12", self.as_str())),
            },
            KnownConfigKey::GradeFormulaDefaults => {
                serde_json::from_str::<Vec<crate::models::grade_formulas::entities::GradeComponent>>(
                    value,
                )
                .map(|_| ())
                .map_err(|e| format!("{} must be a JSON array of components: {e}", self.as_str()))
            }
        }
    }
}

impl std::str::FromStr for KnownConfigKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "session.start_month" => Ok(KnownConfigKey::SessionStartMonth),
            "grade.formula.defaults" => Ok(KnownConfigKey::GradeFormulaDefaults),
            _ => Err(format!("Unknown configuration key: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromQueryResult, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/configurations.ts")]
pub struct Configuration {
    pub id: Uuid,
    pub config_key: String,
    pub config_value: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_date: i64,
    pub modified_by: Option<Uuid>,
    pub modified_date: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/configurations.ts")]
pub struct ConfigurationValue {
    pub config_key: String,
    pub config_value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_keys_round_trip() {
        for key in KnownConfigKey::all() {
            assert_eq!(key.as_str().parse::<KnownConfigKey>().unwrap(), key);
        }
        assert!("app.name".parse::<KnownConfigKey>().is_err());
    }

    #[test]
    fn test_validate_known_values() {
        let month = KnownConfigKey::SessionStartMonth;
        assert!(month.validate_value("6").is_ok());
        assert!(month.validate_value("13").is_err());
        assert!(month.validate_value("june").is_err());

        let defaults = KnownConfigKey::GradeFormulaDefaults;
        assert!(
            defaults
                .validate_value(
                    r#"[{"component_code":"UT","component_name":"Unit Test","weightage":100,"max_marks":25}]"#
                )
                .is_ok()
        );
        assert!(defaults.validate_value("{}").is_err());
    }
}
