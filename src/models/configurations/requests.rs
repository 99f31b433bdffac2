use serde::Deserialize;
use ts_rs::TS;

use super::entities::KnownConfigKey;
use crate::storage::MasterPayload;
use crate::utils::validate::{validate_config_key, validate_optional_text};

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/configurations.ts")]
pub struct ConfigurationRequest {
    pub config_key: String,
    pub config_value: String,
    pub description: Option<String>,
}

impl MasterPayload for ConfigurationRequest {
    fn display_name(&self) -> String {
        self.config_key.trim().to_string()
    }

    fn validate(&self) -> Result<(), String> {
        validate_config_key(self.config_key.trim())?;
        validate_optional_text("Description", self.description.as_deref(), 250)?;
        validate_known_value(self.config_key.trim(), &self.config_value)
    }

    fn columns(&self) -> Vec<(&'static str, sea_orm::Value)> {
        vec![
            ("config_key", self.display_name().into()),
            ("config_value", self.config_value.clone().into()),
            ("description", self.description.clone().into()),
        ]
    }
}

/// 已知键需要满足各自的取值格式，其余键不做限制
pub fn validate_known_value(key: &str, value: &str) -> Result<(), String> {
    match key.parse::<KnownConfigKey>() {
        Ok(known) => known.validate_value(value),
        Err(_) => Ok(()),
    }
}

/// 按键写入配置值
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/configurations.ts")]
pub struct ConfigurationValueRequest {
    pub config_value: String,
    pub description: Option<String>,
}

impl ConfigurationValueRequest {
    pub fn validate(&self, key: &str) -> Result<(), String> {
        validate_config_key(key)?;
        validate_optional_text("Description", self.description.as_deref(), 250)?;
        validate_known_value(key, &self.config_value)
    }
}
