use serde::Deserialize;
use ts_rs::TS;
use uuid::Uuid;

use crate::storage::MasterPayload;
use crate::utils::validate::{validate_name, validate_optional_text};

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/hr.ts")]
pub struct DepartmentRequest {
    pub department_name: String,
    pub department_code: Option<String>,
    pub parent_dept_id: Option<Uuid>,
}

impl MasterPayload for DepartmentRequest {
    fn display_name(&self) -> String {
        self.department_name.trim().to_string()
    }

    fn validate(&self) -> Result<(), String> {
        validate_name("Department name", &self.department_name)?;
        validate_optional_text("Department code", self.department_code.as_deref(), 20)
    }

    fn columns(&self) -> Vec<(&'static str, sea_orm::Value)> {
        vec![
            ("department_name", self.display_name().into()),
            ("department_code", self.department_code.clone().into()),
            ("parent_dept_id", self.parent_dept_id.into()),
        ]
    }

    fn references(&self) -> Vec<(&'static str, Uuid)> {
        self.parent_dept_id
            .map(|id| vec![("parent_dept_id", id)])
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/hr.ts")]
pub struct DesignationRequest {
    pub designation_name: String,
    pub department_id: Option<Uuid>,
    #[serde(default)]
    pub sort_order: i32,
}

impl MasterPayload for DesignationRequest {
    fn display_name(&self) -> String {
        self.designation_name.trim().to_string()
    }

    fn validate(&self) -> Result<(), String> {
        validate_name("Designation name", &self.designation_name)
    }

    fn columns(&self) -> Vec<(&'static str, sea_orm::Value)> {
        vec![
            ("designation_name", self.display_name().into()),
            ("department_id", self.department_id.into()),
            ("sort_order", self.sort_order.into()),
        ]
    }

    fn references(&self) -> Vec<(&'static str, Uuid)> {
        self.department_id
            .map(|id| vec![("department_id", id)])
            .unwrap_or_default()
    }
}
