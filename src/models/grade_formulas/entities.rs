use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// 成绩组成项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade_formulas.ts")]
pub struct GradeComponent {
    pub component_code: String,
    pub component_name: String,
    pub weightage: f64,
    pub max_marks: f64,
    #[serde(default)]
    pub sort_order: i32,
}

impl GradeComponent {
    pub fn new(code: &str, name: &str, weightage: f64, max_marks: f64, sort_order: i32) -> Self {
        Self {
            component_code: code.to_string(),
            component_name: name.to_string(),
            weightage,
            max_marks,
            sort_order,
        }
    }
}

/// 内置默认组成：PT 10 / NB 5 / SEA 5 / HY 80，满分均为 100
pub fn builtin_defaults() -> Vec<GradeComponent> {
    vec![
        GradeComponent::new("PT", "Periodic Test", 10.0, 100.0, 1),
        GradeComponent::new("NB", "Notebook Submission", 5.0, 100.0, 2),
        GradeComponent::new("SEA", "Subject Enrichment Activity", 5.0, 100.0, 3),
        GradeComponent::new("HY", "Half Yearly Examination", 80.0, 100.0, 4),
    ]
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade_formulas.ts")]
pub struct GradeFormulaItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub component: GradeComponent,
    // 是否来自已保存的数据
    pub is_saved: bool,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade_formulas.ts")]
pub struct GradeFormulaResponse {
    pub class_id: Uuid,
    pub items: Vec<GradeFormulaItem>,
    pub total_weightage: f64,
}
