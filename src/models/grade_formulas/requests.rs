use std::collections::HashSet;

use serde::Deserialize;
use ts_rs::TS;

use super::entities::GradeComponent;

const WEIGHTAGE_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade_formulas.ts")]
pub struct ReplaceGradeFormulasRequest {
    pub components: Vec<GradeComponent>,
}

impl ReplaceGradeFormulasRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.components.is_empty() {
            return Err("At least one grade component is required".to_string());
        }

        let mut codes = HashSet::new();
        let mut total = 0.0;
        for component in &self.components {
            let code = component.component_code.trim();
            if code.is_empty() || code.len() > 20 {
                return Err("Component code must be 1-20 characters".to_string());
            }
            if component.component_name.trim().is_empty() {
                return Err(format!("Component name is required for {code}"));
            }
            if !codes.insert(code.to_ascii_uppercase()) {
                return Err(format!("Duplicate component code: {code}"));
            }
            if !component.weightage.is_finite() || component.weightage < 0.0 {
                return Err(format!("Weightage for {code} must be zero or greater"));
            }
            if !component.max_marks.is_finite() || component.max_marks <= 0.0 {
                return Err(format!("Max marks for {code} must be greater than zero"));
            }
            total += component.weightage;
        }

        if (total - 100.0).abs() > WEIGHTAGE_TOLERANCE {
            return Err(format!("Weightages must add up to 100, got {total}"));
        }
        Ok(())
    }

    /// 统一编码为大写并去除空白
    pub fn normalized(&self) -> Vec<GradeComponent> {
        self.components
            .iter()
            .map(|c| GradeComponent {
                component_code: c.component_code.trim().to_ascii_uppercase(),
                component_name: c.component_name.trim().to_string(),
                weightage: c.weightage,
                max_marks: c.max_marks,
                sort_order: c.sort_order,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::grade_formulas::entities::builtin_defaults;

    #[test]
    fn test_builtin_defaults_are_valid() {
        let req = ReplaceGradeFormulasRequest {
            components: builtin_defaults(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_weightage_must_sum_to_100() {
        let req = ReplaceGradeFormulasRequest {
            components: vec![
                GradeComponent::new("PT", "Periodic Test", 20.0, 50.0, 1),
                GradeComponent::new("HY", "Half Yearly", 79.0, 100.0, 2),
            ],
        };
        assert!(req.validate().is_err());

        let req = ReplaceGradeFormulasRequest {
            components: vec![
                GradeComponent::new("PT", "Periodic Test", 33.333, 50.0, 1),
                GradeComponent::new("NB", "Notebook", 33.333, 50.0, 2),
                GradeComponent::new("HY", "Half Yearly", 33.334, 100.0, 3),
            ],
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_duplicate_codes_case_insensitive() {
        let req = ReplaceGradeFormulasRequest {
            components: vec![
                GradeComponent::new("pt", "Periodic Test", 50.0, 50.0, 1),
                GradeComponent::new("PT", "Periodic Test 2", 50.0, 50.0, 2),
            ],
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_max_marks_positive() {
        let req = ReplaceGradeFormulasRequest {
            components: vec![GradeComponent::new("HY", "Half Yearly", 100.0, 0.0, 1)],
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_normalized_uppercases_codes() {
        let req = ReplaceGradeFormulasRequest {
            components: vec![GradeComponent::new(" hy ", " Half Yearly ", 100.0, 80.0, 1)],
        };
        let normalized = req.normalized();
        assert_eq!(normalized[0].component_code, "HY");
        assert_eq!(normalized[0].component_name, "Half Yearly");
    }
}
