use serde::Deserialize;
use ts_rs::TS;
use uuid::Uuid;

use super::entities::{DiscountType, FeeFrequency};
use crate::models::MonthFlags;
use crate::storage::MasterPayload;
use crate::utils::validate::{validate_name, validate_optional_text, validate_positive};

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fees.ts")]
pub struct FeeCategoryRequest {
    pub fee_name: String,
    pub frequency: FeeFrequency,
    #[serde(default)]
    pub sort_order: i32,
}

impl MasterPayload for FeeCategoryRequest {
    fn display_name(&self) -> String {
        self.fee_name.trim().to_string()
    }

    fn validate(&self) -> Result<(), String> {
        validate_name("Fee name", &self.fee_name)
    }

    fn columns(&self) -> Vec<(&'static str, sea_orm::Value)> {
        vec![
            ("fee_name", self.display_name().into()),
            ("frequency", self.frequency.as_str().into()),
            ("sort_order", self.sort_order.into()),
        ]
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fees.ts")]
pub struct FeeDiscountRequest {
    pub discount_name: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
}

impl MasterPayload for FeeDiscountRequest {
    fn display_name(&self) -> String {
        self.discount_name.trim().to_string()
    }

    fn validate(&self) -> Result<(), String> {
        validate_name("Discount name", &self.discount_name)?;
        validate_positive("Discount value", self.discount_value)?;
        if self.discount_type == DiscountType::Percentage && self.discount_value > 100.0 {
            return Err("Percentage discount cannot exceed 100".to_string());
        }
        Ok(())
    }

    fn columns(&self) -> Vec<(&'static str, sea_orm::Value)> {
        vec![
            ("discount_name", self.display_name().into()),
            ("discount_type", self.discount_type.as_str().into()),
            ("discount_value", self.discount_value.into()),
        ]
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fees.ts")]
pub struct FeeMapPlanRequest {
    pub fee_category_id: Uuid,
    pub class_id: Uuid,
    pub section_id: Option<Uuid>,
    pub amount: f64,
    #[serde(default)]
    pub months: MonthFlags,
}

impl MasterPayload for FeeMapPlanRequest {
    fn display_name(&self) -> String {
        format!("fee plan for category {}", self.fee_category_id)
    }

    fn validate(&self) -> Result<(), String> {
        validate_positive("Amount", self.amount)?;
        if self.months.is_empty() {
            return Err("At least one month must be selected".to_string());
        }
        Ok(())
    }

    fn columns(&self) -> Vec<(&'static str, sea_orm::Value)> {
        let mut columns = vec![
            ("fee_category_id", self.fee_category_id.into()),
            ("class_id", self.class_id.into()),
            ("section_id", self.section_id.into()),
            ("amount", self.amount.into()),
        ];
        columns.extend(self.months.columns());
        columns
    }

    fn references(&self) -> Vec<(&'static str, Uuid)> {
        let mut refs = vec![
            ("fee_category_id", self.fee_category_id),
            ("class_id", self.class_id),
        ];
        if let Some(section_id) = self.section_id {
            refs.push(("section_id", section_id));
        }
        refs
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fees.ts")]
pub struct FeeMapConcessionRequest {
    pub fee_map_plan_id: Uuid,
    pub student_id: Uuid,
    pub fee_discount_id: Uuid,
    pub remarks: Option<String>,
}

impl MasterPayload for FeeMapConcessionRequest {
    fn display_name(&self) -> String {
        format!("concession for student {}", self.student_id)
    }

    fn validate(&self) -> Result<(), String> {
        validate_optional_text("Remarks", self.remarks.as_deref(), 250)
    }

    fn columns(&self) -> Vec<(&'static str, sea_orm::Value)> {
        vec![
            ("fee_map_plan_id", self.fee_map_plan_id.into()),
            ("student_id", self.student_id.into()),
            ("fee_discount_id", self.fee_discount_id.into()),
            ("remarks", self.remarks.clone().into()),
        ]
    }

    fn references(&self) -> Vec<(&'static str, Uuid)> {
        vec![
            ("fee_map_plan_id", self.fee_map_plan_id),
            ("student_id", self.student_id),
            ("fee_discount_id", self.fee_discount_id),
        ]
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fees.ts")]
pub struct PaymentRequest {
    pub amount: f64,
}

impl PaymentRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_positive("Payment amount", self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_validation() {
        let mut req = FeeDiscountRequest {
            discount_name: "Sibling".into(),
            discount_type: DiscountType::Percentage,
            discount_value: 120.0,
        };
        assert!(req.validate().is_err());

        req.discount_type = DiscountType::Amount;
        assert!(req.validate().is_ok());

        req.discount_value = 0.0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_plan_requires_months_and_amount() {
        let mut req = FeeMapPlanRequest {
            fee_category_id: Uuid::new_v4(),
            class_id: Uuid::new_v4(),
            section_id: None,
            amount: 1200.0,
            months: MonthFlags::default(),
        };
        assert!(req.validate().is_err());

        req.months.apr = true;
        assert!(req.validate().is_ok());
        assert_eq!(req.references().len(), 2);

        req.amount = 0.0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_frequency_from_json() {
        let req: FeeCategoryRequest = serde_json::from_value(serde_json::json!({
            "fee_name": "Admission",
            "frequency": "one_time"
        }))
        .unwrap();
        assert_eq!(req.frequency, FeeFrequency::OneTime);
        assert_eq!(req.sort_order, 0);
    }
}
