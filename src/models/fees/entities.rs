use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::models::MonthFlags;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/fees.ts")]
pub enum FeeFrequency {
    Monthly,
    Quarterly,
    Annual,
    OneTime,
}

impl FeeFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeeFrequency::Monthly => "monthly",
            FeeFrequency::Quarterly => "quarterly",
            FeeFrequency::Annual => "annual",
            FeeFrequency::OneTime => "one_time",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/fees.ts")]
pub enum DiscountType {
    Percentage,
    Amount,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::Amount => "amount",
        }
    }

    /// 对单月应收金额计算减免额
    pub fn concession_for(&self, value: f64, amount: f64) -> f64 {
        match self {
            DiscountType::Percentage => round2(amount * value / 100.0),
            DiscountType::Amount => value.min(amount),
        }
    }
}

impl std::str::FromStr for DiscountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(DiscountType::Percentage),
            "amount" => Ok(DiscountType::Amount),
            _ => Err(format!("Invalid discount type: {s}")),
        }
    }
}

/// 保留两位小数（四舍五入）
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Serialize, FromQueryResult, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fees.ts")]
pub struct FeeCategory {
    pub id: Uuid,
    pub fee_name: String,
    pub frequency: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_date: i64,
    pub modified_by: Option<Uuid>,
    pub modified_date: Option<i64>,
}

#[derive(Debug, Clone, Serialize, FromQueryResult, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fees.ts")]
pub struct FeeDiscount {
    pub id: Uuid,
    pub discount_name: String,
    pub discount_type: String,
    pub discount_value: f64,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_date: i64,
    pub modified_by: Option<Uuid>,
    pub modified_date: Option<i64>,
}

#[derive(Debug, Clone, Serialize, FromQueryResult, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fees.ts")]
pub struct FeeMapPlan {
    pub id: Uuid,
    pub fee_category_id: Uuid,
    pub class_id: Uuid,
    // 为空表示整个班级
    pub section_id: Option<Uuid>,
    pub amount: f64,
    pub fee_jan: bool,
    pub fee_feb: bool,
    pub fee_mar: bool,
    pub fee_apr: bool,
    pub fee_may: bool,
    pub fee_jun: bool,
    pub fee_jul: bool,
    pub fee_aug: bool,
    pub fee_sep: bool,
    pub fee_oct: bool,
    pub fee_nov: bool,
    pub fee_dec: bool,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_date: i64,
    pub modified_by: Option<Uuid>,
    pub modified_date: Option<i64>,
}

impl FeeMapPlan {
    pub fn months(&self) -> MonthFlags {
        MonthFlags::from_array([
            self.fee_jan,
            self.fee_feb,
            self.fee_mar,
            self.fee_apr,
            self.fee_may,
            self.fee_jun,
            self.fee_jul,
            self.fee_aug,
            self.fee_sep,
            self.fee_oct,
            self.fee_nov,
            self.fee_dec,
        ])
    }
}

#[derive(Debug, Clone, Serialize, FromQueryResult, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fees.ts")]
pub struct FeeMapConcession {
    pub id: Uuid,
    pub fee_map_plan_id: Uuid,
    pub student_id: Uuid,
    pub fee_discount_id: Uuid,
    pub remarks: Option<String>,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_date: i64,
    pub modified_by: Option<Uuid>,
    pub modified_date: Option<i64>,
}

/// 学生单月应收记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fees.ts")]
pub struct LedgerEntry {
    pub id: Uuid,
    pub student_id: Uuid,
    pub fee_map_plan_id: Uuid,
    pub fee_category_id: Uuid,
    pub fee_month: i32,
    pub amount: f64,
    pub concession: f64,
    pub paid_amount: f64,
    pub created_date: i64,
    pub modified_date: Option<i64>,
}

impl LedgerEntry {
    /// 尚欠金额
    pub fn due(&self) -> f64 {
        round2(self.amount - self.concession - self.paid_amount).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(10.126), 10.13);
        assert_eq!(round2(10.124), 10.12);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_percentage_concession() {
        assert_eq!(DiscountType::Percentage.concession_for(10.0, 1250.0), 125.0);
        assert_eq!(DiscountType::Percentage.concession_for(33.0, 100.0), 33.0);
        assert_eq!(DiscountType::Percentage.concession_for(12.5, 333.33), 41.67);
    }

    #[test]
    fn test_amount_concession_is_capped() {
        assert_eq!(DiscountType::Amount.concession_for(200.0, 500.0), 200.0);
        assert_eq!(DiscountType::Amount.concession_for(800.0, 500.0), 500.0);
    }

    #[test]
    fn test_due() {
        let entry = LedgerEntry {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            fee_map_plan_id: Uuid::new_v4(),
            fee_category_id: Uuid::new_v4(),
            fee_month: 4,
            amount: 1000.0,
            concession: 100.0,
            paid_amount: 300.0,
            created_date: 0,
            modified_date: None,
        };
        assert_eq!(entry.due(), 600.0);
    }
}
