//! 按月收费标记与学年月份顺序

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 数据库中月份标记列名，下标 0 对应一月
pub const MONTH_COLUMNS: [&str; 12] = [
    "fee_jan", "fee_feb", "fee_mar", "fee_apr", "fee_may", "fee_jun", "fee_jul", "fee_aug",
    "fee_sep", "fee_oct", "fee_nov", "fee_dec",
];

/// 默认学年起始月份（四月）
pub const DEFAULT_SESSION_START_MONTH: i32 = 4;

// 12 个月的收费标记
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "../frontend/src/types/generated/common.ts")]
pub struct MonthFlags {
    pub jan: bool,
    pub feb: bool,
    pub mar: bool,
    pub apr: bool,
    pub may: bool,
    pub jun: bool,
    pub jul: bool,
    pub aug: bool,
    pub sep: bool,
    pub oct: bool,
    pub nov: bool,
    pub dec: bool,
}

impl MonthFlags {
    pub fn from_array(flags: [bool; 12]) -> Self {
        let [jan, feb, mar, apr, may, jun, jul, aug, sep, oct, nov, dec] = flags;
        Self {
            jan,
            feb,
            mar,
            apr,
            may,
            jun,
            jul,
            aug,
            sep,
            oct,
            nov,
            dec,
        }
    }

    pub fn to_array(&self) -> [bool; 12] {
        [
            self.jan, self.feb, self.mar, self.apr, self.may, self.jun, self.jul, self.aug,
            self.sep, self.oct, self.nov, self.dec,
        ]
    }

    /// 已勾选的月份（1-12，自然月顺序）
    pub fn enabled_months(&self) -> Vec<i32> {
        self.to_array()
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .map(|(idx, _)| idx as i32 + 1)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        !self.to_array().iter().any(|on| *on)
    }

    /// 转换为数据库列值
    pub fn columns(&self) -> Vec<(&'static str, sea_orm::Value)> {
        MONTH_COLUMNS
            .iter()
            .zip(self.to_array())
            .map(|(col, on)| (*col, on.into()))
            .collect()
    }
}

/// 月份在学年中的位置（0 起）
pub fn academic_position(month: i32, start_month: i32) -> i32 {
    (month - start_month).rem_euclid(12)
}

/// 从学年起始月到 `through` 月（含）的所有月份，按学年顺序
pub fn academic_months_through(start_month: i32, through: i32) -> Vec<i32> {
    let span = academic_position(through, start_month);
    (0..=span)
        .map(|offset| (start_month - 1 + offset).rem_euclid(12) + 1)
        .collect()
}

pub fn is_valid_month(month: i32) -> bool {
    (1..=12).contains(&month)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_months() {
        let flags = MonthFlags {
            apr: true,
            jul: true,
            jan: true,
            ..Default::default()
        };
        assert_eq!(flags.enabled_months(), vec![1, 4, 7]);
        assert!(!flags.is_empty());
        assert!(MonthFlags::default().is_empty());
    }

    #[test]
    fn test_array_round_trip() {
        let mut arr = [false; 12];
        arr[11] = true;
        arr[3] = true;
        let flags = MonthFlags::from_array(arr);
        assert!(flags.dec && flags.apr);
        assert_eq!(flags.to_array(), arr);
    }

    #[test]
    fn test_columns_follow_calendar_order() {
        let flags = MonthFlags {
            feb: true,
            ..Default::default()
        };
        let cols = flags.columns();
        assert_eq!(cols.len(), 12);
        assert_eq!(cols[0].0, "fee_jan");
        assert_eq!(cols[1].0, "fee_feb");
        assert_eq!(cols[11].0, "fee_dec");
    }

    #[test]
    fn test_academic_months_wrap_year_end() {
        assert_eq!(academic_months_through(4, 4), vec![4]);
        assert_eq!(academic_months_through(4, 6), vec![4, 5, 6]);
        assert_eq!(
            academic_months_through(4, 2),
            vec![4, 5, 6, 7, 8, 9, 10, 11, 12, 1, 2]
        );
        assert_eq!(academic_months_through(1, 12).len(), 12);
    }

    #[test]
    fn test_academic_position() {
        assert_eq!(academic_position(4, 4), 0);
        assert_eq!(academic_position(3, 4), 11);
        assert_eq!(academic_position(1, 4), 9);
    }

    #[test]
    fn test_deserialize_partial_flags() {
        let flags: MonthFlags = serde_json::from_str(r#"{"may": true}"#).unwrap();
        assert!(flags.may);
        assert_eq!(flags.enabled_months(), vec![5]);
    }
}
