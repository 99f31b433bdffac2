//! SeaORM 实体定义
//!
//! 主数据表结构一致，由存储层按描述符统一读写；
//! 只有需要硬删除的映射表使用实体。

pub mod prelude;

pub mod grade_formulas;
pub mod student_fee_ledgers;
