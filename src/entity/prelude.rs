//! 预导入模块，方便使用

pub use super::grade_formulas::{
    ActiveModel as GradeFormulaActiveModel, Entity as GradeFormulas, Model as GradeFormulaModel,
};
pub use super::student_fee_ledgers::{
    ActiveModel as StudentFeeLedgerActiveModel, Entity as StudentFeeLedgers,
    Model as StudentFeeLedgerModel,
};
