//! 学生收费明细实体（每个学生、每个收费计划、每月一行）

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "student_fee_ledgers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub session_id: Uuid,
    pub student_id: Uuid,
    pub fee_map_plan_id: Uuid,
    pub fee_category_id: Uuid,
    pub fee_month: i32,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
    #[sea_orm(column_type = "Double")]
    pub concession: f64,
    #[sea_orm(column_type = "Double")]
    pub paid_amount: f64,
    pub created_by: Uuid,
    pub created_date: i64,
    pub modified_by: Option<Uuid>,
    pub modified_date: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_ledger_entry(self) -> crate::models::fees::entities::LedgerEntry {
        use crate::models::fees::entities::LedgerEntry;

        LedgerEntry {
            id: self.id,
            student_id: self.student_id,
            fee_map_plan_id: self.fee_map_plan_id,
            fee_category_id: self.fee_category_id,
            fee_month: self.fee_month,
            amount: self.amount,
            concession: self.concession,
            paid_amount: self.paid_amount,
            created_date: self.created_date,
            modified_date: self.modified_date,
        }
    }
}
