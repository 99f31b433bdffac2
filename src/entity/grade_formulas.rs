//! 成绩公式实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grade_formulas")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub session_id: Uuid,
    pub class_id: Uuid,
    pub component_code: String,
    pub component_name: String,
    #[sea_orm(column_type = "Double")]
    pub weightage: f64,
    #[sea_orm(column_type = "Double")]
    pub max_marks: f64,
    pub sort_order: i32,
    pub created_by: Uuid,
    pub created_date: i64,
    pub modified_by: Option<Uuid>,
    pub modified_date: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_component(self) -> crate::models::grade_formulas::entities::GradeComponent {
        use crate::models::grade_formulas::entities::GradeComponent;

        GradeComponent {
            component_code: self.component_code,
            component_name: self.component_name,
            weightage: self.weightage,
            max_marks: self.max_marks,
            sort_order: self.sort_order,
        }
    }
}
