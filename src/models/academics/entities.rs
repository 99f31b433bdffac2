use sea_orm::FromQueryResult;
use serde::Serialize;
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromQueryResult, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct Class {
    pub id: Uuid,
    // 班级名称
    pub class_name: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_date: i64,
    pub modified_by: Option<Uuid>,
    pub modified_date: Option<i64>,
}

#[derive(Debug, Clone, Serialize, FromQueryResult, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct Section {
    pub id: Uuid,
    pub class_id: Uuid,
    pub section_name: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_date: i64,
    pub modified_by: Option<Uuid>,
    pub modified_date: Option<i64>,
}

#[derive(Debug, Clone, Serialize, FromQueryResult, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct Hostel {
    pub id: Uuid,
    pub hostel_name: String,
    // boys / girls / mixed
    pub hostel_type: String,
    pub address: Option<String>,
    pub warden_name: Option<String>,
    pub capacity: Option<i32>,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_date: i64,
    pub modified_by: Option<Uuid>,
    pub modified_date: Option<i64>,
}

#[derive(Debug, Clone, Serialize, FromQueryResult, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct Village {
    pub id: Uuid,
    pub village_name: String,
    pub pincode: Option<String>,
    pub distance_km: Option<f64>,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_date: i64,
    pub modified_by: Option<Uuid>,
    pub modified_date: Option<i64>,
}

#[derive(Debug, Clone, Serialize, FromQueryResult, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct SubjectGrade {
    pub id: Uuid,
    pub grade_name: String,
    pub min_percentage: f64,
    pub max_percentage: f64,
    pub grade_point: Option<f64>,
    pub remarks: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_date: i64,
    pub modified_by: Option<Uuid>,
    pub modified_date: Option<i64>,
}

#[derive(Debug, Clone, Serialize, FromQueryResult, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct GradeSubjectMapping {
    pub id: Uuid,
    pub class_id: Uuid,
    pub subject_name: String,
    pub subject_code: Option<String>,
    // 只评等级、不计分
    pub is_grade_only: bool,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_date: i64,
    pub modified_by: Option<Uuid>,
    pub modified_date: Option<i64>,
}

#[derive(Debug, Clone, Serialize, FromQueryResult, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct Student {
    pub id: Uuid,
    // 学号
    pub admission_no: String,
    pub student_name: String,
    pub class_id: Uuid,
    pub section_id: Option<Uuid>,
    pub village_id: Option<Uuid>,
    pub hostel_id: Option<Uuid>,
    pub pickup_id: Option<Uuid>,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_date: i64,
    pub modified_by: Option<Uuid>,
    pub modified_date: Option<i64>,
}
