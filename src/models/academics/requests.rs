use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::storage::MasterPayload;
use crate::utils::validate::{
    validate_name, validate_non_negative, validate_optional_text, validate_pincode,
};

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct ClassRequest {
    pub class_name: String,
    #[serde(default)]
    pub sort_order: i32,
}

impl MasterPayload for ClassRequest {
    fn display_name(&self) -> String {
        self.class_name.trim().to_string()
    }

    fn validate(&self) -> Result<(), String> {
        validate_name("Class name", &self.class_name)
    }

    fn columns(&self) -> Vec<(&'static str, sea_orm::Value)> {
        vec![
            ("class_name", self.display_name().into()),
            ("sort_order", self.sort_order.into()),
        ]
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct SectionRequest {
    pub class_id: Uuid,
    pub section_name: String,
    #[serde(default)]
    pub sort_order: i32,
}

impl MasterPayload for SectionRequest {
    fn display_name(&self) -> String {
        self.section_name.trim().to_string()
    }

    fn validate(&self) -> Result<(), String> {
        validate_name("Section name", &self.section_name)
    }

    fn columns(&self) -> Vec<(&'static str, sea_orm::Value)> {
        vec![
            ("class_id", self.class_id.into()),
            ("section_name", self.display_name().into()),
            ("sort_order", self.sort_order.into()),
        ]
    }

    fn references(&self) -> Vec<(&'static str, Uuid)> {
        vec![("class_id", self.class_id)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub enum HostelType {
    Boys,
    Girls,
    Mixed,
}

impl HostelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostelType::Boys => "boys",
            HostelType::Girls => "girls",
            HostelType::Mixed => "mixed",
        }
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct HostelRequest {
    pub hostel_name: String,
    pub hostel_type: HostelType,
    pub address: Option<String>,
    pub warden_name: Option<String>,
    pub capacity: Option<i32>,
}

impl MasterPayload for HostelRequest {
    fn display_name(&self) -> String {
        self.hostel_name.trim().to_string()
    }

    fn validate(&self) -> Result<(), String> {
        validate_name("Hostel name", &self.hostel_name)?;
        validate_optional_text("Address", self.address.as_deref(), 500)?;
        validate_optional_text("Warden name", self.warden_name.as_deref(), 100)?;
        if let Some(capacity) = self.capacity
            && capacity < 0
        {
            return Err("Capacity must be zero or greater".to_string());
        }
        Ok(())
    }

    fn columns(&self) -> Vec<(&'static str, sea_orm::Value)> {
        vec![
            ("hostel_name", self.display_name().into()),
            ("hostel_type", self.hostel_type.as_str().into()),
            ("address", self.address.clone().into()),
            ("warden_name", self.warden_name.clone().into()),
            ("capacity", self.capacity.into()),
        ]
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct VillageRequest {
    pub village_name: String,
    pub pincode: Option<String>,
    pub distance_km: Option<f64>,
}

impl MasterPayload for VillageRequest {
    fn display_name(&self) -> String {
        self.village_name.trim().to_string()
    }

    fn validate(&self) -> Result<(), String> {
        validate_name("Village name", &self.village_name)?;
        if let Some(pincode) = self.pincode.as_deref() {
            validate_pincode(pincode)?;
        }
        if let Some(distance) = self.distance_km {
            validate_non_negative("Distance", distance)?;
        }
        Ok(())
    }

    fn columns(&self) -> Vec<(&'static str, sea_orm::Value)> {
        vec![
            ("village_name", self.display_name().into()),
            ("pincode", self.pincode.clone().into()),
            ("distance_km", self.distance_km.into()),
        ]
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct SubjectGradeRequest {
    pub grade_name: String,
    pub min_percentage: f64,
    pub max_percentage: f64,
    pub grade_point: Option<f64>,
    pub remarks: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
}

impl MasterPayload for SubjectGradeRequest {
    fn display_name(&self) -> String {
        self.grade_name.trim().to_string()
    }

    fn validate(&self) -> Result<(), String> {
        validate_name("Grade name", &self.grade_name)?;
        // 0 <= min <= max <= 100
        if !(0.0..=100.0).contains(&self.min_percentage)
            || !(0.0..=100.0).contains(&self.max_percentage)
        {
            return Err("Percentages must be between 0 and 100".to_string());
        }
        if self.min_percentage > self.max_percentage {
            return Err("Minimum percentage cannot exceed maximum percentage".to_string());
        }
        if let Some(point) = self.grade_point {
            validate_non_negative("Grade point", point)?;
        }
        validate_optional_text("Remarks", self.remarks.as_deref(), 250)
    }

    fn columns(&self) -> Vec<(&'static str, sea_orm::Value)> {
        vec![
            ("grade_name", self.display_name().into()),
            ("min_percentage", self.min_percentage.into()),
            ("max_percentage", self.max_percentage.into()),
            ("grade_point", self.grade_point.into()),
            ("remarks", self.remarks.clone().into()),
            ("sort_order", self.sort_order.into()),
        ]
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct GradeSubjectMappingRequest {
    pub class_id: Uuid,
    pub subject_name: String,
    pub subject_code: Option<String>,
    #[serde(default)]
    pub is_grade_only: bool,
    #[serde(default)]
    pub sort_order: i32,
}

impl MasterPayload for GradeSubjectMappingRequest {
    fn display_name(&self) -> String {
        self.subject_name.trim().to_string()
    }

    fn validate(&self) -> Result<(), String> {
        validate_name("Subject name", &self.subject_name)?;
        validate_optional_text("Subject code", self.subject_code.as_deref(), 20)
    }

    fn columns(&self) -> Vec<(&'static str, sea_orm::Value)> {
        vec![
            ("class_id", self.class_id.into()),
            ("subject_name", self.display_name().into()),
            ("subject_code", self.subject_code.clone().into()),
            ("is_grade_only", self.is_grade_only.into()),
            ("sort_order", self.sort_order.into()),
        ]
    }

    fn references(&self) -> Vec<(&'static str, Uuid)> {
        vec![("class_id", self.class_id)]
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/academics.ts")]
pub struct StudentRequest {
    pub admission_no: String,
    pub student_name: String,
    pub class_id: Uuid,
    pub section_id: Option<Uuid>,
    pub village_id: Option<Uuid>,
    pub hostel_id: Option<Uuid>,
    pub pickup_id: Option<Uuid>,
}

impl MasterPayload for StudentRequest {
    fn display_name(&self) -> String {
        self.student_name.trim().to_string()
    }

    fn validate(&self) -> Result<(), String> {
        validate_name("Admission number", &self.admission_no)?;
        validate_name("Student name", &self.student_name)
    }

    fn columns(&self) -> Vec<(&'static str, sea_orm::Value)> {
        vec![
            ("admission_no", self.admission_no.trim().into()),
            ("student_name", self.display_name().into()),
            ("class_id", self.class_id.into()),
            ("section_id", self.section_id.into()),
            ("village_id", self.village_id.into()),
            ("hostel_id", self.hostel_id.into()),
            ("pickup_id", self.pickup_id.into()),
        ]
    }

    fn references(&self) -> Vec<(&'static str, Uuid)> {
        let mut refs = vec![("class_id", self.class_id)];
        let optional = [
            ("section_id", self.section_id),
            ("village_id", self.village_id),
            ("hostel_id", self.hostel_id),
            ("pickup_id", self.pickup_id),
        ];
        refs.extend(optional.into_iter().filter_map(|(col, id)| id.map(|id| (col, id))));
        refs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_grade_range() {
        let mut req = SubjectGradeRequest {
            grade_name: "A1".into(),
            min_percentage: 91.0,
            max_percentage: 100.0,
            grade_point: Some(10.0),
            remarks: None,
            sort_order: 1,
        };
        assert!(req.validate().is_ok());

        req.min_percentage = 95.0;
        req.max_percentage = 90.0;
        assert!(req.validate().is_err());

        req.min_percentage = -1.0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_hostel_type_from_json() {
        let req: HostelRequest = serde_json::from_value(serde_json::json!({
            "hostel_name": "North Block",
            "hostel_type": "girls",
            "capacity": 40
        }))
        .unwrap();
        assert_eq!(req.hostel_type, HostelType::Girls);
        assert!(req.validate().is_ok());

        let bad = serde_json::from_value::<HostelRequest>(serde_json::json!({
            "hostel_name": "North Block",
            "hostel_type": "staff"
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn test_student_references_skip_missing() {
        let req = StudentRequest {
            admission_no: "ADM-001".into(),
            student_name: "Asha".into(),
            class_id: Uuid::new_v4(),
            section_id: None,
            village_id: Some(Uuid::new_v4()),
            hostel_id: None,
            pickup_id: None,
        };
        let refs = req.references();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].0, "class_id");
        assert_eq!(refs[1].0, "village_id");
    }

    #[test]
    fn test_village_pincode() {
        let req = VillageRequest {
            village_name: "Hosur".into(),
            pincode: Some("12345".into()),
            distance_km: None,
        };
        assert!(req.validate().is_err());
    }
}
