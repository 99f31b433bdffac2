//! 主数据资源定义

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use super::{MasterResource, ResourceContext};
use crate::errors::{Result, SchoolAdminError};
use crate::models::StaffRole;
use crate::models::academics::{entities as academics, requests as academics_req};
use crate::models::configurations::{entities::Configuration, requests::ConfigurationRequest};
use crate::models::fees::{entities as fees, requests as fees_req};
use crate::models::hr::{entities as hr, requests as hr_req};
use crate::models::transport::{entities as transport, requests as transport_req};
use crate::storage::{MasterTable, tables};

/// 只使用通用流程的资源
macro_rules! plain_resource {
    ($name:ident, $record:ty, $payload:ty, $table:path, $path:literal) => {
        plain_resource!($name, $record, $payload, $table, $path, StaffRole::admin_roles());
    };
    ($name:ident, $record:ty, $payload:ty, $table:path, $path:literal, $roles:expr) => {
        #[derive(Default)]
        pub struct $name;

        #[async_trait]
        impl MasterResource for $name {
            type Record = $record;
            type Payload = $payload;

            const TABLE: &'static MasterTable = &$table;
            const PATH: &'static str = $path;

            fn write_roles() -> &'static [&'static StaffRole] {
                $roles
            }
        }
    };
}

plain_resource!(
    Classes,
    academics::Class,
    academics_req::ClassRequest,
    tables::CLASSES,
    "/api/v1/classes"
);
plain_resource!(
    Sections,
    academics::Section,
    academics_req::SectionRequest,
    tables::SECTIONS,
    "/api/v1/sections"
);
plain_resource!(
    Hostels,
    academics::Hostel,
    academics_req::HostelRequest,
    tables::HOSTELS,
    "/api/v1/hostels"
);
plain_resource!(
    Villages,
    academics::Village,
    academics_req::VillageRequest,
    tables::VILLAGES,
    "/api/v1/villages"
);
plain_resource!(
    SubjectGrades,
    academics::SubjectGrade,
    academics_req::SubjectGradeRequest,
    tables::SUBJECT_GRADES,
    "/api/v1/subject-grades"
);
plain_resource!(
    GradeSubjectMappings,
    academics::GradeSubjectMapping,
    academics_req::GradeSubjectMappingRequest,
    tables::GRADE_SUBJECT_MAPPINGS,
    "/api/v1/grade-subject-mappings"
);
plain_resource!(
    Students,
    academics::Student,
    academics_req::StudentRequest,
    tables::STUDENTS,
    "/api/v1/students"
);
plain_resource!(
    Designations,
    hr::Designation,
    hr_req::DesignationRequest,
    tables::DESIGNATIONS,
    "/api/v1/designations"
);
plain_resource!(
    TransportRoutes,
    transport::TransportRoute,
    transport_req::TransportRouteRequest,
    tables::TRANSPORT_ROUTES,
    "/api/v1/transport-routes"
);
plain_resource!(
    TransportPickups,
    transport::TransportPickup,
    transport_req::TransportPickupRequest,
    tables::TRANSPORT_PICKUPS,
    "/api/v1/transport-pickups"
);
plain_resource!(
    FeeCategories,
    fees::FeeCategory,
    fees_req::FeeCategoryRequest,
    tables::FEE_CATEGORIES,
    "/api/v1/fee-categories",
    StaffRole::fee_roles()
);
plain_resource!(
    FeeDiscounts,
    fees::FeeDiscount,
    fees_req::FeeDiscountRequest,
    tables::FEE_DISCOUNTS,
    "/api/v1/fee-discounts",
    StaffRole::fee_roles()
);

/// 部门：上级部门不能形成环
#[derive(Default)]
pub struct Departments;

#[async_trait]
impl MasterResource for Departments {
    type Record = hr::Department;
    type Payload = hr_req::DepartmentRequest;

    const TABLE: &'static MasterTable = &tables::DEPARTMENTS;
    const PATH: &'static str = "/api/v1/departments";

    async fn check(
        &self,
        rc: &ResourceContext<'_>,
        id: Option<Uuid>,
        payload: &Self::Payload,
    ) -> Result<()> {
        // 新建的部门还没有下级，不可能成环
        let (Some(id), Some(parent)) = (id, payload.parent_dept_id) else {
            return Ok(());
        };
        if rc
            .storage
            .department_creates_cycle(rc.tenant, id, parent)
            .await?
        {
            return Err(SchoolAdminError::circular_reference(
                "A department cannot be placed under itself or one of its sub-departments",
            ));
        }
        Ok(())
    }
}

/// 配置：写入后失效按键缓存
#[derive(Default)]
pub struct Configurations;

/// 按键读取配置值的缓存键
pub fn configuration_cache_key(tenant_id: Uuid, key: &str) -> String {
    format!("config:{tenant_id}:{key}")
}

#[async_trait]
impl MasterResource for Configurations {
    type Record = Configuration;
    type Payload = ConfigurationRequest;

    const TABLE: &'static MasterTable = &tables::CONFIGURATIONS;
    const PATH: &'static str = "/api/v1/configurations";

    async fn after_write(&self, rc: &ResourceContext<'_>, record: Option<&Self::Record>) {
        if let Some(record) = record {
            let key = configuration_cache_key(rc.tenant.tenant_id, &record.config_key);
            debug!("Invalidating configuration cache {}", key);
            rc.cache.remove(&key).await;
        }
    }
}

/// 收费计划：写入同时维护学生收费明细
#[derive(Default)]
pub struct FeeMapPlans;

#[async_trait]
impl MasterResource for FeeMapPlans {
    type Record = fees::FeeMapPlan;
    type Payload = fees_req::FeeMapPlanRequest;

    const TABLE: &'static MasterTable = &tables::FEE_MAP_PLANS;
    const PATH: &'static str = "/api/v1/fee-map-plans";

    fn write_roles() -> &'static [&'static StaffRole] {
        StaffRole::fee_roles()
    }

    async fn insert(&self, rc: &ResourceContext<'_>, payload: &Self::Payload) -> Result<Uuid> {
        rc.storage.create_fee_map_plan(rc.tenant, payload).await
    }

    async fn update(
        &self,
        rc: &ResourceContext<'_>,
        id: Uuid,
        payload: &Self::Payload,
    ) -> Result<bool> {
        rc.storage.update_fee_map_plan(rc.tenant, id, payload).await
    }

    async fn remove(&self, rc: &ResourceContext<'_>, id: Uuid) -> Result<bool> {
        rc.storage.delete_fee_map_plan(rc.tenant, id).await
    }
}

/// 收费减免：写入同时更新未缴明细的减免额
#[derive(Default)]
pub struct FeeMapConcessions;

#[async_trait]
impl MasterResource for FeeMapConcessions {
    type Record = fees::FeeMapConcession;
    type Payload = fees_req::FeeMapConcessionRequest;

    const TABLE: &'static MasterTable = &tables::FEE_MAP_CONCESSIONS;
    const PATH: &'static str = "/api/v1/fee-map-concessions";

    fn write_roles() -> &'static [&'static StaffRole] {
        StaffRole::fee_roles()
    }

    async fn insert(&self, rc: &ResourceContext<'_>, payload: &Self::Payload) -> Result<Uuid> {
        rc.storage.apply_fee_concession(rc.tenant, payload).await
    }

    async fn update(
        &self,
        rc: &ResourceContext<'_>,
        id: Uuid,
        payload: &Self::Payload,
    ) -> Result<bool> {
        rc.storage.update_fee_concession(rc.tenant, id, payload).await
    }

    async fn remove(&self, rc: &ResourceContext<'_>, id: Uuid) -> Result<bool> {
        rc.storage.remove_fee_concession(rc.tenant, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_resources_allow_accountants() {
        assert!(FeeMapPlans::write_roles().contains(&&StaffRole::Accountant));
        assert!(FeeCategories::write_roles().contains(&&StaffRole::Accountant));
        assert!(!Classes::write_roles().contains(&&StaffRole::Accountant));
        assert!(!Departments::write_roles().contains(&&StaffRole::Accountant));
    }

    #[test]
    fn test_paths_are_distinct() {
        let paths = [
            Classes::PATH,
            Sections::PATH,
            Hostels::PATH,
            Villages::PATH,
            SubjectGrades::PATH,
            GradeSubjectMappings::PATH,
            Students::PATH,
            Designations::PATH,
            TransportRoutes::PATH,
            TransportPickups::PATH,
            FeeCategories::PATH,
            FeeDiscounts::PATH,
            Departments::PATH,
            Configurations::PATH,
            FeeMapPlans::PATH,
            FeeMapConcessions::PATH,
        ];
        let unique: std::collections::HashSet<_> = paths.iter().collect();
        assert_eq!(unique.len(), paths.len());
        assert!(paths.iter().all(|p| p.starts_with("/api/v1/")));
    }

    #[test]
    fn test_configuration_cache_key() {
        let tenant = Uuid::nil();
        assert_eq!(
            configuration_cache_key(tenant, "session.start_month"),
            "config:00000000-0000-0000-0000-000000000000:session.start_month"
        );
    }
}
