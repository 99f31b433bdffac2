use sea_orm_migration::prelude::*;

use crate::{Common, master_table, scope_index, with_month_flags};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 学业主数据 ====================
        let mut classes = master_table(Classes::Table, true);
        classes
            .col(ColumnDef::new(Classes::ClassName).string().not_null())
            .col(sort_order());
        manager.create_table(classes).await?;

        let mut sections = master_table(Sections::Table, true);
        sections
            .col(ColumnDef::new(Sections::ClassId).uuid().not_null())
            .col(ColumnDef::new(Sections::SectionName).string().not_null())
            .col(sort_order());
        manager.create_table(sections).await?;

        let mut hostels = master_table(Hostels::Table, false);
        hostels
            .col(ColumnDef::new(Hostels::HostelName).string().not_null())
            .col(ColumnDef::new(Hostels::HostelType).string().not_null())
            .col(ColumnDef::new(Hostels::Address).text().null())
            .col(ColumnDef::new(Hostels::WardenName).string().null())
            .col(ColumnDef::new(Hostels::Capacity).integer().null());
        manager.create_table(hostels).await?;

        let mut villages = master_table(Villages::Table, false);
        villages
            .col(ColumnDef::new(Villages::VillageName).string().not_null())
            .col(ColumnDef::new(Villages::Pincode).string().null())
            .col(ColumnDef::new(Villages::DistanceKm).double().null());
        manager.create_table(villages).await?;

        let mut subject_grades = master_table(SubjectGrades::Table, true);
        subject_grades
            .col(ColumnDef::new(SubjectGrades::GradeName).string().not_null())
            .col(
                ColumnDef::new(SubjectGrades::MinPercentage)
                    .double()
                    .not_null(),
            )
            .col(
                ColumnDef::new(SubjectGrades::MaxPercentage)
                    .double()
                    .not_null(),
            )
            .col(ColumnDef::new(SubjectGrades::GradePoint).double().null())
            .col(ColumnDef::new(SubjectGrades::Remarks).string().null())
            .col(sort_order());
        manager.create_table(subject_grades).await?;

        let mut grade_subject_mappings = master_table(GradeSubjectMappings::Table, true);
        grade_subject_mappings
            .col(
                ColumnDef::new(GradeSubjectMappings::ClassId)
                    .uuid()
                    .not_null(),
            )
            .col(
                ColumnDef::new(GradeSubjectMappings::SubjectName)
                    .string()
                    .not_null(),
            )
            .col(
                ColumnDef::new(GradeSubjectMappings::SubjectCode)
                    .string()
                    .null(),
            )
            .col(
                ColumnDef::new(GradeSubjectMappings::IsGradeOnly)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(sort_order());
        manager.create_table(grade_subject_mappings).await?;

        let mut students = master_table(Students::Table, true);
        students
            .col(ColumnDef::new(Students::AdmissionNo).string().not_null())
            .col(ColumnDef::new(Students::StudentName).string().not_null())
            .col(ColumnDef::new(Students::ClassId).uuid().not_null())
            .col(ColumnDef::new(Students::SectionId).uuid().null())
            .col(ColumnDef::new(Students::VillageId).uuid().null())
            .col(ColumnDef::new(Students::HostelId).uuid().null())
            .col(ColumnDef::new(Students::PickupId).uuid().null());
        manager.create_table(students).await?;

        // ==================== 人事主数据 ====================
        let mut departments = master_table(Departments::Table, false);
        departments
            .col(
                ColumnDef::new(Departments::DepartmentName)
                    .string()
                    .not_null(),
            )
            .col(ColumnDef::new(Departments::DepartmentCode).string().null())
            .col(ColumnDef::new(Departments::ParentDeptId).uuid().null());
        manager.create_table(departments).await?;

        let mut designations = master_table(Designations::Table, false);
        designations
            .col(
                ColumnDef::new(Designations::DesignationName)
                    .string()
                    .not_null(),
            )
            .col(ColumnDef::new(Designations::DepartmentId).uuid().null())
            .col(sort_order());
        manager.create_table(designations).await?;

        // ==================== 交通主数据 ====================
        let mut routes = master_table(TransportRoutes::Table, true);
        routes
            .col(ColumnDef::new(TransportRoutes::RouteName).string().not_null())
            .col(ColumnDef::new(TransportRoutes::VehicleNo).string().null())
            .col(ColumnDef::new(TransportRoutes::DriverName).string().null())
            .col(ColumnDef::new(TransportRoutes::DriverPhone).string().null())
            .col(sort_order());
        manager.create_table(routes).await?;

        let mut pickups = master_table(TransportPickups::Table, true);
        pickups
            .col(ColumnDef::new(TransportPickups::RouteId).uuid().not_null())
            .col(
                ColumnDef::new(TransportPickups::PickupName)
                    .string()
                    .not_null(),
            )
            .col(ColumnDef::new(TransportPickups::PickupTime).string().null())
            .col(
                ColumnDef::new(TransportPickups::FeeAmount)
                    .double()
                    .not_null()
                    .default(0.0),
            )
            .col(sort_order());
        with_month_flags(&mut pickups);
        manager.create_table(pickups).await?;

        // ==================== 租户配置 ====================
        let mut configurations = master_table(Configurations::Table, false);
        configurations
            .col(ColumnDef::new(Configurations::ConfigKey).string().not_null())
            .col(ColumnDef::new(Configurations::ConfigValue).text().not_null())
            .col(ColumnDef::new(Configurations::Description).string().null());
        manager.create_table(configurations).await?;

        // 作用域索引
        let indexes = [
            scope_index("idx_classes_scope", Classes::Table, true),
            scope_index("idx_sections_scope", Sections::Table, true),
            scope_index("idx_hostels_scope", Hostels::Table, false),
            scope_index("idx_villages_scope", Villages::Table, false),
            scope_index("idx_subject_grades_scope", SubjectGrades::Table, true),
            scope_index(
                "idx_grade_subject_mappings_scope",
                GradeSubjectMappings::Table,
                true,
            ),
            scope_index("idx_students_scope", Students::Table, true),
            scope_index("idx_departments_scope", Departments::Table, false),
            scope_index("idx_designations_scope", Designations::Table, false),
            scope_index("idx_transport_routes_scope", TransportRoutes::Table, true),
            scope_index("idx_transport_pickups_scope", TransportPickups::Table, true),
            scope_index("idx_configurations_scope", Configurations::Table, false),
        ];
        for index in indexes {
            manager.create_index(index).await?;
        }

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_students_class")
                    .table(Students::Table)
                    .col(Students::ClassId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_departments_parent")
                    .table(Departments::Table)
                    .col(Departments::ParentDeptId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Configurations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TransportPickups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TransportRoutes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Designations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Departments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GradeSubjectMappings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SubjectGrades::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Villages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Hostels::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sections::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Classes::Table).to_owned())
            .await?;
        Ok(())
    }
}

fn sort_order() -> ColumnDef {
    ColumnDef::new(Common::SortOrder)
        .integer()
        .not_null()
        .default(0)
        .to_owned()
}

#[derive(DeriveIden)]
enum Classes {
    #[sea_orm(iden = "classes")]
    Table,
    ClassName,
}

#[derive(DeriveIden)]
enum Sections {
    #[sea_orm(iden = "sections")]
    Table,
    ClassId,
    SectionName,
}

#[derive(DeriveIden)]
enum Hostels {
    #[sea_orm(iden = "hostels")]
    Table,
    HostelName,
    HostelType,
    Address,
    WardenName,
    Capacity,
}

#[derive(DeriveIden)]
enum Villages {
    #[sea_orm(iden = "villages")]
    Table,
    VillageName,
    Pincode,
    DistanceKm,
}

#[derive(DeriveIden)]
enum SubjectGrades {
    #[sea_orm(iden = "subject_grades")]
    Table,
    GradeName,
    MinPercentage,
    MaxPercentage,
    GradePoint,
    Remarks,
}

#[derive(DeriveIden)]
enum GradeSubjectMappings {
    #[sea_orm(iden = "grade_subject_mappings")]
    Table,
    ClassId,
    SubjectName,
    SubjectCode,
    IsGradeOnly,
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    AdmissionNo,
    StudentName,
    ClassId,
    SectionId,
    VillageId,
    HostelId,
    PickupId,
}

#[derive(DeriveIden)]
enum Departments {
    #[sea_orm(iden = "departments")]
    Table,
    DepartmentName,
    DepartmentCode,
    ParentDeptId,
}

#[derive(DeriveIden)]
enum Designations {
    #[sea_orm(iden = "designations")]
    Table,
    DesignationName,
    DepartmentId,
}

#[derive(DeriveIden)]
enum TransportRoutes {
    #[sea_orm(iden = "transport_routes")]
    Table,
    RouteName,
    VehicleNo,
    DriverName,
    DriverPhone,
}

#[derive(DeriveIden)]
enum TransportPickups {
    #[sea_orm(iden = "transport_pickups")]
    Table,
    RouteId,
    PickupName,
    PickupTime,
    FeeAmount,
}

#[derive(DeriveIden)]
enum Configurations {
    #[sea_orm(iden = "configurations")]
    Table,
    ConfigKey,
    ConfigValue,
    Description,
}
