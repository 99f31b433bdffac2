use sea_orm_migration::prelude::*;

use crate::{Common, master_table, scope_index, with_month_flags};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 收费类别与减免 ====================
        let mut categories = master_table(FeeCategories::Table, true);
        categories
            .col(ColumnDef::new(FeeCategories::FeeName).string().not_null())
            .col(ColumnDef::new(FeeCategories::Frequency).string().not_null())
            .col(
                ColumnDef::new(Common::SortOrder)
                    .integer()
                    .not_null()
                    .default(0),
            );
        manager.create_table(categories).await?;

        let mut discounts = master_table(FeeDiscounts::Table, true);
        discounts
            .col(
                ColumnDef::new(FeeDiscounts::DiscountName)
                    .string()
                    .not_null(),
            )
            .col(
                ColumnDef::new(FeeDiscounts::DiscountType)
                    .string()
                    .not_null(),
            )
            .col(
                ColumnDef::new(FeeDiscounts::DiscountValue)
                    .double()
                    .not_null(),
            );
        manager.create_table(discounts).await?;

        // ==================== 收费映射方案 ====================
        let mut plans = master_table(FeeMapPlans::Table, true);
        plans
            .col(ColumnDef::new(FeeMapPlans::FeeCategoryId).uuid().not_null())
            .col(ColumnDef::new(FeeMapPlans::ClassId).uuid().not_null())
            .col(ColumnDef::new(FeeMapPlans::SectionId).uuid().null())
            .col(ColumnDef::new(FeeMapPlans::Amount).double().not_null());
        with_month_flags(&mut plans);
        manager.create_table(plans).await?;

        let mut concessions = master_table(FeeMapConcessions::Table, true);
        concessions
            .col(
                ColumnDef::new(FeeMapConcessions::FeeMapPlanId)
                    .uuid()
                    .not_null(),
            )
            .col(ColumnDef::new(FeeMapConcessions::StudentId).uuid().not_null())
            .col(
                ColumnDef::new(FeeMapConcessions::FeeDiscountId)
                    .uuid()
                    .not_null(),
            )
            .col(ColumnDef::new(FeeMapConcessions::Remarks).string().null());
        manager.create_table(concessions).await?;

        // ==================== 学生费用台账（映射表，物理删除） ====================
        manager
            .create_table(
                Table::create()
                    .table(StudentFeeLedgers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Common::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Common::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Common::SessionId).uuid().not_null())
                    .col(
                        ColumnDef::new(StudentFeeLedgers::StudentId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentFeeLedgers::FeeMapPlanId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentFeeLedgers::FeeCategoryId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentFeeLedgers::FeeMonth)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentFeeLedgers::Amount)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentFeeLedgers::Concession)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(StudentFeeLedgers::PaidAmount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Common::CreatedBy).uuid().not_null())
                    .col(ColumnDef::new(Common::CreatedDate).big_integer().not_null())
                    .col(ColumnDef::new(Common::ModifiedBy).uuid().null())
                    .col(ColumnDef::new(Common::ModifiedDate).big_integer().null())
                    .to_owned(),
            )
            .await?;

        // ==================== 成绩公式（映射表，物理删除） ====================
        manager
            .create_table(
                Table::create()
                    .table(GradeFormulas::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Common::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Common::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Common::SessionId).uuid().not_null())
                    .col(ColumnDef::new(GradeFormulas::ClassId).uuid().not_null())
                    .col(
                        ColumnDef::new(GradeFormulas::ComponentCode)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GradeFormulas::ComponentName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GradeFormulas::Weightage)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GradeFormulas::MaxMarks)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Common::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Common::CreatedBy).uuid().not_null())
                    .col(ColumnDef::new(Common::CreatedDate).big_integer().not_null())
                    .col(ColumnDef::new(Common::ModifiedBy).uuid().null())
                    .col(ColumnDef::new(Common::ModifiedDate).big_integer().null())
                    .to_owned(),
            )
            .await?;

        let indexes = [
            scope_index("idx_fee_categories_scope", FeeCategories::Table, true),
            scope_index("idx_fee_discounts_scope", FeeDiscounts::Table, true),
            scope_index("idx_fee_map_plans_scope", FeeMapPlans::Table, true),
            scope_index(
                "idx_fee_map_concessions_scope",
                FeeMapConcessions::Table,
                true,
            ),
            scope_index("idx_student_fee_ledgers_scope", StudentFeeLedgers::Table, true),
            scope_index("idx_grade_formulas_scope", GradeFormulas::Table, true),
        ];
        for index in indexes {
            manager.create_index(index).await?;
        }

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_student_fee_ledgers_plan_student")
                    .table(StudentFeeLedgers::Table)
                    .col(StudentFeeLedgers::FeeMapPlanId)
                    .col(StudentFeeLedgers::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_grade_formulas_class_code")
                    .table(GradeFormulas::Table)
                    .col(Common::TenantId)
                    .col(Common::SessionId)
                    .col(GradeFormulas::ClassId)
                    .col(GradeFormulas::ComponentCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GradeFormulas::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StudentFeeLedgers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FeeMapConcessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FeeMapPlans::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FeeDiscounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FeeCategories::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum FeeCategories {
    #[sea_orm(iden = "fee_categories")]
    Table,
    FeeName,
    Frequency,
}

#[derive(DeriveIden)]
enum FeeDiscounts {
    #[sea_orm(iden = "fee_discounts")]
    Table,
    DiscountName,
    DiscountType,
    DiscountValue,
}

#[derive(DeriveIden)]
enum FeeMapPlans {
    #[sea_orm(iden = "fee_map_plans")]
    Table,
    FeeCategoryId,
    ClassId,
    SectionId,
    Amount,
}

#[derive(DeriveIden)]
enum FeeMapConcessions {
    #[sea_orm(iden = "fee_map_concessions")]
    Table,
    FeeMapPlanId,
    StudentId,
    FeeDiscountId,
    Remarks,
}

#[derive(DeriveIden)]
enum StudentFeeLedgers {
    #[sea_orm(iden = "student_fee_ledgers")]
    Table,
    StudentId,
    FeeMapPlanId,
    FeeCategoryId,
    FeeMonth,
    Amount,
    Concession,
    PaidAmount,
}

#[derive(DeriveIden)]
enum GradeFormulas {
    #[sea_orm(iden = "grade_formulas")]
    Table,
    ClassId,
    ComponentCode,
    ComponentName,
    Weightage,
    MaxMarks,
}
