pub use sea_orm_migration::prelude::*;

mod m20260105_000001_create_master_tables;
mod m20260112_000001_create_fee_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260105_000001_create_master_tables::Migration),
            Box::new(m20260112_000001_create_fee_tables::Migration),
        ]
    }
}

/// 所有主数据表共享的列
#[derive(DeriveIden)]
pub(crate) enum Common {
    Id,
    TenantId,
    TenantCode,
    SessionId,
    SessionYear,
    SortOrder,
    CreatedBy,
    CreatedDate,
    ModifiedBy,
    ModifiedDate,
    IsActive,
    IsDeleted,
}

#[derive(DeriveIden)]
pub(crate) enum Months {
    FeeJan,
    FeeFeb,
    FeeMar,
    FeeApr,
    FeeMay,
    FeeJun,
    FeeJul,
    FeeAug,
    FeeSep,
    FeeOct,
    FeeNov,
    FeeDec,
}

impl Months {
    pub(crate) fn all() -> [Months; 12] {
        [
            Months::FeeJan,
            Months::FeeFeb,
            Months::FeeMar,
            Months::FeeApr,
            Months::FeeMay,
            Months::FeeJun,
            Months::FeeJul,
            Months::FeeAug,
            Months::FeeSep,
            Months::FeeOct,
            Months::FeeNov,
            Months::FeeDec,
        ]
    }
}

/// 为主数据表追加主键、租户/学年作用域、审计与状态列
pub(crate) fn master_table<T>(table: T, session_scoped: bool) -> TableCreateStatement
where
    T: IntoIden + 'static,
{
    let mut stmt = Table::create();
    stmt.table(table)
        .if_not_exists()
        .col(ColumnDef::new(Common::Id).uuid().not_null().primary_key())
        .col(ColumnDef::new(Common::TenantId).uuid().not_null())
        .col(ColumnDef::new(Common::TenantCode).string().not_null());

    if session_scoped {
        stmt.col(ColumnDef::new(Common::SessionId).uuid().not_null())
            .col(ColumnDef::new(Common::SessionYear).string().not_null());
    }

    stmt.col(ColumnDef::new(Common::CreatedBy).uuid().not_null())
        .col(ColumnDef::new(Common::CreatedDate).big_integer().not_null())
        .col(ColumnDef::new(Common::ModifiedBy).uuid().null())
        .col(ColumnDef::new(Common::ModifiedDate).big_integer().null())
        .col(
            ColumnDef::new(Common::IsActive)
                .boolean()
                .not_null()
                .default(true),
        )
        .col(
            ColumnDef::new(Common::IsDeleted)
                .boolean()
                .not_null()
                .default(false),
        );

    stmt.to_owned()
}

/// 追加 12 个月份收费标记列
pub(crate) fn with_month_flags(stmt: &mut TableCreateStatement) {
    for month in Months::all() {
        stmt.col(ColumnDef::new(month).boolean().not_null().default(false));
    }
}

/// 租户 + 学年作用域索引
pub(crate) fn scope_index<T>(name: &str, table: T, session_scoped: bool) -> IndexCreateStatement
where
    T: IntoIden + 'static,
{
    let mut index = Index::create();
    index
        .if_not_exists()
        .name(name)
        .table(table)
        .col(Common::TenantId);
    if session_scoped {
        index.col(Common::SessionId);
    }
    index.to_owned()
}
