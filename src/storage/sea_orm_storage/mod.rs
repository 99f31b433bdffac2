//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod configurations;
mod departments;
mod fees;
mod grade_formulas;
mod grid;
mod master;
mod reports;
mod sql;
mod transport;

use crate::config::AppConfig;
use crate::errors::{Result, SchoolAdminError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        Self::migrate(&db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    async fn migrate(db: &DatabaseConnection) -> Result<()> {
        Migrator::up(db, None)
            .await
            .map_err(|e| SchoolAdminError::database_operation(format!("数据库迁移失败: {e}")))
    }

    /// SQLite 专用连接（WAL + pragma）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SchoolAdminError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true)
            .pragma("cache_size", "-32000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| {
                SchoolAdminError::database_connection(format!("SQLite 连接失败: {e}"))
            })?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| SchoolAdminError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 推断数据库类型
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if let Some(rest) = url.strip_prefix("mariadb://") {
            // sqlx 只识别 mysql:// 前缀
            Ok(format!("mysql://{rest}"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
        {
            Ok(url.to_string())
        } else {
            Err(SchoolAdminError::database_config(format!(
                "Unsupported database url: {url}. Expected sqlite://, postgres://, mysql:// or a .db/.sqlite path"
            )))
        }
    }

    /// 内存 SQLite，仅用于测试
    #[cfg(test)]
    pub(crate) async fn in_memory() -> Result<Self> {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        // 内存库按连接隔离，只能使用单连接
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opt)
            .await
            .map_err(|e| SchoolAdminError::database_connection(e.to_string()))?;
        Self::migrate(&db).await?;
        Ok(Self { db })
    }
}

// Storage trait 实现
use crate::models::{
    GridRequest, MonthFlags, OptionItem, TenantContext,
    configurations::entities::Configuration,
    fees::{
        requests::{FeeMapConcessionRequest, FeeMapPlanRequest},
        responses::StudentLedgerRow,
    },
    grade_formulas::entities::GradeComponent,
    hr::responses::DepartmentNodeRow,
    reports::responses::FeeDefaulterRow,
};
use crate::storage::{Dependent, GridPage, MasterTable, PaymentOutcome, Storage};
use async_trait::async_trait;
use sea_orm::{QueryResult, Value};
use uuid::Uuid;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 通用主数据
    async fn grid_master(
        &self,
        ctx: &TenantContext,
        table: &'static MasterTable,
        request: &GridRequest,
    ) -> Result<GridPage> {
        self.grid_master_impl(ctx, table, request).await
    }

    async fn find_master(
        &self,
        ctx: &TenantContext,
        table: &'static MasterTable,
        id: Uuid,
    ) -> Result<Option<QueryResult>> {
        self.find_master_impl(ctx, table, id).await
    }

    async fn master_options(
        &self,
        ctx: &TenantContext,
        table: &'static MasterTable,
    ) -> Result<Vec<OptionItem>> {
        self.master_options_impl(ctx, table).await
    }

    async fn insert_master(
        &self,
        ctx: &TenantContext,
        table: &'static MasterTable,
        columns: Vec<(&'static str, Value)>,
    ) -> Result<Uuid> {
        self.insert_master_impl(ctx, table, columns).await
    }

    async fn update_master(
        &self,
        ctx: &TenantContext,
        table: &'static MasterTable,
        id: Uuid,
        columns: Vec<(&'static str, Value)>,
    ) -> Result<bool> {
        self.update_master_impl(ctx, table, id, columns).await
    }

    async fn soft_delete_master(
        &self,
        ctx: &TenantContext,
        table: &'static MasterTable,
        id: Uuid,
    ) -> Result<bool> {
        self.soft_delete_master_impl(ctx, table, id).await
    }

    async fn set_master_active(
        &self,
        ctx: &TenantContext,
        table: &'static MasterTable,
        id: Uuid,
        active: bool,
    ) -> Result<bool> {
        self.set_master_active_impl(ctx, table, id, active).await
    }

    async fn master_duplicate_exists(
        &self,
        ctx: &TenantContext,
        table: &'static MasterTable,
        columns: &[(&'static str, Value)],
        exclude_id: Option<Uuid>,
    ) -> Result<bool> {
        self.master_duplicate_exists_impl(ctx, table, columns, exclude_id)
            .await
    }

    async fn master_reference_exists(
        &self,
        ctx: &TenantContext,
        target: &'static MasterTable,
        id: Uuid,
    ) -> Result<bool> {
        self.master_reference_exists_impl(ctx, target, id).await
    }

    async fn master_dependents(
        &self,
        ctx: &TenantContext,
        table: &'static MasterTable,
        id: Uuid,
    ) -> Result<Vec<Dependent>> {
        self.master_dependents_impl(ctx, table, id).await
    }

    // 部门
    async fn department_creates_cycle(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        parent_id: Uuid,
    ) -> Result<bool> {
        self.department_creates_cycle_impl(ctx, id, parent_id).await
    }

    async fn list_department_nodes(&self, ctx: &TenantContext) -> Result<Vec<DepartmentNodeRow>> {
        self.list_department_nodes_impl(ctx).await
    }

    // 交通
    async fn update_pickup_months(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        months: MonthFlags,
    ) -> Result<bool> {
        self.update_pickup_months_impl(ctx, id, months).await
    }

    // 配置
    async fn get_configuration(
        &self,
        ctx: &TenantContext,
        key: &str,
    ) -> Result<Option<Configuration>> {
        self.get_configuration_impl(ctx, key).await
    }

    async fn upsert_configuration(
        &self,
        ctx: &TenantContext,
        key: &str,
        value: &str,
        description: Option<&str>,
    ) -> Result<Configuration> {
        self.upsert_configuration_impl(ctx, key, value, description)
            .await
    }

    // 收费
    async fn create_fee_map_plan(
        &self,
        ctx: &TenantContext,
        plan: &FeeMapPlanRequest,
    ) -> Result<Uuid> {
        self.create_fee_map_plan_impl(ctx, plan).await
    }

    async fn update_fee_map_plan(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        plan: &FeeMapPlanRequest,
    ) -> Result<bool> {
        self.update_fee_map_plan_impl(ctx, id, plan).await
    }

    async fn delete_fee_map_plan(&self, ctx: &TenantContext, id: Uuid) -> Result<bool> {
        self.delete_fee_map_plan_impl(ctx, id).await
    }

    async fn apply_fee_concession(
        &self,
        ctx: &TenantContext,
        concession: &FeeMapConcessionRequest,
    ) -> Result<Uuid> {
        self.apply_fee_concession_impl(ctx, concession).await
    }

    async fn update_fee_concession(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        concession: &FeeMapConcessionRequest,
    ) -> Result<bool> {
        self.update_fee_concession_impl(ctx, id, concession).await
    }

    async fn remove_fee_concession(&self, ctx: &TenantContext, id: Uuid) -> Result<bool> {
        self.remove_fee_concession_impl(ctx, id).await
    }

    async fn list_student_ledger(
        &self,
        ctx: &TenantContext,
        student_id: Uuid,
    ) -> Result<Vec<StudentLedgerRow>> {
        self.list_student_ledger_impl(ctx, student_id).await
    }

    async fn record_fee_payment(
        &self,
        ctx: &TenantContext,
        ledger_id: Uuid,
        amount: f64,
    ) -> Result<PaymentOutcome> {
        self.record_fee_payment_impl(ctx, ledger_id, amount).await
    }

    // 成绩公式
    async fn list_grade_formulas(
        &self,
        ctx: &TenantContext,
        class_id: Uuid,
    ) -> Result<Vec<GradeComponent>> {
        self.list_grade_formulas_impl(ctx, class_id).await
    }

    async fn replace_grade_formulas(
        &self,
        ctx: &TenantContext,
        class_id: Uuid,
        components: Vec<GradeComponent>,
    ) -> Result<()> {
        self.replace_grade_formulas_impl(ctx, class_id, components)
            .await
    }

    // 报表
    async fn fee_defaulter_rows(
        &self,
        ctx: &TenantContext,
        class_id: Option<Uuid>,
        section_id: Option<Uuid>,
        months: &[i32],
    ) -> Result<Vec<FeeDefaulterRow>> {
        self.fee_defaulter_rows_impl(ctx, class_id, section_id, months)
            .await
    }

    async fn ping(&self) -> Result<()> {
        self.db
            .ping()
            .await
            .map_err(|e| SchoolAdminError::database_connection(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AcademicSession, SortDirection, StaffRole,
        academics::requests::{ClassRequest, SectionRequest, StudentRequest},
        fees::{
            entities::{DiscountType, FeeFrequency},
            requests::{FeeCategoryRequest, FeeDiscountRequest},
        },
        hr::requests::DepartmentRequest,
    };
    use crate::storage::{MasterPayload, tables};

    fn context(tenant_id: Uuid) -> TenantContext {
        TenantContext {
            user_id: Uuid::new_v4(),
            role: StaffRole::Admin,
            tenant_id,
            tenant_code: "SCH01".to_string(),
            session: Some(AcademicSession {
                session_id: Uuid::from_u128(2025),
                session_year: "2025-26".to_string(),
            }),
        }
    }

    fn grid_request() -> GridRequest {
        GridRequest {
            draw: 1,
            start: 0,
            length: 10,
            search: None,
            order_column: None,
            order_dir: SortDirection::Asc,
        }
    }

    async fn storage() -> SeaOrmStorage {
        SeaOrmStorage::in_memory()
            .await
            .expect("in-memory storage")
    }

    async fn insert<P: MasterPayload>(
        storage: &SeaOrmStorage,
        ctx: &TenantContext,
        table: &'static MasterTable,
        payload: P,
    ) -> Uuid {
        storage
            .insert_master(ctx, table, payload.columns())
            .await
            .expect("insert")
    }

    async fn class(storage: &SeaOrmStorage, ctx: &TenantContext, name: &str) -> Uuid {
        let payload = ClassRequest {
            class_name: name.to_string(),
            sort_order: 0,
        };
        insert(storage, ctx, &tables::CLASSES, payload).await
    }

    async fn student(
        storage: &SeaOrmStorage,
        ctx: &TenantContext,
        class_id: Uuid,
        admission_no: &str,
    ) -> Uuid {
        let payload = StudentRequest {
            admission_no: admission_no.to_string(),
            student_name: format!("Student {admission_no}"),
            class_id,
            section_id: None,
            village_id: None,
            hostel_id: None,
            pickup_id: None,
        };
        insert(storage, ctx, &tables::STUDENTS, payload).await
    }

    /// 班级 + 两名学生 + 收费类别 + 四、五月收费计划
    async fn fee_fixture(
        storage: &SeaOrmStorage,
        ctx: &TenantContext,
    ) -> (Uuid, Vec<Uuid>, FeeMapPlanRequest, Uuid) {
        let class_id = class(storage, ctx, "VI").await;
        let students = vec![
            student(storage, ctx, class_id, "A001").await,
            student(storage, ctx, class_id, "A002").await,
        ];
        let category = FeeCategoryRequest {
            fee_name: "Tuition".to_string(),
            frequency: FeeFrequency::Monthly,
            sort_order: 1,
        };
        let fee_category_id = insert(storage, ctx, &tables::FEE_CATEGORIES, category).await;
        let plan = FeeMapPlanRequest {
            fee_category_id,
            class_id,
            section_id: None,
            amount: 1000.0,
            months: MonthFlags {
                apr: true,
                may: true,
                ..Default::default()
            },
        };
        let plan_id = storage
            .create_fee_map_plan(ctx, &plan)
            .await
            .expect("create plan");
        (class_id, students, plan, plan_id)
    }

    #[test]
    fn test_database_url_schemes() {
        assert_eq!(
            SeaOrmStorage::build_database_url("mariadb://app:pw@db:3306/school").unwrap(),
            "mysql://app:pw@db:3306/school"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://db/school").unwrap(),
            "postgres://db/school"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("data/school.db").unwrap(),
            "sqlite://data/school.db?mode=rwc"
        );
        assert!(SeaOrmStorage::build_database_url("mssql://db/school").is_err());
    }

    #[tokio::test]
    async fn test_grid_isolates_tenants_and_hides_deleted() {
        let storage = storage().await;
        let ctx = context(Uuid::new_v4());
        let other = context(Uuid::new_v4());

        class(&storage, &ctx, "I").await;
        let second = class(&storage, &ctx, "II").await;
        class(&storage, &other, "III").await;
        assert!(
            storage
                .soft_delete_master(&ctx, &tables::CLASSES, second)
                .await
                .unwrap()
        );

        let page = storage
            .grid_master(&ctx, &tables::CLASSES, &grid_request())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.filtered, 1);
        assert_eq!(page.rows.len(), 1);

        assert!(
            storage
                .find_master(&other, &tables::CLASSES, second)
                .await
                .unwrap()
                .is_none()
        );
    }

    fn class_names(page: &GridPage) -> Vec<String> {
        page.rows
            .iter()
            .map(|row| row.try_get::<String>("", "class_name").unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_grid_pages_follow_requested_order() {
        let storage = storage().await;
        let ctx = context(Uuid::new_v4());
        for name in ["Gamma", "Alpha", "Eta", "Beta", "Delta", "Zeta", "Epsilon"] {
            class(&storage, &ctx, name).await;
        }

        let request = GridRequest {
            start: 2,
            length: 2,
            order_column: Some("class_name".to_string()),
            ..grid_request()
        };
        let page = storage
            .grid_master(&ctx, &tables::CLASSES, &request)
            .await
            .unwrap();
        assert_eq!(page.total, 7);
        assert_eq!(page.filtered, 7);
        assert_eq!(class_names(&page), ["Delta", "Epsilon"]);

        let last = GridRequest {
            start: 6,
            ..request.clone()
        };
        let page = storage
            .grid_master(&ctx, &tables::CLASSES, &last)
            .await
            .unwrap();
        assert_eq!(class_names(&page), ["Zeta"]);

        let descending = GridRequest {
            start: 0,
            length: 3,
            order_dir: SortDirection::Desc,
            ..request
        };
        let page = storage
            .grid_master(&ctx, &tables::CLASSES, &descending)
            .await
            .unwrap();
        assert_eq!(class_names(&page), ["Zeta", "Gamma", "Eta"]);
    }

    #[tokio::test]
    async fn test_grid_search_treats_wildcards_literally() {
        let storage = storage().await;
        let ctx = context(Uuid::new_v4());
        for name in ["50% Off", "500 Club", "A_1", "AB1"] {
            class(&storage, &ctx, name).await;
        }

        let percent = GridRequest {
            search: Some("50%".to_string()),
            ..grid_request()
        };
        let page = storage
            .grid_master(&ctx, &tables::CLASSES, &percent)
            .await
            .unwrap();
        assert_eq!(page.total, 4);
        assert_eq!(page.filtered, 1);
        assert_eq!(class_names(&page), ["50% Off"]);

        let underscore = GridRequest {
            search: Some("a_".to_string()),
            ..grid_request()
        };
        let page = storage
            .grid_master(&ctx, &tables::CLASSES, &underscore)
            .await
            .unwrap();
        assert_eq!(page.filtered, 1);
        assert_eq!(class_names(&page), ["A_1"]);
    }

    #[tokio::test]
    async fn test_session_tables_hide_other_sessions() {
        let storage = storage().await;
        let ctx = context(Uuid::new_v4());
        let mut next_session = ctx.clone();
        next_session.session = Some(AcademicSession {
            session_id: Uuid::from_u128(2026),
            session_year: "2026-27".to_string(),
        });

        let id = class(&storage, &ctx, "X").await;

        let page = storage
            .grid_master(&next_session, &tables::CLASSES, &grid_request())
            .await
            .unwrap();
        assert_eq!(page.total, 0);
        assert!(page.rows.is_empty());
        assert!(
            storage
                .find_master(&next_session, &tables::CLASSES, id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            storage
                .master_options(&next_session, &tables::CLASSES)
                .await
                .unwrap()
                .is_empty()
        );

        let page = storage
            .grid_master(&ctx, &tables::CLASSES, &grid_request())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn test_fee_mappings_list_joined_option_labels() {
        let storage = storage().await;
        let ctx = context(Uuid::new_v4());
        let (_, students, _, plan_id) = fee_fixture(&storage, &ctx).await;

        let plans = storage
            .master_options(&ctx, &tables::FEE_MAP_PLANS)
            .await
            .unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].id, plan_id);
        assert_eq!(plans[0].name, "Tuition - VI");

        let discount = FeeDiscountRequest {
            discount_name: "Sibling".to_string(),
            discount_type: DiscountType::Percentage,
            discount_value: 10.0,
        };
        let fee_discount_id = insert(&storage, &ctx, &tables::FEE_DISCOUNTS, discount).await;
        let concession_id = storage
            .apply_fee_concession(
                &ctx,
                &FeeMapConcessionRequest {
                    fee_map_plan_id: plan_id,
                    student_id: students[0],
                    fee_discount_id,
                    remarks: None,
                },
            )
            .await
            .unwrap();

        let concessions = storage
            .master_options(&ctx, &tables::FEE_MAP_CONCESSIONS)
            .await
            .unwrap();
        assert_eq!(concessions.len(), 1);
        assert_eq!(concessions[0].id, concession_id);
        assert_eq!(concessions[0].name, "Student A001 - Sibling");

        assert!(
            storage
                .set_master_active(&ctx, &tables::FEE_MAP_CONCESSIONS, concession_id, false)
                .await
                .unwrap()
        );
        assert!(
            storage
                .master_options(&ctx, &tables::FEE_MAP_CONCESSIONS)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_duplicate_name_ignores_case_and_self() {
        let storage = storage().await;
        let ctx = context(Uuid::new_v4());
        let id = class(&storage, &ctx, "Nursery").await;

        let columns = ClassRequest {
            class_name: "nursery".to_string(),
            sort_order: 0,
        }
        .columns();
        assert!(
            storage
                .master_duplicate_exists(&ctx, &tables::CLASSES, &columns, None)
                .await
                .unwrap()
        );
        assert!(
            !storage
                .master_duplicate_exists(&ctx, &tables::CLASSES, &columns, Some(id))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_section_blocks_class_delete() {
        let storage = storage().await;
        let ctx = context(Uuid::new_v4());
        let class_id = class(&storage, &ctx, "VII").await;
        let section = SectionRequest {
            class_id,
            section_name: "A".to_string(),
            sort_order: 0,
        };
        insert(&storage, &ctx, &tables::SECTIONS, section).await;

        let dependents = storage
            .master_dependents(&ctx, &tables::CLASSES, class_id)
            .await
            .unwrap();
        assert_eq!(dependents.len(), 1);
        assert_eq!(dependents[0].count, 1);
        assert!(
            storage
                .master_reference_exists(&ctx, &tables::CLASSES, class_id)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_department_cycle_detection() {
        let storage = storage().await;
        let ctx = context(Uuid::new_v4());
        let root = insert(
            &storage,
            &ctx,
            &tables::DEPARTMENTS,
            DepartmentRequest {
                department_name: "Administration".to_string(),
                department_code: None,
                parent_dept_id: None,
            },
        )
        .await;
        let child = insert(
            &storage,
            &ctx,
            &tables::DEPARTMENTS,
            DepartmentRequest {
                department_name: "Accounts".to_string(),
                department_code: None,
                parent_dept_id: Some(root),
            },
        )
        .await;

        assert!(storage.department_creates_cycle(&ctx, root, root).await.unwrap());
        assert!(storage.department_creates_cycle(&ctx, root, child).await.unwrap());
        assert!(!storage.department_creates_cycle(&ctx, child, root).await.unwrap());

        let nodes = storage.list_department_nodes(&ctx).await.unwrap();
        assert_eq!(nodes.len(), 2);
    }

    #[tokio::test]
    async fn test_fee_plan_generates_ledger_and_applies_concession() {
        let storage = storage().await;
        let ctx = context(Uuid::new_v4());
        let (_, students, plan, plan_id) = fee_fixture(&storage, &ctx).await;

        let ledger = storage.list_student_ledger(&ctx, students[0]).await.unwrap();
        assert_eq!(ledger.len(), 2);
        assert!(ledger.iter().all(|row| row.amount == 1000.0 && row.fee_name == "Tuition"));

        let discount = FeeDiscountRequest {
            discount_name: "Sibling".to_string(),
            discount_type: DiscountType::Percentage,
            discount_value: 25.0,
        };
        let fee_discount_id = insert(&storage, &ctx, &tables::FEE_DISCOUNTS, discount).await;
        let concession = FeeMapConcessionRequest {
            fee_map_plan_id: plan_id,
            student_id: students[0],
            fee_discount_id,
            remarks: None,
        };
        let concession_id = storage
            .apply_fee_concession(&ctx, &concession)
            .await
            .unwrap();

        let ledger = storage.list_student_ledger(&ctx, students[0]).await.unwrap();
        assert!(ledger.iter().all(|row| row.concession == 250.0));
        let untouched = storage.list_student_ledger(&ctx, students[1]).await.unwrap();
        assert!(untouched.iter().all(|row| row.concession == 0.0));

        // 已缴的月份在计划变更后保持不变，未缴月份按新金额重建并重新计算减免
        let paid_row = ledger[0].id;
        let outcome = storage.record_fee_payment(&ctx, paid_row, 100.0).await.unwrap();
        assert!(matches!(outcome, PaymentOutcome::Recorded(ref entry) if entry.paid_amount == 100.0));

        let raised = FeeMapPlanRequest {
            amount: 1200.0,
            ..plan.clone()
        };
        assert!(storage.update_fee_map_plan(&ctx, plan_id, &raised).await.unwrap());
        let ledger = storage.list_student_ledger(&ctx, students[0]).await.unwrap();
        assert_eq!(ledger.len(), 2);
        let kept = ledger.iter().find(|row| row.id == paid_row).unwrap();
        assert_eq!(kept.amount, 1000.0);
        let rebuilt = ledger.iter().find(|row| row.id != paid_row).unwrap();
        assert_eq!(rebuilt.amount, 1200.0);
        assert_eq!(rebuilt.concession, 300.0);

        assert!(storage.remove_fee_concession(&ctx, concession_id).await.unwrap());
        let ledger = storage.list_student_ledger(&ctx, students[0]).await.unwrap();
        let rebuilt = ledger.iter().find(|row| row.id != paid_row).unwrap();
        assert_eq!(rebuilt.concession, 0.0);
    }

    #[tokio::test]
    async fn test_payment_is_capped_and_settled_rows_reject_more() {
        let storage = storage().await;
        let ctx = context(Uuid::new_v4());
        let (_, students, _, _) = fee_fixture(&storage, &ctx).await;
        let ledger = storage.list_student_ledger(&ctx, students[1]).await.unwrap();
        let row_id = ledger[0].id;

        let outcome = storage.record_fee_payment(&ctx, row_id, 1500.0).await.unwrap();
        assert!(matches!(outcome, PaymentOutcome::Recorded(ref entry) if entry.paid_amount == 1000.0));

        let outcome = storage.record_fee_payment(&ctx, row_id, 10.0).await.unwrap();
        assert!(matches!(outcome, PaymentOutcome::NothingDue));

        let outcome = storage
            .record_fee_payment(&ctx, Uuid::new_v4(), 10.0)
            .await
            .unwrap();
        assert!(matches!(outcome, PaymentOutcome::NotFound));
    }

    #[tokio::test]
    async fn test_delete_plan_removes_unpaid_rows_only() {
        let storage = storage().await;
        let ctx = context(Uuid::new_v4());
        let (_, students, _, plan_id) = fee_fixture(&storage, &ctx).await;
        let ledger = storage.list_student_ledger(&ctx, students[0]).await.unwrap();
        storage
            .record_fee_payment(&ctx, ledger[0].id, 50.0)
            .await
            .unwrap();

        assert!(storage.delete_fee_map_plan(&ctx, plan_id).await.unwrap());
        let ledger = storage.list_student_ledger(&ctx, students[0]).await.unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].paid_amount, 50.0);
        assert!(
            storage
                .list_student_ledger(&ctx, students[1])
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_replace_grade_formulas() {
        let storage = storage().await;
        let ctx = context(Uuid::new_v4());
        let class_id = class(&storage, &ctx, "IX").await;

        storage
            .replace_grade_formulas(
                &ctx,
                class_id,
                crate::models::grade_formulas::entities::builtin_defaults(),
            )
            .await
            .unwrap();
        assert_eq!(storage.list_grade_formulas(&ctx, class_id).await.unwrap().len(), 4);

        storage
            .replace_grade_formulas(
                &ctx,
                class_id,
                vec![
                    GradeComponent::new("PT", "Periodic Test", 20.0, 50.0, 1),
                    GradeComponent::new("HY", "Half Yearly", 80.0, 100.0, 2),
                ],
            )
            .await
            .unwrap();
        let saved = storage.list_grade_formulas(&ctx, class_id).await.unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].component_code, "PT");
        assert_eq!(saved[0].weightage, 20.0);
        assert_eq!(saved[0].max_marks, 50.0);
    }

    #[tokio::test]
    async fn test_fee_defaulter_rows_sum_selected_months() {
        let storage = storage().await;
        let ctx = context(Uuid::new_v4());
        let (class_id, students, _, _) = fee_fixture(&storage, &ctx).await;
        let ledger = storage.list_student_ledger(&ctx, students[0]).await.unwrap();
        for row in &ledger {
            storage.record_fee_payment(&ctx, row.id, 1000.0).await.unwrap();
        }

        let rows = storage
            .fee_defaulter_rows(&ctx, Some(class_id), None, &[4, 5])
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        let settled = rows.iter().find(|r| r.student_id == students[0]).unwrap();
        assert_eq!(settled.total_paid, 2000.0);
        let owing = rows.iter().find(|r| r.student_id == students[1]).unwrap();
        assert_eq!(owing.total_amount, 2000.0);
        assert_eq!(owing.total_paid, 0.0);

        let april_only = storage
            .fee_defaulter_rows(&ctx, None, None, &[4])
            .await
            .unwrap();
        assert!(april_only.iter().all(|r| r.total_amount == 1000.0));
    }
}
