use std::sync::Arc;

use sea_orm::{QueryResult, Value};
use uuid::Uuid;

use crate::errors::Result;
use crate::models::{
    GridRequest, MonthFlags, OptionItem, TenantContext,
    configurations::entities::Configuration,
    fees::{
        entities::LedgerEntry,
        requests::{FeeMapConcessionRequest, FeeMapPlanRequest},
        responses::StudentLedgerRow,
    },
    grade_formulas::entities::GradeComponent,
    hr::responses::DepartmentNodeRow,
    reports::responses::FeeDefaulterRow,
};

pub mod master_table;
pub mod sea_orm_storage;
pub mod tables;

pub use master_table::{
    GridColumn, LabelPart, MasterPayload, MasterScope, MasterTable, Reference, ScopeFilter,
    Uniqueness,
};

/// 表格查询结果（未解码的行）
pub struct GridPage {
    pub total: i64,
    pub filtered: i64,
    pub rows: Vec<QueryResult>,
}

/// 引用当前记录的其他主数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependent {
    pub label: &'static str,
    pub count: i64,
}

/// 缴费结果
#[derive(Debug, Clone)]
pub enum PaymentOutcome {
    Recorded(LedgerEntry),
    NothingDue,
    NotFound,
}

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 通用主数据方法
    // 表格分页查询
    async fn grid_master(
        &self,
        ctx: &TenantContext,
        table: &'static MasterTable,
        request: &GridRequest,
    ) -> Result<GridPage>;
    // 通过ID获取未删除的记录
    async fn find_master(
        &self,
        ctx: &TenantContext,
        table: &'static MasterTable,
        id: Uuid,
    ) -> Result<Option<QueryResult>>;
    // 下拉框选项
    async fn master_options(
        &self,
        ctx: &TenantContext,
        table: &'static MasterTable,
    ) -> Result<Vec<OptionItem>>;
    // 新增记录，返回新ID
    async fn insert_master(
        &self,
        ctx: &TenantContext,
        table: &'static MasterTable,
        columns: Vec<(&'static str, Value)>,
    ) -> Result<Uuid>;
    // 更新记录
    async fn update_master(
        &self,
        ctx: &TenantContext,
        table: &'static MasterTable,
        id: Uuid,
        columns: Vec<(&'static str, Value)>,
    ) -> Result<bool>;
    // 软删除
    async fn soft_delete_master(
        &self,
        ctx: &TenantContext,
        table: &'static MasterTable,
        id: Uuid,
    ) -> Result<bool>;
    // 启用/停用
    async fn set_master_active(
        &self,
        ctx: &TenantContext,
        table: &'static MasterTable,
        id: Uuid,
        active: bool,
    ) -> Result<bool>;
    // 重复校验
    async fn master_duplicate_exists(
        &self,
        ctx: &TenantContext,
        table: &'static MasterTable,
        columns: &[(&'static str, Value)],
        exclude_id: Option<Uuid>,
    ) -> Result<bool>;
    // 引用目标是否存在
    async fn master_reference_exists(
        &self,
        ctx: &TenantContext,
        target: &'static MasterTable,
        id: Uuid,
    ) -> Result<bool>;
    // 引用当前记录的其他主数据
    async fn master_dependents(
        &self,
        ctx: &TenantContext,
        table: &'static MasterTable,
        id: Uuid,
    ) -> Result<Vec<Dependent>>;

    /// 部门
    // 将 parent 设为 id 的上级是否形成环
    async fn department_creates_cycle(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        parent_id: Uuid,
    ) -> Result<bool>;
    // 列出所有未删除部门
    async fn list_department_nodes(&self, ctx: &TenantContext) -> Result<Vec<DepartmentNodeRow>>;

    /// 交通
    // 只更新月份标记
    async fn update_pickup_months(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        months: MonthFlags,
    ) -> Result<bool>;

    /// 配置
    async fn get_configuration(
        &self,
        ctx: &TenantContext,
        key: &str,
    ) -> Result<Option<Configuration>>;
    async fn upsert_configuration(
        &self,
        ctx: &TenantContext,
        key: &str,
        value: &str,
        description: Option<&str>,
    ) -> Result<Configuration>;

    /// 收费
    // 新建收费计划并生成学生明细（事务）
    async fn create_fee_map_plan(
        &self,
        ctx: &TenantContext,
        plan: &FeeMapPlanRequest,
    ) -> Result<Uuid>;
    // 更新收费计划并重建未缴明细（事务）
    async fn update_fee_map_plan(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        plan: &FeeMapPlanRequest,
    ) -> Result<bool>;
    // 删除收费计划及未缴明细（事务）
    async fn delete_fee_map_plan(&self, ctx: &TenantContext, id: Uuid) -> Result<bool>;
    // 新增减免并写入未缴明细（事务）
    async fn apply_fee_concession(
        &self,
        ctx: &TenantContext,
        concession: &FeeMapConcessionRequest,
    ) -> Result<Uuid>;
    // 修改减免（事务）
    async fn update_fee_concession(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        concession: &FeeMapConcessionRequest,
    ) -> Result<bool>;
    // 撤销减免（事务）
    async fn remove_fee_concession(&self, ctx: &TenantContext, id: Uuid) -> Result<bool>;
    // 学生收费明细
    async fn list_student_ledger(
        &self,
        ctx: &TenantContext,
        student_id: Uuid,
    ) -> Result<Vec<StudentLedgerRow>>;
    // 登记缴费
    async fn record_fee_payment(
        &self,
        ctx: &TenantContext,
        ledger_id: Uuid,
        amount: f64,
    ) -> Result<PaymentOutcome>;

    /// 成绩公式
    async fn list_grade_formulas(
        &self,
        ctx: &TenantContext,
        class_id: Uuid,
    ) -> Result<Vec<GradeComponent>>;
    async fn replace_grade_formulas(
        &self,
        ctx: &TenantContext,
        class_id: Uuid,
        components: Vec<GradeComponent>,
    ) -> Result<()>;

    /// 报表
    // 指定月份范围内的学生欠费汇总
    async fn fee_defaulter_rows(
        &self,
        ctx: &TenantContext,
        class_id: Option<Uuid>,
        section_id: Option<Uuid>,
        months: &[i32],
    ) -> Result<Vec<FeeDefaulterRow>>;

    /// 系统
    async fn ping(&self) -> Result<()>;
}

/// 创建存储后端
pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
