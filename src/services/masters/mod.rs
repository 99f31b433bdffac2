//! 通用主数据服务
//!
//! 16 张主数据表共用同一套表格、下拉、详情、增删改与启停流程。各资源通过
//! [`MasterResource`] 提供表描述、记录类型和写入负载，需要额外业务规则的资源
//! （部门环检测、收费计划级联、配置缓存失效）覆盖对应的钩子。

pub mod active;
pub mod create;
pub mod delete;
pub mod get;
pub mod grid;
pub mod options;
pub mod resources;
pub mod update;

use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use async_trait::async_trait;
use sea_orm::{FromQueryResult, QueryResult};
use serde::Serialize;
use ts_rs::TS;
use uuid::Uuid;

use crate::cache::ObjectCache;
use crate::errors::{Result, SchoolAdminError};
use crate::models::{StaffRole, TenantContext};
use crate::storage::{MasterPayload, MasterTable, Storage};

/// 写入钩子可用的依赖
pub struct ResourceContext<'a> {
    pub storage: &'a dyn Storage,
    pub cache: &'a dyn ObjectCache,
    pub tenant: &'a TenantContext,
}

#[async_trait]
pub trait MasterResource: Default + Send + Sync + 'static {
    type Record: FromQueryResult + Serialize + TS + Send + Sync + 'static;
    type Payload: MasterPayload;

    const TABLE: &'static MasterTable;
    /// 路由前缀，如 `/api/v1/classes`
    const PATH: &'static str;

    /// 允许写入的角色
    fn write_roles() -> &'static [&'static StaffRole] {
        StaffRole::admin_roles()
    }

    /// 通用校验之后的业务校验，`id` 为 `None` 表示新增
    async fn check(
        &self,
        _rc: &ResourceContext<'_>,
        _id: Option<Uuid>,
        _payload: &Self::Payload,
    ) -> Result<()> {
        Ok(())
    }

    async fn insert(&self, rc: &ResourceContext<'_>, payload: &Self::Payload) -> Result<Uuid> {
        rc.storage
            .insert_master(rc.tenant, Self::TABLE, payload.columns())
            .await
    }

    async fn update(
        &self,
        rc: &ResourceContext<'_>,
        id: Uuid,
        payload: &Self::Payload,
    ) -> Result<bool> {
        rc.storage
            .update_master(rc.tenant, Self::TABLE, id, payload.columns())
            .await
    }

    async fn remove(&self, rc: &ResourceContext<'_>, id: Uuid) -> Result<bool> {
        rc.storage.soft_delete_master(rc.tenant, Self::TABLE, id).await
    }

    /// 写入成功后调用（新增、修改、删除、启停）
    async fn after_write(&self, _rc: &ResourceContext<'_>, _record: Option<&Self::Record>) {}
}

pub struct MasterService<R: MasterResource> {
    resource: R,
    storage: Option<Arc<dyn Storage>>,
    cache: Option<Arc<dyn ObjectCache>>,
}

impl<R: MasterResource> MasterService<R> {
    pub fn new_lazy() -> Self {
        Self {
            resource: R::default(),
            storage: None,
            cache: None,
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Arc<dyn ObjectCache> {
        if let Some(cache) = &self.cache {
            cache.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
                .expect("Cache not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 表格分页查询
    pub async fn grid(
        &self,
        request: &HttpRequest,
        params: HashMap<String, String>,
    ) -> ActixResult<HttpResponse> {
        grid::grid(self, request, params).await
    }

    // 下拉框选项
    pub async fn options(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        options::options(self, request).await
    }

    pub async fn get(&self, request: &HttpRequest, id: Uuid) -> ActixResult<HttpResponse> {
        get::get(self, request, id).await
    }

    pub async fn create(
        &self,
        request: &HttpRequest,
        payload: R::Payload,
    ) -> ActixResult<HttpResponse> {
        create::create(self, request, payload).await
    }

    pub async fn update(
        &self,
        request: &HttpRequest,
        id: Uuid,
        payload: R::Payload,
    ) -> ActixResult<HttpResponse> {
        update::update(self, request, id, payload).await
    }

    pub async fn delete(&self, request: &HttpRequest, id: Uuid) -> ActixResult<HttpResponse> {
        delete::delete(self, request, id).await
    }

    // 启用/停用
    pub async fn set_active(
        &self,
        request: &HttpRequest,
        id: Uuid,
        active: bool,
    ) -> ActixResult<HttpResponse> {
        active::set_active(self, request, id, active).await
    }
}

/// 解码原始行
pub(crate) fn decode<T: FromQueryResult>(row: &QueryResult) -> Result<T> {
    T::from_query_result(row, "")
        .map_err(|e| SchoolAdminError::database_operation(format!("记录解码失败: {e}")))
}

/// 读取单条记录并解码
pub(crate) async fn load_record<R: MasterResource>(
    storage: &dyn Storage,
    ctx: &TenantContext,
    id: Uuid,
) -> Result<Option<R::Record>> {
    match storage.find_master(ctx, R::TABLE, id).await? {
        Some(row) => decode::<R::Record>(&row).map(Some),
        None => Ok(None),
    }
}

/// 校验负载字段、引用存在性与唯一性
pub(crate) async fn validate_payload<R: MasterResource>(
    rc: &ResourceContext<'_>,
    id: Option<Uuid>,
    payload: &R::Payload,
) -> Result<()> {
    payload.validate().map_err(SchoolAdminError::validation)?;

    for (column, target_id) in payload.references() {
        let Some(reference) = R::TABLE.references.iter().find(|r| r.column == column) else {
            continue;
        };
        let Some(target) = crate::storage::tables::find_table(reference.table) else {
            continue;
        };
        if !rc
            .storage
            .master_reference_exists(rc.tenant, target, target_id)
            .await?
        {
            return Err(SchoolAdminError::invalid_reference(format!(
                "{} {} does not exist",
                reference.label, target_id
            )));
        }
    }

    let columns = payload.columns();
    if rc
        .storage
        .master_duplicate_exists(rc.tenant, R::TABLE, &columns, id)
        .await?
    {
        return Err(SchoolAdminError::duplicate(format!(
            "{} '{}' already exists",
            R::TABLE.label,
            payload.display_name()
        )));
    }
    Ok(())
}
