//! 配置存储操作

use sea_orm::{ConnectionTrait, FromQueryResult};

use super::SeaOrmStorage;
use super::master::{find_as, insert_row, update_row};
use super::sql::SqlBuilder;
use crate::errors::{Result, SchoolAdminError};
use crate::models::{TenantContext, configurations::entities::Configuration};
use crate::storage::{ScopeFilter, tables::CONFIGURATIONS};

impl SeaOrmStorage {
    /// 按键获取配置（键区分大小写，存储时已统一为小写）
    pub async fn get_configuration_impl(
        &self,
        ctx: &TenantContext,
        key: &str,
    ) -> Result<Option<Configuration>> {
        let mut b = SqlBuilder::new(self.db.get_database_backend());
        b.push("SELECT t.* FROM ")
            .ident(CONFIGURATIONS.table)
            .push(" t WHERE ")
            .scope("t", ctx.tenant_id, None)
            .push(" AND ")
            .column("t", "is_deleted")
            .push(" = ")
            .bind(false)
            .push(" AND ")
            .column("t", "config_key")
            .push(" = ")
            .bind(key);

        Configuration::find_by_statement(b.build())
            .one(&self.db)
            .await
            .map_err(|e| SchoolAdminError::database_operation(format!("查询配置失败: {e}")))
    }

    /// 按键写入配置，不存在则新建
    pub async fn upsert_configuration_impl(
        &self,
        ctx: &TenantContext,
        key: &str,
        value: &str,
        description: Option<&str>,
    ) -> Result<Configuration> {
        let scope = ScopeFilter::resolve(ctx, CONFIGURATIONS.scope)?;

        let id = match self.get_configuration_impl(ctx, key).await? {
            Some(existing) => {
                let mut columns: Vec<(&'static str, sea_orm::Value)> =
                    vec![("config_value", value.into())];
                if let Some(description) = description {
                    columns.push(("description", description.into()));
                }
                update_row(&self.db, ctx, &CONFIGURATIONS, scope, existing.id, columns).await?;
                existing.id
            }
            None => {
                insert_row(
                    &self.db,
                    ctx,
                    &CONFIGURATIONS,
                    scope,
                    vec![
                        ("config_key", key.into()),
                        ("config_value", value.into()),
                        ("description", description.map(str::to_string).into()),
                    ],
                )
                .await?
            }
        };

        find_as::<Configuration, _>(&self.db, &CONFIGURATIONS, scope, id)
            .await?
            .ok_or_else(|| SchoolAdminError::not_found(format!("Configuration {key} not found")))
    }
}
