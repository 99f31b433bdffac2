//! 交通存储操作

use uuid::Uuid;

use super::SeaOrmStorage;
use super::master::update_row;
use crate::errors::Result;
use crate::models::{MonthFlags, TenantContext};
use crate::storage::{ScopeFilter, tables::TRANSPORT_PICKUPS};

impl SeaOrmStorage {
    /// 只替换上车点的 12 个月份标记
    pub async fn update_pickup_months_impl(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        months: MonthFlags,
    ) -> Result<bool> {
        let scope = ScopeFilter::resolve(ctx, TRANSPORT_PICKUPS.scope)?;
        update_row(
            &self.db,
            ctx,
            &TRANSPORT_PICKUPS,
            scope,
            id,
            months.columns(),
        )
        .await
    }
}
