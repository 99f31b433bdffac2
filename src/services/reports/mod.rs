pub mod export;
pub mod fee_defaulters;

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::cache::ObjectCache;
use crate::models::reports::requests::FeeDefaulterQuery;
use crate::storage::Storage;

pub struct ReportService {
    storage: Option<Arc<dyn Storage>>,
    cache: Option<Arc<dyn ObjectCache>>,
}

impl ReportService {
    pub fn new_lazy() -> Self {
        Self {
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

    // 欠费学生报表
    pub async fn fee_defaulters(
        &self,
        request: &HttpRequest,
        query: FeeDefaulterQuery,
    ) -> ActixResult<HttpResponse> {
        fee_defaulters::fee_defaulters(self, request, query).await
    }

    // 欠费学生报表导出（XLSX）
    pub async fn export_fee_defaulters(
        &self,
        request: &HttpRequest,
        query: FeeDefaulterQuery,
    ) -> ActixResult<HttpResponse> {
        export::export_fee_defaulters(self, request, query).await
    }
}
