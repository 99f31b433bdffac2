pub mod months;

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use uuid::Uuid;

use crate::models::MonthFlags;
use crate::storage::Storage;

pub struct TransportService {
    storage: Option<Arc<dyn Storage>>,
}

impl TransportService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
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

    // 读取上车点的收费月份
    pub async fn get_months(&self, request: &HttpRequest, id: Uuid) -> ActixResult<HttpResponse> {
        months::get_months(self, request, id).await
    }

    // 替换上车点的收费月份
    pub async fn put_months(
        &self,
        request: &HttpRequest,
        id: Uuid,
        flags: MonthFlags,
    ) -> ActixResult<HttpResponse> {
        months::put_months(self, request, id, flags).await
    }
}
