pub mod ledger;
pub mod payment;

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use uuid::Uuid;

use crate::cache::ObjectCache;
use crate::models::fees::requests::PaymentRequest;
use crate::storage::Storage;

pub struct FeeService {
    storage: Option<Arc<dyn Storage>>,
    cache: Option<Arc<dyn ObjectCache>>,
}

impl FeeService {
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

    // 学生收费明细
    pub async fn student_ledger(
        &self,
        request: &HttpRequest,
        student_id: Uuid,
    ) -> ActixResult<HttpResponse> {
        ledger::student_ledger(self, request, student_id).await
    }

    // 登记缴费
    pub async fn record_payment(
        &self,
        request: &HttpRequest,
        ledger_id: Uuid,
        payload: PaymentRequest,
    ) -> ActixResult<HttpResponse> {
        payment::record_payment(self, request, ledger_id, payload).await
    }
}
