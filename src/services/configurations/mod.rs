pub mod lookup;
pub mod value;

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

pub use lookup::{lookup_value, session_start_month};

use crate::cache::ObjectCache;
use crate::models::configurations::requests::ConfigurationValueRequest;
use crate::storage::Storage;

pub struct ConfigurationService {
    storage: Option<Arc<dyn Storage>>,
    cache: Option<Arc<dyn ObjectCache>>,
}

impl ConfigurationService {
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

    // 按键读取
    pub async fn get_value(&self, request: &HttpRequest, key: String) -> ActixResult<HttpResponse> {
        value::get_value(self, request, key).await
    }

    // 按键写入（不存在时新建）
    pub async fn put_value(
        &self,
        request: &HttpRequest,
        key: String,
        payload: ConfigurationValueRequest,
    ) -> ActixResult<HttpResponse> {
        value::put_value(self, request, key, payload).await
    }
}
