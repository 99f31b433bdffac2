pub mod get;
pub mod merge;
pub mod replace;

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use uuid::Uuid;

use crate::cache::ObjectCache;
use crate::models::grade_formulas::requests::ReplaceGradeFormulasRequest;
use crate::storage::Storage;

pub struct GradeFormulaService {
    storage: Option<Arc<dyn Storage>>,
    cache: Option<Arc<dyn ObjectCache>>,
}

impl GradeFormulaService {
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

    pub async fn get(&self, request: &HttpRequest, class_id: Uuid) -> ActixResult<HttpResponse> {
        get::get_formulas(self, request, class_id).await
    }

    pub async fn replace(
        &self,
        request: &HttpRequest,
        class_id: Uuid,
        payload: ReplaceGradeFormulasRequest,
    ) -> ActixResult<HttpResponse> {
        replace::replace_formulas(self, request, class_id, payload).await
    }
}
