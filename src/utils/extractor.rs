//! 安全的路径参数提取器
//!
//! 路径中的 UUID 解析失败时直接返回统一格式的 400 响应，
//! 而不是 actix 默认的纯文本错误。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};
use uuid::Uuid;

use crate::models::{ApiResponse, ErrorCode};

fn bad_path(message: String) -> actix_web::Error {
    InternalError::from_response(
        message.clone(),
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message)),
    )
    .into()
}

fn extract_uuid(req: &HttpRequest, name: &str) -> Result<Uuid, actix_web::Error> {
    let raw = req
        .match_info()
        .get(name)
        .ok_or_else(|| bad_path(format!("Missing path parameter: {name}")))?;
    Uuid::parse_str(raw).map_err(|_| bad_path(format!("Invalid {name}: {raw}")))
}

macro_rules! define_safe_uuid {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub Uuid);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                ready(extract_uuid(req, $param).map($name))
            }
        }
    };
}

define_safe_uuid!(SafeId, "id");
define_safe_uuid!(SafeClassId, "class_id");
define_safe_uuid!(SafeStudentId, "student_id");

/// 配置键路径参数
#[derive(Debug, Clone)]
pub struct SafeConfigKey(pub String);

impl FromRequest for SafeConfigKey {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = req
            .match_info()
            .get("key")
            .map(|k| k.trim().to_string())
            .ok_or_else(|| bad_path("Missing path parameter: key".to_string()))
            .and_then(|key| {
                super::validate::validate_config_key(&key)
                    .map(|_| SafeConfigKey(key))
                    .map_err(|e| bad_path(e.to_string()))
            });
        ready(result)
    }
}
