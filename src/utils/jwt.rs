use crate::config::AppConfig;
use crate::models::{AcademicSession, StaffRole, TenantContext};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// JWT Claims 结构体（由上游身份服务签发）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // Subject (user ID)
    pub role: String, // 职员角色
    pub tenant_id: String,
    pub tenant_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_year: Option<String>,
    pub token_type: String, // token类型: 只接受 "access"
    pub exp: usize,         // Expiration time (时间戳)
    pub iat: usize,         // Issued at (签发时间)
}

impl Claims {
    /// 转换为请求上下文
    pub fn into_context(self) -> Result<TenantContext, String> {
        let user_id =
            Uuid::parse_str(&self.sub).map_err(|_| "Invalid user ID in JWT".to_string())?;
        let role = self.role.parse::<StaffRole>()?;
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|_| "Invalid tenant ID in JWT".to_string())?;
        if self.tenant_code.trim().is_empty() {
            return Err("Missing tenant code in JWT".to_string());
        }

        let session = match (self.session_id, self.session_year) {
            (Some(id), Some(year)) => Some(AcademicSession {
                session_id: Uuid::parse_str(&id)
                    .map_err(|_| "Invalid session ID in JWT".to_string())?,
                session_year: year,
            }),
            (None, None) => None,
            _ => return Err("Session ID and session year must be provided together".to_string()),
        };

        Ok(TenantContext {
            user_id,
            role,
            tenant_id,
            tenant_code: self.tenant_code,
            session,
        })
    }
}

pub struct JwtUtils;

impl JwtUtils {
    // 获取 JWT 密钥
    fn get_secret() -> String {
        AppConfig::get().jwt.secret.clone()
    }

    // 为上下文签发 Access Token（上游服务与测试使用）
    pub fn generate_access_token(ctx: &TenantContext) -> Result<String, jsonwebtoken::errors::Error> {
        let config = AppConfig::get();
        Self::generate_token_with_secret(
            ctx,
            &Self::get_secret(),
            chrono::Duration::minutes(config.jwt.access_token_expiry),
        )
    }

    pub fn generate_token_with_secret(
        ctx: &TenantContext,
        secret: &str,
        expiry_duration: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let expiration = now + expiry_duration;

        let claims = Claims {
            sub: ctx.user_id.to_string(),
            role: ctx.role.to_string(),
            tenant_id: ctx.tenant_id.to_string(),
            tenant_code: ctx.tenant_code.clone(),
            session_id: ctx.session.as_ref().map(|s| s.session_id.to_string()),
            session_year: ctx.session.as_ref().map(|s| s.session_year.clone()),
            token_type: "access".to_string(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let encoding_key = EncodingKey::from_secret(secret.as_ref());
        encode(&Header::default(), &claims, &encoding_key)
    }

    // 验证 Access Token
    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let config = AppConfig::get();
        Self::verify_with_secret(token, &Self::get_secret(), config.jwt.leeway)
    }

    pub fn verify_with_secret(
        token: &str,
        secret: &str,
        leeway: u64,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        let mut validation = Validation::default();
        validation.leeway = leeway;

        let claims =
            decode::<Claims>(token, &decoding_key, &validation).map(|token_data| token_data.claims)?;
        if claims.token_type != "access" {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    fn context() -> TenantContext {
        TenantContext {
            user_id: Uuid::new_v4(),
            role: StaffRole::Accountant,
            tenant_id: Uuid::new_v4(),
            tenant_code: "GVS".to_string(),
            session: Some(AcademicSession {
                session_id: Uuid::new_v4(),
                session_year: "2025-26".to_string(),
            }),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let ctx = context();
        let token =
            JwtUtils::generate_token_with_secret(&ctx, SECRET, chrono::Duration::minutes(5))
                .unwrap();
        let restored = JwtUtils::verify_with_secret(&token, SECRET, 0)
            .unwrap()
            .into_context()
            .unwrap();
        assert_eq!(restored.user_id, ctx.user_id);
        assert_eq!(restored.role, StaffRole::Accountant);
        assert_eq!(restored.tenant_id, ctx.tenant_id);
        assert_eq!(restored.session, ctx.session);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token =
            JwtUtils::generate_token_with_secret(&context(), SECRET, chrono::Duration::minutes(5))
                .unwrap();
        assert!(JwtUtils::verify_with_secret(&token, "other-secret", 0).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = JwtUtils::generate_token_with_secret(
            &context(),
            SECRET,
            chrono::Duration::minutes(-10),
        )
        .unwrap();
        assert!(JwtUtils::verify_with_secret(&token, SECRET, 0).is_err());
    }

    #[test]
    fn test_half_session_rejected() {
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            role: "admin".into(),
            tenant_id: Uuid::new_v4().to_string(),
            tenant_code: "GVS".into(),
            session_id: Some(Uuid::new_v4().to_string()),
            session_year: None,
            token_type: "access".into(),
            exp: 0,
            iat: 0,
        };
        assert!(claims.into_context().is_err());
    }

    #[test]
    fn test_unknown_role_rejected() {
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            role: "principal".into(),
            tenant_id: Uuid::new_v4().to_string(),
            tenant_code: "GVS".into(),
            session_id: None,
            session_year: None,
            token_type: "access".into(),
            exp: 0,
            iat: 0,
        };
        assert!(claims.into_context().is_err());
    }
}
