//! 租户与学年上下文
//!
//! 由 `RequireJWT` 中间件从上游签发的令牌中解析，并放入请求扩展。

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{Result, SchoolAdminError};

/// 职员角色
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Admin,
    Accountant,
    Staff,
}

impl StaffRole {
    pub const ADMIN_ROLES: &'static [&'static StaffRole] = &[&StaffRole::Admin];
    pub const FEE_ROLES: &'static [&'static StaffRole] =
        &[&StaffRole::Admin, &StaffRole::Accountant];

    /// 可维护主数据的角色
    pub fn admin_roles() -> &'static [&'static StaffRole] {
        Self::ADMIN_ROLES
    }

    /// 可维护收费数据与查看收费报表的角色
    pub fn fee_roles() -> &'static [&'static StaffRole] {
        Self::FEE_ROLES
    }
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StaffRole::Admin => write!(f, "admin"),
            StaffRole::Accountant => write!(f, "accountant"),
            StaffRole::Staff => write!(f, "staff"),
        }
    }
}

impl std::str::FromStr for StaffRole {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "admin" => Ok(StaffRole::Admin),
            "accountant" => Ok(StaffRole::Accountant),
            "staff" => Ok(StaffRole::Staff),
            _ => Err(format!("Invalid staff role: {s}")),
        }
    }
}

/// 当前学年
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcademicSession {
    pub session_id: Uuid,
    pub session_year: String,
}

/// 请求级租户上下文
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub user_id: Uuid,
    pub role: StaffRole,
    pub tenant_id: Uuid,
    pub tenant_code: String,
    pub session: Option<AcademicSession>,
}

impl TenantContext {
    /// 学年作用域的操作必须携带学年
    pub fn require_session(&self) -> Result<&AcademicSession> {
        self.session.as_ref().ok_or_else(|| {
            SchoolAdminError::session_required("No academic session selected for this request")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(session: Option<AcademicSession>) -> TenantContext {
        TenantContext {
            user_id: Uuid::new_v4(),
            role: StaffRole::Admin,
            tenant_id: Uuid::new_v4(),
            tenant_code: "T001".to_string(),
            session,
        }
    }

    #[test]
    fn test_role_round_trip() {
        for role in [StaffRole::Admin, StaffRole::Accountant, StaffRole::Staff] {
            assert_eq!(role.to_string().parse::<StaffRole>().unwrap(), role);
        }
        assert!("teacher".parse::<StaffRole>().is_err());
    }

    #[test]
    fn test_fee_roles_include_accountant() {
        assert!(StaffRole::fee_roles().contains(&&StaffRole::Accountant));
        assert!(!StaffRole::admin_roles().contains(&&StaffRole::Accountant));
    }

    #[test]
    fn test_require_session() {
        assert!(context(None).require_session().is_err());

        let session = AcademicSession {
            session_id: Uuid::new_v4(),
            session_year: "2025-26".to_string(),
        };
        let ctx = context(Some(session.clone()));
        assert_eq!(ctx.require_session().unwrap(), &session);
    }
}
