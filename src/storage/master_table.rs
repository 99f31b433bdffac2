//! 主数据表描述
//!
//! 每张主数据表都有相同的形状：UUID 主键、租户（及学年）作用域、审计列、
//! `is_active` / `is_deleted` 标记。描述符记录各表差异的部分，供通用的
//! 表格查询、重复校验、引用校验和软删除使用。

use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::errors::Result;
use crate::models::TenantContext;

/// 作用域
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasterScope {
    /// 仅按租户隔离
    Tenant,
    /// 按租户 + 学年隔离
    TenantSession,
}

/// 表格列
#[derive(Debug)]
pub struct GridColumn {
    pub name: &'static str,
    pub searchable: bool,
    pub sortable: bool,
}

impl GridColumn {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            searchable: true,
            sortable: true,
        }
    }

    pub const fn sort_only(name: &'static str) -> Self {
        Self {
            name,
            searchable: false,
            sortable: true,
        }
    }
}

/// 外键式引用（仅应用层校验）
#[derive(Debug)]
pub struct Reference {
    pub column: &'static str,
    pub table: &'static str,
    pub label: &'static str,
}

/// 选项标签的一段：经本表引用列关联到目标表的显示列
#[derive(Debug)]
pub struct LabelPart {
    pub column: &'static str,
    pub table: &'static str,
    pub display: &'static str,
}

/// 唯一性约束
#[derive(Debug)]
pub struct Uniqueness {
    /// 名称列是否唯一（忽略大小写）
    pub name: bool,
    /// 参与唯一键的其他列（精确匹配，NULL 视为相等）
    pub columns: &'static [&'static str],
}

impl Uniqueness {
    pub const fn name() -> Self {
        Self {
            name: true,
            columns: &[],
        }
    }

    pub const fn name_within(columns: &'static [&'static str]) -> Self {
        Self {
            name: true,
            columns,
        }
    }

    pub const fn columns(columns: &'static [&'static str]) -> Self {
        Self {
            name: false,
            columns,
        }
    }

    pub fn is_enforced(&self) -> bool {
        self.name || !self.columns.is_empty()
    }
}

#[derive(Debug)]
pub struct MasterTable {
    pub table: &'static str,
    pub label: &'static str,
    pub scope: MasterScope,
    pub name_column: Option<&'static str>,
    /// 没有名称列的表用关联表的显示列拼出下拉标签
    pub option_label: &'static [LabelPart],
    pub uniqueness: Uniqueness,
    pub columns: &'static [GridColumn],
    pub default_sort: &'static str,
    pub references: &'static [Reference],
}

impl MasterTable {
    /// 白名单内的排序列，未知列返回 `None`
    pub fn sortable_column(&self, name: &str) -> Option<&'static str> {
        self.columns
            .iter()
            .find(|c| c.sortable && c.name.eq_ignore_ascii_case(name))
            .map(|c| c.name)
    }

    pub fn searchable_columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().filter(|c| c.searchable).map(|c| c.name)
    }
}

/// 解析后的作用域过滤值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeFilter {
    pub tenant_id: Uuid,
    pub session_id: Option<Uuid>,
}

impl ScopeFilter {
    pub fn resolve(ctx: &TenantContext, scope: MasterScope) -> Result<Self> {
        let session_id = match scope {
            MasterScope::Tenant => None,
            MasterScope::TenantSession => Some(ctx.require_session()?.session_id),
        };
        Ok(Self {
            tenant_id: ctx.tenant_id,
            session_id,
        })
    }
}

/// 主数据写入负载
pub trait MasterPayload: DeserializeOwned + Send + Sync + 'static {
    /// 用于提示信息的名称
    fn display_name(&self) -> String;

    /// 字段级校验，返回面向用户的错误信息
    fn validate(&self) -> std::result::Result<(), String>;

    /// 业务列及其值（不含主键、作用域与审计列）
    fn columns(&self) -> Vec<(&'static str, sea_orm::Value)>;

    /// 需要校验存在性的引用列及其值
    fn references(&self) -> Vec<(&'static str, Uuid)> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AcademicSession, StaffRole};
    use crate::storage::tables;

    #[test]
    fn test_sortable_column_whitelist() {
        assert_eq!(
            tables::CLASSES.sortable_column("CLASS_NAME"),
            Some("class_name")
        );
        assert_eq!(tables::CLASSES.sortable_column("is_deleted"), None);
        assert_eq!(tables::CLASSES.sortable_column("1; DROP TABLE x"), None);
    }

    #[test]
    fn test_scope_filter_requires_session_for_academic_tables() {
        let mut ctx = TenantContext {
            user_id: Uuid::new_v4(),
            role: StaffRole::Admin,
            tenant_id: Uuid::new_v4(),
            tenant_code: "T1".into(),
            session: None,
        };
        assert!(ScopeFilter::resolve(&ctx, MasterScope::TenantSession).is_err());

        let scope = ScopeFilter::resolve(&ctx, MasterScope::Tenant).unwrap();
        assert_eq!(scope.session_id, None);

        let session_id = Uuid::new_v4();
        ctx.session = Some(AcademicSession {
            session_id,
            session_year: "2025-26".into(),
        });
        let scope = ScopeFilter::resolve(&ctx, MasterScope::TenantSession).unwrap();
        assert_eq!(scope.session_id, Some(session_id));
        assert_eq!(scope.tenant_id, ctx.tenant_id);
    }

    #[test]
    fn test_uniqueness_enforced() {
        assert!(Uniqueness::name().is_enforced());
        assert!(Uniqueness::columns(&["admission_no"]).is_enforced());
        assert!(!Uniqueness::columns(&[]).is_enforced());
    }
}
