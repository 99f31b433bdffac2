//! 已保存的成绩组成与默认组成合并

use std::collections::HashMap;

use tracing::warn;
use uuid::Uuid;

use crate::cache::ObjectCache;
use crate::errors::{Result, SchoolAdminError};
use crate::models::TenantContext;
use crate::models::configurations::entities::KnownConfigKey;
use crate::models::fees::entities::round2;
use crate::models::grade_formulas::entities::{
    GradeComponent, GradeFormulaItem, GradeFormulaResponse, builtin_defaults,
};
use crate::services::configurations::lookup_value;
use crate::storage::{Storage, tables};

/// 租户配置的默认组成，未配置或格式错误时使用内置默认值
pub async fn default_components(
    storage: &dyn Storage,
    cache: &dyn ObjectCache,
    ctx: &TenantContext,
) -> Result<Vec<GradeComponent>> {
    let key = KnownConfigKey::GradeFormulaDefaults.as_str();
    let Some(value) = lookup_value(storage, cache, ctx, key).await? else {
        return Ok(builtin_defaults());
    };
    match serde_json::from_str::<Vec<GradeComponent>>(&value.config_value) {
        Ok(components) if !components.is_empty() => Ok(components),
        Ok(_) => Ok(builtin_defaults()),
        Err(e) => {
            warn!(
                "Ignoring invalid {} for tenant {}: {}",
                key, ctx.tenant_code, e
            );
            Ok(builtin_defaults())
        }
    }
}

/// 合并规则：默认编码全部出现，已保存的值按编码（忽略大小写）覆盖默认值，
/// 默认之外的已保存编码保留；结果按 `sort_order`、编码排序
pub fn merge_with_defaults(
    defaults: Vec<GradeComponent>,
    saved: Vec<GradeComponent>,
) -> Vec<GradeFormulaItem> {
    let mut merged: HashMap<String, GradeFormulaItem> = HashMap::new();
    for component in defaults {
        merged.insert(
            component.component_code.trim().to_ascii_uppercase(),
            GradeFormulaItem {
                component,
                is_saved: false,
            },
        );
    }
    for component in saved {
        merged.insert(
            component.component_code.trim().to_ascii_uppercase(),
            GradeFormulaItem {
                component,
                is_saved: true,
            },
        );
    }

    let mut items: Vec<GradeFormulaItem> = merged.into_values().collect();
    items.sort_by(|a, b| {
        a.component
            .sort_order
            .cmp(&b.component.sort_order)
            .then_with(|| a.component.component_code.cmp(&b.component.component_code))
    });
    items
}

/// 读取班级的成绩公式（含默认值）
pub async fn load_formulas(
    storage: &dyn Storage,
    cache: &dyn ObjectCache,
    ctx: &TenantContext,
    class_id: Uuid,
) -> Result<GradeFormulaResponse> {
    if storage
        .find_master(ctx, &tables::CLASSES, class_id)
        .await?
        .is_none()
    {
        return Err(SchoolAdminError::not_found("Class not found"));
    }

    let saved = storage.list_grade_formulas(ctx, class_id).await?;
    let defaults = default_components(storage, cache, ctx).await?;
    let items = merge_with_defaults(defaults, saved);
    let total_weightage = round2(items.iter().map(|i| i.component.weightage).sum());

    Ok(GradeFormulaResponse {
        class_id,
        items,
        total_weightage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_only() {
        let items = merge_with_defaults(builtin_defaults(), Vec::new());
        let codes: Vec<_> = items
            .iter()
            .map(|i| i.component.component_code.as_str())
            .collect();
        assert_eq!(codes, vec!["PT", "NB", "SEA", "HY"]);
        assert!(items.iter().all(|i| !i.is_saved));
    }

    #[test]
    fn test_saved_override_case_insensitive() {
        let saved = vec![GradeComponent::new("hy", "Half Yearly", 70.0, 80.0, 4)];
        let items = merge_with_defaults(builtin_defaults(), saved);
        assert_eq!(items.len(), 4);

        let hy = items
            .iter()
            .find(|i| i.component.component_code.eq_ignore_ascii_case("HY"))
            .unwrap();
        assert!(hy.is_saved);
        assert_eq!(hy.component.weightage, 70.0);
        assert_eq!(hy.component.max_marks, 80.0);
    }

    #[test]
    fn test_extra_saved_codes_kept_and_sorted() {
        let saved = vec![
            GradeComponent::new("ORAL", "Oral Test", 5.0, 20.0, 0),
            GradeComponent::new("LAB", "Lab Work", 5.0, 20.0, 2),
        ];
        let items = merge_with_defaults(builtin_defaults(), saved);
        let codes: Vec<_> = items
            .iter()
            .map(|i| i.component.component_code.as_str())
            .collect();
        // sort_order 相同时按编码排序
        assert_eq!(codes, vec!["ORAL", "PT", "LAB", "NB", "SEA", "HY"]);
    }
}
