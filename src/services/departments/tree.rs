use std::collections::{HashMap, HashSet};

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use uuid::Uuid;

use super::DepartmentService;
use crate::models::ApiResponse;
use crate::models::hr::responses::{DepartmentNode, DepartmentNodeRow};
use crate::services::{error_response, tenant_context};

pub async fn tree(service: &DepartmentService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let ctx = match tenant_context(request) {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage.list_department_nodes(&ctx).await {
        Ok(rows) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            build_tree(rows),
            "Department tree retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

/// 组装部门树
///
/// 上级不存在（已删除或不在结果中）的部门作为根节点；同级按名称排序。
pub fn build_tree(rows: Vec<DepartmentNodeRow>) -> Vec<DepartmentNode> {
    let known: HashSet<Uuid> = rows.iter().map(|r| r.id).collect();

    let mut roots = Vec::new();
    let mut children: HashMap<Uuid, Vec<DepartmentNodeRow>> = HashMap::new();
    for row in rows {
        match row.parent_dept_id {
            Some(parent) if parent != row.id && known.contains(&parent) => {
                children.entry(parent).or_default().push(row)
            }
            _ => roots.push(row),
        }
    }

    let mut visited = HashSet::new();
    attach(roots, &mut children, &mut visited)
}

fn attach(
    mut rows: Vec<DepartmentNodeRow>,
    children: &mut HashMap<Uuid, Vec<DepartmentNodeRow>>,
    visited: &mut HashSet<Uuid>,
) -> Vec<DepartmentNode> {
    rows.sort_by(|a, b| {
        a.department_name
            .to_lowercase()
            .cmp(&b.department_name.to_lowercase())
    });

    let mut nodes = Vec::with_capacity(rows.len());
    for row in rows {
        if !visited.insert(row.id) {
            continue;
        }
        let kids = children.remove(&row.id).unwrap_or_default();
        nodes.push(DepartmentNode {
            id: row.id,
            department_name: row.department_name,
            department_code: row.department_code,
            parent_dept_id: row.parent_dept_id,
            is_active: row.is_active,
            children: attach(kids, children, visited),
        });
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, parent: Option<Uuid>) -> DepartmentNodeRow {
        DepartmentNodeRow {
            id: Uuid::new_v4(),
            department_name: name.to_string(),
            department_code: None,
            parent_dept_id: parent,
            is_active: true,
        }
    }

    #[test]
    fn test_nested_and_sorted() {
        let admin = row("Administration", None);
        let science = row("Science", None);
        let physics = row("physics", Some(science.id));
        let biology = row("Biology", Some(science.id));
        let lab = row("Lab", Some(physics.id));

        let tree = build_tree(vec![
            lab.clone(),
            science.clone(),
            physics.clone(),
            admin.clone(),
            biology.clone(),
        ]);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].department_name, "Administration");
        assert_eq!(tree[1].department_name, "Science");

        let names: Vec<_> = tree[1]
            .children
            .iter()
            .map(|n| n.department_name.as_str())
            .collect();
        assert_eq!(names, vec!["Biology", "physics"]);
        assert_eq!(tree[1].children[1].children[0].id, lab.id);
    }

    #[test]
    fn test_orphans_become_roots() {
        let orphan = row("Orphan", Some(Uuid::new_v4()));
        let tree = build_tree(vec![orphan.clone()]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].id, orphan.id);
        assert!(tree[0].children.is_empty());
    }

    #[test]
    fn test_empty() {
        assert!(build_tree(Vec::new()).is_empty());
    }
}
