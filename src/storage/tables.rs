//! 各主数据表的描述符

use super::master_table::{
    GridColumn, LabelPart, MasterScope, MasterTable, Reference, Uniqueness,
};

pub static CLASSES: MasterTable = MasterTable {
    table: "classes",
    label: "Class",
    scope: MasterScope::TenantSession,
    name_column: Some("class_name"),
    option_label: &[],
    uniqueness: Uniqueness::name(),
    columns: &[
        GridColumn::text("class_name"),
        GridColumn::sort_only("sort_order"),
        GridColumn::sort_only("created_date"),
    ],
    default_sort: "sort_order",
    references: &[],
};

pub static SECTIONS: MasterTable = MasterTable {
    table: "sections",
    label: "Section",
    scope: MasterScope::TenantSession,
    name_column: Some("section_name"),
    option_label: &[],
    uniqueness: Uniqueness::name_within(&["class_id"]),
    columns: &[
        GridColumn::text("section_name"),
        GridColumn::sort_only("class_id"),
        GridColumn::sort_only("sort_order"),
        GridColumn::sort_only("created_date"),
    ],
    default_sort: "sort_order",
    references: &[Reference {
        column: "class_id",
        table: "classes",
        label: "Class",
    }],
};

pub static HOSTELS: MasterTable = MasterTable {
    table: "hostels",
    label: "Hostel",
    scope: MasterScope::Tenant,
    name_column: Some("hostel_name"),
    option_label: &[],
    uniqueness: Uniqueness::name(),
    columns: &[
        GridColumn::text("hostel_name"),
        GridColumn::text("hostel_type"),
        GridColumn::text("warden_name"),
        GridColumn::sort_only("capacity"),
        GridColumn::sort_only("created_date"),
    ],
    default_sort: "hostel_name",
    references: &[],
};

pub static VILLAGES: MasterTable = MasterTable {
    table: "villages",
    label: "Village",
    scope: MasterScope::Tenant,
    name_column: Some("village_name"),
    option_label: &[],
    uniqueness: Uniqueness::name(),
    columns: &[
        GridColumn::text("village_name"),
        GridColumn::text("pincode"),
        GridColumn::sort_only("distance_km"),
        GridColumn::sort_only("created_date"),
    ],
    default_sort: "village_name",
    references: &[],
};

pub static SUBJECT_GRADES: MasterTable = MasterTable {
    table: "subject_grades",
    label: "Subject grade",
    scope: MasterScope::TenantSession,
    name_column: Some("grade_name"),
    option_label: &[],
    uniqueness: Uniqueness::name(),
    columns: &[
        GridColumn::text("grade_name"),
        GridColumn::sort_only("min_percentage"),
        GridColumn::sort_only("max_percentage"),
        GridColumn::sort_only("grade_point"),
        GridColumn::text("remarks"),
        GridColumn::sort_only("sort_order"),
    ],
    default_sort: "sort_order",
    references: &[],
};

pub static FEE_CATEGORIES: MasterTable = MasterTable {
    table: "fee_categories",
    label: "Fee category",
    scope: MasterScope::TenantSession,
    name_column: Some("fee_name"),
    option_label: &[],
    uniqueness: Uniqueness::name(),
    columns: &[
        GridColumn::text("fee_name"),
        GridColumn::text("frequency"),
        GridColumn::sort_only("sort_order"),
        GridColumn::sort_only("created_date"),
    ],
    default_sort: "sort_order",
    references: &[],
};

pub static FEE_DISCOUNTS: MasterTable = MasterTable {
    table: "fee_discounts",
    label: "Fee discount",
    scope: MasterScope::TenantSession,
    name_column: Some("discount_name"),
    option_label: &[],
    uniqueness: Uniqueness::name(),
    columns: &[
        GridColumn::text("discount_name"),
        GridColumn::text("discount_type"),
        GridColumn::sort_only("discount_value"),
        GridColumn::sort_only("created_date"),
    ],
    default_sort: "discount_name",
    references: &[],
};

pub static DEPARTMENTS: MasterTable = MasterTable {
    table: "departments",
    label: "Department",
    scope: MasterScope::Tenant,
    name_column: Some("department_name"),
    option_label: &[],
    uniqueness: Uniqueness::name(),
    columns: &[
        GridColumn::text("department_name"),
        GridColumn::text("department_code"),
        GridColumn::sort_only("parent_dept_id"),
        GridColumn::sort_only("created_date"),
    ],
    default_sort: "department_name",
    references: &[Reference {
        column: "parent_dept_id",
        table: "departments",
        label: "Parent department",
    }],
};

pub static DESIGNATIONS: MasterTable = MasterTable {
    table: "designations",
    label: "Designation",
    scope: MasterScope::Tenant,
    name_column: Some("designation_name"),
    option_label: &[],
    uniqueness: Uniqueness::name(),
    columns: &[
        GridColumn::text("designation_name"),
        GridColumn::sort_only("department_id"),
        GridColumn::sort_only("sort_order"),
        GridColumn::sort_only("created_date"),
    ],
    default_sort: "sort_order",
    references: &[Reference {
        column: "department_id",
        table: "departments",
        label: "Department",
    }],
};

pub static TRANSPORT_ROUTES: MasterTable = MasterTable {
    table: "transport_routes",
    label: "Transport route",
    scope: MasterScope::TenantSession,
    name_column: Some("route_name"),
    option_label: &[],
    uniqueness: Uniqueness::name(),
    columns: &[
        GridColumn::text("route_name"),
        GridColumn::text("vehicle_no"),
        GridColumn::text("driver_name"),
        GridColumn::text("driver_phone"),
        GridColumn::sort_only("sort_order"),
    ],
    default_sort: "sort_order",
    references: &[],
};

pub static TRANSPORT_PICKUPS: MasterTable = MasterTable {
    table: "transport_pickups",
    label: "Pickup point",
    scope: MasterScope::TenantSession,
    name_column: Some("pickup_name"),
    option_label: &[],
    uniqueness: Uniqueness::name_within(&["route_id"]),
    columns: &[
        GridColumn::text("pickup_name"),
        GridColumn::text("pickup_time"),
        GridColumn::sort_only("route_id"),
        GridColumn::sort_only("fee_amount"),
        GridColumn::sort_only("sort_order"),
    ],
    default_sort: "sort_order",
    references: &[Reference {
        column: "route_id",
        table: "transport_routes",
        label: "Transport route",
    }],
};

pub static CONFIGURATIONS: MasterTable = MasterTable {
    table: "configurations",
    label: "Configuration",
    scope: MasterScope::Tenant,
    name_column: Some("config_key"),
    option_label: &[],
    uniqueness: Uniqueness::name(),
    columns: &[
        GridColumn::text("config_key"),
        GridColumn::text("config_value"),
        GridColumn::text("description"),
        GridColumn::sort_only("created_date"),
    ],
    default_sort: "config_key",
    references: &[],
};

pub static FEE_MAP_PLANS: MasterTable = MasterTable {
    table: "fee_map_plans",
    label: "Fee plan",
    scope: MasterScope::TenantSession,
    name_column: None,
    option_label: &[
        LabelPart {
            column: "fee_category_id",
            table: "fee_categories",
            display: "fee_name",
        },
        LabelPart {
            column: "class_id",
            table: "classes",
            display: "class_name",
        },
    ],
    uniqueness: Uniqueness::columns(&["fee_category_id", "class_id", "section_id"]),
    columns: &[
        GridColumn::sort_only("fee_category_id"),
        GridColumn::sort_only("class_id"),
        GridColumn::sort_only("section_id"),
        GridColumn::sort_only("amount"),
        GridColumn::sort_only("created_date"),
    ],
    default_sort: "created_date",
    references: &[
        Reference {
            column: "fee_category_id",
            table: "fee_categories",
            label: "Fee category",
        },
        Reference {
            column: "class_id",
            table: "classes",
            label: "Class",
        },
        Reference {
            column: "section_id",
            table: "sections",
            label: "Section",
        },
    ],
};

pub static FEE_MAP_CONCESSIONS: MasterTable = MasterTable {
    table: "fee_map_concessions",
    label: "Fee concession",
    scope: MasterScope::TenantSession,
    name_column: None,
    option_label: &[
        LabelPart {
            column: "student_id",
            table: "students",
            display: "student_name",
        },
        LabelPart {
            column: "fee_discount_id",
            table: "fee_discounts",
            display: "discount_name",
        },
    ],
    uniqueness: Uniqueness::columns(&["fee_map_plan_id", "student_id"]),
    columns: &[
        GridColumn::sort_only("fee_map_plan_id"),
        GridColumn::sort_only("student_id"),
        GridColumn::sort_only("fee_discount_id"),
        GridColumn::text("remarks"),
        GridColumn::sort_only("created_date"),
    ],
    default_sort: "created_date",
    references: &[
        Reference {
            column: "fee_map_plan_id",
            table: "fee_map_plans",
            label: "Fee plan",
        },
        Reference {
            column: "student_id",
            table: "students",
            label: "Student",
        },
        Reference {
            column: "fee_discount_id",
            table: "fee_discounts",
            label: "Fee discount",
        },
    ],
};

pub static GRADE_SUBJECT_MAPPINGS: MasterTable = MasterTable {
    table: "grade_subject_mappings",
    label: "Subject mapping",
    scope: MasterScope::TenantSession,
    name_column: Some("subject_name"),
    option_label: &[],
    uniqueness: Uniqueness::name_within(&["class_id"]),
    columns: &[
        GridColumn::text("subject_name"),
        GridColumn::text("subject_code"),
        GridColumn::sort_only("class_id"),
        GridColumn::sort_only("is_grade_only"),
        GridColumn::sort_only("sort_order"),
    ],
    default_sort: "sort_order",
    references: &[Reference {
        column: "class_id",
        table: "classes",
        label: "Class",
    }],
};

pub static STUDENTS: MasterTable = MasterTable {
    table: "students",
    label: "Student",
    scope: MasterScope::TenantSession,
    name_column: Some("student_name"),
    option_label: &[],
    uniqueness: Uniqueness::columns(&["admission_no"]),
    columns: &[
        GridColumn::text("admission_no"),
        GridColumn::text("student_name"),
        GridColumn::sort_only("class_id"),
        GridColumn::sort_only("section_id"),
        GridColumn::sort_only("created_date"),
    ],
    default_sort: "student_name",
    references: &[
        Reference {
            column: "class_id",
            table: "classes",
            label: "Class",
        },
        Reference {
            column: "section_id",
            table: "sections",
            label: "Section",
        },
        Reference {
            column: "village_id",
            table: "villages",
            label: "Village",
        },
        Reference {
            column: "hostel_id",
            table: "hostels",
            label: "Hostel",
        },
        Reference {
            column: "pickup_id",
            table: "transport_pickups",
            label: "Pickup point",
        },
    ],
};

pub static ALL_TABLES: &[&MasterTable] = &[
    &CLASSES,
    &SECTIONS,
    &HOSTELS,
    &VILLAGES,
    &SUBJECT_GRADES,
    &FEE_CATEGORIES,
    &FEE_DISCOUNTS,
    &DEPARTMENTS,
    &DESIGNATIONS,
    &TRANSPORT_ROUTES,
    &TRANSPORT_PICKUPS,
    &CONFIGURATIONS,
    &FEE_MAP_PLANS,
    &FEE_MAP_CONCESSIONS,
    &GRADE_SUBJECT_MAPPINGS,
    &STUDENTS,
];

pub fn find_table(name: &str) -> Option<&'static MasterTable> {
    ALL_TABLES.iter().copied().find(|t| t.table == name)
}

/// 引用了 `table` 的所有 (表, 列)
pub fn dependents_of(table: &str) -> Vec<(&'static MasterTable, &'static str)> {
    ALL_TABLES
        .iter()
        .copied()
        .flat_map(|t| {
            t.references
                .iter()
                .filter(move |r| r.table == table)
                .map(move |r| (t, r.column))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_reference_targets_known_table() {
        for table in ALL_TABLES {
            for reference in table.references {
                assert!(
                    find_table(reference.table).is_some(),
                    "{} references unknown table {}",
                    table.table,
                    reference.table
                );
            }
        }
    }

    #[test]
    fn test_default_sort_is_sortable() {
        for table in ALL_TABLES {
            assert!(
                table.sortable_column(table.default_sort).is_some(),
                "{} default sort is not whitelisted",
                table.table
            );
        }
    }

    #[test]
    fn test_dependents_of_classes() {
        let deps: Vec<_> = dependents_of("classes")
            .into_iter()
            .map(|(t, c)| (t.table, c))
            .collect();
        assert!(deps.contains(&("sections", "class_id")));
        assert!(deps.contains(&("students", "class_id")));
        assert!(deps.contains(&("fee_map_plans", "class_id")));
        assert!(deps.contains(&("grade_subject_mappings", "class_id")));
    }

    #[test]
    fn test_departments_reference_themselves() {
        let deps = dependents_of("departments");
        assert!(
            deps.iter()
                .any(|(t, c)| t.table == "departments" && *c == "parent_dept_id")
        );
        assert!(
            deps.iter()
                .any(|(t, c)| t.table == "designations" && *c == "department_id")
        );
    }

    #[test]
    fn test_every_table_has_option_label() {
        for table in ALL_TABLES {
            assert!(
                table.name_column.is_some() || !table.option_label.is_empty(),
                "{} has no option label",
                table.table
            );
            for part in table.option_label {
                assert!(find_table(part.table).is_some());
                assert!(table.references.iter().any(|r| r.column == part.column));
            }
        }
    }

    #[test]
    fn test_sixteen_tables() {
        assert_eq!(ALL_TABLES.len(), 16);
    }
}
