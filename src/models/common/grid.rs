//! DataTables 风格的分页/排序/搜索请求与响应

use std::collections::HashMap;

use serde::Serialize;
use ts_rs::TS;

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// 解析后的表格请求
#[derive(Debug, Clone, PartialEq)]
pub struct GridRequest {
    pub draw: i64,
    pub start: u64,
    pub length: u64,
    pub search: Option<String>,
    pub order_column: Option<String>,
    pub order_dir: SortDirection,
}

impl GridRequest {
    /// 从 DataTables 表单参数解析
    ///
    /// `order[0][column]` 是 `columns[i][data]` 的下标；`length = -1` 表示全部，
    /// 但始终受 `max_length` 限制。无法解析的值回退为默认值。
    pub fn from_params(
        params: &HashMap<String, String>,
        default_length: u64,
        max_length: u64,
    ) -> Self {
        let draw = params
            .get("draw")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(0)
            .max(0);

        let start = params
            .get("start")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(0)
            .max(0) as u64;

        let length = match params
            .get("length")
            .and_then(|v| v.trim().parse::<i64>().ok())
        {
            Some(-1) => max_length,
            None => default_length,
            Some(n) if n <= 0 => default_length,
            Some(n) => (n as u64).min(max_length),
        };

        let search = params
            .get("search[value]")
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        let order_column = params
            .get("order[0][column]")
            .and_then(|idx| idx.trim().parse::<usize>().ok())
            .and_then(|idx| {
                params
                    .get(&format!("columns[{idx}][data]"))
                    .or_else(|| params.get(&format!("columns[{idx}][name]")))
            })
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let order_dir = params
            .get("order[0][dir]")
            .map(|v| SortDirection::parse(v))
            .unwrap_or_default();

        Self {
            draw,
            start,
            length,
            search,
            order_column,
            order_dir,
        }
    }

    /// 窗口上界（不含下界，含上界）
    pub fn end(&self) -> u64 {
        self.start.saturating_add(self.length)
    }
}

// 表格响应（字段名与 DataTables 约定保持一致）
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/grid.ts")]
pub struct GridResponse<T: TS> {
    pub draw: i64,
    pub records_total: i64,
    pub records_filtered: i64,
    pub data: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_when_empty() {
        let req = GridRequest::from_params(&HashMap::new(), 10, 500);
        assert_eq!(req.draw, 0);
        assert_eq!(req.start, 0);
        assert_eq!(req.length, 10);
        assert_eq!(req.search, None);
        assert_eq!(req.order_column, None);
        assert_eq!(req.order_dir, SortDirection::Asc);
    }

    #[test]
    fn test_order_column_resolved_through_columns() {
        let req = GridRequest::from_params(
            &params(&[
                ("draw", "3"),
                ("start", "20"),
                ("length", "25"),
                ("columns[0][data]", "class_name"),
                ("columns[1][data]", "sort_order"),
                ("order[0][column]", "1"),
                ("order[0][dir]", "DESC"),
                ("search[value]", "  vi "),
            ]),
            10,
            500,
        );
        assert_eq!(req.draw, 3);
        assert_eq!(req.start, 20);
        assert_eq!(req.length, 25);
        assert_eq!(req.end(), 45);
        assert_eq!(req.search.as_deref(), Some("vi"));
        assert_eq!(req.order_column.as_deref(), Some("sort_order"));
        assert_eq!(req.order_dir, SortDirection::Desc);
    }

    #[test]
    fn test_length_all_is_capped() {
        let req = GridRequest::from_params(&params(&[("length", "-1")]), 10, 500);
        assert_eq!(req.length, 500);

        let req = GridRequest::from_params(&params(&[("length", "10000")]), 10, 500);
        assert_eq!(req.length, 500);
    }

    #[test]
    fn test_zero_or_negative_length_uses_default() {
        for value in ["0", "-2", "-100"] {
            let req = GridRequest::from_params(&params(&[("length", value)]), 10, 500);
            assert_eq!(req.length, 10, "length={value}");
        }
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let req = GridRequest::from_params(
            &params(&[
                ("start", "-5"),
                ("length", "abc"),
                ("order[0][column]", "9"),
                ("search[value]", "   "),
            ]),
            15,
            500,
        );
        assert_eq!(req.start, 0);
        assert_eq!(req.length, 15);
        assert_eq!(req.order_column, None);
        assert_eq!(req.search, None);
    }

    #[test]
    fn test_response_uses_datatables_names() {
        let resp = GridResponse::<String> {
            draw: 1,
            records_total: 5,
            records_filtered: 2,
            data: vec!["a".into()],
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["recordsTotal"], 5);
        assert_eq!(json["recordsFiltered"], 2);
        assert_eq!(json["data"][0], "a");
    }
}
