//! 参数化 SQL 拼装
//!
//! 表名与列名只来自静态描述符，值一律绑定为参数。
//! 占位符与标识符引号随数据库后端变化。

use sea_orm::{DbBackend, Statement, Value};

pub(crate) struct SqlBuilder {
    backend: DbBackend,
    sql: String,
    values: Vec<Value>,
}

impl SqlBuilder {
    pub(crate) fn new(backend: DbBackend) -> Self {
        Self {
            backend,
            sql: String::with_capacity(256),
            values: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, fragment: &str) -> &mut Self {
        self.sql.push_str(fragment);
        self
    }

    /// 追加带引号的标识符
    pub(crate) fn ident(&mut self, name: &str) -> &mut Self {
        let quoted = quote_ident(self.backend, name);
        self.sql.push_str(&quoted);
        self
    }

    /// 追加 `t.<col>` 形式的限定列名，别名为空时不加前缀
    pub(crate) fn column(&mut self, alias: &str, name: &str) -> &mut Self {
        if !alias.is_empty() {
            self.sql.push_str(alias);
            self.sql.push('.');
        }
        self.ident(name)
    }

    /// 绑定一个参数并追加占位符
    pub(crate) fn bind(&mut self, value: impl Into<Value>) -> &mut Self {
        self.values.push(value.into());
        match self.backend {
            DbBackend::Postgres => {
                let placeholder = format!("${}", self.values.len());
                self.sql.push_str(&placeholder);
            }
            _ => self.sql.push('?'),
        }
        self
    }

    /// NULL 安全的相等比较
    pub(crate) fn null_safe_eq(&mut self, alias: &str, name: &str, value: Value) -> &mut Self {
        self.column(alias, name);
        self.push(match self.backend {
            DbBackend::Postgres => " IS NOT DISTINCT FROM ",
            DbBackend::MySql => " <=> ",
            _ => " IS ",
        });
        self.bind(value)
    }

    /// 租户（及学年）作用域条件
    pub(crate) fn scope(
        &mut self,
        alias: &str,
        tenant_id: uuid::Uuid,
        session_id: Option<uuid::Uuid>,
    ) -> &mut Self {
        self.column(alias, "tenant_id").push(" = ").bind(tenant_id);
        if let Some(session_id) = session_id {
            self.push(" AND ")
                .column(alias, "session_id")
                .push(" = ")
                .bind(session_id);
        }
        self
    }

    pub(crate) fn build(self) -> Statement {
        Statement::from_sql_and_values(self.backend, self.sql, self.values)
    }

    #[cfg(test)]
    pub(crate) fn sql(&self) -> &str {
        &self.sql
    }
}

pub(crate) fn quote_ident(backend: DbBackend, name: &str) -> String {
    match backend {
        DbBackend::MySql => format!("`{}`", name.replace('`', "``")),
        _ => format!("\"{}\"", name.replace('"', "\"\"")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_postgres_placeholders_are_numbered() {
        let mut b = SqlBuilder::new(DbBackend::Postgres);
        b.push("SELECT * FROM ")
            .ident("classes")
            .push(" t WHERE ")
            .scope("t", Uuid::nil(), Some(Uuid::nil()))
            .push(" AND ")
            .column("t", "is_deleted")
            .push(" = ")
            .bind(false);
        assert_eq!(
            b.sql(),
            r#"SELECT * FROM "classes" t WHERE t."tenant_id" = $1 AND t."session_id" = $2 AND t."is_deleted" = $3"#
        );
        assert_eq!(b.build().values.map(|v| v.0.len()), Some(3));
    }

    #[test]
    fn test_mysql_quotes_and_placeholders() {
        let mut b = SqlBuilder::new(DbBackend::MySql);
        b.push("SELECT ")
            .column("t", "class_name")
            .push(" FROM ")
            .ident("classes")
            .push(" t WHERE ")
            .scope("t", Uuid::nil(), None);
        assert_eq!(
            b.sql(),
            "SELECT t.`class_name` FROM `classes` t WHERE t.`tenant_id` = ?"
        );
    }

    #[test]
    fn test_null_safe_equality_per_backend() {
        let value: Value = Option::<Uuid>::None.into();

        let mut b = SqlBuilder::new(DbBackend::Sqlite);
        b.null_safe_eq("t", "section_id", value.clone());
        assert_eq!(b.sql(), r#"t."section_id" IS ?"#);

        let mut b = SqlBuilder::new(DbBackend::Postgres);
        b.null_safe_eq("t", "section_id", value.clone());
        assert_eq!(b.sql(), r#"t."section_id" IS NOT DISTINCT FROM $1"#);

        let mut b = SqlBuilder::new(DbBackend::MySql);
        b.null_safe_eq("t", "section_id", value);
        assert_eq!(b.sql(), "t.`section_id` <=> ?");
    }
}
