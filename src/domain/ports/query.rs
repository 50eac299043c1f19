//! Table query model shared by the data port and its adapters.

use std::cmp::Ordering;
use std::fmt;

use serde_json::Value;

/// Tables exposed by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Companies,
    Clients,
    People,
    Services,
    Categories,
    CategoryGroups,
    CategoryCompanies,
    Users,
}

impl Table {
    /// Wire name used in `/rest/v1/{table}`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Companies => "companies",
            Self::Clients => "clients",
            Self::People => "people",
            Self::Services => "services",
            Self::Categories => "categories",
            Self::CategoryGroups => "category_groups",
            Self::CategoryCompanies => "category_companies",
            Self::Users => "users",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Neq,
}

/// A single `column op value` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    #[must_use]
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            op: FilterOp::Eq,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn neq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            op: FilterOp::Neq,
            value: value.into(),
        }
    }

    /// Renders the condition as a `(column, "op.value")` query pair.
    #[must_use]
    pub fn to_param(&self) -> (String, String) {
        let rendered = match (&self.value, self.op) {
            (Value::Null, FilterOp::Eq) => "is.null".to_string(),
            (Value::Null, FilterOp::Neq) => "not.is.null".to_string(),
            (value, FilterOp::Eq) => format!("eq.{}", plain(value)),
            (value, FilterOp::Neq) => format!("neq.{}", plain(value)),
        };
        (self.column.clone(), rendered)
    }

    /// Evaluates the condition against a row object.
    #[must_use]
    pub fn matches(&self, row: &Value) -> bool {
        let cell = row.get(&self.column).unwrap_or(&Value::Null);
        let equal = same_value(cell, &self.value);
        match self.op {
            FilterOp::Eq => equal,
            FilterOp::Neq => !equal,
        }
    }
}

/// Embedded parent row, rendered as `alias:table!foreign_key(columns)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    pub alias: String,
    pub table: Table,
    pub foreign_key: String,
    pub columns: String,
}

impl Embed {
    /// The `company{legal_name}` join used by company-scoped tables.
    #[must_use]
    pub fn company() -> Self {
        Self {
            alias: "company".to_string(),
            table: Table::Companies,
            foreign_key: "company_id".to_string(),
            columns: "legal_name".to_string(),
        }
    }

    fn render(&self) -> String {
        format!(
            "{}:{}!{}({})",
            self.alias, self.table, self.foreign_key, self.columns
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// Select query against one table.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub table: Table,
    pub columns: String,
    pub embeds: Vec<Embed>,
    pub filters: Vec<Filter>,
    pub order: Vec<Order>,
    pub limit: Option<usize>,
}

impl Query {
    #[must_use]
    pub fn table(table: Table) -> Self {
        Self {
            table,
            columns: "*".to_string(),
            embeds: Vec::new(),
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    #[must_use]
    pub fn columns(mut self, columns: impl Into<String>) -> Self {
        self.columns = columns.into();
        self
    }

    #[must_use]
    pub fn embed(mut self, embed: Embed) -> Self {
        self.embeds.push(embed);
        self
    }

    #[must_use]
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::eq(column, value));
        self
    }

    #[must_use]
    pub fn neq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::neq(column, value));
        self
    }

    /// Adds `active = flag` when a flag is given.
    #[must_use]
    pub fn active(self, flag: Option<bool>) -> Self {
        match flag {
            Some(flag) => self.eq("active", flag),
            None => self,
        }
    }

    /// Adds `column = value` when a value is given.
    #[must_use]
    pub fn eq_opt(self, column: impl Into<String>, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.eq(column, value),
            None => self,
        }
    }

    #[must_use]
    pub fn order(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order.push(Order {
            column: column.into(),
            ascending,
        });
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The `select=` parameter including embeds.
    #[must_use]
    pub fn select_param(&self) -> String {
        std::iter::once(self.columns.clone())
            .chain(self.embeds.iter().map(Embed::render))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Full list of query string pairs.
    #[must_use]
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), self.select_param())];
        params.extend(self.filters.iter().map(Filter::to_param));

        if !self.order.is_empty() {
            let order = self
                .order
                .iter()
                .map(|o| {
                    format!("{}.{}", o.column, if o.ascending { "asc" } else { "desc" })
                })
                .collect::<Vec<_>>()
                .join(",");
            params.push(("order".to_string(), order));
        }

        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        params
    }
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Number(_), Value::String(_)) | (Value::String(_), Value::Number(_)) => {
            plain(a) == plain(b)
        }
        _ => a == b,
    }
}

/// Orders two cells the way the platform sorts columns; nulls last.
#[must_use]
pub fn compare_cells(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => plain(a).cmp(&plain(b)),
    }
}
