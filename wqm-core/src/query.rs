//! Read queries against a backend view, in the REST API's parameter dialect.
//!
//! Only the subset the map pages need is supported: column selection,
//! equality filters (`column=eq.value`), a single ordering, and a row limit.

use serde::Serialize;
use std::fmt;

/// Row cap for unfiltered bulk loads.
pub const BULK_LIMIT: usize = 1000;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    fn as_str(&self) -> &'static str {
        match self {
            Order::Asc => "asc",
            Order::Desc => "desc",
        }
    }
}

/// A read query. Parameters are kept unencoded; the HTTP client encodes them.
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize)]
pub struct Query {
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Option<(String, Order)>,
    limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// All columns, capped at [`BULK_LIMIT`] rows.
    pub fn bulk() -> Self {
        Self::new().select("*").limit(BULK_LIMIT)
    }

    /// Exact-match point fetch on one column.
    pub fn point(column: &str, value: &str) -> Self {
        Self::new().select("*").eq(column, value)
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.select = Some(columns.to_string());
        self
    }

    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.filters.push((column.to_string(), format!("eq.{}", value)));
        self
    }

    pub fn order(mut self, column: &str, order: Order) -> Self {
        self.order = Some((column.to_string(), order));
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Query-string pairs in a stable order: select, filters, order, limit.
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(self.filters.len() + 3);
        if let Some(select) = &self.select {
            params.push(("select".to_string(), select.clone()));
        }
        params.extend(self.filters.iter().cloned());
        if let Some((column, order)) = &self.order {
            params.push(("order".to_string(), format!("{}.{}", column, order.as_str())));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }

    /// Value of the first equality filter on `column`, if any.
    pub fn eq_value(&self, column: &str) -> Option<&str> {
        self.filters
            .iter()
            .find(|(c, _)| c == column)
            .and_then(|(_, v)| v.strip_prefix("eq."))
    }

    /// Equality filters as `(column, value)` pairs.
    pub fn eq_filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filters
            .iter()
            .filter_map(|(c, v)| v.strip_prefix("eq.").map(|v| (c.as_str(), v)))
    }

    pub fn limit_value(&self) -> Option<usize> {
        self.limit
    }
}

/// Unencoded rendering, for log lines.
impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .params()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        f.write_str(&parts.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bulk_query_params() {
        let q = Query::bulk();
        assert_eq!(
            q.params(),
            vec![
                ("select".to_string(), "*".to_string()),
                ("limit".to_string(), "1000".to_string()),
            ]
        );
    }

    #[test]
    fn point_query_uses_eq_prefix() {
        let q = Query::point("sample_date", "2024-06-01");
        assert_eq!(q.to_string(), "select=*&sample_date=eq.2024-06-01");
        assert_eq!(q.eq_value("sample_date"), Some("2024-06-01"));
        assert_eq!(q.eq_value("location_id"), None);
    }

    #[test]
    fn full_query_order() {
        let q = Query::new()
            .select("location_id,sample_date")
            .eq("location_id", "7")
            .order("sample_date", Order::Desc)
            .limit(10);
        assert_eq!(
            q.to_string(),
            "select=location_id,sample_date&location_id=eq.7&order=sample_date.desc&limit=10"
        );
        assert_eq!(q.limit_value(), Some(10));
    }
}
