//! The row source abstraction and its error type.
//!
//! A [`RowSource`] answers one read [`Query`] against one [`View`] with a
//! vector of typed records. One attempt per call; there is no retry.

use crate::date::Dated;
use crate::query::Query;
use crate::records::{SampleDateRow, ViewRecord};
use crate::views::View;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, HashSet};

/// A failed row load.
///
/// Callers treat every variant as the same load failure; the variants exist
/// so logs can tell a bad query from an unreachable backend.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    #[error("network error loading {view}: {message}")]
    Network { view: View, message: String },

    #[error("backend returned HTTP {status} for {view}: {body}")]
    Backend { view: View, status: u16, body: String },

    #[error("could not decode {view} rows: {message}")]
    Decode { view: View, message: String },
}

impl SourceError {
    pub fn view(&self) -> View {
        match self {
            SourceError::Network { view, .. }
            | SourceError::Backend { view, .. }
            | SourceError::Decode { view, .. } => *view,
        }
    }

    /// Every source error is a load failure from the UI's point of view.
    pub fn is_load_failure(&self) -> bool {
        true
    }
}

/// Something that can answer read queries against backend views.
#[allow(async_fn_in_trait)]
pub trait RowSource {
    /// Fetch rows of `view` decoded as `T`.
    async fn fetch_rows<T: DeserializeOwned>(
        &self,
        view: View,
        query: &Query,
    ) -> Result<Vec<T>, SourceError>;

    /// Fetch rows of the view `T` is declared for.
    async fn fetch<T: ViewRecord>(&self, query: &Query) -> Result<Vec<T>, SourceError> {
        self.fetch_rows(T::VIEW, query).await
    }
}

/// Distinct raw `sample_date` values of a view, ascending.
pub async fn fetch_distinct_dates<S: RowSource>(
    source: &S,
    view: View,
) -> Result<Vec<String>, SourceError> {
    let rows: Vec<SampleDateRow> = source
        .fetch_rows(view, &Query::new().select("sample_date"))
        .await?;
    let dates: BTreeSet<String> = rows
        .into_iter()
        .filter(|r| r.date().is_some())
        .filter_map(|r| r.sample_date)
        .collect();
    log::info!("{} distinct sample dates in {}", dates.len(), view);
    Ok(dates.into_iter().collect())
}

/// An in-memory row source holding JSON rows per view.
///
/// Equality filters and the row limit are honored; `select` and `order` are
/// not. A view can be switched to failing to exercise error paths.
#[derive(Debug, Default)]
pub struct MemorySource {
    tables: HashMap<View, Vec<serde_json::Value>>,
    failing: RefCell<HashSet<View>>,
    calls: RefCell<Vec<(View, Query)>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, view: View, rows: Vec<serde_json::Value>) -> Self {
        self.tables.insert(view, rows);
        self
    }

    /// Store typed records under their declared view.
    pub fn with_records<T: ViewRecord + Serialize>(self, records: &[T]) -> Self {
        let rows = records
            .iter()
            .filter_map(|r| serde_json::to_value(r).ok())
            .collect();
        self.with_rows(T::VIEW, rows)
    }

    pub fn set_failing(&self, view: View, failing: bool) {
        let mut set = self.failing.borrow_mut();
        if failing {
            set.insert(view);
        } else {
            set.remove(&view);
        }
    }

    /// Every query answered so far, in call order.
    pub fn calls(&self) -> Vec<(View, Query)> {
        self.calls.borrow().clone()
    }
}

fn cell_text(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl RowSource for MemorySource {
    async fn fetch_rows<T: DeserializeOwned>(
        &self,
        view: View,
        query: &Query,
    ) -> Result<Vec<T>, SourceError> {
        self.calls.borrow_mut().push((view, query.clone()));
        if self.failing.borrow().contains(&view) {
            return Err(SourceError::Network {
                view,
                message: "connection refused".to_string(),
            });
        }
        let rows = self.tables.get(&view).map(Vec::as_slice).unwrap_or(&[]);
        let matching = rows.iter().filter(|row| {
            query
                .eq_filters()
                .all(|(col, want)| row.get(col).map(cell_text).as_deref() == Some(want))
        });
        let limit = query.limit_value().unwrap_or(usize::MAX);
        matching
            .take(limit)
            .map(|row| {
                serde_json::from_value(row.clone()).map_err(|e| SourceError::Decode {
                    view,
                    message: e.to_string(),
                })
            })
            .collect()
    }
}
