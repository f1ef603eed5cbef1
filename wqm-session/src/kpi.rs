//! The KPI page: one backend fetch per selected sample date, with per-date
//! averages shown beside the map.

use crate::error::SessionError;
use crate::status::Status;
use crate::ticket::{Generations, Ticket};
use wqm_core::kpi::KpiSummary;
use wqm_core::records::KpiSample;
use wqm_core::source::fetch_distinct_dates;
use wqm_core::{Query, RowSource, SourceError, View};
use wqm_render::{render_points, Layer, MapSurface, RenderSummary};

/// A date load in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct DateRequest {
    pub ticket: Ticket,
    pub date: String,
    pub query: Query,
}

/// What happened to a finished date load.
#[derive(Debug, Clone, PartialEq)]
pub enum DateOutcome {
    Applied(RenderSummary),
    /// A newer request was issued meanwhile; nothing changed.
    Stale,
}

pub struct KpiMap<M: MapSurface> {
    surface: M,
    points: Layer,
    dates: Vec<String>,
    selected: Option<String>,
    summary: Option<KpiSummary>,
    generations: Generations,
    status: Status,
}

impl<M: MapSurface> KpiMap<M> {
    pub fn new(mut surface: M) -> Self {
        let points = Layer::create(&mut surface, "kpi-samples");
        Self {
            surface,
            points,
            dates: Vec::new(),
            selected: None,
            summary: None,
            generations: Generations::default(),
            status: Status::Idle,
        }
    }

    pub fn surface(&self) -> &M {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut M {
        &mut self.surface
    }

    pub fn layer(&self) -> &Layer {
        &self.points
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Dates offered in the dropdown, ascending.
    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    pub fn selected_date(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Averages for the displayed date; `None` before any date is shown.
    pub fn summary(&self) -> Option<&KpiSummary> {
        self.summary.as_ref()
    }

    pub fn finish_dates(
        &mut self,
        result: Result<Vec<String>, SourceError>,
    ) -> Result<(), SessionError> {
        match result {
            Ok(dates) => {
                self.dates = dates;
                Ok(())
            }
            Err(e) => {
                log::error!("{}", e);
                self.status = Status::load_failed(View::KpiSamples);
                Err(e.into())
            }
        }
    }

    pub async fn load_dates<S: RowSource>(&mut self, source: &S) -> Result<(), SessionError> {
        let result = fetch_distinct_dates(source, View::KpiSamples).await;
        self.finish_dates(result)
    }

    /// Start loading `date`. An empty choice (the placeholder) starts nothing.
    pub fn begin_date(&mut self, date: &str) -> Option<DateRequest> {
        if date.is_empty() {
            return None;
        }
        self.status = Status::loading();
        Some(DateRequest {
            ticket: self.generations.issue(),
            date: date.to_string(),
            query: Query::point("sample_date", date),
        })
    }

    /// Replace the displayed points and averages with the rows for a date.
    ///
    /// Responses to superseded requests are dropped. A failed load keeps the
    /// previous points and averages.
    pub fn finish_date(
        &mut self,
        request: &DateRequest,
        result: Result<Vec<KpiSample>, SourceError>,
    ) -> Result<DateOutcome, SessionError> {
        if !self.generations.is_current(request.ticket) {
            log::debug!("dropping stale response for {}", request.date);
            return Ok(DateOutcome::Stale);
        }
        let rows = match result {
            Ok(rows) => rows,
            Err(e) => {
                log::error!("{}", e);
                self.status = Status::load_failed(View::KpiSamples);
                return Err(e.into());
            }
        };
        log::info!("{}: {} KPI samples", request.date, rows.len());
        match render_points(&mut self.surface, &mut self.points, &rows) {
            Ok(summary) => {
                self.summary = Some(KpiSummary::from_samples(&rows));
                self.selected = Some(request.date.clone());
                self.status = Status::plotted_sites(rows.len());
                Ok(DateOutcome::Applied(summary))
            }
            Err(e) => {
                log::error!("{}", e);
                self.status = Status::Failed(e.to_string());
                Err(e.into())
            }
        }
    }

    pub async fn load_date<S: RowSource>(
        &mut self,
        source: &S,
        date: &str,
    ) -> Result<Option<DateOutcome>, SessionError> {
        let Some(request) = self.begin_date(date) else {
            return Ok(None);
        };
        let result = source.fetch(&request.query).await;
        self.finish_date(&request, result).map(Some)
    }
}
