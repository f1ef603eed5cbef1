//! Run a map session headless against a row source.
//!
//! Every function returns the session after loading, so callers can read
//! both the drawn surface and the session's own state.

use anyhow::{anyhow, bail};
use log::info;
use wqm_core::date::{parse_sample_date, DATE_FORMAT};
use wqm_core::kpi::KpiSummary;
use wqm_core::records::KpiSample;
use wqm_core::source::fetch_distinct_dates;
use wqm_core::{RowSource, View};
use wqm_render::GeoJsonSurface;
use wqm_session::{KpiMap, SampleLayer, SampleMap, TimeSliderMap, ZoneMap};

/// Load samples, and treatments when asked for, then apply a year/month
/// filter. Treatments are not fetched at all when left out.
///
/// A month not offered for the chosen year is dropped, the same as picking
/// a new year in the page's dropdown.
pub async fn samples<S: RowSource>(
    source: &S,
    year: Option<i32>,
    month: Option<u32>,
    with_treatments: bool,
) -> anyhow::Result<SampleMap<GeoJsonSurface>> {
    let mut map = SampleMap::new(GeoJsonSurface::new());
    let query = map.begin_load();
    map.finish_samples(source.fetch(&query).await)?;
    if with_treatments {
        map.finish_treatments(source.fetch(&query).await)?;
    }
    map.select_month(month);
    map.select_year(year);
    if month.is_some() && map.selection().month.is_none() {
        log::warn!("month {:?} has no samples in year {:?}", month, year);
    }
    let summary = map.apply_filters()?;
    map.set_layer_visible(SampleLayer::Treatments, with_treatments);
    info!("{} ({} rows without coordinates)", map.status().text(), summary.skipped);
    Ok(map)
}

/// Load treatments only; the samples view is never queried.
pub async fn treatments<S: RowSource>(source: &S) -> anyhow::Result<SampleMap<GeoJsonSurface>> {
    let mut map = SampleMap::new(GeoJsonSurface::new());
    let query = map.begin_load();
    map.finish_treatments(source.fetch(&query).await)?;
    map.set_layer_visible(SampleLayer::Samples, false);
    info!("{} treatments", map.treatment_rows().len());
    Ok(map)
}

pub async fn zones<S: RowSource>(source: &S) -> anyhow::Result<ZoneMap<GeoJsonSurface>> {
    let mut map = ZoneMap::new(GeoJsonSurface::new());
    map.load(source).await?;
    info!("{}", map.status().text());
    Ok(map)
}

/// Load the time series and step to `date`, or stay on the first date.
pub async fn timeseries<S: RowSource>(
    source: &S,
    date: Option<&str>,
) -> anyhow::Result<TimeSliderMap<GeoJsonSurface>> {
    let mut map = TimeSliderMap::new(GeoJsonSurface::new());
    map.load(source).await?;
    if let Some(raw) = date {
        let wanted = parse_sample_date(raw)
            .ok_or_else(|| anyhow!("unrecognized date '{}', expected {}", raw, DATE_FORMAT))?;
        let Some(index) = map.steps().iter().position(|d| *d == wanted) else {
            bail!("no time series samples on {}", wanted);
        };
        map.seek(index)?;
    }
    if let Some(current) = map.current_date() {
        info!("showing {} ({} sites)", current, map.visible_rows().len());
    }
    Ok(map)
}

/// Load one KPI date. The fetched rows are returned alongside the session.
pub async fn kpi<S: RowSource>(
    source: &S,
    date: &str,
) -> anyhow::Result<(KpiMap<GeoJsonSurface>, Vec<KpiSample>)> {
    let mut map = KpiMap::new(GeoJsonSurface::new());
    let Some(request) = map.begin_date(date) else {
        bail!("a sample date is required");
    };
    let result = source.fetch::<KpiSample>(&request.query).await;
    let rows = result.clone().unwrap_or_default();
    map.finish_date(&request, result)?;
    if rows.is_empty() {
        log::warn!("no KPI samples on {}", date);
    }
    Ok((map, rows))
}

pub async fn dates<S: RowSource>(source: &S) -> anyhow::Result<Vec<String>> {
    Ok(fetch_distinct_dates(source, View::KpiSamples).await?)
}

/// One line with the three averages, formatted like the KPI tiles.
pub fn kpi_line(date: &str, summary: &KpiSummary) -> String {
    format!(
        "{}: {} sites, phosphate {}, ammonia {}, nitrite {}",
        date,
        summary.sites,
        KpiSummary::format(summary.phosphate),
        KpiSummary::format(summary.ammonia),
        KpiSummary::format(summary.nitrite),
    )
}
