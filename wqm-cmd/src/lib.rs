//! Command implementations for the water quality map CLI.
//!
//! Each subcommand runs the same session the map page runs, against any
//! [`RowSource`], and writes what the page would show as a GeoJSON
//! FeatureCollection. Sample and KPI rows can also be exported as CSV.

use clap::Subcommand;
use wqm_core::RowSource;

pub mod export;
pub mod maps;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Latest samples per site, optionally filtered by year and month
    Samples {
        #[arg(short, long)]
        year: Option<i32>,

        /// Month number (1-12); ignored when not offered for the year
        #[arg(short, long)]
        month: Option<u32>,

        /// Leave the treatments layer out of the output
        #[arg(long)]
        no_treatments: bool,

        /// Output path for the GeoJSON (stdout when omitted)
        #[arg(short, long)]
        out: Option<String>,

        /// Also write the filtered sample rows to this CSV
        #[arg(long)]
        csv: Option<String>,
    },

    /// Remediation treatments only
    Treatments {
        #[arg(short, long)]
        out: Option<String>,
    },

    /// Land-cover zone polygons
    Zones {
        #[arg(short, long)]
        out: Option<String>,
    },

    /// Ammonia readings for one step of the time series (first date by default)
    Timeseries {
        /// Sample date, YYYY-MM-DD
        #[arg(short, long)]
        date: Option<String>,

        #[arg(short, long)]
        out: Option<String>,
    },

    /// KPI sites and averages for one sample date
    Kpi {
        /// Sample date exactly as listed by `dates`
        #[arg(short, long)]
        date: String,

        #[arg(short, long)]
        out: Option<String>,

        #[arg(long)]
        csv: Option<String>,
    },

    /// Distinct sample dates available to the KPI view
    Dates,
}

pub async fn run<S: RowSource>(command: Command, source: &S) -> anyhow::Result<()> {
    match command {
        Command::Samples {
            year,
            month,
            no_treatments,
            out,
            csv,
        } => {
            let map = maps::samples(source, year, month, !no_treatments).await?;
            if let Some(path) = csv {
                export::write_rows_csv(&map.active_rows(), &path)?;
            }
            export::write_feature_collection(&map.surface().to_feature_collection(), out.as_deref())
        }
        Command::Treatments { out } => {
            let map = maps::treatments(source).await?;
            export::write_feature_collection(&map.surface().to_feature_collection(), out.as_deref())
        }
        Command::Zones { out } => {
            let map = maps::zones(source).await?;
            export::write_feature_collection(&map.surface().to_feature_collection(), out.as_deref())
        }
        Command::Timeseries { date, out } => {
            let map = maps::timeseries(source, date.as_deref()).await?;
            export::write_feature_collection(&map.surface().to_feature_collection(), out.as_deref())
        }
        Command::Kpi { date, out, csv } => {
            let (map, rows) = maps::kpi(source, &date).await?;
            if let Some(summary) = map.summary() {
                log::info!("{}", maps::kpi_line(&date, summary));
            }
            if let Some(path) = csv {
                export::write_rows_csv(&rows.iter().collect::<Vec<_>>(), &path)?;
            }
            export::write_feature_collection(&map.surface().to_feature_collection(), out.as_deref())
        }
        Command::Dates => {
            for date in maps::dates(source).await? {
                println!("{}", date);
            }
            Ok(())
        }
    }
}
