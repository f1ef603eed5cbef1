//! Writers for rendered layers and row exports.

use geojson::FeatureCollection;
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};

/// Write `collection` as pretty JSON to `path`, or to stdout when `None`.
pub fn write_feature_collection(
    collection: &FeatureCollection,
    path: Option<&str>,
) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)?;
            write_json(collection, file)?;
            info!("wrote {} features to {}", collection.features.len(), path);
        }
        None => write_json(collection, io::stdout().lock())?,
    }
    Ok(())
}

fn write_json<W: Write>(collection: &FeatureCollection, mut out: W) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut out, collection)?;
    writeln!(out)?;
    Ok(())
}

/// Write rows as CSV with a header taken from the record's field names.
pub fn write_rows_csv<T: Serialize>(rows: &[&T], path: &str) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    write_rows(&mut writer, rows)?;
    info!("wrote {} rows to {}", rows.len(), path);
    Ok(())
}

fn write_rows<W: Write, T: Serialize>(
    writer: &mut csv::Writer<W>,
    rows: &[&T],
) -> anyhow::Result<()> {
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
