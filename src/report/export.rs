//! Snapshot writers for projection results

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;
use serde::Serialize;

use super::memo::generate_summary;
use crate::assumptions::Assumptions;
use crate::error::Result;
use crate::projection::{AnnualRow, MonthlyRow, ProjectionResult};

/// Create the parent directory of `path` if it does not exist
fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Ok(fs::create_dir_all(parent)?),
        _ => Ok(()),
    }
}

/// Write any serializable value as pretty-printed JSON
pub fn write_json<T: Serialize, P: AsRef<Path>>(path: P, value: &T) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// One CSV row per projection month
pub fn write_monthly_csv<P: AsRef<Path>>(path: P, rows: &[MonthlyRow]) -> Result<()> {
    write_rows(path.as_ref(), rows)
}

/// One CSV row per complete projection year
pub fn write_annual_csv<P: AsRef<Path>>(path: P, rows: &[AnnualRow]) -> Result<()> {
    write_rows(path.as_ref(), rows)
}

/// Full result record (monthly, annual, metrics) as JSON
pub fn write_result<P: AsRef<Path>>(path: P, result: &ProjectionResult) -> Result<()> {
    let path = path.as_ref();
    write_json(path, result)?;
    info!(
        "Wrote {} monthly and {} annual rows to {}",
        result.monthly.len(),
        result.annual.len(),
        path.display()
    );
    Ok(())
}

/// Render the underwriting memo and write it as Markdown
pub fn write_memo<P: AsRef<Path>>(path: P, assumptions: &Assumptions) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    fs::write(path, generate_summary(assumptions))?;
    info!("Wrote underwriting memo to {}", path.display());
    Ok(())
}
