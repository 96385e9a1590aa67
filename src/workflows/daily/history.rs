//! Persistence collaborators for generated reports: a per-run JSON
//! snapshot and an append-only CSV of technician task counts for
//! historical tracking.

use super::report::{DailyReport, TaskCount};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug)]
pub enum HistoryError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for HistoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryError::Io(err) => write!(f, "failed to write report data: {}", err),
            HistoryError::Json(err) => write!(f, "failed to serialize report snapshot: {}", err),
            HistoryError::Csv(err) => write!(f, "failed to append technician metrics: {}", err),
        }
    }
}

impl std::error::Error for HistoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HistoryError::Io(err) => Some(err),
            HistoryError::Json(err) => Some(err),
            HistoryError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for HistoryError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for HistoryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<csv::Error> for HistoryError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Full structured record of one report run, serialized as a single JSON
/// document. Overwritten on each run; the CSV metrics file carries the
/// history.
#[derive(Debug, Serialize)]
pub struct ReportSnapshot<'a> {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub report: &'a DailyReport,
    pub task_counts: Vec<TaskCount>,
    pub activity_email: &'a str,
    pub department_email: &'a str,
}

impl<'a> ReportSnapshot<'a> {
    pub fn new(
        date: NaiveDate,
        report: &'a DailyReport,
        activity_email: &'a str,
        department_email: &'a str,
    ) -> Self {
        Self {
            date,
            report,
            task_counts: report.task_counts(),
            activity_email,
            department_email,
        }
    }
}

pub fn write_snapshot<P: AsRef<Path>>(
    path: P,
    snapshot: &ReportSnapshot<'_>,
) -> Result<(), HistoryError> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), snapshot)?;
    Ok(())
}

/// Appends one `Date,Technician,TaskCount` row per technician. The header
/// is written only when the file does not exist yet, so repeated runs build
/// a continuous history.
pub fn append_task_metrics<P: AsRef<Path>>(
    path: P,
    date: NaiveDate,
    counts: &[TaskCount],
) -> Result<(), HistoryError> {
    let path = path.as_ref();
    let write_header = !path.exists();

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    if write_header {
        writer.write_record(["Date", "Technician", "TaskCount"])?;
    }

    let date = date.format("%Y-%m-%d").to_string();
    for entry in counts {
        writer.write_record([
            date.as_str(),
            entry.technician.as_str(),
            entry.count.to_string().as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
