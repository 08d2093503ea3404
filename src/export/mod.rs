pub mod excel;
pub mod pdf;

pub use excel::generate_detail_workbook;
pub use pdf::generate_fcl_pdf_report;

use chrono::NaiveDateTime;
use fcl_quality_common::ReportKind;
use std::path::{Path, PathBuf};

/// Where a report lands: a directory (or extension-less path) gets the
/// generated file name, anything else is used as given.
pub fn report_output_path(output: Option<&Path>, kind: ReportKind, fcl: &str, at: NaiveDateTime) -> PathBuf {
    let file_name = kind.filename(fcl, at);
    match output {
        Some(path) if path.is_dir() || path.extension().is_none() => path.join(file_name),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(file_name),
    }
}

/// Same rule for the detail workbook: `Detalle_{FCL}_{timestamp}.xlsx`.
pub fn workbook_output_path(output: Option<&Path>, fcl: &str, at: NaiveDateTime) -> PathBuf {
    let file_name = format!("Detalle_{}_{}.xlsx", fcl, at.format("%Y%m%d_%H%M%S"));
    match output {
        Some(path) if path.is_dir() || path.extension().is_none() => path.join(file_name),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(file_name),
    }
}
