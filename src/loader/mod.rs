//! Sheet → record loaders
//!
//! One loader per upstream source. Each one cleans its cells the same way:
//! sentinel strings and blanks fall back to a default, numbers fall back
//! to 0, and codes are rewritten to the join key.

pub mod despacho;
pub mod evaluation;

pub use despacho::{load_despachos, load_master_list};
pub use evaluation::load_evaluations;

use crate::sheet::SheetRow;
use fcl_quality_common::fcl::is_missing_code;

/// Default for missing descriptive fields
pub const NOT_SPECIFIED: &str = "NO ESPECIFICADO";

/// Default for missing free-text fields
pub const DASH: &str = "-";

/// Text of the first header present in the row, sentinels removed.
pub(crate) fn first_text(row: &SheetRow<'_>, headers: &[&str]) -> Option<String> {
    headers
        .iter()
        .find_map(|h| row.text(h))
        .filter(|text| !is_missing_code(text))
}

/// Cleaned text or `default`.
pub(crate) fn text_or(row: &SheetRow<'_>, header: &str, default: &str) -> String {
    first_text(row, &[header]).unwrap_or_else(|| default.to_string())
}

pub(crate) fn number_or_zero(row: &SheetRow<'_>, header: &str) -> f64 {
    row.number(header).filter(|n| n.is_finite()).unwrap_or(0.0)
}
