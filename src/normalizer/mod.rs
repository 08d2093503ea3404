//! FCL code normalization report
//!
//! Every source rewrites its raw codes to the join key before linking.
//! This module records what each rewrite did so diagnostics can show
//! which spellings were merged.
//!
//! ## Flow
//! 1. Classify each raw code (whitespace, case, hyphen suffix, prefix typo, padding)
//! 2. Collect one correction per distinct raw code
//! 3. Count totals per source

pub mod code;

pub use code::{despacho_code_key, explain_correction, CorrectionReason};

use fcl_quality_common::fcl::{fcl_join_key, is_canonical, is_missing_code};
use serde::Serialize;
use std::collections::BTreeSet;

/// Where a code came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum CodeSource {
    Evaluacion,
    Programacion,
    ListaMaestra,
}

impl std::fmt::Display for CodeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodeSource::Evaluacion => write!(f, "Evaluación PT"),
            CodeSource::Programacion => write!(f, "Programación"),
            CodeSource::ListaMaestra => write!(f, "Lista maestra"),
        }
    }
}

/// One raw code and the key it was rewritten to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeCorrection {
    pub source: CodeSource,
    pub original: String,
    pub corrected: String,
    pub reasons: Vec<CorrectionReason>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizationStats {
    /// Codes seen, sentinels included
    pub total_codes: usize,
    /// Codes that were `-`, `nan` or blank
    pub missing_codes: usize,
    /// Distinct raw codes that changed
    pub corrected_codes: usize,
    /// Keys that still do not look like `PREFIX` + 3 digits
    pub non_canonical: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NormalizationResult {
    pub corrections: Vec<CodeCorrection>,
    pub stats: NormalizationStats,
    /// Keys left in a non-canonical shape
    pub non_canonical: BTreeSet<String>,
}

/// Rewrites `raws` with `key_fn` and reports what changed.
pub fn normalize_codes<'a>(
    source: CodeSource,
    raws: impl IntoIterator<Item = &'a str>,
    key_fn: impl Fn(&str) -> String,
) -> NormalizationResult {
    let mut result = NormalizationResult::default();
    let mut seen = BTreeSet::new();

    for raw in raws {
        result.stats.total_codes += 1;
        if is_missing_code(raw) {
            result.stats.missing_codes += 1;
            continue;
        }
        if !seen.insert(raw.to_string()) {
            continue;
        }

        let corrected = key_fn(raw);
        if !is_canonical(&corrected) {
            result.non_canonical.insert(corrected.clone());
        }
        if corrected != raw {
            result.corrections.push(CodeCorrection {
                source,
                original: raw.to_string(),
                corrected,
                reasons: explain_correction(raw),
            });
        }
    }

    result.stats.corrected_codes = result.corrections.len();
    result.stats.non_canonical = result.non_canonical.len();
    result
}

/// [`normalize_codes`] with the standard join key.
pub fn normalize_join_codes<'a>(
    source: CodeSource,
    raws: impl IntoIterator<Item = &'a str>,
) -> NormalizationResult {
    normalize_codes(source, raws, fcl_join_key)
}
