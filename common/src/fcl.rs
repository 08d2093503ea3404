//! FCL (container) code normalization
//!
//! Upstream sheets spell the same container in several ways
//! (`EXCE045-A`, `EXC45`, `gp7`, ...). Every join between sources goes
//! through [`fcl_join_key`] so that those spellings land on one key.
//!
//! ## Rules (applied in order)
//! 1. Missing input is returned unchanged
//! 2. Trim whitespace
//! 3. Drop everything from the first hyphen
//! 4. `EXCE` prefix → `EXC`
//! 5. `GP` prefix → `GAP`
//! 6. Split into alphabetic prefix + numeric suffix (no match → pass-through)
//! 7. Suffix longer than 3 digits keeps its last 3
//! 8. Suffix shorter than 3 digits is zero-padded

use lazy_static::lazy_static;
use regex::Regex;

/// Number of digits in a canonical FCL suffix
pub const FCL_DIGITS: usize = 3;

lazy_static! {
    static ref FCL_PATTERN: Regex = Regex::new(r"^([A-Z]+)([0-9]+)$").unwrap();
}

/// Normalizes a raw FCL code into its canonical form.
///
/// Never fails: input that does not look like `PREFIX` + digits is returned
/// after the trimming and prefix rewrites.
pub fn normalize_fcl_code(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    Some(normalize_present(raw))
}

fn normalize_present(raw: &str) -> String {
    let mut code = raw.trim();

    if let Some(idx) = code.find('-') {
        code = &code[..idx];
    }

    let mut code = code.to_string();

    if let Some(rest) = code.strip_prefix("EXCE") {
        code = format!("EXC{}", rest);
    }

    if let Some(rest) = code.strip_prefix("GP") {
        code = format!("GAP{}", rest);
    }

    let Some(caps) = FCL_PATTERN.captures(&code) else {
        return code;
    };

    let prefix = &caps[1];
    let digits = &caps[2];

    let suffix = if digits.len() > FCL_DIGITS {
        // keeps the last 3 digits; see DESIGN.md open question
        digits[digits.len() - FCL_DIGITS..].to_string()
    } else {
        format!("{:0>width$}", digits, width = FCL_DIGITS)
    };

    format!("{}{}", prefix, suffix)
}

/// Join key used when linking rows across sources.
///
/// Same as [`normalize_fcl_code`] but case-insensitive: the input is
/// uppercased first, so `exc45` and `EXC045` meet on `EXC045`.
pub fn fcl_join_key(raw: &str) -> String {
    normalize_present(&raw.trim().to_uppercase())
}

/// True when the code is already `PREFIX` + exactly 3 digits and carries
/// none of the prefix typos the normalizer rewrites.
pub fn is_canonical(code: &str) -> bool {
    if code.starts_with("EXCE") || code.starts_with("GP") {
        return false;
    }
    FCL_PATTERN
        .captures(code)
        .map(|caps| caps[2].len() == FCL_DIGITS)
        .unwrap_or(false)
}

/// Values upstream sheets use to mean "no FCL".
pub fn is_missing_code(raw: &str) -> bool {
    matches!(
        raw.trim(),
        "" | "-" | "None" | "nan" | "NaN" | "NULL" | "null"
    )
}
