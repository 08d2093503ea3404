//! Classification of single code rewrites

use fcl_quality_common::fcl::{fcl_join_key, FCL_DIGITS};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref CODE_SHAPE: Regex = Regex::new(r"^([A-Z]+)([0-9]+)$").unwrap();
}

/// Prefix typos seen in the packing sheets, with their fix
const PREFIX_TYPOS: &[(&str, &str)] = &[("EXCE", "EXC"), ("EZCE", "EXC"), ("GP", "GAP")];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CorrectionReason {
    Whitespace,
    Case,
    HyphenSuffix,
    PrefixTypo,
    Padding,
    Truncation,
}

impl std::fmt::Display for CorrectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CorrectionReason::Whitespace => write!(f, "espacios"),
            CorrectionReason::Case => write!(f, "mayúsculas"),
            CorrectionReason::HyphenSuffix => write!(f, "sufijo con guion"),
            CorrectionReason::PrefixTypo => write!(f, "prefijo mal escrito"),
            CorrectionReason::Padding => write!(f, "relleno con ceros"),
            CorrectionReason::Truncation => write!(f, "recorte a 3 dígitos"),
        }
    }
}

/// Join key of a programming-sheet code.
///
/// Those sheets also write `EZCE` for `EXC` anywhere in the code.
pub fn despacho_code_key(raw: &str) -> String {
    fcl_join_key(&raw.to_uppercase().replace("EZCE", "EXC"))
}

/// Why `raw` does not equal its join key, in rule order.
pub fn explain_correction(raw: &str) -> Vec<CorrectionReason> {
    let mut reasons = Vec::new();

    let trimmed = raw.trim();
    if trimmed != raw {
        reasons.push(CorrectionReason::Whitespace);
    }

    let upper = trimmed.to_uppercase();
    if upper != trimmed {
        reasons.push(CorrectionReason::Case);
    }

    let mut code = upper.as_str();
    if let Some((head, _)) = code.split_once('-') {
        reasons.push(CorrectionReason::HyphenSuffix);
        code = head;
    }

    let mut code = code.to_string();
    for (typo, fix) in PREFIX_TYPOS {
        if let Some(rest) = code.strip_prefix(typo) {
            reasons.push(CorrectionReason::PrefixTypo);
            code = format!("{}{}", fix, rest);
            break;
        }
    }

    if let Some(caps) = CODE_SHAPE.captures(&code) {
        let digits = caps[2].len();
        if digits < FCL_DIGITS {
            reasons.push(CorrectionReason::Padding);
        } else if digits > FCL_DIGITS {
            reasons.push(CorrectionReason::Truncation);
        }
    }

    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use CorrectionReason::*;

    #[test]
    fn test_explain_examples() {
        assert_eq!(explain_correction("EXCE045-A"), vec![HyphenSuffix, PrefixTypo]);
        assert_eq!(explain_correction("GP7"), vec![PrefixTypo, Padding]);
        assert_eq!(explain_correction("EXC12345"), vec![Truncation]);
        assert_eq!(explain_correction(" exc45 "), vec![Whitespace, Case, Padding]);
    }

    #[test]
    fn test_canonical_code_needs_nothing() {
        assert!(explain_correction("EXC045").is_empty());
        assert!(explain_correction("SIN FCL").is_empty());
    }

    #[test]
    fn test_despacho_code_key() {
        assert_eq!(despacho_code_key("EZCE45"), "EXC045");
        assert_eq!(despacho_code_key("ezce45-b"), "EXC045");
        assert_eq!(despacho_code_key("GAP012"), "GAP012");
    }
}
