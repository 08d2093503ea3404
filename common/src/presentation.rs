//! Packaging presentation categories
//!
//! The evaluation sheet carries a free-text presentation ("Bandeja Blanca
//! 3.3KG", "8x18oz clamshell", ...). Reports group on one of seven labels.

/// Label for a missing presentation
pub const NOT_SPECIFIED: &str = "NO_ESPECIFICADO";

/// (substring, label) rules, checked in order.
///
/// `"3.3"` must come before `"3KG"` because `"3.3KG"` contains `"3KG"`.
pub const PRESENTATION_RULES: &[(&str, &str)] = &[
    ("4.4", "4.4 OZ"),
    ("3.3", "BANDEJA BLANCA 3.3KG"),
    ("3KG", "BANDEJA BLANCA 3KG"),
    ("8X18OZ", "8X18 OZ"),
    ("9.8OZ", "9.8 OZ PINTA PLANA"),
    ("6OZ", "6 OZ"),
    ("12X18", "12X18 OZ"),
];

/// Maps a free-text presentation to its canonical label.
///
/// Unmatched text comes back uppercased and trimmed.
pub fn categorize_presentation(presentation: Option<&str>) -> String {
    let Some(presentation) = presentation else {
        return NOT_SPECIFIED.to_string();
    };

    let upper = presentation.trim().to_uppercase();

    PRESENTATION_RULES
        .iter()
        .find(|(needle, _)| upper.contains(needle))
        .map(|(_, label)| label.to_string())
        .unwrap_or(upper)
}

/// Uppercases and removes every space, the form the evaluation sheet is
/// compared in before categorizing ("8x18 oz" → "8X18OZ").
pub fn compact_presentation(presentation: &str) -> String {
    presentation
        .to_uppercase()
        .chars()
        .filter(|c| *c != ' ')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bandeja_blanca() {
        assert_eq!(
            categorize_presentation(Some("Bandeja Blanca 3.3KG")),
            "BANDEJA BLANCA 3.3KG"
        );
        assert_eq!(
            categorize_presentation(Some("bandeja 3kg")),
            "BANDEJA BLANCA 3KG"
        );
    }

    #[test]
    fn test_priority_order() {
        // contains both "4.4" and "6OZ"; the first rule wins
        assert_eq!(categorize_presentation(Some("4.4 / 6OZ")), "4.4 OZ");
        // "3.3KG" also contains "3KG"
        assert_eq!(categorize_presentation(Some("3.3KG")), "BANDEJA BLANCA 3.3KG");
    }

    #[test]
    fn test_all_labels() {
        assert_eq!(categorize_presentation(Some("8X18OZ")), "8X18 OZ");
        assert_eq!(categorize_presentation(Some("9.8OZ PP")), "9.8 OZ PINTA PLANA");
        assert_eq!(categorize_presentation(Some("6oz")), "6 OZ");
        assert_eq!(categorize_presentation(Some("12x18 oz")), "12X18 OZ");
    }

    #[test]
    fn test_unmatched_is_uppercased_and_trimmed() {
        assert_eq!(categorize_presentation(Some("  granel  ")), "GRANEL");
        assert_eq!(categorize_presentation(Some("8x18 oz")), "8X18 OZ");
    }

    #[test]
    fn test_missing_presentation() {
        assert_eq!(categorize_presentation(None), NOT_SPECIFIED);
    }

    #[test]
    fn test_compact_then_categorize() {
        let compact = compact_presentation("8 x 18 oz");
        assert_eq!(compact, "8X18OZ");
        assert_eq!(categorize_presentation(Some(&compact)), "8X18 OZ");
    }
}
