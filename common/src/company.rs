//! Producer → parent company mapping

/// Parent company whose containers the dashboard reports on by default
pub const DEFAULT_COMPANY: &str = "SAN LUCAR S.A.";

/// Known producers and the company they ship for.
pub const PRODUCER_COMPANIES: &[(&str, &str)] = &[
    ("GMH BERRIES S.A.C", "AGRICOLA BLUE GOLD S.A.C."),
    ("BIG BERRIES S.A.C", "AGRICOLA BLUE GOLD S.A.C."),
    ("CANYON BERRIES S.A.C", "AGRICOLA BLUE GOLD S.A.C."),
    ("AGRICOLA BLUE GOLD S.A.C", "AGRICOLA BLUE GOLD S.A.C."),
    ("EXCELLENCE FRUIT S.A.C", "SAN LUCAR S.A."),
    ("GAP BERRIES S.A.C", "SAN LUCAR S.A."),
    ("SAN EFISIO S.A.C", "SAN LUCAR S.A."),
    ("TARA FARMS S.A.C", "SAN LUCAR S.A."),
    ("QBERRIES S.A.C", "SAN LUCAR S.A."),
];

/// Company for a producer; unknown producers are their own company.
pub fn company_for_producer(producer: &str) -> String {
    let trimmed = producer.trim();
    PRODUCER_COMPANIES
        .iter()
        .find(|(name, _)| *name == trimmed)
        .map(|(_, company)| company.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}
