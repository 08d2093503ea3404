//! Defect catalog of the quality report
//!
//! Labels are what the report prints; columns are the evaluation sheet
//! headers they read from. Several headers carry typos or doubled spaces
//! upstream, so lookups go through [`crate::types::column_key`].

/// Report label and sheet column of one defect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefectColumn {
    pub label: &'static str,
    pub column: &'static str,
}

const fn defect(label: &'static str, column: &'static str) -> DefectColumn {
    DefectColumn { label, column }
}

/// Quality defects (left column of the summary table)
pub const QUALITY_DEFECTS: &[DefectColumn] = &[
    defect("Frutos con Pedicelo", "FRUTOS CON PEDICELO"),
    defect("Fumagina", "FUMAGINA"),
    defect("F.Bloom", "F.BLOOM"),
    defect("Herida Cicatrizada", "HERIDA CICATRIZADA"),
    defect("Excreta de Abeja", "EXCRETA DE ABEJA"),
    defect("Russet", "RUSSET"),
    defect("Polvo", "POLVO"),
    defect("Frutos Rojizos", "FRUTOS ROJIZOS"),
    defect("Restos Florales", "RESTOS FLORALES"),
    defect("Halo Verde", "HALO VERDE"),
    defect("Picado", "PICADO"),
    defect("Bajo Calibre", "BAJO CALIBRE"),
    defect("Chanchito Blanco", "CHANCHITO BLANCO"),
    defect("F. Mojado", "F. MOJADA"),
    defect("Daño de Trips", "DAÑO DE TRIPS"),
    defect("Otros", "OTROS"),
];

/// Condition defects (right column of the summary table)
pub const CONDITION_DEFECTS: &[DefectColumn] = &[
    defect("Herida Abierta", "HERIDA ABIERTA"),
    defect("Queresa", "QUERESA"),
    defect("Deshidratación Leve", "DESHIDRATACIÓN  LEVE"),
    defect("Deshidratación Moderada", "DESHIDRATACION MODERADO"),
    defect("Deshidratación Severa", "DESHIDRATADO SEVERO"),
    defect("Machucón", "MACHUCON"),
    defect("Desgarro", "DESGARRO"),
    defect("Sobremaduro", "SOBREMADURO"),
    defect("Blanda Severa", "BLANDA SEVERA"),
    defect("Blanda Moderada", "BLANDA MODERADO"),
    defect("Excreta de Ave", "EXCRETA DE AVE"),
    defect("Hongos", "HONGOS"),
    defect("Pudricion", "PUDRICION"),
    defect("Baya Reventada", "BAYA REVENTADA"),
    defect("Baya Colapsada", "BAYA COLAPSADA"),
    defect("Presencia de Larva", "PRESENCIA DE LARVA"),
    defect("Exudation", "EXUDACION"),
    defect("Otros 2", "OTROS2"),
];

/// Header cells of the summary table
pub const DEFECT_TABLE_HEADER: [&str; 4] = ["Condición", "Porcentaje", "Condición", "Porcentaje"];

/// Totals kept as metrics but not printed in the summary table
pub const TOTAL_COLUMNS: &[&str] = &[
    "TOTAL DE DEFECTOS DE CALIDAD",
    "TOTAL DE CONDICION",
    "TOTAL DE EXPORTABLE",
    "TOTAL DE NO EXPORTABLE",
];

/// Every defect column, quality first.
pub fn all_defects() -> impl Iterator<Item = &'static DefectColumn> {
    QUALITY_DEFECTS.iter().chain(CONDITION_DEFECTS.iter())
}

/// Formats a defect percentage the way the report prints it.
pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value)
}
