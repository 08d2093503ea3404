//! Finished-product quality evaluations

use super::{first_text, number_or_zero, text_or, DASH, NOT_SPECIFIED};
use crate::error::Result;
use crate::sheet::{Cell, Sheet, SheetRow};
use crate::source::{WorkbookSource, EVALUATION_SHEET};
use fcl_quality_common::company::company_for_producer;
use fcl_quality_common::defects::{all_defects, TOTAL_COLUMNS};
use fcl_quality_common::fcl::fcl_join_key;
use fcl_quality_common::presentation::{categorize_presentation, compact_presentation};
use fcl_quality_common::{column_key, EvaluationRecord};
use std::collections::{BTreeMap, HashSet};

/// Spellings of the container column
pub const FCL_HEADERS: &[&str] = &["N° FCL", "Nº FCL", "N FCL", "FCL"];

const PESO_MUESTRA: &str = "PESO DE MUESTRA (g)";

/// Columns mapped to named fields; everything else numeric is a metric.
const NAMED_COLUMNS: &[&str] = &[
    "N° FCL",
    "Nº FCL",
    "FECHA DE MP",
    "FECHA DE PROCESO",
    "SEMANA",
    "TURNO",
    "MODULO",
    "EVALUADOR",
    "PRODUCTOR",
    "EMPRESA",
    "TIPO DE PRODUCTO",
    "FUNDO",
    "VARIEDAD",
    "PRESENTACION",
    "DESTINO",
    "TIPO DE CAJA",
    "TRAZABILIDAD",
    "OBSERVACIONES",
    "CALIBRE",
    "BRIX",
    "ACIDEZ",
    PESO_MUESTRA,
];

/// Shift column: `Dia` means shift 2 and `111` is a typo for 11.
fn parse_turno(cell: &Cell) -> i64 {
    match cell {
        Cell::Text(s) if s.trim().eq_ignore_ascii_case("dia") => 2,
        other => match other.as_f64().map(|n| n as i64) {
            Some(111) => 11,
            Some(n) => n,
            None => 0,
        },
    }
}

/// Module column; a stray backtick shows up in front of the number.
fn parse_modulo(row: &SheetRow<'_>) -> String {
    row.text("MODULO")
        .map(|m| m.trim_start_matches('`').to_string())
        .unwrap_or_else(|| DASH.to_string())
}

/// Column keys resolved once per sheet
struct MetricColumns {
    named: HashSet<String>,
    /// Defect and total columns, present on every record
    always: Vec<String>,
}

impl MetricColumns {
    fn new() -> Self {
        Self {
            named: NAMED_COLUMNS.iter().map(|c| column_key(c)).collect(),
            always: all_defects()
                .map(|d| column_key(d.column))
                .chain(TOTAL_COLUMNS.iter().map(|c| column_key(c)))
                .collect(),
        }
    }
}

fn record_from_row(row: &SheetRow<'_>, fcl_raw: String, columns: &MetricColumns) -> EvaluationRecord {
    let productor = text_or(row, "PRODUCTOR", DASH);
    let presentacion_raw = first_text(row, &["PRESENTACION"]);
    let presentacion = categorize_presentation(
        presentacion_raw.as_deref().map(compact_presentation).as_deref(),
    );

    let mut metrics: BTreeMap<String, f64> = row
        .cells()
        .map(|(header, cell)| (column_key(header), cell))
        .filter(|(key, _)| !columns.named.contains(key))
        .filter_map(|(key, cell)| cell.as_f64().filter(|v| v.is_finite()).map(|v| (key, v)))
        .collect();
    for key in &columns.always {
        metrics.entry(key.clone()).or_insert(0.0);
    }

    EvaluationRecord {
        fcl: fcl_join_key(&fcl_raw),
        fcl_raw,
        fecha_mp: row.date("FECHA DE MP", &[]),
        fecha_proceso: row.date("FECHA DE PROCESO", &[]),
        semana: number_or_zero(row, "SEMANA") as i64,
        turno: parse_turno(row.get("TURNO")),
        modulo: parse_modulo(row),
        evaluador: text_or(row, "EVALUADOR", DASH),
        empresa: company_for_producer(&productor),
        productor,
        tipo_producto: text_or(row, "TIPO DE PRODUCTO", DASH),
        fundo: text_or(row, "FUNDO", DASH),
        variedad: text_or(row, "VARIEDAD", NOT_SPECIFIED),
        presentacion,
        presentacion_raw: presentacion_raw.unwrap_or_else(|| NOT_SPECIFIED.to_string()),
        destino: text_or(row, "DESTINO", NOT_SPECIFIED),
        tipo_caja: text_or(row, "TIPO DE CAJA", DASH),
        trazabilidad: text_or(row, "TRAZABILIDAD", DASH),
        observaciones: text_or(row, "OBSERVACIONES", DASH),
        calibre: text_or(row, "CALIBRE", DASH),
        brix: number_or_zero(row, "BRIX"),
        acidez: number_or_zero(row, "ACIDEZ"),
        peso_muestra: number_or_zero(row, PESO_MUESTRA),
        metrics,
    }
}

/// Cleans the evaluation sheet into records.
///
/// Rows without a container code are dropped. When `company` is given only
/// that parent company's rows are kept. Newest process date first.
pub fn evaluations_from_sheet(sheet: &Sheet, company: Option<&str>) -> Vec<EvaluationRecord> {
    let columns = MetricColumns::new();

    let mut dropped = 0usize;
    let mut records: Vec<EvaluationRecord> = sheet
        .rows()
        .filter_map(|row| match first_text(&row, FCL_HEADERS) {
            Some(fcl_raw) => Some(record_from_row(&row, fcl_raw, &columns)),
            None => {
                dropped += 1;
                None
            }
        })
        .filter(|record| company.map_or(true, |c| record.empresa == c))
        .collect();

    records.sort_by(|a, b| b.fecha_proceso.cmp(&a.fecha_proceso));

    tracing::debug!(
        kept = records.len(),
        sin_fcl = dropped,
        "evaluaciones limpiadas"
    );
    records
}

/// Loads and cleans the evaluation workbook.
pub async fn load_evaluations<S: WorkbookSource>(
    source: &S,
    company: Option<&str>,
) -> Result<Vec<EvaluationRecord>> {
    let sheet = source.read_sheet(&EVALUATION_SHEET).await?;
    Ok(evaluations_from_sheet(&sheet, company))
}
