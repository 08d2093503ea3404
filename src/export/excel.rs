//! Detail rows of an FCL as an xlsx workbook (rust_xlsxwriter)
//!
//! One header row, then one row per evaluation: named fields first, then
//! every metric column (defects in catalog order, totals, the rest sorted).

use crate::error::Result;
use fcl_quality_common::column_key;
use fcl_quality_common::defects::{all_defects, TOTAL_COLUMNS};
use fcl_quality_common::EvaluationRecord;
use rust_xlsxwriter::*;
use std::collections::BTreeSet;
use std::path::Path;

const SHEET_NAME_MAX: usize = 31;

enum Value {
    Text(String),
    Number(f64),
}

/// Named columns and how to read them
const NAMED_COLUMNS: &[(&str, fn(&EvaluationRecord) -> Value)] = &[
    ("N° FCL", |r| Value::Text(r.fcl.clone())),
    ("FCL ORIGINAL", |r| Value::Text(r.fcl_raw.clone())),
    ("FECHA DE MP", |r| Value::Text(date_text(r.fecha_mp))),
    ("FECHA DE PROCESO", |r| Value::Text(date_text(r.fecha_proceso))),
    ("SEMANA", |r| Value::Number(r.semana as f64)),
    ("TURNO", |r| Value::Number(r.turno as f64)),
    ("MODULO", |r| Value::Text(r.modulo.clone())),
    ("EVALUADOR", |r| Value::Text(r.evaluador.clone())),
    ("PRODUCTOR", |r| Value::Text(r.productor.clone())),
    ("EMPRESA", |r| Value::Text(r.empresa.clone())),
    ("TIPO DE PRODUCTO", |r| Value::Text(r.tipo_producto.clone())),
    ("FUNDO", |r| Value::Text(r.fundo.clone())),
    ("VARIEDAD", |r| Value::Text(r.variedad.clone())),
    ("PRESENTACION", |r| Value::Text(r.presentacion.clone())),
    ("DESTINO", |r| Value::Text(r.destino.clone())),
    ("TIPO DE CAJA", |r| Value::Text(r.tipo_caja.clone())),
    ("TRAZABILIDAD", |r| Value::Text(r.trazabilidad.clone())),
    ("CALIBRE", |r| Value::Text(r.calibre.clone())),
    ("BRIX", |r| Value::Number(r.brix)),
    ("ACIDEZ", |r| Value::Number(r.acidez)),
    ("PESO DE MUESTRA (g)", |r| Value::Number(r.peso_muestra)),
    ("OBSERVACIONES", |r| Value::Text(r.observaciones.clone())),
];

fn date_text(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Metric columns present in `records`, catalog columns first.
pub fn metric_columns(records: &[EvaluationRecord]) -> Vec<String> {
    let present: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.metrics.keys().map(String::as_str))
        .collect();

    let mut columns: Vec<String> = all_defects()
        .map(|d| column_key(d.column))
        .chain(TOTAL_COLUMNS.iter().map(|c| column_key(c)))
        .filter(|key| present.contains(key.as_str()))
        .collect();
    let catalog: BTreeSet<String> = columns.iter().cloned().collect();
    columns.extend(
        present
            .into_iter()
            .filter(|key| !catalog.contains(*key))
            .map(str::to_string),
    );
    columns
}

/// Worksheet name for an FCL; Excel forbids `[]:*?/\` and >31 chars.
fn sheet_name(fcl: &str) -> String {
    let cleaned: String = fcl
        .chars()
        .map(|c| if "[]:*?/\\".contains(c) { '_' } else { c })
        .collect();
    let name = format!("FCL {}", cleaned.trim());
    name.chars().take(SHEET_NAME_MAX).collect()
}

/// Writes the detail rows of `fcl` and returns the xlsx bytes; also saved
/// to `output` when given.
pub fn generate_detail_workbook(
    fcl: &str,
    records: &[EvaluationRecord],
    output: Option<&Path>,
) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_font_size(9.0)
        .set_font_color(Color::RGB(0x1E3A8A))
        .set_background_color(Color::RGB(0xDBEAFE))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0x808080));

    let text_format = Format::new()
        .set_font_size(9.0)
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let number_format = Format::new()
        .set_font_size(9.0)
        .set_num_format("0.00")
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let metrics = metric_columns(records);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name(fcl))?;
    worksheet.set_row_height(0, 30)?;
    worksheet.set_freeze_panes(1, 1)?;

    let headers = NAMED_COLUMNS
        .iter()
        .map(|(header, _)| *header)
        .chain(metrics.iter().map(String::as_str));
    for (col, header) in headers.enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, header, &header_format)?;
        worksheet.set_column_width(col, 14)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1;
        for (col, (_, read)) in NAMED_COLUMNS.iter().enumerate() {
            match read(record) {
                Value::Text(text) => {
                    worksheet.write_string_with_format(row, col as u16, &text, &text_format)?
                }
                Value::Number(n) => {
                    worksheet.write_number_with_format(row, col as u16, n, &number_format)?
                }
            };
        }
        for (offset, key) in metrics.iter().enumerate() {
            let col = (NAMED_COLUMNS.len() + offset) as u16;
            worksheet.write_number_with_format(row, col, record.metric(key), &number_format)?;
        }
    }

    let bytes = workbook.save_to_buffer()?;
    if let Some(path) = output {
        std::fs::write(path, &bytes)?;
        tracing::info!(path = %path.display(), filas = records.len(), "Excel guardado");
    }
    Ok(bytes)
}
