//! PDF report content, independent of the drawing backend.
//!
//! Everything here is plain data: which rows the info grid shows, the
//! defect table cells, the photo payloads. The binary crate draws it.

use crate::defects::{format_percentage, CONDITION_DEFECTS, QUALITY_DEFECTS};
use crate::error::{Error, Result};
use crate::types::{DespachoRecord, EvaluationRecord};
use base64::Engine;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

/// Value printed for a summary key that is absent
pub const MISSING_VALUE: &str = "N/A";

/// Key/value summary of the container the report is about
pub type ReportSummary = BTreeMap<String, String>;

/// Which report to build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportKind {
    #[default]
    Quality,
    Despacho,
}

/// One info-grid cell: printed label and summary key
type InfoCell = (&'static str, &'static str);

const QUALITY_INFO: &[&[InfoCell]] = &[
    &[("FCL:", "N° FCL")],
    &[("Productor:", "PRODUCTOR"), ("Variedad:", "VARIEDAD")],
    &[("Presentación:", "PRESENTACION"), ("Destino:", "DESTINO")],
    &[("Brix:", "BRIX"), ("Acidez:", "ACIDEZ")],
];

const DESPACHO_INFO: &[&[InfoCell]] = &[
    &[("FCL:", "FCL")],
    &[("Cliente:", "CLIENTE"), ("Empresa:", "EMPRESA")],
    &[("Envío:", "ENVIO"), ("Estado:", "ESTADO")],
    &[("Destino:", "DESTINO"), ("Presentación:", "PRESENTACION")],
    &[("F. Despacho:", "FECHA DE DESPACHO"), ("ETD:", "ETD")],
    &[("ETA:", "ETA")],
];

impl ReportKind {
    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Quality => "INFORME DE CONTROL DE CALIDAD",
            ReportKind::Despacho => "INFORME DE DESPACHO",
        }
    }

    fn filename_prefix(&self) -> &'static str {
        match self {
            ReportKind::Quality => "Quality_Control_Report",
            ReportKind::Despacho => "Despacho_Report",
        }
    }

    /// `{Prefix}_{FCL}_{YYYYmmdd_HHMMSS}.pdf`
    pub fn filename(&self, fcl: &str, at: NaiveDateTime) -> String {
        format!(
            "{}_{}_{}.pdf",
            self.filename_prefix(),
            fcl,
            at.format("%Y%m%d_%H%M%S")
        )
    }

    fn info_layout(&self) -> &'static [&'static [InfoCell]] {
        match self {
            ReportKind::Quality => QUALITY_INFO,
            ReportKind::Despacho => DESPACHO_INFO,
        }
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y/%m/%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Summary of an evaluation, keyed by the sheet's own headers.
pub fn quality_summary(record: &EvaluationRecord) -> ReportSummary {
    let mut summary = ReportSummary::new();
    summary.insert("N° FCL".into(), record.fcl.clone());
    summary.insert("VARIEDAD".into(), record.variedad.clone());
    summary.insert("PRODUCTOR".into(), record.productor.clone());
    summary.insert("TIPO DE PRODUCTO".into(), record.tipo_producto.clone());
    summary.insert("FUNDO".into(), record.fundo.clone());
    summary.insert("PRESENTACION".into(), record.presentacion.clone());
    summary.insert("DESTINO".into(), record.destino.clone());
    summary.insert("SEMANA".into(), record.semana.to_string());
    summary.insert("BRIX".into(), record.brix.to_string());
    summary.insert("ACIDEZ".into(), record.acidez.to_string());
    summary.insert("FECHA DE MP".into(), format_date(record.fecha_mp));
    summary.insert("FECHA DE PROCESO".into(), format_date(record.fecha_proceso));
    summary
}

/// Summary of a dispatch.
pub fn despacho_summary(record: &DespachoRecord) -> ReportSummary {
    let mut summary = ReportSummary::new();
    summary.insert("FCL".into(), record.fcl.clone());
    summary.insert("CLIENTE".into(), record.cliente.clone());
    summary.insert("EMPRESA".into(), record.empresa.clone());
    summary.insert("ENVIO".into(), record.envio.to_string());
    summary.insert("ESTADO".into(), record.estado.clone());
    summary.insert("DESTINO".into(), record.destino.clone());
    summary.insert("PRESENTACION".into(), record.presentacion.clone());
    summary.insert("FECHA DE DESPACHO".into(), format_date(record.fecha_despacho));
    summary.insert("ETD".into(), format_date(record.etd));
    summary.insert("ETA".into(), format_date(record.eta));
    summary
}

/// One label/value pair of the info grid
#[derive(Debug, Clone, PartialEq)]
pub struct PdfInfoField {
    pub label: &'static str,
    pub value: String,
}

/// Info grid rows for the report kind. Absent keys print as `N/A`.
pub fn build_info_rows(kind: ReportKind, summary: &ReportSummary) -> Vec<Vec<PdfInfoField>> {
    kind.info_layout()
        .iter()
        .map(|row| {
            row.iter()
                .map(|&(label, key)| PdfInfoField {
                    label,
                    value: summary
                        .get(key)
                        .cloned()
                        .unwrap_or_else(|| MISSING_VALUE.to_string()),
                })
                .collect()
        })
        .collect()
}

/// Defect table body: `[quality label, %, condition label, %]` per row.
///
/// The quality column is shorter; its trailing cells are blank.
pub fn build_defect_rows(first: &EvaluationRecord) -> Vec<[String; 4]> {
    let rows = QUALITY_DEFECTS.len().max(CONDITION_DEFECTS.len());
    (0..rows)
        .map(|i| {
            let (ql, qv) = match QUALITY_DEFECTS.get(i) {
                Some(d) => (d.label.to_string(), format_percentage(first.metric(d.column))),
                None => (String::new(), String::new()),
            };
            let (cl, cv) = match CONDITION_DEFECTS.get(i) {
                Some(d) => (d.label.to_string(), format_percentage(first.metric(d.column))),
                None => (String::new(), String::new()),
            };
            [ql, qv, cl, cv]
        })
        .collect()
}

/// Label/value lines of the per-row detail page.
pub fn detail_lines(record: &EvaluationRecord) -> Vec<(String, String)> {
    let mut lines = vec![
        ("Fecha MP".to_string(), format_date(record.fecha_mp)),
        ("Fecha Proceso".to_string(), format_date(record.fecha_proceso)),
        ("Semana".to_string(), record.semana.to_string()),
        ("Turno".to_string(), record.turno.to_string()),
        ("Evaluador".to_string(), record.evaluador.clone()),
        ("Productor".to_string(), record.productor.clone()),
        ("Tipo".to_string(), record.tipo_producto.clone()),
        ("Fundo".to_string(), record.fundo.clone()),
        ("Peso Muestra (g)".to_string(), record.peso_muestra.to_string()),
        ("Calibre".to_string(), record.calibre.clone()),
        ("Brix".to_string(), format!("{:.2}", record.brix)),
        ("Acidez".to_string(), format!("{:.2}", record.acidez)),
    ];
    lines.extend(
        record
            .metrics
            .iter()
            .map(|(column, value)| (column.clone(), value.to_string())),
    );
    lines
}

/// Decodes an image payload from the store.
///
/// Accepts bare base64 or a `data:image/...;base64,` URI.
pub fn decode_image_data(data: &str) -> Result<Vec<u8>> {
    let payload = match data.trim() {
        uri if uri.starts_with("data:image") => uri
            .split_once(',')
            .map(|(_, b64)| b64)
            .ok_or_else(|| Error::Parse("data URI sin contenido".to_string()))?,
        bare => bare,
    };
    Ok(base64::engine::general_purpose::STANDARD.decode(payload.trim())?)
}

/// Replaces characters the builtin PDF fonts cannot show.
pub fn pdf_safe_text(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'á' | 'à' => 'a',
            'é' | 'è' => 'e',
            'í' | 'ì' => 'i',
            'ó' | 'ò' => 'o',
            'ú' | 'ù' | 'ü' => 'u',
            'Á' | 'À' => 'A',
            'É' | 'È' => 'E',
            'Í' | 'Ì' => 'I',
            'Ó' | 'Ò' => 'O',
            'Ú' | 'Ù' | 'Ü' => 'U',
            'ñ' => 'n',
            'Ñ' => 'N',
            '°' | 'º' => 'o',
            c if c.is_ascii() => c,
            _ => '?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::column_key;

    #[test]
    fn test_filename_patterns() {
        let at = NaiveDate::from_ymd_opt(2025, 3, 7)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap();
        assert_eq!(
            ReportKind::Quality.filename("EXC045", at),
            "Quality_Control_Report_EXC045_20250307_140509.pdf"
        );
        assert_eq!(
            ReportKind::Despacho.filename("GAP007", at),
            "Despacho_Report_GAP007_20250307_140509.pdf"
        );
    }

    #[test]
    fn test_info_rows_fill_missing_with_na() {
        let mut summary = ReportSummary::new();
        summary.insert("N° FCL".into(), "EXC045".into());
        summary.insert("BRIX".into(), "12.5".into());

        let rows = build_info_rows(ReportKind::Quality, &summary);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0][0].value, "EXC045");
        assert_eq!(rows[1][0].value, MISSING_VALUE);
        assert_eq!(rows[3][0].value, "12.5");
    }

    #[test]
    fn test_quality_summary_feeds_info_grid() {
        let record = EvaluationRecord {
            fcl: "EXC045".into(),
            productor: "GAP BERRIES S.A.C".into(),
            variedad: "BILOXI".into(),
            ..Default::default()
        };
        let rows = build_info_rows(ReportKind::Quality, &quality_summary(&record));
        assert_eq!(rows[1][0].value, "GAP BERRIES S.A.C");
        assert_eq!(rows[1][1].value, "BILOXI");
    }

    #[test]
    fn test_defect_rows_read_first_record() {
        let mut record = EvaluationRecord::default();
        record.metrics.insert(column_key("FRUTOS CON PEDICELO"), 1.26);
        record.metrics.insert(column_key("DESHIDRATACIÓN  LEVE"), 3.0);

        let rows = build_defect_rows(&record);
        assert_eq!(rows.len(), CONDITION_DEFECTS.len());
        assert_eq!(rows[0][0], "Frutos con Pedicelo");
        assert_eq!(rows[0][1], "1.3%");
        assert_eq!(rows[2][2], "Deshidratación Leve");
        assert_eq!(rows[2][3], "3.0%");
        // quality column runs out before the condition column
        let last = rows.last().unwrap();
        assert!(last[0].is_empty() && last[1].is_empty());
        assert_eq!(last[2], "Otros 2");
    }

    #[test]
    fn test_decode_image_data() {
        assert_eq!(decode_image_data("aGVsbG8=").unwrap(), b"hello");
        assert_eq!(
            decode_image_data("data:image/png;base64,aGVsbG8=").unwrap(),
            b"hello"
        );
        assert!(decode_image_data("data:image/png;base64").is_err());
        assert!(decode_image_data("***").is_err());
    }

    #[test]
    fn test_pdf_safe_text() {
        assert_eq!(pdf_safe_text("Presentación"), "Presentacion");
        assert_eq!(pdf_safe_text("N° FCL"), "No FCL");
        assert_eq!(pdf_safe_text("Daño"), "Dano");
    }
}
