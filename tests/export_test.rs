//! PDF and Excel output over fixture data

mod fixtures;

use chrono::NaiveDate;
use fcl_quality::export::{generate_detail_workbook, generate_fcl_pdf_report, report_output_path};
use fcl_quality::sheet::Sheet;
use fcl_quality_common::export::pdf_core::{despacho_summary, quality_summary};
use fcl_quality_common::{DespachoRecord, EvaluationRecord, ReportKind, ReportSummary};
use fixtures::*;
use tempfile::tempdir;

/// 1x1 PNG
const PIXEL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";

fn evaluation(semana: i64) -> EvaluationRecord {
    let mut record = EvaluationRecord {
        fcl: "EXC045".into(),
        fcl_raw: "EXC45".into(),
        semana,
        productor: "EXCELLENCE FRUIT S.A.C".into(),
        variedad: "BILOXI".into(),
        presentacion: "BANDEJA BLANCA 3.3KG".into(),
        brix: 14.2,
        acidez: 0.55,
        fecha_proceso: NaiveDate::from_ymd_opt(2025, 3, 1),
        ..Default::default()
    };
    record.metrics.insert("HONGOS".into(), 1.5);
    record
}

#[test]
fn test_empty_report_is_valid_pdf() {
    for kind in [ReportKind::Quality, ReportKind::Despacho] {
        let bytes = generate_fcl_pdf_report(kind, &ReportSummary::new(), &[], &[], None, false).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 100);
    }
}

#[test]
fn test_quality_report_written_to_output() {
    let dir = tempdir().unwrap();
    let at = NaiveDate::from_ymd_opt(2025, 3, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let path = report_output_path(Some(dir.path()), ReportKind::Quality, "EXC045", at);

    let records: Vec<EvaluationRecord> = (1..=3).map(evaluation).collect();
    // more photos than fit on one page, plus a broken one
    let mut images = vec![PIXEL.to_string(); 10];
    images.push("data:image/jpeg;base64,@@@".to_string());

    let bytes = generate_fcl_pdf_report(
        ReportKind::Quality,
        &quality_summary(&records[0]),
        &records,
        &images,
        Some(&path),
        true,
    )
    .unwrap();

    assert!(path.ends_with("Quality_Control_Report_EXC045_20250301_090000.pdf"));
    assert_eq!(std::fs::read(&path).unwrap(), bytes);
}

#[test]
fn test_despacho_report() {
    let despacho = DespachoRecord {
        fcl: "GAP007".into(),
        codigo: "gp7".into(),
        cliente: "FRUTAS DEL SUR".into(),
        ..Default::default()
    };
    let bytes = generate_fcl_pdf_report(
        ReportKind::Despacho,
        &despacho_summary(&despacho),
        &[],
        &[PIXEL.to_string()],
        None,
        false,
    )
    .unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_dashboard_report_selects_rows() {
    let dir = sample_dir();
    let dashboard = dashboard(dir.path(), None);
    let at = NaiveDate::from_ymd_opt(2025, 3, 6)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap();

    let report = dashboard
        .report(ReportKind::Quality, "exc45", &[2], true, at)
        .await
        .unwrap();
    assert_eq!(report.fcl, "EXC045");
    assert_eq!(report.file_name, "Quality_Control_Report_EXC045_20250306_103000.pdf");
    assert!(report.bytes.starts_with(b"%PDF"));

    let err = dashboard
        .report(ReportKind::Quality, "EXC045", &[3], false, at)
        .await
        .unwrap_err();
    assert!(matches!(err, fcl_quality::error::QcError::NotFound(_)));
}

#[test]
fn test_workbook_reads_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("detalle.xlsx");
    let records: Vec<EvaluationRecord> = (1..=2).map(evaluation).collect();

    let bytes = generate_detail_workbook("EXC045", &records, Some(&path)).unwrap();
    let sheet = Sheet::from_workbook_bytes(&bytes, "FCL EXC045", 0).unwrap();

    assert_eq!(sheet.len(), 2);
    let weeks: Vec<Option<f64>> = sheet.rows().map(|row| row.number("SEMANA")).collect();
    assert_eq!(weeks, [Some(1.0), Some(2.0)]);

    let first = sheet.rows().next().unwrap();
    assert_eq!(first.text("FCL ORIGINAL").as_deref(), Some("EXC45"));
    assert_eq!(first.number("HONGOS"), Some(1.5));
}
