//! Loaders read through the local source from real xlsx files

mod fixtures;

use chrono::NaiveDate;
use fcl_quality::error::QcError;
use fcl_quality::loader::{load_despachos, load_evaluations, load_master_list};
use fcl_quality::source::LocalSource;
use fcl_quality_common::ShipMode;
use fixtures::*;

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

#[tokio::test]
async fn test_evaluations_from_workbook() {
    let dir = sample_dir();
    let source = LocalSource::new(dir.path());

    let records = load_evaluations(&source, None).await.unwrap();
    // the "-" row has no container
    assert_eq!(records.len(), 4);

    let keys: Vec<&str> = records.iter().map(|r| r.fcl.as_str()).collect();
    assert_eq!(keys, ["EXC045", "EXC045", "GAP007", "EXC012"]);

    let newest = &records[0];
    assert_eq!(newest.fcl_raw, "exc045");
    assert_eq!(newest.fecha_proceso, date(2025, 3, 3));
    assert_eq!(newest.turno, 11);
    assert_eq!(newest.presentacion, "BANDEJA BLANCA 3.3KG");
    assert_eq!(newest.metric("HONGOS"), 0.0);

    let older = &records[1];
    assert_eq!(older.turno, 2);
    assert_eq!(older.metric("HONGOS"), 1.5);
    assert_eq!(older.empresa, "SAN LUCAR S.A.");

    let gap = &records[2];
    assert_eq!(gap.variedad, "NO ESPECIFICADO");
    assert_eq!(gap.evaluador, "-");
}

#[tokio::test]
async fn test_evaluations_company_filter() {
    let dir = sample_dir();
    let source = LocalSource::new(dir.path());

    let records = load_evaluations(&source, Some("SAN LUCAR S.A.")).await.unwrap();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.fcl != "EXC012"));
}

#[tokio::test]
async fn test_despachos_from_both_sheets() {
    let dir = sample_dir();
    let source = LocalSource::new(dir.path());

    let records = load_despachos(&source).await.unwrap();
    let rows: Vec<(&str, ShipMode)> = records.iter().map(|r| (r.fcl.as_str(), r.envio)).collect();
    assert_eq!(
        rows,
        [
            ("-", ShipMode::Aereo),
            ("EXC045", ShipMode::Aereo),
            ("EXC200", ShipMode::Maritimo),
            ("GAP007", ShipMode::Maritimo),
        ]
    );
    // blank COD is kept as a sentinel row
    assert_eq!(records[0].codigo, "-");
    assert_eq!(records[0].cliente, "ACME");
    assert_eq!(records[1].codigo, "ezce45-A");
    assert_eq!(records[1].fecha_despacho, date(2025, 3, 4));
    assert_eq!(records[2].estado, "-");
}

#[tokio::test]
async fn test_master_list_skips_layout_rows() {
    let dir = sample_dir();
    let source = LocalSource::new(dir.path());

    let records = load_master_list(&source).await.unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].fcl, "EXC045");
    assert_eq!(records[0].fcl_raw, "EXC45");
    assert_eq!(records[0].fecha_despacho, date(2025, 3, 4));
    assert_eq!(records[2].destino, "EUROPA");
}

#[tokio::test]
async fn test_missing_workbook_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let source = LocalSource::new(dir.path());
    let err = load_evaluations(&source, None).await.unwrap_err();
    assert!(matches!(err, QcError::NotFound(_)));
}

#[tokio::test]
async fn test_missing_sheet_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let mut workbook = rust_xlsxwriter::Workbook::new();
    workbook.add_worksheet().set_name("OTRA HOJA").unwrap();
    workbook.save(dir.path().join("PROGRAMACION.xlsx")).unwrap();

    let source = LocalSource::new(dir.path());
    let err = load_despachos(&source).await.unwrap_err();
    assert!(matches!(err, QcError::MalformedData(_)));
}
