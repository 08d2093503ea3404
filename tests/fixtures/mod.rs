//! Workbook fixtures written with rust_xlsxwriter into a scratch dir, laid
//! out like the real sheets so they go through the local source.

#![allow(dead_code)]

use fcl_quality::dashboard::Dashboard;
use fcl_quality::images::AnyImageStore;
use fcl_quality::source::{AnySource, LocalSource};
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tempfile::TempDir;

pub enum V {
    T(&'static str),
    N(f64),
    E,
}

fn write_sheet(workbook: &mut Workbook, name: &str, skip_rows: u32, headers: &[&str], rows: &[Vec<V>]) {
    let sheet = workbook.add_worksheet();
    sheet.set_name(name).unwrap();
    // title block above the header, as in the shared workbooks
    for r in 0..skip_rows {
        sheet.write_string(r, 0, format!("TITULO {}", r)).unwrap();
    }
    for (c, header) in headers.iter().enumerate() {
        if !header.is_empty() {
            sheet.write_string(skip_rows, c as u16, *header).unwrap();
        }
    }
    for (i, row) in rows.iter().enumerate() {
        let r = skip_rows + 1 + i as u32;
        for (c, value) in row.iter().enumerate() {
            match value {
                V::T(s) => {
                    sheet.write_string(r, c as u16, *s).unwrap();
                }
                V::N(n) => {
                    sheet.write_number(r, c as u16, *n).unwrap();
                }
                V::E => {}
            }
        }
    }
}

pub const EVALUATION_HEADERS: &[&str] = &[
    "N° FCL",
    "FECHA DE PROCESO",
    "SEMANA",
    "TURNO",
    "PRODUCTOR",
    "VARIEDAD",
    "PRESENTACION",
    "BRIX",
    "ACIDEZ",
    "HONGOS",
];

pub fn write_evaluations(dir: &Path, rows: &[Vec<V>]) {
    let mut workbook = Workbook::new();
    write_sheet(&mut workbook, "CALIDAD PRODUCTO TERMINADO", 0, EVALUATION_HEADERS, rows);
    workbook
        .save(dir.join("BD EVALUACION DE CALIDAD DE PRODUCTO TERMINADO.xlsx"))
        .unwrap();
}

pub const PROGRAMMING_HEADERS: &[&str] = &["", "COD", "FCL", "DIA DESP.", "CLIENTE", "EMPRESA", "ESTADO"];

pub fn write_programming(dir: &Path, air: &[Vec<V>], sea: &[Vec<V>]) {
    let mut workbook = Workbook::new();
    write_sheet(&mut workbook, "PROGRAMA ALZA PACKING AEREO", 1, PROGRAMMING_HEADERS, air);
    write_sheet(&mut workbook, "PROGRAMA ALZA PACKING MARITIMO", 1, PROGRAMMING_HEADERS, sea);
    workbook.save(dir.join("PROGRAMACION.xlsx")).unwrap();
}

pub const MASTER_HEADERS: &[&str] = &["", "Nº FCL", "CLIENTE", "", "DESTINO", "FECHA DE DESPACHO"];

pub fn write_master(dir: &Path, rows: &[Vec<V>]) {
    let mut workbook = Workbook::new();
    write_sheet(&mut workbook, "CONTROL DE DESPACHOS", 4, MASTER_HEADERS, rows);
    workbook
        .save(dir.join("LISTA MAESTRA DE DESPACHOS 2025.xlsx"))
        .unwrap();
}

/// Evaluations of three containers; raw codes differ from their keys.
pub fn sample_evaluations() -> Vec<Vec<V>> {
    use V::*;
    vec![
        vec![T("EXC45"), T("2025-03-01"), N(10.0), T("Dia"), T("EXCELLENCE FRUIT S.A.C"), T("BILOXI"), T("bandeja blanca 3.3kg"), N(14.2), N(0.55), N(1.5)],
        vec![T("exc045 "), T("2025-03-03"), N(10.0), N(111.0), T("EXCELLENCE FRUIT S.A.C"), T("BILOXI"), T("Bandeja Blanca 3.3KG"), N(13.8), N(0.6), E],
        vec![T("GP7-A"), T("2025-02-20"), N(8.0), N(1.0), T("GAP BERRIES S.A.C"), E, E, N(12.0), N(0.4), N(0.0)],
        vec![T("EXCE12"), T("2025-02-10"), N(7.0), N(2.0), T("BIG BERRIES S.A.C"), T("VENTURA"), T("12X125G"), N(11.0), N(0.3), N(2.0)],
        vec![T("-"), T("2025-03-05"), N(10.0), N(1.0), T("EXCELLENCE FRUIT S.A.C"), E, E, E, E, E],
    ]
}

/// Air and sea programming; codes spelled with typos and without padding.
pub fn sample_programming() -> (Vec<Vec<V>>, Vec<Vec<V>>) {
    use V::*;
    let air = vec![
        vec![E, T("ezce45-A"), T("X"), T("2025-03-04"), T("ACME"), T("SAN LUCAR S.A."), T("DESPACHADO")],
        vec![E, T("-"), T("EXC099"), T("2025-03-05"), T("ACME"), E, E],
    ];
    let sea = vec![
        vec![E, T("gp7"), E, T("2025-02-25"), T("FRUTAS DEL SUR"), T("SAN LUCAR S.A."), T("EN TRANSITO")],
        vec![E, T("EXC200"), E, T("2025-02-26"), T("FRUTAS DEL SUR"), T("SAN LUCAR S.A."), E],
    ];
    (air, sea)
}

/// Master list: EXC045 twice (padded and not), GAP007 once, a layout row.
pub fn sample_master() -> Vec<Vec<V>> {
    use V::*;
    vec![
        vec![E, T("EXC45"), T("ACME"), E, T("USA"), T("04.03.25")],
        vec![E, T("EXC045"), T("ACME"), E, T("USA"), T("05.03.25")],
        vec![E, T("GAP007"), T("FRUTAS DEL SUR"), E, T("EUROPA"), T("25.02.25")],
        vec![E, T("TOTAL"), E, E, E, E],
    ]
}

/// Scratch dir with all three workbooks.
pub fn sample_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_evaluations(dir.path(), &sample_evaluations());
    let (air, sea) = sample_programming();
    write_programming(dir.path(), &air, &sea);
    write_master(dir.path(), &sample_master());
    dir
}

pub fn dashboard(dir: &Path, company: Option<&str>) -> Dashboard {
    Dashboard::new(
        AnySource::Local(LocalSource::new(dir)),
        AnyImageStore::Disabled,
        company.map(str::to_string),
    )
}
