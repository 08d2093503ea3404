//! Dispatch programming and master dispatch list

use super::{first_text, text_or, DASH};
use crate::error::Result;
use crate::normalizer::despacho_code_key;
use crate::sheet::{Cell, Sheet, SheetRow};
use crate::source::{WorkbookSource, AIR_SHEET, MASTER_SHEET, SEA_SHEET};
use fcl_quality_common::fcl::fcl_join_key;
use fcl_quality_common::{column_key, DespachoRecord, MasterDispatchRecord, ShipMode};
use std::collections::{BTreeMap, HashSet};

const DISPATCH_DATE: &str = "DIA  DESP.";
const TRANSPORT_HEADERS: &[&str] = &["TRANSPORTISTA", "TRANSPORTE"];

/// Columns read into named fields of [`DespachoRecord`]. The sheet's own
/// `FCL` column is ignored: `COD` is the reliable code.
const DESPACHO_COLUMNS: &[&str] = &[
    "Unnamed: 0",
    "COD",
    "FCL",
    DISPATCH_DATE,
    "ENVIO",
    "CLIENTE",
    "EMPRESA",
    "DESTINO",
    "ESTADO",
    "PRESENTACION",
    "TRANSPORTISTA",
    "TRANSPORTE",
    "ETD",
    "ETA",
];

/// Master list header spellings of the container column
const MASTER_FCL_HEADERS: &[&str] = &["Nº FCL", "N° FCL"];
/// Layout columns of the master list with no data
const MASTER_DROPPED: &[&str] = &["Unnamed: 0", "Unnamed: 3", "Unnamed: 6", "Unnamed: 16", "Unnamed: 17"];
/// Unlabelled master list column holding the remarks
const MASTER_REMARKS: &str = "Unnamed: 15";
/// Dates in the master list are written `dd.mm.yy`
const MASTER_DATE_FORMATS: &[&str] = &["%d.%m.%y"];

const MASTER_COLUMNS: &[&str] = &[
    "Nº FCL",
    "N° FCL",
    "CLIENTE",
    "DESTINO",
    "FECHA DE DESPACHO",
    "ETD",
    "ETA",
    MASTER_REMARKS,
];

/// Every column not in `known` as text, keyed by [`column_key`].
fn extra_columns(row: &SheetRow<'_>, known: &HashSet<String>) -> BTreeMap<String, String> {
    row.cells()
        .map(|(header, cell)| (column_key(header), cell))
        .filter(|(key, _)| !known.contains(key))
        .filter_map(|(key, cell)| extra_text(cell).map(|text| (key, text)))
        .collect()
}

fn extra_text(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Date(dt) => Some(dt.format("%d/%m/%Y").to_string()),
        other => other.as_text(),
    }
}

fn key_set(columns: &[&str]) -> HashSet<String> {
    columns.iter().map(|c| column_key(c)).collect()
}

/// Cleans one programming sheet. A row whose `COD` is missing is kept
/// with `-` as both code and container key.
pub fn despachos_from_sheet(sheet: &Sheet, envio: ShipMode) -> Vec<DespachoRecord> {
    let known = key_set(DESPACHO_COLUMNS);

    sheet
        .rows()
        .map(|row| {
            let codigo = first_text(&row, &["COD"]).unwrap_or_else(|| DASH.to_string());
            let fcl = if codigo == DASH {
                DASH.to_string()
            } else {
                despacho_code_key(&codigo)
            };
            DespachoRecord {
                fcl,
                codigo,
                envio,
                cliente: text_or(&row, "CLIENTE", DASH),
                empresa: text_or(&row, "EMPRESA", DASH),
                destino: text_or(&row, "DESTINO", DASH),
                estado: text_or(&row, "ESTADO", DASH),
                presentacion: text_or(&row, "PRESENTACION", DASH),
                transportista: first_text(&row, TRANSPORT_HEADERS).unwrap_or_else(|| DASH.to_string()),
                fecha_despacho: row.date(DISPATCH_DATE, &[]),
                etd: row.date("ETD", &[]),
                eta: row.date("ETA", &[]),
                extra: extra_columns(&row, &known),
            }
        })
        .collect()
}

/// Newest dispatch first; undated rows last.
pub fn sort_by_dispatch_date(records: &mut [DespachoRecord]) {
    records.sort_by(|a, b| b.fecha_despacho.cmp(&a.fecha_despacho));
}

/// Loads the air and sea programming sheets as one list.
pub async fn load_despachos<S: WorkbookSource>(source: &S) -> Result<Vec<DespachoRecord>> {
    let air = source.read_sheet(&AIR_SHEET).await?;
    let sea = source.read_sheet(&SEA_SHEET).await?;

    let mut records = despachos_from_sheet(&air, ShipMode::Aereo);
    let air_count = records.len();
    records.extend(despachos_from_sheet(&sea, ShipMode::Maritimo));
    sort_by_dispatch_date(&mut records);

    tracing::debug!(
        aereo = air_count,
        maritimo = records.len() - air_count,
        "despachos cargados"
    );
    Ok(records)
}

/// Cleans the master dispatch list. Only rows with a dispatch date are
/// real dispatches; the rest are layout.
pub fn master_from_sheet(sheet: &Sheet) -> Vec<MasterDispatchRecord> {
    let mut known = key_set(MASTER_COLUMNS);
    known.extend(key_set(MASTER_DROPPED));

    sheet
        .rows()
        .filter(|row| !row.get("FECHA DE DESPACHO").is_empty())
        .map(|row| {
            let fcl_raw = first_text(&row, MASTER_FCL_HEADERS).unwrap_or_else(|| DASH.to_string());
            MasterDispatchRecord {
                fcl: fcl_join_key(&fcl_raw),
                fcl_raw,
                cliente: text_or(&row, "CLIENTE", DASH),
                destino: text_or(&row, "DESTINO", DASH),
                fecha_despacho: row.date("FECHA DE DESPACHO", MASTER_DATE_FORMATS),
                etd: row.date("ETD", MASTER_DATE_FORMATS),
                eta: row.date("ETA", MASTER_DATE_FORMATS),
                observaciones: text_or(&row, MASTER_REMARKS, DASH),
                extra: extra_columns(&row, &known),
            }
        })
        .collect()
}

pub async fn load_master_list<S: WorkbookSource>(source: &S) -> Result<Vec<MasterDispatchRecord>> {
    let sheet = source.read_sheet(&MASTER_SHEET).await?;
    let records = master_from_sheet(&sheet);
    tracing::debug!(filas = records.len(), "lista maestra cargada");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn t(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn headers(names: &[&str]) -> Vec<Option<String>> {
        names
            .iter()
            .map(|h| (!h.is_empty()).then(|| h.to_string()))
            .collect()
    }

    fn programming_sheet() -> Sheet {
        Sheet::from_parts(
            "PROGRAMA ALZA PACKING AEREO",
            headers(&["", "COD", "FCL", "DIA  DESP.", "CLIENTE", "ESTADO", "PALLETS"]),
            vec![
                vec![Cell::Empty, t("ezce45-A"), t("X"), t("2025-02-01"), t("ACME "), Cell::Empty, Cell::Number(20.0)],
                vec![Cell::Empty, t("-"), t("EXC001"), t("2025-02-02"), t("ACME"), t("OK"), Cell::Empty],
                vec![Cell::Empty, t("GP7"), Cell::Empty, t("2025-02-03"), Cell::Empty, t("DESPACHADO"), Cell::Empty],
            ],
        )
    }

    #[test]
    fn test_despacho_cleaning() {
        let records = despachos_from_sheet(&programming_sheet(), ShipMode::Maritimo);
        assert_eq!(records.len(), 3);

        let first = &records[0];
        assert_eq!(first.fcl, "EXC045");
        assert_eq!(first.codigo, "ezce45-A");
        assert_eq!(first.envio, ShipMode::Maritimo);
        assert_eq!(first.cliente, "ACME");
        assert_eq!(first.estado, "-");
        assert_eq!(first.fecha_despacho, NaiveDate::from_ymd_opt(2025, 2, 1));
        assert_eq!(first.extra.get("PALLETS").map(String::as_str), Some("20"));
        assert!(!first.extra.contains_key("FCL"));
        assert!(!first.extra.contains_key("UNNAMED: 0"));

        assert_eq!(records[2].fcl, "GAP007");
        assert_eq!(records[2].cliente, "-");
    }

    #[test]
    fn test_missing_code_row_is_kept() {
        let records = despachos_from_sheet(&programming_sheet(), ShipMode::Aereo);
        let blank = &records[1];
        assert_eq!(blank.fcl, "-");
        assert_eq!(blank.codigo, "-");
        assert_eq!(blank.cliente, "ACME");
        assert_eq!(blank.estado, "OK");
        assert_eq!(blank.fecha_despacho, NaiveDate::from_ymd_opt(2025, 2, 2));
    }

    #[test]
    fn test_sort_by_dispatch_date() {
        let mut records = despachos_from_sheet(&programming_sheet(), ShipMode::Aereo);
        records.push(DespachoRecord::default());
        sort_by_dispatch_date(&mut records);
        let fcls: Vec<&str> = records.iter().map(|r| r.fcl.as_str()).collect();
        assert_eq!(fcls, ["GAP007", "-", "EXC045", ""]);
    }

    #[test]
    fn test_master_list_cleaning() {
        let sheet = Sheet::from_parts(
            "CONTROL DE DESPACHOS",
            headers(&[
                "", "Nº FCL", "CLIENTE", "", "FECHA DE DESPACHO", "ETD", "", "NAVE", "ETA",
                "", "", "", "", "", "", "",
            ]),
            vec![
                vec![
                    Cell::Empty,
                    t("EXC45-B"),
                    t("ACME"),
                    t("x"),
                    t("03.02.25"),
                    t("04.02.25"),
                    Cell::Empty,
                    t("MSC ANNA"),
                    t("not a date"),
                    Cell::Empty,
                    Cell::Empty,
                    Cell::Empty,
                    Cell::Empty,
                    Cell::Empty,
                    Cell::Empty,
                    t("pendiente de BL"),
                ],
                vec![Cell::Empty, t("EXC046"), t("ACME"), Cell::Empty, Cell::Empty],
            ],
        );

        let records = master_from_sheet(&sheet);
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.fcl, "EXC045");
        assert_eq!(r.fcl_raw, "EXC45-B");
        assert_eq!(r.fecha_despacho, NaiveDate::from_ymd_opt(2025, 2, 3));
        assert_eq!(r.etd, NaiveDate::from_ymd_opt(2025, 2, 4));
        assert_eq!(r.eta, None);
        assert_eq!(r.observaciones, "pendiente de BL");
        assert_eq!(r.extra.get("NAVE").map(String::as_str), Some("MSC ANNA"));
        assert!(!r.extra.contains_key("UNNAMED: 3"));
    }
}
