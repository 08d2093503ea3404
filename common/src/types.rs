//! Record types
//!
//! Rows are transient: they are rebuilt from the upstream sheets on every
//! load and never written back.
//! - EvaluationRecord: one finished-product quality inspection
//! - DespachoRecord: one shipment from the air/sea programming sheets
//! - MasterDispatchRecord: one row of the master dispatch list

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical form of a sheet header: trimmed, uppercased, inner whitespace
/// collapsed ("DIA  DESP." → "DIA DESP.").
pub fn column_key(header: &str) -> String {
    header
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Finished-product quality evaluation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRecord {
    /// Canonical FCL
    pub fcl: String,
    /// FCL as written in the sheet (trimmed)
    pub fcl_raw: String,
    pub fecha_mp: Option<NaiveDate>,
    pub fecha_proceso: Option<NaiveDate>,
    pub semana: i64,
    pub turno: i64,
    pub modulo: String,
    pub evaluador: String,
    pub productor: String,
    /// Parent company of the producer
    pub empresa: String,
    pub tipo_producto: String,
    pub fundo: String,
    pub variedad: String,
    /// Presentation category
    pub presentacion: String,
    pub presentacion_raw: String,
    pub destino: String,
    pub tipo_caja: String,
    pub trazabilidad: String,
    pub observaciones: String,
    pub calibre: String,
    pub brix: f64,
    pub acidez: f64,
    pub peso_muestra: f64,
    /// Every other numeric column (defect percentages, totals), keyed by
    /// [`column_key`]
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
}

impl EvaluationRecord {
    /// Metric value by column name; missing columns read as 0.
    pub fn metric(&self, column: &str) -> f64 {
        self.metrics.get(&column_key(column)).copied().unwrap_or(0.0)
    }
}

/// Shipping mode of a dispatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShipMode {
    #[default]
    Aereo,
    Maritimo,
}

impl std::fmt::Display for ShipMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShipMode::Aereo => write!(f, "AEREO"),
            ShipMode::Maritimo => write!(f, "MARITIMO"),
        }
    }
}

/// Shipment row from the programming workbook
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DespachoRecord {
    /// Canonical FCL
    pub fcl: String,
    /// Code as written in the `COD` column
    pub codigo: String,
    pub envio: ShipMode,
    pub cliente: String,
    pub empresa: String,
    pub destino: String,
    pub estado: String,
    pub presentacion: String,
    pub transportista: String,
    pub fecha_despacho: Option<NaiveDate>,
    pub etd: Option<NaiveDate>,
    pub eta: Option<NaiveDate>,
    /// Remaining columns as text
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

/// Row of the master dispatch list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterDispatchRecord {
    pub fcl: String,
    pub fcl_raw: String,
    pub cliente: String,
    pub destino: String,
    pub fecha_despacho: Option<NaiveDate>,
    pub etd: Option<NaiveDate>,
    pub eta: Option<NaiveDate>,
    pub observaciones: String,
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

/// Dispatch joined with its master-list rows (left join)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledDespacho {
    pub despacho: DespachoRecord,
    pub master: Option<MasterDispatchRecord>,
}

/// List card of the finished-product view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FclSummary {
    pub fcl: String,
    pub semana: i64,
    pub variedad: String,
    pub productor: String,
    pub fecha_proceso: Option<NaiveDate>,
}

/// List card of the despacho view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DespachoSummary {
    pub fcl: String,
    pub cliente: String,
    pub empresa: String,
    pub envio: ShipMode,
    pub estado: String,
    pub fecha_despacho: Option<NaiveDate>,
}
