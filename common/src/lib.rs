//! FCL Quality Common Library
//!
//! Pure logic shared by the CLI and the HTTP server: container code
//! normalization, record types, the defect catalog and report layout.

pub mod company;
pub mod defects;
pub mod error;
pub mod export;
pub mod fcl;
pub mod layout;
pub mod navigation;
pub mod presentation;
pub mod types;

pub use company::{company_for_producer, DEFAULT_COMPANY};
pub use error::{Error, Result};
pub use export::pdf_core::{ReportKind, ReportSummary};
pub use fcl::{fcl_join_key, normalize_fcl_code};
pub use navigation::{NavEvent, Page, Router, View};
pub use presentation::categorize_presentation;
pub use types::{
    column_key, DespachoRecord, DespachoSummary, EvaluationRecord, FclSummary,
    MasterDispatchRecord, ReconciledDespacho, ShipMode,
};
