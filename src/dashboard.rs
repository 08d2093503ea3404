//! List and detail views over the cleaned sources
//!
//! Everything the CLI, the interactive browser and the HTTP server show
//! goes through [`Dashboard`]: it loads the sheets, links them and fetches
//! photos. Nothing is kept between calls except what the source and image
//! caches hold.

use crate::config::Config;
use crate::error::{QcError, Result};
use crate::export::generate_fcl_pdf_report;
use crate::images::{evaluation_codes, AnyImageStore};
use crate::loader::{load_despachos, load_evaluations, load_master_list};
use crate::reconcile::{
    despacho_summaries, despachos_for, evaluation_summaries, evaluations_for, link_evaluations,
    reconcile_despachos, ReconciliationReport,
};
use crate::source::{AnySource, WorkbookSource};
use chrono::NaiveDateTime;
use fcl_quality_common::export::pdf_core::{despacho_summary, quality_summary};
use fcl_quality_common::{
    DespachoRecord, DespachoSummary, EvaluationRecord, FclSummary, MasterDispatchRecord,
    ReconciledDespacho, ReportKind, ReportSummary,
};
use serde::Serialize;
use std::future::Future;

/// Detail of one container in the finished-product view
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationDetail {
    pub fcl: String,
    pub summary: ReportSummary,
    /// Newest process date first
    pub records: Vec<EvaluationRecord>,
    pub image_count: usize,
    #[serde(skip)]
    pub images: Vec<String>,
}

/// Detail of one container in the despacho view
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DespachoDetail {
    pub fcl: String,
    pub summary: ReportSummary,
    /// Dispatch rows with their master-list match
    pub rows: Vec<ReconciledDespacho>,
    /// Quality evaluations of the same container
    pub evaluations: Vec<EvaluationRecord>,
    pub image_count: usize,
    #[serde(skip)]
    pub images: Vec<String>,
}

/// A generated PDF
#[derive(Debug, Clone)]
pub struct RenderedReport {
    /// Canonical FCL the report is about
    pub fcl: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Picks 1-based `rows` out of `records`; an empty selection keeps all.
pub fn select_rows(records: Vec<EvaluationRecord>, rows: &[usize]) -> Result<Vec<EvaluationRecord>> {
    if rows.is_empty() {
        return Ok(records);
    }
    rows.iter()
        .map(|&n| {
            n.checked_sub(1)
                .and_then(|i| records.get(i))
                .cloned()
                .ok_or_else(|| {
                    QcError::NotFound(format!("fila {} (hay {} registros)", n, records.len()))
                })
        })
        .collect()
}

/// Enrichment that may be missing: failures are logged and read as empty.
async fn optional<T>(what: &str, fut: impl Future<Output = Result<Vec<T>>>) -> Vec<T> {
    fut.await.unwrap_or_else(|e| {
        tracing::warn!("{} no disponible: {}", what, e);
        Vec::new()
    })
}

fn not_found(fcl: &str) -> QcError {
    QcError::NotFound(format!("No se encontraron datos del FCL {}", fcl))
}

/// Read-only views over the configured workbook source and image store
pub struct Dashboard<S = AnySource> {
    source: S,
    images: AnyImageStore,
    /// Parent company the evaluation views are limited to
    company: Option<String>,
}

impl Dashboard<AnySource> {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            AnySource::from_config(config)?,
            AnyImageStore::from_config(config),
            Some(config.company.clone()),
        ))
    }
}

impl<S: WorkbookSource> Dashboard<S> {
    pub fn new(source: S, images: AnyImageStore, company: Option<String>) -> Self {
        let company = company.filter(|c| !c.trim().is_empty());
        Self {
            source,
            images,
            company,
        }
    }

    /// Whether photos come from a database or are always empty.
    pub fn images_enabled(&self) -> bool {
        self.images.is_enabled()
    }

    pub async fn evaluations(&self) -> Result<Vec<EvaluationRecord>> {
        load_evaluations(&self.source, self.company.as_deref()).await
    }

    pub async fn despachos(&self) -> Result<Vec<DespachoRecord>> {
        load_despachos(&self.source).await
    }

    pub async fn master_list(&self) -> Result<Vec<MasterDispatchRecord>> {
        load_master_list(&self.source).await
    }

    pub async fn evaluation_list(&self, search: &[String]) -> Result<Vec<FclSummary>> {
        let records = self.evaluations().await?;
        Ok(evaluation_summaries(&records, search))
    }

    pub async fn despacho_list(&self, search: &[String]) -> Result<Vec<DespachoSummary>> {
        let records = self.despachos().await?;
        Ok(despacho_summaries(&records, search))
    }

    pub async fn evaluation_detail(&self, fcl: &str) -> Result<EvaluationDetail> {
        let records = self.evaluations().await?;
        let records: Vec<EvaluationRecord> =
            evaluations_for(&records, fcl).into_iter().cloned().collect();
        let first = records.first().ok_or_else(|| not_found(fcl))?;

        let key = first.fcl.clone();
        let codes = evaluation_codes(&key, records.iter().map(|r| r.fcl_raw.as_str()));
        let images = self.images.images_for_evaluation(&codes).await;

        Ok(EvaluationDetail {
            summary: quality_summary(first),
            fcl: key,
            records,
            image_count: images.len(),
            images: images.as_ref().clone(),
        })
    }

    pub async fn despacho_detail(&self, fcl: &str) -> Result<DespachoDetail> {
        let despachos = self.despachos().await?;
        let selected: Vec<DespachoRecord> =
            despachos_for(&despachos, fcl).into_iter().cloned().collect();
        let first = selected.first().ok_or_else(|| not_found(fcl))?;

        let master = optional("lista maestra", self.master_list()).await;
        let evaluations = optional("evaluaciones", self.evaluations()).await;
        let linked: Vec<EvaluationRecord> =
            link_evaluations(first, &evaluations).into_iter().cloned().collect();
        let images = self.images.images_for_despacho(&first.fcl).await;

        Ok(DespachoDetail {
            fcl: first.fcl.clone(),
            summary: despacho_summary(first),
            rows: reconcile_despachos(&selected, &master),
            evaluations: linked,
            image_count: images.len(),
            images: images.as_ref().clone(),
        })
    }

    /// Join diagnostics plus the joined rows.
    pub async fn reconcile(&self) -> Result<(ReconciliationReport, Vec<ReconciledDespacho>)> {
        let (evaluations, despachos, master) =
            tokio::join!(self.evaluations(), self.despachos(), self.master_list());
        let (evaluations, despachos, master) = (evaluations?, despachos?, master?);

        let report = ReconciliationReport::build(&evaluations, &despachos, &master);
        Ok((report, reconcile_despachos(&despachos, &master)))
    }

    /// Builds the PDF of `fcl`. `rows` picks 1-based detail rows; empty
    /// means all of them.
    pub async fn report(
        &self,
        kind: ReportKind,
        fcl: &str,
        rows: &[usize],
        include_detail_pages: bool,
        at: NaiveDateTime,
    ) -> Result<RenderedReport> {
        let (summary, details, images, key) = match kind {
            ReportKind::Quality => {
                let detail = self.evaluation_detail(fcl).await?;
                (detail.summary, detail.records, detail.images, detail.fcl)
            }
            ReportKind::Despacho => {
                let detail = self.despacho_detail(fcl).await?;
                (detail.summary, detail.evaluations, detail.images, detail.fcl)
            }
        };
        let details = select_rows(details, rows)?;

        let bytes = generate_fcl_pdf_report(kind, &summary, &details, &images, None, include_detail_pages)?;
        tracing::info!(fcl = %key, bytes = bytes.len(), "informe generado");
        Ok(RenderedReport {
            file_name: kind.filename(&key, at),
            fcl: key,
            bytes,
        })
    }
}
