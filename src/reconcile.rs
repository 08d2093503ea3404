//! Cross-source linking
//!
//! Every source has already rewritten its codes to the join key when the
//! records reach this module, so linking is plain key equality:
//! - dispatches ⟕ master list (left join, one row per match)
//! - list summaries grouped per container
//! - evaluations attached to a dispatch

use crate::normalizer::{
    despacho_code_key, normalize_codes, normalize_join_codes, CodeSource, NormalizationResult,
};
use fcl_quality_common::fcl::{fcl_join_key, is_missing_code};
use fcl_quality_common::{
    DespachoRecord, DespachoSummary, EvaluationRecord, FclSummary, MasterDispatchRecord,
    ReconciledDespacho, ShipMode,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::Hash;

/// Cards shown when no search is given
pub const SUMMARY_LIMIT: usize = 10;

/// Left join: every left row appears once per matching right row, or once
/// with `None` when nothing matches. Left order is kept.
pub fn left_join<'a, L, R, K>(
    left: &'a [L],
    right: &'a [R],
    left_key: impl Fn(&L) -> K,
    right_key: impl Fn(&R) -> K,
) -> Vec<(&'a L, Option<&'a R>)>
where
    K: Eq + Hash,
{
    let mut index: HashMap<K, Vec<&R>> = HashMap::new();
    for r in right {
        index.entry(right_key(r)).or_default().push(r);
    }

    let mut joined = Vec::with_capacity(left.len());
    for l in left {
        match index.get(&left_key(l)) {
            Some(matches) => joined.extend(matches.iter().map(|r| (l, Some(*r)))),
            None => joined.push((l, None)),
        }
    }
    joined
}

fn has_code(fcl: &str) -> bool {
    !is_missing_code(fcl)
}

/// Dispatches joined with the master list on the container key. A dispatch
/// without a code never matches.
pub fn reconcile_despachos(
    despachos: &[DespachoRecord],
    master: &[MasterDispatchRecord],
) -> Vec<ReconciledDespacho> {
    left_join(
        despachos,
        master,
        |d| has_code(&d.fcl).then(|| d.fcl.clone()),
        |m| Some(m.fcl.clone()),
    )
        .into_iter()
        .map(|(despacho, master)| ReconciledDespacho {
            despacho: despacho.clone(),
            master: master.cloned(),
        })
        .collect()
}

/// Search terms rewritten with the same key function the records were
/// stored under.
fn search_keys(search: &[String], key: impl Fn(&str) -> String) -> HashSet<String> {
    search
        .iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| key(s))
        .collect()
}

/// Newest first; searched keys are all kept, otherwise the first
/// [`SUMMARY_LIMIT`].
fn select<T>(
    mut cards: Vec<T>,
    search: &HashSet<String>,
    fcl: impl Fn(&T) -> &str,
    date: impl Fn(&T) -> Option<NaiveDate>,
) -> Vec<T> {
    cards.sort_by(|a, b| date(b).cmp(&date(a)));
    if search.is_empty() {
        cards.truncate(SUMMARY_LIMIT);
        cards
    } else {
        cards.into_iter().filter(|c| search.contains(fcl(c))).collect()
    }
}

/// One card per (FCL, week, variety, producer) with its latest process date.
pub fn evaluation_summaries(records: &[EvaluationRecord], search: &[String]) -> Vec<FclSummary> {
    let mut groups: BTreeMap<(&str, i64, &str, &str), Option<NaiveDate>> = BTreeMap::new();
    for r in records {
        let latest = groups
            .entry((r.fcl.as_str(), r.semana, r.variedad.as_str(), r.productor.as_str()))
            .or_default();
        *latest = (*latest).max(r.fecha_proceso);
    }

    let cards = groups
        .into_iter()
        .map(|((fcl, semana, variedad, productor), fecha_proceso)| FclSummary {
            fcl: fcl.to_string(),
            semana,
            variedad: variedad.to_string(),
            productor: productor.to_string(),
            fecha_proceso,
        })
        .collect();

    select(cards, &search_keys(search, fcl_join_key), |c| c.fcl.as_str(), |c| c.fecha_proceso)
}

/// One card per (FCL, client, company, mode, state) with its latest
/// dispatch date. Rows without a code have no card.
pub fn despacho_summaries(records: &[DespachoRecord], search: &[String]) -> Vec<DespachoSummary> {
    type Key<'a> = (&'a str, &'a str, &'a str, ShipMode, &'a str);
    let mut groups: BTreeMap<Key<'_>, Option<NaiveDate>> = BTreeMap::new();
    for r in records.iter().filter(|r| has_code(&r.fcl)) {
        let latest = groups
            .entry((r.fcl.as_str(), r.cliente.as_str(), r.empresa.as_str(), r.envio, r.estado.as_str()))
            .or_default();
        *latest = (*latest).max(r.fecha_despacho);
    }

    let cards = groups
        .into_iter()
        .map(|((fcl, cliente, empresa, envio, estado), fecha_despacho)| DespachoSummary {
            fcl: fcl.to_string(),
            cliente: cliente.to_string(),
            empresa: empresa.to_string(),
            envio,
            estado: estado.to_string(),
            fecha_despacho,
        })
        .collect();

    select(cards, &search_keys(search, despacho_code_key), |c| c.fcl.as_str(), |c| c.fecha_despacho)
}

/// Evaluations of one container, in input order.
pub fn evaluations_for<'a>(records: &'a [EvaluationRecord], fcl: &str) -> Vec<&'a EvaluationRecord> {
    let key = fcl_join_key(fcl);
    records.iter().filter(|r| r.fcl == key).collect()
}

/// Dispatch rows of one container, in input order. `fcl` may be written the
/// way the programming sheet writes it.
pub fn despachos_for<'a>(records: &'a [DespachoRecord], fcl: &str) -> Vec<&'a DespachoRecord> {
    let key = despacho_code_key(fcl);
    if !has_code(&key) {
        return Vec::new();
    }
    records.iter().filter(|r| r.fcl == key).collect()
}

/// Quality evaluations of the container a dispatch carries.
pub fn link_evaluations<'a>(
    despacho: &DespachoRecord,
    evaluations: &'a [EvaluationRecord],
) -> Vec<&'a EvaluationRecord> {
    evaluations.iter().filter(|e| e.fcl == despacho.fcl).collect()
}

/// Join diagnostics across the three sources
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconciliationReport {
    pub evaluation_codes: NormalizationResult,
    pub despacho_codes: NormalizationResult,
    pub master_codes: NormalizationResult,
    /// Dispatch rows with at least one master-list row
    pub matched: usize,
    /// Dispatch rows with no master-list row
    pub unmatched: usize,
    /// Containers of the unmatched rows
    pub unmatched_fcls: BTreeSet<String>,
    /// Dispatched containers that also have a quality evaluation
    pub evaluated_fcls: BTreeSet<String>,
    /// Dispatched containers with no quality evaluation
    pub unevaluated_fcls: BTreeSet<String>,
}

impl ReconciliationReport {
    pub fn build(
        evaluations: &[EvaluationRecord],
        despachos: &[DespachoRecord],
        master: &[MasterDispatchRecord],
    ) -> Self {
        let master_keys: HashSet<&str> = master.iter().map(|m| m.fcl.as_str()).collect();
        let evaluated_keys: HashSet<&str> = evaluations.iter().map(|e| e.fcl.as_str()).collect();

        let mut report = ReconciliationReport {
            evaluation_codes: normalize_join_codes(
                CodeSource::Evaluacion,
                evaluations.iter().map(|e| e.fcl_raw.as_str()),
            ),
            despacho_codes: normalize_codes(
                CodeSource::Programacion,
                despachos.iter().map(|d| d.codigo.as_str()),
                despacho_code_key,
            ),
            master_codes: normalize_join_codes(
                CodeSource::ListaMaestra,
                master.iter().map(|m| m.fcl_raw.as_str()),
            ),
            ..Default::default()
        };

        for d in despachos {
            if !has_code(&d.fcl) {
                report.unmatched += 1;
                continue;
            }
            if master_keys.contains(d.fcl.as_str()) {
                report.matched += 1;
            } else {
                report.unmatched += 1;
                report.unmatched_fcls.insert(d.fcl.clone());
            }
            if evaluated_keys.contains(d.fcl.as_str()) {
                report.evaluated_fcls.insert(d.fcl.clone());
            } else {
                report.unevaluated_fcls.insert(d.fcl.clone());
            }
        }

        tracing::info!(
            emparejados = report.matched,
            sin_lista = report.unmatched,
            "reconciliación de despachos"
        );
        report
    }
}
