//! Interactive list/detail browser (dialoguer)
//!
//! Drives a [`Router`] from menu choices. Each view is loaded fresh when it
//! is shown; a detail that cannot be loaded prints the message and goes
//! back to its list.

use crate::dashboard::{Dashboard, DespachoDetail, EvaluationDetail};
use crate::error::{QcError, Result};
use crate::export::report_output_path;
use crate::source::WorkbookSource;
use chrono::{Local, NaiveDate};
use dialoguer::{Input, Select};
use fcl_quality_common::export::pdf_core::build_info_rows;
use fcl_quality_common::navigation::{NavEvent, Page, Router, View};
use fcl_quality_common::{DespachoSummary, FclSummary, ReportKind, ReportSummary};

/// What a list menu entry does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAction {
    Navigate(NavEvent),
    Search,
    ClearSearch,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailAction {
    Report,
    Back,
    Quit,
}

pub const DETAIL_ACTIONS: [(&str, DetailAction); 3] = [
    ("Generar PDF", DetailAction::Report),
    ("Volver a la lista", DetailAction::Back),
    ("Salir", DetailAction::Quit),
];

fn date_label(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn evaluation_label(summary: &FclSummary) -> String {
    format!(
        "{} | sem {} | {} | {} | {}",
        summary.fcl,
        summary.semana,
        summary.variedad,
        summary.productor,
        date_label(summary.fecha_proceso)
    )
}

pub fn despacho_label(summary: &DespachoSummary) -> String {
    format!(
        "{} | {} | {} | {} | {}",
        summary.fcl,
        summary.cliente,
        summary.envio,
        summary.estado,
        date_label(summary.fecha_despacho)
    )
}

fn other_page(page: Page) -> Page {
    match page {
        Page::ProductoTerminado => Page::Despacho,
        Page::Despacho => Page::ProductoTerminado,
    }
}

/// Menu of a list view: one entry per FCL, then the fixed actions.
pub fn list_menu(page: Page, cards: &[(String, String)], searching: bool) -> Vec<(String, ListAction)> {
    let mut menu: Vec<(String, ListAction)> = cards
        .iter()
        .map(|(fcl, label)| (label.clone(), ListAction::Navigate(NavEvent::OpenDetail(fcl.clone()))))
        .collect();
    menu.push(("Buscar FCL...".to_string(), ListAction::Search));
    if searching {
        menu.push(("Ver los más recientes".to_string(), ListAction::ClearSearch));
    }
    let other = other_page(page);
    menu.push((
        format!("Ir a {}", other.title()),
        ListAction::Navigate(NavEvent::SelectPage(other)),
    ));
    menu.push(("Salir".to_string(), ListAction::Quit));
    menu
}

/// Splits a search prompt answer into codes.
pub fn parse_search(input: &str) -> Vec<String> {
    input
        .split([',', ' '])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn print_evaluation_detail(detail: &EvaluationDetail) {
    println!("\n== FCL {} ==", detail.fcl);
    print_info(ReportKind::Quality, &detail.summary);
    println!("\n  {} evaluación(es):", detail.records.len());
    for (i, record) in detail.records.iter().enumerate() {
        println!(
            "  [{}] {} | turno {} | {} | {} | brix {:.2} | acidez {:.2}",
            i + 1,
            date_label(record.fecha_proceso),
            record.turno,
            record.evaluador,
            record.presentacion,
            record.brix,
            record.acidez
        );
    }
    println!("  Imágenes: {}", detail.image_count);
}

pub fn print_despacho_detail(detail: &DespachoDetail) {
    println!("\n== FCL {} ==", detail.fcl);
    print_info(ReportKind::Despacho, &detail.summary);
    println!("\n  {} despacho(s):", detail.rows.len());
    for (i, row) in detail.rows.iter().enumerate() {
        let d = &row.despacho;
        let master = match &row.master {
            Some(m) => format!("lista maestra: {} {}", m.cliente, date_label(m.fecha_despacho)),
            None => "sin registro en lista maestra".to_string(),
        };
        println!(
            "  [{}] {} | {} | {} | {} | {}",
            i + 1,
            d.envio,
            d.cliente,
            d.estado,
            date_label(d.fecha_despacho),
            master
        );
    }
    println!("  Evaluaciones vinculadas: {}", detail.evaluations.len());
    println!("  Imágenes: {}", detail.image_count);
}

fn print_info(kind: ReportKind, summary: &ReportSummary) {
    for field in build_info_rows(kind, summary).into_iter().flatten() {
        println!("  {:<16} {}", field.label, field.value);
    }
}

fn choose(prompt: &str, labels: &[String]) -> Result<usize> {
    Ok(Select::new()
        .with_prompt(prompt)
        .items(labels)
        .default(0)
        .interact()?)
}

struct Browser<'a, S> {
    dashboard: &'a Dashboard<S>,
    router: Router,
    search: Vec<String>,
}

impl<'a, S: WorkbookSource> Browser<'a, S> {
    /// Cards of the current list, as `(fcl, label)`.
    async fn cards(&self) -> Result<Vec<(String, String)>> {
        Ok(match self.router.page {
            Page::ProductoTerminado => self
                .dashboard
                .evaluation_list(&self.search)
                .await?
                .iter()
                .map(|s| (s.fcl.clone(), evaluation_label(s)))
                .collect(),
            Page::Despacho => self
                .dashboard
                .despacho_list(&self.search)
                .await?
                .iter()
                .map(|s| (s.fcl.clone(), despacho_label(s)))
                .collect(),
        })
    }

    /// One list step; `false` ends the session.
    async fn list_step(&mut self) -> Result<bool> {
        let cards = self.cards().await?;
        if cards.is_empty() {
            println!("Sin registros para mostrar.");
        }
        let menu = list_menu(self.router.page, &cards, !self.search.is_empty());
        let labels: Vec<String> = menu.iter().map(|(label, _)| label.clone()).collect();
        let index = choose(self.router.page.title(), &labels)?;

        match &menu[index].1 {
            ListAction::Navigate(event) => {
                if matches!(event, NavEvent::SelectPage(_)) {
                    self.search.clear();
                }
                self.router = self.router.apply(event.clone());
            }
            ListAction::Search => {
                let answer: String = Input::new()
                    .with_prompt("FCL (separados por coma)")
                    .allow_empty(true)
                    .interact_text()?;
                self.search = parse_search(&answer);
            }
            ListAction::ClearSearch => self.search.clear(),
            ListAction::Quit => return Ok(false),
        }
        Ok(true)
    }

    async fn detail_step(&mut self, fcl: String) -> Result<bool> {
        let kind = match self.router.page {
            Page::ProductoTerminado => ReportKind::Quality,
            Page::Despacho => ReportKind::Despacho,
        };
        let loaded = match kind {
            ReportKind::Quality => self
                .dashboard
                .evaluation_detail(&fcl)
                .await
                .map(|d| print_evaluation_detail(&d)),
            ReportKind::Despacho => self
                .dashboard
                .despacho_detail(&fcl)
                .await
                .map(|d| print_despacho_detail(&d)),
        };
        match loaded {
            Ok(()) => {}
            Err(QcError::NotFound(message)) => {
                println!("{}", message);
                self.router = self.router.back();
                return Ok(true);
            }
            Err(e) => return Err(e),
        }

        let labels: Vec<String> = DETAIL_ACTIONS.iter().map(|(l, _)| l.to_string()).collect();
        match DETAIL_ACTIONS[choose(&format!("FCL {}", fcl), &labels)?].1 {
            DetailAction::Report => {
                let at = Local::now().naive_local();
                let report = self.dashboard.report(kind, &fcl, &[], false, at).await?;
                let path = report_output_path(None, kind, &report.fcl, at);
                std::fs::write(&path, &report.bytes)?;
                println!("✔ PDF guardado: {}", path.display());
            }
            DetailAction::Back => self.router = self.router.back(),
            DetailAction::Quit => return Ok(false),
        }
        Ok(true)
    }
}

/// Runs the browser until the user quits.
pub async fn run_browser<S: WorkbookSource>(dashboard: &Dashboard<S>, page: Page) -> Result<()> {
    let mut browser = Browser {
        dashboard,
        router: Router::new(page),
        search: Vec::new(),
    };
    loop {
        let keep_going = match browser.router.view.clone() {
            View::List => browser.list_step().await?,
            View::Detail { fcl } => browser.detail_step(fcl).await?,
        };
        if !keep_going {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_menu_entries() {
        let cards = vec![("EXC045".to_string(), "EXC045 | ...".to_string())];
        let menu = list_menu(Page::ProductoTerminado, &cards, false);
        assert_eq!(
            menu[0].1,
            ListAction::Navigate(NavEvent::OpenDetail("EXC045".into()))
        );
        assert_eq!(menu[1].1, ListAction::Search);
        assert_eq!(
            menu[2].1,
            ListAction::Navigate(NavEvent::SelectPage(Page::Despacho))
        );
        assert_eq!(menu.last().unwrap().1, ListAction::Quit);

        let searching = list_menu(Page::Despacho, &[], true);
        assert!(searching.iter().any(|(_, a)| *a == ListAction::ClearSearch));
    }

    #[test]
    fn test_parse_search() {
        assert_eq!(parse_search(" EXC045, gp7  EXC12"), ["EXC045", "gp7", "EXC12"]);
        assert!(parse_search("  ").is_empty());
    }

    #[test]
    fn test_labels() {
        let summary = FclSummary {
            fcl: "EXC045".into(),
            semana: 12,
            variedad: "BILOXI".into(),
            productor: "SAN LUCAR".into(),
            fecha_proceso: NaiveDate::from_ymd_opt(2025, 3, 1),
        };
        assert_eq!(evaluation_label(&summary), "EXC045 | sem 12 | BILOXI | SAN LUCAR | 01/03/2025");
    }

    #[test]
    fn test_back_action_is_second() {
        assert_eq!(DETAIL_ACTIONS[1].0, "Volver a la lista");
        assert_eq!(DETAIL_ACTIONS[1].1, DetailAction::Back);
    }
}
