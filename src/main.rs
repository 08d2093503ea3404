use chrono::Local;
use clap::Parser;
use fcl_quality::{browse, cli, config, dashboard, error, export, normalizer, server};
use cli::{page_for, Cli, Commands};
use config::Config;
use dashboard::Dashboard;
use error::Result;
use fcl_quality_common::{normalize_fcl_code, Page, ReportKind};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Awaits `fut` behind a spinner with `message`.
async fn with_spinner<T>(message: &str, fut: impl Future<Output = T>) -> T {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    let out = fut.await;
    pb.finish_and_clear();
    out
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::List { despacho, search, json } => {
            let dashboard = Dashboard::from_config(&config)?;
            let page = page_for(despacho);
            let labels = match page {
                Page::ProductoTerminado => {
                    let cards = with_spinner("Cargando evaluaciones...", dashboard.evaluation_list(&search)).await?;
                    if json {
                        return print_json(&cards);
                    }
                    cards.iter().map(browse::evaluation_label).collect::<Vec<_>>()
                }
                Page::Despacho => {
                    let cards = with_spinner("Cargando despachos...", dashboard.despacho_list(&search)).await?;
                    if json {
                        return print_json(&cards);
                    }
                    cards.iter().map(browse::despacho_label).collect::<Vec<_>>()
                }
            };

            println!("{}\n", page.title());
            if labels.is_empty() {
                println!("Sin registros para mostrar.");
            }
            for label in labels {
                println!("  {}", label);
            }
        }

        Commands::Show { fcl, kind, json } => {
            let dashboard = Dashboard::from_config(&config)?;
            match ReportKind::from(kind) {
                ReportKind::Quality => {
                    let detail = with_spinner("Cargando evaluaciones...", dashboard.evaluation_detail(&fcl)).await?;
                    if json {
                        return print_json(&detail);
                    }
                    browse::print_evaluation_detail(&detail);
                }
                ReportKind::Despacho => {
                    let detail = with_spinner("Cargando despachos...", dashboard.despacho_detail(&fcl)).await?;
                    if json {
                        return print_json(&detail);
                    }
                    browse::print_despacho_detail(&detail);
                }
            }
        }

        Commands::Report { fcl, kind, rows, output, detail_pages } => {
            let kind = ReportKind::from(kind);
            println!("📄 fcl-quality - {}\n", kind.title());

            println!("[1/2] Cargando datos del FCL {}...", fcl);
            let dashboard = Dashboard::from_config(&config)?;
            let at = Local::now().naive_local();
            let report = with_spinner(
                "Generando PDF...",
                dashboard.report(kind, &fcl, &rows, detail_pages, at),
            )
            .await?;
            println!("✔ Informe generado ({} bytes)\n", report.bytes.len());

            println!("[2/2] Guardando PDF...");
            let path = export::report_output_path(output.as_deref(), kind, &report.fcl, at);
            std::fs::write(&path, &report.bytes)?;
            println!("✔ PDF guardado: {}", path.display());
        }

        Commands::Export { fcl, output } => {
            println!("📊 fcl-quality - Exportar a Excel\n");
            let dashboard = Dashboard::from_config(&config)?;

            println!("[1/2] Cargando evaluaciones del FCL {}...", fcl);
            let detail = with_spinner("Cargando evaluaciones...", dashboard.evaluation_detail(&fcl)).await?;
            println!("✔ {} registro(s)\n", detail.records.len());

            println!("[2/2] Escribiendo Excel...");
            let at = Local::now().naive_local();
            let path = export::workbook_output_path(output.as_deref(), &detail.fcl, at);
            export::generate_detail_workbook(&detail.fcl, &detail.records, Some(&path))?;
            println!("✔ Excel guardado: {}", path.display());
        }

        Commands::Reconcile { json, corrections } => {
            let dashboard = Dashboard::from_config(&config)?;
            let (report, rows) = with_spinner("Cruzando fuentes...", dashboard.reconcile()).await?;
            if json {
                return print_json(&serde_json::json!({ "report": report, "rows": rows }));
            }

            println!("🔗 fcl-quality - Reconciliación\n");
            for (name, codes) in [
                ("Evaluación PT", &report.evaluation_codes),
                ("Programación", &report.despacho_codes),
                ("Lista maestra", &report.master_codes),
            ] {
                println!(
                    "  {:<14} códigos: {:>5}  vacíos: {:>4}  corregidos: {:>4}  no canónicos: {:>4}",
                    name,
                    codes.stats.total_codes,
                    codes.stats.missing_codes,
                    codes.stats.corrected_codes,
                    codes.stats.non_canonical
                );
            }
            println!();
            println!("  Despachos en lista maestra:     {}", report.matched);
            println!("  Despachos sin lista maestra:    {}", report.unmatched);
            println!("  FCL despachados con evaluación: {}", report.evaluated_fcls.len());
            println!("  FCL despachados sin evaluación: {}", report.unevaluated_fcls.len());
            if !report.unmatched_fcls.is_empty() {
                let codes: Vec<&str> = report.unmatched_fcls.iter().map(String::as_str).collect();
                println!("\n  Sin lista maestra: {}", codes.join(", "));
            }

            if corrections {
                println!("\nCorrecciones:");
                for c in report
                    .evaluation_codes
                    .corrections
                    .iter()
                    .chain(&report.despacho_codes.corrections)
                    .chain(&report.master_codes.corrections)
                {
                    let reasons: Vec<String> = c.reasons.iter().map(|r| r.to_string()).collect();
                    println!(
                        "  [{}] {:?} → {} ({})",
                        c.source,
                        c.original,
                        c.corrected,
                        reasons.join(", ")
                    );
                }
            }
        }

        Commands::Normalize { codes } => {
            for raw in &codes {
                match normalize_fcl_code(Some(raw.as_str())) {
                    Some(code) => {
                        let reasons: Vec<String> = normalizer::explain_correction(raw)
                            .iter()
                            .map(|r| r.to_string())
                            .collect();
                        if reasons.is_empty() {
                            println!("{:?} → {}", raw, code);
                        } else {
                            println!("{:?} → {} ({})", raw, code, reasons.join(", "));
                        }
                    }
                    None => println!("{:?} → (sin código)", raw),
                }
            }
        }

        Commands::Browse { despacho } => {
            let dashboard = Dashboard::from_config(&config)?;
            browse::run_browser(&dashboard, page_for(despacho)).await?;
        }

        Commands::Serve { bind } => {
            println!("🌐 fcl-quality - API en http://{}\n", bind);
            let dashboard = Dashboard::from_config(&config)?;
            server::run_server(dashboard, &bind).await?;
        }

        Commands::Config { show } => {
            if show {
                println!("Configuración:");
                print!("{}", config.masked_yaml()?);
            } else if let Some(path) = Config::user_config_path() {
                println!("Archivo de usuario: {}", path.display());
                println!("Use --show para ver la configuración resuelta");
            }
        }
    }

    Ok(())
}
