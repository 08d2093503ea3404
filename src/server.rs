//! JSON API over the dashboard (actix-web)

use crate::dashboard::Dashboard;
use crate::error::QcError;
use actix_web::{http::StatusCode, web, App, HttpResponse, HttpServer, Responder};
use chrono::Local;
use fcl_quality_common::ReportKind;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Comma-separated FCL codes
    pub fcl: Option<String>,
}

impl ListQuery {
    pub fn search_terms(&self) -> Vec<String> {
        self.fcl
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    /// Comma-separated 1-based detail rows
    pub rows: Option<String>,
    #[serde(default)]
    pub detalle: bool,
}

impl ReportQuery {
    pub fn row_numbers(&self) -> Result<Vec<usize>, QcError> {
        self.rows
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<usize>()
                    .map_err(|_| QcError::MalformedData(format!("fila inválida: {}", s)))
            })
            .collect()
    }
}

pub fn status_for(error: &QcError) -> StatusCode {
    match error {
        QcError::NotFound(_) => StatusCode::NOT_FOUND,
        QcError::Auth(_) => StatusCode::BAD_GATEWAY,
        QcError::MalformedData(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: QcError) -> HttpResponse {
    let status = status_for(&error);
    if status.is_server_error() {
        tracing::error!("{}", error);
    } else {
        tracing::warn!("{}", error);
    }
    HttpResponse::build(status).json(json!({ "error": error.to_string() }))
}

fn respond<T: serde::Serialize>(result: Result<T, QcError>) -> HttpResponse {
    match result {
        Ok(body) => HttpResponse::Ok().json(body),
        Err(e) => error_response(e),
    }
}

async fn health_handler(dashboard: web::Data<Dashboard>) -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok", "imagenes": dashboard.images_enabled() }))
}

async fn evaluation_list_handler(
    dashboard: web::Data<Dashboard>,
    query: web::Query<ListQuery>,
) -> impl Responder {
    respond(dashboard.evaluation_list(&query.search_terms()).await)
}

async fn evaluation_detail_handler(
    dashboard: web::Data<Dashboard>,
    path: web::Path<String>,
) -> impl Responder {
    respond(dashboard.evaluation_detail(&path).await)
}

async fn despacho_list_handler(
    dashboard: web::Data<Dashboard>,
    query: web::Query<ListQuery>,
) -> impl Responder {
    respond(dashboard.despacho_list(&query.search_terms()).await)
}

async fn despacho_detail_handler(
    dashboard: web::Data<Dashboard>,
    path: web::Path<String>,
) -> impl Responder {
    respond(dashboard.despacho_detail(&path).await)
}

async fn pdf_response(
    dashboard: &Dashboard,
    kind: ReportKind,
    fcl: &str,
    query: &ReportQuery,
) -> HttpResponse {
    let rows = match query.row_numbers() {
        Ok(rows) => rows,
        Err(e) => return error_response(e),
    };
    let at = Local::now().naive_local();
    match dashboard.report(kind, fcl, &rows, query.detalle, at).await {
        Ok(report) => HttpResponse::Ok()
            .content_type("application/pdf")
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", report.file_name),
            ))
            .body(report.bytes),
        Err(e) => error_response(e),
    }
}

async fn evaluation_pdf_handler(
    dashboard: web::Data<Dashboard>,
    path: web::Path<String>,
    query: web::Query<ReportQuery>,
) -> impl Responder {
    pdf_response(&dashboard, ReportKind::Quality, &path, &query).await
}

async fn despacho_pdf_handler(
    dashboard: web::Data<Dashboard>,
    path: web::Path<String>,
    query: web::Query<ReportQuery>,
) -> impl Responder {
    pdf_response(&dashboard, ReportKind::Despacho, &path, &query).await
}

/// Registers every route; shared by the server and the tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_handler))
        .route("/api/producto-terminado", web::get().to(evaluation_list_handler))
        .route("/api/producto-terminado/{fcl}", web::get().to(evaluation_detail_handler))
        .route("/api/producto-terminado/{fcl}/pdf", web::get().to(evaluation_pdf_handler))
        .route("/api/despacho", web::get().to(despacho_list_handler))
        .route("/api/despacho/{fcl}", web::get().to(despacho_detail_handler))
        .route("/api/despacho/{fcl}/pdf", web::get().to(despacho_pdf_handler));
}

pub async fn run_server(dashboard: Dashboard, bind_addr: &str) -> std::io::Result<()> {
    let data = web::Data::new(dashboard);
    tracing::info!(bind = bind_addr, "servidor escuchando");
    HttpServer::new(move || App::new().app_data(data.clone()).configure(configure))
        .bind(bind_addr)?
        .run()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::AnyImageStore;
    use crate::source::{AnySource, LocalSource};
    use actix_web::test as atest;

    fn dashboard(dir: &std::path::Path) -> Dashboard {
        Dashboard::new(
            AnySource::Local(LocalSource::new(dir)),
            AnyImageStore::Disabled,
            None,
        )
    }

    #[test]
    fn test_search_terms() {
        let query = ListQuery {
            fcl: Some(" EXC045, ,gp7 ".into()),
        };
        assert_eq!(query.search_terms(), ["EXC045", "gp7"]);
        assert!(ListQuery { fcl: None }.search_terms().is_empty());
    }

    #[test]
    fn test_row_numbers() {
        let query = ReportQuery {
            rows: Some("2, 1".into()),
            detalle: false,
        };
        assert_eq!(query.row_numbers().unwrap(), [2, 1]);

        let bad = ReportQuery {
            rows: Some("dos".into()),
            detalle: false,
        };
        assert!(matches!(bad.row_numbers(), Err(QcError::MalformedData(_))));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&QcError::NotFound("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_for(&QcError::Auth("x".into())), StatusCode::BAD_GATEWAY);
        assert_eq!(
            status_for(&QcError::MalformedData("x".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(&QcError::Config("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let app = atest::init_service(
            App::new()
                .app_data(web::Data::new(dashboard(dir.path())))
                .configure(configure),
        )
        .await;
        let req = atest::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = atest::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["imagenes"], false);
    }

    #[actix_web::test]
    async fn test_missing_workbook_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let app = atest::init_service(
            App::new()
                .app_data(web::Data::new(dashboard(dir.path())))
                .configure(configure),
        )
        .await;
        let req = atest::TestRequest::get()
            .uri("/api/producto-terminado/EXC045")
            .to_request();
        let resp = atest::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
