//! Microsoft Graph download path
//!
//! client-credentials token → list folder children → follow the file's
//! `@microsoft.graph.downloadUrl`. Tokens and workbooks are cached.

use super::{SourceFile, WorkbookSource};
use crate::cache::{TtlCache, TOKEN_TTL, WORKBOOK_TTL};
use crate::config::{Config, GraphCredentials, Tenant};
use crate::error::{QcError, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

pub const LOGIN_BASE: &str = "https://login.microsoftonline.com";
pub const GRAPH_BASE: &str = "https://graph.microsoft.com/v1.0";
pub const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChildrenResponse {
    #[serde(default)]
    value: Vec<DriveItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DriveItem {
    pub name: String,
    #[serde(rename = "@microsoft.graph.downloadUrl")]
    pub download_url: Option<String>,
}

pub fn token_url(tenant_id: &str) -> String {
    format!("{}/{}/oauth2/v2.0/token", LOGIN_BASE, tenant_id)
}

pub fn children_url(drive_id: &str, folder_id: &str) -> String {
    format!("{}/drives/{}/items/{}/children", GRAPH_BASE, drive_id, folder_id)
}

/// Download URL of the item named exactly `name`.
pub fn find_download_url<'a>(items: &'a [DriveItem], name: &str) -> Option<&'a str> {
    items
        .iter()
        .find(|item| item.name == name)
        .and_then(|item| item.download_url.as_deref())
}

pub struct GraphSource {
    client: reqwest::Client,
    graph: Option<GraphCredentials>,
    graph_alza: Option<GraphCredentials>,
    tokens: TtlCache<String>,
    workbooks: TtlCache<Arc<Vec<u8>>>,
}

impl GraphSource {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            graph: config.microsoft_graph.clone(),
            graph_alza: config.microsoft_graph_alza.clone(),
            tokens: TtlCache::new(TOKEN_TTL),
            workbooks: TtlCache::new(WORKBOOK_TTL),
        })
    }

    fn credentials(&self, tenant: Tenant) -> Result<&GraphCredentials> {
        let creds = match tenant {
            Tenant::Graph => self.graph.as_ref(),
            Tenant::GraphAlza => self.graph_alza.as_ref(),
        };
        creds.ok_or_else(|| QcError::Config(format!("falta la sección `{}`", tenant.section())))
    }

    /// Bearer token for the tenant, cached for [`TOKEN_TTL`].
    pub async fn access_token(&self, tenant: Tenant) -> Result<String> {
        let creds = self.credentials(tenant)?;
        self.tokens
            .get_or_try_fetch(tenant.section(), || self.request_token(creds))
            .await
    }

    async fn request_token(&self, creds: &GraphCredentials) -> Result<String> {
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", creds.client_id.as_str()),
            ("client_secret", creds.client_secret.as_str()),
            ("scope", GRAPH_SCOPE),
        ];
        let response = self
            .client
            .post(token_url(&creds.tenant_id))
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QcError::Auth(format!("HTTP {}: {}", status, body)));
        }

        let token: TokenResponse = response.json().await?;
        let token = token
            .access_token
            .ok_or_else(|| QcError::Auth("la respuesta no contiene access_token".into()))?;
        tracing::info!("token de acceso obtenido");
        Ok(token)
    }

    /// Children of a shared folder.
    pub async fn list_folder(&self, file: &SourceFile) -> Result<Vec<DriveItem>> {
        let token = self.access_token(file.tenant).await?;
        let response = self
            .client
            .get(children_url(file.drive_id, file.folder_id))
            .bearer_auth(&token)
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                // a rejected token must not be reused
                self.tokens.invalidate(file.tenant.section());
                return Err(QcError::Auth(format!("HTTP {}: {}", status, body)));
            }
            _ => {}
        }

        let children: ChildrenResponse = response.error_for_status()?.json().await?;
        Ok(children.value)
    }

    async fn download(&self, file: &SourceFile) -> Result<Arc<Vec<u8>>> {
        let items = self.list_folder(file).await?;
        let url = find_download_url(&items, file.file_name).ok_or_else(|| {
            QcError::NotFound(format!("`{}` no está en la carpeta compartida", file.file_name))
        })?;

        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        tracing::info!(file = file.file_name, size = bytes.len(), "libro descargado");
        Ok(Arc::new(bytes.to_vec()))
    }
}

impl WorkbookSource for GraphSource {
    async fn fetch(&self, file: &SourceFile) -> Result<Arc<Vec<u8>>> {
        self.workbooks
            .get_or_try_fetch(file.file_name, || self.download(file))
            .await
    }
}
