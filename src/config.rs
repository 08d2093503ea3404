use crate::error::{QcError, Result};
use fcl_quality_common::DEFAULT_COMPANY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_ENV: &str = "QC_CONFIG";
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Microsoft Graph tenant a workbook lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tenant {
    Graph,
    GraphAlza,
}

impl Tenant {
    pub fn section(&self) -> &'static str {
        match self {
            Tenant::Graph => "microsoft_graph",
            Tenant::GraphAlza => "microsoft_graph_alza",
        }
    }

    fn secret_env(&self) -> &'static str {
        match self {
            Tenant::Graph => "QC_GRAPH_CLIENT_SECRET",
            Tenant::GraphAlza => "QC_GRAPH_ALZA_CLIENT_SECRET",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphCredentials {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    pub database: String,
    pub user: String,
    #[serde(default)]
    pub password: String,
}

fn default_db_port() -> u16 {
    5432
}

fn default_company() -> String {
    DEFAULT_COMPANY.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub microsoft_graph: Option<GraphCredentials>,
    #[serde(default)]
    pub microsoft_graph_alza: Option<GraphCredentials>,
    #[serde(default)]
    pub db: Option<DatabaseConfig>,
    /// Parent company the evaluation views are filtered to
    #[serde(default = "default_company")]
    pub company: String,
    /// Read workbooks from this directory instead of Microsoft Graph
    #[serde(default)]
    pub local_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            microsoft_graph: None,
            microsoft_graph_alza: None,
            db: None,
            company: default_company(),
            local_dir: None,
        }
    }
}

impl Config {
    /// Loads the configuration.
    ///
    /// Path: `explicit`, else `$QC_CONFIG`, else `./config.yaml`, else
    /// `~/.config/fcl-quality/config.yaml`. No file at all yields the
    /// default configuration. Env secrets are applied last.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match Self::resolve_path(explicit) {
            Some(path) => Self::from_file(&path)?,
            None => {
                tracing::warn!("no se encontró {}, usando configuración por defecto", CONFIG_FILE_NAME);
                Self::default()
            }
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;
        tracing::debug!(path = %path.display(), "configuración cargada");
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // an empty file deserializes to unit, not to a mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            return Some(local);
        }
        Self::user_config_path().filter(|p| p.exists())
    }

    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("fcl-quality").join(CONFIG_FILE_NAME))
    }

    /// Overrides secrets from the environment. `lookup` is injected so tests
    /// do not touch the process environment.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for tenant in [Tenant::Graph, Tenant::GraphAlza] {
            if let Some(secret) = lookup(tenant.secret_env()) {
                if let Some(creds) = self.credentials_mut(tenant) {
                    creds.client_secret = secret;
                }
            }
        }
        if let (Some(password), Some(db)) = (lookup("QC_DB_PASSWORD"), self.db.as_mut()) {
            db.password = password;
        }
    }

    fn credentials_mut(&mut self, tenant: Tenant) -> Option<&mut GraphCredentials> {
        match tenant {
            Tenant::Graph => self.microsoft_graph.as_mut(),
            Tenant::GraphAlza => self.microsoft_graph_alza.as_mut(),
        }
    }

    pub fn graph_credentials(&self, tenant: Tenant) -> Result<&GraphCredentials> {
        let creds = match tenant {
            Tenant::Graph => self.microsoft_graph.as_ref(),
            Tenant::GraphAlza => self.microsoft_graph_alza.as_ref(),
        };
        creds.ok_or_else(|| QcError::Config(format!("falta la sección `{}`", tenant.section())))
    }

    pub fn database(&self) -> Result<&DatabaseConfig> {
        self.db
            .as_ref()
            .ok_or_else(|| QcError::Config("falta la sección `db`".into()))
    }

    /// YAML with every secret replaced by `****`.
    pub fn masked_yaml(&self) -> Result<String> {
        let mut masked = self.clone();
        for creds in [
            masked.microsoft_graph.as_mut(),
            masked.microsoft_graph_alza.as_mut(),
        ]
        .into_iter()
        .flatten()
        {
            creds.client_secret = mask(&creds.client_secret);
        }
        if let Some(db) = masked.db.as_mut() {
            db.password = mask(&db.password);
        }
        Ok(serde_yaml::to_string(&masked)?)
    }
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        "****".to_string()
    }
}
