//! Photo lookup in the image database
//!
//! Photos are stored as data-URI base64 strings. Evaluation photos are
//! keyed by the folder they were synced from (the container code, sometimes
//! in its raw spelling), dispatch photos by a file name that starts with the
//! container code.

use crate::cache::{TtlCache, DESPACHO_IMAGES_TTL, EVALUATION_IMAGES_TTL};
use crate::config::{Config, DatabaseConfig};
use crate::error::Result;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::FromRow;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

const SESSION_TIMEZONE: &str = "America/Lima";
const MAX_CONNECTIONS: u32 = 4;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

const EVALUATION_IMAGES_SQL: &str = "SELECT image_base64 \
     FROM images_fcl_drive WHERE TRIM(folder_name) = ANY($1) ORDER BY folder_name";

const DESPACHO_IMAGES_SQL: &str = "SELECT image_base64 \
     FROM images_onedrive_despacho WHERE name LIKE $1 ORDER BY name";

pub type Images = Arc<Vec<String>>;

#[derive(Debug, FromRow)]
struct ImageRow {
    image_base64: Option<String>,
}

/// Codes an evaluation folder may be named after: the canonical code and
/// every raw spelling seen in the sheet.
pub fn evaluation_codes<'a>(fcl: &str, raws: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut codes = BTreeSet::new();
    codes.insert(fcl.trim().to_string());
    codes.extend(raws.into_iter().map(|r| r.trim().to_string()));
    codes.into_iter().filter(|c| !c.is_empty()).collect()
}

/// `LIKE` pattern of a dispatch photo name. `%` and `_` in the code are
/// escaped so only the prefix matches.
pub fn despacho_pattern(fcl: &str) -> String {
    let escaped = fcl
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("{}%", escaped)
}

#[allow(async_fn_in_trait)]
pub trait ImageStore {
    /// Photos of the evaluation folders named by `codes`.
    async fn evaluation_images(&self, codes: &[String]) -> Result<Images>;

    /// Photos whose name starts with `fcl`.
    async fn despacho_images(&self, fcl: &str) -> Result<Images>;
}

pub struct PgImageStore {
    pool: PgPool,
    evaluation_cache: TtlCache<Images>,
    despacho_cache: TtlCache<Images>,
}

impl PgImageStore {
    /// Pool that connects on first use, with the session in Lima time.
    pub fn new(db: &DatabaseConfig) -> Self {
        let options = PgConnectOptions::new()
            .host(&db.host)
            .port(db.port)
            .database(&db.database)
            .username(&db.user)
            .password(&db.password)
            .options([("timezone", SESSION_TIMEZONE)]);

        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_lazy_with(options);

        Self {
            pool,
            evaluation_cache: TtlCache::new(EVALUATION_IMAGES_TTL),
            despacho_cache: TtlCache::new(DESPACHO_IMAGES_TTL),
        }
    }

    async fn fetch(&self, sql: &str, bind: BindValue) -> Result<Images> {
        let query = sqlx::query_as::<_, ImageRow>(sql);
        let query = match bind {
            BindValue::Codes(codes) => query.bind(codes),
            BindValue::Pattern(pattern) => query.bind(pattern),
        };
        let rows = query.fetch_all(&self.pool).await?;
        let images: Vec<String> = rows
            .into_iter()
            .filter_map(|row| row.image_base64)
            .filter(|img| !img.trim().is_empty())
            .collect();
        Ok(Arc::new(images))
    }
}

enum BindValue {
    Codes(Vec<String>),
    Pattern(String),
}

impl ImageStore for PgImageStore {
    async fn evaluation_images(&self, codes: &[String]) -> Result<Images> {
        let key = codes.join(",");
        self.evaluation_cache
            .get_or_try_fetch(&key, || async {
                let images = self
                    .fetch(EVALUATION_IMAGES_SQL, BindValue::Codes(codes.to_vec()))
                    .await?;
                tracing::debug!(codigos = %key, imagenes = images.len(), "imágenes de evaluación");
                Ok(images)
            })
            .await
    }

    async fn despacho_images(&self, fcl: &str) -> Result<Images> {
        let pattern = despacho_pattern(fcl);
        self.despacho_cache
            .get_or_try_fetch(&pattern, || async {
                let images = self
                    .fetch(DESPACHO_IMAGES_SQL, BindValue::Pattern(pattern.clone()))
                    .await?;
                tracing::debug!(fcl, imagenes = images.len(), "imágenes de despacho");
                Ok(images)
            })
            .await
    }
}

/// Configured image store; lookups never fail, they come back empty.
pub enum AnyImageStore {
    Postgres(PgImageStore),
    /// No `db` section configured
    Disabled,
}

impl AnyImageStore {
    pub fn from_config(config: &Config) -> Self {
        match config.database() {
            Ok(db) => AnyImageStore::Postgres(PgImageStore::new(db)),
            Err(e) => {
                tracing::warn!("sin base de datos de imágenes: {}", e);
                AnyImageStore::Disabled
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, AnyImageStore::Postgres(_))
    }

    pub async fn images_for_evaluation(&self, codes: &[String]) -> Images {
        let AnyImageStore::Postgres(store) = self else {
            return Images::default();
        };
        store.evaluation_images(codes).await.unwrap_or_else(|e| {
            tracing::warn!("no se pudieron leer las imágenes de {:?}: {}", codes, e);
            Images::default()
        })
    }

    pub async fn images_for_despacho(&self, fcl: &str) -> Images {
        let AnyImageStore::Postgres(store) = self else {
            return Images::default();
        };
        store.despacho_images(fcl).await.unwrap_or_else(|e| {
            tracing::warn!("no se pudieron leer las imágenes del despacho {}: {}", fcl, e);
            Images::default()
        })
    }
}
