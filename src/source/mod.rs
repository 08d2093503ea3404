//! Workbook sources
//!
//! Every upstream workbook is described once in the catalog below. A
//! [`WorkbookSource`] turns a catalog entry into the file bytes, either
//! through Microsoft Graph or from a local directory.

pub mod graph;
pub mod local;

pub use graph::GraphSource;
pub use local::LocalSource;

use crate::config::{Config, Tenant};
use crate::error::Result;
use crate::sheet::Sheet;
use std::sync::Arc;

/// A workbook in a shared OneDrive folder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceFile {
    pub tenant: Tenant,
    pub drive_id: &'static str,
    /// Folder item whose children are listed
    pub folder_id: &'static str,
    pub file_name: &'static str,
}

/// A sheet inside a catalog workbook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetSpec {
    pub file: SourceFile,
    pub sheet: &'static str,
    /// Rows above the header
    pub skip_rows: usize,
}

pub const EVALUATION_FILE: SourceFile = SourceFile {
    tenant: Tenant::Graph,
    drive_id: "b!k0xKW2h1VkGnxasDN0z40PeA8yi0BwBKgEf_EOEPStmAWVEVjX8MQIydW1yMzk1b",
    folder_id: "01SPKVU4I6RWNBBAVFIJF3GHBOYOFMUKZS",
    file_name: "BD EVALUACION DE CALIDAD DE PRODUCTO TERMINADO.xlsx",
};

pub const PROGRAMACION_FILE: SourceFile = SourceFile {
    tenant: Tenant::GraphAlza,
    drive_id: "b!VQYmeHVjYEWz0GKghOyC7vEXg4ECVBhNtIUi_0GrC_YtxGLZYwDkTIeZ8M0lJvFk",
    folder_id: "01YFYVLBY2AXGEFA43KBCLDKFUHBDMF2OP",
    file_name: "PROGRAMACION.xlsx",
};

pub const MASTER_LIST_FILE: SourceFile = SourceFile {
    tenant: Tenant::Graph,
    drive_id: "b!oArJxyQJjk2YBRLaxF9M6-wEuCX8zKZAl30NL3kNPhUNCKEYLTZmTYa0i4oZ1qxK",
    folder_id: "01OAW3XC5MKUBY6XFXQVDLAQAM6OHH5C5Z",
    file_name: "LISTA MAESTRA DE DESPACHOS 2025.xlsx",
};

pub const EVALUATION_SHEET: SheetSpec = SheetSpec {
    file: EVALUATION_FILE,
    sheet: "CALIDAD PRODUCTO TERMINADO",
    skip_rows: 0,
};

pub const AIR_SHEET: SheetSpec = SheetSpec {
    file: PROGRAMACION_FILE,
    sheet: "PROGRAMA ALZA PACKING AEREO",
    skip_rows: 1,
};

pub const SEA_SHEET: SheetSpec = SheetSpec {
    file: PROGRAMACION_FILE,
    sheet: "PROGRAMA ALZA PACKING MARITIMO",
    skip_rows: 1,
};

pub const MASTER_SHEET: SheetSpec = SheetSpec {
    file: MASTER_LIST_FILE,
    sheet: "CONTROL DE DESPACHOS",
    skip_rows: 4,
};

/// Produces the bytes of a catalog workbook.
#[allow(async_fn_in_trait)]
pub trait WorkbookSource {
    async fn fetch(&self, file: &SourceFile) -> Result<Arc<Vec<u8>>>;

    /// Fetches the workbook and reads one sheet out of it.
    async fn read_sheet(&self, spec: &SheetSpec) -> Result<Sheet> {
        let bytes = self.fetch(&spec.file).await?;
        let sheet = Sheet::from_workbook_bytes(&bytes, spec.sheet, spec.skip_rows)?;
        tracing::debug!(sheet = spec.sheet, rows = sheet.len(), "hoja leída");
        Ok(sheet)
    }
}

/// Source chosen from configuration
pub enum AnySource {
    Graph(GraphSource),
    Local(LocalSource),
}

impl AnySource {
    /// `local_dir` wins over Graph credentials.
    pub fn from_config(config: &Config) -> Result<Self> {
        match &config.local_dir {
            Some(dir) => {
                tracing::info!(dir = %dir.display(), "leyendo libros desde directorio local");
                Ok(AnySource::Local(LocalSource::new(dir)))
            }
            None => Ok(AnySource::Graph(GraphSource::new(config)?)),
        }
    }
}

impl WorkbookSource for AnySource {
    async fn fetch(&self, file: &SourceFile) -> Result<Arc<Vec<u8>>> {
        match self {
            AnySource::Graph(source) => source.fetch(file).await,
            AnySource::Local(source) => source.fetch(file).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_tenants() {
        assert_eq!(AIR_SHEET.file.tenant, Tenant::GraphAlza);
        assert_eq!(SEA_SHEET.file, AIR_SHEET.file);
        assert_eq!(MASTER_SHEET.file.tenant, Tenant::Graph);
        assert_eq!(EVALUATION_SHEET.file.tenant, Tenant::Graph);
    }

    #[test]
    fn test_catalog_skip_rows() {
        assert_eq!(AIR_SHEET.skip_rows, 1);
        assert_eq!(SEA_SHEET.skip_rows, 1);
        assert_eq!(MASTER_SHEET.skip_rows, 4);
        assert_eq!(EVALUATION_SHEET.skip_rows, 0);
    }

    #[test]
    fn test_local_dir_selects_local_source() {
        let config = Config {
            local_dir: Some(std::env::temp_dir()),
            ..Default::default()
        };
        assert!(matches!(AnySource::from_config(&config), Ok(AnySource::Local(_))));
    }

    #[test]
    fn test_graph_source_builds_without_credentials() {
        // credentials are checked on first fetch, per tenant
        assert!(matches!(
            AnySource::from_config(&Config::default()),
            Ok(AnySource::Graph(_))
        ));
    }
}
