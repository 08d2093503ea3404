use clap::{Parser, Subcommand, ValueEnum};
use fcl_quality_common::{Page, ReportKind};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fcl-quality")]
#[command(about = "Control de calidad de producto terminado y despachos por FCL", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log detallado
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Archivo de configuración YAML
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lista los FCL más recientes o los buscados
    List {
        /// Vista de despachos en lugar de producto terminado
        #[arg(short, long)]
        despacho: bool,

        /// FCL a buscar (se normalizan antes de comparar)
        #[arg(short, long, value_delimiter = ',')]
        search: Vec<String>,

        /// Salida JSON
        #[arg(long)]
        json: bool,
    },

    /// Muestra el detalle de un FCL
    Show {
        #[arg(required = true)]
        fcl: String,

        /// Vista (quality/despacho)
        #[arg(short, long, value_enum, default_value_t = KindArg::Quality)]
        kind: KindArg,

        /// Salida JSON
        #[arg(long)]
        json: bool,
    },

    /// Genera el informe PDF de un FCL
    Report {
        #[arg(required = true)]
        fcl: String,

        /// Tipo de informe (quality/despacho)
        #[arg(short, long, value_enum, default_value_t = KindArg::Quality)]
        kind: KindArg,

        /// Filas de detalle a incluir, empezando en 1 (por defecto todas)
        #[arg(short, long, value_delimiter = ',')]
        rows: Vec<usize>,

        /// Archivo o directorio de salida
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Agrega una página por registro de evaluación
        #[arg(long)]
        detail_pages: bool,
    },

    /// Exporta las evaluaciones de un FCL a Excel
    Export {
        #[arg(required = true)]
        fcl: String,

        /// Archivo o directorio de salida
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Cruza despachos con la lista maestra y las evaluaciones
    Reconcile {
        /// Salida JSON
        #[arg(long)]
        json: bool,

        /// Muestra cada código corregido
        #[arg(long)]
        corrections: bool,
    },

    /// Normaliza códigos FCL
    Normalize {
        #[arg(required = true)]
        codes: Vec<String>,
    },

    /// Navegación interactiva lista/detalle
    Browse {
        /// Empieza en la vista de despachos
        #[arg(short, long)]
        despacho: bool,
    },

    /// Levanta la API JSON
    Serve {
        /// Dirección de escucha
        #[arg(short, long, default_value = "127.0.0.1:8080")]
        bind: String,
    },

    /// Muestra la configuración
    Config {
        /// Muestra la configuración resuelta (secretos ocultos)
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    #[default]
    Quality,
    Despacho,
}

impl From<KindArg> for ReportKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Quality => ReportKind::Quality,
            KindArg::Despacho => ReportKind::Despacho,
        }
    }
}

/// Page a `--despacho` flag selects.
pub fn page_for(despacho: bool) -> Page {
    if despacho {
        Page::Despacho
    } else {
        Page::ProductoTerminado
    }
}
