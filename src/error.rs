use thiserror::Error;

#[derive(Error, Debug)]
pub enum QcError {
    #[error("No encontrado: {0}")]
    NotFound(String),

    #[error("Error de autenticación: {0}")]
    Auth(String),

    #[error("Datos con formato inválido: {0}")]
    MalformedData(String),

    #[error("Error de configuración: {0}")]
    Config(String),

    #[error("Error HTTP: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Error de base de datos: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Error de E/S: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error de YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Error de JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Error leyendo Excel: {0}")]
    ExcelRead(#[from] calamine::Error),

    #[error("Error generando PDF: {0}")]
    PdfGeneration(String),

    #[error("Error generando Excel: {0}")]
    ExcelGeneration(String),

    #[error("Error interactivo: {0}")]
    Interactive(String),

    #[error(transparent)]
    Common(#[from] fcl_quality_common::Error),
}

impl From<rust_xlsxwriter::XlsxError> for QcError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        QcError::ExcelGeneration(e.to_string())
    }
}

impl From<dialoguer::Error> for QcError {
    fn from(e: dialoguer::Error) -> Self {
        QcError::Interactive(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, QcError>;
