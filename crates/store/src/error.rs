//! Fehlertypen fuer das Speicher-Crate

use thiserror::Error;

/// Speicher-Fehlertypen
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Nicht gefunden: {0}")]
    NichtGefunden(String),

    #[error("Existiert bereits: {0}")]
    Duplikat(String),

    #[error("Ungueltige Daten: {0}")]
    UngueltigeDaten(String),

    #[error("IO-Fehler: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON-Fehler: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub fn nicht_gefunden(msg: impl Into<String>) -> Self {
        Self::NichtGefunden(msg.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
