//! Fehlertypen fuer den Transferdienst

use skriptorium_crypto::CryptoError;
use skriptorium_protocol::{ErrorCode, ProtocolError};
use skriptorium_store::StoreError;
use thiserror::Error;

/// Fehlertyp fuer den Transferdienst
#[derive(Debug, Error)]
pub enum TransferError {
    /// IO-Fehler (Socket, Bind)
    #[error("IO-Fehler: {0}")]
    Io(#[from] std::io::Error),

    /// WebSocket-Fehler (Handshake, Frame)
    #[error("WebSocket-Fehler: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Nachricht nicht dekodierbar
    #[error("Protokollfehler: {0}")]
    Protokoll(#[from] ProtocolError),

    /// Speicherfehler (Metadaten, Blob, Schluesseldateien)
    #[error("Speicherfehler: {0}")]
    Speicher(#[from] StoreError),

    /// Signatur- oder Schluesselfehler
    #[error("Kryptografiefehler: {0}")]
    Krypto(#[from] CryptoError),

    /// Hintergrund-Task abgebrochen oder in Panik
    #[error("Hintergrund-Task fehlgeschlagen: {0}")]
    Hintergrund(String),
}

impl TransferError {
    /// Fehler-Code fuer die Antwort an den Client
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Protokoll(e) => e.code,
            Self::Speicher(StoreError::NichtGefunden(_)) => ErrorCode::NotFound,
            Self::Speicher(StoreError::Duplikat(_)) => ErrorCode::DuplicateId,
            Self::Speicher(_) | Self::Io(_) | Self::WebSocket(_) => ErrorCode::IoError,
            Self::Krypto(_) => ErrorCode::CryptoFailure,
            Self::Hintergrund(_) => ErrorCode::Fatal,
        }
    }
}

impl From<tokio::task::JoinError> for TransferError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Hintergrund(e.to_string())
    }
}

/// Result-Typ fuer den Transferdienst
pub type TransferResult<T> = Result<T, TransferError>;
