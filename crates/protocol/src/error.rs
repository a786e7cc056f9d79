//! Fehler beim Dekodieren von Anfragen

use thiserror::Error;

use crate::control::{aktion, Antwort, ErrorCode};

/// Fehler, der direkt als Fehler-Antwort an den Client geht
///
/// `message` ist der fuer den Client bestimmte Text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code:?} ({action}): {message}")]
pub struct ProtocolError {
    pub action: String,
    pub code: ErrorCode,
    pub message: String,
}

impl ProtocolError {
    pub fn new(action: impl Into<String>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            code,
            message: message.into(),
        }
    }

    /// Unlesbares JSON oder kein Objekt
    pub fn ungueltiges_json() -> Self {
        Self::new(aktion::UNKNOWN, ErrorCode::MalformedMessage, "Invalid JSON format.")
    }

    pub fn fehlerhaft(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(action, ErrorCode::MalformedMessage, message)
    }

    pub fn ungueltige_aktion(action: impl Into<String>) -> Self {
        Self::new(action, ErrorCode::InvalidAction, "Invalid action.")
    }

    pub fn fehlendes_feld(action: impl Into<String>, feld: &str) -> Self {
        Self::new(
            action,
            ErrorCode::MissingField,
            format!("Missing required field: {feld}"),
        )
    }

    /// Wandelt den Fehler in eine Fehler-Antwort um
    pub fn into_antwort(self) -> Antwort {
        Antwort::fehler(self.action, self.code, self.message)
    }
}

impl From<ProtocolError> for Antwort {
    fn from(e: ProtocolError) -> Self {
        e.into_antwort()
    }
}
