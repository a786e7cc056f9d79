//! Fehlertypen fuer das Kryptografie-Subsystem

use thiserror::Error;

/// Fehler im Kryptografie-Subsystem
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Schluessel-Generierung fehlgeschlagen: {0}")]
    SchluesselGenerierung(String),

    #[error("Ungueltiger Schluessel: {0}")]
    UngueltigerSchluessel(String),

    #[error("Signierung fehlgeschlagen: {0}")]
    Signierung(String),

    #[error("Verschluesselung fehlgeschlagen: {0}")]
    Verschluesselung(String),

    /// Integritaets-Tag ungueltig, Token beschaedigt oder falscher Schluessel
    #[error("Entschluesselung fehlgeschlagen: {0}")]
    Entschluesselung(String),

    #[error("Ungueltige Schluessel-Laenge: erwartet {erwartet}, erhalten {erhalten}")]
    UngueltigeSchluesselLaenge { erwartet: usize, erhalten: usize },
}

impl CryptoError {
    /// Gibt true zurueck wenn der Fehler beim Entschluesseln auftrat
    pub fn ist_entschluesselung(&self) -> bool {
        matches!(self, Self::Entschluesselung(_))
    }
}

pub type CryptoResult<T> = Result<T, CryptoError>;
