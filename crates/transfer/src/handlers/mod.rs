//! Handler fuer alle Aktionen des Transferprotokolls
//!
//! Jeder Handler ist fuer eine Gruppe von Aktionen zustaendig, hat Zugriff
//! auf den gemeinsamen `TransferState` und liefert immer eine vollstaendige
//! Antwort (Erfolg oder Fehler), nie einen Fehler an den Aufrufer.

pub mod class_handler;
pub mod document_handler;
pub mod key_handler;

use skriptorium_protocol::Antwort;

use crate::error::TransferError;

/// Fehler-Antwort mit dem zum Fehler passenden Code
pub(crate) fn fehler_antwort(
    action: &str,
    fehler: impl Into<TransferError>,
    message: impl Into<String>,
) -> Antwort {
    let fehler = fehler.into();
    tracing::warn!(aktion = action, fehler = %fehler, "Aktion fehlgeschlagen");
    Antwort::fehler(action, fehler.code(), message)
}
