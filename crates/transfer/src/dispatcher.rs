//! Message-Dispatcher – Routet Anfragen an die richtigen Handler
//!
//! Der Dispatcher dekodiert eingehende Text-Nachrichten, bestimmt den
//! Handler und gibt die Antwort zurueck. Jede Nachricht erhaelt genau eine
//! Antwort, auch wenn sie nicht dekodierbar war.

use skriptorium_protocol::{anfrage_dekodieren, Anfrage, Antwort};
use std::sync::Arc;

use crate::handlers::{class_handler, document_handler, key_handler};
use crate::server_state::{TransferSpeicher, TransferState};

/// Zentraler Message-Dispatcher
pub struct MessageDispatcher<S: TransferSpeicher> {
    state: Arc<TransferState<S>>,
}

impl<S: TransferSpeicher> MessageDispatcher<S> {
    /// Erstellt einen neuen Dispatcher
    pub fn neu(state: Arc<TransferState<S>>) -> Self {
        Self { state }
    }

    /// Dekodiert eine Text-Nachricht und verarbeitet sie
    pub async fn verarbeiten_text(&self, text: &str) -> Antwort {
        match anfrage_dekodieren(text) {
            Ok(anfrage) => self.dispatch(anfrage).await,
            Err(e) => {
                tracing::debug!(
                    aktion = %e.action,
                    code = ?e.code,
                    "Nachricht abgelehnt"
                );
                e.into_antwort()
            }
        }
    }

    /// Verarbeitet eine dekodierte Anfrage
    pub async fn dispatch(&self, anfrage: Anfrage) -> Antwort {
        tracing::debug!(aktion = anfrage.aktion(), "Aktion empfangen");

        match anfrage {
            // -------------------------------------------------------------------
            // Dokumente
            // -------------------------------------------------------------------
            Anfrage::UploadFile(req) => {
                document_handler::handle_upload_file(req, &self.state).await
            }
            Anfrage::GetFiles => document_handler::handle_get_files(&self.state).await,
            Anfrage::DownloadFile(req) => {
                document_handler::handle_download_file(req, &self.state).await
            }

            // -------------------------------------------------------------------
            // Schluessel
            // -------------------------------------------------------------------
            Anfrage::GetLecturerKeys => key_handler::handle_get_lecturer_keys(&self.state).await,
            Anfrage::GenerateLecturerKeys => {
                key_handler::handle_generate_lecturer_keys(&self.state).await
            }

            // -------------------------------------------------------------------
            // Klassen
            // -------------------------------------------------------------------
            Anfrage::GetClasses => class_handler::handle_get_classes(&self.state).await,
            Anfrage::AddClass(klasse) => class_handler::handle_add_class(klasse, &self.state).await,
        }
    }
}
