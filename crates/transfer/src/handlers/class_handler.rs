//! Klassen-Handler – Katalog lesen und erweitern

use skriptorium_core::ClassEntry;
use skriptorium_protocol::control::{aktion, AntwortInhalt, ClassListResponse, MessageResponse};
use skriptorium_protocol::{Antwort, ErrorCode};
use skriptorium_store::StoreError;
use std::sync::Arc;

use crate::handlers::fehler_antwort;
use crate::server_state::{TransferSpeicher, TransferState};

/// Liefert den Klassen-Katalog
pub async fn handle_get_classes<S: TransferSpeicher>(state: &Arc<TransferState<S>>) -> Antwort {
    match state.store.list_classes().await {
        Ok(classes) => Antwort::erfolg(
            aktion::GET_CLASSES,
            AntwortInhalt::Klassen(ClassListResponse { classes }),
        ),
        Err(e) => {
            let message = format!("Error reading classes: {e}");
            fehler_antwort(aktion::GET_CLASSES, e, message)
        }
    }
}

/// Fuegt eine Klasse hinzu; doppelte IDs werden abgelehnt
pub async fn handle_add_class<S: TransferSpeicher>(
    klasse: ClassEntry,
    state: &Arc<TransferState<S>>,
) -> Antwort {
    const A: &str = aktion::ADD_CLASS;
    let name = klasse.name.clone();

    match state.store.add_class(klasse).await {
        Ok(()) => Antwort::erfolg(
            A,
            AntwortInhalt::Meldung(MessageResponse {
                message: format!("Class '{name}' added successfully!"),
            }),
        ),
        Err(StoreError::Duplikat(id)) => {
            let message = format!("Class with ID '{id}' already exists.");
            fehler_antwort(A, StoreError::Duplikat(id), message)
        }
        Err(StoreError::UngueltigeDaten(grund)) => {
            tracing::warn!(grund = %grund, "Klasse unvollstaendig");
            Antwort::fehler(A, ErrorCode::MissingField, "Class ID and Name are required.")
        }
        Err(e) => {
            let message = format!("Error saving class: {e}");
            fehler_antwort(A, e, message)
        }
    }
}
