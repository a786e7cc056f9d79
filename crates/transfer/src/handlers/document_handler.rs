//! Dokument-Handler – Upload, Liste, Download
//!
//! Der Server signiert beim Upload selbst, sobald ein privater Schluessel
//! aktiv ist; eine vom Client mitgeschickte Signatur wird nur verwendet,
//! wenn kein privater Schluessel vorhanden ist. Ver- und Entschluesselung
//! finden ausschliesslich beim Client statt, der Server speichert die
//! gelieferten Bytes unveraendert.

use base64::{engine::general_purpose::STANDARD as B64, Engine};
use skriptorium_core::{NewDocument, Signatur};
use skriptorium_protocol::control::{
    aktion, AntwortInhalt, DocumentView, DownloadRequest, DownloadResponse, FileListResponse,
    UploadRequest, UploadResponse,
};
use skriptorium_protocol::{Antwort, ErrorCode};
use skriptorium_store::StoreError;
use std::sync::Arc;

use crate::error::TransferResult;
use crate::handlers::fehler_antwort;
use crate::server_state::{TransferSpeicher, TransferState};

/// Verarbeitet einen Upload
pub async fn handle_upload_file<S: TransferSpeicher>(
    request: UploadRequest,
    state: &Arc<TransferState<S>>,
) -> Antwort {
    const A: &str = aktion::UPLOAD_FILE;

    // Ein Schnappschuss: Signatur und oeffentlicher Schluessel gehoeren zusammen
    let schluessel = match state.store.load_active_key_pair().await {
        Ok(paar) => paar,
        Err(e) => return fehler_antwort(A, e, "Error reading lecturer keys."),
    };

    let UploadRequest {
        file_name,
        file_content,
        original_file_content,
        is_encrypted,
        is_signed,
        course,
        doc_type,
        description,
        uploader,
        file_type,
        aes_key_base64,
        signature: client_signatur,
    } = request;

    let size = original_file_content.len() as u64;

    let signature = if !is_signed {
        None
    } else if let Some(private_pem) = schluessel.private {
        match signieren(private_pem, original_file_content).await {
            Ok(sig) => {
                tracing::debug!(datei = %file_name, "Dokument serverseitig signiert");
                Some(sig)
            }
            Err(e) => return fehler_antwort(A, e, "Error signing file."),
        }
    } else {
        tracing::warn!(
            datei = %file_name,
            client_signatur = client_signatur.is_some(),
            "Kein privater Schluessel aktiv, verwende Client-Signatur"
        );
        client_signatur
    };

    let neu = NewDocument {
        name: file_name,
        size,
        mime_type: file_type,
        course,
        doc_type,
        description,
        uploader,
        is_encrypted,
        is_signed,
        signature,
        lecturer_public_key: schluessel.public,
        aes_key_base64: aes_key_base64.filter(|_| is_encrypted),
    };

    match state.store.append_document(neu, &file_content).await {
        Ok(record) => Antwort::erfolg(
            A,
            AntwortInhalt::Upload(UploadResponse {
                message: format!("File '{}' uploaded successfully!", record.name),
                file_id: record.id,
            }),
        ),
        Err(e) => {
            let message = format!("Error saving file: {e}");
            fehler_antwort(A, e, message)
        }
    }
}

/// Signiert auf dem Blocking-Pool, damit die Verbindungs-Tasks nicht stehen
async fn signieren(private_pem: String, daten: Vec<u8>) -> TransferResult<Signatur> {
    let sig = tokio::task::spawn_blocking(move || skriptorium_crypto::sign(&private_pem, &daten))
        .await??;
    Ok(sig)
}

/// Liefert die redigierte Liste aller Dokumente
pub async fn handle_get_files<S: TransferSpeicher>(state: &Arc<TransferState<S>>) -> Antwort {
    match state.store.list_documents().await {
        Ok(records) => Antwort::erfolg(
            aktion::GET_FILES,
            AntwortInhalt::Dateien(FileListResponse {
                files: records.iter().map(DocumentView::from).collect(),
            }),
        ),
        Err(e) => {
            let message = format!("Error reading metadata: {e}");
            fehler_antwort(aktion::GET_FILES, e, message)
        }
    }
}

/// Liefert Inhalt und Pruefmaterial eines Dokuments
///
/// Unbekannte ID ergibt `NOT_FOUND`, ein fehlender oder unlesbarer Blob
/// dagegen `IO_ERROR`.
pub async fn handle_download_file<S: TransferSpeicher>(
    request: DownloadRequest,
    state: &Arc<TransferState<S>>,
) -> Antwort {
    const A: &str = aktion::DOWNLOAD_FILE;

    let record = match state.store.get_document(&request.file_id).await {
        Ok(r) => r,
        Err(e @ StoreError::NichtGefunden(_)) => {
            return fehler_antwort(A, e, "File not found in metadata.");
        }
        Err(e) => {
            let message = format!("Error reading metadata: {e}");
            return fehler_antwort(A, e, message);
        }
    };

    let inhalt = match state.store.read_blob(&record.file_path).await {
        Ok(bytes) => bytes,
        Err(StoreError::NichtGefunden(pfad)) => {
            tracing::warn!(id = %record.id, pfad = %pfad, "Blob fehlt");
            return Antwort::fehler(A, ErrorCode::IoError, "File not found on server.");
        }
        Err(e) => {
            let message = format!("Error reading file: {e}");
            return fehler_antwort(A, e, message);
        }
    };

    tracing::info!(id = %record.id, name = %record.name, bytes = inhalt.len(), "Dokument gesendet");

    let aes_key_base64 = if record.is_encrypted {
        record.aes_key_base64
    } else {
        None
    };

    Antwort::erfolg(
        A,
        AntwortInhalt::Download(DownloadResponse {
            file_name: record.name,
            file_type: record.mime_type,
            file_content: B64.encode(&inhalt),
            is_encrypted: record.is_encrypted,
            is_signed: record.is_signed,
            signature: record.signature,
            lecturer_public_key: record.lecturer_public_key,
            aes_key_base64,
        }),
    )
}
