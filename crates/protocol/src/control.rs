//! Control-Protokoll (JSON ueber WebSocket)
//!
//! Definiert alle Anfragen und Antworten des Transferprotokolls.
//!
//! ## Design
//! - Jede Anfrage ist in sich abgeschlossen, es gibt keine Sitzungen
//! - Jede Antwort traegt den Namen der ausloesenden Aktion (`action`),
//!   damit Clients asynchrone Antworten ohne Sequenznummern zuordnen koennen
//! - Feldnamen auf dem Draht in camelCase, kompatibel zum Browser-Client

use serde::Serialize;
use skriptorium_core::{ClassEntry, DocumentId, DocumentRecord, Signatur};

// ---------------------------------------------------------------------------
// Aktionsnamen
// ---------------------------------------------------------------------------

/// Aktionsnamen auf dem Draht
pub mod aktion {
    pub const UPLOAD_FILE: &str = "upload_file";
    pub const GET_FILES: &str = "get_files";
    pub const DOWNLOAD_FILE: &str = "download_file";
    pub const GET_LECTURER_KEYS: &str = "get_lecturer_keys";
    pub const GENERATE_LECTURER_KEYS: &str = "generate_lecturer_keys";
    pub const GET_CLASSES: &str = "get_classes";
    pub const ADD_CLASS: &str = "add_class";

    /// Antwort auf unlesbare Nachrichten
    pub const UNKNOWN: &str = "unknown";
    /// Antwort auf unerwartete Fehler waehrend der Verarbeitung
    pub const SERVER_ERROR: &str = "server_error";
}

// ---------------------------------------------------------------------------
// Fehler-Codes
// ---------------------------------------------------------------------------

/// Standardisierte Fehler-Codes fuer Error-Responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Nachricht nicht parsebar oder Feld mit falschem Typ
    MalformedMessage,
    /// Unbekannter Aktionsname
    InvalidAction,
    NotFound,
    DuplicateId,
    MissingField,
    /// Blob nicht lesbar oder Speicherfehler
    IoError,
    CryptoFailure,
    /// Unerwarteter Fehler waehrend der Verarbeitung
    Fatal,
}

// ---------------------------------------------------------------------------
// Anfragen
// ---------------------------------------------------------------------------

/// Upload eines Dokuments
///
/// `file_content` sind die verarbeiteten (ggf. vom Client verschluesselten)
/// Bytes, `original_file_content` die Original-Bytes fuer Signatur und Groesse.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub file_name: String,
    pub file_content: Vec<u8>,
    pub original_file_content: Vec<u8>,
    pub is_encrypted: bool,
    pub is_signed: bool,
    pub course: Option<String>,
    pub doc_type: Option<String>,
    pub description: String,
    pub uploader: String,
    pub file_type: String,
    /// Symmetrischer Schluessel des Clients (nur bei verschluesselten Dokumenten sinnvoll)
    pub aes_key_base64: Option<String>,
    /// Vom Client vorab berechnete Signatur
    pub signature: Option<Signatur>,
}

/// Download eines Dokuments nach ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub file_id: DocumentId,
}

/// Neue Klasse im Katalog
pub type AddClassRequest = ClassEntry;

/// Dekodierte Anfrage eines Clients
#[derive(Debug, Clone, PartialEq)]
pub enum Anfrage {
    UploadFile(UploadRequest),
    GetFiles,
    DownloadFile(DownloadRequest),
    GetLecturerKeys,
    GenerateLecturerKeys,
    GetClasses,
    AddClass(AddClassRequest),
}

impl Anfrage {
    /// Aktionsname der Anfrage
    pub fn aktion(&self) -> &'static str {
        match self {
            Self::UploadFile(_) => aktion::UPLOAD_FILE,
            Self::GetFiles => aktion::GET_FILES,
            Self::DownloadFile(_) => aktion::DOWNLOAD_FILE,
            Self::GetLecturerKeys => aktion::GET_LECTURER_KEYS,
            Self::GenerateLecturerKeys => aktion::GENERATE_LECTURER_KEYS,
            Self::GetClasses => aktion::GET_CLASSES,
            Self::AddClass(_) => aktion::ADD_CLASS,
        }
    }
}

// ---------------------------------------------------------------------------
// Redigierte Dokument-Ansicht
// ---------------------------------------------------------------------------

/// Externe Sicht auf einen Dokument-Datensatz
///
/// Enthaelt weder den Blob-Verweis (`filePath`) noch den symmetrischen
/// Schluessel (`aesKeyBase64`). Die Felder existieren hier gar nicht, damit
/// sie nicht versehentlich serialisiert werden koennen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentView {
    pub id: DocumentId,
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub course: Option<String>,
    pub doc_type: Option<String>,
    pub description: String,
    pub upload_date: String,
    pub uploader: String,
    pub is_encrypted: bool,
    pub is_signed: bool,
    pub signature: Option<Signatur>,
    pub lecturer_public_key: Option<String>,
}

impl From<&DocumentRecord> for DocumentView {
    fn from(r: &DocumentRecord) -> Self {
        Self {
            id: r.id.clone(),
            name: r.name.clone(),
            size: r.size,
            mime_type: r.mime_type.clone(),
            course: r.course.clone(),
            doc_type: r.doc_type.clone(),
            description: r.description.clone(),
            upload_date: r.upload_date.clone(),
            uploader: r.uploader.clone(),
            is_encrypted: r.is_encrypted,
            is_signed: r.is_signed,
            signature: r.signature.clone(),
            lecturer_public_key: r.lecturer_public_key.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Antworten
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Antwort-Umschlag: `{ "status", "action", ...payload }`
#[derive(Debug, Clone, Serialize)]
pub struct Antwort {
    pub status: Status,
    pub action: String,
    #[serde(flatten)]
    pub inhalt: AntwortInhalt,
}

/// Payload einer Antwort (flach in den Umschlag eingebettet)
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AntwortInhalt {
    Upload(UploadResponse),
    Dateien(FileListResponse),
    Download(DownloadResponse),
    Schluessel(KeyPairResponse),
    Klassen(ClassListResponse),
    Meldung(MessageResponse),
    Fehler(ErrorResponse),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub file_id: DocumentId,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileListResponse {
    pub files: Vec<DocumentView>,
}

/// Dokument-Inhalt plus alles, was der Client zum Pruefen und Entschluesseln braucht
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResponse {
    pub file_name: String,
    pub file_type: String,
    /// Gespeicherte Bytes (Standard-Base64), ggf. Chiffretext
    pub file_content: String,
    pub is_encrypted: bool,
    pub is_signed: bool,
    pub signature: Option<Signatur>,
    pub lecturer_public_key: Option<String>,
    /// Nur bei verschluesselten Dokumenten gesetzt
    pub aes_key_base64: Option<String>,
}

/// Aktives Schluesselpaar (der private Schluessel geht absichtlich mit, siehe DESIGN.md)
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPairResponse {
    pub public_key: Option<String>,
    pub private_key: Option<String>,
}

impl std::fmt::Debug for KeyPairResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPairResponse")
            .field("public_key", &self.public_key.as_ref().map(|_| "[PEM]"))
            .field("private_key", &self.private_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassListResponse {
    pub classes: Vec<ClassEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: ErrorCode,
}

impl Antwort {
    /// Erfolgs-Antwort fuer eine Aktion
    pub fn erfolg(action: impl Into<String>, inhalt: AntwortInhalt) -> Self {
        Self {
            status: Status::Success,
            action: action.into(),
            inhalt,
        }
    }

    /// Fehler-Antwort fuer eine Aktion
    pub fn fehler(action: impl Into<String>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            action: action.into(),
            inhalt: AntwortInhalt::Fehler(ErrorResponse {
                message: message.into(),
                code,
            }),
        }
    }

    pub fn ist_erfolg(&self) -> bool {
        self.status == Status::Success
    }

    /// Fehler-Code, falls es eine Fehler-Antwort ist
    pub fn fehler_code(&self) -> Option<ErrorCode> {
        match &self.inhalt {
            AntwortInhalt::Fehler(e) => Some(e.code),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
