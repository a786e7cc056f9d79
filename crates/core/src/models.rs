//! Domaenenmodelle: Dokument-Datensatz, Klassen-Katalog, aktives Schluesselpaar
//!
//! Die serde-Feldnamen entsprechen dem persistierten JSON-Layout
//! (`server_data.json`), damit bestehende Datenbestaende weiter lesbar sind.

use serde::{Deserialize, Serialize};

use crate::types::{DocumentId, Signatur};

/// Persistierter Datensatz eines hochgeladenen Dokuments
///
/// Wird einmal beim Upload angelegt und danach nur noch gelesen.
/// `file_path` und `aes_key_base64` sind speicherinterne Felder und duerfen
/// nur ueber `download_file` (Schluessel, wenn verschluesselt) nach aussen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub id: DocumentId,
    pub name: String,
    /// Groesse der Original-Bytes (vor einer eventuellen Verschluesselung)
    pub size: u64,
    /// Opaker Verweis auf den Blob im Dateispeicher
    pub file_path: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub description: String,
    pub upload_date: String,
    pub uploader: String,
    pub is_encrypted: bool,
    pub is_signed: bool,
    #[serde(default)]
    pub signature: Option<Signatur>,
    /// Oeffentlicher Schluessel zum Upload-Zeitpunkt (Snapshot, kein Verweis)
    #[serde(default)]
    pub lecturer_public_key: Option<String>,
    /// Symmetrischer Schluessel (nur Demo-Verwahrung, siehe DESIGN.md)
    #[serde(default)]
    pub aes_key_base64: Option<String>,
}

/// Eingabe fuer einen neuen Dokument-Datensatz
///
/// ID, Blob-Verweis und Upload-Zeitpunkt vergibt der Speicher.
#[derive(Debug, Clone, Default)]
pub struct NewDocument {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub course: Option<String>,
    pub doc_type: Option<String>,
    pub description: String,
    pub uploader: String,
    pub is_encrypted: bool,
    pub is_signed: bool,
    pub signature: Option<Signatur>,
    pub lecturer_public_key: Option<String>,
    pub aes_key_base64: Option<String>,
}

/// Eintrag im Kurs-/Klassen-Katalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntry {
    pub id: String,
    pub name: String,
}

impl ClassEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Aktives Signatur-Schluesselpaar des Servers (PEM-kodiert)
///
/// Beide Haelften koennen fehlen (erster Start ohne Schluesseldateien).
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveKeyPair {
    pub public: Option<String>,
    pub private: Option<String>,
}

impl ActiveKeyPair {
    /// Gibt true zurueck wenn beide Haelften vorhanden sind
    pub fn ist_vollstaendig(&self) -> bool {
        self.public.is_some() && self.private.is_some()
    }
}

impl std::fmt::Debug for ActiveKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveKeyPair")
            .field("public", &self.public.as_ref().map(|_| "[PEM]"))
            .field("private", &self.private.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
