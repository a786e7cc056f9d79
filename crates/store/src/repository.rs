//! Repository-Traits: der Vertrag zwischen Transfer-Handlern und Persistenz
//!
//! Alle Mutationen sind serialisiert und werden vor der Rueckkehr dauerhaft
//! gespeichert. Lesende Operationen sehen nie einen halb geschriebenen Zustand.

use skriptorium_core::{ActiveKeyPair, ClassEntry, DocumentId, DocumentRecord, NewDocument};

use crate::error::StoreResult;

/// Dokument-Datensaetze und ihre Blobs
#[allow(async_fn_in_trait)]
pub trait DocumentRepository: Send + Sync {
    /// Vergibt eine neue ID, speichert den Blob und haengt den Datensatz an
    ///
    /// Schlaegt das Persistieren fehl, bleibt der Speicher unveraendert.
    async fn append_document(&self, neu: NewDocument, inhalt: &[u8]) -> StoreResult<DocumentRecord>;

    /// Alle Datensaetze in Einfuegereihenfolge
    async fn list_documents(&self) -> StoreResult<Vec<DocumentRecord>>;

    /// Datensatz nach ID; `StoreError::NichtGefunden` wenn unbekannt
    async fn get_document(&self, id: &DocumentId) -> StoreResult<DocumentRecord>;

    /// Gespeicherte Bytes zum Blob-Verweis eines Datensatzes
    async fn read_blob(&self, file_path: &str) -> StoreResult<Vec<u8>>;
}

/// Kurs-/Klassen-Katalog
#[allow(async_fn_in_trait)]
pub trait ClassRepository: Send + Sync {
    async fn list_classes(&self) -> StoreResult<Vec<ClassEntry>>;

    /// Fuegt eine Klasse hinzu; `StoreError::Duplikat` bei vorhandener ID
    async fn add_class(&self, klasse: ClassEntry) -> StoreResult<()>;
}

/// Aktives Signatur-Schluesselpaar
#[allow(async_fn_in_trait)]
pub trait KeyPairRepository: Send + Sync {
    async fn load_active_key_pair(&self) -> StoreResult<ActiveKeyPair>;

    /// Ersetzt das aktive Paar (Schluesseldateien und JSON)
    async fn save_active_key_pair(&self, public_pem: &str, private_pem: &str) -> StoreResult<()>;
}
