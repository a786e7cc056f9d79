//! skriptorium-store – Metadaten- und Blob-Speicher
//!
//! Dieses Crate implementiert:
//! - `DocumentRepository`, `ClassRepository`, `KeyPairRepository`: der schmale
//!   Vertrag, ueber den der Transfer-Handler auf Persistenz zugreift
//! - `JsonStore`: JSON-Datei auf der Platte mit Load-Merge-Save-Semantik
//! - `StorageBackend`-Trait + `DiskStorage`: Blob-Bytes pro Dokument
//! - `KeyFiles`: zwei PEM-Dateien fuer das aktive Schluesselpaar
//!
//! # Beispiel
//!
//! ```no_run
//! use skriptorium_store::{JsonStore, SpeicherPfade, DocumentRepository};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = JsonStore::oeffnen(SpeicherPfade::new("files", "keys", "server_data.json"))
//!         .await
//!         .unwrap();
//!     let dokumente = store.list_documents().await.unwrap();
//!     println!("{} Dokumente", dokumente.len());
//! }
//! ```

mod datei;
pub mod blob;
pub mod error;
pub mod ids;
pub mod json_store;
pub mod keyfiles;
pub mod repository;

#[cfg(test)]
mod tests;

// Bequeme Re-Exporte
pub use blob::{DiskStorage, StorageBackend};
pub use error::{StoreError, StoreResult};
pub use ids::IdGenerator;
pub use json_store::{standard_klassen, JsonStore, ServerDaten, SpeicherPfade};
pub use keyfiles::{KeyFiles, PRIVATE_KEY_FILE, PUBLIC_KEY_FILE};
pub use repository::{ClassRepository, DocumentRepository, KeyPairRepository};
