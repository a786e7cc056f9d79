//! skriptorium-core – Gemeinsame Domaenentypen
//!
//! Dieses Crate stellt die Typen bereit, die vom Krypto-, Speicher-,
//! Protokoll- und Transfer-Crate gemeinsam genutzt werden.

pub mod models;
pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use models::{ActiveKeyPair, ClassEntry, DocumentRecord, NewDocument};
pub use types::{DocumentId, Signatur};
