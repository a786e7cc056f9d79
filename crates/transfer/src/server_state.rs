//! Gemeinsamer Server-Zustand fuer den Transferdienst
//!
//! Haelt den Speicher und die Konfiguration als Arc-Referenzen, die sicher
//! zwischen den Verbindungs-Tasks geteilt werden koennen.

use skriptorium_store::{ClassRepository, DocumentRepository, KeyPairRepository};
use std::sync::Arc;
use std::time::Instant;

/// Standard-Obergrenze fuer eingehende Nachrichten (16 MiB)
pub const DEFAULT_MAX_NACHRICHT_BYTES: usize = 16 * 1024 * 1024;

/// Konfiguration fuer den Transferdienst
#[derive(Debug, Clone)]
pub struct TransferConfig {
    /// Maximale Groesse einer eingehenden WebSocket-Nachricht
    pub max_nachricht_bytes: usize,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            max_nachricht_bytes: DEFAULT_MAX_NACHRICHT_BYTES,
        }
    }
}

/// Alles, was der Transferdienst vom Speicher braucht
pub trait TransferSpeicher: DocumentRepository + ClassRepository + KeyPairRepository + 'static {}

impl<T> TransferSpeicher for T where T: DocumentRepository + ClassRepository + KeyPairRepository + 'static
{}

/// Gemeinsamer Server-Zustand (Arc-geteilt)
pub struct TransferState<S: TransferSpeicher> {
    pub config: Arc<TransferConfig>,
    /// Metadaten, Blobs, Klassen und aktives Schluesselpaar
    pub store: Arc<S>,
    /// Startzeitpunkt des Servers (fuer Uptime-Berechnung)
    pub start_time: Instant,
}

impl<S: TransferSpeicher> TransferState<S> {
    /// Erstellt einen neuen TransferState
    pub fn neu(config: TransferConfig, store: Arc<S>) -> Arc<Self> {
        Arc::new(Self {
            config: Arc::new(config),
            store,
            start_time: Instant::now(),
        })
    }

    /// Uptime in Sekunden
    pub fn uptime_sek(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
