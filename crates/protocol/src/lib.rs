//! skriptorium-protocol – Transferprotokoll-Definitionen
//!
//! Dieses Crate definiert alle Anfragen und Antworten, die zwischen Client
//! und Server ueber die WebSocket-Verbindung ausgetauscht werden, sowie das
//! Dekodieren des JSON-Umschlags `{ "action": ..., "data": {...} }`.

pub mod control;
pub mod error;
pub mod wire;

pub use control::{
    aktion, AddClassRequest, Anfrage, Antwort, AntwortInhalt, DocumentView, DownloadRequest,
    ErrorCode, Status, UploadRequest,
};
pub use error::ProtocolError;
pub use wire::{anfrage_dekodieren, antwort_kodieren};
