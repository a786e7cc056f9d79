//! skriptorium-transfer – WebSocket-Transferdienst
//!
//! Dieses Crate implementiert den Dokument-Transferdienst: Verbindungen
//! annehmen, Nachrichten dekodieren, an die Handler verteilen und Antworten
//! auf derselben Verbindung zurueckschicken.
//!
//! ## Architektur
//!
//! ```text
//! WebSocket Listener (TransferServer)
//!     |
//!     v
//! ClientConnection (pro Verbindung ein lokaler Task)
//!     |  Empfangsschleife: Text/Binaer -> Antwort, Panik -> server_error
//!     |
//!     v
//! MessageDispatcher
//!     |
//!     +-- DocumentHandler (upload_file, get_files, download_file)
//!     +-- KeyHandler      (get_lecturer_keys, generate_lecturer_keys)
//!     +-- ClassHandler    (get_classes, add_class)
//! ```
//!
//! Der einzige geteilte Zustand ist der Speicher im `TransferState`.

pub mod connection;
pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod server_state;
pub mod ws;

#[cfg(test)]
mod tests;

// Bequeme Re-Exporte
pub use connection::ClientConnection;
pub use dispatcher::MessageDispatcher;
pub use error::{TransferError, TransferResult};
pub use server_state::{TransferConfig, TransferSpeicher, TransferState};
pub use ws::TransferServer;
