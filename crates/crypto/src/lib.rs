//! # skriptorium-crypto
//!
//! Krypto-Engine fuer den Dokumentenaustausch.
//!
//! ## Module
//! - `signing` - RSA-2048 Schluesselpaare, PSS-Signaturen (SHA-256) ueber die Original-Bytes
//! - `symmetric` - Versionierte AES-256-GCM-Token (Fernet-Aequivalent)
//! - `types` - Schluesseltypen mit geschwaerzter Debug-Ausgabe
//! - `error` - Fehlertypen
//!
//! Signatur und Verschluesselung sind voneinander unabhaengig: ein Dokument
//! kann signiert, verschluesselt, beides oder keines von beiden sein.

pub mod error;
pub mod signing;
pub mod symmetric;
pub mod types;

// Bequeme Re-Exports
pub use error::{CryptoError, CryptoResult};
pub use signing::{generate_signing_key_pair, sign, verify};
pub use symmetric::{decrypt, encrypt, generate_symmetric_key};
pub use types::{SecretBytes, SigningKeyPair, SymmetricKey};
