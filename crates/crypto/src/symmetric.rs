//! Symmetrische Verschluesselung mit versionierten Token
//!
//! Fernet-Aequivalent auf Basis von AES-256-GCM.
//!
//! ## Token-Format (vor der URL-sicheren Base64-Kodierung)
//! ```text
//! [version(1) = 0x81] [timestamp_be(8)] [nonce(12)] [ciphertext + auth_tag(16)]
//! ```
//!
//! Version und Zeitstempel sind als AAD gebunden; jede Veraenderung am Token
//! fuehrt zu `CryptoError::Entschluesselung`, nie zu teilweisem Klartext.

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Key, Nonce as AesNonce,
};
use base64::{engine::general_purpose::URL_SAFE, Engine};
use rand_core::{OsRng, RngCore};

use crate::error::{CryptoError, CryptoResult};
use crate::types::{SymmetricKey, SYMMETRIC_KEY_LEN};

/// Versions-Byte des Token-Formats
pub const TOKEN_VERSION: u8 = 0x81;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
const HEADER_LEN: usize = 1 + 8;
const MIN_TOKEN_LEN: usize = HEADER_LEN + NONCE_LEN + TAG_LEN;

/// Generiert einen frischen symmetrischen Schluessel
pub fn generate_symmetric_key() -> SymmetricKey {
    let mut bytes = [0u8; SYMMETRIC_KEY_LEN];
    OsRng.fill_bytes(&mut bytes);
    let key = SymmetricKey::from_bytes(&bytes);
    bytes.iter_mut().for_each(|b| *b = 0);
    key
}

/// Verschluesselt `plaintext` zu einem Base64-Token
pub fn encrypt(key: &SymmetricKey, plaintext: &[u8]) -> CryptoResult<String> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    encrypt_at_time(key, plaintext, timestamp)
}

fn encrypt_at_time(key: &SymmetricKey, plaintext: &[u8], timestamp: u64) -> CryptoResult<String> {
    let key_bytes = key.key_bytes()?;
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key_bytes.as_bytes()));

    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    let mut header = [0u8; HEADER_LEN];
    header[0] = TOKEN_VERSION;
    header[1..].copy_from_slice(&timestamp.to_be_bytes());

    let ciphertext = cipher
        .encrypt(
            AesNonce::from_slice(&nonce),
            Payload {
                msg: plaintext,
                aad: &header,
            },
        )
        .map_err(|e| CryptoError::Verschluesselung(e.to_string()))?;

    let mut token = Vec::with_capacity(HEADER_LEN + NONCE_LEN + ciphertext.len());
    token.extend_from_slice(&header);
    token.extend_from_slice(&nonce);
    token.extend_from_slice(&ciphertext);

    Ok(URL_SAFE.encode(token))
}

/// Entschluesselt ein Token
///
/// Jeder Fehler (ungueltiges Base64, falsche Version, zu kurz, falscher
/// Schluessel, Tag-Abweichung) wird als `CryptoError::Entschluesselung` gemeldet.
pub fn decrypt(key: &SymmetricKey, token: &str) -> CryptoResult<Vec<u8>> {
    let key_bytes = key
        .key_bytes()
        .map_err(|e| CryptoError::Entschluesselung(format!("Schluessel unbrauchbar: {e}")))?;

    let raw = URL_SAFE
        .decode(token.trim().as_bytes())
        .map_err(|e| CryptoError::Entschluesselung(format!("Token ist kein gueltiges Base64: {e}")))?;

    if raw.len() < MIN_TOKEN_LEN {
        return Err(CryptoError::Entschluesselung(format!(
            "Token zu kurz: {} Bytes",
            raw.len()
        )));
    }
    if raw[0] != TOKEN_VERSION {
        return Err(CryptoError::Entschluesselung(format!(
            "Unbekannte Token-Version 0x{:02x}",
            raw[0]
        )));
    }

    let (header, rest) = raw.split_at(HEADER_LEN);
    let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key_bytes.as_bytes()));
    cipher
        .decrypt(
            AesNonce::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad: header,
            },
        )
        .map_err(|_| CryptoError::Entschluesselung("Integritaetspruefung fehlgeschlagen".into()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
