//! Signatur-Schluessel des Dozenten (RSA-2048, PSS mit SHA-256)
//!
//! ## Parameter
//! - Schluessel: RSA 2048 Bit, e = 65537
//! - Padding: PSS mit MGF1(SHA-256) und maximaler Salt-Laenge (`emLen - hLen - 2`)
//! - Hash: SHA-256 ueber die Original-Bytes des Dokuments
//!
//! Signiert wird immer ueber den Klartext, damit die Verifikation unabhaengig
//! von einer eventuellen Verschluesselung bleibt.

use rand_core::OsRng;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{Pss, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use skriptorium_core::Signatur;

use crate::error::{CryptoError, CryptoResult};
use crate::types::SigningKeyPair;

/// Schluessellaenge in Bit
pub const KEY_BITS: usize = 2048;

/// Ausgabelaenge von SHA-256 in Bytes
const HASH_LEN: usize = 32;

/// Generiert ein neues RSA-Schluesselpaar und kodiert es als PEM
///
/// Schlaegt nur bei Entropie- oder Bibliotheksfehlern fehl.
pub fn generate_signing_key_pair() -> CryptoResult<SigningKeyPair> {
    let private_key = RsaPrivateKey::new(&mut OsRng, KEY_BITS)
        .map_err(|e| CryptoError::SchluesselGenerierung(e.to_string()))?;
    let public_key = RsaPublicKey::from(&private_key);

    let private_pem = private_key
        .to_pkcs8_pem(LineEnding::LF)
        .map_err(|e| CryptoError::SchluesselGenerierung(e.to_string()))?;
    let public_pem = public_key
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| CryptoError::SchluesselGenerierung(e.to_string()))?;

    tracing::debug!(bits = KEY_BITS, "RSA-Schluesselpaar generiert");

    Ok(SigningKeyPair {
        public_pem,
        private_pem: String::from(private_pem.as_str()),
    })
}

/// Signiert `message` mit dem PEM-kodierten privaten Schluessel
///
/// PSS ist randomisiert: zwei Signaturen ueber dieselben Bytes unterscheiden sich.
pub fn sign(private_pem: &str, message: &[u8]) -> CryptoResult<Signatur> {
    let private_key = parse_private_key(private_pem)?;
    let public_key = RsaPublicKey::from(&private_key);

    let digest = Sha256::digest(message);
    let padding = Pss::new_with_salt::<Sha256>(max_salt_len(&public_key));

    let signature = private_key
        .sign_with_rng(&mut OsRng, padding, &digest)
        .map_err(|e| CryptoError::Signierung(e.to_string()))?;

    Ok(Signatur::new(signature))
}

/// Verifiziert eine Signatur gegen den PEM-kodierten oeffentlichen Schluessel
///
/// Gibt bei jeder Abweichung `false` zurueck (falsche Daten, falscher
/// Schluessel, beschaedigte Signatur, unlesbarer Schluessel) und wirft nie.
pub fn verify(public_pem: &str, message: &[u8], signature: &[u8]) -> bool {
    let public_key = match parse_public_key(public_pem) {
        Ok(key) => key,
        Err(e) => {
            tracing::debug!(fehler = %e, "Oeffentlicher Schluessel nicht lesbar");
            return false;
        }
    };

    let digest = Sha256::digest(message);
    let padding = Pss::new_with_salt::<Sha256>(max_salt_len(&public_key));

    match public_key.verify(padding, &digest, signature) {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(fehler = %e, "Signatur-Verifikation fehlgeschlagen");
            false
        }
    }
}

/// Liest einen privaten Schluessel (PKCS#8, ersatzweise PKCS#1)
fn parse_private_key(pem: &str) -> CryptoResult<RsaPrivateKey> {
    RsaPrivateKey::from_pkcs8_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
        .map_err(|e| CryptoError::UngueltigerSchluessel(format!("privater Schluessel: {e}")))
}

/// Liest einen oeffentlichen Schluessel (SubjectPublicKeyInfo, ersatzweise PKCS#1)
fn parse_public_key(pem: &str) -> CryptoResult<RsaPublicKey> {
    RsaPublicKey::from_public_key_pem(pem)
        .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
        .map_err(|e| CryptoError::UngueltigerSchluessel(format!("oeffentlicher Schluessel: {e}")))
}

/// Maximale PSS-Salt-Laenge fuer den gegebenen Modulus
fn max_salt_len(public_key: &RsaPublicKey) -> usize {
    let em_bits = public_key.n().bits().saturating_sub(1);
    let em_len = em_bits.div_ceil(8);
    em_len.saturating_sub(HASH_LEN + 2)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
