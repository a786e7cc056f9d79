//! Gemeinsame Identifikations- und Werttypen fuer Skriptorium
//!
//! IDs verwenden das Newtype-Pattern, damit Dokument-IDs nicht mit
//! Klassen-IDs oder Dateinamen verwechselt werden koennen.

use base64::{engine::general_purpose::STANDARD as B64, Engine};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Eindeutige Dokument-ID
///
/// Wird beim Upload vom Speicher vergeben (Zeitstempel-basiert, prozessweit
/// streng monoton) und danach nie wiederverwendet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    /// Erstellt eine DocumentId aus einem beliebigen String
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Gibt die ID als &str zurueck
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Abgetrennte (detached) Signatur ueber die Original-Bytes eines Dokuments
///
/// Auf dem Draht und auf der Platte als Standard-Base64-String kodiert.
#[derive(Clone, PartialEq, Eq)]
pub struct Signatur(pub Vec<u8>);

impl Signatur {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Base64-Darstellung (Standard-Alphabet mit Padding)
    pub fn to_base64(&self) -> String {
        B64.encode(&self.0)
    }

    /// Dekodiert eine Base64-kodierte Signatur
    pub fn from_base64(text: &str) -> Result<Self, base64::DecodeError> {
        B64.decode(text.trim()).map(Self)
    }
}

impl std::fmt::Debug for Signatur {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signatur({} bytes)", self.0.len())
    }
}

impl Serialize for Signatur {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for Signatur {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_base64(&text).map_err(serde::de::Error::custom)
    }
}
