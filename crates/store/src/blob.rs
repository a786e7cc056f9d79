//! Storage-Backend fuer Dokument-Inhalte (Blobs)
//!
//! Das `StorageBackend`-Trait abstrahiert den konkreten Speicher. Schluessel
//! sind flach: nur die letzte Pfadkomponente zaehlt, damit weder `..` noch
//! Altbestaende mit Verzeichnispraefix (`files/123_a.txt`) aus dem
//! Basisverzeichnis herausfuehren.

use std::path::PathBuf;

use crate::datei::atomar_schreiben;
use crate::error::{StoreError, StoreResult};

/// Abstraktes Speicher-Backend fuer Blobs
#[allow(async_fn_in_trait)]
pub trait StorageBackend: Send + Sync {
    /// Blob unter dem angegebenen Schluessel speichern
    async fn store(&self, key: &str, data: &[u8]) -> StoreResult<()>;

    /// Blob laden; `StoreError::NichtGefunden` wenn er fehlt
    async fn retrieve(&self, key: &str) -> StoreResult<Vec<u8>>;

    /// Blob loeschen (fehlender Blob ist kein Fehler)
    async fn delete(&self, key: &str) -> StoreResult<()>;
}

/// Disk-basiertes Storage-Backend
///
/// Speichert Blobs unter `base_dir/<key>`. Jeder Blob ist synchronisiert auf
/// der Platte, bevor `store` zurueckkehrt.
#[derive(Debug, Clone)]
pub struct DiskStorage {
    base_dir: PathBuf,
}

impl DiskStorage {
    /// Neues DiskStorage mit dem angegebenen Basisverzeichnis erstellen
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Vollstaendigen Dateipfad aus einem Blob-Schluessel berechnen
    fn full_path(&self, key: &str) -> StoreResult<PathBuf> {
        let name = letzte_komponente(key);
        if name.is_empty() || name == "." || name == ".." {
            return Err(StoreError::UngueltigeDaten(format!(
                "Ungueltiger Blob-Schluessel: {key:?}"
            )));
        }
        Ok(self.base_dir.join(name))
    }
}

impl StorageBackend for DiskStorage {
    async fn store(&self, key: &str, data: &[u8]) -> StoreResult<()> {
        let full = self.full_path(key)?;
        atomar_schreiben(&full, data, false).await?;
        tracing::debug!(path = %full.display(), bytes = data.len(), "Blob gespeichert");
        Ok(())
    }

    async fn retrieve(&self, key: &str) -> StoreResult<Vec<u8>> {
        let full = self.full_path(key)?;
        match tokio::fs::read(&full).await {
            Ok(data) => {
                tracing::debug!(path = %full.display(), bytes = data.len(), "Blob gelesen");
                Ok(data)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::nicht_gefunden(full.display().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let full = self.full_path(key)?;
        match tokio::fs::remove_file(&full).await {
            Ok(()) => {
                tracing::debug!(path = %full.display(), "Blob geloescht");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Letzte Pfadkomponente, unabhaengig vom Trennzeichen (`/` oder `\`)
pub(crate) fn letzte_komponente(pfad: &str) -> &str {
    pfad.rsplit(['/', '\\']).next().unwrap_or(pfad)
}

/// Blob-Schluessel fuer ein neues Dokument: `<id>_<dateiname>`
pub(crate) fn blob_schluessel(id: &str, dateiname: &str) -> String {
    let name = letzte_komponente(dateiname);
    let name = if name.is_empty() || name == "." || name == ".." {
        "datei"
    } else {
        name
    };
    format!("{id}_{name}")
}
