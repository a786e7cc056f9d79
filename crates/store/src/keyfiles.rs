//! PEM-Dateien des aktiven Signatur-Schluesselpaars
//!
//! Liegen im Schluesselverzeichnis als `lecturer_public.pem` und
//! `lecturer_private.pem`. Beim Laden haben sie Vorrang vor den Schluesseln
//! in der JSON-Datei.

use std::path::{Path, PathBuf};

use skriptorium_core::ActiveKeyPair;

use crate::datei::{einsetzen, verwerfen, vorbereiten};
use crate::error::StoreResult;

pub const PUBLIC_KEY_FILE: &str = "lecturer_public.pem";
pub const PRIVATE_KEY_FILE: &str = "lecturer_private.pem";

#[derive(Debug, Clone)]
pub struct KeyFiles {
    verzeichnis: PathBuf,
}

impl KeyFiles {
    pub fn new(verzeichnis: impl Into<PathBuf>) -> Self {
        Self {
            verzeichnis: verzeichnis.into(),
        }
    }

    pub fn public_pfad(&self) -> PathBuf {
        self.verzeichnis.join(PUBLIC_KEY_FILE)
    }

    pub fn private_pfad(&self) -> PathBuf {
        self.verzeichnis.join(PRIVATE_KEY_FILE)
    }

    /// Liest beide Dateien; fehlende Dateien ergeben `None`
    pub async fn laden(&self) -> StoreResult<ActiveKeyPair> {
        Ok(ActiveKeyPair {
            public: optional_lesen(&self.public_pfad()).await?,
            private: optional_lesen(&self.private_pfad()).await?,
        })
    }

    /// Schreibt beide Dateien; der private Schluessel nur fuer den Eigentuemer lesbar
    ///
    /// Beide Inhalte liegen synchronisiert in temporaeren Dateien, bevor die
    /// erste umbenannt wird. Scheitert das Schreiben, bleibt das alte Paar
    /// vollstaendig erhalten.
    pub async fn speichern(&self, public_pem: &str, private_pem: &str) -> StoreResult<()> {
        let public_pfad = self.public_pfad();
        let private_pfad = self.private_pfad();

        let private_tmp = vorbereiten(&private_pfad, private_pem.as_bytes(), true).await?;
        let public_tmp = match vorbereiten(&public_pfad, public_pem.as_bytes(), false).await {
            Ok(tmp) => tmp,
            Err(e) => {
                verwerfen(&private_tmp).await;
                return Err(e);
            }
        };

        if let Err(e) = einsetzen(&private_tmp, &private_pfad).await {
            verwerfen(&public_tmp).await;
            return Err(e);
        }
        einsetzen(&public_tmp, &public_pfad).await?;

        tracing::info!(verzeichnis = %self.verzeichnis.display(), "Schluesseldateien geschrieben");
        Ok(())
    }
}

async fn optional_lesen(pfad: &Path) -> StoreResult<Option<String>> {
    match tokio::fs::read_to_string(pfad).await {
        Ok(inhalt) if inhalt.trim().is_empty() => Ok(None),
        Ok(inhalt) => Ok(Some(inhalt)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
