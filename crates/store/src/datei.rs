//! Atomares Schreiben von Dateien (temporaere Datei + rename)

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::error::StoreResult;

/// Schreibt `inhalt` atomar nach `ziel`
///
/// Leser sehen entweder den alten oder den vollstaendigen neuen Inhalt.
/// `privat` beschraenkt die Rechte auf den Eigentuemer (nur Unix).
pub(crate) async fn atomar_schreiben(ziel: &Path, inhalt: &[u8], privat: bool) -> StoreResult<()> {
    let tmp = vorbereiten(ziel, inhalt, privat).await?;
    einsetzen(&tmp, ziel).await
}

/// Schreibt `inhalt` in die temporaere Datei neben `ziel` und synchronisiert sie
///
/// Gibt den Pfad der temporaeren Datei zurueck; `ziel` bleibt unberuehrt.
pub(crate) async fn vorbereiten(ziel: &Path, inhalt: &[u8], privat: bool) -> StoreResult<PathBuf> {
    if let Some(parent) = ziel.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let tmp = tmp_pfad(ziel);
    let mut optionen = tokio::fs::OpenOptions::new();
    optionen.write(true).create(true).truncate(true);
    #[cfg(unix)]
    if privat {
        optionen.mode(0o600);
    }
    #[cfg(not(unix))]
    let _ = privat;

    let ergebnis = async {
        let mut datei = optionen.open(&tmp).await?;
        datei.write_all(inhalt).await?;
        datei.sync_all().await
    }
    .await;

    if let Err(e) = ergebnis {
        verwerfen(&tmp).await;
        return Err(e.into());
    }
    Ok(tmp)
}

/// Benennt eine vorbereitete temporaere Datei in `ziel` um
pub(crate) async fn einsetzen(tmp: &Path, ziel: &Path) -> StoreResult<()> {
    if let Err(e) = tokio::fs::rename(tmp, ziel).await {
        verwerfen(tmp).await;
        return Err(e.into());
    }
    Ok(())
}

/// Entfernt eine temporaere Datei; Fehler werden ignoriert
pub(crate) async fn verwerfen(tmp: &Path) {
    let _ = tokio::fs::remove_file(tmp).await;
}

fn tmp_pfad(ziel: &Path) -> PathBuf {
    let mut name = ziel.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    ziel.with_file_name(name)
}
