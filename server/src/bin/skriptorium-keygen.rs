//! skriptorium-keygen – Erzeugt das Signatur-Schluesselpaar des Dozenten
//!
//! Aufruf: `skriptorium-keygen [ZIELVERZEICHNIS]`
//!
//! Ohne Argument landet das Paar im konfigurierten `schluessel_verzeichnis`.
//! Vorhandene Schluesseldateien werden ueberschrieben.

use anyhow::{Context, Result};
use skriptorium_server::{config::ServerConfig, logging_initialisieren};
use skriptorium_store::KeyFiles;
use std::path::PathBuf;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config_pfad = std::env::var("SKRIPTORIUM_CONFIG").unwrap_or_else(|_| "config.toml".into());
    let config = ServerConfig::laden(&config_pfad)?;

    logging_initialisieren(&config.logging.level, &config.logging.format);

    let ziel = match std::env::args_os().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => config.speicher.schluessel_verzeichnis.clone(),
    };

    let paar = tokio::task::spawn_blocking(skriptorium_crypto::generate_signing_key_pair)
        .await
        .context("Schluesselerzeugung abgebrochen")??;

    let dateien = KeyFiles::new(&ziel);
    dateien
        .speichern(&paar.public_pem, &paar.private_pem)
        .await
        .with_context(|| format!("Schluessel konnten nicht nach '{}' geschrieben werden", ziel.display()))?;

    tracing::info!(verzeichnis = %ziel.display(), "Schluesselpaar erzeugt");

    println!("Oeffentlicher Schluessel: {}", dateien.public_pfad().display());
    println!("Privater Schluessel:      {}", dateien.private_pfad().display());
    Ok(())
}
