//! skriptorium-server – Bibliotheks-Root
//!
//! Verdrahtet Konfiguration, Speicher und Transferdienst und stellt den
//! oeffentlichen Einstiegspunkt fuer beide Binaries und die Tests bereit.

pub mod config;

use anyhow::{Context, Result};
use config::ServerConfig;
use skriptorium_store::JsonStore;
use skriptorium_transfer::{TransferServer, TransferState};
use std::sync::Arc;
use tokio::sync::watch;

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Oeffnet den Speicher und bindet den Listener
    ///
    /// Jeder Fehler hier ist fatal: ohne Ablage oder Socket kann der
    /// Dienst nicht arbeiten.
    pub async fn vorbereiten(&self) -> Result<TransferServer<JsonStore>> {
        let pfade = self.config.speicher_pfade();
        let store = JsonStore::oeffnen(pfade.clone())
            .await
            .with_context(|| format!("Speicher unter '{}' nicht nutzbar", pfade.daten_datei.display()))?;

        let state = TransferState::neu(self.config.transfer_config(), Arc::new(store));
        let adresse = self.config.bind_adresse();
        let server = TransferServer::binden(state, adresse.as_str())
            .await
            .with_context(|| format!("Adresse '{adresse}' kann nicht gebunden werden"))?;

        tracing::info!(
            adresse = %adresse,
            dateien = %pfade.dateien_verzeichnis.display(),
            schluessel = %pfade.schluessel_verzeichnis.display(),
            "Server vorbereitet"
        );
        Ok(server)
    }

    /// Laeuft bis `shutdown_rx` ein `true`-Signal empfaengt
    pub async fn ausfuehren(self, shutdown_rx: watch::Receiver<bool>) -> Result<()> {
        let server = self.vorbereiten().await?;
        server.starten(shutdown_rx).await?;
        Ok(())
    }

    /// Startet den Server und laeuft bis Ctrl-C
    pub async fn starten(self) -> Result<()> {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => tracing::info!("Shutdown-Signal empfangen, Server wird beendet"),
                Err(e) => tracing::error!(fehler = %e, "Signal-Handler konnte nicht registriert werden"),
            }
            let _ = shutdown_tx.send(true);
        });

        self.ausfuehren(shutdown_rx).await
    }
}

/// Initialisiert tracing-subscriber mit dem konfigurierten Level und Format
///
/// `RUST_LOG` hat Vorrang vor dem konfigurierten Level.
pub fn logging_initialisieren(level: &str, format: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().with_env_filter(filter).with_target(true).init();
        }
    }
}
