//! Skriptorium Server – Einstiegspunkt
//!
//! Laedt die Konfiguration, initialisiert das Logging und startet den Server.

use anyhow::Result;
use skriptorium_server::{config::ServerConfig, logging_initialisieren, Server};

#[tokio::main]
async fn main() -> Result<()> {
    // Konfigurationsdatei-Pfad aus Umgebungsvariable oder Standard
    let config_pfad = std::env::var("SKRIPTORIUM_CONFIG").unwrap_or_else(|_| "config.toml".into());

    let config = ServerConfig::laden(&config_pfad)?;

    logging_initialisieren(&config.logging.level, &config.logging.format);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_pfad,
        adresse = %config.bind_adresse(),
        "Skriptorium Server wird initialisiert"
    );

    let server = Server::neu(config);
    if let Err(e) = server.starten().await {
        tracing::error!(fehler = %format!("{e:#}"), "Server beendet mit Fehler");
        return Err(e);
    }

    tracing::info!("Server beendet");
    Ok(())
}
