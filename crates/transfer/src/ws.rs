//! WebSocket-Listener – Bindet Socket, akzeptiert Verbindungen
//!
//! Der `TransferServer` bindet einen TCP-Socket und startet fuer jede
//! eingehende Verbindung einen eigenen Task mit einer `ClientConnection`.
//!
//! ## Concurrency-Modell
//! Die Repository-Traits verwenden async fn ohne Send-Garantie
//! (async_fn_in_trait), deshalb laufen alle Verbindungs-Tasks in einer
//! `tokio::task::LocalSet`. RSA-Arbeit (Signieren, Schluesselerzeugung)
//! laeuft auf dem Blocking-Pool und haelt die Verbindungen nicht auf.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, ToSocketAddrs};
use tokio::task::{JoinSet, LocalSet};

use crate::connection::ClientConnection;
use crate::error::TransferResult;
use crate::server_state::{TransferSpeicher, TransferState};

/// Wartezeit auf offene Verbindungen nach dem Shutdown-Signal
const SHUTDOWN_FRIST: Duration = Duration::from_secs(5);

/// WebSocket-Transferserver
pub struct TransferServer<S: TransferSpeicher> {
    state: Arc<TransferState<S>>,
    listener: TcpListener,
}

impl<S: TransferSpeicher> TransferServer<S> {
    /// Bindet den Socket
    ///
    /// Schlaegt fehl wenn die Adresse nicht gebunden werden kann.
    pub async fn binden(state: Arc<TransferState<S>>, adresse: impl ToSocketAddrs) -> TransferResult<Self> {
        let listener = TcpListener::bind(adresse).await?;
        Ok(Self { state, listener })
    }

    /// Tatsaechlich gebundene Adresse (auch bei Port 0)
    pub fn lokale_adresse(&self) -> TransferResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Akzeptiert Verbindungen bis `shutdown_rx` ein `true`-Signal empfaengt
    ///
    /// Verwendet eine `LocalSet` fuer alle Verbindungs-Tasks und wartet nach
    /// dem Signal kurz darauf, dass offene Verbindungen sauber schliessen.
    pub async fn starten(self, shutdown_rx: tokio::sync::watch::Receiver<bool>) -> TransferResult<()> {
        let local = LocalSet::new();
        local.run_until(self.accept_loop(shutdown_rx)).await
    }

    /// Interne Accept-Loop (laeuft innerhalb der LocalSet)
    async fn accept_loop(self, mut shutdown_rx: tokio::sync::watch::Receiver<bool>) -> TransferResult<()> {
        let lokale_addr = self.listener.local_addr()?;
        tracing::info!(adresse = %lokale_addr, "WebSocket-Server gestartet");

        let mut verbindungen = JoinSet::new();

        loop {
            if *shutdown_rx.borrow() {
                break;
            }

            tokio::select! {
                // Neue eingehende Verbindung
                result = self.listener.accept() => {
                    match result {
                        Ok((stream, peer_addr)) => {
                            tracing::debug!(peer = %peer_addr, "Verbindung akzeptiert");

                            let verbindung = ClientConnection::neu(Arc::clone(&self.state), peer_addr);
                            let shutdown_rx_clone = shutdown_rx.clone();

                            // Lokaler Task – kein Send erforderlich
                            verbindungen.spawn_local(async move {
                                verbindung.verarbeiten(stream, shutdown_rx_clone).await;
                            });
                        }
                        Err(e) => {
                            tracing::error!(fehler = %e, "TCP-Accept-Fehler");
                            tokio::time::sleep(Duration::from_millis(10)).await;
                        }
                    }
                }

                // Beendete Verbindungen einsammeln
                Some(_) = verbindungen.join_next(), if !verbindungen.is_empty() => {}

                // Shutdown-Signal
                Ok(()) = shutdown_rx.changed() => {}
            }
        }

        tracing::info!(
            offen = verbindungen.len(),
            "Shutdown-Signal empfangen, schliesse Verbindungen"
        );

        let abwarten = async { while verbindungen.join_next().await.is_some() {} };
        if tokio::time::timeout(SHUTDOWN_FRIST, abwarten).await.is_err() {
            tracing::warn!("Nicht alle Verbindungen rechtzeitig geschlossen");
            verbindungen.abort_all();
        }

        tracing::info!(uptime_sek = self.state.uptime_sek(), "WebSocket-Server gestoppt");
        Ok(())
    }
}
