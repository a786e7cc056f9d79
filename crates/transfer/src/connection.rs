//! Client-Connection – Verwaltet eine einzelne WebSocket-Verbindung
//!
//! Jede Verbindung bekommt eine `ClientConnection` in einem eigenen lokalen
//! Task. Die Empfangsschleife beantwortet jede Nachricht einzeln:
//! - Text-Nachrichten und Binaer-Nachrichten mit UTF-8-JSON gehen an den Dispatcher
//! - Binaer-Nachrichten ohne gueltiges UTF-8 ergeben `MALFORMED_MESSAGE`
//! - Eine Panik waehrend der Verarbeitung ergibt `server_error`/`FATAL`
//!
//! Keine dieser Situationen beendet die Verbindung. Schliessen durch den
//! Client ist ein normales Ende, kein Fehler.
//!
//! Einzige Ausnahme ist eine Nachricht ueber `max_nachricht_bytes`: der Rest
//! des Frames liegt ungelesen im Socket, der Strom ist nicht mehr synchron.
//! Der Client bekommt `MALFORMED_MESSAGE` und einen Close-Frame mit 1009,
//! danach wird die Verbindung geschlossen.

use futures_util::{FutureExt, SinkExt, StreamExt};
use skriptorium_protocol::{aktion, antwort_kodieren, Antwort, ErrorCode, ProtocolError};
use std::net::SocketAddr;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::frame::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::WebSocketConfig;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::WebSocketStream;

use crate::dispatcher::MessageDispatcher;
use crate::server_state::{TransferSpeicher, TransferState};

/// Meldung an den Client bei Ueberschreitung von `max_nachricht_bytes`
const ZU_GROSS_MELDUNG: &str = "Message too large.";

/// Wartezeit auf das Verbindungsende durch den Client nach einem Abbruch
const NACHLAUF: Duration = Duration::from_secs(2);

/// Verarbeitet eine einzelne WebSocket-Verbindung
pub struct ClientConnection<S: TransferSpeicher> {
    state: Arc<TransferState<S>>,
    peer_addr: SocketAddr,
}

impl<S: TransferSpeicher> ClientConnection<S> {
    /// Erstellt eine neue ClientConnection
    pub fn neu(state: Arc<TransferState<S>>, peer_addr: SocketAddr) -> Self {
        Self { state, peer_addr }
    }

    /// Fuehrt den Handshake durch und startet die Empfangsschleife
    ///
    /// Laeuft bis der Client trennt oder ein Shutdown-Signal eingeht.
    pub async fn verarbeiten(
        self,
        stream: TcpStream,
        mut shutdown_rx: tokio::sync::watch::Receiver<bool>,
    ) {
        let peer_addr = self.peer_addr;

        let mut ws_config = WebSocketConfig::default();
        ws_config.max_message_size = Some(self.state.config.max_nachricht_bytes);
        ws_config.max_frame_size = Some(self.state.config.max_nachricht_bytes);

        let ws = match tokio_tungstenite::accept_async_with_config(stream, Some(ws_config)).await {
            Ok(ws) => ws,
            Err(e) => {
                tracing::warn!(peer = %peer_addr, fehler = %e, "WebSocket-Handshake fehlgeschlagen");
                return;
            }
        };

        tracing::info!(peer = %peer_addr, "Neue Verbindung");

        let (mut schreiber, mut leser) = ws.split();
        let dispatcher = MessageDispatcher::neu(Arc::clone(&self.state));
        let mut abgebrochen = false;

        loop {
            if *shutdown_rx.borrow() {
                let _ = schreiber.send(Message::Close(None)).await;
                break;
            }

            let antwort = tokio::select! {
                nachricht = leser.next() => match nachricht {
                    Some(Ok(Message::Text(text))) => beantworten(&dispatcher, &text).await,
                    Some(Ok(Message::Binary(daten))) => match String::from_utf8(daten) {
                        Ok(text) => beantworten(&dispatcher, &text).await,
                        Err(_) => ProtocolError::fehlerhaft(
                            aktion::UNKNOWN,
                            "Binary message is not valid UTF-8.",
                        )
                        .into_antwort(),
                    },
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::info!(peer = %peer_addr, "Verbindung vom Client getrennt");
                        break;
                    }
                    // Ping/Pong beantwortet tungstenite selbst
                    Some(Ok(_)) => continue,
                    Some(Err(WsError::Capacity(e))) => {
                        tracing::warn!(peer = %peer_addr, fehler = %e, "Nachricht zu gross, Verbindung wird beendet");
                        let antwort = ProtocolError::fehlerhaft(aktion::UNKNOWN, ZU_GROSS_MELDUNG).into_antwort();
                        if let Ok(text) = antwort_kodieren(&antwort) {
                            let _ = schreiber.send(Message::Text(text)).await;
                        }
                        let close = CloseFrame {
                            code: CloseCode::Size,
                            reason: ZU_GROSS_MELDUNG.into(),
                        };
                        let _ = schreiber.send(Message::Close(Some(close))).await;
                        abgebrochen = true;
                        break;
                    }
                    Some(Err(e)) => {
                        lesefehler_loggen(peer_addr, &e);
                        break;
                    }
                },

                // Shutdown-Signal
                Ok(()) = shutdown_rx.changed() => continue,
            };

            let text = match antwort_kodieren(&antwort) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!(peer = %peer_addr, fehler = %e, "Antwort nicht serialisierbar");
                    continue;
                }
            };

            if let Err(e) = schreiber.send(Message::Text(text)).await {
                tracing::warn!(peer = %peer_addr, fehler = %e, "Senden fehlgeschlagen");
                break;
            }
        }

        if abgebrochen {
            if let Ok(mut ws) = leser.reunite(schreiber) {
                nachlaufen(&mut ws).await;
            }
        }

        tracing::debug!(peer = %peer_addr, "Verbindung beendet");
    }
}

/// Schliesst die Senderichtung und verwirft ungelesene Bytes bis der Client trennt
///
/// Der Socket darf erst mit leerem Empfangspuffer geschlossen werden, sonst
/// geht die letzte Antwort durch einen RST verloren.
async fn nachlaufen(ws: &mut WebSocketStream<TcpStream>) {
    let tcp = ws.get_mut();
    let _ = tcp.shutdown().await;

    let mut puffer = [0u8; 4096];
    let _ = tokio::time::timeout(NACHLAUF, async {
        while let Ok(n) = tcp.read(&mut puffer).await {
            if n == 0 {
                break;
            }
        }
    })
    .await;
}

/// Verarbeitet eine Nachricht; eine Panik wird zur Fehler-Antwort
pub(crate) async fn beantworten<S: TransferSpeicher>(dispatcher: &MessageDispatcher<S>, text: &str) -> Antwort {
    match AssertUnwindSafe(dispatcher.verarbeiten_text(text))
        .catch_unwind()
        .await
    {
        Ok(antwort) => antwort,
        Err(panik) => {
            let grund = panik
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panik.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unbekannt".to_string());
            tracing::error!(grund = %grund, "Panik bei der Verarbeitung einer Nachricht");
            Antwort::fehler(aktion::SERVER_ERROR, ErrorCode::Fatal, format!("Server error: {grund}"))
        }
    }
}

fn lesefehler_loggen(peer_addr: SocketAddr, fehler: &WsError) {
    match fehler {
        WsError::ConnectionClosed | WsError::AlreadyClosed => {
            tracing::info!(peer = %peer_addr, "Verbindung geschlossen");
        }
        e => {
            tracing::warn!(peer = %peer_addr, fehler = %e, "WebSocket-Lesefehler");
        }
    }
}
