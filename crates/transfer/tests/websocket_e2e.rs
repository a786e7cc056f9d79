//! End-to-End-Test ueber eine echte WebSocket-Verbindung

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use skriptorium_store::{JsonStore, SpeicherPfade};
use skriptorium_transfer::{TransferConfig, TransferServer, TransferState};
use std::sync::Arc;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::Message;

type Client = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

async fn anfrage(client: &mut Client, nachricht: Message) -> Value {
    client.send(nachricht).await.expect("Senden fehlgeschlagen");
    loop {
        match client.next().await {
            Some(Ok(Message::Text(text))) => {
                return serde_json::from_str(&text).expect("Antwort ist kein JSON")
            }
            Some(Ok(_)) => continue,
            andere => panic!("Unerwartete Nachricht: {andere:?}"),
        }
    }
}

async fn text(client: &mut Client, wert: Value) -> Value {
    anfrage(client, Message::Text(wert.to_string())).await
}

#[tokio::test]
async fn test_websocket_sitzung() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::oeffnen(SpeicherPfade::unter(dir.path())).await.unwrap();
    let state = TransferState::neu(TransferConfig::default(), Arc::new(store));
    let server = TransferServer::binden(state, "127.0.0.1:0").await.unwrap();
    let adresse = server.lokale_adresse().unwrap();

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let client = async move {
        let (mut client, _) = tokio_tungstenite::connect_async(format!("ws://{adresse}"))
            .await
            .expect("Verbindung fehlgeschlagen");

        // Kaputte Nachricht beendet die Verbindung nicht
        let antwort = anfrage(&mut client, Message::Text("kein json".into())).await;
        assert_eq!(antwort["action"], "unknown");
        assert_eq!(antwort["code"], "MALFORMED_MESSAGE");

        // Binaer-Nachricht ohne UTF-8
        let antwort = anfrage(&mut client, Message::Binary(vec![0xff, 0xfe, 0x00])).await;
        assert_eq!(antwort["code"], "MALFORMED_MESSAGE");

        // Binaer-Nachricht mit JSON wird wie Text behandelt
        let antwort = anfrage(
            &mut client,
            Message::Binary(json!({ "action": "get_classes" }).to_string().into_bytes()),
        )
        .await;
        assert_eq!(antwort["status"], "success");
        assert_eq!(antwort["classes"].as_array().unwrap().len(), 8);

        let antwort = text(&mut client, json!({ "action": "generate_lecturer_keys" })).await;
        assert_eq!(antwort["status"], "success");

        let antwort = text(
            &mut client,
            json!({
                "action": "upload_file",
                "data": {
                    "fileName": "a.txt",
                    "fileContent": "MDEyMzQ1Njc4OQ==",
                    "originalFileContent": "MDEyMzQ1Njc4OQ==",
                    "isSigned": true,
                    "course": "CT101"
                }
            }),
        )
        .await;
        assert_eq!(antwort["status"], "success");
        let id = antwort["fileId"].clone();

        let antwort = text(&mut client, json!({ "action": "download_file", "data": { "fileId": id } })).await;
        assert_eq!(antwort["fileContent"], "MDEyMzQ1Njc4OQ==");
        assert_eq!(antwort["isSigned"], true);
        assert!(antwort["signature"].is_string());

        // Zweiter Client sieht denselben Bestand
        let (mut zweiter, _) = tokio_tungstenite::connect_async(format!("ws://{adresse}"))
            .await
            .unwrap();
        let antwort = text(&mut zweiter, json!({ "action": "get_files" })).await;
        assert_eq!(antwort["files"].as_array().unwrap().len(), 1);
        assert!(antwort["files"][0].get("filePath").is_none());

        // Shutdown: der Server schliesst die offenen Verbindungen
        shutdown_tx.send(true).unwrap();
        loop {
            match client.next().await {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                Some(Ok(_)) => continue,
            }
        }
    };

    let (ergebnis, ()) = tokio::join!(server.starten(shutdown_rx), client);
    ergebnis.expect("Server mit Fehler beendet");
}

#[tokio::test]
async fn test_zu_grosse_nachricht_wird_gemeldet_und_geschlossen() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::oeffnen(SpeicherPfade::unter(dir.path())).await.unwrap();
    let config = TransferConfig {
        max_nachricht_bytes: 1024,
    };
    let state = TransferState::neu(config, Arc::new(store));
    let server = TransferServer::binden(state, "127.0.0.1:0").await.unwrap();
    let adresse = server.lokale_adresse().unwrap();

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let client = async move {
        let (mut client, _) = tokio_tungstenite::connect_async(format!("ws://{adresse}"))
            .await
            .expect("Verbindung fehlgeschlagen");

        // Unter dem Limit normal beantwortet
        let antwort = text(&mut client, json!({ "action": "get_classes" })).await;
        assert_eq!(antwort["status"], "success");

        let antwort = anfrage(&mut client, Message::Text("x".repeat(4096))).await;
        assert_eq!(antwort["status"], "error");
        assert_eq!(antwort["action"], "unknown");
        assert_eq!(antwort["code"], "MALFORMED_MESSAGE");
        assert_eq!(antwort["message"], "Message too large.");

        match client.next().await {
            Some(Ok(Message::Close(Some(frame)))) => {
                assert_eq!(frame.code, CloseCode::Size);
                assert_eq!(u16::from(frame.code), 1009);
            }
            andere => panic!("Close-Frame erwartet: {andere:?}"),
        }
        drop(client);

        shutdown_tx.send(true).unwrap();
    };

    let (ergebnis, ()) = tokio::join!(server.starten(shutdown_rx), client);
    ergebnis.expect("Server mit Fehler beendet");
}
