mod panik_tests;

use serde_json::Value;
use skriptorium_store::{JsonStore, SpeicherPfade};
use std::sync::Arc;

use crate::dispatcher::MessageDispatcher;
use crate::server_state::{TransferConfig, TransferState};

/// Dispatcher ueber einem JSON-Speicher in einem Temp-Verzeichnis
pub(crate) struct Umgebung {
    pub dispatcher: MessageDispatcher<JsonStore>,
    pub dir: tempfile::TempDir,
}

impl Umgebung {
    pub async fn neu() -> Self {
        let dir = tempfile::tempdir().expect("Temp-Verzeichnis konnte nicht erstellt werden");
        Self::in_verzeichnis(dir).await
    }

    /// Oeffnet einen Speicher ueber einem vorbereiteten Verzeichnis
    pub async fn in_verzeichnis(dir: tempfile::TempDir) -> Self {
        let store = JsonStore::oeffnen(SpeicherPfade::unter(dir.path()))
            .await
            .expect("Speicher konnte nicht geoeffnet werden");
        let state = TransferState::neu(TransferConfig::default(), Arc::new(store));
        Self {
            dispatcher: MessageDispatcher::neu(state),
            dir,
        }
    }

    /// Schickt eine Anfrage und liefert die serialisierte Antwort
    pub async fn senden(&self, anfrage: Value) -> Value {
        self.roh(&anfrage.to_string()).await
    }

    pub async fn roh(&self, text: &str) -> Value {
        let antwort = self.dispatcher.verarbeiten_text(text).await;
        serde_json::to_value(&antwort).expect("Antwort nicht serialisierbar")
    }
}
