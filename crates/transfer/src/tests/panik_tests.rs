//! Eine Panik in einem Handler wird zur Fehler-Antwort, die Schleife laeuft weiter

use serde_json::json;
use skriptorium_core::{ActiveKeyPair, ClassEntry, DocumentId, DocumentRecord, NewDocument};
use skriptorium_store::{
    ClassRepository, DocumentRepository, KeyPairRepository, StoreError, StoreResult,
};
use std::sync::Arc;

use crate::connection::beantworten;
use crate::dispatcher::MessageDispatcher;
use crate::server_state::{TransferConfig, TransferState};

/// Speicher, der beim Auflisten der Dokumente in Panik geraet
struct PanikStore;

impl DocumentRepository for PanikStore {
    async fn append_document(&self, _neu: NewDocument, _inhalt: &[u8]) -> StoreResult<DocumentRecord> {
        Err(StoreError::Io(std::io::Error::other("Platte voll")))
    }

    async fn list_documents(&self) -> StoreResult<Vec<DocumentRecord>> {
        panic!("Index kaputt")
    }

    async fn get_document(&self, id: &DocumentId) -> StoreResult<DocumentRecord> {
        Err(StoreError::nicht_gefunden(id.to_string()))
    }

    async fn read_blob(&self, _file_path: &str) -> StoreResult<Vec<u8>> {
        Err(StoreError::nicht_gefunden("blob"))
    }
}

impl ClassRepository for PanikStore {
    async fn list_classes(&self) -> StoreResult<Vec<ClassEntry>> {
        Ok(vec![ClassEntry::new("CT101", "Lập trình cơ bản")])
    }

    async fn add_class(&self, _klasse: ClassEntry) -> StoreResult<()> {
        Ok(())
    }
}

impl KeyPairRepository for PanikStore {
    async fn load_active_key_pair(&self) -> StoreResult<ActiveKeyPair> {
        Ok(ActiveKeyPair::default())
    }

    async fn save_active_key_pair(&self, _public_pem: &str, _private_pem: &str) -> StoreResult<()> {
        Ok(())
    }
}

fn dispatcher() -> MessageDispatcher<PanikStore> {
    MessageDispatcher::neu(TransferState::neu(TransferConfig::default(), Arc::new(PanikStore)))
}

#[tokio::test]
async fn test_panik_wird_zu_server_error() {
    let dispatcher = dispatcher();

    let antwort = beantworten(&dispatcher, &json!({ "action": "get_files" }).to_string()).await;
    let wert = serde_json::to_value(&antwort).unwrap();
    assert_eq!(wert["status"], "error");
    assert_eq!(wert["action"], "server_error");
    assert_eq!(wert["code"], "FATAL");
    assert!(wert["message"].as_str().unwrap().contains("Index kaputt"));

    // Die naechste Nachricht wird normal beantwortet
    let antwort = beantworten(&dispatcher, &json!({ "action": "get_classes" }).to_string()).await;
    assert!(antwort.ist_erfolg());
}

#[tokio::test]
async fn test_speicherfehler_beim_upload_ist_io_error() {
    let dispatcher = dispatcher();
    let anfrage = json!({
        "action": "upload_file",
        "data": { "fileName": "a.txt", "fileContent": "", "originalFileContent": "" }
    });

    let antwort = beantworten(&dispatcher, &anfrage.to_string()).await;
    let wert = serde_json::to_value(&antwort).unwrap();
    assert_eq!(wert["action"], "upload_file");
    assert_eq!(wert["code"], "IO_ERROR");
}
