//! Tests fuer den JSON-Speicher: Upload, Lesen, Klassen, Schluessel, Neustart

use std::sync::Arc;

use skriptorium_core::{ClassEntry, DocumentId, NewDocument, Signatur};

use crate::error::StoreError;
use crate::json_store::{standard_klassen, JsonStore, ServerDaten, SpeicherPfade};
use crate::repository::{ClassRepository, DocumentRepository, KeyPairRepository};

async fn temp_store() -> (JsonStore, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("Temp-Verzeichnis konnte nicht erstellt werden");
    let store = JsonStore::oeffnen(SpeicherPfade::unter(dir.path()))
        .await
        .expect("Speicher konnte nicht geoeffnet werden");
    (store, dir)
}

fn neues_dokument(name: &str, inhalt: &[u8]) -> NewDocument {
    NewDocument {
        name: name.into(),
        size: inhalt.len() as u64,
        mime_type: "text/plain".into(),
        uploader: "giangvienA".into(),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Dokumente
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_neuer_speicher_hat_standardklassen() {
    let (store, dir) = temp_store().await;

    assert_eq!(store.list_classes().await.unwrap(), standard_klassen());
    assert!(store.list_documents().await.unwrap().is_empty());
    assert!(dir.path().join("files").is_dir());
    assert!(dir.path().join("keys").is_dir());
}

#[tokio::test]
async fn test_append_und_lesen() {
    let (store, _dir) = temp_store().await;

    let record = store
        .append_document(neues_dokument("a.txt", b"hello"), b"hello")
        .await
        .expect("Upload fehlgeschlagen");

    assert_eq!(record.name, "a.txt");
    assert_eq!(record.size, 5);
    assert!(record.file_path.ends_with(&format!("{}_a.txt", record.id)));
    assert_eq!(record.upload_date.len(), "01-01-2024 10:00:00".len());

    let gefunden = store.get_document(&record.id).await.unwrap();
    assert_eq!(gefunden, record);
    assert_eq!(store.read_blob(&record.file_path).await.unwrap(), b"hello");
    assert_eq!(store.list_documents().await.unwrap(), vec![record]);
}

#[tokio::test]
async fn test_unbekannte_id() {
    let (store, _dir) = temp_store().await;
    let result = store.get_document(&DocumentId::from("123")).await;
    assert!(matches!(result, Err(StoreError::NichtGefunden(_))));
}

#[tokio::test]
async fn test_reihenfolge_und_eindeutige_ids() {
    let (store, _dir) = temp_store().await;

    let mut ids = Vec::new();
    for i in 0..5 {
        let name = format!("d{i}.txt");
        let r = store
            .append_document(neues_dokument(&name, b"x"), b"x")
            .await
            .unwrap();
        ids.push(r.id);
    }

    let gelistet: Vec<_> = store
        .list_documents()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(gelistet, ids);

    let mut sortiert = ids.clone();
    sortiert.dedup();
    assert_eq!(sortiert.len(), 5);
}

#[tokio::test]
async fn test_parallele_uploads_kollidieren_nicht() {
    let (store, _dir) = temp_store().await;
    let store = Arc::new(store);

    let uploads = (0..20).map(|i| {
        let store = store.clone();
        async move {
            let inhalt = format!("inhalt {i}");
            store
                .append_document(neues_dokument("gleich.txt", inhalt.as_bytes()), inhalt.as_bytes())
                .await
                .unwrap()
        }
    });
    let records = futures_util::future::join_all(uploads).await;

    let mut ids: Vec<_> = records.iter().map(|r| r.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 20);

    // Jeder Datensatz verweist auf seinen eigenen Blob
    for r in &records {
        let blob = store.read_blob(&r.file_path).await.unwrap();
        assert_eq!(blob.len() as u64, r.size);
    }
    assert_eq!(store.list_documents().await.unwrap().len(), 20);
}

#[tokio::test]
async fn test_fehlgeschlagenes_persistieren_laesst_speicher_unveraendert() {
    let (store, dir) = temp_store().await;

    // Zieldatei durch ein Verzeichnis blockieren: rename schlaegt fehl
    std::fs::create_dir_all(dir.path().join("server_data.json")).unwrap();

    let result = store
        .append_document(neues_dokument("a.txt", b"hello"), b"hello")
        .await;
    assert!(result.is_err());
    assert!(store.list_documents().await.unwrap().is_empty());

    let blobs = std::fs::read_dir(dir.path().join("files")).unwrap().count();
    assert_eq!(blobs, 0, "Blob wurde nicht aufgeraeumt");

    let result = store.add_class(ClassEntry::new("X1", "Neu")).await;
    assert!(result.is_err());
    assert_eq!(store.list_classes().await.unwrap(), standard_klassen());
}

// ---------------------------------------------------------------------------
// Klassen
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_klasse_hinzufuegen_und_duplikat() {
    let (store, _dir) = temp_store().await;

    store.add_class(ClassEntry::new("X1", "Kurs X")).await.unwrap();
    let klassen = store.list_classes().await.unwrap();
    assert_eq!(klassen.len(), 9);
    assert_eq!(klassen.last(), Some(&ClassEntry::new("X1", "Kurs X")));

    let result = store.add_class(ClassEntry::new("X1", "Anderer Name")).await;
    assert!(matches!(result, Err(StoreError::Duplikat(ref id)) if id == "X1"));
    assert_eq!(store.list_classes().await.unwrap().len(), 9);

    let result = store.add_class(ClassEntry::new("CT101", "Schon da")).await;
    assert!(matches!(result, Err(StoreError::Duplikat(_))));
}

#[tokio::test]
async fn test_leere_klassenfelder_werden_abgelehnt() {
    let (store, _dir) = temp_store().await;
    let result = store.add_class(ClassEntry::new("", "Name")).await;
    assert!(matches!(result, Err(StoreError::UngueltigeDaten(_))));
    let result = store.add_class(ClassEntry::new("ID", "")).await;
    assert!(matches!(result, Err(StoreError::UngueltigeDaten(_))));
}

// ---------------------------------------------------------------------------
// Schluessel
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_schluesselpaar_speichern() {
    let (store, dir) = temp_store().await;

    let paar = store.load_active_key_pair().await.unwrap();
    assert!(paar.public.is_none() && paar.private.is_none());

    store.save_active_key_pair("PUB-1", "PRIV-1").await.unwrap();
    let paar = store.load_active_key_pair().await.unwrap();
    assert_eq!(paar.public.as_deref(), Some("PUB-1"));
    assert_eq!(paar.private.as_deref(), Some("PRIV-1"));

    let pem = std::fs::read_to_string(dir.path().join("keys/lecturer_public.pem")).unwrap();
    assert_eq!(pem, "PUB-1");
}

#[tokio::test]
async fn test_rotation_aendert_bestehende_datensaetze_nicht() {
    let (store, _dir) = temp_store().await;
    store.save_active_key_pair("PUB-ALT", "PRIV-ALT").await.unwrap();

    let mut neu = neues_dokument("s.txt", b"x");
    neu.is_signed = true;
    neu.signature = Some(Signatur::new(vec![1, 2, 3]));
    neu.lecturer_public_key = Some("PUB-ALT".into());
    let record = store.append_document(neu, b"x").await.unwrap();

    store.save_active_key_pair("PUB-NEU", "PRIV-NEU").await.unwrap();

    let gelesen = store.get_document(&record.id).await.unwrap();
    assert_eq!(gelesen.lecturer_public_key.as_deref(), Some("PUB-ALT"));
}

// ---------------------------------------------------------------------------
// Neustart / Laden
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_zustand_ueberlebt_neustart() {
    let dir = tempfile::tempdir().unwrap();
    let pfade = SpeicherPfade::unter(dir.path());

    let record = {
        let store = JsonStore::oeffnen(pfade.clone()).await.unwrap();
        store.add_class(ClassEntry::new("X1", "Kurs X")).await.unwrap();
        store.save_active_key_pair("PUB", "PRIV").await.unwrap();
        store
            .append_document(neues_dokument("a.txt", b"hello"), b"hello")
            .await
            .unwrap()
    };

    let store = JsonStore::oeffnen(pfade).await.unwrap();
    assert_eq!(store.get_document(&record.id).await.unwrap(), record);
    assert_eq!(store.read_blob(&record.file_path).await.unwrap(), b"hello");
    assert_eq!(store.list_classes().await.unwrap().len(), 9);
    assert!(store.load_active_key_pair().await.unwrap().ist_vollstaendig());

    // Neue IDs liegen oberhalb des Bestands
    let zweites = store
        .append_document(neues_dokument("b.txt", b"x"), b"x")
        .await
        .unwrap();
    let alt: u64 = record.id.as_str().parse().unwrap();
    let neu: u64 = zweites.id.as_str().parse().unwrap();
    assert!(neu > alt);
}

#[tokio::test]
async fn test_kaputtes_json_startet_mit_standardwerten() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("server_data.json"), "{ kein json").unwrap();

    let store = JsonStore::oeffnen(SpeicherPfade::unter(dir.path())).await.unwrap();
    assert_eq!(store.schnappschuss().await, ServerDaten::default());
}

#[tokio::test]
async fn test_teilweise_datei_wird_mit_standardwerten_ergaenzt() {
    let dir = tempfile::tempdir().unwrap();
    let json = r#"{
        "files": [{
            "id": "1700000000123456", "name": "alt.pdf", "size": 3,
            "filePath": "files/1700000000123456_alt.pdf", "type": "application/pdf",
            "course": "CT101", "docType": "lecture", "description": "",
            "uploadDate": "01-01-2024 10:00:00", "uploader": "giangvienA",
            "isEncrypted": false, "isSigned": false, "signature": null,
            "lecturerPublicKey": null, "aesKeyBase64": null
        }],
        "users": { "lecturers": {} }
    }"#;
    std::fs::write(dir.path().join("server_data.json"), json).unwrap();
    std::fs::create_dir_all(dir.path().join("files")).unwrap();
    std::fs::write(dir.path().join("files/1700000000123456_alt.pdf"), b"pdf").unwrap();

    let store = JsonStore::oeffnen(SpeicherPfade::unter(dir.path())).await.unwrap();

    assert_eq!(store.list_classes().await.unwrap(), standard_klassen());
    let record = store
        .get_document(&DocumentId::from("1700000000123456"))
        .await
        .unwrap();
    assert_eq!(record.doc_type.as_deref(), Some("lecture"));
    assert_eq!(store.read_blob(&record.file_path).await.unwrap(), b"pdf");
}

#[tokio::test]
async fn test_pem_dateien_haben_vorrang() {
    let dir = tempfile::tempdir().unwrap();
    let json = r#"{ "lecturer_keys": { "public": "PUB-JSON", "private": "PRIV-JSON" } }"#;
    std::fs::write(dir.path().join("server_data.json"), json).unwrap();
    std::fs::create_dir_all(dir.path().join("keys")).unwrap();
    std::fs::write(dir.path().join("keys/lecturer_public.pem"), "PUB-PEM").unwrap();

    let store = JsonStore::oeffnen(SpeicherPfade::unter(dir.path())).await.unwrap();
    let paar = store.load_active_key_pair().await.unwrap();
    assert_eq!(paar.public.as_deref(), Some("PUB-PEM"));
    assert_eq!(paar.private.as_deref(), Some("PRIV-JSON"));
}

#[tokio::test]
async fn test_persistierte_datei_ist_gueltiges_json() {
    let (store, dir) = temp_store().await;
    store
        .append_document(neues_dokument("a.txt", b"hello"), b"hello")
        .await
        .unwrap();

    let text = std::fs::read_to_string(dir.path().join("server_data.json")).unwrap();
    let wert: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(wert["files"][0]["name"], "a.txt");
    assert!(wert["files"][0]["filePath"].is_string());
    assert_eq!(wert["classes"].as_array().unwrap().len(), 8);
    assert!(!dir.path().join("server_data.json.tmp").exists());
}
