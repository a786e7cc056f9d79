//! JSON-basierter Speicher fuer Dokument-Metadaten, Klassen und Schluessel
//!
//! Der gesamte Zustand liegt als ein JSON-Dokument (`server_data.json`) auf
//! der Platte und im Speicher hinter einem `RwLock`. Jede Mutation laeuft
//! unter dem Schreib-Lock und persistiert den kompletten Zustand, bevor sie
//! zurueckkehrt. Schlaegt das Persistieren fehl, wird die Aenderung im
//! Speicher zurueckgenommen.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use skriptorium_core::{ActiveKeyPair, ClassEntry, DocumentId, DocumentRecord, NewDocument};
use tokio::sync::RwLock;

use crate::blob::{blob_schluessel, DiskStorage, StorageBackend};
use crate::datei::atomar_schreiben;
use crate::error::{StoreError, StoreResult};
use crate::ids::IdGenerator;
use crate::keyfiles::KeyFiles;
use crate::repository::{ClassRepository, DocumentRepository, KeyPairRepository};

/// Format des Upload-Zeitpunkts (lokale Zeit)
const UPLOAD_DATUM_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

// ---------------------------------------------------------------------------
// Persistiertes Layout
// ---------------------------------------------------------------------------

/// Inhalt von `server_data.json`
///
/// Fehlende Schluessel werden mit den Standardwerten belegt, unbekannte
/// Schluessel ignoriert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerDaten {
    pub files: Vec<DocumentRecord>,
    pub lecturer_keys: ActiveKeyPair,
    pub classes: Vec<ClassEntry>,
}

impl Default for ServerDaten {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            lecturer_keys: ActiveKeyPair::default(),
            classes: standard_klassen(),
        }
    }
}

/// Klassen-Katalog beim ersten Start
pub fn standard_klassen() -> Vec<ClassEntry> {
    [
        ("CT101", "Lập trình cơ bản"),
        ("CT201", "Cấu trúc dữ liệu"),
        ("CT202", "Giải thuật"),
        ("CT301", "Cơ sở dữ liệu"),
        ("CT401", "Mạng máy tính"),
        ("CT501", "Trí tuệ nhân tạo"),
        ("TH101", "Toán cao cấp"),
        ("TH201", "Xác suất thống kê"),
    ]
    .into_iter()
    .map(|(id, name)| ClassEntry::new(id, name))
    .collect()
}

/// Pfade des Speichers auf der Platte
#[derive(Debug, Clone)]
pub struct SpeicherPfade {
    pub dateien_verzeichnis: PathBuf,
    pub schluessel_verzeichnis: PathBuf,
    pub daten_datei: PathBuf,
}

impl SpeicherPfade {
    pub fn new(
        dateien_verzeichnis: impl Into<PathBuf>,
        schluessel_verzeichnis: impl Into<PathBuf>,
        daten_datei: impl Into<PathBuf>,
    ) -> Self {
        Self {
            dateien_verzeichnis: dateien_verzeichnis.into(),
            schluessel_verzeichnis: schluessel_verzeichnis.into(),
            daten_datei: daten_datei.into(),
        }
    }

    /// Alle drei Pfade unterhalb eines gemeinsamen Wurzelverzeichnisses
    pub fn unter(wurzel: impl Into<PathBuf>) -> Self {
        let wurzel = wurzel.into();
        Self::new(
            wurzel.join("files"),
            wurzel.join("keys"),
            wurzel.join("server_data.json"),
        )
    }
}

// ---------------------------------------------------------------------------
// JsonStore
// ---------------------------------------------------------------------------

/// Metadaten-Speicher mit JSON-Datei, Blob-Backend und PEM-Schluesseldateien
pub struct JsonStore<B: StorageBackend = DiskStorage> {
    pfade: SpeicherPfade,
    blobs: B,
    schluessel: KeyFiles,
    daten: RwLock<ServerDaten>,
    ids: IdGenerator,
}

impl JsonStore<DiskStorage> {
    /// Oeffnet den Speicher mit einem `DiskStorage` im Dateiverzeichnis
    pub async fn oeffnen(pfade: SpeicherPfade) -> StoreResult<Self> {
        let blobs = DiskStorage::new(pfade.dateien_verzeichnis.clone());
        Self::mit_backend(pfade, blobs).await
    }
}

impl<B: StorageBackend> JsonStore<B> {
    /// Oeffnet den Speicher mit einem beliebigen Blob-Backend
    ///
    /// Legt die Verzeichnisse an, laedt `server_data.json` (falls vorhanden)
    /// und ueberschreibt die Schluessel mit den PEM-Dateien (falls vorhanden).
    pub async fn mit_backend(pfade: SpeicherPfade, blobs: B) -> StoreResult<Self> {
        tokio::fs::create_dir_all(&pfade.dateien_verzeichnis).await?;
        tokio::fs::create_dir_all(&pfade.schluessel_verzeichnis).await?;

        let mut daten = daten_laden(&pfade.daten_datei).await?;

        let schluessel = KeyFiles::new(pfade.schluessel_verzeichnis.clone());
        let aus_dateien = schluessel.laden().await?;
        if aus_dateien.public.is_some() {
            daten.lecturer_keys.public = aus_dateien.public;
        }
        if aus_dateien.private.is_some() {
            daten.lecturer_keys.private = aus_dateien.private;
        }

        if daten.lecturer_keys.ist_vollstaendig() {
            tracing::info!("Dozenten-Schluessel geladen");
        } else {
            tracing::warn!("Dozenten-Schluessel fehlen oder sind unvollstaendig");
        }

        let ids = IdGenerator::nach(daten.files.iter().map(|f| &f.id));

        tracing::info!(
            dokumente = daten.files.len(),
            klassen = daten.classes.len(),
            datei = %pfade.daten_datei.display(),
            "Speicher geoeffnet"
        );

        Ok(Self {
            pfade,
            blobs,
            schluessel,
            daten: RwLock::new(daten),
            ids,
        })
    }

    /// Momentaufnahme des gesamten Zustands
    pub async fn schnappschuss(&self) -> ServerDaten {
        self.daten.read().await.clone()
    }

    async fn persistieren(&self, daten: &ServerDaten) -> StoreResult<()> {
        let json = serde_json::to_vec_pretty(daten)?;
        atomar_schreiben(&self.pfade.daten_datei, &json, false).await?;
        tracing::debug!(bytes = json.len(), "Metadaten gespeichert");
        Ok(())
    }
}

/// Laedt den persistierten Zustand
///
/// Fehlende Datei: Standardwerte. Unlesbares JSON: Fehler im Log, Standardwerte.
async fn daten_laden(pfad: &std::path::Path) -> StoreResult<ServerDaten> {
    match tokio::fs::read(pfad).await {
        Ok(bytes) => match serde_json::from_slice::<ServerDaten>(&bytes) {
            Ok(daten) => Ok(daten),
            Err(e) => {
                tracing::error!(
                    fehler = %e,
                    datei = %pfad.display(),
                    "Metadaten nicht lesbar, starte mit Standardwerten"
                );
                Ok(ServerDaten::default())
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ServerDaten::default()),
        Err(e) => Err(e.into()),
    }
}

fn upload_datum() -> String {
    chrono::Local::now().format(UPLOAD_DATUM_FORMAT).to_string()
}

// ---------------------------------------------------------------------------
// Repository-Implementierungen
// ---------------------------------------------------------------------------

impl<B: StorageBackend> DocumentRepository for JsonStore<B> {
    async fn append_document(&self, neu: NewDocument, inhalt: &[u8]) -> StoreResult<DocumentRecord> {
        let mut daten = self.daten.write().await;

        let mut id = self.ids.naechste();
        while daten.files.iter().any(|f| f.id == id) {
            id = self.ids.naechste();
        }

        let blob = blob_schluessel(id.as_str(), &neu.name);
        self.blobs.store(&blob, inhalt).await?;

        let record = DocumentRecord {
            id,
            name: neu.name,
            size: neu.size,
            file_path: self
                .pfade
                .dateien_verzeichnis
                .join(&blob)
                .to_string_lossy()
                .into_owned(),
            mime_type: neu.mime_type,
            course: neu.course,
            doc_type: neu.doc_type,
            description: neu.description,
            upload_date: upload_datum(),
            uploader: neu.uploader,
            is_encrypted: neu.is_encrypted,
            is_signed: neu.is_signed,
            signature: neu.signature,
            lecturer_public_key: neu.lecturer_public_key,
            aes_key_base64: neu.aes_key_base64,
        };

        daten.files.push(record.clone());
        if let Err(e) = self.persistieren(&daten).await {
            daten.files.pop();
            if let Err(e) = self.blobs.delete(&blob).await {
                tracing::warn!(fehler = %e, blob = %blob, "Blob nach Fehlschlag nicht entfernt");
            }
            return Err(e);
        }

        tracing::info!(
            id = %record.id,
            name = %record.name,
            bytes = inhalt.len(),
            verschluesselt = record.is_encrypted,
            signiert = record.is_signed,
            "Dokument gespeichert"
        );
        Ok(record)
    }

    async fn list_documents(&self) -> StoreResult<Vec<DocumentRecord>> {
        Ok(self.daten.read().await.files.clone())
    }

    async fn get_document(&self, id: &DocumentId) -> StoreResult<DocumentRecord> {
        self.daten
            .read()
            .await
            .files
            .iter()
            .find(|f| &f.id == id)
            .cloned()
            .ok_or_else(|| StoreError::nicht_gefunden(format!("Dokument {id}")))
    }

    async fn read_blob(&self, file_path: &str) -> StoreResult<Vec<u8>> {
        self.blobs.retrieve(file_path).await
    }
}

impl<B: StorageBackend> ClassRepository for JsonStore<B> {
    async fn list_classes(&self) -> StoreResult<Vec<ClassEntry>> {
        Ok(self.daten.read().await.classes.clone())
    }

    async fn add_class(&self, klasse: ClassEntry) -> StoreResult<()> {
        if klasse.id.is_empty() || klasse.name.is_empty() {
            return Err(StoreError::UngueltigeDaten(
                "Klassen-ID und Name duerfen nicht leer sein".into(),
            ));
        }

        let mut daten = self.daten.write().await;
        if daten.classes.iter().any(|k| k.id == klasse.id) {
            return Err(StoreError::Duplikat(klasse.id));
        }

        daten.classes.push(klasse);
        if let Err(e) = self.persistieren(&daten).await {
            daten.classes.pop();
            return Err(e);
        }

        if let Some(k) = daten.classes.last() {
            tracing::info!(id = %k.id, name = %k.name, "Klasse hinzugefuegt");
        }
        Ok(())
    }
}

impl<B: StorageBackend> KeyPairRepository for JsonStore<B> {
    async fn load_active_key_pair(&self) -> StoreResult<ActiveKeyPair> {
        Ok(self.daten.read().await.lecturer_keys.clone())
    }

    async fn save_active_key_pair(&self, public_pem: &str, private_pem: &str) -> StoreResult<()> {
        let mut daten = self.daten.write().await;

        // Die PEM-Dateien sind massgeblich; ab hier gilt das neue Paar auch im Speicher.
        self.schluessel.speichern(public_pem, private_pem).await?;
        daten.lecturer_keys = ActiveKeyPair {
            public: Some(public_pem.to_string()),
            private: Some(private_pem.to_string()),
        };
        self.persistieren(&daten).await?;

        tracing::info!("Aktives Schluesselpaar ersetzt");
        Ok(())
    }
}
