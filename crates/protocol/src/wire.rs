//! Wire-Format: JSON-Umschlag `{ "action": string, "data": object }`
//!
//! Dekodierung in zwei Stufen:
//! 1. Umschlag als `serde_json::Value` lesen und die Aktion bestimmen
//! 2. `data` gegen das Schema der Aktion pruefen
//!
//! Unbekannte Felder werden ignoriert. Ein fehlendes Pflichtfeld ergibt
//! `MISSING_FIELD`, ein Feld mit falschem Typ `MALFORMED_MESSAGE`.
//! `data` darf fehlen oder `null` sein und gilt dann als leeres Objekt.

use base64::{engine::general_purpose::STANDARD as B64, Engine};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use skriptorium_core::{ClassEntry, DocumentId, Signatur};

use crate::control::{aktion, Anfrage, Antwort, DownloadRequest, UploadRequest};
use crate::error::ProtocolError;

/// MIME-Typ, wenn der Client keinen angibt
pub const DEFAULT_FILE_TYPE: &str = "application/octet-stream";

/// Uploader, wenn der Client keinen angibt
pub const DEFAULT_UPLOADER: &str = "Unknown";

// ---------------------------------------------------------------------------
// Rohe Payload-Schemata
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadDaten {
    file_name: Option<String>,
    file_content: Option<String>,
    original_file_content: Option<String>,
    is_encrypted: Option<bool>,
    is_signed: Option<bool>,
    course: Option<String>,
    doc_type: Option<String>,
    description: Option<String>,
    uploader: Option<String>,
    file_type: Option<String>,
    aes_key_base64: Option<String>,
    signature: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DownloadDaten {
    file_id: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct KlassenDaten {
    id: Option<String>,
    name: Option<String>,
}

// ---------------------------------------------------------------------------
// Dekodierung
// ---------------------------------------------------------------------------

/// Dekodiert eine Text-Nachricht zu einer typisierten Anfrage
///
/// Der zurueckgegebene Fehler ist direkt als Antwort verwendbar und traegt
/// bereits die passende `action`.
pub fn anfrage_dekodieren(text: &str) -> Result<Anfrage, ProtocolError> {
    let wert: Value = serde_json::from_str(text).map_err(|_| ProtocolError::ungueltiges_json())?;
    let Value::Object(mut umschlag) = wert else {
        return Err(ProtocolError::ungueltiges_json());
    };

    let name = match umschlag.get("action") {
        Some(Value::String(s)) => s.clone(),
        _ => return Err(ProtocolError::ungueltige_aktion(aktion::UNKNOWN)),
    };

    let daten = match umschlag.remove("data") {
        None | Some(Value::Null) => Value::Object(Map::new()),
        Some(v @ Value::Object(_)) => v,
        Some(_) => {
            return Err(ProtocolError::fehlerhaft(
                name,
                "Field 'data' must be an object.",
            ))
        }
    };

    match name.as_str() {
        aktion::UPLOAD_FILE => upload_dekodieren(daten).map(Anfrage::UploadFile),
        aktion::GET_FILES => Ok(Anfrage::GetFiles),
        aktion::DOWNLOAD_FILE => download_dekodieren(daten).map(Anfrage::DownloadFile),
        aktion::GET_LECTURER_KEYS => Ok(Anfrage::GetLecturerKeys),
        aktion::GENERATE_LECTURER_KEYS => Ok(Anfrage::GenerateLecturerKeys),
        aktion::GET_CLASSES => Ok(Anfrage::GetClasses),
        aktion::ADD_CLASS => klasse_dekodieren(daten).map(Anfrage::AddClass),
        _ => Err(ProtocolError::ungueltige_aktion(name)),
    }
}

/// Serialisiert eine Antwort als JSON-Text
pub fn antwort_kodieren(antwort: &Antwort) -> serde_json::Result<String> {
    serde_json::to_string(antwort)
}

fn schema_lesen<T: DeserializeOwned>(action: &str, daten: Value) -> Result<T, ProtocolError> {
    serde_json::from_value(daten)
        .map_err(|e| ProtocolError::fehlerhaft(action, format!("Invalid field type: {e}")))
}

fn pflicht<T>(action: &str, feld: &str, wert: Option<T>) -> Result<T, ProtocolError> {
    wert.ok_or_else(|| ProtocolError::fehlendes_feld(action, feld))
}

fn base64_lesen(action: &str, feld: &str, text: &str) -> Result<Vec<u8>, ProtocolError> {
    B64.decode(text.trim())
        .map_err(|_| ProtocolError::fehlerhaft(action, format!("Field '{feld}' is not valid base64.")))
}

fn upload_dekodieren(daten: Value) -> Result<UploadRequest, ProtocolError> {
    const A: &str = aktion::UPLOAD_FILE;
    let roh: UploadDaten = schema_lesen(A, daten)?;

    let file_name = pflicht(A, "fileName", roh.file_name)?;
    let file_content = pflicht(A, "fileContent", roh.file_content)?;
    let original_file_content = pflicht(A, "originalFileContent", roh.original_file_content)?;

    let signature = match roh.signature.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(text) => Some(Signatur::from_base64(text).map_err(|_| {
            ProtocolError::fehlerhaft(A, "Field 'signature' is not valid base64.")
        })?),
    };

    Ok(UploadRequest {
        file_content: base64_lesen(A, "fileContent", &file_content)?,
        original_file_content: base64_lesen(A, "originalFileContent", &original_file_content)?,
        file_name,
        is_encrypted: roh.is_encrypted.unwrap_or(false),
        is_signed: roh.is_signed.unwrap_or(false),
        course: roh.course,
        doc_type: roh.doc_type,
        description: roh.description.unwrap_or_default(),
        uploader: roh.uploader.unwrap_or_else(|| DEFAULT_UPLOADER.to_string()),
        file_type: roh.file_type.unwrap_or_else(|| DEFAULT_FILE_TYPE.to_string()),
        aes_key_base64: roh.aes_key_base64.filter(|k| !k.is_empty()),
        signature,
    })
}

fn download_dekodieren(daten: Value) -> Result<DownloadRequest, ProtocolError> {
    const A: &str = aktion::DOWNLOAD_FILE;
    let roh: DownloadDaten = schema_lesen(A, daten)?;

    // IDs sind Strings; numerische IDs aus JavaScript-Clients werden akzeptiert
    let file_id = match pflicht(A, "fileId", roh.file_id)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Null => return Err(ProtocolError::fehlendes_feld(A, "fileId")),
        _ => return Err(ProtocolError::fehlerhaft(A, "Field 'fileId' must be a string.")),
    };

    Ok(DownloadRequest {
        file_id: DocumentId::new(file_id),
    })
}

fn klasse_dekodieren(daten: Value) -> Result<ClassEntry, ProtocolError> {
    const A: &str = aktion::ADD_CLASS;
    let roh: KlassenDaten = schema_lesen(A, daten)?;

    match (roh.id, roh.name) {
        (Some(id), Some(name)) if !id.is_empty() && !name.is_empty() => Ok(ClassEntry::new(id, name)),
        _ => Err(ProtocolError::new(
            A,
            crate::control::ErrorCode::MissingField,
            "Class ID and Name are required.",
        )),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
