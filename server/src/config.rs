//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass der Server ohne Konfigurationsdatei
//! lauffaehig ist.

use serde::{Deserialize, Serialize};
use skriptorium_store::SpeicherPfade;
use skriptorium_transfer::server_state::DEFAULT_MAX_NACHRICHT_BYTES;
use skriptorium_transfer::TransferConfig;
use std::path::PathBuf;

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Netzwerk-Einstellungen
    pub netzwerk: NetzwerkEinstellungen,
    /// Ablage fuer Blobs, Schluesseldateien und Metadaten
    pub speicher: SpeicherEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
}

/// Netzwerk-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetzwerkEinstellungen {
    /// Bind-Adresse des WebSocket-Listeners
    pub host: String,
    /// Port des WebSocket-Listeners
    pub port: u16,
    /// Obergrenze fuer eingehende Nachrichten in Bytes
    pub max_nachricht_bytes: usize,
}

impl Default for NetzwerkEinstellungen {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 65432,
            max_nachricht_bytes: DEFAULT_MAX_NACHRICHT_BYTES,
        }
    }
}

/// Speicher-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeicherEinstellungen {
    pub dateien_verzeichnis: PathBuf,
    pub schluessel_verzeichnis: PathBuf,
    /// JSON-Datei mit Dokument-Datensaetzen, Klassen und Schluesseln
    pub daten_datei: PathBuf,
}

impl Default for SpeicherEinstellungen {
    fn default() -> Self {
        Self {
            dateien_verzeichnis: "files".into(),
            schluessel_verzeichnis: "keys".into(),
            daten_datei: "server_data.json".into(),
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "text" oder "json"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config: Self = toml::from_str(&inhalt)
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    /// Gibt die vollstaendige Bind-Adresse des WebSocket-Listeners zurueck
    pub fn bind_adresse(&self) -> String {
        format!("{}:{}", self.netzwerk.host, self.netzwerk.port)
    }

    pub fn speicher_pfade(&self) -> SpeicherPfade {
        SpeicherPfade::new(
            &self.speicher.dateien_verzeichnis,
            &self.speicher.schluessel_verzeichnis,
            &self.speicher.daten_datei,
        )
    }

    pub fn transfer_config(&self) -> TransferConfig {
        TransferConfig {
            max_nachricht_bytes: self.netzwerk.max_nachricht_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_config_ist_valide() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.netzwerk.port, 65432);
        assert_eq!(cfg.netzwerk.max_nachricht_bytes, 16 * 1024 * 1024);
        assert_eq!(cfg.speicher.daten_datei, PathBuf::from("server_data.json"));
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.logging.format, "text");
    }

    #[test]
    fn bind_adresse() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.bind_adresse(), "127.0.0.1:65432");
    }

    #[test]
    fn config_aus_toml_string() {
        let toml = r#"
            [netzwerk]
            host = "0.0.0.0"
            max_nachricht_bytes = 1024

            [speicher]
            dateien_verzeichnis = "/var/lib/skriptorium/files"
        "#;
        let cfg: ServerConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.bind_adresse(), "0.0.0.0:65432");
        assert_eq!(cfg.transfer_config().max_nachricht_bytes, 1024);

        // Nicht angegebene Felder behalten Standardwerte
        let pfade = cfg.speicher_pfade();
        assert_eq!(pfade.dateien_verzeichnis, PathBuf::from("/var/lib/skriptorium/files"));
        assert_eq!(pfade.schluessel_verzeichnis, PathBuf::from("keys"));
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn fehlende_datei_liefert_standardwerte() {
        let dir = tempfile::tempdir().unwrap();
        let pfad = dir.path().join("gibt-es-nicht.toml");
        let cfg = ServerConfig::laden(pfad.to_str().unwrap()).unwrap();
        assert_eq!(cfg.netzwerk.port, 65432);
    }

    #[test]
    fn kaputte_datei_ist_ein_fehler() {
        let dir = tempfile::tempdir().unwrap();
        let pfad = dir.path().join("config.toml");
        std::fs::write(&pfad, "[netzwerk\nport = ").unwrap();

        let fehler = ServerConfig::laden(pfad.to_str().unwrap()).unwrap_err();
        assert!(fehler.to_string().contains("Konfigurationsfehler"));
    }

    #[test]
    fn datei_wird_gelesen() {
        let dir = tempfile::tempdir().unwrap();
        let pfad = dir.path().join("config.toml");
        std::fs::write(&pfad, "[netzwerk]\nport = 9000\n\n[logging]\nformat = \"json\"\n").unwrap();

        let cfg = ServerConfig::laden(pfad.to_str().unwrap()).unwrap();
        assert_eq!(cfg.netzwerk.port, 9000);
        assert_eq!(cfg.logging.format, "json");
    }
}
