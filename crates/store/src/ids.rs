//! Vergabe von Dokument-IDs
//!
//! IDs sind Mikrosekunden seit der Unix-Epoche als Dezimalstring. Der
//! Generator ist prozessweit streng monoton: zwei Aufrufe in derselben
//! Mikrosekunde (oder nach einem Uhrsprung zurueck) liefern trotzdem
//! verschiedene, aufsteigende Werte.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use skriptorium_core::DocumentId;

#[derive(Debug, Default)]
pub struct IdGenerator {
    letzte: AtomicU64,
}

impl IdGenerator {
    /// Erstellt einen Generator, der nur Werte groesser `untergrenze` liefert
    pub fn neu(untergrenze: u64) -> Self {
        Self {
            letzte: AtomicU64::new(untergrenze),
        }
    }

    /// Erstellt einen Generator oberhalb aller numerischen Bestands-IDs
    pub fn nach<'a>(bestand: impl IntoIterator<Item = &'a DocumentId>) -> Self {
        let max = bestand
            .into_iter()
            .filter_map(|id| id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self::neu(max)
    }

    /// Naechste freie ID
    pub fn naechste(&self) -> DocumentId {
        let jetzt = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as u64)
            .unwrap_or(0);

        let mut letzte = self.letzte.load(Ordering::Relaxed);
        loop {
            let kandidat = jetzt.max(letzte.saturating_add(1));
            match self.letzte.compare_exchange_weak(
                letzte,
                kandidat,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return DocumentId::new(kandidat.to_string()),
                Err(aktuell) => letzte = aktuell,
            }
        }
    }
}
