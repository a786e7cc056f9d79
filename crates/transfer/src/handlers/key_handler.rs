//! Schluessel-Handler – aktives Schluesselpaar abfragen und erneuern
//!
//! Beide Aktionen liefern auch den privaten Schluessel aus. Das ist das
//! dokumentierte Verhalten des Demo-Protokolls (Signieren im Browser) und
//! fuer eine echte Vertrauensgrenze ungeeignet.

use skriptorium_protocol::control::{aktion, AntwortInhalt, KeyPairResponse};
use skriptorium_protocol::Antwort;
use std::sync::Arc;

use crate::error::TransferError;
use crate::handlers::fehler_antwort;
use crate::server_state::{TransferSpeicher, TransferState};

/// Liefert das aktive Schluesselpaar (Haelften koennen fehlen)
pub async fn handle_get_lecturer_keys<S: TransferSpeicher>(
    state: &Arc<TransferState<S>>,
) -> Antwort {
    match state.store.load_active_key_pair().await {
        Ok(paar) => Antwort::erfolg(
            aktion::GET_LECTURER_KEYS,
            AntwortInhalt::Schluessel(KeyPairResponse {
                public_key: paar.public,
                private_key: paar.private,
            }),
        ),
        Err(e) => fehler_antwort(aktion::GET_LECTURER_KEYS, e, "Error reading lecturer keys."),
    }
}

/// Erzeugt ein neues Schluesselpaar und aktiviert es
///
/// Bestehende Dokumente behalten ihren eigenen oeffentlichen Schluessel und
/// bleiben damit pruefbar.
pub async fn handle_generate_lecturer_keys<S: TransferSpeicher>(
    state: &Arc<TransferState<S>>,
) -> Antwort {
    const A: &str = aktion::GENERATE_LECTURER_KEYS;

    let paar = match tokio::task::spawn_blocking(skriptorium_crypto::generate_signing_key_pair)
        .await
        .map_err(TransferError::from)
        .and_then(|r| r.map_err(TransferError::from))
    {
        Ok(paar) => paar,
        Err(e) => {
            let message = format!("Error generating keys: {e}");
            return fehler_antwort(A, e, message);
        }
    };

    if let Err(e) = state
        .store
        .save_active_key_pair(&paar.public_pem, &paar.private_pem)
        .await
    {
        let message = format!("Error saving keys: {e}");
        return fehler_antwort(A, e, message);
    }

    tracing::info!("Neues Dozenten-Schluesselpaar generiert und aktiviert");

    Antwort::erfolg(
        A,
        AntwortInhalt::Schluessel(KeyPairResponse {
            public_key: Some(paar.public_pem),
            private_key: Some(paar.private_pem),
        }),
    )
}
