use pantry_core::{EventSender, PantryApi, PantryConfiguration, PantryError, RemoteRepository};

use crate::reqwest_transport::ReqwestTransport;

/// Build a `RemoteRepository` talking to `config.api_base_url`.
///
/// Completions are posted to `events`; the caller applies them on its
/// control thread.
pub fn remote_repository(
    config: &PantryConfiguration,
    events: EventSender,
) -> Result<RemoteRepository<ReqwestTransport>, PantryError> {
    config
        .validate()
        .map_err(PantryError::Configuration)?;
    let transport = ReqwestTransport::new()?;
    log::info!("pantry API at {}", config.api_base_url);
    Ok(RemoteRepository::new(
        PantryApi::new(transport, &config.api_base_url),
        events,
    ))
}
