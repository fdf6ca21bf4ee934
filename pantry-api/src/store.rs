use pantry_core::{
    EventSender, ItemRepository, LocalRepository, PantryConfiguration, PantryError, StoreBackend,
};

use crate::remote::remote_repository;

/// Item store selected by `config.backend`.
///
/// The local store never posts completions, so `events` is only used by
/// the remote one.
pub fn item_repository(
    config: &PantryConfiguration,
    events: EventSender,
) -> Result<Box<dyn ItemRepository>, PantryError> {
    config.validate().map_err(PantryError::Configuration)?;
    match config.backend {
        StoreBackend::Local => {
            log::info!("local item store in {}", config.storage_directory.display());
            Ok(Box::new(LocalRepository::from_config(config)?))
        }
        StoreBackend::Remote => Ok(Box::new(remote_repository(config, events)?)),
    }
}
