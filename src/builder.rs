use std::path::Path;

use tracing::debug;

use crate::catalog::Catalog;
use crate::config::CartConfig;
use crate::error::CartError;
use crate::event::EventSender;
use crate::storage::{KeyValueStore, MemoryStore, SqliteStore};
use crate::storefront::Storefront;

/// Builder for constructing a [`Storefront`].
///
/// # Example
///
/// ```
/// # use course_cart::{Storefront, User};
/// # use std::time::Instant;
/// # fn example() -> Result<(), course_cart::CartError> {
/// let mut shop = Storefront::builder().memory_storage().build()?;
///
/// shop.login(User::new("u1", "u1@example.com"));
/// shop.add_to_cart("1", Instant::now())?;
/// assert_eq!(shop.badge(), Some(1));
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct StorefrontBuilder {
    storage: Option<Box<dyn KeyValueStore>>,
    catalog: Option<Catalog>,
    config: CartConfig,
    events: EventSender,
}

impl StorefrontBuilder {
    pub fn new() -> Self {
        Self {
            storage: None,
            catalog: None,
            config: CartConfig::default(),
            events: EventSender::noop(),
        }
    }

    /// Set a custom storage backend.
    pub fn storage(mut self, storage: impl KeyValueStore + 'static) -> Self {
        self.storage = Some(Box::new(storage));
        self
    }

    /// Keep carts in memory only.
    pub fn memory_storage(self) -> Self {
        self.storage(MemoryStore::new())
    }

    /// Use SQLite storage at the configured path, or the default location
    /// (~/.course-cart/carts.db).
    ///
    /// Call after [`config`](Self::config) / [`from_config`](Self::from_config)
    /// so a configured path is honored.
    pub fn sqlite_storage(mut self) -> Result<Self, CartError> {
        let storage = match self.config.storage_path {
            Some(ref path) => SqliteStore::new(path),
            None => SqliteStore::default_location(),
        }
        .map_err(|e| CartError::Storage(format!("failed to initialize SQLite storage: {:#}", e)))?;
        debug!(path = %storage.path().display(), "using SQLite storage");
        self.storage = Some(Box::new(storage));
        Ok(self)
    }

    /// Set a custom catalog (overrides the configured or built-in one).
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn config(mut self, config: CartConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration files.
    ///
    /// Precedence: `explicit` > project file > global file > defaults.
    pub fn from_config(mut self, explicit: Option<&Path>) -> Result<Self, CartError> {
        self.config = CartConfig::load(explicit)?;
        debug!("loaded storefront configuration");
        Ok(self)
    }

    /// Set the event sender shared by the store and the cart view.
    pub fn events(mut self, events: EventSender) -> Self {
        self.events = events;
        self
    }

    /// Build the [`Storefront`].
    ///
    /// Fails if no storage has been configured or the configured catalog
    /// cannot be loaded.
    pub fn build(self) -> Result<Storefront, CartError> {
        let storage = self
            .storage
            .ok_or_else(|| CartError::Config("no cart storage configured".to_string()))?;

        let catalog = match (self.catalog, self.config.catalog_path.as_ref()) {
            (Some(catalog), _) => catalog,
            (None, Some(path)) => Catalog::from_file(path)?,
            (None, None) => Catalog::builtin(),
        };

        Ok(Storefront::from_parts(
            storage,
            catalog,
            self.config,
            self.events,
        ))
    }
}

impl Default for StorefrontBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_storage_fails() {
        let err = StorefrontBuilder::new().build().err().unwrap();
        assert!(err.to_string().contains("no cart storage configured"));
    }

    #[test]
    fn test_explicit_catalog_wins() {
        let catalog = Catalog::from_toml(
            "[[courses]]\nid = \"x\"\ntitle = \"X\"\ninstructor = \"y\"\nprice = 1",
        )
        .unwrap();
        let shop = StorefrontBuilder::new()
            .memory_storage()
            .catalog(catalog)
            .build()
            .unwrap();
        assert_eq!(shop.catalog().len(), 1);
    }

    #[test]
    fn test_missing_catalog_file_fails() {
        let config = CartConfig {
            catalog_path: Some("/no/such/catalog.toml".into()),
            ..CartConfig::default()
        };
        let result = StorefrontBuilder::new()
            .memory_storage()
            .config(config)
            .build();
        assert!(result.is_err());
    }
}
