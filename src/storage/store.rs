use anyhow::Result;

/// Synchronous key-value backend for persisted carts
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` if the key is absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Create or overwrite a value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key; removing an absent key is not an error
    fn delete(&self, key: &str) -> Result<()>;

    /// List all keys, most recently written first
    fn keys(&self) -> Result<Vec<String>>;
}
