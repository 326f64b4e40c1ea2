mod memory;
mod record;
mod sqlite;
mod store;

pub use memory::MemoryStore;
pub use record::{StoredCart, cart_key, decode_cart, encode_cart, stored_carts};
pub use sqlite::SqliteStore;
pub use store::KeyValueStore;
