use anyhow::{Context, Result};
use tracing::warn;

use super::KeyValueStore;
use crate::cart::{CartItem, Price};

const CART_KEY_PREFIX: &str = "cart_";

/// Storage key holding a user's cart.
pub fn cart_key(user_id: &str) -> String {
    format!("{}{}", CART_KEY_PREFIX, user_id)
}

pub fn encode_cart(items: &[CartItem]) -> Result<String> {
    serde_json::to_string(items).context("failed to serialize cart")
}

/// Parse a persisted cart. Duplicate ids keep their first occurrence.
pub fn decode_cart(raw: &str) -> Result<Vec<CartItem>> {
    let parsed: Vec<CartItem> = serde_json::from_str(raw).context("failed to parse cart record")?;
    let mut items: Vec<CartItem> = Vec::with_capacity(parsed.len());
    for item in parsed {
        if !items.iter().any(|existing| existing.id == item.id) {
            items.push(item);
        }
    }
    Ok(items)
}

/// A persisted cart found in the store, for listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCart {
    pub user_id: String,
    pub items: Vec<CartItem>,
}

impl StoredCart {
    pub fn total(&self) -> Price {
        self.items.iter().map(|item| &item.price).sum()
    }
}

impl std::fmt::Display for StoredCart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let user: String = if self.user_id.chars().count() > 20 {
            self.user_id.chars().take(17).collect::<String>() + "..."
        } else {
            self.user_id.clone()
        };

        write!(f, "{:<20} {:>5} {:>10}", user, self.items.len(), self.total())
    }
}

/// All parseable carts in the store, most recently written first.
///
/// Unparseable records are skipped with a warning.
pub fn stored_carts(store: &dyn KeyValueStore) -> Result<Vec<StoredCart>> {
    let mut carts = Vec::new();
    for key in store.keys()? {
        let Some(user_id) = key.strip_prefix(CART_KEY_PREFIX) else {
            continue;
        };
        let Some(raw) = store.get(&key)? else {
            continue;
        };
        match decode_cart(&raw) {
            Ok(items) => carts.push(StoredCart {
                user_id: user_id.to_string(),
                items,
            }),
            Err(e) => warn!(key = %key, error = %e, "skipping unparseable cart record"),
        }
    }
    Ok(carts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn item(id: &str, price: u32) -> CartItem {
        CartItem::new(id, format!("Course {}", id), "Instructor", Price::whole(price))
    }

    #[test]
    fn test_cart_key_convention() {
        assert_eq!(cart_key("42"), "cart_42");
    }

    #[test]
    fn test_record_value_format() {
        let raw = encode_cart(&[item("a", 500)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let entry = &value[0];
        assert_eq!(entry["id"], "a");
        assert_eq!(entry["title"], "Course a");
        assert_eq!(entry["instructor"], "Instructor");
        assert_eq!(entry["price"].as_f64(), Some(500.0));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_cart("not json").is_err());
        assert!(decode_cart(r#"{"id":"a"}"#).is_err());
        assert!(decode_cart(r#"[{"id":"a"}]"#).is_err());
    }

    #[test]
    fn test_decode_drops_duplicate_ids() {
        let raw = r#"[
            {"id":"a","title":"A","instructor":"x","price":1},
            {"id":"b","title":"B","instructor":"y","price":2},
            {"id":"a","title":"A again","instructor":"z","price":3}
        ]"#;
        let items = decode_cart(raw).unwrap();
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(items[0].title, "A");
    }

    #[test]
    fn test_stored_carts_skips_foreign_and_broken_keys() {
        let store = MemoryStore::new();
        store.set("theme", "dark").unwrap();
        store.set("cart_broken", "{").unwrap();
        store
            .set("cart_u1", &encode_cart(&[item("a", 500), item("b", 0)]).unwrap())
            .unwrap();

        let carts = stored_carts(&store).unwrap();
        assert_eq!(carts.len(), 1);
        assert_eq!(carts[0].user_id, "u1");
        assert_eq!(carts[0].total(), Price::whole(500));
    }
}
