#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;

use course_cart::{CartItem, KeyValueStore, MemoryStore, Price};

/// A store whose writes can be switched to fail, as with a full quota.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn failing(inner: MemoryStore) -> Self {
        let store = Self::new(inner);
        store.fail_writes.store(true, Ordering::SeqCst);
        store
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("storage quota exceeded");
        }
        self.inner.set(key, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.inner.delete(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        self.inner.keys()
    }
}

pub fn item(id: &str, price: u32) -> CartItem {
    CartItem::new(
        id,
        format!("Course {}", id),
        format!("Instructor {}", id),
        Price::whole(price),
    )
}

pub fn ids(items: &[CartItem]) -> Vec<String> {
    items.iter().map(|i| i.id.clone()).collect()
}

/// Decode the record a store holds for `user_id`.
pub fn persisted(store: &dyn KeyValueStore, user_id: &str) -> Option<Vec<CartItem>> {
    let raw = store
        .get(&course_cart::storage::cart_key(user_id))
        .expect("read record")?;
    Some(course_cart::storage::decode_cart(&raw).expect("record should parse"))
}
