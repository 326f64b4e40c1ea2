use tracing::{debug, info, warn};

use super::{CartItem, Identity, IdentityChange, Price};
use crate::event::{CartEvent, EventSender};
use crate::storage::{KeyValueStore, cart_key, decode_cart, encode_cart};

/// The cart of the currently signed-in user.
///
/// The store mirrors its items into the `cart_<userId>` record of the
/// backing [`KeyValueStore`] on every mutation. While no user is signed in
/// the cart is empty and mutations are ignored.
pub struct CartStore {
    storage: Box<dyn KeyValueStore>,
    user_id: Option<String>,
    items: Vec<CartItem>,
    events: EventSender,
}

impl CartStore {
    /// Create an anonymous (empty) store over the given backend.
    pub fn new(storage: impl KeyValueStore + 'static) -> Self {
        Self::from_boxed(Box::new(storage), EventSender::noop())
    }

    pub fn from_boxed(storage: Box<dyn KeyValueStore>, events: EventSender) -> Self {
        Self {
            storage,
            user_id: None,
            items: Vec::new(),
            events,
        }
    }

    /// Set the event sender.
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = events;
        self
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Sum of all item prices.
    pub fn total(&self) -> Price {
        self.items.iter().map(|item| &item.price).sum()
    }

    /// The signed-in user whose cart this is.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn storage(&self) -> &dyn KeyValueStore {
        self.storage.as_ref()
    }

    /// React to the current authentication signal.
    ///
    /// Delivering the same identity twice is a no-op.
    pub fn sync_identity(&mut self, identity: &Identity) -> IdentityChange {
        let change = IdentityChange::between(self.user_id.as_deref(), identity);

        match &change {
            IdentityChange::Unchanged => return change,
            IdentityChange::SignedIn { user_id } => {
                info!(user_id = %user_id, "user signed in, loading cart");
                self.activate(user_id);
            }
            IdentityChange::Switched { from, to } => {
                info!(from = %from, to = %to, "user switched, loading cart");
                self.activate(to);
            }
            IdentityChange::SignedOut { user_id } => {
                info!(user_id = %user_id, "user signed out, dropping cart");
                self.user_id = None;
                self.items.clear();
                self.delete_record(user_id);
            }
        }

        self.events.emit(CartEvent::IdentityChanged {
            user_id: self.user_id.clone(),
        });
        change
    }

    /// Append `item` unless an item with the same id is already present.
    ///
    /// Returns whether the item was added.
    pub fn add(&mut self, item: CartItem) -> bool {
        if self.user_id.is_none() {
            debug!(item_id = %item.id, "ignoring add while signed out");
            return false;
        }
        let added = !self.contains(&item.id);
        if added {
            debug!(item_id = %item.id, "adding item to cart");
            self.events.emit(CartEvent::ItemAdded {
                item_id: item.id.clone(),
            });
            self.items.push(item);
        }
        self.persist();
        added
    }

    /// Remove the item with the given id, returning it if it was present.
    pub fn remove(&mut self, id: &str) -> Option<CartItem> {
        self.user_id.as_ref()?;
        let removed = self
            .items
            .iter()
            .position(|item| item.id == id)
            .map(|index| self.items.remove(index));
        if removed.is_some() {
            debug!(item_id = %id, "removed item from cart");
            self.events.emit(CartEvent::ItemRemoved {
                item_id: id.to_string(),
            });
        }
        self.persist();
        removed
    }

    /// Empty the cart, returning how many items were removed.
    pub fn clear(&mut self) -> usize {
        if self.user_id.is_none() {
            return 0;
        }
        let removed = self.items.len();
        self.items.clear();
        debug!(removed, "cleared cart");
        self.events.emit(CartEvent::CartCleared { removed });
        self.persist();
        removed
    }

    fn activate(&mut self, user_id: &str) {
        self.user_id = Some(user_id.to_string());
        let (items, recovered) = self.load(user_id);
        self.items = items;
        self.events.emit(CartEvent::CartLoaded {
            user_id: user_id.to_string(),
            item_count: self.items.len(),
            recovered,
        });
    }

    /// Read a user's record. Absent, unreadable and unparseable records all
    /// yield an empty cart; the flag reports a record that was present but
    /// could not be used.
    fn load(&self, user_id: &str) -> (Vec<CartItem>, bool) {
        let key = cart_key(user_id);
        let raw = match self.storage.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %key, "no saved cart");
                return (Vec::new(), false);
            }
            Err(e) => {
                warn!(key = %key, error = %e, "failed to read saved cart, starting empty");
                return (Vec::new(), true);
            }
        };
        match decode_cart(&raw) {
            Ok(items) => {
                debug!(key = %key, count = items.len(), "loaded saved cart");
                (items, false)
            }
            Err(e) => {
                let reason = format!("{:#}", e);
                warn!(key = %key, error = %reason, "saved cart is unparseable, starting empty");
                (Vec::new(), true)
            }
        }
    }

    fn persist(&self) {
        let Some(user_id) = self.user_id.as_deref() else {
            return;
        };
        let result = encode_cart(&self.items)
            .and_then(|value| self.storage.set(&cart_key(user_id), &value));
        match result {
            Ok(()) => self.events.emit(CartEvent::CartPersisted {
                user_id: user_id.to_string(),
                item_count: self.items.len(),
            }),
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "failed to persist cart");
                self.events.emit(CartEvent::PersistFailed {
                    user_id: user_id.to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    fn delete_record(&self, user_id: &str) {
        match self.storage.delete(&cart_key(user_id)) {
            Ok(()) => self.events.emit(CartEvent::RecordDeleted {
                user_id: user_id.to_string(),
            }),
            Err(e) => warn!(user_id = %user_id, error = %e, "failed to delete saved cart"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn item(id: &str) -> CartItem {
        CartItem::new(id, format!("Course {}", id), "Instructor", Price::whole(100))
    }

    fn ids(store: &CartStore) -> Vec<&str> {
        store.items().iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_anonymous_mutations_are_ignored() {
        let backend = MemoryStore::new();
        let mut store = CartStore::new(backend.clone());

        assert!(!store.add(item("a")));
        assert!(store.remove("a").is_none());
        assert_eq!(store.clear(), 0);
        assert!(store.is_empty());
        assert!(backend.is_empty());
    }

    #[test]
    fn test_duplicate_add_keeps_order() {
        let mut store = CartStore::new(MemoryStore::new());
        store.sync_identity(&Identity::signed_in("u1"));

        assert!(store.add(item("a")));
        assert!(store.add(item("b")));
        assert!(!store.add(item("a")));
        assert_eq!(ids(&store), vec!["a", "b"]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut store = CartStore::new(MemoryStore::new());
        store.sync_identity(&Identity::signed_in("u1"));
        store.add(item("a"));

        assert!(store.remove("zzz").is_none());
        assert_eq!(ids(&store), vec!["a"]);
        assert_eq!(store.remove("a").map(|i| i.id), Some("a".to_string()));
        assert!(store.is_empty());
    }

    #[test]
    fn test_resync_same_identity_does_not_reload() {
        let backend = MemoryStore::new();
        let mut store = CartStore::new(backend.clone());
        store.sync_identity(&Identity::signed_in("u1"));
        store.add(item("a"));

        // Clobber the record behind the store's back; an unchanged identity
        // must not pick it up.
        backend.set("cart_u1", "[]").unwrap();
        let change = store.sync_identity(&Identity::signed_in("u1"));

        assert_eq!(change, IdentityChange::Unchanged);
        assert_eq!(ids(&store), vec!["a"]);
    }

    #[test]
    fn test_events_for_sign_in_and_add() {
        let (events, mut rx) = EventSender::channel(16);
        let mut store = CartStore::new(MemoryStore::new()).with_events(events);

        store.sync_identity(&Identity::signed_in("u1"));
        store.add(item("a"));

        assert_eq!(
            rx.try_recv().unwrap(),
            CartEvent::CartLoaded {
                user_id: "u1".to_string(),
                item_count: 0,
                recovered: false
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            CartEvent::IdentityChanged {
                user_id: Some("u1".to_string())
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            CartEvent::ItemAdded {
                item_id: "a".to_string()
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            CartEvent::CartPersisted {
                user_id: "u1".to_string(),
                item_count: 1
            }
        );
    }
}
