use tokio::sync::mpsc;

use crate::cart::Price;
use crate::view::{CheckoutPhase, ToastKind};

/// Default capacity for [`EventSender::channel`].
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Events emitted by the cart store and the cart view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// The active user changed (None = anonymous)
    IdentityChanged { user_id: Option<String> },
    /// A user's persisted cart was loaded
    ///
    /// `recovered` is set when the record existed but could not be parsed.
    CartLoaded {
        user_id: String,
        item_count: usize,
        recovered: bool,
    },
    /// An item was appended to the cart
    ItemAdded { item_id: String },
    /// An item was removed from the cart
    ItemRemoved { item_id: String },
    /// The cart was emptied
    CartCleared { removed: usize },
    /// The cart was written to storage
    CartPersisted { user_id: String, item_count: usize },
    /// Writing the cart failed; the in-memory cart is still authoritative
    PersistFailed { user_id: String, error: String },
    /// A signed-out user's record was deleted
    RecordDeleted { user_id: String },
    /// The checkout dialog moved to a new phase
    CheckoutPhaseChanged { phase: CheckoutPhase },
    /// A purchase completed and the cart was emptied
    PurchaseCompleted { item_count: usize, total: Price },
    /// The user confirmed "remove all"
    CartAbandoned { item_count: usize },
    /// A notification was shown
    ToastShown { kind: ToastKind, message: String },
    /// The current notification was dismissed
    ToastDismissed,
}

/// Sender for cart events.
///
/// Wraps a `tokio::sync::mpsc::Sender<CartEvent>`. Sends never block: when
/// the channel is full or closed the event is dropped. If constructed with
/// `noop()`, all sends are silently dropped.
#[derive(Debug, Clone, Default)]
pub struct EventSender {
    inner: Option<mpsc::Sender<CartEvent>>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<CartEvent>) -> Self {
        Self {
            inner: Some(sender),
        }
    }

    /// Create a sender together with its receiving end.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<CartEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }

    /// Create a no-op sender that silently drops all events.
    pub fn noop() -> Self {
        Self { inner: None }
    }

    /// Emit an event (best-effort, drops on backpressure).
    pub fn emit(&self, event: CartEvent) {
        if let Some(ref sender) = self.inner {
            let _ = sender.try_send(event);
        }
    }

    /// Returns true if this sender is connected (not noop).
    pub fn is_active(&self) -> bool {
        self.inner.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_sender_drops_events() {
        let sender = EventSender::noop();
        assert!(!sender.is_active());
        sender.emit(CartEvent::ToastDismissed);
    }

    #[test]
    fn test_channel_delivers_in_order() {
        let (sender, mut rx) = EventSender::channel(4);
        sender.emit(CartEvent::ItemAdded {
            item_id: "a".to_string(),
        });
        sender.emit(CartEvent::ItemRemoved {
            item_id: "a".to_string(),
        });

        assert_eq!(
            rx.try_recv().unwrap(),
            CartEvent::ItemAdded {
                item_id: "a".to_string()
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            CartEvent::ItemRemoved {
                item_id: "a".to_string()
            }
        );
    }

    #[test]
    fn test_full_channel_drops_instead_of_blocking() {
        let (sender, mut rx) = EventSender::channel(1);
        sender.emit(CartEvent::ToastDismissed);
        sender.emit(CartEvent::CartCleared { removed: 0 });

        assert_eq!(rx.try_recv().unwrap(), CartEvent::ToastDismissed);
        assert!(rx.try_recv().is_err());
    }
}
