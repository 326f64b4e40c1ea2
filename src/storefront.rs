use std::time::Instant;

use tracing::debug;

use crate::auth::{Auth, User};
use crate::builder::StorefrontBuilder;
use crate::cart::{CartStore, Identity, IdentityChange};
use crate::catalog::Catalog;
use crate::config::CartConfig;
use crate::error::CartError;
use crate::event::EventSender;
use crate::storage::KeyValueStore;
use crate::view::{CartSnapshot, CartView, CheckoutPhase, NavBar};

/// A page with a navigation bar and a cart drawer.
///
/// Auth changes are pushed into the [`CartStore`] as they happen. The
/// [`CartView`] only exists while the drawer is open; closing the drawer (or
/// signing out) unmounts it, which discards its dialog state and pending
/// timers.
///
/// Use [`Storefront::builder()`] to construct an instance.
pub struct Storefront {
    auth: Auth,
    store: CartStore,
    nav: NavBar,
    view: Option<CartView>,
    catalog: Catalog,
    config: CartConfig,
    events: EventSender,
}

impl Storefront {
    pub(crate) fn from_parts(
        storage: Box<dyn KeyValueStore>,
        catalog: Catalog,
        config: CartConfig,
        events: EventSender,
    ) -> Self {
        Self {
            auth: Auth::new(),
            store: CartStore::from_boxed(storage, events.clone()),
            nav: NavBar::new(),
            view: None,
            catalog,
            config,
            events,
        }
    }

    /// Create a new builder for configuring a `Storefront`.
    pub fn builder() -> StorefrontBuilder {
        StorefrontBuilder::new()
    }

    /// Sign in. Switching to another user closes the drawer.
    pub fn login(&mut self, user: User) -> IdentityChange {
        self.auth.login(user);
        let change = self.store.sync_identity(&self.auth.identity());
        if matches!(change, IdentityChange::Switched { .. }) {
            self.close_cart();
        }
        change
    }

    /// Sign out: the cart is dropped, its record deleted and the drawer closed.
    pub fn logout(&mut self) -> IdentityChange {
        self.auth.logout();
        let change = self.store.sync_identity(&self.auth.identity());
        self.close_cart();
        change
    }

    pub fn identity(&self) -> Identity {
        self.auth.identity()
    }

    pub fn user(&self) -> Option<&User> {
        self.auth.user()
    }

    pub fn greeting(&self) -> Option<String> {
        self.auth.user().map(NavBar::greeting)
    }

    pub fn store(&self) -> &CartStore {
        &self.store
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    /// Count shown on the cart icon.
    pub fn badge(&self) -> Option<usize> {
        self.nav.badge(&self.store, &self.auth.identity())
    }

    pub fn is_cart_open(&self) -> bool {
        self.nav.is_cart_open()
    }

    /// Cart icon click. Returns whether the drawer is now open.
    pub fn toggle_cart(&mut self) -> bool {
        let open = self.nav.toggle_cart(&self.auth.identity());
        if open {
            debug!("mounting cart view");
            self.view =
                Some(CartView::new(&self.config).with_events(self.events.clone()));
        } else {
            self.unmount_view();
        }
        open
    }

    /// Backdrop click.
    pub fn close_cart(&mut self) {
        self.nav.close_cart();
        self.unmount_view();
    }

    /// Put a catalog course in the cart.
    ///
    /// Goes through the drawer when it is open so the addition is announced.
    pub fn add_to_cart(&mut self, course_id: &str, now: Instant) -> Result<bool, CartError> {
        let item = self.catalog.cart_item(course_id)?;
        let added = match self.view.as_mut() {
            Some(view) => view.add(&mut self.store, item, now),
            None => self.store.add(item),
        };
        Ok(added)
    }

    /// Remove an item via its row control in the drawer, or directly when the
    /// drawer is closed.
    pub fn remove_from_cart(&mut self, id: &str, now: Instant) -> bool {
        match self.view.as_mut() {
            Some(view) => view.remove(&mut self.store, id, now),
            None => self.store.remove(id).is_some(),
        }
    }

    pub fn request_remove_all(&mut self) -> bool {
        let store = &self.store;
        self.view
            .as_mut()
            .is_some_and(|view| view.request_remove_all(store))
    }

    pub fn cancel_remove_all(&mut self) -> bool {
        self.view
            .as_mut()
            .is_some_and(|view| view.cancel_remove_all())
    }

    pub fn confirm_remove_all(&mut self) -> bool {
        let store = &mut self.store;
        self.view
            .as_mut()
            .is_some_and(|view| view.confirm_remove_all(store))
    }

    pub fn open_checkout(&mut self) -> bool {
        let store = &self.store;
        self.view
            .as_mut()
            .is_some_and(|view| view.open_checkout(store))
    }

    pub fn cancel_checkout(&mut self) -> bool {
        self.view
            .as_mut()
            .is_some_and(|view| view.cancel_checkout())
    }

    pub fn buy(&mut self, now: Instant) -> bool {
        let store = &mut self.store;
        self.view
            .as_mut()
            .is_some_and(|view| view.buy(store, now))
    }

    pub fn checkout_phase(&self) -> CheckoutPhase {
        self.view
            .as_ref()
            .map(CartView::checkout_phase)
            .unwrap_or_default()
    }

    pub fn view(&self) -> Option<&CartView> {
        self.view.as_ref()
    }

    /// The drawer contents, if the drawer is open.
    pub fn render(&self) -> Option<CartSnapshot> {
        self.view
            .as_ref()
            .map(|view| view.render(&self.store, &self.catalog))
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.view.as_ref().and_then(CartView::next_deadline)
    }

    /// Fire due view timers. Returns how many fired.
    pub fn advance(&mut self, now: Instant) -> usize {
        self.view.as_mut().map_or(0, |view| view.advance(now))
    }

    fn unmount_view(&mut self) {
        if let Some(mut view) = self.view.take() {
            view.unmount();
        }
    }
}
