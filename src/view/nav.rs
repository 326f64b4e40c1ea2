use crate::auth::User;
use crate::cart::{CartStore, Identity};

/// Navigation bar state: the cart badge and whether the drawer is open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavBar {
    cart_open: bool,
}

impl NavBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cart_open(&self) -> bool {
        self.cart_open
    }

    /// Item count for the cart icon; hidden for guests and empty carts.
    pub fn badge(&self, store: &CartStore, identity: &Identity) -> Option<usize> {
        if identity.active_user().is_none() || store.is_empty() {
            None
        } else {
            Some(store.len())
        }
    }

    /// Flip the drawer. Guests have no cart icon, so nothing opens for them.
    ///
    /// Returns the new open state.
    pub fn toggle_cart(&mut self, identity: &Identity) -> bool {
        self.cart_open = identity.active_user().is_some() && !self.cart_open;
        self.cart_open
    }

    /// Backdrop click or sign-out. Returns whether the drawer was open.
    pub fn close_cart(&mut self) -> bool {
        std::mem::replace(&mut self.cart_open, false)
    }

    pub fn greeting(user: &User) -> String {
        format!("Welcome, {}", user.display_name())
    }
}
