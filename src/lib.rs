pub mod auth;
pub mod builder;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod event;
pub mod storage;
mod storefront;
pub mod view;

pub use auth::{Auth, User};
pub use builder::StorefrontBuilder;
pub use cart::{CartItem, CartStore, Identity, IdentityChange, Price};
pub use catalog::{Catalog, Course};
pub use config::{CartConfig, Timing};
pub use error::CartError;
pub use event::{CartEvent, EventSender};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore, StoredCart};
pub use storefront::Storefront;
pub use view::{
    CartSnapshot, CartView, CheckoutDialog, CheckoutPhase, LineView, NavBar, Toast, ToastKind,
};
