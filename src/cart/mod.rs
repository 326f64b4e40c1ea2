mod identity;
mod item;
mod store;

pub use identity::{Identity, IdentityChange};
pub use item::{CartItem, Price};
pub use store::CartStore;
