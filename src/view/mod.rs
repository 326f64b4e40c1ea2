mod checkout;
mod drawer;
mod nav;
mod render;
mod timer;
mod toast;

pub use checkout::{CheckoutDialog, CheckoutPhase};
pub use drawer::CartView;
pub use nav::NavBar;
pub use render::{CartSnapshot, LineView, price_label, total_label};
pub use timer::{TimerId, Timers};
pub use toast::{Toast, ToastKind};
