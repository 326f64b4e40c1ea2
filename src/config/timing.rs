use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Delays for the cart view's self-dismissing UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// How long add/remove notifications stay visible (ms)
    pub toast_ms: u64,

    /// How long the purchase notification stays visible (ms)
    pub purchase_toast_ms: u64,

    /// How long the success panel shows before the dialog closes (ms)
    pub success_close_ms: u64,
}

impl Timing {
    pub fn toast(&self) -> Duration {
        Duration::from_millis(self.toast_ms)
    }

    pub fn purchase_toast(&self) -> Duration {
        Duration::from_millis(self.purchase_toast_ms)
    }

    pub fn success_close(&self) -> Duration {
        Duration::from_millis(self.success_close_ms)
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            toast_ms: 2000,
            purchase_toast_ms: 2500,
            success_close_ms: 2000,
        }
    }
}
