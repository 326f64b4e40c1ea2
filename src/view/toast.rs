use serde::{Deserialize, Serialize};

/// Visual style of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToastKind {
    Info,
    Success,
}

impl std::fmt::Display for ToastKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
        }
    }
}

/// A transient notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Sequence number; a dismiss timer only clears the toast it was set for
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn added(id: u64, title: &str) -> Self {
        Self {
            id,
            kind: ToastKind::Info,
            message: format!("Added {} to cart", title),
        }
    }

    pub fn removed(id: u64, title: &str) -> Self {
        Self {
            id,
            kind: ToastKind::Info,
            message: format!("Removed {} from cart", title),
        }
    }

    pub fn purchased(id: u64) -> Self {
        Self {
            id,
            kind: ToastKind::Success,
            message: "Purchase Successful!".to_string(),
        }
    }
}
