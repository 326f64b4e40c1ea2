use serde::{Deserialize, Serialize};

/// Authentication signal as seen by the cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub is_authenticated: bool,
    pub user_id: Option<String>,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            is_authenticated: true,
            user_id: Some(user_id.into()),
        }
    }

    /// The user whose cart is active, if any.
    ///
    /// An authenticated identity without a user id has no cart.
    pub fn active_user(&self) -> Option<&str> {
        if self.is_authenticated {
            self.user_id.as_deref()
        } else {
            None
        }
    }
}

/// Effect of moving from the previously active user to a new identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityChange {
    /// Same user (or still anonymous); nothing to do
    Unchanged,
    /// Anonymous -> signed in; load the user's record
    SignedIn { user_id: String },
    /// One signed-in user replaced by another; load the new record
    Switched { from: String, to: String },
    /// Signed in -> anonymous; drop the cart and delete the old record
    SignedOut { user_id: String },
}

impl IdentityChange {
    pub fn between(previous: Option<&str>, next: &Identity) -> Self {
        match (previous, next.active_user()) {
            (None, None) => Self::Unchanged,
            (Some(prev), Some(next)) if prev == next => Self::Unchanged,
            (None, Some(next)) => Self::SignedIn {
                user_id: next.to_string(),
            },
            (Some(prev), Some(next)) => Self::Switched {
                from: prev.to_string(),
                to: next.to_string(),
            },
            (Some(prev), None) => Self::SignedOut {
                user_id: prev.to_string(),
            },
        }
    }

    /// User whose record must be loaded after this change.
    pub fn load_target(&self) -> Option<&str> {
        match self {
            Self::SignedIn { user_id } => Some(user_id),
            Self::Switched { to, .. } => Some(to),
            Self::Unchanged | Self::SignedOut { .. } => None,
        }
    }
}
