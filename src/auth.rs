use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cart::Identity;

/// A signed-in shopper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
}

impl User {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            email: email.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name if set and non-blank, otherwise the email.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }
}

/// In-process authentication state
#[derive(Debug, Clone, Default)]
pub struct Auth {
    user: Option<User>,
}

impl Auth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&mut self, user: User) {
        info!(user_id = %user.id, "logged in");
        self.user = Some(user);
    }

    /// Returns the user who was signed in, if any.
    pub fn logout(&mut self) -> Option<User> {
        let user = self.user.take();
        if let Some(ref user) = user {
            info!(user_id = %user.id, "logged out");
        }
        user
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn identity(&self) -> Identity {
        match self.user {
            Some(ref user) => Identity::signed_in(user.id.clone()),
            None => Identity::anonymous(),
        }
    }
}
