//! Identity lookup.

use super::model::User;

/// Source of the "current identity". Authentication itself happens elsewhere.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_user(&self) -> Option<User>;
}

/// Single-user identity taken from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityProvider {
    user: Option<User>,
}

impl StaticIdentityProvider {
    pub fn new(user: Option<User>) -> Self {
        Self { user }
    }
}

#[async_trait::async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn current_user(&self) -> Option<User> {
        self.user.clone()
    }
}
