//! Usage repository trait.

use super::model::SubscriptionUsage;
use crate::error::Result;

/// Persistence for [`SubscriptionUsage`].
///
/// The conversation loop saves after every completed turn.
#[async_trait::async_trait]
pub trait UsageRepository: Send + Sync {
    /// Returns `Ok(None)` when nothing has been stored yet.
    async fn load(&self) -> Result<Option<SubscriptionUsage>>;

    async fn save(&self, usage: &SubscriptionUsage) -> Result<()>;
}
