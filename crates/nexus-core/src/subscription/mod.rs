//! Subscription usage accounting.
//!
//! Running token counters split between platform-billed and BYOK usage,
//! plus the persistence seam the conversation loop writes through.

mod model;
mod repository;

pub use model::{SubscriptionUsage, Tier, TierLimits};
pub use repository::UsageRepository;
