use async_trait::async_trait;

use crate::Position;

/// Source of the observer's own position, `None` while no fix is available.
#[async_trait]
pub trait ObserverPosition: Send + Sync {
    async fn observer_position(&self) -> Option<Position>;
}
