use aishub_core::{ObserverPosition, Position};
use async_trait::async_trait;
use tokio::sync::watch;

/// Observer position shared with whoever tracks the observer, typically the host
/// feeding fixes through [`SharedObserver::update`].
#[derive(Debug, Clone)]
pub struct SharedObserver {
    sender: watch::Sender<Option<Position>>,
}

impl SharedObserver {
    pub fn new(initial: Option<Position>) -> SharedObserver {
        let (sender, _) = watch::channel(initial);
        SharedObserver { sender }
    }

    pub fn update(&self, position: Option<Position>) {
        self.sender.send_replace(position);
    }
}

#[async_trait]
impl ObserverPosition for SharedObserver {
    async fn observer_position(&self) -> Option<Position> {
        *self.sender.borrow()
    }
}
