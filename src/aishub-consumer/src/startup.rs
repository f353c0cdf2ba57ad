use std::{sync::Arc, time::Duration};

use aishub_core::{Delta, ObserverPosition, Translator};
use async_channel::Receiver;
use tokio::{
    sync::oneshot,
    task::JoinHandle,
    time::{Interval, MissedTickBehavior},
};
use tracing::{error, info, instrument};

use crate::{aishub::AisHubClient, error::Error, error::Result, poller::Poller, settings::Settings};

pub struct App {
    poller: Poller,
    update_interval: Duration,
}

/// Owned handle to a running poll loop, the loop also stops when the handle is dropped.
pub struct PollerHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl App {
    /// Builds the app and the receiving end of all deltas it produces.
    ///
    /// The app holds no receiver, the poll loop stops once every receiver is dropped.
    pub fn build(
        settings: &Settings,
        observer: Arc<dyn ObserverPosition>,
    ) -> (App, Receiver<Delta>) {
        let (sender, receiver) = async_channel::bounded::<Delta>(settings.channel_buffer_size);

        let client = AisHubClient::new(
            settings.url.clone(),
            settings.api_key.clone(),
            settings.max_retries,
        );

        let poller = Poller::new(
            client,
            Translator::default(),
            observer,
            settings.box_size(),
            settings.self_context(),
            sender,
        );

        let app = App {
            poller,
            update_interval: settings.update_interval(),
        };

        (app, receiver)
    }

    pub async fn run_single(&self) -> Result<()> {
        self.poller.poll().await
    }

    /// Starts polling, the first poll runs immediately.
    pub fn start(self) -> PollerHandle {
        let (shutdown, mut shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(async move {
            let mut interval = poll_interval(self.update_interval);
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = interval.tick() => {}
                }
                // A cycle can stall on a full channel or on retries.
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    res = self.run_cycle() => {
                        if let Err(Error::SinkClosed { .. }) = res {
                            error!("delta receiver dropped, stopping poll loop");
                            break;
                        }
                    }
                }
            }
            info!("poll loop stopped");
        });

        PollerHandle { shutdown, task }
    }

    #[instrument(skip_all)]
    async fn run_cycle(&self) -> Result<()> {
        let res = self.run_single().await;
        if let Err(e) = &res {
            error!("aishub poll failed: {e:?}");
        }
        res
    }
}

/// Ticks are delayed after a slow cycle instead of bursting, AisHub rate limits per minute.
fn poll_interval(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

impl PollerHandle {
    pub async fn stop(self) {
        // The loop might already have exited on its own.
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            error!("poll loop panicked: {e:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_poll_interval_delays_missed_ticks() {
        let interval = poll_interval(Duration::from_secs(61));
        assert_eq!(MissedTickBehavior::Delay, interval.missed_tick_behavior());
        assert_eq!(Duration::from_secs(61), interval.period());
    }
}
