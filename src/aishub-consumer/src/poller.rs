use std::sync::Arc;

use aishub_core::{Delta, ObserverPosition, Translator, compute_bounding_box};
use async_channel::Sender;
use snafu::{OptionExt, ResultExt};
use tracing::{debug, instrument};

use crate::{
    aishub::AisHubClient,
    error::{
        Result,
        error::{CoreSnafu, SinkClosedSnafu},
    },
};

/// Runs a single AisHub poll: bounding box, fetch, translate, emit.
pub struct Poller {
    client: AisHubClient,
    translator: Translator,
    observer: Arc<dyn ObserverPosition>,
    box_size: f64,
    self_context: String,
    sender: Sender<Delta>,
}

impl Poller {
    pub fn new(
        client: AisHubClient,
        translator: Translator,
        observer: Arc<dyn ObserverPosition>,
        box_size: f64,
        self_context: String,
        sender: Sender<Delta>,
    ) -> Poller {
        Poller {
            client,
            translator,
            observer,
            box_size,
            self_context,
            sender,
        }
    }

    #[instrument(skip_all, fields(app.num_vessels))]
    pub async fn poll(&self) -> Result<()> {
        let Some(position) = self.observer.observer_position().await else {
            debug!("no position available");
            return Ok(());
        };
        debug!("position: {position:?}");

        let bbox = compute_bounding_box(&position, Some(self.box_size)).context(CoreSnafu)?;
        self.emit(Delta::bounding_box(&self.self_context, &bbox))
            .await?;

        let body = self.client.fetch(&bbox).await?;

        let deltas = self
            .translator
            .translate_response(&body, &self.self_context)
            .context(CoreSnafu)?;

        tracing::Span::current().record("app.num_vessels", deltas.len());

        for delta in deltas {
            self.emit(delta).await?;
        }

        Ok(())
    }

    async fn emit(&self, delta: Delta) -> Result<()> {
        self.sender
            .send(delta)
            .await
            .ok()
            .context(SinkClosedSnafu)
    }
}
