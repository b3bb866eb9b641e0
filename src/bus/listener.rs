//! NATS subscription loop feeding the dispatcher

use std::sync::Arc;

use anyhow::{Context, Result};
use async_nats::Client;
use futures::StreamExt;
use tracing::{debug, error, info};

use super::dispatcher::{Dispatcher, Operation};

/// Binds one subscriber per operation subject and pumps inbound
/// messages into the [`Dispatcher`].
///
/// Messages on the same subject may be handled concurrently: every
/// inbound message gets its own task, so a slow storage call never
/// stalls the delivery stream. Replies are published only when the
/// message carries a reply subject; otherwise the result is logged and
/// discarded.
pub struct BusListener {
    client: Client,
    dispatcher: Arc<Dispatcher>,
}

impl BusListener {
    pub fn new(client: Client, dispatcher: Arc<Dispatcher>) -> Self {
        Self { client, dispatcher }
    }

    /// Subscribe to every operation subject.
    ///
    /// Returns once all subscriptions are established; consumption
    /// continues on background tasks until the connection closes.
    pub async fn run(&self) -> Result<()> {
        for op in Operation::ALL {
            let subscriber = self
                .client
                .subscribe(op.subject())
                .await
                .with_context(|| format!("Failed to subscribe to {}", op.subject()))?;

            let client = self.client.clone();
            let dispatcher = self.dispatcher.clone();
            tokio::spawn(async move {
                consume(subscriber, client, dispatcher, op).await;
            });

            info!(subject = op.subject(), "Subscribed");
        }

        info!("Listening for invoice requests");
        Ok(())
    }
}

async fn consume(
    mut subscriber: async_nats::Subscriber,
    client: Client,
    dispatcher: Arc<Dispatcher>,
    op: Operation,
) {
    while let Some(msg) = subscriber.next().await {
        let client = client.clone();
        let dispatcher = dispatcher.clone();

        tokio::spawn(async move {
            let reply = dispatcher.dispatch(op, &msg.payload).await;

            match msg.reply {
                Some(reply_subject) => {
                    if let Err(e) = client.publish(reply_subject, reply.into()).await {
                        error!(subject = op.subject(), error = %e, "Failed to publish reply");
                    }
                }
                None => {
                    debug!(subject = op.subject(), "No reply subject, result discarded");
                }
            }
        });
    }

    debug!(subject = op.subject(), "Subscriber stream ended");
}
