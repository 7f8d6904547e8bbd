//! Transport layer abstraction for sync operations.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info};

use crate::error::{SyncError, SyncResult};
use crate::hub::SyncHub;
use crate::update::SketchUpdate;

/// A live connection's inbound side.
#[derive(Debug)]
pub struct Subscription {
    /// Every update the hub broadcasts, including the subscriber's own.
    pub updates: broadcast::Receiver<SketchUpdate>,
    /// Flips to `false` when the link drops.
    pub link: watch::Receiver<bool>,
}

/// How a [`SyncClient`](crate::SyncClient) reaches a hub.
///
/// Both `connect` and `publish` must be cancel-safe: dropping the returned
/// future before it completes either has no effect or has the full effect.
pub trait SyncTransport: Send + Sync + 'static {
    /// Open a subscription to the hub's broadcasts.
    fn connect(&self) -> impl Future<Output = SyncResult<Subscription>> + Send;

    /// Deliver one update to the hub.
    fn publish(&self, update: SketchUpdate) -> impl Future<Output = SyncResult<()>> + Send;

    /// The hub's current snapshot for `document_id`, if any.
    fn get_current(
        &self,
        document_id: &str,
    ) -> impl Future<Output = SyncResult<Option<SketchUpdate>>> + Send;
}

/// In-process transport straight to an `Arc<SyncHub>`.
///
/// The link can be switched off to simulate an outage, and an artificial
/// latency can be added to every call.
#[derive(Debug)]
pub struct LocalTransport {
    hub: Arc<SyncHub>,
    available: AtomicBool,
    latency: RwLock<Duration>,
    link: watch::Sender<bool>,
}

impl LocalTransport {
    /// A transport that reaches `hub` in-process.
    pub fn new(hub: Arc<SyncHub>) -> Self {
        let (link, _) = watch::channel(true);
        Self {
            hub,
            available: AtomicBool::new(true),
            latency: RwLock::new(Duration::ZERO),
            link,
        }
    }

    /// Delay every transport call by `latency`.
    pub fn with_latency(self, latency: Duration) -> Self {
        *self.latency.write() = latency;
        self
    }

    /// Change the artificial delay at runtime.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.write() = latency;
    }

    /// Switch the link on or off. Switching off drops every open
    /// subscription.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
        self.link.send_replace(available);
        info!(available, "local link switched");
    }

    /// Whether the link is currently up.
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    pub fn hub(&self) -> &Arc<SyncHub> {
        &self.hub
    }

    async fn round_trip(&self) -> SyncResult<()> {
        let latency = *self.latency.read();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if self.is_available() {
            Ok(())
        } else {
            Err(SyncError::unavailable("local link is down"))
        }
    }
}

impl SyncTransport for LocalTransport {
    async fn connect(&self) -> SyncResult<Subscription> {
        self.round_trip().await?;
        debug!(subscribers = self.hub.subscriber_count() + 1, "subscribed to hub");
        Ok(Subscription {
            updates: self.hub.subscribe(),
            link: self.link.subscribe(),
        })
    }

    async fn publish(&self, update: SketchUpdate) -> SyncResult<()> {
        self.round_trip().await?;
        self.hub.publish(update);
        Ok(())
    }

    async fn get_current(&self, document_id: &str) -> SyncResult<Option<SketchUpdate>> {
        self.round_trip().await?;
        Ok(self.hub.get_current(document_id))
    }
}
