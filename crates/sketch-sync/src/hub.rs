use feature_engine::rebuild_document;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, instrument};

use crate::config::HubConfig;
use crate::store::SketchStore;
use crate::update::SketchUpdate;

/// The authoritative side of sync.
///
/// Holds the latest snapshot per document and fans every accepted update
/// out to all subscribers, including the publisher.
#[derive(Debug)]
pub struct SyncHub {
    config: HubConfig,
    store: SketchStore,
    sender: broadcast::Sender<SketchUpdate>,
    /// Held across store and send so broadcast order matches store order.
    publish_lock: Mutex<()>,
}

impl SyncHub {
    /// Create a hub with no documents and no subscribers.
    pub fn new(config: HubConfig) -> Self {
        let (sender, _) = broadcast::channel(config.broadcast_capacity.max(1));
        Self {
            config,
            store: SketchStore::new(),
            sender,
            publish_lock: Mutex::new(()),
        }
    }

    /// Hub settings.
    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Rebuild every body mesh, store the result last-write-wins and
    /// broadcast the stored update. Returns what was stored.
    #[instrument(skip_all, fields(document = %update.document_id, revision = update.revision))]
    pub fn publish(&self, mut update: SketchUpdate) -> SketchUpdate {
        update.document = rebuild_document(&update.document, &self.config.rebuild);
        let _guard = self.publish_lock.lock();
        let stored = self.store.put(update);
        match self.sender.send(stored.clone()) {
            Ok(receivers) => debug!(receivers, "update broadcast"),
            Err(_) => debug!("update stored, no subscribers"),
        }
        stored
    }

    /// Latest stored update for `document_id`.
    pub fn get_current(&self, document_id: &str) -> Option<SketchUpdate> {
        self.store.get(document_id)
    }

    /// A receiver for every update published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<SketchUpdate> {
        self.sender.subscribe()
    }

    /// Number of live receivers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// The authoritative store.
    pub fn store(&self) -> &SketchStore {
        &self.store
    }
}

impl Default for SyncHub {
    fn default() -> Self {
        Self::new(HubConfig::default())
    }
}
