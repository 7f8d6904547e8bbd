use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use feature_engine::types::CadDocument;
use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::{ClientConfig, RetryConfig};
use crate::error::{SyncError, SyncResult};
use crate::transport::{Subscription, SyncTransport};
use crate::update::SketchUpdate;

/// Callback fired from the receive task for every update from another
/// client.
pub type UpdateHandler = Arc<dyn Fn(SketchUpdate) + Send + Sync>;

/// Client link state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Never connected, or disconnected on purpose.
    Disconnected,
    Connected,
    /// Was connected; the link dropped.
    Lost,
}

/// State shared with the receive task.
struct Shared {
    client_id: String,
    state: RwLock<ConnectionState>,
    /// Bumped on every connect and disconnect. A receive task may only
    /// report loss for the generation it was started with.
    generation: AtomicU64,
    revision: AtomicU64,
    handler: RwLock<Option<UpdateHandler>>,
}

impl Shared {
    /// Mark a new session connected and return its generation.
    fn begin_session(&self) -> u64 {
        let mut state = self.state.write();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *state = ConnectionState::Connected;
        generation
    }

    fn end_session(&self) {
        let mut state = self.state.write();
        self.generation.fetch_add(1, Ordering::SeqCst);
        *state = ConnectionState::Disconnected;
    }

    /// Report `Lost` unless a newer session has started since. Returns
    /// whether the state changed.
    fn mark_lost(&self, generation: u64) -> bool {
        let mut state = self.state.write();
        if self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        *state = ConnectionState::Lost;
        true
    }

    fn deliver(&self, update: SketchUpdate) {
        if update.source_client_id == self.client_id {
            debug!(revision = update.revision, "ignored own echo");
            return;
        }
        self.revision.fetch_max(update.revision, Ordering::SeqCst);
        let handler = self.handler.read().clone();
        match handler {
            Some(handler) => handler(update),
            None => debug!(revision = update.revision, "update received without a handler"),
        }
    }
}

/// The editing side of sync.
///
/// Publishes full snapshots with an optimistic `revision + 1` and hands
/// other clients' updates to the registered handler.
pub struct SyncClient<T: SyncTransport> {
    transport: Arc<T>,
    config: ClientConfig,
    shared: Arc<Shared>,
    receiver: Mutex<Option<JoinHandle<()>>>,
}

impl<T: SyncTransport> SyncClient<T> {
    /// Create a disconnected client.
    pub fn new(transport: Arc<T>, config: ClientConfig) -> Self {
        let shared = Arc::new(Shared {
            client_id: config.client_id.clone(),
            state: RwLock::new(ConnectionState::Disconnected),
            generation: AtomicU64::new(0),
            revision: AtomicU64::new(0),
            handler: RwLock::new(None),
        });
        Self {
            transport,
            config,
            shared,
            receiver: Mutex::new(None),
        }
    }

    /// Id stamped on every published update.
    pub fn client_id(&self) -> &str {
        &self.shared.client_id
    }

    /// Current link state.
    pub fn state(&self) -> ConnectionState {
        *self.shared.state.read()
    }

    /// True while the receive task is running.
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Highest revision published or received so far.
    pub fn revision(&self) -> u64 {
        self.shared.revision.load(Ordering::SeqCst)
    }

    /// Register the update callback, replacing any previous one.
    pub fn on_update(&self, handler: impl Fn(SketchUpdate) + Send + Sync + 'static) {
        *self.shared.handler.write() = Some(Arc::new(handler));
    }

    /// Connect and start receiving. A no-op when already connected.
    ///
    /// Bounded by `connect_timeout`; on timeout or failure the client stays
    /// disconnected.
    pub async fn connect(&self) -> SyncResult<()> {
        if self.is_connected() {
            return Ok(());
        }

        let subscription = tokio::time::timeout(self.config.connect_timeout, self.transport.connect())
            .await
            .map_err(|_| SyncError::Cancelled {
                operation: "connect",
            })??;

        self.start_receiving(subscription);
        info!(client = %self.shared.client_id, "connected");
        Ok(())
    }

    /// [`connect`](Self::connect) reporting only success.
    pub async fn try_connect(&self) -> bool {
        match self.connect().await {
            Ok(()) => true,
            Err(e) => {
                warn!(client = %self.shared.client_id, error = %e, "connect failed");
                false
            }
        }
    }

    /// Connect, retrying retryable failures on `retry`'s schedule.
    pub async fn connect_with_retry(&self, retry: &RetryConfig) -> SyncResult<()> {
        let mut attempt = 0;
        loop {
            tokio::time::sleep(retry.delay_for_attempt(attempt)).await;
            match self.connect().await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_retryable() && attempt + 1 < retry.max_attempts => {
                    debug!(attempt, error = %e, "connect attempt failed, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn start_receiving(&self, subscription: Subscription) {
        let shared = Arc::clone(&self.shared);
        let generation = shared.begin_session();
        let task = tokio::spawn(receive_loop(shared, subscription, generation));
        if let Some(old) = self.receiver.lock().replace(task) {
            old.abort();
        }
    }

    /// Publish `document` as the next revision. The local revision advances
    /// only once the transport accepts the update.
    pub async fn publish(&self, document_id: &str, document: CadDocument) -> SyncResult<SketchUpdate> {
        let update = SketchUpdate::new(document_id, self.revision() + 1, self.client_id(), document);
        self.publish_update(update).await
    }

    /// Publish a prepared update. The source id is overwritten with this
    /// client's id.
    pub async fn publish_update(&self, mut update: SketchUpdate) -> SyncResult<SketchUpdate> {
        if !self.is_connected() {
            return Err(SyncError::NotConnected);
        }
        update.source_client_id = self.shared.client_id.clone();

        tokio::time::timeout(self.config.publish_timeout, self.transport.publish(update.clone()))
            .await
            .map_err(|_| SyncError::Cancelled {
                operation: "publish",
            })??;

        self.shared.revision.fetch_max(update.revision, Ordering::SeqCst);
        debug!(document = %update.document_id, revision = update.revision, "published");
        Ok(update)
    }

    /// Pull the hub's current snapshot for `document_id`.
    pub async fn get_current(&self, document_id: &str) -> SyncResult<SketchUpdate> {
        self.transport
            .get_current(document_id)
            .await?
            .ok_or_else(|| SyncError::NotFound {
                document_id: document_id.to_string(),
            })
    }

    /// Stop receiving and mark the client disconnected.
    pub fn disconnect(&self) {
        if let Some(task) = self.receiver.lock().take() {
            task.abort();
        }
        self.shared.end_session();
        info!(client = %self.shared.client_id, "disconnected");
    }
}

impl<T: SyncTransport> Drop for SyncClient<T> {
    fn drop(&mut self) {
        if let Some(task) = self.receiver.get_mut().take() {
            task.abort();
        }
    }
}

async fn receive_loop(shared: Arc<Shared>, subscription: Subscription, generation: u64) {
    let Subscription { mut updates, mut link } = subscription;
    loop {
        tokio::select! {
            received = updates.recv() => match received {
                Ok(update) => shared.deliver(update),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "receiver lagged, updates dropped");
                }
                Err(RecvError::Closed) => break,
            },
            changed = link.changed() => {
                if changed.is_err() || !*link.borrow() {
                    break;
                }
            }
        }
    }
    if shared.mark_lost(generation) {
        warn!(client = %shared.client_id, "connection lost");
    } else {
        debug!(client = %shared.client_id, generation, "stale receive task ended");
    }
}
