//! Revisioned document sync.
//!
//! A [`SyncHub`] holds the authoritative snapshot per document id. Every
//! publish is rebuilt on the hub, stored last-write-wins and rebroadcast to
//! all subscribers. [`SyncClient`] connects to a hub through a
//! [`SyncTransport`], publishes its local document and receives other
//! clients' updates.

pub mod client;
pub mod config;
pub mod error;
pub mod hub;
pub mod rest;
pub mod store;
pub mod transport;
pub mod update;

pub use client::{ConnectionState, SyncClient, UpdateHandler};
pub use config::{ClientConfig, HubConfig, RetryConfig};
pub use error::{SyncError, SyncResult};
pub use hub::SyncHub;
pub use rest::{RestApi, RestResponse};
pub use store::SketchStore;
pub use transport::{LocalTransport, Subscription, SyncTransport};
pub use update::SketchUpdate;
