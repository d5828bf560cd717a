//! State store abstraction
//!
//! This module provides the store trait the engine reads and writes through,
//! and an in-memory implementation with snapshot isolation.

use std::ops::Deref;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::error::{AuthzError, AuthzResult};
use crate::state::AuthzState;
use crate::transaction::Transaction;

/// A committed, immutable version of the state.
#[derive(Debug, Clone)]
pub struct Snapshot {
    state: Arc<AuthzState>,
}

impl Snapshot {
    /// Wrap a committed state version.
    pub fn new(state: Arc<AuthzState>) -> Self {
        Self { state }
    }
}

impl Deref for Snapshot {
    type Target = AuthzState;

    fn deref(&self) -> &AuthzState {
        &self.state
    }
}

/// Store trait for reading snapshots and committing transactions.
#[async_trait]
pub trait AuthzStore: Send + Sync {
    /// Take a consistent snapshot of the committed state.
    async fn snapshot(&self) -> AuthzResult<Snapshot>;

    /// Start a write transaction.
    ///
    /// Writers are serialized: the returned transaction holds the store's
    /// writer lock until it is committed or dropped.
    async fn begin(&self) -> AuthzResult<Transaction>;

    /// Atomically publish a transaction's writes.
    async fn commit(&self, tx: Transaction) -> AuthzResult<()>;
}

/// In-memory store.
///
/// Readers clone the current `Arc` and never wait on writers; a commit swaps
/// in the new version.
pub struct MemoryStore {
    id: Uuid,
    committed: RwLock<Arc<AuthzState>>,
    writer: Arc<Mutex<()>>,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").field("id", &self.id).finish()
    }
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::with_state(AuthzState::new())
    }

    /// Create a store seeded with existing state.
    pub fn with_state(state: AuthzState) -> Self {
        Self {
            id: Uuid::now_v7(),
            committed: RwLock::new(Arc::new(state)),
            writer: Arc::new(Mutex::new(())),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthzStore for MemoryStore {
    async fn snapshot(&self) -> AuthzResult<Snapshot> {
        let state = self.committed.read().await.clone();
        Ok(Snapshot::new(state))
    }

    async fn begin(&self) -> AuthzResult<Transaction> {
        let writer = self.writer.clone().lock_owned().await;
        let working = self.committed.read().await.as_ref().clone();
        debug!(store_id = %self.id, "transaction started");
        Ok(Transaction::new(self.id, working, writer))
    }

    async fn commit(&self, tx: Transaction) -> AuthzResult<()> {
        let (store_id, state, writer) = tx.into_parts();
        if store_id != self.id {
            return Err(AuthzError::Store(format!(
                "transaction from store {store_id} cannot be committed to store {}",
                self.id
            )));
        }
        *self.committed.write().await = Arc::new(state);
        drop(writer);
        debug!(store_id = %self.id, "transaction committed");
        Ok(())
    }
}
