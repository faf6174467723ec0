//! Persistence synchronizer.
//!
//! Pushes inventory snapshots to the backend according to each operation's
//! [`SyncBehavior`]. Local state is always ahead of the backend and is never
//! rolled back when a flush fails.
//!
//! Per player:
//! - every request gets the next version number,
//! - flushes are serialized (one in flight at a time),
//! - a request queued behind an in-flight flush replaces any older queued
//!   snapshot, so the next flush always carries the latest known state.
//!
//! A request whose snapshot was replaced before being sent resolves as
//! [`FlushOutcome::Superseded`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use dnaforge_domain::{InventorySnapshot, OperationKind, PlayerId, SyncBehavior};

use crate::infrastructure::ports::{ClockPort, FlushRequest, PersistenceError, PersistencePort};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SyncError {
    #[error("Persistence failure for player {player_id} at version {version}: {source}")]
    PersistenceFailure {
        player_id: PlayerId,
        version: u64,
        #[source]
        source: PersistenceError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// This request's snapshot reached the backend.
    Flushed { version: u64 },
    /// A newer snapshot was sent in its place.
    Superseded { by: u64 },
}

/// What happened to a sync request.
#[derive(Debug)]
pub enum SyncTicket {
    /// The operation does not sync.
    Skipped,
    /// Blocking flush, already finished.
    Completed(FlushOutcome),
    /// Background flush; await the handle to observe the result.
    Pending(JoinHandle<Result<FlushOutcome, SyncError>>),
}

impl SyncTicket {
    /// Whether nothing is left to wait for.
    pub fn is_finished(&self) -> bool {
        match self {
            Self::Skipped | Self::Completed(_) => true,
            Self::Pending(handle) => handle.is_finished(),
        }
    }

    /// Wait for the flush behind this ticket, if any.
    pub async fn settle(self) -> Option<Result<FlushOutcome, SyncError>> {
        match self {
            Self::Skipped => None,
            Self::Completed(outcome) => Some(Ok(outcome)),
            Self::Pending(handle) => match handle.await {
                Ok(result) => Some(result),
                Err(e) => {
                    tracing::warn!(error = %e, "Background flush task did not complete");
                    None
                }
            },
        }
    }
}

#[derive(Default)]
struct FlushLedger {
    /// Highest version the backend accepted.
    flushed: u64,
    /// Latest failed flush, reported to requests it had absorbed.
    failed: Option<(u64, PersistenceError)>,
}

#[derive(Default)]
struct PlayerChannel {
    next_version: AtomicU64,
    queued: StdMutex<Option<FlushRequest>>,
    ledger: Mutex<FlushLedger>,
}

impl PlayerChannel {
    fn enqueue(&self, request: FlushRequest) {
        let mut queued = match self.queued.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let newer = queued
            .as_ref()
            .map_or(true, |current| current.version < request.version);
        if newer {
            *queued = Some(request);
        }
    }

    fn take_queued(&self) -> Option<FlushRequest> {
        match self.queued.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }
}

pub struct PersistenceSynchronizer {
    persistence: Arc<dyn PersistencePort>,
    clock: Arc<dyn ClockPort>,
    players: DashMap<PlayerId, Arc<PlayerChannel>>,
}

impl PersistenceSynchronizer {
    pub fn new(persistence: Arc<dyn PersistencePort>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            persistence,
            clock,
            players: DashMap::new(),
        }
    }

    /// Sync a snapshot with the behavior `operation` calls for.
    pub async fn sync(
        self: &Arc<Self>,
        snapshot: InventorySnapshot,
        operation: OperationKind,
    ) -> Result<SyncTicket, SyncError> {
        match operation.sync_behavior() {
            SyncBehavior::None => {
                tracing::trace!(player_id = %snapshot.player_id, %operation, "No sync");
                Ok(SyncTicket::Skipped)
            }
            SyncBehavior::Immediate => Ok(SyncTicket::Pending(self.schedule(snapshot))),
            SyncBehavior::Blocking => self.flush(snapshot).await.map(SyncTicket::Completed),
        }
    }

    /// Flush in the background. Local interaction continues immediately.
    pub fn schedule(
        self: &Arc<Self>,
        snapshot: InventorySnapshot,
    ) -> JoinHandle<Result<FlushOutcome, SyncError>> {
        let request = self.enqueue(snapshot);
        let this = Arc::clone(self);
        tokio::spawn(async move {
            let result = this.drain(request.player_id, request.version).await;
            if let Err(e) = &result {
                tracing::warn!(error = %e, "Background flush failed");
            }
            result
        })
    }

    /// Flush and wait for the backend.
    pub async fn flush(&self, snapshot: InventorySnapshot) -> Result<FlushOutcome, SyncError> {
        let request = self.enqueue(snapshot);
        self.drain(request.player_id, request.version).await
    }

    /// Version of the newest snapshot handed to the synchronizer.
    pub fn current_version(&self, player_id: PlayerId) -> u64 {
        self.players
            .get(&player_id)
            .map_or(0, |channel| channel.next_version.load(Ordering::SeqCst))
    }

    /// Version of the newest snapshot the backend accepted.
    pub async fn flushed_version(&self, player_id: PlayerId) -> u64 {
        match self.channel(player_id) {
            Some(channel) => channel.ledger.lock().await.flushed,
            None => 0,
        }
    }

    fn channel(&self, player_id: PlayerId) -> Option<Arc<PlayerChannel>> {
        self.players.get(&player_id).map(|entry| Arc::clone(&entry))
    }

    fn enqueue(&self, snapshot: InventorySnapshot) -> FlushRequest {
        let player_id = snapshot.player_id;
        let channel = Arc::clone(&self.players.entry(player_id).or_default());
        let version = channel.next_version.fetch_add(1, Ordering::SeqCst) + 1;
        let request = FlushRequest {
            player_id,
            version,
            taken_at: self.clock.now(),
            snapshot,
        };
        channel.enqueue(request.clone());
        request
    }

    async fn drain(&self, player_id: PlayerId, version: u64) -> Result<FlushOutcome, SyncError> {
        let Some(channel) = self.channel(player_id) else {
            return Ok(FlushOutcome::Superseded { by: 0 });
        };
        let mut ledger = channel.ledger.lock().await;

        if ledger.flushed == version {
            return Ok(FlushOutcome::Flushed { version });
        }
        if ledger.flushed > version {
            return Ok(FlushOutcome::Superseded { by: ledger.flushed });
        }

        let Some(request) = channel.take_queued() else {
            // Our snapshot rode along with a flush that failed.
            return match &ledger.failed {
                Some((failed_version, source)) if *failed_version >= version => {
                    Err(SyncError::PersistenceFailure {
                        player_id,
                        version: *failed_version,
                        source: source.clone(),
                    })
                }
                _ => Ok(FlushOutcome::Superseded { by: ledger.flushed }),
            };
        };

        tracing::debug!(
            player_id = %player_id,
            version = request.version,
            requested = version,
            "Flushing inventory snapshot"
        );

        match self.persistence.flush(&request).await {
            Ok(()) => {
                ledger.flushed = request.version;
                tracing::info!(player_id = %player_id, version = request.version, "Inventory flushed");
                if request.version == version {
                    Ok(FlushOutcome::Flushed { version })
                } else {
                    Ok(FlushOutcome::Superseded {
                        by: request.version,
                    })
                }
            }
            Err(source) => {
                tracing::error!(
                    player_id = %player_id,
                    version = request.version,
                    error = %source,
                    "Inventory flush failed"
                );
                ledger.failed = Some((request.version, source.clone()));
                Err(SyncError::PersistenceFailure {
                    player_id,
                    version: request.version,
                    source,
                })
            }
        }
    }
}
