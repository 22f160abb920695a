//! Voice state ingest
//!
//! Updates are sharded over a fixed set of worker tasks by (guild, user).
//! One member always lands on the same worker, so their updates are
//! accounted in arrival order while different members proceed in parallel.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use vc_common::TrackerConfig;
use vc_core::{PresenceTransition, Snowflake, VoiceStateUpdate};
use vc_service::{AccountingService, ServiceContext, ServiceResult};

/// Outcome reported back to a caller that waits for its update
pub type ApplyResult = ServiceResult<Option<PresenceTransition>>;

/// Ingest errors
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Voice tracker is shut down")]
    Closed,
}

struct Job {
    update: VoiceStateUpdate,
    reply: Option<oneshot::Sender<ApplyResult>>,
}

/// Sharded accounting worker pool
pub struct VoiceTracker {
    senders: RwLock<Option<Vec<mpsc::Sender<Job>>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl VoiceTracker {
    /// Start `config.workers` workers, each with its own bounded queue
    pub fn spawn(ctx: Arc<ServiceContext>, config: &TrackerConfig) -> Self {
        let shards = config.workers.max(1);
        let capacity = config.queue_capacity.max(1);

        let mut senders = Vec::with_capacity(shards);
        let mut workers = Vec::with_capacity(shards);
        for shard in 0..shards {
            let (tx, rx) = mpsc::channel(capacity);
            senders.push(tx);
            workers.push(tokio::spawn(run_worker(shard, ctx.clone(), rx)));
        }

        info!(shards, capacity, "Voice tracker started");
        Self {
            senders: RwLock::new(Some(senders)),
            workers: Mutex::new(workers),
        }
    }

    /// Queue an update without waiting for it to be accounted
    ///
    /// Waits for queue space when the member's shard is full.
    pub async fn submit(&self, update: VoiceStateUpdate) -> Result<(), TrackerError> {
        self.enqueue(Job {
            update,
            reply: None,
        })
        .await
    }

    /// Queue an update and wait for the accounting result
    pub async fn submit_and_wait(
        &self,
        update: VoiceStateUpdate,
    ) -> Result<ApplyResult, TrackerError> {
        let (tx, rx) = oneshot::channel();
        self.enqueue(Job {
            update,
            reply: Some(tx),
        })
        .await?;
        rx.await.map_err(|_| TrackerError::Closed)
    }

    /// Stop accepting updates and wait until every queued one is accounted
    pub async fn shutdown(&self) {
        if self.senders.write().await.take().is_none() {
            return;
        }

        let workers = std::mem::take(&mut *self.workers.lock().await);
        for handle in workers {
            if let Err(e) = handle.await {
                error!(error = %e, "Voice tracker worker panicked");
            }
        }
        info!("Voice tracker drained");
    }

    async fn enqueue(&self, job: Job) -> Result<(), TrackerError> {
        // Clone the sender so the lock is not held while waiting for space
        let sender = {
            let guard = self.senders.read().await;
            let senders = guard.as_ref().ok_or(TrackerError::Closed)?;
            let shard = shard_for(job.update.guild_id, job.update.user_id, senders.len());
            senders[shard].clone()
        };
        sender.send(job).await.map_err(|_| TrackerError::Closed)
    }
}

impl std::fmt::Debug for VoiceTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceTracker").finish_non_exhaustive()
    }
}

fn shard_for(guild_id: Snowflake, user_id: Snowflake, shards: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    (guild_id, user_id).hash(&mut hasher);
    (hasher.finish() % shards as u64) as usize
}

async fn run_worker(shard: usize, ctx: Arc<ServiceContext>, mut rx: mpsc::Receiver<Job>) {
    debug!(shard, "Voice tracker worker started");

    while let Some(Job { update, reply }) = rx.recv().await {
        let result = AccountingService::new(&ctx).apply_voice_state(&update).await;

        match &result {
            Ok(Some(transition)) => debug!(
                shard,
                guild_id = %update.guild_id,
                user_id = %update.user_id,
                transition = transition.kind(),
                "Voice update accounted"
            ),
            Ok(None) => {}
            Err(e) => error!(
                shard,
                guild_id = %update.guild_id,
                user_id = %update.user_id,
                error = %e,
                "Failed to account voice update"
            ),
        }

        if let Some(reply) = reply {
            if reply.send(result).is_err() {
                warn!(shard, "Caller stopped waiting for voice update");
            }
        }
    }

    debug!(shard, "Voice tracker worker stopped");
}
