use chrono::{DateTime, Utc};
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

use crate::db::VoteStore;
use crate::error::Result;
use crate::models::VoteRecord;

/// Upper bound on records held in one snapshot.
pub const MAX_SNAPSHOT: u32 = 1000;

/// The newest stored ballots as of `refreshed_at`.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub votes: Vec<VoteRecord>,
    pub refreshed_at: Option<DateTime<Utc>>,
    /// False until the first load has finished.
    pub loaded: bool,
}

impl Snapshot {
    fn same_votes(&self, other: &[VoteRecord]) -> bool {
        self.votes.len() == other.len()
            && self.votes.iter().zip(other).all(|(a, b)| a.id == b.id)
    }
}

/// Publishes snapshots of the vote store to any number of subscribers.
pub struct VoteFeed {
    store: Arc<dyn VoteStore>,
    limit: u32,
    tx: watch::Sender<Arc<Snapshot>>,
    // Held from store read to publish, so publishes follow read order.
    reload: Mutex<()>,
    queued: AtomicBool,
}

impl VoteFeed {
    pub fn new(store: Arc<dyn VoteStore>, limit: u32) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(Snapshot::default()));
        Self {
            store,
            limit: limit.clamp(1, MAX_SNAPSHOT),
            tx,
            reload: Mutex::new(()),
            queued: AtomicBool::new(false),
        }
    }

    /// Dropping the receiver ends the subscription.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> Arc<Snapshot> {
        self.tx.borrow().clone()
    }

    /// Reloads from the store. Returns whether subscribers were notified; an
    /// unchanged vote list is not re-published.
    pub async fn refresh(&self) -> Result<bool> {
        let _reload = self.reload.lock().await;
        self.reload_locked().await
    }

    /// Marks a reload as wanted. Returns false when one is already waiting,
    /// in which case the caller need not start another.
    pub fn queue_refresh(&self) -> bool {
        !self.queued.swap(true, Ordering::AcqRel)
    }

    /// Runs the waiting reload. The mark is taken once the reload lock is
    /// held, so a request arriving after that point queues a fresh one.
    pub async fn refresh_queued(&self) -> Result<bool> {
        let _reload = self.reload.lock().await;
        self.queued.store(false, Ordering::Release);
        self.reload_locked().await
    }

    async fn reload_locked(&self) -> Result<bool> {
        let votes = self.store.recent_votes(self.limit).await?;
        let now = Utc::now();

        let published = self.tx.send_if_modified(|current| {
            if current.loaded && current.same_votes(&votes) {
                return false;
            }
            *current = Arc::new(Snapshot {
                votes,
                refreshed_at: Some(now),
                loaded: true,
            });
            true
        });

        if published {
            info!("Published snapshot with {} votes", self.current().votes.len());
        } else {
            debug!("Snapshot unchanged");
        }
        Ok(published)
    }
}
