use crate::feed::VoteFeed;
use log::{error, info};
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tokio::time::{interval, MissedTickBehavior};

pub async fn refresh_snapshots_task(feed: Arc<VoteFeed>, every: StdDuration) {
    info!("Starting background task to refresh vote snapshots every {:?}...", every);
    let mut interval = interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await; // First tick completes immediately
        if let Err(e) = feed.refresh().await {
            // Subscribers keep the last good snapshot
            error!("Failed to refresh vote snapshot: {}", e);
        }
    }
}

/// Reloads once in the background, e.g. right after a vote was stored.
/// Requests made while one is already waiting share it.
pub fn refresh_soon(feed: Arc<VoteFeed>) {
    if !feed.queue_refresh() {
        return;
    }
    tokio::spawn(async move {
        if let Err(e) = feed.refresh_queued().await {
            error!("Failed to refresh vote snapshot after submission: {}", e);
        }
    });
}
