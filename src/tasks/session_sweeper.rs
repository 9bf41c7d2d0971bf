use crate::handlers::AppState;
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tokio::time::{interval, MissedTickBehavior};

const SWEEP_EVERY: StdDuration = StdDuration::from_secs(60);

pub async fn sweep_idle_sessions_task(state: Arc<AppState>, idle: StdDuration) {
    info!("Starting background task to drop sessions idle for {:?}...", idle);
    let mut interval = interval(SWEEP_EVERY.min(idle));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        let evicted = state.evict_idle_sessions(idle).await;
        if evicted > 0 {
            info!("Dropped {} idle survey sessions", evicted);
        } else {
            debug!("No idle survey sessions");
        }
    }
}
