pub mod session_sweeper;
pub mod snapshot_refresher;
