use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use super::VoteStore;
use crate::error::{Result, SurveyError};
use crate::models::{NewVote, VoteRecord};

/// Vote store kept in a `Vec`, with a switch to make the next append fail.
#[derive(Default)]
pub struct MemoryStore {
    votes: Mutex<Vec<VoteRecord>>,
    fail_next: AtomicBool,
}

impl MemoryStore {
    pub fn fail_next_append(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.votes.lock().unwrap().len()
    }
}

#[async_trait]
impl VoteStore for MemoryStore {
    async fn append_vote(&self, vote: &NewVote) -> Result<VoteRecord> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(SurveyError::Store(sqlx::Error::PoolTimedOut));
        }
        let record = VoteRecord::from_new(vote, Uuid::new_v4(), Utc::now());
        self.votes.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn recent_votes(&self, limit: u32) -> Result<Vec<VoteRecord>> {
        let votes = self.votes.lock().unwrap();
        Ok(votes.iter().rev().take(limit as usize).cloned().collect())
    }
}
