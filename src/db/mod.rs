#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use log::{info, warn};
use sqlx::{migrate::MigrateDatabase, sqlite::{SqlitePool, SqlitePoolOptions}, Row, Sqlite};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{LocationData, NewVote, RankedPolicy, VoteRecord};

/// Append-only storage for ballots.
#[async_trait]
pub trait VoteStore: Send + Sync {
    /// Stores a ballot and stamps it with the server time.
    async fn append_vote(&self, vote: &NewVote) -> Result<VoteRecord>;

    /// Newest ballots first, at most `limit` of them.
    async fn recent_votes(&self, limit: u32) -> Result<Vec<VoteRecord>>;
}

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn connect(db_url: &str, max_connections: u32) -> Result<Self> {
        // Create database if it doesn't exist
        if !db_url.contains(":memory:") && !Sqlite::database_exists(db_url).await.unwrap_or(false) {
            info!("Creating database {}", db_url);
            Sqlite::create_database(db_url).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(db_url)
            .await?;

        Self::init_schema(&pool).await?;

        Ok(Self { pool })
    }

    async fn init_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS votes (
                id TEXT PRIMARY KEY,
                province TEXT NOT NULL,
                district TEXT NOT NULL,
                subdistrict TEXT NOT NULL,
                zipcode TEXT NOT NULL,
                region TEXT,
                comment TEXT,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS vote_choices (
                vote_id TEXT NOT NULL,
                policy_id TEXT NOT NULL,
                title TEXT NOT NULL,
                rank INTEGER NOT NULL,
                PRIMARY KEY (vote_id, rank),
                FOREIGN KEY (vote_id) REFERENCES votes(id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_votes_created_at ON votes (created_at)")
            .execute(pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl VoteStore for Database {
    async fn append_vote(&self, vote: &NewVote) -> Result<VoteRecord> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO votes (id, province, district, subdistrict, zipcode, region, comment, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&vote.location.province)
        .bind(&vote.location.district)
        .bind(&vote.location.subdistrict)
        .bind(&vote.location.zipcode)
        .bind(&vote.location.region)
        .bind(&vote.comment)
        .bind(created_at.to_rfc3339_opts(SecondsFormat::Micros, true))
        .execute(&mut *tx)
        .await?;

        for choice in &vote.choices {
            sqlx::query(
                r#"
                INSERT INTO vote_choices (vote_id, policy_id, title, rank)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(id.to_string())
            .bind(&choice.policy_id)
            .bind(&choice.title)
            .bind(i64::from(choice.rank))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(VoteRecord::from_new(vote, id, created_at))
    }

    async fn recent_votes(&self, limit: u32) -> Result<Vec<VoteRecord>> {
        // Both reads see the same state.
        let mut tx = self.pool.begin().await?;

        let vote_rows = sqlx::query(
            r#"
            SELECT id, province, district, subdistrict, zipcode, region, comment, created_at
            FROM votes
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&mut *tx)
        .await?;

        let choice_rows = sqlx::query(
            r#"
            SELECT vote_id, policy_id, title, rank
            FROM vote_choices
            WHERE vote_id IN (
                SELECT id FROM votes ORDER BY created_at DESC, rowid DESC LIMIT ?
            )
            ORDER BY vote_id, rank
            "#,
        )
        .bind(limit)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let mut choices: HashMap<String, Vec<RankedPolicy>> = HashMap::new();
        for row in choice_rows {
            let rank = row.get::<i64, _>("rank");
            choices
                .entry(row.get::<String, _>("vote_id"))
                .or_default()
                .push(RankedPolicy {
                    policy_id: row.get::<String, _>("policy_id"),
                    title: row.get::<String, _>("title"),
                    rank: u8::try_from(rank).unwrap_or(0),
                });
        }

        let mut votes = Vec::with_capacity(vote_rows.len());
        for row in vote_rows {
            let raw_id = row.get::<String, _>("id");
            let id = match Uuid::parse_str(&raw_id) {
                Ok(id) => id,
                Err(e) => {
                    warn!("Skipping vote with malformed id {:?}: {}", raw_id, e);
                    continue;
                }
            };
            let created_at = DateTime::parse_from_rfc3339(&row.get::<String, _>("created_at"))
                .ok()
                .map(|dt| dt.with_timezone(&Utc));

            votes.push(VoteRecord {
                id,
                location: LocationData {
                    subdistrict: row.get::<String, _>("subdistrict"),
                    district: row.get::<String, _>("district"),
                    province: row.get::<String, _>("province"),
                    zipcode: row.get::<String, _>("zipcode"),
                    region: row.get::<Option<String>, _>("region"),
                },
                choices: choices.remove(&raw_id).unwrap_or_default(),
                comment: row.get::<Option<String>, _>("comment"),
                created_at,
            });
        }

        Ok(votes)
    }
}
