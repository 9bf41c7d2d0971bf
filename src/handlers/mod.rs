mod dashboard;
mod survey;

use axum::routing::{get, post};
use axum::Router;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::db::VoteStore;
use crate::error::{Result, SurveyError};
use crate::feed::VoteFeed;
use crate::postcodes::PostcodeTable;
use crate::wizard::Wizard;

pub type Session = Arc<Mutex<Wizard>>;

struct SessionSlot {
    wizard: Session,
    touched: Instant,
}

/// Everything a request handler can reach.
pub struct AppState {
    pub catalog: Catalog,
    pub postcodes: PostcodeTable,
    pub store: Arc<dyn VoteStore>,
    pub feed: Arc<VoteFeed>,
    sessions: RwLock<HashMap<Uuid, SessionSlot>>,
}

impl AppState {
    pub fn new(
        catalog: Catalog,
        postcodes: PostcodeTable,
        store: Arc<dyn VoteStore>,
        feed: Arc<VoteFeed>,
    ) -> Self {
        Self {
            catalog,
            postcodes,
            store,
            feed,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn open_session(&self) -> Session {
        let wizard = Wizard::new();
        let id = wizard.id();
        let session = Arc::new(Mutex::new(wizard));
        let slot = SessionSlot {
            wizard: Arc::clone(&session),
            touched: Instant::now(),
        };
        self.sessions.write().await.insert(id, slot);
        session
    }

    /// Looks a session up and marks it as used.
    pub async fn session(&self, id: Uuid) -> Result<Session> {
        let mut sessions = self.sessions.write().await;
        let slot = sessions
            .get_mut(&id)
            .ok_or_else(|| SurveyError::SessionNotFound(id.to_string()))?;
        slot.touched = Instant::now();
        Ok(Arc::clone(&slot.wizard))
    }

    /// Drops sessions unused for at least `idle`. Returns how many went.
    pub async fn evict_idle_sessions(&self, idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, slot| slot.touched.elapsed() < idle);
        before - sessions.len()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(dashboard::healthz))
        .route("/api/policies", get(dashboard::list_policies))
        .route("/api/postcodes/:code", get(dashboard::lookup_postcode))
        .route("/api/sessions", post(survey::create_session))
        .route("/api/sessions/:id", get(survey::get_session))
        .route("/api/sessions/:id/postcode", post(survey::enter_postcode))
        .route("/api/sessions/:id/location", post(survey::choose_location))
        .route("/api/sessions/:id/location/confirm", post(survey::confirm_location))
        .route("/api/sessions/:id/policies/clear", post(survey::clear_policies))
        .route(
            "/api/sessions/:id/policies/:policy_id/toggle",
            post(survey::toggle_policy),
        )
        .route("/api/sessions/:id/selection/confirm", post(survey::confirm_selection))
        .route("/api/sessions/:id/back", post(survey::back_to_selection))
        .route("/api/sessions/:id/submit", post(survey::submit))
        .route("/api/sessions/:id/results", get(survey::results))
        .route("/api/monitor", get(dashboard::monitor))
        .route("/api/monitor/stream", get(dashboard::monitor_stream))
        .route("/api/analytics", get(dashboard::analytics))
        .route("/api/analytics/export", get(dashboard::export_csv))
        .with_state(state)
}
