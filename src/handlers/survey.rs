// Wizard endpoints. Each call locks one session for its whole duration so
// steps of the same respondent never interleave.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::AppState;
use crate::dashboard::PublicResults;
use crate::error::Result;
use crate::models::VoteRecord;
use crate::postcodes::LookupOutcome;
use crate::tasks::snapshot_refresher::refresh_soon;
use crate::wizard::WizardView;

#[derive(Debug, Deserialize)]
pub struct PostcodeRequest {
    pub postcode: String,
}

#[derive(Debug, Deserialize)]
pub struct LocationRequest {
    pub index: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PostcodeResponse {
    pub outcome: LookupOutcome,
    pub session: WizardView,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub vote: VoteRecord,
    pub session: WizardView,
}

pub async fn create_session(State(state): State<Arc<AppState>>) -> Json<WizardView> {
    let session = state.open_session().await;
    let view = session.lock().await.view();
    log::info!("Opened survey session {}", view.id);
    Json(view)
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardView>> {
    let session = state.session(id).await?;
    let view = session.lock().await.view();
    Ok(Json(view))
}

pub async fn enter_postcode(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<PostcodeRequest>,
) -> Result<Json<PostcodeResponse>> {
    let session = state.session(id).await?;
    let mut wizard = session.lock().await;
    let outcome = wizard.enter_postcode(&state.postcodes, &req.postcode)?;
    Ok(Json(PostcodeResponse {
        outcome,
        session: wizard.view(),
    }))
}

pub async fn choose_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<LocationRequest>,
) -> Result<Json<WizardView>> {
    let session = state.session(id).await?;
    let mut wizard = session.lock().await;
    wizard.choose_location(req.index)?;
    Ok(Json(wizard.view()))
}

pub async fn confirm_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardView>> {
    let session = state.session(id).await?;
    let mut wizard = session.lock().await;
    wizard.confirm_location()?;
    Ok(Json(wizard.view()))
}

pub async fn toggle_policy(
    State(state): State<Arc<AppState>>,
    Path((id, policy_id)): Path<(Uuid, String)>,
) -> Result<Json<WizardView>> {
    let session = state.session(id).await?;
    let mut wizard = session.lock().await;
    wizard.toggle_policy(&state.catalog, &policy_id)?;
    Ok(Json(wizard.view()))
}

pub async fn clear_policies(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardView>> {
    let session = state.session(id).await?;
    let mut wizard = session.lock().await;
    wizard.clear_selection()?;
    Ok(Json(wizard.view()))
}

pub async fn confirm_selection(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardView>> {
    let session = state.session(id).await?;
    let mut wizard = session.lock().await;
    wizard.confirm_selection()?;
    Ok(Json(wizard.view()))
}

pub async fn back_to_selection(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardView>> {
    let session = state.session(id).await?;
    let mut wizard = session.lock().await;
    wizard.back_to_selection()?;
    Ok(Json(wizard.view()))
}

pub async fn submit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>> {
    let session = state.session(id).await?;
    let mut wizard = session.lock().await;
    let vote = wizard
        .submit(&state.catalog, state.store.as_ref(), req.comment)
        .await?;

    // Dashboards pick the new vote up without waiting for the next tick
    refresh_soon(Arc::clone(&state.feed));

    Ok(Json(SubmitResponse {
        vote,
        session: wizard.view(),
    }))
}

pub async fn results(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicResults>> {
    let session = state.session(id).await?;
    let wizard = session.lock().await;
    let (location, picked) = wizard.dashboard_inputs()?;
    let snapshot = state.feed.current();
    Ok(Json(PublicResults::build(
        &state.catalog,
        &snapshot,
        location,
        picked,
    )))
}
