use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::{Stream, StreamExt};

use super::AppState;
use crate::catalog::Glyph;
use crate::dashboard::{self, AnalyticsView, MonitorBoard};
use crate::error::{Result, SurveyError};
use crate::export;
use crate::models::Policy;
use crate::postcodes::LookupOutcome;
use crate::voting::region::RegionFilter;
use crate::voting::VoteFilter;

#[derive(Debug, Default, Deserialize)]
pub struct RegionQuery {
    pub region: Option<String>,
}

impl RegionQuery {
    fn filter(&self) -> Result<RegionFilter> {
        self.region
            .as_deref()
            .unwrap_or("all")
            .parse()
            .map_err(SurveyError::InvalidFilter)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProvinceQuery {
    pub province: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PolicyCard<'a> {
    #[serde(flatten)]
    pub policy: &'a Policy,
    pub short_name: String,
    pub glyph: Glyph,
}

pub async fn healthz() -> &'static str {
    "ok"
}

pub async fn list_policies(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let cards: Vec<PolicyCard<'_>> = state
        .catalog
        .policies()
        .iter()
        .map(|policy| PolicyCard {
            policy,
            short_name: policy.short_name(),
            glyph: policy.glyph(),
        })
        .collect();
    Json(cards).into_response()
}

pub async fn lookup_postcode(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Json<LookupOutcome> {
    Json(state.postcodes.lookup(&code))
}

pub async fn monitor(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RegionQuery>,
) -> Result<Json<MonitorBoard>> {
    let region = query.filter()?;
    let snapshot = state.feed.current();
    Ok(Json(MonitorBoard::build(&state.catalog, &snapshot, region)))
}

/// Pushes a fresh board every time the feed publishes a snapshot. The
/// current board is sent first.
pub async fn monitor_stream(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RegionQuery>,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    let region = query.filter()?;
    log::info!("Monitor subscriber attached ({})", region.id());

    let stream = WatchStream::new(state.feed.subscribe()).map(move |snapshot| {
        let board = MonitorBoard::build(&state.catalog, &snapshot, region);
        let event = match serde_json::to_string(&board) {
            Ok(json) => Event::default().event("monitor").data(json),
            Err(e) => {
                log::error!("Failed to encode monitor board: {}", e);
                Event::default().event("error").data(e.to_string())
            }
        };
        Ok::<_, Infallible>(event)
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::new()))
}

pub async fn analytics(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProvinceQuery>,
) -> Json<AnalyticsView> {
    let filter = VoteFilter::province(query.province.as_deref());
    let snapshot = state.feed.current();
    Json(AnalyticsView::build(&snapshot, &filter))
}

pub async fn export_csv(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProvinceQuery>,
) -> Result<impl IntoResponse> {
    let filter = VoteFilter::province(query.province.as_deref());
    let label = match &filter {
        VoteFilter::Province(province) => province.as_str(),
        _ => "all",
    };

    let snapshot = state.feed.current();
    let rows: Vec<_> = dashboard::filtered(&snapshot, &filter)
        .into_iter()
        .cloned()
        .collect();
    let body = export::votes_to_csv(&rows)?;
    let name = export::file_name(label, Utc::now().date_naive());
    log::info!("Exporting {} votes as {}", rows.len(), name);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(&name)),
        ],
        body,
    ))
}

// Plain ASCII name plus the RFC 5987 UTF-8 form.
fn content_disposition(file_name: &str) -> String {
    format!(
        "attachment; filename=\"survey_data.csv\"; filename*=UTF-8''{}",
        urlencoding::encode(file_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thai_file_names_are_percent_encoded() {
        assert_eq!(
            content_disposition("survey_data_all_2026-10-19.csv"),
            "attachment; filename=\"survey_data.csv\"; filename*=UTF-8''survey_data_all_2026-10-19.csv"
        );
        assert!(content_disposition("survey_data_ก.csv").ends_with("survey_data_%E0%B8%81.csv"));
    }

    #[test]
    fn region_query_defaults_to_all() {
        assert_eq!(RegionQuery::default().filter().unwrap(), RegionFilter::All);
        let bad = RegionQuery {
            region: Some("atlantis".into()),
        };
        assert!(matches!(bad.filter(), Err(SurveyError::InvalidFilter(_))));
    }
}
