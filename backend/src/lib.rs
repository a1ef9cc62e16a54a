use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use santa_core::export::EXPORT_FILE_NAME;
use santa_core::{
    add_exclusion, add_participant, decode_matches, decode_participants, encode_matches,
    encode_participants, export_lines, remove_participant, share_links, share_links_text,
    verify_token, MatchError, Participant, Reveal, RosterError, ShareLink, UrlState, View,
    ViewState,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

mod config;

pub use config::Config;

/// Only configuration is shared; every request carries its own state.
#[derive(Clone, Default)]
pub struct AppState {
    config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health))
        .route("/api/state", get(get_state))
        .route("/api/participants", post(create_participant))
        .route("/api/participants/:id", delete(delete_participant))
        .route("/api/exclusions", post(create_exclusion))
        .route("/api/matches", post(create_matches))
        .route("/api/reveal", get(get_reveal))
        .route("/api/export", get(export_matches))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, thiserror::Error)]
enum ApiError {
    #[error(transparent)]
    Roster(#[from] RosterError),
    #[error(transparent)]
    Match(#[from] MatchError),
    #[error("{0}")]
    NotFound(&'static str),
}

#[derive(Serialize)]
struct FieldError {
    field: &'static str,
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Roster(RosterError::Invalid(err)) => {
                let body = FieldError {
                    field: err.field(),
                    error: err.to_string(),
                };
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
            ApiError::Roster(RosterError::DuplicateName) => StatusCode::CONFLICT,
            ApiError::Roster(RosterError::UnknownParticipant) | ApiError::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Roster(RosterError::SelfExclusion)
            | ApiError::Match(MatchError::InsufficientParticipants { .. }) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Match(MatchError::NoFeasibleAssignment { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        };
        (status, self.to_string()).into_response()
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "not found")
}

#[derive(Serialize)]
struct MatchView {
    giver: Participant,
    receiver: Option<Participant>,
}

#[derive(Serialize)]
struct StateView {
    view: View,
    is_revealed: bool,
    participants: Vec<Participant>,
    matches: Vec<MatchView>,
    query: String,
}

async fn get_state(Query(url): Query<UrlState>) -> impl IntoResponse {
    let state = ViewState::from_url(&url);
    let matches = state
        .matches
        .iter()
        .map(|m| MatchView {
            giver: m.giver.clone(),
            receiver: state.is_revealed.then(|| m.receiver.clone()),
        })
        .collect();

    Json(StateView {
        view: state.current_view,
        is_revealed: state.is_revealed,
        query: state.to_query(),
        participants: state.participants,
        matches,
    })
}

#[derive(Deserialize)]
struct RosterParams {
    p: Option<String>,
}

impl RosterParams {
    fn participants(&self) -> Vec<Participant> {
        self.p.as_deref().map(decode_participants).unwrap_or_default()
    }
}

#[derive(Serialize)]
struct RosterResponse {
    participants: Vec<Participant>,
    p: String,
}

impl From<Vec<Participant>> for RosterResponse {
    fn from(participants: Vec<Participant>) -> Self {
        Self {
            p: encode_participants(&participants),
            participants,
        }
    }
}

#[derive(Deserialize)]
struct ParticipantRequest {
    name: String,
    email: Option<String>,
}

#[derive(Serialize)]
struct CreatedParticipant {
    participant: Participant,
    #[serde(flatten)]
    roster: RosterResponse,
}

async fn create_participant(
    Query(params): Query<RosterParams>,
    Json(payload): Json<ParticipantRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut participants = params.participants();
    let mut rng = ChaCha8Rng::from_entropy();
    let participant = add_participant(
        &mut participants,
        &payload.name,
        payload.email.as_deref(),
        &mut rng,
    )?
    .clone();

    Ok((
        StatusCode::CREATED,
        Json(CreatedParticipant {
            participant,
            roster: participants.into(),
        }),
    ))
}

async fn delete_participant(
    Path(id): Path<String>,
    Query(params): Query<RosterParams>,
) -> Result<impl IntoResponse, ApiError> {
    let mut participants = params.participants();
    remove_participant(&mut participants, &id).ok_or(RosterError::UnknownParticipant)?;
    Ok(Json(RosterResponse::from(participants)))
}

#[derive(Deserialize)]
struct ExclusionRequest {
    giver_id: String,
    excluded_id: String,
}

async fn create_exclusion(
    Query(params): Query<RosterParams>,
    Json(payload): Json<ExclusionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut participants = params.participants();
    add_exclusion(&mut participants, &payload.giver_id, &payload.excluded_id)?;
    Ok(Json(RosterResponse::from(participants)))
}

#[derive(Deserialize)]
struct MatchParams {
    p: Option<String>,
    seed: Option<u64>,
}

#[derive(Serialize)]
struct MatchesResponse {
    m: String,
    query: String,
    links: Vec<ShareLink>,
    links_text: String,
}

async fn create_matches(
    State(state): State<AppState>,
    Query(params): Query<MatchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let mut view = ViewState::default();
    view.set_participants(params.p.as_deref().map(decode_participants).unwrap_or_default());

    let mut rng = params
        .seed
        .map(ChaCha8Rng::seed_from_u64)
        .unwrap_or_else(ChaCha8Rng::from_entropy);
    if let Err(err) = view.generate(&mut rng) {
        debug!(participants = view.participants.len(), %err, "match generation failed");
        return Err(err.into());
    }
    debug!(participants = view.participants.len(), "matches generated");

    let links = share_links(&view.matches, &state.config.public_base_url);
    Ok(Json(MatchesResponse {
        m: encode_matches(&view.matches),
        query: view.to_query(),
        links_text: share_links_text(&links),
        links,
    }))
}

#[derive(Deserialize)]
struct RevealParams {
    t: Option<String>,
}

async fn get_reveal(Query(params): Query<RevealParams>) -> Result<Json<Reveal>, ApiError> {
    let Some(token) = params.t.filter(|t| !t.is_empty()) else {
        return Err(ApiError::NotFound("invalid or missing reveal link"));
    };
    match verify_token(&token) {
        Some(reveal) => Ok(Json(reveal)),
        None => {
            warn!(len = token.len(), "rejected reveal token");
            Err(ApiError::NotFound("invalid or missing reveal link"))
        }
    }
}

#[derive(Deserialize)]
struct ExportParams {
    m: Option<String>,
}

async fn export_matches(Query(params): Query<ExportParams>) -> Result<impl IntoResponse, ApiError> {
    let matches = params.m.as_deref().map(decode_matches).unwrap_or_default();
    if matches.is_empty() {
        return Err(ApiError::NotFound("no matches to export"));
    }

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        export_lines(&matches),
    ))
}
