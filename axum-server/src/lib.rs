use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use matching_core::model::{
    parse_body, CreateMatchingResponse, MatchingDetailResponse, MatchingListResponse,
    RecordAnswerResponse, ResultOutputResponse,
};
use matching_core::{service, Config, MatchingError, MatchingStore};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState<S> {
    store: S,
    expose_trace: bool,
}

impl<S> AppState<S> {
    fn fail(&self, err: MatchingError) -> ApiError {
        ApiError {
            error: err,
            expose_trace: self.expose_trace,
        }
    }
}

pub struct ApiError {
    pub error: MatchingError,
    pub expose_trace: bool,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(error = ?self.error, "request failed");
        } else {
            tracing::warn!(error = %self.error, %status, "request rejected");
        }

        (status, Json(self.error.to_body(self.expose_trace))).into_response()
    }
}

/// Every Lambda route in one router, for local development.
pub fn router<S>(store: S, config: &Config) -> Router
where
    S: MatchingStore + Clone + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let state = AppState {
        store,
        expose_trace: config.expose_trace,
    };

    Router::new()
        .route("/matching/list", get(list_handler::<S>))
        .route("/matching/match", get(detail_handler::<S>))
        .route("/matching/post", post(create_handler::<S>))
        .route("/matching/answer", post(answer_handler::<S>))
        .route("/matching/result_output", post(result_output_handler::<S>))
        .layer(cors)
        .with_state(state)
}

async fn list_handler<S: MatchingStore + Clone + 'static>(
    State(state): State<AppState<S>>,
) -> Result<Json<MatchingListResponse>, ApiError> {
    let list = service::list_matchings(&state.store)
        .await
        .map_err(|e| state.fail(e))?;
    Ok(Json(list))
}

#[derive(Deserialize)]
struct DetailParams {
    id: Option<String>,
}

async fn detail_handler<S: MatchingStore + Clone + 'static>(
    State(state): State<AppState<S>>,
    Query(params): Query<DetailParams>,
) -> Result<Json<MatchingDetailResponse>, ApiError> {
    let detail = service::get_matching_detail(&state.store, params.id.as_deref())
        .await
        .map_err(|e| state.fail(e))?;
    Ok(Json(detail))
}

async fn create_handler<S: MatchingStore + Clone + 'static>(
    State(state): State<AppState<S>>,
    body: Bytes,
) -> Result<Json<CreateMatchingResponse>, ApiError> {
    let request = parse_body(&body).map_err(|e| state.fail(e))?;
    let created = service::create_matching(&state.store, request)
        .await
        .map_err(|e| state.fail(e))?;
    Ok(Json(created))
}

async fn answer_handler<S: MatchingStore + Clone + 'static>(
    State(state): State<AppState<S>>,
    body: Bytes,
) -> Result<Json<RecordAnswerResponse>, ApiError> {
    let request = parse_body(&body).map_err(|e| state.fail(e))?;
    let recorded = service::record_answer(&state.store, request)
        .await
        .map_err(|e| state.fail(e))?;
    Ok(Json(recorded))
}

async fn result_output_handler<S: MatchingStore + Clone + 'static>(
    State(state): State<AppState<S>>,
    body: Bytes,
) -> Result<Json<ResultOutputResponse>, ApiError> {
    let request = parse_body(&body).map_err(|e| state.fail(e))?;
    let result = service::result_output(&state.store, request)
        .await
        .map_err(|e| state.fail(e))?;
    Ok(Json(result))
}
