//! Request handlers for the session API.

use super::AppState;
use crate::error::TubeQaError;
use crate::session::{AskOutcome, LoadedVideo, LogEntry, TRANSCRIPT_FILE_NAME};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};
use uuid::Uuid;

// === Request/Response Types ===

#[derive(Deserialize)]
pub struct CreateSessionRequest {
    api_key: String,
}

#[derive(Serialize)]
pub struct CreateSessionResponse {
    session_id: Uuid,
}

#[derive(Serialize)]
pub struct SessionStateResponse {
    session_id: Uuid,
    created_at: DateTime<Utc>,
    video: Option<LoadedVideo>,
    entries: Vec<LogEntry>,
}

#[derive(Deserialize)]
pub struct LoadVideoRequest {
    url: String,
}

#[derive(Deserialize)]
pub struct AskRequest {
    question: String,
}

#[derive(Serialize)]
pub struct AskResponse {
    /// False when the reply is guidance rather than an answer.
    answered: bool,
    answer: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    kind: &'static str,
}

/// A [`TubeQaError`] rendered as a JSON error response.
#[derive(Debug)]
pub struct ApiError(TubeQaError);

impl From<TubeQaError> for ApiError {
    fn from(err: TubeQaError) -> Self {
        Self(err)
    }
}

/// HTTP status for an error kind.
pub fn status_for(err: &TubeQaError) -> StatusCode {
    match err {
        TubeQaError::InvalidUrl(_) | TubeQaError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        TubeQaError::TranscriptUnavailable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        TubeQaError::Authentication(_) => StatusCode::UNAUTHORIZED,
        TubeQaError::RemoteService(_) | TubeQaError::Embedding(_) | TubeQaError::Http(_) => {
            StatusCode::BAD_GATEWAY
        }
        TubeQaError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            warn!("Request rejected: {}", self.0);
        }

        let body = Json(ErrorResponse {
            error: self.0.to_string(),
            kind: self.0.kind(),
        });

        (status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

fn parse_session_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError(TubeQaError::SessionNotFound(raw.to_string())))
}

// === Handlers ===

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSessionRequest>,
) -> ApiResult<(StatusCode, Json<CreateSessionResponse>)> {
    let session_id = state.sessions.create(&req.api_key)?;
    Ok((StatusCode::CREATED, Json(CreateSessionResponse { session_id })))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<SessionStateResponse>> {
    let id = parse_session_id(&id)?;
    let handle = state.sessions.get(id)?;
    let session = handle.lock().await;

    Ok(Json(SessionStateResponse {
        session_id: id,
        created_at: session.created_at(),
        video: session.video().cloned(),
        entries: session.log().entries().to_vec(),
    }))
}

pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_session_id(&id)?;
    state.sessions.remove(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn load_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<LoadVideoRequest>,
) -> ApiResult<Json<LoadedVideo>> {
    let id = parse_session_id(&id)?;
    let handle = state.sessions.get(id)?;
    let mut session = handle.lock().await;

    let loaded = session.load_video(&req.url).await?;
    Ok(Json(loaded))
}

pub async fn ask_question(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<AskRequest>,
) -> ApiResult<Json<AskResponse>> {
    let id = parse_session_id(&id)?;
    let handle = state.sessions.get(id)?;
    let mut session = handle.lock().await;

    let response = match session.ask(&req.question).await? {
        AskOutcome::Answered(entry) => AskResponse {
            answered: true,
            answer: entry.answer,
        },
        AskOutcome::Guidance(message) => AskResponse {
            answered: false,
            answer: message,
        },
    };
    Ok(Json(response))
}

pub async fn download_transcript(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_session_id(&id)?;
    let handle = state.sessions.get(id)?;
    let text = handle.lock().await.transcript_text();

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", TRANSCRIPT_FILE_NAME),
            ),
        ],
        text,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::build_router;
    use crate::session::testing::{CallCounts, EchoKnowledgeBase};
    use crate::session::{Session, SessionFactory, SessionStore};
    use crate::transcript::testing::FakeTranscriptSource;
    use crate::transcript::TranscriptFetcher;
    use axum::body::Body;
    use axum::http::Request;
    use axum::Router;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    struct EchoFactory;

    impl SessionFactory for EchoFactory {
        fn create(&self, api_key: &str) -> crate::Result<Session> {
            if api_key.trim().is_empty() {
                return Err(TubeQaError::InvalidInput(
                    "An OpenAI API key is required".to_string(),
                ));
            }
            Ok(Session::new(
                TranscriptFetcher::new(
                    Arc::new(FakeTranscriptSource::with_text(&["hello", "world"])),
                    true,
                ),
                Box::new(EchoKnowledgeBase {
                    calls: Arc::new(CallCounts::default()),
                }),
                "Summarize this video",
            ))
        }
    }

    fn app() -> Router {
        build_router(Arc::new(AppState {
            sessions: SessionStore::new(Arc::new(EchoFactory), 60),
        }))
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn extract_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn new_session(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/sessions", json!({ "api_key": "sk-test" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        extract_json(response).await["session_id"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app().oneshot(empty_request("GET", "/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(extract_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_index_page() {
        let response = app().oneshot(empty_request("GET", "/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("OpenAI API key"));
        assert!(html.contains("Download conversation"));
    }

    #[tokio::test]
    async fn test_empty_api_key_rejected() {
        let response = app()
            .oneshot(json_request("POST", "/api/sessions", json!({ "api_key": " " })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(extract_json(response).await["kind"], "invalid_input");
    }

    #[tokio::test]
    async fn test_full_conversation_flow() {
        let app = app();
        let id = new_session(&app).await;

        // Questions before a video are answered with guidance only.
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/sessions/{}/questions", id),
                json!({ "question": "What is this?" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = extract_json(response).await;
        assert_eq!(body["answered"], false);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/sessions/{}/video", id),
                json!({ "url": "https://youtu.be/abc123XYZ" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = extract_json(response).await;
        assert_eq!(body["video_id"], "abc123XYZ");
        assert_eq!(body["title"], "A Test Video");
        assert_eq!(body["summary"], "summary of abc123XYZ");
        assert_eq!(body["duration_seconds"], 10.0);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/sessions/{}/questions", id),
                json!({ "question": "Who speaks?" }),
            ))
            .await
            .unwrap();
        let body = extract_json(response).await;
        assert_eq!(body["answered"], true);
        assert_eq!(body["answer"], "answer to Who speaks?");

        let response = app
            .clone()
            .oneshot(empty_request("GET", &format!("/api/sessions/{}", id)))
            .await
            .unwrap();
        let body = extract_json(response).await;
        assert_eq!(body["entries"].as_array().unwrap().len(), 2);
        assert_eq!(body["video"]["video_id"], "abc123XYZ");
        let created_at: DateTime<Utc> = body["created_at"].as_str().unwrap().parse().unwrap();
        assert!(created_at <= Utc::now());

        let response = app
            .clone()
            .oneshot(empty_request("GET", &format!("/api/sessions/{}/transcript", id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains("youtube-qa-conversation-transcript.txt"));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.starts_with("Query: Summarize this video"));
        assert!(text.ends_with("Query: Who speaks?\nResponse: answer to Who speaks?\n\n"));
    }

    #[tokio::test]
    async fn test_invalid_url_is_bad_request() {
        let app = app();
        let id = new_session(&app).await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/sessions/{}/video", id),
                json!({ "url": "https://vimeo.com/12345" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(extract_json(response).await["kind"], "invalid_url");
    }

    #[tokio::test]
    async fn test_unknown_and_deleted_sessions() {
        let app = app();

        let response = app
            .clone()
            .oneshot(empty_request("GET", "/api/sessions/not-a-uuid"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let id = new_session(&app).await;
        let response = app
            .clone()
            .oneshot(empty_request("DELETE", &format!("/api/sessions/{}", id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .clone()
            .oneshot(empty_request("GET", &format!("/api/sessions/{}/transcript", id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(extract_json(response).await["kind"], "session_not_found");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&TubeQaError::TranscriptUnavailable {
                video_id: "x".into(),
                reason: "disabled".into()
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(&TubeQaError::Authentication("bad key".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(&TubeQaError::RemoteService("timeout".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&TubeQaError::Config("broken".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
