//! REST front end
//!
//! - `GET /health`
//! - `GET /buildings/:building/rooms/:room` - current room state
//! - `PUT /buildings/:building/rooms/:room` - apply a desired room state

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use av_commands::{CommandDispatcher, CommandError};
use av_core::{ExecutionReport, PublicRoom};
use av_status::{StatusError, StatusPoller};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub commands: CommandDispatcher,
    pub status: StatusPoller,
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(status: StatusCode, message: impl ToString) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            message: message.to_string(),
        }),
    )
}

fn command_error(e: CommandError) -> ApiError {
    let status = if e.is_lookup() {
        StatusCode::NOT_FOUND
    } else {
        match e {
            CommandError::Conflict { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        }
    };
    warn!(%status, error = %e, "Room state change failed");
    error_response(status, e)
}

fn status_error(e: StatusError) -> ApiError {
    let status = match e {
        StatusError::Lookup(_) | StatusError::Directory(_) | StatusError::NoCommands => {
            StatusCode::NOT_FOUND
        }
        StatusError::Evaluation { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    warn!(%status, error = %e, "Room state query failed");
    error_response(status, e)
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route(
            "/buildings/:building/rooms/:room",
            get(get_room_state).put(set_room_state),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the API server, stopping on Ctrl-C
pub async fn start_server(state: AppState, addr: &str) -> std::io::Result<()> {
    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API server listening on {}", addr);
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await
}

async fn health_check() -> &'static str {
    "ok"
}

/// GET /buildings/:building/rooms/:room
async fn get_room_state(
    State(state): State<AppState>,
    Path((building, room)): Path<(String, String)>,
) -> Result<Json<PublicRoom>, ApiError> {
    state
        .status
        .get_room_state(&building, &room)
        .await
        .map(Json)
        .map_err(status_error)
}

/// PUT /buildings/:building/rooms/:room
async fn set_room_state(
    State(state): State<AppState>,
    Path((building, room)): Path<(String, String)>,
    Json(desired): Json<PublicRoom>,
) -> Result<Json<Vec<ExecutionReport>>, ApiError> {
    state
        .commands
        .set_room_state(&building, &room, &desired)
        .await
        .map(Json)
        .map_err(command_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use av_config::YamlDirectory;
    use av_core::{
        Command, Device, DeviceTransport, EvaluatorKey, Room, RoomConfiguration, TransportError,
    };
    use av_event_bus::EventBus;
    use av_evaluators::default_registry;
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    #[derive(Default)]
    struct FakeTransport {
        urls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl DeviceTransport for FakeTransport {
        async fn get(&self, url: &str) -> Result<String, TransportError> {
            self.urls.lock().unwrap().push(url.to_string());
            if url.ends_with("/power/status") {
                return Ok(r#"{"power": "on"}"#.to_string());
            }
            Ok("{}".to_string())
        }
    }

    fn room() -> Room {
        let command = |name: &str, endpoint: &str| Command {
            name: name.to_string(),
            endpoint: endpoint.to_string(),
            microservice: "http://sony:8007".to_string(),
        };

        Room {
            name: "1110".to_string(),
            building: "ITB".to_string(),
            devices: vec![Device {
                id: 1,
                name: "D1".to_string(),
                address: "10.5.34.21".to_string(),
                room: String::new(),
                building: String::new(),
                commands: vec![
                    command("PowerOn", "/:address/power/on"),
                    command("Standby", "/:address/power/standby"),
                    command("STATUS_Power", "/:address/power/status"),
                ],
                ports: vec![],
                roles: vec![],
                display: true,
                audio_device: false,
            }],
            configuration: RoomConfiguration {
                name: "Default".to_string(),
                evaluators: vec![
                    EvaluatorKey::PowerOn,
                    EvaluatorKey::Standby,
                    EvaluatorKey::StatusPower,
                ],
            },
        }
    }

    fn create_test_state(transport: Arc<FakeTransport>) -> AppState {
        let registry = Arc::new(default_registry().unwrap());
        let directory = Arc::new(YamlDirectory::new([room()]));

        AppState {
            commands: CommandDispatcher::new(registry.clone(), directory.clone(), transport.clone()),
            status: StatusPoller::new(registry, directory, transport, Arc::new(EventBus::new())),
        }
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_router(create_test_state(Arc::default()));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_room_state() {
        let app = create_router(create_test_state(Arc::default()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/buildings/ITB/rooms/1110")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["building"], "ITB");
        assert_eq!(json["displays"][0]["name"], "D1");
        assert_eq!(json["displays"][0]["power"], "on");
        assert_eq!(json["audioDevices"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_unknown_room_is_not_found() {
        let app = create_router(create_test_state(Arc::default()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/buildings/ITB/rooms/9999")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = json_body(response).await;
        assert!(json["message"].as_str().unwrap().contains("ITB-9999"));
    }

    #[tokio::test]
    async fn test_put_room_state() {
        let transport = Arc::new(FakeTransport::default());
        let app = create_router(create_test_state(transport.clone()));

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/buildings/itb/rooms/1110")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"power": "standby"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(
            json,
            serde_json::json!([{"success": true, "action": "Standby", "device": "D1"}])
        );
        assert_eq!(
            *transport.urls.lock().unwrap(),
            vec!["http://sony:8007/10.5.34.21/power/standby".to_string()]
        );
    }

    #[tokio::test]
    async fn test_put_conflict_is_bad_request() {
        let app = create_router(create_test_state(Arc::default()));

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/buildings/ITB/rooms/1110")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"displays": [{"name": "D1", "power": "on"}, {"name": "D1", "power": "standby"}]}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
