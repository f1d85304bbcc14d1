//! In-memory todo service.
//!
//! # Overview
//! Serves a single `/todos` endpoint multiplexed by HTTP method and an
//! optional `id` query parameter. All records live in one [`TodoStore`]
//! shared through axum state; nothing is persisted.
//!
//! # Design
//! - Every handler takes the store lock once, so a request observes and
//!   mutates the collection atomically.
//! - Request bodies are taken as raw `Bytes` and decoded here, so malformed
//!   JSON is a `400` regardless of the `Content-Type` the client sent.

pub mod config;
pub mod error;
pub mod store;

use std::{future::Future, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tokio::{net::TcpListener, sync::RwLock};

pub use config::ServerConfig;
pub use error::{AppError, ConfigError, ServerError};
pub use store::{IdScheme, Todo, TodoStore};

pub type Db = Arc<RwLock<TodoStore>>;

/// Query string of a `/todos` request, kept as raw pairs so a bad `id` is
/// reported by the handler rather than rejected by the extractor.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct TodoQuery {
    pairs: Vec<(String, String)>,
}

impl TodoQuery {
    /// First non-empty `id` value, if any.
    fn raw_id(&self) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == "id")
            .map(|(_, value)| value.as_str())
            .filter(|value| !value.is_empty())
    }

    fn id(&self) -> Result<i64, AppError> {
        let raw = self.raw_id().ok_or(AppError::MissingId)?;
        raw.parse().map_err(|_| AppError::InvalidId)
    }
}

pub fn app(config: &ServerConfig) -> Router {
    let db: Db = Arc::new(RwLock::new(TodoStore::new(config.id_scheme)));
    let port = config.port;
    Router::new()
        .route(
            "/todos",
            get(get_todos)
                .post(create_todo)
                .put(update_todo)
                .delete(delete_todo)
                .head(method_not_allowed)
                .fallback(method_not_allowed),
        )
        .route(
            "/",
            get(move || async move { format!("Listening on port {port}") }),
        )
        .with_state(db)
}

/// Serve until Ctrl-C, then drain in-flight requests.
pub async fn run(listener: TcpListener, config: &ServerConfig) -> Result<(), std::io::Error> {
    run_until(listener, config, shutdown_signal()).await
}

pub async fn run_until<F>(
    listener: TcpListener,
    config: &ServerConfig,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    let config = ServerConfig {
        port: addr.port(),
        ..config.clone()
    };
    tracing::info!(%addr, id_scheme = %config.id_scheme, "serving /todos");
    axum::serve(listener, app(&config))
        .with_graceful_shutdown(shutdown)
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

async fn get_todos(
    State(db): State<Db>,
    Query(query): Query<TodoQuery>,
) -> Result<Response, AppError> {
    if query.raw_id().is_some() {
        get_todo(db, &query).await.map(IntoResponse::into_response)
    } else {
        Ok(list_todos(db).await.into_response())
    }
}

async fn list_todos(db: Db) -> Json<Vec<Todo>> {
    let store = db.read().await;
    Json(store.all().to_vec())
}

async fn get_todo(db: Db, query: &TodoQuery) -> Result<Json<Todo>, AppError> {
    let id = query.id()?;
    let store = db.read().await;
    let (_, todo) = store.find(id).ok_or(AppError::NotFound(id))?;
    Ok(Json(todo.clone()))
}

async fn create_todo(
    State(db): State<Db>,
    body: Bytes,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    let input = decode_todo(&body).map_err(AppError::InvalidBody)?;
    let todo = db.write().await.insert(input);
    tracing::debug!(id = todo.id, "created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo(
    State(db): State<Db>,
    Query(query): Query<TodoQuery>,
    body: Bytes,
) -> Result<Json<Todo>, AppError> {
    let id = query.id()?;
    let replacement = decode_todo(&body);

    let mut store = db.write().await;
    let (index, _) = store.find(id).ok_or(AppError::NotFound(id))?;
    let replacement = replacement.map_err(AppError::InvalidBody)?;
    let todo = store
        .replace_at(index, replacement)
        .ok_or(AppError::NotFound(id))?;
    tracing::debug!(id, "updated todo");
    Ok(Json(todo))
}

async fn delete_todo(
    State(db): State<Db>,
    Query(query): Query<TodoQuery>,
) -> Result<StatusCode, AppError> {
    let id = query.id()?;
    db.write().await.remove(id).ok_or(AppError::NotFound(id))?;
    tracing::debug!(id, "deleted todo");
    Ok(StatusCode::NO_CONTENT)
}

/// A `null` body decodes to the zero-value record.
fn decode_todo(body: &[u8]) -> Result<Todo, serde_json::Error> {
    serde_json::from_slice::<Option<Todo>>(body).map(Option::unwrap_or_default)
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
