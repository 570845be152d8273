use axum::{error_handling::HandleErrorLayer, middleware, routing::get, Router};
use persistence::repositories::{InMemoryTodoRepository, MongoTodoRepository, TodoRepository};
use persistence::StoreError;
use std::sync::Arc;
use std::time::Duration;
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::config::{Config, DatabaseConfig, StorageBackend};
use crate::error::handle_middleware_error;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{health, todos};

#[derive(Clone)]
pub struct AppState {
    pub todos: Arc<dyn TodoRepository>,
    pub config: Arc<Config>,
}

/// Builds the todo store selected by configuration.
///
/// For MongoDB this connects and pings once; an error here means the server
/// cannot operate.
pub async fn build_repository(
    config: &DatabaseConfig,
) -> Result<Arc<dyn TodoRepository>, StoreError> {
    match config.backend {
        StorageBackend::Mongo => {
            let db_config: persistence::db::DatabaseConfig = config.into();
            let database = persistence::db::connect(&db_config).await?;
            Ok(Arc::new(MongoTodoRepository::new(
                database,
                &config.collection,
            )))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory todo store; data will not survive a restart");
            Ok(Arc::new(InMemoryTodoRepository::new()))
        }
    }
}

/// Item routes, mounted under each public prefix.
fn todo_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(todos::list_todos).post(todos::create_todo))
        .route(
            "/:id",
            get(todos::get_todo)
                .put(todos::update_todo)
                .delete(todos::delete_todo),
        )
}

pub fn create_app(config: Config, todos: Arc<dyn TodoRepository>) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        todos,
        config: config.clone(),
    };

    // Build CORS layer based on configuration
    let cors = if config.server.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .server
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let mut public_routes = Router::new()
        .route("/", get(health::root))
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live));

    if config.metrics.enabled {
        public_routes = public_routes.route("/metrics", get(metrics_handler));
    }

    info!(
        backend = ?config.database.backend,
        metrics = config.metrics.enabled,
        "Building router"
    );

    Router::new()
        .merge(public_routes)
        .nest("/items", todo_routes())
        .nest("/api/todos", todo_routes())
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.server.request_timeout_secs,
                ))),
        )
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
