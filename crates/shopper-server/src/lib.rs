//! HTTP front-end for the Luxury Shopper chatbot.
//!
//! A visitor calls `GET /welcome` once to open a session and receives its id.
//! Every following chat message goes to `POST /chat` with that id in the
//! `Authorization` header. Turns on the same session are serialized by the
//! session's own lock, so two tabs sharing an id cannot interleave a turn.

pub mod error;

pub use error::{Result, ServerError};

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, HeaderMap};
use axum::response::{Html, Json};
use axum::routing::{get, post};
use axum::{middleware, Router};
use serde::{Deserialize, Serialize};
use shopper_core::{
    generate_session_id, ConversationEngine, SearchGateway, ServerSettings, Session,
    SessionStore, ShopperConfig, TurnOutcome,
};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub const WELCOME_MESSAGE: &str =
    "Welcome to The Luxury Shopper.<br> What are you looking for? say something like 'Gucci Tshirt' ";

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
    pub active_sessions: usize,
    pub busy_sessions: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
    pub uuid: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
}

/// Configuration for the shopper server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Enable CORS
    pub enable_cors: bool,
    /// CORS allowed origins (if None, allows any origin)
    pub cors_origins: Option<Vec<String>>,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
    /// Enable request logging
    pub enable_logging: bool,
    /// Sessions untouched for this long are dropped. `None` keeps them forever.
    pub idle_ttl: Option<Duration>,
    pub sweep_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            enable_cors: true,
            cors_origins: None,
            max_body_size: 64 * 1024,
            enable_logging: true,
            idle_ttl: None,
            sweep_interval: Duration::from_secs(60),
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the `server` and `session` sections of a loaded config.
    pub fn from_settings(config: &ShopperConfig) -> Result<Self> {
        let ServerSettings {
            bind_addr,
            enable_cors,
            cors_origins,
            max_body_size,
            enable_logging,
        } = &config.server;

        let server = Self::new()
            .with_bind_addr_str(bind_addr)?
            .with_cors(*enable_cors)
            .with_max_body_size(*max_body_size)
            .with_logging(*enable_logging)
            .with_idle_ttl(config.session.idle_ttl())
            .with_sweep_interval(config.session.sweep_interval());

        Ok(if cors_origins.is_empty() {
            server
        } else {
            server.with_cors_origins(cors_origins.clone())
        })
    }

    /// Set the bind address.
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Parse and set the bind address from a string.
    pub fn with_bind_addr_str(mut self, addr: &str) -> Result<Self> {
        self.bind_addr = addr
            .parse()
            .map_err(|e| ServerError::config_error(format!("Invalid bind address: {}", e)))?;
        Ok(self)
    }

    /// Enable or disable CORS.
    pub fn with_cors(mut self, enable: bool) -> Self {
        self.enable_cors = enable;
        self
    }

    /// Set allowed CORS origins.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Set maximum request body size.
    pub fn with_max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    /// Enable or disable request logging.
    pub fn with_logging(mut self, enable: bool) -> Self {
        self.enable_logging = enable;
        self
    }

    pub fn with_idle_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.idle_ttl = ttl;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: SessionStore,
    pub engine: ConversationEngine,
}

async fn index_handler() -> Html<&'static str> {
    Html(
        "<!DOCTYPE html><html><head><title>The Luxury Shopper</title></head><body>\
         <h1>The Luxury Shopper</h1><ul>\
         <li><code>GET /welcome</code> opens a chat session and returns its id</li>\
         <li><code>POST /chat</code> sends <code>{\"message\": \"...\"}</code> \
         with the session id in the <code>Authorization</code> header</li>\
         <li><code>GET /health</code> reports service health</li>\
         </ul></body></html>",
    )
}

async fn health_handler(State(app_state): State<AppState>) -> Json<HealthResponse> {
    let stats = app_state.store.stats().await;
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        active_sessions: stats.total_sessions,
        busy_sessions: stats.busy_sessions,
    })
}

/// Handler for the /welcome GET endpoint.
async fn welcome_handler(State(app_state): State<AppState>) -> Json<WelcomeResponse> {
    let id = generate_session_id();
    app_state.store.create(id.clone()).await;
    log::info!("Opened session {}", id);

    Json(WelcomeResponse {
        message: WELCOME_MESSAGE.to_string(),
        uuid: id,
    })
}

/// Handler for the /chat POST endpoint.
async fn chat_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ChatResponse>> {
    let session_id = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ServerError::MissingSessionHeader)?;

    let handle = app_state
        .store
        .get(session_id)
        .await
        .ok_or_else(|| ServerError::UnknownSession(session_id.to_string()))?;

    let request: ChatRequest = serde_json::from_slice(&body)?;
    log::debug!("Session {} said '{}'", session_id, request.message);

    let mut session = handle.lock().await;
    let reply = app_state
        .engine
        .handle_turn(&mut session, &request.message)
        .await
        .map_err(|e| {
            log::error!("Turn for session {} failed: {}", session_id, e);
            ServerError::from(e)
        })?;

    if reply.is_terminal() {
        log::info!(
            "Session {} finished a search ({:?}), starting over",
            session_id,
            reply.outcome
        );
    }

    match reply.outcome {
        TurnOutcome::UpstreamFailure => Err(ServerError::UpstreamFailure(reply.message)),
        _ => Ok(Json(ChatResponse {
            message: reply.message,
            session: reply.session,
        })),
    }
}

/// Periodically drop sessions idle for longer than `ttl`.
pub fn spawn_idle_sweeper(store: SessionStore, ttl: Duration, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let purged = store.purge_idle(ttl).await;
            if purged > 0 {
                log::info!("Dropped {} idle session(s)", purged);
            }
        }
    })
}

/// The shopper HTTP server.
pub struct ShopperServer {
    store: SessionStore,
    engine: ConversationEngine,
    config: ServerConfig,
}

impl ShopperServer {
    pub fn new(engine: ConversationEngine, config: ServerConfig) -> Self {
        Self {
            store: SessionStore::new(),
            engine,
            config,
        }
    }

    /// Wire the HTTP search gateway and the dialogue engine from a loaded config.
    pub fn from_config(config: &ShopperConfig) -> Result<Self> {
        let gateway = SearchGateway::http(config.search.clone());
        let engine = ConversationEngine::new(gateway, config.dialogue.clone());
        Ok(Self::new(engine, ServerConfig::from_settings(config)?))
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Update the server configuration.
    pub fn set_config(&mut self, config: ServerConfig) {
        self.config = config;
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Build the Axum router with all routes and middleware.
    pub fn build_router(&self) -> Router {
        let state = AppState {
            store: self.store.clone(),
            engine: self.engine.clone(),
        };

        let mut router = Router::new()
            .route("/", get(index_handler))
            .route("/health", get(health_handler))
            .route("/welcome", get(welcome_handler))
            .route("/chat", post(chat_handler))
            .layer(DefaultBodyLimit::max(self.config.max_body_size))
            .with_state(state);

        if self.config.enable_logging {
            router = router.layer(middleware::from_fn(
                |request: axum::http::Request<axum::body::Body>,
                 next: axum::middleware::Next| async {
                    let request_id = uuid::Uuid::new_v4().to_string();
                    let method = request.method().clone();
                    let uri = request.uri().clone();

                    // Health checks are frequent
                    let quiet = uri.path() == "/health";
                    if quiet {
                        log::debug!("Request {} {} {}", request_id, method, uri);
                    } else {
                        log::info!("Request {} {} {}", request_id, method, uri);
                    }

                    let start = std::time::Instant::now();
                    let response = next.run(request).await;
                    let duration = start.elapsed();

                    if quiet {
                        log::debug!("Response {} completed in {:?}", request_id, duration);
                    } else {
                        log::info!(
                            "Response {} {} completed in {:?}",
                            request_id,
                            response.status(),
                            duration
                        );
                    }

                    response
                },
            ));
        }

        router = router.layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            let cors_layer = if let Some(ref origins) = self.config.cors_origins {
                let origins: std::result::Result<Vec<_>, _> =
                    origins.iter().map(|s| s.parse()).collect();
                match origins {
                    Ok(origins) => CorsLayer::new()
                        .allow_origin(origins)
                        .allow_methods(Any)
                        .allow_headers(Any),
                    Err(_) => {
                        log::warn!("Invalid CORS origin in configuration, allowing any origin");
                        CorsLayer::permissive()
                    }
                }
            } else {
                CorsLayer::permissive()
            };
            router = router.layer(cors_layer);
        }

        router
    }

    async fn bind(&self) -> Result<TcpListener> {
        TcpListener::bind(self.config.bind_addr).await.map_err(|e| {
            ServerError::config_error(format!(
                "Failed to bind to {}: {}",
                self.config.bind_addr, e
            ))
        })
    }

    /// Start the server and listen for connections until the process exits.
    pub async fn serve(self) -> Result<()> {
        self.serve_with_shutdown(std::future::pending::<()>()).await
    }

    /// Start the server with graceful shutdown support.
    ///
    /// The server will shut down when the provided shutdown signal is received.
    pub async fn serve_with_shutdown<F>(self, shutdown_signal: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let listener = self.bind().await?;
        self.serve_listener(listener, shutdown_signal).await
    }

    /// Serve on an already bound listener.
    pub async fn serve_listener<F>(self, listener: TcpListener, shutdown_signal: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = self.build_router();
        let addr = listener.local_addr()?;

        log::info!("Luxury Shopper server starting on {}", addr);
        log::info!("Welcome endpoint: http://{}/welcome", addr);
        log::info!("Chat endpoint: http://{}/chat", addr);
        log::info!("Health check: http://{}/health", addr);

        let sweeper = self.config.idle_ttl.map(|ttl| {
            log::info!(
                "Idle sessions expire after {:?} (checked every {:?})",
                ttl,
                self.config.sweep_interval
            );
            spawn_idle_sweeper(self.store.clone(), ttl, self.config.sweep_interval)
        });

        let served = axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ServerError::internal(format!("Server error: {}", e)));

        if let Some(sweeper) = sweeper {
            sweeper.abort();
        }
        served?;

        log::info!("Luxury Shopper server shut down gracefully");
        Ok(())
    }
}

/// Utility function to create a shutdown signal from Ctrl+C.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log::info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            log::info!("Received SIGTERM, shutting down...");
        },
    }
}
