use crate::config::ServerConfig;
use crate::keys::ServerKeys;
use crate::tls::{self, TlsListener};
use axum::{
    Router,
    extract::{Json, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use common::crypto;
use rsa::rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument, warn};

const TOKEN_BYTES: usize = 32;

#[derive(Clone)]
pub struct AppState {
    keys: Arc<ServerKeys>,
    accounts: Arc<HashMap<String, String>>,
}

impl AppState {
    pub fn new(keys: Arc<ServerKeys>, accounts: HashMap<String, String>) -> Self {
        Self {
            keys,
            accounts: Arc::new(accounts),
        }
    }
}

/// Missing fields are answered with 400 rather than a JSON rejection.
#[derive(Debug, Deserialize)]
struct LoginBody {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginSuccess {
    pub username: String,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct HealthResponse {
    status: String,
    version: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/public-key", get(get_public_key))
        .route("/api/users/login", post(login))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(cfg: Arc<ServerConfig>, state: AppState) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    let tls_config = if cfg.tls {
        Some(Arc::new(tls::self_signed_server_config(
            &cfg.tls_subject_alt_names,
        )?))
    } else {
        None
    };

    serve(listener, tls_config, router(state)).await
}

/// Serve `app` on `listener`, over TLS when `tls_config` is given.
pub async fn serve(
    listener: TcpListener,
    tls_config: Option<Arc<rustls::ServerConfig>>,
    app: Router,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    match tls_config {
        Some(tls_config) => {
            info!("Key server listening on https://{}", addr);
            axum::serve(TlsListener::new(listener, tls_config), app).await?;
        }
        None => {
            info!("Key server listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }
    Ok(())
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn get_public_key(State(state): State<AppState>) -> impl IntoResponse {
    match state.keys.public_key_pem() {
        Ok(pem) => (StatusCode::OK, pem),
        Err(e) => {
            error!("Failed to encode public key: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error loading public key".to_string(),
            )
        }
    }
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginBody>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Unreadable login body: {}", rejection.body_text());
            return (
                StatusCode::BAD_REQUEST,
                "Username and password must not be null",
            )
                .into_response();
        }
    };

    let username = request.username.filter(|u| !u.trim().is_empty());
    let password = request.password.filter(|p| !p.trim().is_empty());
    let (Some(username), Some(password)) = (username, password) else {
        return (
            StatusCode::BAD_REQUEST,
            "Username and password must not be null",
        )
            .into_response();
    };

    let plaintext = match crypto::decrypt_password(state.keys.private_key(), &password) {
        Ok(plaintext) => plaintext,
        Err(e) => {
            warn!("Rejected login for {}: {}", username, e);
            return (StatusCode::BAD_REQUEST, "Invalid password encryption").into_response();
        }
    };

    let authenticated = state
        .accounts
        .get(&username)
        .is_some_and(|expected| constant_time_eq(expected.as_bytes(), plaintext.as_bytes()));
    if !authenticated {
        info!("Login failed for {}", username);
        return (StatusCode::UNAUTHORIZED, "Invalid username or password").into_response();
    }

    info!("Login succeeded for {}", username);
    (
        StatusCode::OK,
        Json(LoginSuccess {
            username,
            token: issue_token(),
        }),
    )
        .into_response()
}

fn issue_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
