// handlers/public/authentication.rs - POST /api/authentication/authenticate

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::auth::{generate_jwt, validate_user_credentials, Claims};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationRequestBody {
    #[serde(alias = "username")]
    pub user_name: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthenticationResponse {
    pub token: String,
    pub expires_in: u64,
}

/// POST /api/authentication/authenticate - Exchange credentials for a bearer token
///
/// ```json
/// { "userName": "string", "password": "string" }
/// ```
pub async fn authenticate(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> ApiResult<AuthenticationResponse> {
    let body: AuthenticationRequestBody =
        serde_json::from_value(payload).map_err(|e| ApiError::invalid_json(e.to_string()))?;

    let security = &state.config.security;
    let user = validate_user_credentials(
        body.user_name.as_deref(),
        body.password.as_deref(),
        &security.demo_city,
    )?;

    let token = generate_jwt(&Claims::new(&user, security), security)?;
    info!("Issued token for user {}", user.user_name);

    Ok(ApiResponse::success(AuthenticationResponse {
        token,
        expires_in: security.jwt_expiry_hours * 3600,
    }))
}
