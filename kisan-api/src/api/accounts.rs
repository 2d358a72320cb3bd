//! Farmer account handlers: signup and signin

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::error::{ApiError, Result};
use crate::pipeline::normalize::ValidationError;
use crate::state::AppContext;
use kisan_common::auth::{hash_password, issue_token, verify_password};
use kisan_common::db::farmers::{get_farmer_by_email, insert_farmer};

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub message: String,
    pub token: String,
}

/// POST /auth/signup - Create a farmer account and issue a token
pub async fn signup(
    State(ctx): State<AppContext>,
    Json(body): Json<SignupRequest>,
) -> Result<Json<TokenResponse>> {
    let name = require_str(body.name, "name")?;
    let email = require_str(body.email, "email")?;
    let password = require_str(body.password, "password")?;
    let city = require_str(body.city, "city")?;

    let password_hash = hash_password(&password);

    let farmer_id = insert_farmer(&ctx.db_pool, &name, &email, &password_hash, &city)
        .await
        .map_err(|e| match e {
            // Duplicate email is the caller's mistake, not an outage
            kisan_common::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        })?;

    let token = issue_token(farmer_id, &ctx.jwt_secret)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    info!(farmer_id = %farmer_id, "Farmer signed up");

    Ok(Json(TokenResponse {
        message: "Signup successful".to_string(),
        token,
    }))
}

/// POST /auth/signin - Verify credentials and issue a token
pub async fn signin(
    State(ctx): State<AppContext>,
    Json(body): Json<SigninRequest>,
) -> Result<Json<Value>> {
    let email = require_str(body.email, "email")?;
    let password = require_str(body.password, "password")?;

    let farmer = get_farmer_by_email(&ctx.db_pool, &email)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let Some(farmer) = farmer else {
        return Err(ApiError::Auth("Invalid credentials".to_string()));
    };

    if !verify_password(&password, &farmer.password_hash) {
        return Err(ApiError::Auth("Invalid credentials".to_string()));
    }

    let token = issue_token(farmer.farmer_id, &ctx.jwt_secret)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    info!(farmer_id = %farmer.farmer_id, "Farmer signed in");

    Ok(Json(json!({
        "message": "Signin successful",
        "token": token,
        "farmer": {
            "id": farmer.farmer_id,
            "name": farmer.name,
            "city": farmer.city,
        }
    })))
}

fn require_str(value: Option<String>, field: &'static str) -> Result<String> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(ApiError::Validation(ValidationError::MissingField(field))),
    }
}
