//! Authentication middleware
//!
//! A single middleware handles both required and optional auth: it always
//! attempts bearer parsing and inserts `AuthFarmer(Option<Uuid>)` as a
//! request extension. A missing header passes through as a guest; an
//! explicitly presented but invalid or expired token is rejected with 401.
//! Handlers that require an owner check for presence downstream.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::state::AppContext;
use kisan_common::auth::verify_token;

/// Caller identity extension: `None` for guests
#[derive(Debug, Clone, Copy)]
pub struct AuthFarmer(pub Option<uuid::Uuid>);

impl AuthFarmer {
    /// Identity required by the endpoint; 401 when absent
    pub fn require(&self) -> Result<uuid::Uuid, ApiError> {
        self.0
            .ok_or_else(|| ApiError::Auth("Token is missing!".to_string()))
    }
}

/// Parse the Authorization header, validate the token, attach the identity
pub async fn auth_middleware(
    State(ctx): State<AppContext>,
    mut request: Request,
    next: Next,
) -> Response {
    let bearer = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);

    let identity = match bearer {
        None => AuthFarmer(None),
        Some(token) => match verify_token(&token, &ctx.jwt_secret) {
            Ok(farmer_id) => AuthFarmer(Some(farmer_id)),
            Err(e) => {
                tracing::debug!("Rejected bearer token: {}", e);
                return ApiError::Auth("Token is invalid!".to_string()).into_response();
            }
        },
    };

    request.extensions_mut().insert(identity);
    next.run(request).await
}
