//! Bearer authentication.
//!
//! Tokens are HS256 JWTs whose `sub` claim is the user id. The middleware
//! resolves the token once per request and stores the caller as an
//! [`AuthUser`] extension for the handlers.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

/// Lifetime of an issued token.
pub const TOKEN_TTL_DAYS: i64 = 7;

/// The authenticated caller of a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Signs and checks session tokens with one shared secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a token for `user_id`, valid for [`TOKEN_TTL_DAYS`] days.
    pub fn issue(&self, user_id: Uuid) -> Result<String, ServerError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|err| {
            tracing::error!("failed to sign token: {err}");
            ServerError::Internal
        })
    }

    /// Verify signature and expiry, then return the user id in `sub`.
    pub fn validate(&self, token: &str) -> Result<Uuid, ServerError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|err| {
            tracing::error!("invalid token: {err}");
            unauthorized()
        })?;
        if data.claims.exp <= Utc::now().timestamp() {
            tracing::error!("token expired");
            return Err(unauthorized());
        }
        Uuid::parse_str(&data.claims.sub).map_err(|err| {
            tracing::error!("invalid token subject: {err}");
            unauthorized()
        })
    }
}

fn unauthorized() -> ServerError {
    ServerError::Unauthorized("Unauthorized".to_string())
}

/// Extract the token of a `Bearer <token>` authorization header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, ServerError> {
    let invalid = || ServerError::Unauthorized("invalid authorization header provided".to_string());

    let value = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(invalid)?;

    let mut parts = value.split_whitespace();
    let (Some(scheme), Some(token)) = (parts.next(), parts.next()) else {
        return Err(invalid());
    };
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(ServerError::Unauthorized(format!(
            "unsupported authorization type {scheme}"
        )));
    }
    Ok(token)
}

pub(crate) async fn require_auth(
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let user_id = bearer_token(request.headers())
        .inspect_err(|err| tracing::error!("authentication failed: {err}"))
        .and_then(|token| state.keys.validate(token))?;

    request.extensions_mut().insert(AuthUser(user_id));
    Ok(next.run(request).await)
}
