use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, UNAUTHORIZED};

/// Claims
///
/// Payload carried inside every identity token.
///
/// Only the user id is encoded; there is no `exp` claim, so tokens do not expire
/// (see DESIGN.md, open question on expiry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
}

/// TokenService
///
/// Issues and verifies HS256 identity tokens. Holds only the keys derived from the
/// configured secret, so it is a pure function of its inputs and cheap to clone into
/// the application state.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // No registered claim is mandatory; the signature is the whole check.
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// issue
    ///
    /// Signs `{ id: user_id }`.
    pub fn issue(&self, user_id: Uuid) -> Result<String, ApiError> {
        encode(
            &Header::new(Algorithm::HS256),
            &Claims { id: user_id },
            &self.encoding,
        )
        .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))
    }

    /// verify
    ///
    /// Returns the user id encoded in `token`, or `Unauthorized` when the token is
    /// malformed or its signature does not match.
    pub fn verify(&self, token: &str) -> Result<Uuid, ApiError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims.id)
            .map_err(|e| {
                tracing::debug!(reason = ?e.kind(), "token rejected");
                ApiError::Unauthorized(UNAUTHORIZED)
            })
    }
}

/// AuthUser
///
/// Identity resolved from a verified token. The authorization middleware stores it in
/// the request extensions, where protected handlers read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
}

/// bearer_token
///
/// Reads the token from the `Authorization` header. The header carries the raw token;
/// a `Bearer ` prefix is tolerated.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then_some(token)
}

/// AuthUser Extractor Implementation
///
/// Rejects with `ApiError::Unauthorized` (401) when the header is missing or the token
/// fails verification. Never touches the store.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    TokenService: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = TokenService::from_ref(state);

        let token = bearer_token(parts).ok_or(ApiError::Unauthorized(UNAUTHORIZED))?;
        let id = tokens.verify(token)?;

        Ok(AuthUser { id })
    }
}
