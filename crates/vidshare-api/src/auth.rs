//! Bearer-token authentication.
//!
//! Tokens are HS256 JWTs whose `sub` claim is the actor identity.

use std::fmt;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use vidshare_core::identity::{ActorId, IdentityError, IdentityResolver};

use crate::error::ApiError;
use crate::state::AppState;

/// JWT claims payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Actor identity.
    pub sub: String,
    /// Expiration timestamp (seconds since the epoch).
    pub exp: u64,
}

/// `IdentityResolver` that verifies HS256 JWTs signed with a shared secret.
///
/// Tokens are minted by the identity provider that shares the secret; this
/// service only verifies them.
pub struct JwtIdentityResolver {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for JwtIdentityResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtIdentityResolver").finish_non_exhaustive()
    }
}

impl JwtIdentityResolver {
    /// Creates a resolver for tokens signed with `secret`.
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::default(),
        }
    }
}

impl IdentityResolver for JwtIdentityResolver {
    fn resolve(&self, credential: &str) -> Result<ActorId, IdentityError> {
        let token_data = decode::<Claims>(credential, &self.decoding_key, &self.validation)
            .map_err(|e| IdentityError::InvalidCredential(e.to_string()))?;
        let subject = token_data.claims.sub.trim();
        if subject.is_empty() {
            return Err(IdentityError::InvalidCredential("empty subject".into()));
        }
        Ok(ActorId::new(subject))
    }
}

/// The authenticated caller of a request.
///
/// Extracting it rejects the request with 401 before the handler runs when
/// the `Authorization: Bearer` credential is missing or does not verify.
#[derive(Debug, Clone)]
pub struct AuthenticatedActor(pub ActorId);

impl FromRequestParts<AppState> for AuthenticatedActor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(IdentityError::MissingCredential)?;
        let value = header.to_str().map_err(|_| {
            IdentityError::InvalidCredential("authorization header is not visible ASCII".into())
        })?;
        let token = value
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(IdentityError::MissingCredential)?;

        let actor = state.identity_resolver.resolve(token)?;
        debug!(actor_id = %actor, "request authenticated");
        Ok(Self(actor))
    }
}
