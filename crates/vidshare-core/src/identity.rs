//! Acting identities and the identity resolver collaborator.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable identity of an authenticated principal.
///
/// Opaque to the domain: it is compared for equality (authorship, reaction
/// membership) and otherwise passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    /// Wraps a raw identity string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActorId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Failure to turn an inbound credential into an identity.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The request carried no credential.
    #[error("missing credential")]
    MissingCredential,

    /// The credential was present but could not be verified.
    #[error("invalid credential: {0}")]
    InvalidCredential(String),
}

/// Maps an inbound credential to a stable actor identity.
///
/// Implementations fail closed: anything that cannot be verified is an error,
/// never an anonymous identity.
pub trait IdentityResolver: Send + Sync {
    /// Resolves `credential` (for example a bearer token) to an actor.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::InvalidCredential` if verification fails.
    fn resolve(&self, credential: &str) -> Result<ActorId, IdentityError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_id_serializes_as_plain_string() {
        let actor = ActorId::new("u1");

        let json = serde_json::to_value(&actor).unwrap();

        assert_eq!(json, serde_json::json!("u1"));
        let back: ActorId = serde_json::from_value(json).unwrap();
        assert_eq!(back, actor);
    }
}
