//! Test identity resolver: token table instead of signature checks.

use std::collections::HashMap;

use vidshare_core::identity::{ActorId, IdentityError, IdentityResolver};

/// Resolves credentials from a fixed token → actor table. Unknown tokens are
/// rejected, matching the fail-closed contract of real resolvers.
#[derive(Debug, Default)]
pub struct StaticIdentityResolver {
    tokens: HashMap<String, ActorId>,
}

impl StaticIdentityResolver {
    /// Builds a resolver from `(token, actor)` pairs.
    #[must_use]
    pub fn new<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            tokens: entries
                .into_iter()
                .map(|(token, actor)| (token.to_owned(), ActorId::new(actor)))
                .collect(),
        }
    }
}

impl IdentityResolver for StaticIdentityResolver {
    fn resolve(&self, credential: &str) -> Result<ActorId, IdentityError> {
        self.tokens
            .get(credential)
            .cloned()
            .ok_or_else(|| IdentityError::InvalidCredential("unknown token".into()))
    }
}
