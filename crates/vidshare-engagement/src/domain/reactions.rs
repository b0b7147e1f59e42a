//! Reaction engine: the like/dislike sets of a single video.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use vidshare_core::identity::ActorId;

/// The two reactions an actor can hold on a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reaction {
    /// The actor likes the video.
    Like,
    /// The actor dislikes the video.
    Dislike,
}

/// Like and dislike sets of a video.
///
/// An actor is in at most one of the two sets. Every mutation goes through
/// [`ReactionSets::set_reaction`], which clears the actor from both sets
/// before inserting, so the invariant holds structurally.
#[derive(Debug, Clone, Default)]
pub struct ReactionSets {
    likes: HashSet<ActorId>,
    dislikes: HashSet<ActorId>,
}

impl ReactionSets {
    /// Returns the reaction `actor` currently holds, if any.
    #[must_use]
    pub fn reaction_of(&self, actor: &ActorId) -> Option<Reaction> {
        if self.likes.contains(actor) {
            Some(Reaction::Like)
        } else if self.dislikes.contains(actor) {
            Some(Reaction::Dislike)
        } else {
            None
        }
    }

    /// Computes the reaction `actor` ends up with after toggling `reaction`.
    ///
    /// Toggling the reaction the actor already holds clears it; toggling
    /// anything else replaces whatever the actor held.
    #[must_use]
    pub fn toggled(&self, actor: &ActorId, reaction: Reaction) -> Option<Reaction> {
        if self.reaction_of(actor) == Some(reaction) {
            None
        } else {
            Some(reaction)
        }
    }

    /// Records `reaction` as the actor's only reaction (or none).
    pub fn set_reaction(&mut self, actor: &ActorId, reaction: Option<Reaction>) {
        self.likes.remove(actor);
        self.dislikes.remove(actor);
        match reaction {
            Some(Reaction::Like) => {
                self.likes.insert(actor.clone());
            }
            Some(Reaction::Dislike) => {
                self.dislikes.insert(actor.clone());
            }
            None => {}
        }
    }

    /// Number of likes.
    #[must_use]
    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    /// Number of dislikes.
    #[must_use]
    pub fn dislike_count(&self) -> usize {
        self.dislikes.len()
    }

    /// Snapshot of both sets, sorted for deterministic output.
    #[must_use]
    pub fn tally(&self) -> ReactionTally {
        let mut likes: Vec<ActorId> = self.likes.iter().cloned().collect();
        likes.sort();
        let mut dislikes: Vec<ActorId> = self.dislikes.iter().cloned().collect();
        dislikes.sort();
        ReactionTally {
            like_count: likes.len(),
            dislike_count: dislikes.len(),
            likes,
            dislikes,
        }
    }
}

/// Result of a reaction: both sets and their cardinalities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReactionTally {
    /// Actors who like the video.
    pub likes: Vec<ActorId>,
    /// Actors who dislike the video.
    pub dislikes: Vec<ActorId>,
    /// `likes.len()`.
    pub like_count: usize,
    /// `dislikes.len()`.
    pub dislike_count: usize,
}
