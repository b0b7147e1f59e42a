//! Comment ledger: the ordered comments of a single video.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vidshare_core::error::DomainError;
use vidshare_core::identity::ActorId;

/// A comment attached to a video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Identifier, unique within the parent video.
    pub comment_id: Uuid,
    /// The principal who wrote the comment.
    pub author_id: ActorId,
    /// Comment body.
    pub text: String,
    /// Creation time, refreshed on every edit.
    pub timestamp: DateTime<Utc>,
}

/// Rejects comment bodies that are empty or whitespace-only.
///
/// # Errors
///
/// Returns `DomainError::Validation` if `text` has no visible content.
pub fn validate_text(text: &str) -> Result<(), DomainError> {
    if text.trim().is_empty() {
        return Err(DomainError::Validation(
            "comment text must not be empty".into(),
        ));
    }
    Ok(())
}

/// Comments of a video in insertion (display) order.
///
/// Positions are not identifiers: deleting a comment shifts every later one.
/// Lookups always go through `comment_id`.
#[derive(Debug, Clone, Default)]
pub struct CommentLedger {
    comments: Vec<Comment>,
}

impl CommentLedger {
    /// Comments in display order.
    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Number of comments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    /// Whether the ledger holds no comments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Finds a comment by identifier.
    #[must_use]
    pub fn find(&self, comment_id: Uuid) -> Option<&Comment> {
        self.comments.iter().find(|c| c.comment_id == comment_id)
    }

    /// Finds a comment that `actor` is allowed to mutate.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::CommentNotFound` if no such comment exists and
    /// `DomainError::Forbidden` if `actor` is not its author.
    pub fn authorize(
        &self,
        video_id: Uuid,
        comment_id: Uuid,
        actor: &ActorId,
    ) -> Result<&Comment, DomainError> {
        let comment = self
            .find(comment_id)
            .ok_or(DomainError::CommentNotFound {
                video_id,
                comment_id,
            })?;
        if &comment.author_id != actor {
            return Err(DomainError::Forbidden(format!(
                "comment {comment_id} belongs to another author"
            )));
        }
        Ok(comment)
    }

    /// Appends a comment at the end.
    pub fn append(&mut self, comment: Comment) {
        self.comments.push(comment);
    }

    /// Replaces the text and timestamp of a comment in place.
    pub fn replace_text(&mut self, comment_id: Uuid, text: String, timestamp: DateTime<Utc>) {
        if let Some(comment) = self.comments.iter_mut().find(|c| c.comment_id == comment_id) {
            comment.text = text;
            comment.timestamp = timestamp;
        }
    }

    /// Removes a comment, returning it if it was present.
    pub fn remove(&mut self, comment_id: Uuid) -> Option<Comment> {
        let index = self
            .comments
            .iter()
            .position(|c| c.comment_id == comment_id)?;
        Some(self.comments.remove(index))
    }

    /// Drops every comment and returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.comments.len();
        self.comments.clear();
        removed
    }
}
