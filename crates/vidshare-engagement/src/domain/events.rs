//! Domain events for the Engagement context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vidshare_core::event::{DomainEvent, EventMetadata};
use vidshare_core::identity::ActorId;

use super::reactions::Reaction;

/// Event type name for [`VideoUploaded`].
pub const VIDEO_UPLOADED_EVENT_TYPE: &str = "engagement.video_uploaded";
/// Event type name for [`VideoDetailsUpdated`].
pub const VIDEO_DETAILS_UPDATED_EVENT_TYPE: &str = "engagement.video_details_updated";
/// Event type name for [`ReactionChanged`].
pub const REACTION_CHANGED_EVENT_TYPE: &str = "engagement.reaction_changed";
/// Event type name for [`CommentAdded`].
pub const COMMENT_ADDED_EVENT_TYPE: &str = "engagement.comment_added";
/// Event type name for [`CommentEdited`].
pub const COMMENT_EDITED_EVENT_TYPE: &str = "engagement.comment_edited";
/// Event type name for [`CommentDeleted`].
pub const COMMENT_DELETED_EVENT_TYPE: &str = "engagement.comment_deleted";
/// Event type name for [`CommentsCleared`].
pub const COMMENTS_CLEARED_EVENT_TYPE: &str = "engagement.comments_cleared";
/// Event type name for [`VideoDeleted`].
pub const VIDEO_DELETED_EVENT_TYPE: &str = "engagement.video_deleted";

/// Emitted when a video is uploaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoUploaded {
    /// The video identifier.
    pub video_id: Uuid,
    /// The owning principal.
    pub uploader_id: ActorId,
    /// The video title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Optional thumbnail location.
    pub thumbnail_url: Option<String>,
    /// Optional reference to the channel the video was published to.
    pub channel_id: Option<String>,
}

/// Emitted when the uploader edits the descriptive fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoDetailsUpdated {
    /// The video identifier.
    pub video_id: Uuid,
    /// The title after the update.
    pub title: String,
    /// The description after the update.
    pub description: String,
}

/// Emitted when an actor's reaction to a video changes.
///
/// Carries the actor's reaction *after* the toggle, so replay never has to
/// re-run toggle logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionChanged {
    /// The video identifier.
    pub video_id: Uuid,
    /// The reacting principal.
    pub actor_id: ActorId,
    /// The resulting reaction; `None` when the actor no longer reacts.
    pub reaction: Option<Reaction>,
}

/// Emitted when a comment is appended to a video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentAdded {
    /// The video identifier.
    pub video_id: Uuid,
    /// The new comment identifier.
    pub comment_id: Uuid,
    /// The comment author.
    pub author_id: ActorId,
    /// The comment body.
    pub text: String,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
}

/// Emitted when a comment's author replaces its text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentEdited {
    /// The video identifier.
    pub video_id: Uuid,
    /// The edited comment.
    pub comment_id: Uuid,
    /// The replacement text.
    pub text: String,
    /// Edit time; becomes the comment's timestamp.
    pub timestamp: DateTime<Utc>,
}

/// Emitted when a comment's author removes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentDeleted {
    /// The video identifier.
    pub video_id: Uuid,
    /// The removed comment.
    pub comment_id: Uuid,
}

/// Emitted when every comment is dropped as part of deleting the video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentsCleared {
    /// The video identifier.
    pub video_id: Uuid,
    /// How many comments were removed.
    pub removed: usize,
}

/// Emitted when the uploader deletes the video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoDeleted {
    /// The video identifier.
    pub video_id: Uuid,
}

/// Event payload variants for the Engagement context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum VideoEventKind {
    /// A video has been uploaded.
    VideoUploaded(VideoUploaded),
    /// The descriptive fields have changed.
    VideoDetailsUpdated(VideoDetailsUpdated),
    /// An actor's reaction has changed.
    ReactionChanged(ReactionChanged),
    /// A comment has been added.
    CommentAdded(CommentAdded),
    /// A comment has been edited.
    CommentEdited(CommentEdited),
    /// A comment has been deleted.
    CommentDeleted(CommentDeleted),
    /// All comments have been cleared.
    CommentsCleared(CommentsCleared),
    /// The video has been deleted.
    VideoDeleted(VideoDeleted),
}

/// Domain event envelope for the Engagement context.
#[derive(Debug, Clone)]
pub struct VideoEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: VideoEventKind,
}

impl VideoEventKind {
    /// Returns the event type name for this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::VideoUploaded(_) => VIDEO_UPLOADED_EVENT_TYPE,
            Self::VideoDetailsUpdated(_) => VIDEO_DETAILS_UPDATED_EVENT_TYPE,
            Self::ReactionChanged(_) => REACTION_CHANGED_EVENT_TYPE,
            Self::CommentAdded(_) => COMMENT_ADDED_EVENT_TYPE,
            Self::CommentEdited(_) => COMMENT_EDITED_EVENT_TYPE,
            Self::CommentDeleted(_) => COMMENT_DELETED_EVENT_TYPE,
            Self::CommentsCleared(_) => COMMENTS_CLEARED_EVENT_TYPE,
            Self::VideoDeleted(_) => VIDEO_DELETED_EVENT_TYPE,
        }
    }
}

impl DomainEvent for VideoEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("VideoEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
