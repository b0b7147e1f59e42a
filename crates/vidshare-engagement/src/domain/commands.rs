//! Commands for the Engagement context.

use uuid::Uuid;
use vidshare_core::command::Command;
use vidshare_core::identity::ActorId;

use super::reactions::Reaction;

/// Command to upload (register) a new video.
#[derive(Debug, Clone)]
pub struct UploadVideo {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The identifier assigned to the new video.
    pub video_id: Uuid,
    /// The uploading principal; becomes the owner.
    pub uploader_id: ActorId,
    /// The video title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Optional thumbnail location.
    pub thumbnail_url: Option<String>,
    /// Optional channel reference.
    pub channel_id: Option<String>,
}

impl Command for UploadVideo {
    fn command_type(&self) -> &'static str {
        "engagement.upload_video"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn aggregate_id(&self) -> Uuid {
        self.video_id
    }
}

/// Command to count one view of a video.
#[derive(Debug, Clone)]
pub struct RecordView {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The video identifier.
    pub video_id: Uuid,
}

impl Command for RecordView {
    fn command_type(&self) -> &'static str {
        "engagement.record_view"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn aggregate_id(&self) -> Uuid {
        self.video_id
    }
}

/// Command to edit a video's title and/or description.
#[derive(Debug, Clone)]
pub struct UpdateVideoDetails {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The video identifier.
    pub video_id: Uuid,
    /// The acting principal; must be the uploader.
    pub actor_id: ActorId,
    /// New title; `None` or blank keeps the current one.
    pub title: Option<String>,
    /// New description; `None` or blank keeps the current one.
    pub description: Option<String>,
}

impl Command for UpdateVideoDetails {
    fn command_type(&self) -> &'static str {
        "engagement.update_video_details"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn aggregate_id(&self) -> Uuid {
        self.video_id
    }
}

/// Command to delete a video together with its comments.
#[derive(Debug, Clone)]
pub struct DeleteVideo {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The video identifier.
    pub video_id: Uuid,
    /// The acting principal; must be the uploader.
    pub actor_id: ActorId,
}

impl Command for DeleteVideo {
    fn command_type(&self) -> &'static str {
        "engagement.delete_video"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn aggregate_id(&self) -> Uuid {
        self.video_id
    }
}

/// Command to toggle a like or dislike.
#[derive(Debug, Clone)]
pub struct ReactToVideo {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The video identifier.
    pub video_id: Uuid,
    /// The reacting principal.
    pub actor_id: ActorId,
    /// Which reaction to toggle.
    pub reaction: Reaction,
}

impl Command for ReactToVideo {
    fn command_type(&self) -> &'static str {
        match self.reaction {
            Reaction::Like => "engagement.like_video",
            Reaction::Dislike => "engagement.dislike_video",
        }
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn aggregate_id(&self) -> Uuid {
        self.video_id
    }
}

/// Command to append a comment to a video.
#[derive(Debug, Clone)]
pub struct AddComment {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The video identifier.
    pub video_id: Uuid,
    /// The commenting principal.
    pub actor_id: ActorId,
    /// Comment body.
    pub text: String,
}

impl Command for AddComment {
    fn command_type(&self) -> &'static str {
        "engagement.add_comment"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn aggregate_id(&self) -> Uuid {
        self.video_id
    }
}

/// Command to replace the text of a comment.
#[derive(Debug, Clone)]
pub struct EditComment {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The video identifier.
    pub video_id: Uuid,
    /// The comment to edit.
    pub comment_id: Uuid,
    /// The acting principal; must be the comment author.
    pub actor_id: ActorId,
    /// Replacement text.
    pub text: String,
}

impl Command for EditComment {
    fn command_type(&self) -> &'static str {
        "engagement.edit_comment"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn aggregate_id(&self) -> Uuid {
        self.video_id
    }
}

/// Command to remove a comment.
#[derive(Debug, Clone)]
pub struct DeleteComment {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The video identifier.
    pub video_id: Uuid,
    /// The comment to remove.
    pub comment_id: Uuid,
    /// The acting principal; must be the comment author.
    pub actor_id: ActorId,
}

impl Command for DeleteComment {
    fn command_type(&self) -> &'static str {
        "engagement.delete_comment"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn aggregate_id(&self) -> Uuid {
        self.video_id
    }
}
