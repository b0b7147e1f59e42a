//! Aggregate roots for the Engagement context.

use chrono::{DateTime, Utc};
use uuid::Uuid;
use vidshare_core::aggregate::AggregateRoot;
use vidshare_core::clock::Clock;
use vidshare_core::error::DomainError;
use vidshare_core::event::EventMetadata;
use vidshare_core::id::IdGenerator;
use vidshare_core::identity::ActorId;

use super::comments::{Comment, CommentLedger, validate_text};
use super::events::{
    CommentAdded, CommentDeleted, CommentEdited, CommentsCleared, ReactionChanged, VideoDeleted,
    VideoDetailsUpdated, VideoEvent, VideoEventKind, VideoUploaded,
};
use super::reactions::{Reaction, ReactionSets, ReactionTally};

/// Per-command inputs shared by every event a command records: one
/// correlation ID, one timestamp, and the identifier source.
#[derive(Clone, Copy)]
pub struct EventContext<'a> {
    correlation_id: Uuid,
    now: DateTime<Utc>,
    ids: &'a dyn IdGenerator,
}

impl<'a> EventContext<'a> {
    /// Captures the clock once so all events of a command share a timestamp.
    #[must_use]
    pub fn new(correlation_id: Uuid, clock: &dyn Clock, ids: &'a dyn IdGenerator) -> Self {
        Self {
            correlation_id,
            now: clock.now(),
            ids,
        }
    }

    /// The time the command is being handled.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

/// Descriptive fields of an uploaded video.
#[derive(Debug, Clone)]
pub struct VideoDetails {
    /// The owning principal.
    pub uploader_id: ActorId,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Optional thumbnail location.
    pub thumbnail_url: Option<String>,
    /// Optional channel reference.
    pub channel_id: Option<String>,
    /// Upload time.
    pub uploaded_at: DateTime<Utc>,
}

/// The aggregate root for a video and everything embedded in it.
#[derive(Debug)]
pub struct Video {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Current version (persisted event count).
    pub(crate) version: i64,
    details: Option<VideoDetails>,
    reactions: ReactionSets,
    comments: CommentLedger,
    deleted: bool,
    /// Uncommitted events pending persistence.
    uncommitted_events: Vec<VideoEvent>,
}

impl Video {
    /// Creates an empty, not yet uploaded video.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            details: None,
            reactions: ReactionSets::default(),
            comments: CommentLedger::default(),
            deleted: false,
            uncommitted_events: Vec::new(),
        }
    }

    /// Whether the video has been uploaded and not deleted.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.details.is_some() && !self.deleted
    }

    /// Descriptive fields, if the video has been uploaded.
    #[must_use]
    pub fn details(&self) -> Option<&VideoDetails> {
        self.details.as_ref()
    }

    /// The like/dislike sets.
    #[must_use]
    pub fn reactions(&self) -> &ReactionSets {
        &self.reactions
    }

    /// Comments in display order.
    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        self.comments.comments()
    }

    /// Whether the uploader has deleted the video.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Returns the next sequence number for a new event.
    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }

    fn ensure_exists(&self) -> Result<&VideoDetails, DomainError> {
        match &self.details {
            Some(details) if !self.deleted => Ok(details),
            _ => Err(DomainError::AggregateNotFound(self.id)),
        }
    }

    fn ensure_uploader(&self, actor: &ActorId) -> Result<(), DomainError> {
        let details = self.ensure_exists()?;
        if &details.uploader_id != actor {
            return Err(DomainError::Forbidden(format!(
                "video {} belongs to another uploader",
                self.id
            )));
        }
        Ok(())
    }

    /// Builds an event, folds it into the in-memory state and queues it for
    /// persistence. `version` is left alone until the events are stored.
    fn record(&mut self, kind: VideoEventKind, ctx: &EventContext<'_>) {
        let event = VideoEvent {
            metadata: EventMetadata::caused_by_command(
                ctx.ids.next_id(),
                kind.event_type(),
                self.id,
                self.next_sequence_number(),
                ctx.correlation_id,
                ctx.now,
            ),
            kind,
        };
        self.mutate(&event);
        self.uncommitted_events.push(event);
    }

    fn mutate(&mut self, event: &VideoEvent) {
        match &event.kind {
            VideoEventKind::VideoUploaded(payload) => {
                self.details = Some(VideoDetails {
                    uploader_id: payload.uploader_id.clone(),
                    title: payload.title.clone(),
                    description: payload.description.clone(),
                    thumbnail_url: payload.thumbnail_url.clone(),
                    channel_id: payload.channel_id.clone(),
                    uploaded_at: event.metadata.occurred_at,
                });
            }
            VideoEventKind::VideoDetailsUpdated(payload) => {
                if let Some(details) = self.details.as_mut() {
                    details.title.clone_from(&payload.title);
                    details.description.clone_from(&payload.description);
                }
            }
            VideoEventKind::ReactionChanged(payload) => {
                self.reactions.set_reaction(&payload.actor_id, payload.reaction);
            }
            VideoEventKind::CommentAdded(payload) => {
                self.comments.append(Comment {
                    comment_id: payload.comment_id,
                    author_id: payload.author_id.clone(),
                    text: payload.text.clone(),
                    timestamp: payload.timestamp,
                });
            }
            VideoEventKind::CommentEdited(payload) => {
                self.comments
                    .replace_text(payload.comment_id, payload.text.clone(), payload.timestamp);
            }
            VideoEventKind::CommentDeleted(payload) => {
                self.comments.remove(payload.comment_id);
            }
            VideoEventKind::CommentsCleared(_) => {
                self.comments.clear();
            }
            VideoEventKind::VideoDeleted(_) => {
                self.deleted = true;
            }
        }
    }

    /// Uploads the video, producing a `VideoUploaded` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the title is blank or the video
    /// already exists.
    pub fn upload(
        &mut self,
        uploader_id: ActorId,
        title: &str,
        description: &str,
        thumbnail_url: Option<String>,
        channel_id: Option<String>,
        ctx: &EventContext<'_>,
    ) -> Result<(), DomainError> {
        if self.details.is_some() {
            return Err(DomainError::Validation(format!(
                "video {} already exists",
                self.id
            )));
        }
        let title = title.trim();
        if title.is_empty() {
            return Err(DomainError::Validation(
                "video title must not be empty".into(),
            ));
        }
        self.record(
            VideoEventKind::VideoUploaded(VideoUploaded {
                video_id: self.id,
                uploader_id,
                title: title.to_owned(),
                description: description.trim().to_owned(),
                thumbnail_url,
                channel_id,
            }),
            ctx,
        );
        Ok(())
    }

    /// Replaces title and/or description, producing a `VideoDetailsUpdated`
    /// event. Missing or blank values keep the current field.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` if the video does not exist
    /// and `DomainError::Forbidden` if `actor` is not the uploader.
    pub fn update_details(
        &mut self,
        actor: &ActorId,
        title: Option<&str>,
        description: Option<&str>,
        ctx: &EventContext<'_>,
    ) -> Result<(), DomainError> {
        self.ensure_uploader(actor)?;
        let details = self.ensure_exists()?;
        let pick = |candidate: Option<&str>, current: &str| {
            candidate
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .unwrap_or(current)
                .to_owned()
        };
        let title = pick(title, &details.title);
        let description = pick(description, &details.description);
        self.record(
            VideoEventKind::VideoDetailsUpdated(VideoDetailsUpdated {
                video_id: self.id,
                title,
                description,
            }),
            ctx,
        );
        Ok(())
    }

    /// Toggles a like for `actor`, producing a `ReactionChanged` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` if the video does not exist.
    pub fn apply_like(
        &mut self,
        actor: &ActorId,
        ctx: &EventContext<'_>,
    ) -> Result<ReactionTally, DomainError> {
        self.react(actor, Reaction::Like, ctx)
    }

    /// Toggles a dislike for `actor`, producing a `ReactionChanged` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` if the video does not exist.
    pub fn apply_dislike(
        &mut self,
        actor: &ActorId,
        ctx: &EventContext<'_>,
    ) -> Result<ReactionTally, DomainError> {
        self.react(actor, Reaction::Dislike, ctx)
    }

    /// Toggles `reaction` for `actor`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` if the video does not exist.
    pub fn react(
        &mut self,
        actor: &ActorId,
        reaction: Reaction,
        ctx: &EventContext<'_>,
    ) -> Result<ReactionTally, DomainError> {
        self.ensure_exists()?;
        let next = self.reactions.toggled(actor, reaction);
        self.record(
            VideoEventKind::ReactionChanged(ReactionChanged {
                video_id: self.id,
                actor_id: actor.clone(),
                reaction: next,
            }),
            ctx,
        );
        Ok(self.reactions.tally())
    }

    /// Appends a comment by `actor`, producing a `CommentAdded` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `text` is blank and
    /// `DomainError::AggregateNotFound` if the video does not exist.
    pub fn add_comment(
        &mut self,
        actor: &ActorId,
        text: &str,
        ctx: &EventContext<'_>,
    ) -> Result<Comment, DomainError> {
        validate_text(text)?;
        self.ensure_exists()?;
        let comment = Comment {
            comment_id: ctx.ids.next_id(),
            author_id: actor.clone(),
            text: text.to_owned(),
            timestamp: ctx.now,
        };
        self.record(
            VideoEventKind::CommentAdded(CommentAdded {
                video_id: self.id,
                comment_id: comment.comment_id,
                author_id: comment.author_id.clone(),
                text: comment.text.clone(),
                timestamp: comment.timestamp,
            }),
            ctx,
        );
        Ok(comment)
    }

    /// Replaces the text of a comment authored by `actor`, producing a
    /// `CommentEdited` event. The timestamp moves to now; the position does
    /// not change.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `text` is blank,
    /// `DomainError::AggregateNotFound` / `DomainError::CommentNotFound` if
    /// the video or comment does not exist, and `DomainError::Forbidden` if
    /// `actor` is not the author.
    pub fn edit_comment(
        &mut self,
        comment_id: Uuid,
        actor: &ActorId,
        text: &str,
        ctx: &EventContext<'_>,
    ) -> Result<Comment, DomainError> {
        validate_text(text)?;
        self.ensure_exists()?;
        let mut comment = self.comments.authorize(self.id, comment_id, actor)?.clone();
        comment.text = text.to_owned();
        comment.timestamp = ctx.now;
        self.record(
            VideoEventKind::CommentEdited(CommentEdited {
                video_id: self.id,
                comment_id,
                text: comment.text.clone(),
                timestamp: comment.timestamp,
            }),
            ctx,
        );
        Ok(comment)
    }

    /// Removes a comment authored by `actor`, producing a `CommentDeleted`
    /// event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` / `DomainError::CommentNotFound`
    /// if the video or comment does not exist, and `DomainError::Forbidden` if
    /// `actor` is not the author.
    pub fn delete_comment(
        &mut self,
        comment_id: Uuid,
        actor: &ActorId,
        ctx: &EventContext<'_>,
    ) -> Result<(), DomainError> {
        self.ensure_exists()?;
        self.comments.authorize(self.id, comment_id, actor)?;
        self.record(
            VideoEventKind::CommentDeleted(CommentDeleted {
                video_id: self.id,
                comment_id,
            }),
            ctx,
        );
        Ok(())
    }

    /// Drops every comment, producing a `CommentsCleared` event when there was
    /// anything to drop. Authorization is the caller's video-level check.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` if the video does not exist.
    pub fn delete_all_comments(&mut self, ctx: &EventContext<'_>) -> Result<usize, DomainError> {
        self.ensure_exists()?;
        let removed = self.comments.len();
        if removed > 0 {
            self.record(
                VideoEventKind::CommentsCleared(CommentsCleared {
                    video_id: self.id,
                    removed,
                }),
                ctx,
            );
        }
        Ok(removed)
    }

    /// Deletes the video and its comments, producing `CommentsCleared` (if
    /// any comments existed) followed by `VideoDeleted`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` if the video does not exist
    /// and `DomainError::Forbidden` if `actor` is not the uploader.
    pub fn delete(&mut self, actor: &ActorId, ctx: &EventContext<'_>) -> Result<(), DomainError> {
        self.ensure_uploader(actor)?;
        self.delete_all_comments(ctx)?;
        self.record(
            VideoEventKind::VideoDeleted(VideoDeleted { video_id: self.id }),
            ctx,
        );
        Ok(())
    }
}

impl AggregateRoot for Video {
    type Event = VideoEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        self.mutate(event);
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }
}
