//! Command handlers for the Engagement context.
//!
//! Each handler loads the video's event stream, runs one domain method on
//! the reconstituted aggregate, and appends the recorded events with the
//! version it loaded. A concurrent writer therefore makes the append fail
//! with `DomainError::ConcurrencyConflict` instead of silently overwriting.
//! Views are the exception: they go to the `ViewCounter` and never touch the
//! stream.

use tracing::{debug, info};
use uuid::Uuid;
use vidshare_core::aggregate::AggregateRoot;
use vidshare_core::clock::Clock;
use vidshare_core::command::Command;
use vidshare_core::error::DomainError;
use vidshare_core::id::IdGenerator;
use vidshare_core::repository::{EventRepository, StoredEvent, ViewCounter};

use crate::application::query_handlers::{VideoView, view_of};
use crate::domain::aggregates::{EventContext, Video};
use crate::domain::commands::{
    AddComment, DeleteComment, DeleteVideo, EditComment, ReactToVideo, RecordView,
    UpdateVideoDetails, UploadVideo,
};
use crate::domain::comments::{Comment, validate_text};
use crate::domain::events::{VideoEvent, VideoEventKind};
use crate::domain::reactions::{Reaction, ReactionTally};

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct VideoCommandResult<T> {
    /// The video affected by the command.
    pub video_id: Uuid,
    /// What the command produced for the caller.
    pub outcome: T,
    /// The stored events produced and persisted.
    pub stored_events: Vec<StoredEvent>,
}

/// Reconstitutes a `Video` from stored events.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub(crate) fn reconstitute(
    video_id: Uuid,
    existing_events: &[StoredEvent],
) -> Result<Video, DomainError> {
    let mut video = Video::new(video_id);
    for stored in existing_events {
        let kind: VideoEventKind =
            serde_json::from_value(stored.payload.clone()).map_err(|e| {
                DomainError::Infrastructure(format!("event deserialization failed: {e}"))
            })?;
        let event = VideoEvent {
            metadata: stored.metadata(),
            kind,
        };
        video.apply(&event);
    }
    Ok(video)
}

/// Loads a video that exists and has not been deleted.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the stream is empty or ends in
/// a deletion, plus any repository error.
pub(crate) async fn load_video(
    video_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<Video, DomainError> {
    let existing_events = repo.load_events(video_id).await?;
    if existing_events.is_empty() {
        return Err(DomainError::AggregateNotFound(video_id));
    }
    let video = reconstitute(video_id, &existing_events)?;
    if !video.exists() {
        return Err(DomainError::AggregateNotFound(video_id));
    }
    Ok(video)
}

/// Appends the video's uncommitted events at its loaded version.
///
/// # Errors
///
/// Returns `DomainError::ConcurrencyConflict` if the stream moved since the
/// video was loaded, plus any repository error.
#[allow(clippy::cast_possible_wrap)]
pub(crate) async fn persist(
    video: &mut Video,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let stored_events: Vec<StoredEvent> = video
        .uncommitted_events()
        .iter()
        .map(StoredEvent::from_event)
        .collect();
    if stored_events.is_empty() {
        return Ok(stored_events);
    }

    repo.append_events(video.id, video.version(), &stored_events)
        .await?;

    debug!(
        video_id = %video.id,
        expected_version = video.version(),
        appended = stored_events.len(),
        "appended video events"
    );
    video.version += stored_events.len() as i64;
    video.clear_uncommitted_events();
    Ok(stored_events)
}

/// Load → mutate → append for commands that target an existing video.
async fn execute<C, T>(
    command: &C,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    repo: &dyn EventRepository,
    action: impl FnOnce(&mut Video, &EventContext<'_>) -> Result<T, DomainError>,
) -> Result<(Video, VideoCommandResult<T>), DomainError>
where
    C: Command,
{
    let video_id = command.aggregate_id();
    let mut video = load_video(video_id, repo).await?;
    let ctx = EventContext::new(command.correlation_id(), clock, ids);

    let outcome = action(&mut video, &ctx)?;
    let stored_events = persist(&mut video, repo).await?;

    info!(
        command_type = command.command_type(),
        correlation_id = %command.correlation_id(),
        %video_id,
        events = stored_events.len(),
        "command handled"
    );

    Ok((
        video,
        VideoCommandResult {
            video_id,
            outcome,
            stored_events,
        },
    ))
}

/// Handles the `UploadVideo` command: creates a fresh aggregate and persists
/// its `VideoUploaded` event at version 0.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a blank title,
/// `DomainError::ConcurrencyConflict` if the identifier is already taken, and
/// any repository error.
pub async fn handle_upload_video(
    command: &UploadVideo,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    repo: &dyn EventRepository,
) -> Result<VideoCommandResult<VideoView>, DomainError> {
    let mut video = Video::new(command.video_id);
    let ctx = EventContext::new(command.correlation_id, clock, ids);

    video.upload(
        command.uploader_id.clone(),
        &command.title,
        &command.description,
        command.thumbnail_url.clone(),
        command.channel_id.clone(),
        &ctx,
    )?;
    let stored_events = persist(&mut video, repo).await?;

    info!(
        command_type = command.command_type(),
        correlation_id = %command.correlation_id,
        video_id = %command.video_id,
        uploader_id = %command.uploader_id,
        "video uploaded"
    );

    Ok(VideoCommandResult {
        video_id: command.video_id,
        outcome: view_of(&video, 0)?,
        stored_events,
    })
}

/// Handles the `RecordView` command: counts one view and returns the
/// refreshed video. Appends nothing to the video's stream, so concurrent
/// viewers never conflict with each other or with writers.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the video does not exist, and
/// any repository or view counter error.
pub async fn handle_record_view(
    command: &RecordView,
    repo: &dyn EventRepository,
    views: &dyn ViewCounter,
) -> Result<VideoView, DomainError> {
    let video = load_video(command.video_id, repo).await?;
    let total = views.record_view(command.video_id).await?;

    debug!(
        command_type = command.command_type(),
        correlation_id = %command.correlation_id,
        video_id = %command.video_id,
        views = total,
        "view recorded"
    );

    view_of(&video, total)
}

/// Handles the `UpdateVideoDetails` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the video does not exist,
/// `DomainError::Forbidden` if the actor is not the uploader, and any
/// repository or view counter error.
pub async fn handle_update_video_details(
    command: &UpdateVideoDetails,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    repo: &dyn EventRepository,
    views: &dyn ViewCounter,
) -> Result<VideoCommandResult<VideoView>, DomainError> {
    let (video, result) = execute(command, clock, ids, repo, |video, ctx| {
        video.update_details(
            &command.actor_id,
            command.title.as_deref(),
            command.description.as_deref(),
            ctx,
        )
    })
    .await?;
    let total = views.view_count(result.video_id).await?;
    Ok(VideoCommandResult {
        video_id: result.video_id,
        outcome: view_of(&video, total)?,
        stored_events: result.stored_events,
    })
}

/// Handles the `DeleteVideo` command: clears the comments and marks the
/// video deleted in a single append.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the video does not exist,
/// `DomainError::Forbidden` if the actor is not the uploader, and any
/// repository error.
pub async fn handle_delete_video(
    command: &DeleteVideo,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    repo: &dyn EventRepository,
) -> Result<VideoCommandResult<()>, DomainError> {
    let (_, result) = execute(command, clock, ids, repo, |video, ctx| {
        video.delete(&command.actor_id, ctx)
    })
    .await?;
    Ok(result)
}

/// Handles the `ReactToVideo` command: toggles a like or dislike and returns
/// the resulting sets.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the video does not exist, and
/// any repository error.
pub async fn handle_react_to_video(
    command: &ReactToVideo,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    repo: &dyn EventRepository,
) -> Result<VideoCommandResult<ReactionTally>, DomainError> {
    let (_, result) = execute(command, clock, ids, repo, |video, ctx| match command
        .reaction
    {
        Reaction::Like => video.apply_like(&command.actor_id, ctx),
        Reaction::Dislike => video.apply_dislike(&command.actor_id, ctx),
    })
    .await?;
    Ok(result)
}

/// Handles the `AddComment` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` for blank text (before anything is
/// loaded), `DomainError::AggregateNotFound` if the video does not exist, and
/// any repository error.
pub async fn handle_add_comment(
    command: &AddComment,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    repo: &dyn EventRepository,
) -> Result<VideoCommandResult<Comment>, DomainError> {
    validate_text(&command.text)?;
    let (_, result) = execute(command, clock, ids, repo, |video, ctx| {
        video.add_comment(&command.actor_id, &command.text, ctx)
    })
    .await?;
    Ok(result)
}

/// Handles the `EditComment` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` for blank text,
/// `DomainError::AggregateNotFound` / `DomainError::CommentNotFound` if the
/// video or comment does not exist, `DomainError::Forbidden` if the actor is
/// not the author, and any repository error.
pub async fn handle_edit_comment(
    command: &EditComment,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    repo: &dyn EventRepository,
) -> Result<VideoCommandResult<Comment>, DomainError> {
    validate_text(&command.text)?;
    let (_, result) = execute(command, clock, ids, repo, |video, ctx| {
        video.edit_comment(command.comment_id, &command.actor_id, &command.text, ctx)
    })
    .await?;
    Ok(result)
}

/// Handles the `DeleteComment` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` / `DomainError::CommentNotFound`
/// if the video or comment does not exist, `DomainError::Forbidden` if the
/// actor is not the author, and any repository error.
pub async fn handle_delete_comment(
    command: &DeleteComment,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    repo: &dyn EventRepository,
) -> Result<VideoCommandResult<()>, DomainError> {
    let (_, result) = execute(command, clock, ids, repo, |video, ctx| {
        video.delete_comment(command.comment_id, &command.actor_id, ctx)
    })
    .await?;
    Ok(result)
}
