//! Query handlers for the Engagement context.
//!
//! This module contains query handlers that reconstitute videos from stored
//! events and return read-only view DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;
use vidshare_core::aggregate::AggregateRoot;
use vidshare_core::error::DomainError;
use vidshare_core::identity::ActorId;
use vidshare_core::repository::{EventRepository, ViewCounter};

use crate::application::command_handlers::load_video;
use crate::domain::aggregates::Video;
use crate::domain::comments::Comment;
use crate::domain::reactions::ReactionTally;

/// Read-only view of a video.
#[derive(Debug, Serialize)]
pub struct VideoView {
    /// The video identifier.
    pub video_id: Uuid,
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
    /// Number of recorded views, read from the view counter.
    pub views: u64,
    /// Actors who like the video (sorted).
    pub likes: Vec<ActorId>,
    /// Actors who dislike the video (sorted).
    pub dislikes: Vec<ActorId>,
    /// Number of likes.
    pub like_count: usize,
    /// Number of dislikes.
    pub dislike_count: usize,
    /// Comments in display order.
    pub comments: Vec<Comment>,
    /// Current version (event count).
    pub version: i64,
}

/// Builds the view of a live video with its current view total.
pub(crate) fn view_of(video: &Video, views: u64) -> Result<VideoView, DomainError> {
    let details = video
        .details()
        .filter(|_| video.exists())
        .ok_or(DomainError::AggregateNotFound(video.id))?;
    let tally = video.reactions().tally();
    Ok(VideoView {
        video_id: video.id,
        uploader_id: details.uploader_id.clone(),
        title: details.title.clone(),
        description: details.description.clone(),
        thumbnail_url: details.thumbnail_url.clone(),
        channel_id: details.channel_id.clone(),
        uploaded_at: details.uploaded_at,
        views,
        likes: tally.likes,
        dislikes: tally.dislikes,
        like_count: tally.like_count,
        dislike_count: tally.dislike_count,
        comments: video.comments().to_vec(),
        version: video.version(),
    })
}

/// Retrieves a video by its aggregate ID without counting a view.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no events exist for the ID or
/// the video was deleted.
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub async fn get_video_by_id(
    video_id: Uuid,
    repo: &dyn EventRepository,
    views: &dyn ViewCounter,
) -> Result<VideoView, DomainError> {
    let video = load_video(video_id, repo).await?;
    let total = views.view_count(video_id).await?;
    view_of(&video, total)
}

/// Lists every live video, oldest upload first. Deleted videos, including
/// ones deleted while the listing runs, are skipped.
///
/// # Errors
///
/// Returns any repository or view counter error.
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub async fn list_videos(
    repo: &dyn EventRepository,
    views: &dyn ViewCounter,
) -> Result<Vec<VideoView>, DomainError> {
    let mut listed = Vec::new();
    for video_id in repo.list_aggregate_ids().await? {
        let video = match load_video(video_id, repo).await {
            Ok(video) => video,
            Err(DomainError::AggregateNotFound(_)) => continue,
            Err(err) => return Err(err),
        };
        let total = views.view_count(video_id).await?;
        listed.push(view_of(&video, total)?);
    }
    debug!(videos = listed.len(), "listed videos");
    Ok(listed)
}

/// Retrieves the like and dislike sets of a video.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the video does not exist.
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub async fn get_reactions(
    video_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<ReactionTally, DomainError> {
    let video = load_video(video_id, repo).await?;
    Ok(video.reactions().tally())
}

/// Lists the comments of a video in display order.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the video does not exist.
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub async fn list_comments(
    video_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<Vec<Comment>, DomainError> {
    let video = load_video(video_id, repo).await?;
    Ok(video.comments().to_vec())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;
    use vidshare_core::error::DomainError;
    use vidshare_core::identity::ActorId;
    use vidshare_core::repository::{EventRepository, StoredEvent, ViewCounter};
    use vidshare_test_support::{
        EmptyEventRepository, InMemoryEventRepository, InMemoryViewCounter,
        RecordingEventRepository,
    };

    use crate::application::query_handlers::{
        get_reactions, get_video_by_id, list_comments, list_videos,
    };
    use crate::domain::events::{
        CommentAdded, ReactionChanged, VideoDeleted, VideoEventKind, VideoUploaded,
    };
    use crate::domain::reactions::Reaction;

    fn stored(video_id: Uuid, sequence_number: i64, kind: &VideoEventKind) -> StoredEvent {
        StoredEvent {
            event_id: Uuid::new_v4(),
            aggregate_id: video_id,
            event_type: kind.event_type().to_owned(),
            payload: serde_json::to_value(kind).unwrap(),
            sequence_number,
            correlation_id: Uuid::new_v4(),
            causation_id: Uuid::new_v4(),
            occurred_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        }
    }

    fn uploaded(video_id: Uuid) -> VideoEventKind {
        VideoEventKind::VideoUploaded(VideoUploaded {
            video_id,
            uploader_id: ActorId::new("owner"),
            title: "React Tutorial".into(),
            description: "Learn the basics".into(),
            thumbnail_url: None,
            channel_id: Some("channel-tech".into()),
        })
    }

    fn reaction(video_id: Uuid, actor: &str, reaction: Option<Reaction>) -> VideoEventKind {
        VideoEventKind::ReactionChanged(ReactionChanged {
            video_id,
            actor_id: ActorId::new(actor),
            reaction,
        })
    }

    #[tokio::test]
    async fn test_get_video_by_id_returns_view() {
        // Arrange
        let video_id = Uuid::new_v4();
        let comment_id = Uuid::new_v4();
        let events = vec![
            stored(video_id, 1, &uploaded(video_id)),
            stored(video_id, 2, &reaction(video_id, "u2", Some(Reaction::Like))),
            stored(video_id, 3, &reaction(video_id, "u1", Some(Reaction::Like))),
            stored(video_id, 4, &reaction(video_id, "u3", Some(Reaction::Dislike))),
            stored(
                video_id,
                5,
                &VideoEventKind::CommentAdded(CommentAdded {
                    video_id,
                    comment_id,
                    author_id: ActorId::new("u2"),
                    text: "hi".into(),
                    timestamp: Utc.with_ymd_and_hms(2026, 1, 15, 10, 5, 0).unwrap(),
                }),
            ),
        ];
        let repo = RecordingEventRepository::new(events);
        let views = InMemoryViewCounter::new();
        views.record_view(video_id).await.unwrap();
        views.record_view(video_id).await.unwrap();

        // Act
        let view = get_video_by_id(video_id, &repo, &views).await.unwrap();

        // Assert
        assert_eq!(view.video_id, video_id);
        assert_eq!(view.uploader_id, ActorId::new("owner"));
        assert_eq!(view.title, "React Tutorial");
        assert_eq!(view.channel_id.as_deref(), Some("channel-tech"));
        assert_eq!(view.likes, vec![ActorId::new("u1"), ActorId::new("u2")]);
        assert_eq!(view.dislikes, vec![ActorId::new("u3")]);
        assert_eq!(view.like_count, 2);
        assert_eq!(view.dislike_count, 1);
        assert_eq!(view.comments.len(), 1);
        assert_eq!(view.comments[0].comment_id, comment_id);
        assert_eq!(view.views, 2);
        assert_eq!(view.version, 5);
        assert!(repo.appended_events().is_empty());
    }

    #[tokio::test]
    async fn test_get_video_by_id_returns_not_found_when_no_events() {
        // Arrange
        let video_id = Uuid::new_v4();
        let repo = EmptyEventRepository;

        // Act
        let result = get_video_by_id(video_id, &repo, &InMemoryViewCounter::new()).await;

        // Assert
        match result {
            Err(DomainError::AggregateNotFound(id)) => assert_eq!(id, video_id),
            other => panic!("expected AggregateNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_video_by_id_returns_not_found_after_deletion() {
        let video_id = Uuid::new_v4();
        let repo = RecordingEventRepository::new(vec![
            stored(video_id, 1, &uploaded(video_id)),
            stored(
                video_id,
                2,
                &VideoEventKind::VideoDeleted(VideoDeleted { video_id }),
            ),
        ]);

        let result = get_video_by_id(video_id, &repo, &InMemoryViewCounter::new()).await;

        assert!(matches!(result, Err(DomainError::AggregateNotFound(_))));
    }

    #[tokio::test]
    async fn test_get_reactions_reflects_cleared_reaction() {
        let video_id = Uuid::new_v4();
        let repo = RecordingEventRepository::new(vec![
            stored(video_id, 1, &uploaded(video_id)),
            stored(video_id, 2, &reaction(video_id, "u1", Some(Reaction::Like))),
            stored(video_id, 3, &reaction(video_id, "u1", None)),
        ]);

        let tally = get_reactions(video_id, &repo).await.unwrap();

        assert!(tally.likes.is_empty());
        assert!(tally.dislikes.is_empty());
        assert_eq!(tally.like_count, 0);
    }

    #[tokio::test]
    async fn test_list_comments_on_missing_video_returns_not_found() {
        let result = list_comments(Uuid::new_v4(), &EmptyEventRepository).await;

        assert!(matches!(result, Err(DomainError::AggregateNotFound(_))));
    }

    #[tokio::test]
    async fn test_list_videos_returns_live_videos_in_upload_order() {
        // Arrange
        let repo = InMemoryEventRepository::new();
        let views = InMemoryViewCounter::new();
        let (first, deleted, last) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        for video_id in [first, deleted, last] {
            repo.append_events(video_id, 0, &[stored(video_id, 1, &uploaded(video_id))])
                .await
                .unwrap();
        }
        repo.append_events(
            deleted,
            1,
            &[stored(
                deleted,
                2,
                &VideoEventKind::VideoDeleted(VideoDeleted { video_id: deleted }),
            )],
        )
        .await
        .unwrap();
        views.record_view(last).await.unwrap();

        // Act
        let listed = list_videos(&repo, &views).await.unwrap();

        // Assert
        let ids: Vec<Uuid> = listed.iter().map(|v| v.video_id).collect();
        assert_eq!(ids, vec![first, last]);
        assert_eq!(listed[0].views, 0);
        assert_eq!(listed[1].views, 1);
        assert_eq!(listed[1].title, "React Tutorial");
    }

    #[tokio::test]
    async fn test_list_videos_on_empty_store_is_empty() {
        let listed = list_videos(&EmptyEventRepository, &InMemoryViewCounter::new())
            .await
            .unwrap();

        assert!(listed.is_empty());
    }
}
