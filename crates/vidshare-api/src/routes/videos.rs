//! Routes for videos, reactions and comments.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use vidshare_engagement::application::command_handlers;
use vidshare_engagement::application::query_handlers::{self, VideoView};
use vidshare_engagement::domain::commands;
use vidshare_engagement::domain::comments::Comment;
use vidshare_engagement::domain::reactions::{Reaction, ReactionTally};

use crate::auth::AuthenticatedActor;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct UploadVideoRequest {
    /// Video title; must not be blank.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Optional thumbnail location.
    pub thumbnail_url: Option<String>,
    /// Optional channel reference.
    pub channel_id: Option<String>,
}

/// Request body for PUT /{video_id}.
#[derive(Debug, Deserialize)]
pub struct UpdateVideoRequest {
    /// New title; absent or blank keeps the current one.
    pub title: Option<String>,
    /// New description; absent or blank keeps the current one.
    pub description: Option<String>,
}

/// Request body for POST and PUT on comments.
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    /// Comment body.
    pub text: String,
}

/// POST /
#[instrument(skip_all, fields(actor_id = %actor.0))]
async fn upload_video(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
    ApiJson(request): ApiJson<UploadVideoRequest>,
) -> Result<(StatusCode, Json<VideoView>), ApiError> {
    let command = commands::UploadVideo {
        correlation_id: Uuid::new_v4(),
        video_id: state.ids.next_id(),
        uploader_id: actor.0,
        title: request.title,
        description: request.description,
        thumbnail_url: request.thumbnail_url,
        channel_id: request.channel_id,
    };

    info!(correlation_id = %command.correlation_id, video_id = %command.video_id, "handling upload_video command");

    let result = command_handlers::handle_upload_video(
        &command,
        state.clock.as_ref(),
        state.ids.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(result.outcome)))
}

/// GET /
#[instrument(skip_all)]
async fn list_videos(State(state): State<AppState>) -> Result<Json<Vec<VideoView>>, ApiError> {
    let videos =
        query_handlers::list_videos(&*state.event_repository, &*state.view_counter).await?;
    Ok(Json(videos))
}

/// GET /{video_id}
///
/// Counts one view and returns the refreshed video.
#[instrument(skip_all, fields(video_id = %video_id))]
async fn get_video(
    State(state): State<AppState>,
    ApiPath(video_id): ApiPath<Uuid>,
) -> Result<Json<VideoView>, ApiError> {
    let command = commands::RecordView {
        correlation_id: Uuid::new_v4(),
        video_id,
    };

    let view = command_handlers::handle_record_view(
        &command,
        &*state.event_repository,
        &*state.view_counter,
    )
    .await?;

    Ok(Json(view))
}

/// PUT /{video_id}
#[instrument(skip_all, fields(video_id = %video_id, actor_id = %actor.0))]
async fn update_video(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
    ApiPath(video_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateVideoRequest>,
) -> Result<Json<VideoView>, ApiError> {
    let command = commands::UpdateVideoDetails {
        correlation_id: Uuid::new_v4(),
        video_id,
        actor_id: actor.0,
        title: request.title,
        description: request.description,
    };

    info!(correlation_id = %command.correlation_id, "handling update_video_details command");

    let result = command_handlers::handle_update_video_details(
        &command,
        state.clock.as_ref(),
        state.ids.as_ref(),
        &*state.event_repository,
        &*state.view_counter,
    )
    .await?;

    Ok(Json(result.outcome))
}

/// DELETE /{video_id}
#[instrument(skip_all, fields(video_id = %video_id, actor_id = %actor.0))]
async fn delete_video(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
    ApiPath(video_id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    let command = commands::DeleteVideo {
        correlation_id: Uuid::new_v4(),
        video_id,
        actor_id: actor.0,
    };

    info!(correlation_id = %command.correlation_id, "handling delete_video command");

    command_handlers::handle_delete_video(
        &command,
        state.clock.as_ref(),
        state.ids.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn react(
    state: &AppState,
    actor: AuthenticatedActor,
    video_id: Uuid,
    reaction: Reaction,
) -> Result<Json<ReactionTally>, ApiError> {
    let command = commands::ReactToVideo {
        correlation_id: Uuid::new_v4(),
        video_id,
        actor_id: actor.0,
        reaction,
    };

    info!(correlation_id = %command.correlation_id, ?reaction, "handling react_to_video command");

    let result = command_handlers::handle_react_to_video(
        &command,
        state.clock.as_ref(),
        state.ids.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(Json(result.outcome))
}

/// POST /{video_id}/like
#[instrument(skip_all, fields(video_id = %video_id, actor_id = %actor.0))]
async fn like_video(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
    ApiPath(video_id): ApiPath<Uuid>,
) -> Result<Json<ReactionTally>, ApiError> {
    react(&state, actor, video_id, Reaction::Like).await
}

/// POST /{video_id}/dislike
#[instrument(skip_all, fields(video_id = %video_id, actor_id = %actor.0))]
async fn dislike_video(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
    ApiPath(video_id): ApiPath<Uuid>,
) -> Result<Json<ReactionTally>, ApiError> {
    react(&state, actor, video_id, Reaction::Dislike).await
}

/// GET /{video_id}/reactions
#[instrument(skip_all, fields(video_id = %video_id))]
async fn get_reactions(
    State(state): State<AppState>,
    ApiPath(video_id): ApiPath<Uuid>,
) -> Result<Json<ReactionTally>, ApiError> {
    let tally = query_handlers::get_reactions(video_id, &*state.event_repository).await?;
    Ok(Json(tally))
}

/// GET /{video_id}/comments
#[instrument(skip_all, fields(video_id = %video_id))]
async fn list_comments(
    State(state): State<AppState>,
    ApiPath(video_id): ApiPath<Uuid>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let comments = query_handlers::list_comments(video_id, &*state.event_repository).await?;
    Ok(Json(comments))
}

/// POST /{video_id}/comments
#[instrument(skip_all, fields(video_id = %video_id, actor_id = %actor.0))]
async fn add_comment(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
    ApiPath(video_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<CommentRequest>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let command = commands::AddComment {
        correlation_id: Uuid::new_v4(),
        video_id,
        actor_id: actor.0,
        text: request.text,
    };

    info!(correlation_id = %command.correlation_id, "handling add_comment command");

    let result = command_handlers::handle_add_comment(
        &command,
        state.clock.as_ref(),
        state.ids.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(result.outcome)))
}

/// PUT /{video_id}/comments/{comment_id}
#[instrument(skip_all, fields(video_id = %video_id, comment_id = %comment_id, actor_id = %actor.0))]
async fn edit_comment(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
    ApiPath((video_id, comment_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(request): ApiJson<CommentRequest>,
) -> Result<Json<Comment>, ApiError> {
    let command = commands::EditComment {
        correlation_id: Uuid::new_v4(),
        video_id,
        comment_id,
        actor_id: actor.0,
        text: request.text,
    };

    info!(correlation_id = %command.correlation_id, "handling edit_comment command");

    let result = command_handlers::handle_edit_comment(
        &command,
        state.clock.as_ref(),
        state.ids.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(Json(result.outcome))
}

/// DELETE /{video_id}/comments/{comment_id}
#[instrument(skip_all, fields(video_id = %video_id, comment_id = %comment_id, actor_id = %actor.0))]
async fn delete_comment(
    State(state): State<AppState>,
    actor: AuthenticatedActor,
    ApiPath((video_id, comment_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let command = commands::DeleteComment {
        correlation_id: Uuid::new_v4(),
        video_id,
        comment_id,
        actor_id: actor.0,
    };

    info!(correlation_id = %command.correlation_id, "handling delete_comment command");

    command_handlers::handle_delete_comment(
        &command,
        state.clock.as_ref(),
        state.ids.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for the video context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_videos).post(upload_video))
        .route(
            "/{video_id}",
            get(get_video).put(update_video).delete(delete_video),
        )
        .route("/{video_id}/like", post(like_video))
        .route("/{video_id}/dislike", post(dislike_video))
        .route("/{video_id}/reactions", get(get_reactions))
        .route("/{video_id}/comments", get(list_comments).post(add_comment))
        .route(
            "/{video_id}/comments/{comment_id}",
            put(edit_comment).delete(delete_comment),
        )
}
