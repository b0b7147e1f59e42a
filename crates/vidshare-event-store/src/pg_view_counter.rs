//! `PostgreSQL` implementation of the `ViewCounter` trait.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use vidshare_core::error::DomainError;
use vidshare_core::repository::ViewCounter;

/// View totals in the `video_views` table, one row per viewed video.
///
/// Each view is a single upsert, so concurrent viewers serialize on the row
/// lock instead of failing.
#[derive(Debug, Clone)]
pub struct PgViewCounter {
    pool: PgPool,
}

impl PgViewCounter {
    /// Creates a new `PgViewCounter`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn to_total(video_id: Uuid, views: i64) -> Result<u64, DomainError> {
    u64::try_from(views).map_err(|_| {
        DomainError::Infrastructure(format!("negative view total {views} for video {video_id}"))
    })
}

#[async_trait]
impl ViewCounter for PgViewCounter {
    async fn record_view(&self, video_id: Uuid) -> Result<u64, DomainError> {
        let views: i64 = sqlx::query_scalar(
            "INSERT INTO video_views (video_id, views) VALUES ($1, 1) \
             ON CONFLICT (video_id) DO UPDATE SET views = video_views.views + 1 \
             RETURNING views",
        )
        .bind(video_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Infrastructure(format!("record view failed: {e}")))?;

        debug!(%video_id, views, "view recorded");
        to_total(video_id, views)
    }

    async fn view_count(&self, video_id: Uuid) -> Result<u64, DomainError> {
        let views: Option<i64> =
            sqlx::query_scalar("SELECT views FROM video_views WHERE video_id = $1")
                .bind(video_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::Infrastructure(format!("read views failed: {e}")))?;

        to_total(video_id, views.unwrap_or(0))
    }
}
