use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use videosvc_core::{AppError, Video};

use super::repository::VideoRepository;

const SELECT_VIDEOS: &str = r#"
    SELECT v.id, v.title, v.duration, v.location, v.subject, v.content_type, v.data_url,
           COALESCE(
               array_agg(l.username ORDER BY l.username) FILTER (WHERE l.username IS NOT NULL),
               '{}'
           ) AS liked_by
    FROM videos v
    LEFT JOIN video_likes l ON l.video_id = v.id
"#;

/// Advisory lock key serializing `nextval` against the read-then-`setval` in `reserve_id`.
const ID_SEQUENCE_LOCK: i64 = 0x7669_6465_6f73;

async fn lock_id_sequence(tx: &mut Transaction<'_, Postgres>) -> Result<(), AppError> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(ID_SEQUENCE_LOCK)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

#[derive(sqlx::FromRow)]
struct VideoRow {
    id: i64,
    title: String,
    duration: i64,
    location: Option<String>,
    subject: Option<String>,
    content_type: Option<String>,
    data_url: Option<String>,
    liked_by: Vec<String>,
}

impl From<VideoRow> for Video {
    fn from(row: VideoRow) -> Self {
        let mut video = Video::new(row.title, row.duration).with_liked_by(row.liked_by);
        video.id = row.id;
        video.location = row.location;
        video.subject = row.subject;
        video.content_type = row.content_type;
        video.data_url = row.data_url;
        video
    }
}

/// Repository for videos stored in PostgreSQL
///
/// Likes live in `video_likes`; the count is always derived from those rows.
#[derive(Clone)]
pub struct PostgresVideoRepository {
    pool: PgPool,
}

impl PostgresVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn select_sql(condition: &str) -> String {
        format!("{} {} GROUP BY v.id ORDER BY v.id ASC", SELECT_VIDEOS, condition)
    }
}

#[async_trait]
impl VideoRepository for PostgresVideoRepository {
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "nextval"))]
    async fn next_id(&self) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await?;
        lock_id_sequence(&mut tx).await?;
        let id = sqlx::query_scalar::<Postgres, i64>("SELECT nextval('videos_id_seq')")
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(id)
    }

    /// Moves the sequence forward to at least `id`, never backwards.
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "setval"))]
    async fn reserve_id(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        lock_id_sequence(&mut tx).await?;
        sqlx::query(
            "SELECT setval('videos_id_seq', GREATEST($1, (SELECT last_value FROM videos_id_seq)))",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, video), fields(db.table = "videos", db.operation = "upsert", video_id = video.id))]
    async fn save(&self, video: &Video) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO videos (id, title, duration, location, subject, content_type, data_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                duration = EXCLUDED.duration,
                location = EXCLUDED.location,
                subject = EXCLUDED.subject,
                content_type = EXCLUDED.content_type,
                data_url = EXCLUDED.data_url
            "#,
        )
        .bind(video.id)
        .bind(&video.title)
        .bind(video.duration)
        .bind(&video.location)
        .bind(&video.subject)
        .bind(&video.content_type)
        .bind(&video.data_url)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM video_likes WHERE video_id = $1")
            .bind(video.id)
            .execute(&mut *tx)
            .await?;

        let likers: Vec<String> = video.liked_by().iter().cloned().collect();
        if !likers.is_empty() {
            sqlx::query(
                "INSERT INTO video_likes (video_id, username) SELECT $1, UNNEST($2::text[])",
            )
            .bind(video.id)
            .bind(&likers)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select"))]
    async fn find_all(&self) -> Result<Vec<Video>, AppError> {
        let rows = sqlx::query_as::<Postgres, VideoRow>(&Self::select_sql(""))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Video::from).collect())
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select", db.record_id = id))]
    async fn find_by_id(&self, id: i64) -> Result<Option<Video>, AppError> {
        let row = sqlx::query_as::<Postgres, VideoRow>(&Self::select_sql("WHERE v.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Video::from))
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select"))]
    async fn find_by_title(&self, title: &str) -> Result<Vec<Video>, AppError> {
        let rows = sqlx::query_as::<Postgres, VideoRow>(&Self::select_sql("WHERE v.title = $1"))
            .bind(title)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Video::from).collect())
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select"))]
    async fn find_by_duration_less_than(&self, duration: i64) -> Result<Vec<Video>, AppError> {
        let rows =
            sqlx::query_as::<Postgres, VideoRow>(&Self::select_sql("WHERE v.duration < $1"))
                .bind(duration)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(Video::from).collect())
    }
}
