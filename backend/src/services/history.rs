//! Detection and recommendation persistence
//!
//! Each analysis produces one detection row and one recommendation row
//! linked by detection id. Context objects (detection, location, advice,
//! weather) are stored as JSONB documents so schema drift in the advice
//! payload never requires a migration.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use shared::{DetectionResult, Location, Recommendation, WeatherSnapshot};

use crate::error::{AppError, AppResult};

/// Default page size for session history
const DEFAULT_HISTORY_LIMIT: i64 = 10;

/// Persisted detection with its context
#[derive(Debug, Serialize)]
pub struct DetectionRecord {
    pub id: Uuid,
    pub session_id: String,
    pub image_path: String,
    pub detection: DetectionResult,
    pub location: Location,
    pub language: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Persisted recommendation linked to a detection
#[derive(Debug, Serialize)]
pub struct RecommendationRecord {
    pub id: Uuid,
    pub detection_id: Uuid,
    pub recommendation: Recommendation,
    pub weather: WeatherSnapshot,
    pub created_at: DateTime<Utc>,
}

/// Per-session detection statistics
#[derive(Debug, Serialize)]
pub struct DetectionStatistics {
    pub total_detections: i64,
    pub by_crop: Vec<CropCount>,
}

#[derive(Debug, Serialize)]
pub struct CropCount {
    pub crop: String,
    pub count: i64,
}

/// Database row for a detection
#[derive(Debug, sqlx::FromRow)]
struct DetectionRow {
    id: Uuid,
    session_id: String,
    image_path: String,
    detection: Json<DetectionResult>,
    location: Json<Location>,
    language: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl From<DetectionRow> for DetectionRecord {
    fn from(row: DetectionRow) -> Self {
        DetectionRecord {
            id: row.id,
            session_id: row.session_id,
            image_path: row.image_path,
            detection: row.detection.0,
            location: row.location.0,
            language: row.language,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

/// Database row for a recommendation
#[derive(Debug, sqlx::FromRow)]
struct RecommendationRow {
    id: Uuid,
    detection_id: Uuid,
    recommendation: Json<Recommendation>,
    weather: Json<WeatherSnapshot>,
    created_at: DateTime<Utc>,
}

impl From<RecommendationRow> for RecommendationRecord {
    fn from(row: RecommendationRow) -> Self {
        RecommendationRecord {
            id: row.id,
            detection_id: row.detection_id,
            recommendation: row.recommendation.0,
            weather: row.weather.0,
            created_at: row.created_at,
        }
    }
}

/// Detection history service
#[derive(Clone)]
pub struct HistoryService {
    db: PgPool,
}

impl HistoryService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Persist a detection with its resolved context
    pub async fn save_detection(
        &self,
        session_id: &str,
        image_path: &str,
        detection: &DetectionResult,
        location: &Location,
        language: &str,
    ) -> AppResult<DetectionRecord> {
        let row = sqlx::query_as::<_, DetectionRow>(
            r#"
            INSERT INTO detections (session_id, image_path, detection, location, language)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, session_id, image_path, detection, location, language, status, created_at
            "#,
        )
        .bind(session_id)
        .bind(image_path)
        .bind(Json(detection))
        .bind(Json(location))
        .bind(language)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Persist the recommendation produced for a detection
    pub async fn save_recommendation(
        &self,
        detection_id: Uuid,
        recommendation: &Recommendation,
        weather: &WeatherSnapshot,
    ) -> AppResult<RecommendationRecord> {
        let row = sqlx::query_as::<_, RecommendationRow>(
            r#"
            INSERT INTO recommendations (detection_id, recommendation, weather)
            VALUES ($1, $2, $3)
            RETURNING id, detection_id, recommendation, weather, created_at
            "#,
        )
        .bind(detection_id)
        .bind(Json(recommendation))
        .bind(Json(weather))
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Fetch one detection by id
    pub async fn get_detection(&self, detection_id: Uuid) -> AppResult<DetectionRecord> {
        let row = sqlx::query_as::<_, DetectionRow>(
            r#"
            SELECT id, session_id, image_path, detection, location, language, status, created_at
            FROM detections
            WHERE id = $1
            "#,
        )
        .bind(detection_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Detection".to_string()))?;

        Ok(row.into())
    }

    /// Fetch the recommendation stored for a detection, if any
    pub async fn get_recommendation_for(
        &self,
        detection_id: Uuid,
    ) -> AppResult<Option<RecommendationRecord>> {
        let row = sqlx::query_as::<_, RecommendationRow>(
            r#"
            SELECT id, detection_id, recommendation, weather, created_at
            FROM recommendations
            WHERE detection_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(detection_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Most recent detections for a session, newest first
    pub async fn history(
        &self,
        session_id: &str,
        limit: Option<i64>,
    ) -> AppResult<Vec<DetectionRecord>> {
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, 100);

        let rows = sqlx::query_as::<_, DetectionRow>(
            r#"
            SELECT id, session_id, image_path, detection, location, language, status, created_at
            FROM detections
            WHERE session_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(session_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Detection counts, overall and per crop
    pub async fn statistics(&self, session_id: Option<&str>) -> AppResult<DetectionStatistics> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM detections WHERE ($1::text IS NULL OR session_id = $1)",
        )
        .bind(session_id)
        .fetch_one(&self.db)
        .await?;

        let by_crop = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT detection->>'crop' AS crop, COUNT(*) AS count
            FROM detections
            WHERE ($1::text IS NULL OR session_id = $1)
            GROUP BY detection->>'crop'
            ORDER BY count DESC
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|(crop, count)| CropCount { crop, count })
        .collect();

        Ok(DetectionStatistics {
            total_detections: total,
            by_crop,
        })
    }

    /// Update a detection's lifecycle status, for soft invalidation
    pub async fn update_status(&self, detection_id: Uuid, status: &str) -> AppResult<()> {
        let result = sqlx::query("UPDATE detections SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(detection_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Detection".to_string()));
        }
        Ok(())
    }
}
