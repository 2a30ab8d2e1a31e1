use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Duration, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::mood::{
    CreateMoodRequest, MoodEntry, MoodKind, MoodListQuery, MoodStatsQuery, UpdateMoodRequest,
};
use crate::AppState;

const DEFAULT_LIST_LIMIT: i64 = 30;
const DEFAULT_STATS_DAYS: i64 = 30;

#[derive(Debug, Serialize)]
pub struct MoodStatsResponse {
    pub total: usize,
    pub mood_counts: HashMap<&'static str, usize>,
    pub avg_intensity: f64,
    pub top_activities: Vec<ActivityCount>,
    pub mood_trend: Vec<TrendPoint>,
    pub recent_moods: Vec<MoodEntry>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ActivityCount {
    pub activity: String,
    pub count: usize,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub avg_mood: Option<f64>,
    pub count: usize,
}

pub async fn list_moods(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<MoodListQuery>,
) -> AppResult<Json<Vec<MoodEntry>>> {
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, 500);

    let moods = sqlx::query_as::<_, MoodEntry>(
        r#"
        SELECT * FROM mood_entries
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(moods))
}

pub async fn mood_stats(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<MoodStatsQuery>,
) -> AppResult<Json<MoodStatsResponse>> {
    let days = query.timeframe.unwrap_or(DEFAULT_STATS_DAYS).clamp(1, 365);
    let since = Utc::now() - Duration::days(days);

    let moods = sqlx::query_as::<_, MoodEntry>(
        r#"
        SELECT * FROM mood_entries
        WHERE user_id = $1 AND created_at >= $2
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .bind(since)
    .fetch_all(&state.db)
    .await?;

    let today = Utc::now().date_naive();
    let recent_moods = moods.iter().take(5).cloned().collect();

    Ok(Json(MoodStatsResponse {
        total: moods.len(),
        mood_counts: mood_counts(&moods),
        avg_intensity: average_intensity(&moods),
        top_activities: top_activities(&moods, 5),
        mood_trend: daily_trend(&moods, today),
        recent_moods,
    }))
}

pub async fn create_mood(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(body): Json<CreateMoodRequest>,
) -> AppResult<(StatusCode, Json<MoodEntry>)> {
    let intensity = body.intensity.unwrap_or(5);
    if !(1..=10).contains(&intensity) {
        return Err(AppError::Validation(
            "Intensity must be between 1 and 10".into(),
        ));
    }

    let mood = sqlx::query_as::<_, MoodEntry>(
        r#"
        INSERT INTO mood_entries (id, user_id, mood, intensity, note, activities, triggers)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(body.mood)
    .bind(intensity)
    .bind(&body.note)
    .bind(body.activities.as_deref().unwrap_or(&[]))
    .bind(body.triggers.as_deref().unwrap_or(&[]))
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(mood)))
}

pub async fn update_mood(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(mood_id): Path<Uuid>,
    Json(body): Json<UpdateMoodRequest>,
) -> AppResult<Json<MoodEntry>> {
    if let Some(intensity) = body.intensity {
        if !(1..=10).contains(&intensity) {
            return Err(AppError::Validation(
                "Intensity must be between 1 and 10".into(),
            ));
        }
    }

    // Ownership mismatches are reported as not-found
    let mood = sqlx::query_as::<_, MoodEntry>(
        r#"
        UPDATE mood_entries SET
            mood = COALESCE($3, mood),
            intensity = COALESCE($4, intensity),
            note = COALESCE($5, note),
            activities = COALESCE($6, activities),
            triggers = COALESCE($7, triggers)
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(mood_id)
    .bind(auth_user.id)
    .bind(body.mood)
    .bind(body.intensity)
    .bind(&body.note)
    .bind(body.activities.as_deref())
    .bind(body.triggers.as_deref())
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::NotFound("Mood not found".into()))?;

    Ok(Json(mood))
}

pub async fn delete_mood(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(mood_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM mood_entries WHERE id = $1 AND user_id = $2")
        .bind(mood_id)
        .bind(auth_user.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Mood not found".into()));
    }

    Ok(Json(serde_json::json!({ "message": "Mood deleted successfully" })))
}

fn mood_counts(moods: &[MoodEntry]) -> HashMap<&'static str, usize> {
    let mut counts: HashMap<&'static str, usize> =
        MoodKind::ALL.iter().map(|k| (k.as_str(), 0)).collect();
    for entry in moods {
        *counts.entry(entry.mood.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Mean intensity rounded to one decimal, 0 when there are no entries.
fn average_intensity(moods: &[MoodEntry]) -> f64 {
    if moods.is_empty() {
        return 0.0;
    }
    let sum: i64 = moods.iter().map(|m| m.intensity as i64).sum();
    let avg = sum as f64 / moods.len() as f64;
    (avg * 10.0).round() / 10.0
}

fn top_activities(moods: &[MoodEntry], limit: usize) -> Vec<ActivityCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for entry in moods {
        for activity in &entry.activities {
            *counts.entry(activity.as_str()).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<ActivityCount> = counts
        .into_iter()
        .map(|(activity, count)| ActivityCount {
            activity: activity.to_string(),
            count,
        })
        .collect();
    // Count descending, name ascending for a stable ranking
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then(a.activity.cmp(&b.activity)));
    ranked.truncate(limit);
    ranked
}

/// Average mood ordinal per calendar day over the trailing 7 days
/// (oldest first). Days without entries report avg_mood = None.
fn daily_trend(moods: &[MoodEntry], today: NaiveDate) -> Vec<TrendPoint> {
    (0..7)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            let day_moods: Vec<&MoodEntry> = moods
                .iter()
                .filter(|m| m.created_at.date_naive() == date)
                .collect();

            let avg_mood = if day_moods.is_empty() {
                None
            } else {
                let sum: i64 = day_moods.iter().map(|m| m.mood.ordinal()).sum();
                Some(sum as f64 / day_moods.len() as f64)
            };

            TrendPoint {
                date,
                avg_mood,
                count: day_moods.len(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(mood: MoodKind, intensity: i32, days_ago: i64, activities: &[&str]) -> MoodEntry {
        let base = Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap();
        MoodEntry {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            mood,
            intensity,
            note: None,
            activities: activities.iter().map(|s| s.to_string()).collect(),
            triggers: vec![],
            created_at: base - Duration::days(days_ago),
        }
    }

    #[test]
    fn test_mood_counts_covers_all_categories() {
        let moods = vec![
            entry(MoodKind::Great, 5, 0, &[]),
            entry(MoodKind::Great, 5, 1, &[]),
            entry(MoodKind::Terrible, 5, 2, &[]),
        ];
        let counts = mood_counts(&moods);
        assert_eq!(counts["great"], 2);
        assert_eq!(counts["terrible"], 1);
        assert_eq!(counts["okay"], 0);
    }

    #[test]
    fn test_average_intensity() {
        assert_eq!(average_intensity(&[]), 0.0);

        let moods = vec![
            entry(MoodKind::Good, 4, 0, &[]),
            entry(MoodKind::Good, 7, 0, &[]),
            entry(MoodKind::Good, 7, 0, &[]),
        ];
        assert_eq!(average_intensity(&moods), 6.0);
    }

    #[test]
    fn test_top_activities_ranked_and_capped() {
        let moods = vec![
            entry(MoodKind::Good, 5, 0, &["walk", "music"]),
            entry(MoodKind::Good, 5, 1, &["walk"]),
            entry(MoodKind::Good, 5, 2, &["walk", "reading"]),
        ];

        let top = top_activities(&moods, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].activity, "walk");
        assert_eq!(top[0].count, 3);
        assert_eq!(top[1].count, 1);
    }

    #[test]
    fn test_daily_trend_window() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        let moods = vec![
            entry(MoodKind::Great, 5, 0, &[]),  // today, ordinal 5
            entry(MoodKind::Okay, 5, 0, &[]),   // today, ordinal 3
            entry(MoodKind::Bad, 5, 2, &[]),    // two days ago
            entry(MoodKind::Good, 5, 10, &[]),  // outside the window
        ];

        let trend = daily_trend(&moods, today);
        assert_eq!(trend.len(), 7);

        // Oldest first
        assert_eq!(trend[0].date, today - Duration::days(6));
        assert_eq!(trend[6].date, today);

        assert_eq!(trend[6].count, 2);
        assert_eq!(trend[6].avg_mood, Some(4.0));

        assert_eq!(trend[4].count, 1);
        assert_eq!(trend[4].avg_mood, Some(2.0));

        assert_eq!(trend[5].count, 0);
        assert_eq!(trend[5].avg_mood, None);
    }
}
