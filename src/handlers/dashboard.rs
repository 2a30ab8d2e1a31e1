use axum::{extract::State, Json};
use chrono::{Duration, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::error::AppResult;
use crate::models::game_record::GameRecord;
use crate::models::goal::Goal;
use crate::models::mood::MoodEntry;
use crate::AppState;

/// Mood score when no entry exists for the current day.
const NEUTRAL_MOOD_SCORE: i64 = 50;
/// Game score when no records exist.
const NEUTRAL_GAME_SCORE: i64 = 50;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub success: bool,
    pub user_id: Uuid,
    pub today_mood: Option<MoodEntry>,
    pub mood_score: i64,
    pub goal_completion: i64,
    pub game_score: i64,
    pub streak: i64,
    pub wellness_score: i64,
    pub sessions: usize,
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DashboardResponse>> {
    let moods = sqlx::query_as::<_, MoodEntry>(
        r#"
        SELECT * FROM mood_entries
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(auth_user.id)
    .fetch_all(&state.db)
    .await?;

    let goals = sqlx::query_as::<_, Goal>("SELECT * FROM goals WHERE user_id = $1")
        .bind(auth_user.id)
        .fetch_all(&state.db)
        .await?;

    let game_records =
        sqlx::query_as::<_, GameRecord>("SELECT * FROM game_records WHERE user_id = $1")
            .bind(auth_user.id)
            .fetch_all(&state.db)
            .await?;

    let today = Utc::now().date_naive();

    let today_mood = todays_mood(&moods, today);
    let mood_score = today_mood.map_or(NEUTRAL_MOOD_SCORE, |m| m.mood.score());
    let goal_completion = goal_completion(&goals);
    let game_score = game_score(&game_records);
    let streak = day_streak(&moods, today);
    let wellness_score =
        wellness_score(mood_score, goal_completion, game_score, streak_score(streak));

    Ok(Json(DashboardResponse {
        success: true,
        user_id: auth_user.id,
        today_mood: today_mood.cloned(),
        mood_score,
        goal_completion,
        game_score,
        streak,
        wellness_score,
        sessions: moods.len(),
    }))
}

/// Most recent mood entry created on the given calendar day. Relies on
/// `moods` being sorted newest-first.
fn todays_mood(moods: &[MoodEntry], today: NaiveDate) -> Option<&MoodEntry> {
    moods.iter().find(|m| m.created_at.date_naive() == today)
}

/// Percentage of completed goals, rounded; 0 when there are no goals.
fn goal_completion(goals: &[Goal]) -> i64 {
    if goals.is_empty() {
        return 0;
    }
    let completed = goals.iter().filter(|g| g.completed).count();
    (100.0 * completed as f64 / goals.len() as f64).round() as i64
}

/// Mean of all game-record points, rounded; neutral 50 with no records.
fn game_score(records: &[GameRecord]) -> i64 {
    if records.is_empty() {
        return NEUTRAL_GAME_SCORE;
    }
    let sum: i64 = records.iter().map(|r| r.points).sum();
    (sum as f64 / records.len() as f64).round() as i64
}

/// Consecutive calendar days with at least one mood entry, walking
/// backward from today and stopping at the first gap.
fn day_streak(moods: &[MoodEntry], today: NaiveDate) -> i64 {
    let mut dates: Vec<NaiveDate> = moods.iter().map(|m| m.created_at.date_naive()).collect();
    dates.sort_unstable_by(|a, b| b.cmp(a));
    dates.dedup();

    let mut streak = 0i64;
    let mut check_date = today;

    for date in &dates {
        if *date == check_date {
            streak += 1;
            check_date -= Duration::days(1);
        } else if *date < check_date {
            break;
        }
    }

    streak
}

/// Streak contribution capped at 100 (10 days or more saturate).
fn streak_score(streak: i64) -> i64 {
    (streak * 10).min(100)
}

/// Weighted blend of the four sub-scores into one 0-100 value.
fn wellness_score(mood: i64, goals: i64, game: i64, streak: i64) -> i64 {
    (0.4 * mood as f64 + 0.3 * goals as f64 + 0.2 * game as f64 + 0.1 * streak as f64).round()
        as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::mood::MoodKind;
    use chrono::TimeZone;

    fn mood_on(days_ago: i64, kind: MoodKind) -> MoodEntry {
        let base = Utc.with_ymd_and_hms(2026, 8, 7, 9, 0, 0).unwrap();
        MoodEntry {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            mood: kind,
            intensity: 5,
            note: None,
            activities: vec![],
            triggers: vec![],
            created_at: base - Duration::days(days_ago),
        }
    }

    fn goal(completed: bool) -> Goal {
        Goal {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "goal".into(),
            note: None,
            completed,
            due_date: None,
            created_at: Utc::now(),
        }
    }

    fn record(points: i64) -> GameRecord {
        GameRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            points,
            time: 60,
            moves: None,
            created_at: Utc::now(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
    }

    #[test]
    fn test_todays_mood_picks_most_recent_today() {
        let moods = vec![
            mood_on(0, MoodKind::Great),
            mood_on(0, MoodKind::Bad),
            mood_on(1, MoodKind::Okay),
        ];
        let found = todays_mood(&moods, today()).unwrap();
        assert_eq!(found.mood, MoodKind::Great);
    }

    #[test]
    fn test_todays_mood_none_defaults_neutral() {
        let moods = vec![mood_on(1, MoodKind::Great)];
        assert!(todays_mood(&moods, today()).is_none());
        let score = todays_mood(&moods, today()).map_or(NEUTRAL_MOOD_SCORE, |m| m.mood.score());
        assert_eq!(score, 50);
    }

    #[test]
    fn test_goal_completion_rounds() {
        let goals = vec![goal(true), goal(true), goal(true), goal(false)];
        assert_eq!(goal_completion(&goals), 75);

        let goals = vec![goal(true), goal(false), goal(false)];
        assert_eq!(goal_completion(&goals), 33);
    }

    #[test]
    fn test_goal_completion_empty_is_zero() {
        assert_eq!(goal_completion(&[]), 0);
    }

    #[test]
    fn test_game_score_averages() {
        let records = vec![record(70), record(81)];
        assert_eq!(game_score(&records), 76); // 75.5 rounds up

        assert_eq!(game_score(&[]), 50);
    }

    #[test]
    fn test_streak_consecutive_days() {
        let moods = vec![
            mood_on(0, MoodKind::Good),
            mood_on(1, MoodKind::Good),
            mood_on(2, MoodKind::Good),
        ];
        assert_eq!(day_streak(&moods, today()), 3);
    }

    #[test]
    fn test_streak_stops_at_gap() {
        let moods = vec![mood_on(0, MoodKind::Good), mood_on(2, MoodKind::Good)];
        assert_eq!(day_streak(&moods, today()), 1);
    }

    #[test]
    fn test_streak_zero_without_entry_today() {
        assert_eq!(day_streak(&[], today()), 0);

        let moods = vec![mood_on(1, MoodKind::Good)];
        assert_eq!(day_streak(&moods, today()), 0);
    }

    #[test]
    fn test_streak_ignores_duplicate_days() {
        let moods = vec![
            mood_on(0, MoodKind::Good),
            mood_on(0, MoodKind::Okay),
            mood_on(1, MoodKind::Good),
        ];
        assert_eq!(day_streak(&moods, today()), 2);
    }

    #[test]
    fn test_streak_score_caps_at_100() {
        assert_eq!(streak_score(3), 30);
        assert_eq!(streak_score(10), 100);
        assert_eq!(streak_score(15), 100);
    }

    #[test]
    fn test_wellness_score_blend() {
        // round(0.4*80 + 0.3*50 + 0.2*60 + 0.1*30) = round(62) = 62
        assert_eq!(wellness_score(80, 50, 60, 30), 62);
    }

    #[test]
    fn test_wellness_score_bounds() {
        assert_eq!(wellness_score(100, 100, 100, 100), 100);
        assert_eq!(wellness_score(0, 0, 0, 0), 0);
    }
}
