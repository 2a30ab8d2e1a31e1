use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Canonical mood vocabulary. The legacy {excellent, good, okay, poor}
/// variant is rejected at deserialization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "mood_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MoodKind {
    Great,
    Good,
    Okay,
    Bad,
    Terrible,
}

impl MoodKind {
    /// Wellness contribution on a 0-100 scale, monotonic with the
    /// vocabulary ordering.
    pub fn score(self) -> i64 {
        match self {
            MoodKind::Great => 100,
            MoodKind::Good => 75,
            MoodKind::Okay => 50,
            MoodKind::Bad => 25,
            MoodKind::Terrible => 0,
        }
    }

    /// Ordinal value (terrible=1 .. great=5) used for the daily trend.
    pub fn ordinal(self) -> i64 {
        match self {
            MoodKind::Great => 5,
            MoodKind::Good => 4,
            MoodKind::Okay => 3,
            MoodKind::Bad => 2,
            MoodKind::Terrible => 1,
        }
    }

    pub const ALL: [MoodKind; 5] = [
        MoodKind::Great,
        MoodKind::Good,
        MoodKind::Okay,
        MoodKind::Bad,
        MoodKind::Terrible,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MoodKind::Great => "great",
            MoodKind::Good => "good",
            MoodKind::Okay => "okay",
            MoodKind::Bad => "bad",
            MoodKind::Terrible => "terrible",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MoodEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mood: MoodKind,
    pub intensity: i32,
    pub note: Option<String>,
    pub activities: Vec<String>,
    pub triggers: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMoodRequest {
    pub mood: MoodKind,
    pub intensity: Option<i32>,
    pub note: Option<String>,
    pub activities: Option<Vec<String>>,
    pub triggers: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMoodRequest {
    pub mood: Option<MoodKind>,
    pub intensity: Option<i32>,
    pub note: Option<String>,
    pub activities: Option<Vec<String>>,
    pub triggers: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct MoodListQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct MoodStatsQuery {
    /// Lookback window in days
    pub timeframe: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_monotonic_with_ordering() {
        let scores: Vec<i64> = MoodKind::ALL.iter().map(|m| m.score()).collect();
        for pair in scores.windows(2) {
            assert!(pair[0] > pair[1], "scores must strictly decrease: {:?}", scores);
        }
    }

    #[test]
    fn test_canonical_vocabulary_parses() {
        for kind in MoodKind::ALL {
            let parsed: MoodKind =
                serde_json::from_str(&format!("\"{}\"", kind.as_str())).unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_legacy_vocabulary_rejected() {
        for legacy in ["excellent", "poor"] {
            let parsed: Result<MoodKind, _> = serde_json::from_str(&format!("\"{}\"", legacy));
            assert!(parsed.is_err(), "{} should be rejected", legacy);
        }
    }
}
