/// Data structures exchanged with the rating API and the browser
use serde::{Deserialize, Serialize};

/// Aggregate rating numbers for a page
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PageStats {
    pub total_ratings: u32,
    pub average_score: f64,
}

/// The caller's own prior rating for a page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRating {
    pub has_rated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl UserRating {
    pub fn rated(score: u8, comment: Option<String>) -> UserRating {
        UserRating {
            has_rated: true,
            score: Some(score),
            comment,
        }
    }

    /// Score to pre-fill the form with, 0 when nothing was rated
    pub fn initial_score(&self) -> u8 {
        if self.has_rated { self.score.unwrap_or(0) } else { 0 }
    }

    pub fn initial_comment(&self) -> String {
        if self.has_rated {
            self.comment.clone().unwrap_or_default()
        } else {
            String::new()
        }
    }
}

/// Response of `GET /api/v1/pages/check`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageCheckResult {
    pub can_rate: bool,
    pub stats: PageStats,
    pub user_rating: UserRating,
}

impl PageCheckResult {
    /// Merge the stats returned by a successful submission
    pub fn with_submission(&self, stats: PageStats, score: u8, comment: Option<String>) -> PageCheckResult {
        PageCheckResult {
            can_rate: self.can_rate,
            stats,
            user_rating: UserRating::rated(score, comment),
        }
    }
}

/// Body of `POST /api/v1/ratings`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingSubmission {
    pub url: String,
    pub score: u8,
    pub comment: Option<String>,
}

impl RatingSubmission {
    pub fn new(url: &str, score: u8, comment: &str) -> RatingSubmission {
        RatingSubmission {
            url: url.to_string(),
            score,
            comment: normalize_comment(comment),
        }
    }
}

/// Response of `POST /api/v1/ratings`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub stats: PageStats,
}

/// Body returned by the API on failure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// Empty comments travel as `null`
pub fn normalize_comment(comment: &str) -> Option<String> {
    if comment.is_empty() {
        None
    } else {
        Some(comment.to_string())
    }
}

/// A browser tab as reported by the host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabInfo {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub active: bool,
}

impl TabInfo {
    pub fn new(id: i32, url: &str) -> TabInfo {
        TabInfo {
            id: Some(id),
            url: Some(url.to_string()),
            active: true,
        }
    }
}
