/// Client for the WebAnnotator rating API
use async_trait::async_trait;
use reqwest::{Client, Request, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Config;
use crate::error::ApiError;
use crate::page_data::{ErrorBody, PageCheckResult, PageStats, RatingSubmission, SubmitResponse};

const USER_ID_HEADER: &str = "X-User-ID";

/// Operations the extension needs from the rating service
#[async_trait(?Send)]
pub trait RatingsApi {
    /// Stats and the caller's own rating for a page
    async fn check_page(&self, url: &str) -> Result<PageCheckResult, ApiError>;

    /// Submit (or replace) the caller's rating, returning the updated stats
    async fn submit_rating(&self, url: &str, score: u8, comment: &str) -> Result<PageStats, ApiError>;
}

/// `RatingsApi` over HTTP
#[derive(Debug, Clone)]
pub struct HttpRatingsApi {
    client: Client,
    config: Config,
}

impl HttpRatingsApi {
    pub fn new(config: Config) -> HttpRatingsApi {
        HttpRatingsApi {
            client: Client::new(),
            config,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Url::parse(&format!("{}{}", self.config.api_base, path))
            .map_err(|e| ApiError::Transport(format!("Invalid API base {}: {}", self.config.api_base, e)))
    }

    /// `{api_base}/api/v1/pages/check?url={page_url}`, with the page URL percent-encoded
    pub fn check_url(&self, page_url: &str) -> Result<Url, ApiError> {
        let mut endpoint = self.endpoint("/api/v1/pages/check")?;
        endpoint.query_pairs_mut().append_pair("url", page_url);
        Ok(endpoint)
    }

    fn user_id(&self) -> String {
        self.config.user_id.to_string()
    }

    /// `GET` for the page check, carrying the identity header
    pub fn check_request(&self, page_url: &str) -> Result<Request, ApiError> {
        Ok(self
            .client
            .get(self.check_url(page_url)?)
            .header(USER_ID_HEADER, self.user_id())
            .build()?)
    }

    /// `POST` of a rating as JSON, carrying the identity header
    pub fn submit_request(&self, page_url: &str, score: u8, comment: &str) -> Result<Request, ApiError> {
        validate_score(score)?;

        Ok(self
            .client
            .post(self.endpoint("/api/v1/ratings")?)
            .header(USER_ID_HEADER, self.user_id())
            .json(&RatingSubmission::new(page_url, score, comment))
            .build()?)
    }
}

#[async_trait(?Send)]
impl RatingsApi for HttpRatingsApi {
    async fn check_page(&self, url: &str) -> Result<PageCheckResult, ApiError> {
        let response = self.client.execute(self.check_request(url)?).await?;
        read_response(response).await
    }

    async fn submit_rating(&self, url: &str, score: u8, comment: &str) -> Result<PageStats, ApiError> {
        let response = self
            .client
            .execute(self.submit_request(url, score, comment)?)
            .await?;
        let result: SubmitResponse = read_response(response).await?;
        Ok(result.stats)
    }
}

/// Decode a success body, or turn a failure status into an `ApiError`
async fn read_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }

    Ok(response.json::<T>().await?)
}

async fn error_from_response(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    error_from_body(status, &body)
}

/// Prefer the server's `error` text, otherwise describe the status
pub fn error_from_body(status: u16, body: &str) -> ApiError {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.error)
        .filter(|message| !message.is_empty())
        .map(ApiError::Server)
        .unwrap_or(ApiError::Status(status))
}

pub fn validate_score(score: u8) -> Result<(), ApiError> {
    if (1..=10).contains(&score) {
        Ok(())
    } else {
        Err(ApiError::InvalidScore(score))
    }
}

/// Fetch page stats, mapping every failure to `None` ("unknown", not "zero ratings")
pub async fn fetch_page_stats<A: RatingsApi + ?Sized>(api: &A, url: &str) -> Option<PageCheckResult> {
    match api.check_page(url).await {
        Ok(result) => Some(result),
        Err(e) => {
            log::warn!("Failed to fetch stats for {}: {}", url, e);
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::page_data::{RatingSubmission, UserRating};
    use futures::executor::block_on;
    use std::cell::{Cell, RefCell};

    /// Scripted `RatingsApi` that records its calls
    pub struct FakeRatingsApi {
        pub check_result: Result<PageCheckResult, ApiError>,
        pub submit_result: Result<PageStats, ApiError>,
        pub check_calls: Cell<usize>,
        pub submissions: RefCell<Vec<RatingSubmission>>,
    }

    impl FakeRatingsApi {
        pub fn with_total(total_ratings: u32) -> FakeRatingsApi {
            FakeRatingsApi::returning(Ok(page_result(total_ratings)))
        }

        pub fn returning(check_result: Result<PageCheckResult, ApiError>) -> FakeRatingsApi {
            FakeRatingsApi {
                check_result,
                submit_result: Err(ApiError::Status(500)),
                check_calls: Cell::new(0),
                submissions: RefCell::new(Vec::new()),
            }
        }
    }

    #[async_trait(?Send)]
    impl RatingsApi for FakeRatingsApi {
        async fn check_page(&self, _url: &str) -> Result<PageCheckResult, ApiError> {
            self.check_calls.set(self.check_calls.get() + 1);
            self.check_result.clone()
        }

        async fn submit_rating(&self, url: &str, score: u8, comment: &str) -> Result<PageStats, ApiError> {
            validate_score(score)?;
            self.submissions
                .borrow_mut()
                .push(RatingSubmission::new(url, score, comment));
            self.submit_result.clone()
        }
    }

    pub fn page_result(total_ratings: u32) -> PageCheckResult {
        PageCheckResult {
            can_rate: true,
            stats: PageStats {
                total_ratings,
                average_score: if total_ratings > 0 { 7.0 } else { 0.0 },
            },
            user_rating: UserRating::default(),
        }
    }

    #[test]
    fn test_check_url_encodes_page_url() {
        let api = HttpRatingsApi::new(Config::default());

        let url = api.check_url("https://example.com/2025/10/a b?x=1&y=2").unwrap();

        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/v1/pages/check?url=https%3A%2F%2Fexample.com%2F2025%2F10%2Fa+b%3Fx%3D1%26y%3D2"
        );
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![("url".to_string(), "https://example.com/2025/10/a b?x=1&y=2".to_string())]);
    }

    fn header<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
        request.headers().get(name).and_then(|value| value.to_str().ok())
    }

    #[test]
    fn test_check_request_carries_identity() {
        let api = HttpRatingsApi::new(Config::default());

        let request = api.check_request("https://example.com/2025/10/story").unwrap();

        assert_eq!(*request.method(), reqwest::Method::GET);
        assert_eq!(
            request.url().as_str(),
            "http://localhost:8080/api/v1/pages/check?url=https%3A%2F%2Fexample.com%2F2025%2F10%2Fstory"
        );
        assert_eq!(header(&request, "X-User-ID"), Some("123e4567-e89b-12d3-a456-426614174000"));
        assert!(request.body().is_none());
    }

    #[test]
    fn test_submit_request_posts_json() {
        let api = HttpRatingsApi::new(Config::default());

        let request = api.submit_request("https://example.com/2025/10/story", 7, "").unwrap();

        assert_eq!(*request.method(), reqwest::Method::POST);
        assert_eq!(request.url().as_str(), "http://localhost:8080/api/v1/ratings");
        assert_eq!(header(&request, "X-User-ID"), Some("123e4567-e89b-12d3-a456-426614174000"));
        assert_eq!(header(&request, "Content-Type"), Some("application/json"));

        let body: serde_json::Value =
            serde_json::from_slice(request.body().and_then(|body| body.as_bytes()).unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"url": "https://example.com/2025/10/story", "score": 7, "comment": null})
        );
    }

    #[test]
    fn test_submit_request_keeps_comment() {
        let api = HttpRatingsApi::new(Config::default());

        let request = api.submit_request("https://example.com/2025/10/story", 10, "Great").unwrap();

        let body: serde_json::Value =
            serde_json::from_slice(request.body().and_then(|body| body.as_bytes()).unwrap()).unwrap();
        assert_eq!(body["comment"], "Great");
        assert_eq!(body["score"], 10);
    }

    fn response(status: u16, body: &'static str) -> Response {
        Response::from(http::Response::builder().status(status).body(body).unwrap())
    }

    #[test]
    fn test_read_response_decodes_success() {
        let body = r#"{"stats": {"total_ratings": 5, "average_score": 6.5}}"#;

        let result: Result<SubmitResponse, ApiError> = block_on(read_response(response(200, body)));

        assert_eq!(result.unwrap().stats, PageStats { total_ratings: 5, average_score: 6.5 });
    }

    #[test]
    fn test_read_response_maps_failure_status() {
        let result: Result<PageCheckResult, ApiError> =
            block_on(read_response(response(400, r#"{"error": "Invalid URL"}"#)));
        assert_eq!(result, Err(ApiError::Server("Invalid URL".to_string())));

        let result: Result<PageCheckResult, ApiError> = block_on(read_response(response(503, "")));
        assert_eq!(result, Err(ApiError::Status(503)));
    }

    #[test]
    fn test_read_response_malformed_body() {
        let result: Result<PageCheckResult, ApiError> = block_on(read_response(response(200, "{}")));
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_check_url_with_invalid_base() {
        let api = HttpRatingsApi::new(Config::new("not a base", crate::config::DEFAULT_USER_ID));
        assert!(matches!(api.check_url("https://example.com"), Err(ApiError::Transport(_))));
    }

    #[test]
    fn test_error_from_body_prefers_server_text() {
        assert_eq!(
            error_from_body(400, r#"{"error": "Score must be between 1 and 10"}"#),
            ApiError::Server("Score must be between 1 and 10".to_string())
        );
    }

    #[test]
    fn test_error_from_body_falls_back_to_status() {
        assert_eq!(error_from_body(502, "<html>Bad Gateway</html>"), ApiError::Status(502));
        assert_eq!(error_from_body(500, r#"{"message": "oops"}"#), ApiError::Status(500));
        assert_eq!(error_from_body(500, r#"{"error": ""}"#), ApiError::Status(500));
        assert_eq!(error_from_body(404, ""), ApiError::Status(404));
    }

    #[test]
    fn test_validate_score() {
        assert!(validate_score(1).is_ok());
        assert!(validate_score(10).is_ok());
        assert_eq!(validate_score(0), Err(ApiError::InvalidScore(0)));
        assert_eq!(validate_score(11), Err(ApiError::InvalidScore(11)));
    }

    #[test]
    fn test_invalid_score_builds_no_request() {
        let api = HttpRatingsApi::new(Config::default());
        assert!(matches!(api.submit_request("https://example.com/a/b/c", 11, ""), Err(ApiError::InvalidScore(11))));
    }

    #[test]
    fn test_invalid_score_is_rejected_before_sending() {
        let api = HttpRatingsApi::new(Config::new("http://127.0.0.1:9", crate::config::DEFAULT_USER_ID));

        let result = block_on(api.submit_rating("https://example.com/a/b/c", 0, ""));

        assert_eq!(result, Err(ApiError::InvalidScore(0)));
    }

    #[test]
    fn test_fetch_page_stats_maps_errors_to_none() {
        let api = FakeRatingsApi::returning(Err(ApiError::Transport("connection refused".to_string())));

        assert_eq!(block_on(fetch_page_stats(&api, "https://example.com/a/b/c")), None);
        assert_eq!(api.check_calls.get(), 1);
    }

    #[test]
    fn test_fetch_page_stats_passes_result_through() {
        let api = FakeRatingsApi::with_total(3);

        let result = block_on(fetch_page_stats(&api, "https://example.com/a/b/c")).unwrap();

        assert_eq!(result.stats.total_ratings, 3);
    }
}
