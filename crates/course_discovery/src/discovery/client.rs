//! HTTP client for the course backend.
//!
//! Only two read endpoints are needed by the discovery view:
//! 1. `GET /courses` returns the whole catalog in one body (no server paging)
//! 2. `GET /courses/instructors` returns the instructor list for the sidebar

use super::config::DiscoveryConfig;
use super::error::DiscoveryError;
use super::types::{Course, Instructor};
use async_trait::async_trait;
use rand::Rng;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use url::Url;

const COURSES_PATH: &str = "courses";
const INSTRUCTORS_PATH: &str = "courses/instructors";

/// Longest slice of an error body kept in error messages.
const MAX_ERROR_BODY: usize = 256;

/// Source of catalog data.
#[async_trait]
pub trait CourseApi: Send + Sync {
    async fn fetch_courses(&self) -> Result<Vec<Course>, DiscoveryError>;
    async fn fetch_instructors(&self) -> Result<Vec<Instructor>, DiscoveryError>;
}

/// `reqwest`-backed [`CourseApi`].
pub struct HttpCourseApi {
    client: Client,
    base_url: Url,
    auth_token: Option<String>,
}

impl HttpCourseApi {
    /// Creates a client from the given configuration.
    pub fn new(config: &DiscoveryConfig) -> Result<Self, DiscoveryError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| DiscoveryError::Network {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: base_url_with_slash(&config.base_url)?,
            auth_token: config.auth_token.clone(),
        })
    }

    /// Resolves an endpoint path against the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, DiscoveryError> {
        Ok(self.base_url.join(path)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, DiscoveryError> {
        let correlation_id = generate_correlation_id();
        let url = self.endpoint(path)?;
        let start = Instant::now();

        info!(
            correlation_id = %correlation_id,
            url = %url,
            "Requesting catalog data"
        );

        let mut request = self.client.get(url.clone()).header(ACCEPT, "application/json");
        if let Some(token) = &self.auth_token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request.send().await.map_err(|e| {
            error!(
                correlation_id = %correlation_id,
                error = %e,
                "Request failed before a response arrived"
            );
            DiscoveryError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                correlation_id = %correlation_id,
                status = status.as_u16(),
                duration_ms = start.elapsed().as_millis() as u64,
                "Backend returned an error status"
            );
            return Err(DiscoveryError::UnexpectedResponse {
                status: status.as_u16(),
                message: truncate(&body, MAX_ERROR_BODY),
            });
        }

        let text = response.text().await?;
        let parsed = serde_json::from_str::<T>(&text).map_err(|e| {
            warn!(
                correlation_id = %correlation_id,
                error = %e,
                "Response body did not match the expected shape"
            );
            DiscoveryError::from(e)
        })?;

        debug!(
            correlation_id = %correlation_id,
            bytes = text.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Catalog request completed"
        );

        Ok(parsed)
    }
}

#[async_trait]
impl CourseApi for HttpCourseApi {
    async fn fetch_courses(&self) -> Result<Vec<Course>, DiscoveryError> {
        let courses: Vec<Course> = self.get_json(COURSES_PATH).await?;
        info!(count = courses.len(), "Fetched courses");
        Ok(courses)
    }

    async fn fetch_instructors(&self) -> Result<Vec<Instructor>, DiscoveryError> {
        let instructors: Vec<Instructor> = self.get_json(INSTRUCTORS_PATH).await?;
        info!(count = instructors.len(), "Fetched instructors");
        Ok(instructors)
    }
}

/// `Url::join` drops the last path segment unless the base ends in `/`.
fn base_url_with_slash(base: &str) -> Result<Url, DiscoveryError> {
    if base.ends_with('/') {
        Ok(Url::parse(base)?)
    } else {
        Ok(Url::parse(&format!("{}/", base))?)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => format!("{}...", &text[..index]),
        None => text.to_string(),
    }
}

/// Generates a unique correlation ID for request tracing.
fn generate_correlation_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros();
    let random: u32 = rand::thread_rng().gen();
    format!("{:x}-{:08x}", timestamp & 0xFFFFFFFF, random)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_for(base: &str) -> HttpCourseApi {
        let config = DiscoveryConfig {
            base_url: base.to_string(),
            ..Default::default()
        };
        HttpCourseApi::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_joins_under_base_path() {
        let api = api_for("https://api.example.com/v1");
        assert_eq!(
            api.endpoint(COURSES_PATH).unwrap().as_str(),
            "https://api.example.com/v1/courses"
        );
        assert_eq!(
            api.endpoint(INSTRUCTORS_PATH).unwrap().as_str(),
            "https://api.example.com/v1/courses/instructors"
        );
    }

    #[test]
    fn test_endpoint_with_trailing_slash() {
        let api = api_for("http://localhost:5000/");
        assert_eq!(
            api.endpoint(COURSES_PATH).unwrap().as_str(),
            "http://localhost:5000/courses"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let config = DiscoveryConfig {
            base_url: "::nope".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            HttpCourseApi::new(&config),
            Err(DiscoveryError::UrlError { .. })
        ));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }

    #[test]
    fn test_correlation_ids_differ() {
        assert_ne!(generate_correlation_id(), generate_correlation_id());
    }
}
