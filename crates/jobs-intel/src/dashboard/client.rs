use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::domain::{JobListing, JobsPayload, NewsPayload};

/// Filter value meaning "no restriction" for job type and source.
pub const WILDCARD: &str = "all";

const JOBS_PATH: &str = "api/jobs.py";
const NEWS_PATH: &str = "api/news.py";
const USER_AGENT: &str = concat!("jobs-intel/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum DataClientError {
    /// The backend answered with a non-success status.
    #[error("{endpoint} API error: {status}")]
    Status { endpoint: &'static str, status: u16 },
    #[error("request to {endpoint} API failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("unable to decode {endpoint} payload: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid API base url '{value}': {reason}")]
    InvalidBaseUrl { value: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl DataClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Filters for a jobs request. `source` is applied client-side because the
/// backend has no native source filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobsQuery {
    pub query: String,
    pub job_type: String,
    pub source: String,
    pub page: u32,
    pub force: bool,
}

impl Default for JobsQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            job_type: WILDCARD.to_string(),
            source: WILDCARD.to_string(),
            page: 1,
            force: false,
        }
    }
}

/// Single-attempt client for the dashboard backend. No retries, timeouts or
/// cancellation: overlapping calls are the caller's business.
#[derive(Debug, Clone)]
pub struct DataClient {
    http: reqwest::Client,
    base: Url,
}

impl DataClient {
    pub fn new(base_url: &str) -> Result<Self, DataClientError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(DataClientError::Client)?;
        Self::with_client(http, base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, DataClientError> {
        let invalid = |reason: String| DataClientError::InvalidBaseUrl {
            value: base_url.to_string(),
            reason,
        };

        let mut base = Url::parse(base_url).map_err(|err| invalid(err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid("url cannot be used as a base".to_string()));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn jobs_url(&self, query: &JobsQuery) -> Url {
        let mut url = self.endpoint(JOBS_PATH);
        {
            let mut pairs = url.query_pairs_mut();
            if !query.query.is_empty() {
                pairs.append_pair("query", &query.query);
            }
            if !query.job_type.is_empty() && query.job_type != WILDCARD {
                pairs.append_pair("type", &query.job_type);
            }
            pairs.append_pair("page", &query.page.to_string());
            if query.force {
                pairs.append_pair("force", "1");
            }
        }
        url
    }

    pub fn news_url(&self, force: bool) -> Url {
        let mut url = self.endpoint(NEWS_PATH);
        if force {
            url.query_pairs_mut().append_pair("force", "1");
        }
        url
    }

    pub async fn fetch_jobs(&self, query: &JobsQuery) -> Result<JobsPayload, DataClientError> {
        let mut payload: JobsPayload = self.get_json("Jobs", self.jobs_url(query)).await?;

        if !query.source.is_empty() && query.source != WILDCARD {
            let before = payload.jobs.len();
            payload.jobs = filter_by_source(payload.jobs, &query.source);
            debug!(
                source = %query.source,
                kept = payload.jobs.len(),
                dropped = before - payload.jobs.len(),
                "applied client-side source filter"
            );
        }

        Ok(payload)
    }

    pub async fn fetch_news(&self, force: bool) -> Result<NewsPayload, DataClientError> {
        self.get_json("News", self.news_url(force)).await
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        let joined = format!("{}{}", self.base.path(), path);
        url.set_path(&joined);
        url.set_query(None);
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: Url,
    ) -> Result<T, DataClientError> {
        debug!(%url, "requesting {endpoint} feed");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| DataClientError::Transport { endpoint, source })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "{endpoint} API returned an error status");
            return Err(DataClientError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| DataClientError::Transport { endpoint, source })?;
        serde_json::from_slice(&body).map_err(|source| DataClientError::Decode { endpoint, source })
    }
}

/// Keeps jobs whose source contains `source`, ignoring case.
pub fn filter_by_source(jobs: Vec<JobListing>, source: &str) -> Vec<JobListing> {
    let needle = source.to_lowercase();
    jobs.into_iter()
        .filter(|job| !job.source.is_empty() && job.source.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> DataClient {
        DataClient::new("http://dashboard.test").expect("valid base url")
    }

    #[test]
    fn jobs_url_omits_defaults() {
        let url = client().jobs_url(&JobsQuery::default());
        assert_eq!(url.as_str(), "http://dashboard.test/api/jobs.py?page=1");
    }

    #[test]
    fn jobs_url_includes_active_filters() {
        let query = JobsQuery {
            query: "rust dev".to_string(),
            job_type: "remote".to_string(),
            source: "remotive".to_string(),
            page: 3,
            force: true,
        };
        let url = client().jobs_url(&query);
        assert_eq!(
            url.as_str(),
            "http://dashboard.test/api/jobs.py?query=rust+dev&type=remote&page=3&force=1"
        );
    }

    #[test]
    fn news_url_only_carries_force_flag() {
        assert_eq!(client().news_url(false).as_str(), "http://dashboard.test/api/news.py");
        assert_eq!(
            client().news_url(true).as_str(),
            "http://dashboard.test/api/news.py?force=1"
        );
    }

    #[test]
    fn base_path_prefix_is_preserved() {
        let client = DataClient::new("http://dashboard.test/intel").expect("valid base url");
        assert_eq!(
            client.news_url(false).as_str(),
            "http://dashboard.test/intel/api/news.py"
        );
    }

    #[test]
    fn rejects_non_absolute_base() {
        let err = DataClient::new("not a url").expect_err("relative url rejected");
        assert!(matches!(err, DataClientError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn source_filter_is_case_insensitive_substring() {
        let jobs = ["Remotive", "RemoteOK", "Arbeitnow", ""]
            .into_iter()
            .map(|source| JobListing {
                source: source.to_string(),
                ..JobListing::default()
            })
            .collect();

        let kept = filter_by_source(jobs, "REMOTE");
        let sources: Vec<_> = kept.iter().map(|job| job.source.as_str()).collect();
        assert_eq!(sources, vec!["Remotive", "RemoteOK"]);
    }
}
