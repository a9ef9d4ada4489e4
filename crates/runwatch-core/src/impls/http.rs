//! HTTP の StatusSource 実装
//!
//! - `HttpStatusSource`: `{status, conclusion, job_url}` を返す任意の URL
//! - `GithubJobsSource`: GitHub Actions の `runs/{id}/jobs` から先頭の job を読む
//!
//! どちらも失敗はすべて QueryError（Transient）として返します。

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::{QueryError, StatusRecord};
use crate::ports::StatusSource;

const DEFAULT_USER_AGENT: &str = concat!("runwatch/", env!("CARGO_PKG_VERSION"));
pub const GITHUB_API: &str = "https://api.github.com";

#[derive(Clone)]
pub struct HttpSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Sent as a bearer token when present.
    pub token: Option<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            token: None,
        }
    }
}

fn redact(token: &Option<String>) -> Option<&'static str> {
    token.as_ref().map(|_| "<redacted>")
}

impl fmt::Debug for HttpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpSettings")
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .field("token", &redact(&self.token))
            .finish()
    }
}

#[derive(Clone)]
struct JsonClient {
    client: reqwest::Client,
    token: Option<String>,
}

impl JsonClient {
    fn new(settings: &HttpSettings) -> Result<Self, QueryError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(map_reqwest_error)?;
        Ok(Self {
            client,
            token: settings.token.clone(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, url: &str, accept: &str) -> Result<T, QueryError> {
        let mut request = self
            .client
            .get(url)
            .header(USER_AGENT, DEFAULT_USER_AGENT)
            .header(ACCEPT, accept);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(QueryError::HttpStatus(status.as_u16()));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl fmt::Debug for JsonClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonClient")
            .field("client", &self.client)
            .field("token", &redact(&self.token))
            .finish()
    }
}

fn map_reqwest_error(err: reqwest::Error) -> QueryError {
    if err.is_decode() {
        return QueryError::Decode(err.to_string());
    }
    QueryError::Network(err.to_string())
}

/// Reads a status endpoint that already speaks `{status, conclusion, job_url}`.
#[derive(Debug, Clone)]
pub struct HttpStatusSource {
    url: String,
    client: JsonClient,
}

impl HttpStatusSource {
    pub fn new(url: impl Into<String>, settings: HttpSettings) -> Result<Self, QueryError> {
        Ok(Self {
            url: url.into(),
            client: JsonClient::new(&settings)?,
        })
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn fetch(&self) -> Result<StatusRecord, QueryError> {
        self.client.get(&self.url, "application/json").await
    }
}

#[derive(Debug, Deserialize)]
struct JobsPage {
    #[serde(default)]
    jobs: Vec<GithubJob>,
}

#[derive(Debug, Deserialize)]
struct GithubJob {
    status: String,
    conclusion: Option<String>,
    html_url: String,
}

impl From<GithubJob> for StatusRecord {
    fn from(job: GithubJob) -> Self {
        StatusRecord {
            status: job.status,
            conclusion: job.conclusion,
            job_url: job.html_url,
        }
    }
}

/// Watches the first job of a GitHub Actions workflow run.
#[derive(Debug, Clone)]
pub struct GithubJobsSource {
    url: String,
    client: JsonClient,
}

impl GithubJobsSource {
    /// `repo` is `owner/name`.
    pub fn new(repo: &str, run_id: u64, settings: HttpSettings) -> Result<Self, QueryError> {
        Self::with_api_base(GITHUB_API, repo, run_id, settings)
    }

    pub fn with_api_base(
        api_base: &str,
        repo: &str,
        run_id: u64,
        settings: HttpSettings,
    ) -> Result<Self, QueryError> {
        let api_base = api_base.trim_end_matches('/');
        Ok(Self {
            url: format!("{api_base}/repos/{repo}/actions/runs/{run_id}/jobs"),
            client: JsonClient::new(&settings)?,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl StatusSource for GithubJobsSource {
    async fn fetch(&self) -> Result<StatusRecord, QueryError> {
        let page: JobsPage = self
            .client
            .get(&self.url, "application/vnd.github+json")
            .await?;
        page.jobs
            .into_iter()
            .next()
            .map(StatusRecord::from)
            .ok_or_else(|| QueryError::Decode("no jobs in run".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn github_url_is_built_from_repo_and_run() {
        let source =
            GithubJobsSource::with_api_base("http://localhost:1/", "octo/hello", 42, HttpSettings::default())
                .unwrap();
        assert_eq!(source.url(), "http://localhost:1/repos/octo/hello/actions/runs/42/jobs");
    }

    #[test]
    fn debug_output_hides_token() {
        let settings = HttpSettings {
            token: Some("ghp_secret".to_string()),
            ..HttpSettings::default()
        };
        let source = HttpStatusSource::new("http://localhost:1/status", settings.clone()).unwrap();

        for text in [format!("{settings:?}"), format!("{source:?}")] {
            assert!(!text.contains("ghp_secret"), "{text}");
            assert!(text.contains("<redacted>"), "{text}");
        }
    }
}
