use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::debug;

use crate::error::GcpError;
use crate::types::LogEntry;

/// Lists the projects visible to the caller.
#[async_trait]
pub trait ProjectLister {
    async fn list_projects(&self) -> Result<Vec<String>, GcpError>;
}

/// Checks whether the Compute API answers for a project. The listed
/// instances are discarded, only success matters.
#[async_trait]
pub trait ComputeProbe {
    async fn probe(&self, project: &str) -> Result<(), GcpError>;
}

/// Reads log entries matching a filter from a single project.
pub trait LogSource {
    /// Entries are produced lazily in the backend's default order.
    fn list_entries<'a>(
        &'a self,
        project: &'a str,
        filter: &'a str,
    ) -> BoxStream<'a, anyhow::Result<LogEntry>>;
}

/// Thin wrapper around the gcloud CLI.
#[derive(Debug, Clone)]
pub struct Gcloud {
    bin: String,
}

impl Gcloud {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    async fn run(&self, args: &[&str]) -> Result<String, GcpError> {
        let command = format!("{} {}", self.bin, args.join(" "));
        debug!("Running {}", command);
        let output = Command::new(&self.bin)
            .args(args)
            .output()
            .await
            .map_err(|source| GcpError::Spawn {
                command: command.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(GcpError::CommandFailed {
                command,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Access token for the application-default credentials.
    pub async fn access_token(&self) -> Result<String, GcpError> {
        let token = self
            .run(&["auth", "application-default", "print-access-token"])
            .await?
            .trim()
            .to_string();
        if token.is_empty() {
            return Err(GcpError::EmptyToken(self.bin.clone()));
        }
        Ok(token)
    }
}

#[async_trait]
impl ProjectLister for Gcloud {
    async fn list_projects(&self) -> Result<Vec<String>, GcpError> {
        let stdout = self
            .run(&["projects", "list", "--format=value(projectId)"])
            .await?;
        Ok(crate::utils::parse_project_list(&stdout))
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, GcpError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let url = resp.url().to_string();
    let body = resp.text().await.unwrap_or_default();
    Err(GcpError::Status { url, status, body })
}

fn bearer(token: &Option<String>) -> Result<&str, GcpError> {
    token.as_deref().ok_or(GcpError::NoCredentials)
}

/// Without a token every probe fails, so no project passes the check.
pub struct ComputeClient {
    http: reqwest::Client,
    endpoint: String,
    zone: String,
    token: Option<String>,
}

impl ComputeClient {
    pub fn new(http: reqwest::Client, endpoint: &str, zone: &str, token: Option<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.to_string(),
            zone: zone.to_string(),
            token,
        }
    }
}

#[async_trait]
impl ComputeProbe for ComputeClient {
    async fn probe(&self, project: &str) -> Result<(), GcpError> {
        let url = format!(
            "{}/compute/v1/projects/{}/zones/{}/instances",
            self.endpoint, project, self.zone
        );
        let token = bearer(&self.token)?;
        let resp = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[("maxResults", "1")])
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListEntriesRequest<'a> {
    resource_names: Vec<String>,
    filter: &'a str,
    page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListEntriesResponse {
    #[serde(default)]
    pub entries: Vec<LogEntry>,
    pub next_page_token: Option<String>,
}

/// Without a token every query fails.
pub struct LoggingClient {
    http: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    page_size: u32,
}

impl LoggingClient {
    pub fn new(
        http: reqwest::Client,
        endpoint: &str,
        token: Option<String>,
        page_size: u32,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.to_string(),
            token,
            page_size,
        }
    }

    async fn fetch_page(
        &self,
        project: &str,
        filter: &str,
        page_token: Option<String>,
    ) -> Result<ListEntriesResponse, GcpError> {
        let token = bearer(&self.token)?;
        let body = ListEntriesRequest {
            resource_names: vec![format!("projects/{}", project)],
            filter,
            page_size: self.page_size,
            page_token,
        };
        debug!("Fetching log page for project {}", project);
        let resp = self
            .http
            .post(format!("{}/v2/entries:list", self.endpoint))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        Ok(check_status(resp).await?.json().await?)
    }
}

impl LogSource for LoggingClient {
    fn list_entries<'a>(
        &'a self,
        project: &'a str,
        filter: &'a str,
    ) -> BoxStream<'a, anyhow::Result<LogEntry>> {
        // None: no more pages. Some(None): first page.
        let pages = stream::try_unfold(
            Some(None),
            move |state: Option<Option<String>>| async move {
                let Some(page_token) = state else {
                    return Ok::<_, anyhow::Error>(None);
                };
                let page = self.fetch_page(project, filter, page_token).await?;
                let next = page.next_page_token.filter(|t| !t.is_empty());
                Ok(Some((page.entries, next.map(Some))))
            },
        );
        pages
            .map_ok(|entries| stream::iter(entries.into_iter().map(Ok)))
            .try_flatten()
            .boxed()
    }
}
