use thiserror::Error;

/// Failures talking to gcloud or the Google Cloud REST APIs.
#[derive(Debug, Error)]
pub enum GcpError {
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{command} failed: {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("no access token returned by {0}")]
    EmptyToken(String),
    #[error(
        "application-default credentials are unavailable; run 'gcloud auth application-default login'"
    )]
    NoCredentials,
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },
}
