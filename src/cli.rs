use clap::Parser;

#[derive(Parser)]
#[command(name = "deleted-vm-search")]
#[command(about = "Search audit logs for the deletion of a Compute Engine instance")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// gcloud binary used to list projects and read application-default credentials
    #[arg(long, env = "GCLOUD_BIN", default_value = "gcloud")]
    pub gcloud: String,

    /// Zone used to check whether the Compute API is reachable for a project
    #[arg(long, env = "DVS_PROBE_ZONE", default_value = "us-central1-a")]
    pub probe_zone: String,

    /// Cloud Logging API endpoint
    #[arg(
        long,
        env = "DVS_LOGGING_ENDPOINT",
        default_value = "https://logging.googleapis.com"
    )]
    pub logging_endpoint: String,

    /// Compute Engine API endpoint
    #[arg(
        long,
        env = "DVS_COMPUTE_ENDPOINT",
        default_value = "https://compute.googleapis.com"
    )]
    pub compute_endpoint: String,

    /// Number of log entries requested per page
    #[arg(long, default_value_t = 50)]
    pub page_size: u32,
}

/// Settings the search pipeline runs with, derived from the command line.
#[derive(Debug, Clone)]
pub struct Config {
    pub gcloud: String,
    pub probe_zone: String,
    pub logging_endpoint: String,
    pub compute_endpoint: String,
    pub page_size: u32,
}

impl From<&Cli> for Config {
    fn from(cli: &Cli) -> Self {
        Self {
            gcloud: cli.gcloud.clone(),
            probe_zone: cli.probe_zone.clone(),
            logging_endpoint: cli.logging_endpoint.trim_end_matches('/').to_string(),
            compute_endpoint: cli.compute_endpoint.trim_end_matches('/').to_string(),
            page_size: cli.page_size,
        }
    }
}
