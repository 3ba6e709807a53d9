mod cli;
mod error;
mod gcp;
mod input;
mod search;
mod types;
mod utils;

use std::io::IsTerminal;

use clap::Parser;
use tracing::debug;

use cli::{Cli, Config};
use gcp::{ComputeClient, Gcloud, LoggingClient};
use input::{InquirePrompter, LinePrompter, collect_criteria};
use search::{find_first_match, resolve_projects};
use utils::format_log_entry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from(&cli);
    debug!("Using config: {:?}", config);

    let criteria = if std::io::stdin().is_terminal() {
        collect_criteria(&mut InquirePrompter)?
    } else {
        let stdin = std::io::stdin();
        collect_criteria(&mut LinePrompter::new(stdin.lock(), std::io::stdout()))?
    };
    debug!("Search criteria: {:?}", criteria);

    let gcloud = Gcloud::new(&config.gcloud);
    let token = match gcloud.access_token().await {
        Ok(token) => Some(token),
        Err(e) => {
            debug!("No application-default credentials: {}", e);
            None
        }
    };

    let http = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let compute = ComputeClient::new(
        http.clone(),
        &config.compute_endpoint,
        &config.probe_zone,
        token.clone(),
    );
    let logging = LoggingClient::new(http, &config.logging_endpoint, token, config.page_size);

    let mut stdout = std::io::stdout();
    let projects =
        resolve_projects(criteria.project_id.as_deref(), &gcloud, &compute, &mut stdout).await?;
    debug!("Searching {} project(s)", projects.len());

    match find_first_match(&criteria, &projects, &logging, &mut stdout).await? {
        Some(found) => {
            debug!("Match found in project {}", found.project);
            println!("{}", format_log_entry(&found.entry));
        }
        None => debug!("No deletion entry found for instance {}", criteria.instance_id),
    }
    Ok(())
}
