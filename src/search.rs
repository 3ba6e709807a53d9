use std::io::Write;

use futures::StreamExt;
use tracing::debug;

use crate::error::GcpError;
use crate::gcp::{ComputeProbe, LogSource, ProjectLister};
use crate::types::{LogEntry, SearchCriteria};
use crate::utils::build_filter;

/// Decide which projects to search.
///
/// An explicit project is used as is. Otherwise every listed project whose
/// Compute API answers the probe is kept, in listing order. A listing failure
/// is reported to `out` and yields no projects.
pub async fn resolve_projects<L, P, W>(
    project_id: Option<&str>,
    lister: &L,
    probe: &P,
    out: &mut W,
) -> anyhow::Result<Vec<String>>
where
    L: ProjectLister + ?Sized,
    P: ComputeProbe + ?Sized,
    W: Write,
{
    if let Some(project) = project_id {
        return Ok(vec![project.to_string()]);
    }

    writeln!(out, "Fetching projects...")?;
    let listed = match lister.list_projects().await {
        Ok(projects) => projects,
        Err(GcpError::CommandFailed { stderr, code, .. }) => {
            debug!("Project listing exited with code {:?}", code);
            writeln!(out, "Error listing projects: {}", stderr)?;
            return Ok(Vec::new());
        }
        Err(e) => {
            writeln!(out, "Error listing projects: {}", e)?;
            return Ok(Vec::new());
        }
    };

    let mut candidates = Vec::with_capacity(listed.len());
    for project in listed {
        match probe.probe(&project).await {
            Ok(()) => candidates.push(project),
            Err(e) => debug!("Skipping project {}: compute probe failed: {}", project, e),
        }
    }
    Ok(candidates)
}

/// A matching entry and the project it came from.
#[derive(Debug)]
pub struct Match {
    pub project: String,
    pub entry: LogEntry,
}

/// Query each project in order and return the first matching entry.
///
/// Nothing past the first entry is read, from that project or any later one.
/// Query errors are returned to the caller.
pub async fn find_first_match<S, W>(
    criteria: &SearchCriteria,
    projects: &[String],
    source: &S,
    out: &mut W,
) -> anyhow::Result<Option<Match>>
where
    S: LogSource + ?Sized,
    W: Write,
{
    let filter = build_filter(criteria);
    for project in projects {
        writeln!(out, "Running query for project {}...", project)?;
        let mut entries = source.list_entries(project, &filter);
        if let Some(entry) = entries.next().await {
            return Ok(Some(Match {
                project: project.clone(),
                entry: entry?,
            }));
        }
        debug!("No matching entries in project {}", project);
    }
    Ok(None)
}
