use crate::types::{LogEntry, SearchCriteria, format_timestamp};

pub const SEPARATOR: &str = "----------------------------------------";

/// Quote a value for use in a Cloud Logging filter clause.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Build the filter matching instance deletion audit entries in the window.
pub fn build_filter(criteria: &SearchCriteria) -> String {
    let start = format_timestamp(&criteria.window.start);
    let end = format_timestamp(&criteria.window.end);
    [
        format!("severity={}", quote("NOTICE")),
        format!("resource.type={}", quote("gce_instance")),
        format!("timestamp>={}", quote(&start)),
        format!("timestamp<={}", quote(&end)),
        format!("resource.labels.instance_id={}", quote(&criteria.instance_id)),
        format!("protoPayload.methodName={}", quote("v1.compute.instances.delete")),
    ]
    .join(" AND ")
}

/// Parse the output of the project listing command, one project per line.
pub fn parse_project_list(stdout: &str) -> Vec<String> {
    stdout
        .trim()
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Render a log entry as the fixed twelve-line report followed by a separator.
pub fn format_log_entry(entry: &LogEntry) -> String {
    format!(
        "Log Name: {}\n\
         Insert ID: {}\n\
         Severity: {}\n\
         Timestamp: {}\n\
         Instance ID: {}\n\
         Zone: {}\n\
         Project ID: {}\n\
         Method Name: {}\n\
         Resource Name: {}\n\
         Principal Email: {}\n\
         Caller IP: {}\n\
         User Agent: {}\n\
         {}",
        entry.log_name(),
        entry.insert_id(),
        entry.severity(),
        entry.timestamp(),
        entry.instance_id(),
        entry.zone(),
        entry.project_id(),
        entry.method_name(),
        entry.resource_name(),
        entry.principal_email(),
        entry.caller_ip(),
        entry.user_agent(),
        SEPARATOR,
    )
}
