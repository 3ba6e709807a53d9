use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

/// Format every timestamp bound must match, e.g. `2024-01-01T00:00:00Z`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Rendered for any field missing from a log entry.
pub const NOT_AVAILABLE: &str = "N/A";

/// Parse a timestamp in the strict `YYYY-MM-DDTHH:MM:SSZ` form.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).map(|t| t.and_utc())
}

pub fn format_timestamp(t: &DateTime<Utc>) -> String {
    t.format(TIMESTAMP_FORMAT).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    pub window: TimeWindow,
    pub instance_id: String,
    /// `None` means every project visible to the caller.
    pub project_id: Option<String>,
}

/// A Cloud Logging entry as returned by `entries:list`. Only the fields the
/// report shows are modelled, all of them optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub log_name: Option<String>,
    pub insert_id: Option<String>,
    pub severity: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub resource: Option<MonitoredResource>,
    #[serde(alias = "jsonPayload")]
    pub proto_payload: Option<AuditPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonitoredResource {
    #[serde(default)]
    pub labels: ResourceLabels,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceLabels {
    pub instance_id: Option<String>,
    pub zone: Option<String>,
    pub project_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditPayload {
    pub method_name: Option<String>,
    pub resource_name: Option<String>,
    pub authentication_info: Option<AuthenticationInfo>,
    pub request_metadata: Option<RequestMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationInfo {
    pub principal_email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMetadata {
    pub caller_ip: Option<String>,
    pub caller_supplied_user_agent: Option<String>,
}

fn or_na(field: Option<&String>) -> &str {
    field.map(String::as_str).unwrap_or(NOT_AVAILABLE)
}

impl LogEntry {
    fn labels(&self) -> Option<&ResourceLabels> {
        self.resource.as_ref().map(|r| &r.labels)
    }

    fn payload(&self) -> Option<&AuditPayload> {
        self.proto_payload.as_ref()
    }

    pub fn log_name(&self) -> &str {
        or_na(self.log_name.as_ref())
    }

    pub fn insert_id(&self) -> &str {
        or_na(self.insert_id.as_ref())
    }

    pub fn severity(&self) -> &str {
        or_na(self.severity.as_ref())
    }

    pub fn timestamp(&self) -> String {
        self.timestamp
            .map(|t| t.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    pub fn instance_id(&self) -> &str {
        or_na(self.labels().and_then(|l| l.instance_id.as_ref()))
    }

    pub fn zone(&self) -> &str {
        or_na(self.labels().and_then(|l| l.zone.as_ref()))
    }

    pub fn project_id(&self) -> &str {
        or_na(self.labels().and_then(|l| l.project_id.as_ref()))
    }

    pub fn method_name(&self) -> &str {
        or_na(self.payload().and_then(|p| p.method_name.as_ref()))
    }

    pub fn resource_name(&self) -> &str {
        or_na(self.payload().and_then(|p| p.resource_name.as_ref()))
    }

    pub fn principal_email(&self) -> &str {
        or_na(
            self.payload()
                .and_then(|p| p.authentication_info.as_ref())
                .and_then(|a| a.principal_email.as_ref()),
        )
    }

    pub fn caller_ip(&self) -> &str {
        or_na(
            self.payload()
                .and_then(|p| p.request_metadata.as_ref())
                .and_then(|m| m.caller_ip.as_ref()),
        )
    }

    pub fn user_agent(&self) -> &str {
        or_na(
            self.payload()
                .and_then(|p| p.request_metadata.as_ref())
                .and_then(|m| m.caller_supplied_user_agent.as_ref()),
        )
    }
}
