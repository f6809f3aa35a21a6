// Lookup policy and tagged lookup outcome
//
// Replaces the remote → mock → not-found chain with an explicit outcome so
// callers can tell a remote failure from a plain miss.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{DirectoryError, Employee, EmployeeDirectory, MockDirectory};
use crate::errors::remote_directory_unreachable_error;

/// Where a returned record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Remote,
    Mock,
    /// In-memory table, used because the remote query failed
    MockAfterError,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Remote => "supabase",
            Provenance::Mock => "mock",
            Provenance::MockAfterError => "mock (error)",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which backing store(s) a lookup consults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LookupPolicy {
    /// In-memory table only
    #[default]
    Mock,
    /// Remote table, falling back to the in-memory table
    Fallback,
    /// Remote table only
    Remote,
}

impl LookupPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupPolicy::Mock => "mock",
            LookupPolicy::Fallback => "fallback",
            LookupPolicy::Remote => "remote",
        }
    }

    pub fn uses_remote(&self) -> bool {
        !matches!(self, LookupPolicy::Mock)
    }
}

impl fmt::Display for LookupPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LookupPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(LookupPolicy::Mock),
            "fallback" => Ok(LookupPolicy::Fallback),
            "remote" => Ok(LookupPolicy::Remote),
            other => anyhow::bail!("Unknown lookup policy '{}' (expected mock, fallback or remote)", other),
        }
    }
}

/// Why the in-memory table answered instead of the remote one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackCause {
    RemoteMiss,
    RemoteError(String),
}

/// Result of one employee lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Success {
        employee: Employee,
        provenance: Provenance,
    },
    FallbackUsed {
        employee: Employee,
        cause: FallbackCause,
    },
    NotFound {
        name: String,
    },
    RemoteError {
        name: String,
        detail: String,
    },
}

impl LookupOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, LookupOutcome::Success { .. } | LookupOutcome::FallbackUsed { .. })
    }

    pub fn employee(&self) -> Option<&Employee> {
        match self {
            LookupOutcome::Success { employee, .. } | LookupOutcome::FallbackUsed { employee, .. } => {
                Some(employee)
            }
            _ => None,
        }
    }

    pub fn provenance(&self) -> Option<Provenance> {
        match self {
            LookupOutcome::Success { provenance, .. } => Some(*provenance),
            LookupOutcome::FallbackUsed { cause, .. } => Some(match cause {
                FallbackCause::RemoteMiss => Provenance::Mock,
                FallbackCause::RemoteError(_) => Provenance::MockAfterError,
            }),
            _ => None,
        }
    }

    /// JSON object handed back to the model as the tool result
    pub fn to_tool_payload(&self) -> Value {
        match self {
            LookupOutcome::Success { employee, .. } | LookupOutcome::FallbackUsed { employee, .. } => {
                json!({
                    "success": true,
                    "data": employee,
                    "source": self.provenance().map(|p| p.as_str()),
                })
            }
            LookupOutcome::NotFound { name } => json!({
                "success": false,
                "message": format!("{}님을 찾을 수 없습니다.", name),
            }),
            LookupOutcome::RemoteError { name, detail } => json!({
                "success": false,
                "message": format!("{}님 정보를 조회하지 못했습니다.", name),
                "error": detail,
            }),
        }
    }
}

/// Applies a [`LookupPolicy`] over the in-memory and remote directories
pub struct EmployeeLookup {
    policy: LookupPolicy,
    mock: MockDirectory,
    remote: Option<Arc<dyn EmployeeDirectory>>,
}

impl EmployeeLookup {
    pub fn new(
        policy: LookupPolicy,
        mock: MockDirectory,
        remote: Option<Arc<dyn EmployeeDirectory>>,
    ) -> Self {
        Self { policy, mock, remote }
    }

    /// In-memory lookups only
    pub fn mock_only(mock: MockDirectory) -> Self {
        Self::new(LookupPolicy::Mock, mock, None)
    }

    pub fn policy(&self) -> LookupPolicy {
        self.policy
    }

    pub async fn lookup(&self, name: &str) -> LookupOutcome {
        match self.policy {
            LookupPolicy::Mock => self.lookup_mock(name),
            LookupPolicy::Fallback => match self.query_remote(name).await {
                Ok(Some(employee)) => LookupOutcome::Success {
                    employee,
                    provenance: Provenance::Remote,
                },
                Ok(None) => {
                    debug!(name, "Not in remote directory, trying in-memory table");
                    match self.mock.find(name) {
                        Some(employee) => LookupOutcome::FallbackUsed {
                            employee: employee.clone(),
                            cause: FallbackCause::RemoteMiss,
                        },
                        None => LookupOutcome::NotFound { name: name.to_string() },
                    }
                }
                Err(e) => {
                    self.report_remote_failure(name, &e);
                    debug!(name, "Falling back to in-memory table");
                    match self.mock.find(name) {
                        Some(employee) => LookupOutcome::FallbackUsed {
                            employee: employee.clone(),
                            cause: FallbackCause::RemoteError(e.to_string()),
                        },
                        None => LookupOutcome::RemoteError {
                            name: name.to_string(),
                            detail: e.to_string(),
                        },
                    }
                }
            },
            LookupPolicy::Remote => match self.query_remote(name).await {
                Ok(Some(employee)) => LookupOutcome::Success {
                    employee,
                    provenance: Provenance::Remote,
                },
                Ok(None) => LookupOutcome::NotFound { name: name.to_string() },
                Err(e) => {
                    self.report_remote_failure(name, &e);
                    LookupOutcome::RemoteError {
                        name: name.to_string(),
                        detail: e.to_string(),
                    }
                }
            },
        }
    }

    fn lookup_mock(&self, name: &str) -> LookupOutcome {
        match self.mock.find(name) {
            Some(employee) => LookupOutcome::Success {
                employee: employee.clone(),
                provenance: Provenance::Mock,
            },
            None => LookupOutcome::NotFound { name: name.to_string() },
        }
    }

    /// Message for the operator; the model only sees the short `detail`
    pub fn remote_failure_message(&self, error: &DirectoryError) -> String {
        match (&self.remote, error.is_unreachable()) {
            (Some(remote), true) => remote_directory_unreachable_error(&remote.location(), &error.to_string()),
            _ => error.to_string(),
        }
    }

    fn report_remote_failure(&self, name: &str, error: &DirectoryError) {
        warn!(name, "Remote directory failed: {}", self.remote_failure_message(error));
    }

    async fn query_remote(&self, name: &str) -> Result<Option<Employee>, DirectoryError> {
        match &self.remote {
            Some(remote) => remote.find_by_name(name).await,
            None => Err(DirectoryError::NotConfigured),
        }
    }
}
