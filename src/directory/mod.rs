// Employee directory
//
// Backing stores for the `get_user_info` tool: a fixed in-memory table and a
// remote PostgREST table, plus the lookup policy that decides which one to
// trust and how to fall back between them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod lookup;
pub mod mock;
pub mod remote;

pub use lookup::{EmployeeLookup, FallbackCause, LookupOutcome, LookupPolicy, Provenance};
pub use mock::MockDirectory;
pub use remote::RemoteDirectory;

/// A single row of the employee directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    /// Lookup key; matched exactly (case and diacritics included)
    pub name: String,
    pub department: String,
    pub position: String,
}

impl Employee {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        department: impl Into<String>,
        position: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            department: department.into(),
            position: position.into(),
        }
    }
}

/// Failure talking to a directory backend
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("directory request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("directory returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode directory rows: {0}")]
    Decode(String),

    #[error("remote directory not configured")]
    NotConfigured,
}

impl DirectoryError {
    /// The backend could not be reached or refused the query
    pub fn is_unreachable(&self) -> bool {
        matches!(self, DirectoryError::Request(_) | DirectoryError::Status { .. })
    }
}

/// A source of employee records keyed by exact name
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    /// Find the first employee whose name equals `name` exactly
    async fn find_by_name(&self, name: &str) -> Result<Option<Employee>, DirectoryError>;

    /// Short label for logs (e.g. "mock", "supabase")
    fn name(&self) -> &str;

    /// Where the records live, for error messages
    fn location(&self) -> String {
        self.name().to_string()
    }
}
