// Remote employee table over the PostgREST interface (Supabase)

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::{DirectoryError, Employee, EmployeeDirectory};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Point queries against `{base_url}/rest/v1/{table}`
#[derive(Clone)]
pub struct RemoteDirectory {
    client: Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl RemoteDirectory {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, table: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, api_key, table, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        table: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client for remote directory")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            table: table.into(),
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }
}

#[async_trait]
impl EmployeeDirectory for RemoteDirectory {
    async fn find_by_name(&self, name: &str) -> Result<Option<Employee>, DirectoryError> {
        let filter = format!("eq.{}", name);

        tracing::debug!(table = %self.table, name, "Querying remote directory");

        let response = self
            .client
            .get(self.endpoint())
            .query(&[("select", "*"), ("name", filter.as_str()), ("limit", "1")])
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DirectoryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let rows: Vec<Employee> = response
            .json()
            .await
            .map_err(|e| DirectoryError::Decode(e.to_string()))?;

        tracing::debug!(rows = rows.len(), "Remote directory responded");

        Ok(rows.into_iter().next())
    }

    fn name(&self) -> &str {
        "supabase"
    }

    fn location(&self) -> String {
        self.endpoint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_finds_row_by_exact_name() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/rest/v1/employees")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("name".into(), "eq.김철수".into()),
                Matcher::UrlEncoded("limit".into(), "1".into()),
            ]))
            .match_header("apikey", "anon-key")
            .match_header("authorization", "Bearer anon-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":1,"name":"김철수","department":"개발팀","position":"시니어 개발자","created_at":"2024-01-01"}]"#)
            .create_async()
            .await;

        let dir = RemoteDirectory::new(server.url(), "anon-key", "employees").unwrap();
        let employee = dir.find_by_name("김철수").await.unwrap().unwrap();
        assert_eq!(employee.id, 1);
        assert_eq!(employee.position, "시니어 개발자");
    }

    #[tokio::test]
    async fn test_empty_result_is_none() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/rest/v1/employees")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let dir = RemoteDirectory::new(server.url(), "k", "employees").unwrap();
        assert!(dir.find_by_name("홍길동").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/rest/v1/employees")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"message":"Invalid API key"}"#)
            .create_async()
            .await;

        let dir = RemoteDirectory::new(server.url(), "bad", "employees").unwrap();
        let err = dir.find_by_name("김철수").await.unwrap_err();
        assert!(err.is_unreachable());
        match err {
            DirectoryError::Status { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("Invalid API key"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_rows_are_decode_errors() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/rest/v1/employees")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"not":"an array"}"#)
            .create_async()
            .await;

        let dir = RemoteDirectory::new(server.url(), "k", "employees").unwrap();
        let err = dir.find_by_name("김철수").await.unwrap_err();
        assert!(matches!(err, DirectoryError::Decode(_)));
        assert!(!err.is_unreachable());
    }

    #[test]
    fn test_location_names_the_table_endpoint() {
        let dir = RemoteDirectory::new("https://demo.supabase.co/", "k", "staff").unwrap();
        assert_eq!(dir.location(), "https://demo.supabase.co/rest/v1/staff");
    }
}
