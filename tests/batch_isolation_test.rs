// Batch driver isolation
//
// A failing turn must not stop the turns after it.

use anyhow::Result;
use async_trait::async_trait;
use staffcall::app::build_session_with_provider;
use staffcall::cli::{run_batch, SAMPLE_PROMPTS};
use staffcall::config::{Config, ModelConfig};
use staffcall::providers::{ContentBlock, LlmProvider, Message, ProviderRequest, ProviderResponse};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Answers every prompt directly, except prompts containing `fail_on`
struct EchoProvider {
    fail_on: String,
    seen: Arc<Mutex<Vec<String>>>,
}

fn first_user_text(messages: &[Message]) -> String {
    messages
        .iter()
        .find(|m| m.role == "user")
        .and_then(|m| m.content.first())
        .and_then(|b| b.as_text())
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl LlmProvider for EchoProvider {
    async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
        let prompt = first_user_text(&request.messages);
        self.seen.lock().await.push(prompt.clone());

        if prompt.contains(&self.fail_on) {
            anyhow::bail!("simulated outage for '{}'", prompt);
        }

        Ok(ProviderResponse {
            id: "echo".to_string(),
            model: request.model.clone(),
            content: vec![ContentBlock::Text {
                text: format!("echo: {}", prompt),
            }],
            stop_reason: Some("stop".to_string()),
            role: "assistant".to_string(),
            provider: "echo".to_string(),
        })
    }

    fn name(&self) -> &str {
        "echo"
    }

    fn default_model(&self) -> &str {
        "echo-model"
    }
}

#[tokio::test]
async fn test_failed_turn_does_not_stop_batch() -> Result<()> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let provider = Arc::new(EchoProvider {
        fail_on: "이영희".to_string(),
        seen: seen.clone(),
    });

    let config = Config::new(ModelConfig::new("unused"));
    let session = build_session_with_provider(&config, provider)?;

    let prompts: Vec<String> = SAMPLE_PROMPTS.iter().map(|p| p.to_string()).collect();
    let mut out = Vec::new();
    let report = run_batch(&session, &prompts, &mut out).await?;

    assert_eq!(report.succeeded, 3);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "이영희는 어느 팀이야?");
    assert!(report.failed[0].1.contains("simulated outage"));

    // Every prompt reached the provider, in order
    assert_eq!(*seen.lock().await, prompts);

    let transcript = String::from_utf8(out)?;
    assert!(transcript.contains("사용자: 안녕하세요!"));
    assert!(transcript.contains("ChatGPT: echo: 안녕하세요!"));
    assert!(transcript.contains("오류:"));
    assert_eq!(transcript.matches(&"=".repeat(40)).count(), 3);

    Ok(())
}

#[tokio::test]
async fn test_all_turns_succeed() -> Result<()> {
    let provider = Arc::new(EchoProvider {
        fail_on: "never-matches".to_string(),
        seen: Arc::new(Mutex::new(Vec::new())),
    });
    let config = Config::new(ModelConfig::new("unused"));
    let session = build_session_with_provider(&config, provider)?;

    let prompts = vec!["첫 번째".to_string(), "두 번째".to_string()];
    let mut out = Vec::new();
    let report = run_batch(&session, &prompts, &mut out).await?;

    assert!(report.is_success());
    assert_eq!(report.total(), 2);
    Ok(())
}
