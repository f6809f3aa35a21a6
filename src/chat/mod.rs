// Turn orchestration
//
// One turn: ask the model with tools offered; if it requests a tool, run the
// first requested call, then ask again with the result appended and no tools
// offered. Nothing is carried from one turn to the next.

use anyhow::{Context, Result};
use std::fmt;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::providers::{LlmProvider, Message, ProviderRequest, ToolChoice};
use crate::tools::{ToolExecutor, ToolResult, ToolUse};

/// Where a turn currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    AwaitingModel,
    ExecutingTool,
    AwaitingFinal,
    Done,
}

impl fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TurnPhase::AwaitingModel => "awaiting_model",
            TurnPhase::ExecutingTool => "executing_tool",
            TurnPhase::AwaitingFinal => "awaiting_final",
            TurnPhase::Done => "done",
        };
        f.write_str(s)
    }
}

/// What a completed turn produced
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The model answered without calling a tool
    Direct { text: String },
    /// The model called a tool and then answered
    ToolAssisted {
        tool_use: ToolUse,
        result: ToolResult,
        /// Extra tool calls in the same response that were not executed
        ignored_calls: usize,
        text: String,
    },
}

impl TurnOutcome {
    /// Final answer text shown to the user
    pub fn text(&self) -> &str {
        match self {
            TurnOutcome::Direct { text } | TurnOutcome::ToolAssisted { text, .. } => text,
        }
    }

    pub fn used_tool(&self) -> bool {
        matches!(self, TurnOutcome::ToolAssisted { .. })
    }
}

/// Orchestrates turns against a provider and a tool executor
pub struct ChatSession {
    provider: Arc<dyn LlmProvider>,
    executor: ToolExecutor,
    model: String,
    max_tokens: u32,
}

impl ChatSession {
    pub fn new(provider: Arc<dyn LlmProvider>, executor: ToolExecutor, model: impl Into<String>) -> Self {
        Self {
            provider,
            executor,
            model: model.into(),
            max_tokens: 1024,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn executor(&self) -> &ToolExecutor {
        &self.executor
    }

    /// Run one user message to a final answer
    ///
    /// Provider failures are returned as errors; tool failures are handed to
    /// the model as failure results.
    #[instrument(skip_all, fields(turn_id = %uuid::Uuid::new_v4()))]
    pub async fn run_turn(&self, user_message: &str) -> Result<TurnOutcome> {
        let mut phase = TurnPhase::AwaitingModel;
        info!(%phase, "Sending user message");

        let request = self
            .request(vec![Message::user(user_message)])
            .with_tools(self.executor.registry().definitions())
            .with_tool_choice(ToolChoice::Auto);

        let response = self
            .provider
            .send_message(&request)
            .await
            .context("Initial model request failed")?;

        let mut tool_uses = response.tool_uses().into_iter();
        let Some(tool_use) = tool_uses.next() else {
            phase = TurnPhase::Done;
            info!(%phase, "Model answered without tools");
            return Ok(TurnOutcome::Direct {
                text: response.text(),
            });
        };

        let ignored_calls = tool_uses.count();
        if ignored_calls > 0 {
            warn!(ignored_calls, "Model requested several tool calls; only the first is executed");
        }

        phase = TurnPhase::ExecutingTool;
        info!(%phase, tool = %tool_use.name, "Model requested a tool");
        let result = self.executor.execute_tool(&tool_use).await;

        phase = TurnPhase::AwaitingFinal;
        info!(%phase, is_error = result.is_error, "Sending tool result");
        let text = self.finalize(user_message, &tool_use, &result).await?;

        phase = TurnPhase::Done;
        info!(%phase, "Turn complete");

        Ok(TurnOutcome::ToolAssisted {
            tool_use,
            result,
            ignored_calls,
            text,
        })
    }

    /// Second model call: user → assistant tool request → tool result, no tools offered
    async fn finalize(&self, user_message: &str, tool_use: &ToolUse, result: &ToolResult) -> Result<String> {
        let request = self.request(vec![
            Message::user(user_message),
            Message::assistant_tool_use(tool_use),
            Message::tool_result(result),
        ]);

        let response = self
            .provider
            .send_message(&request)
            .await
            .context("Final model request failed")?;

        if response.has_tool_uses() {
            warn!("Model requested another tool after the result; ignoring");
        }

        Ok(response.text())
    }

    fn request(&self, messages: Vec<Message>) -> ProviderRequest {
        ProviderRequest::new(messages)
            .with_model(self.model.clone())
            .with_max_tokens(self.max_tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{ContentBlock, ProviderResponse};
    use crate::tools::{Tool, ToolInputSchema, ToolRegistry};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    /// Replays queued responses and records every request
    struct ScriptedProvider {
        responses: Mutex<Vec<ProviderResponse>>,
        requests: Mutex<Vec<ProviderRequest>>,
    }

    impl ScriptedProvider {
        fn new(mut responses: Vec<ProviderResponse>) -> Self {
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
            self.requests.lock().await.push(request.clone());
            self.responses
                .lock()
                .await
                .pop()
                .ok_or_else(|| anyhow::anyhow!("no scripted response left"))
        }

        fn name(&self) -> &str {
            "scripted"
        }

        fn default_model(&self) -> &str {
            "test-model"
        }
    }

    struct CountingTool {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Tool for CountingTool {
        fn name(&self) -> &str {
            "get_user_info"
        }

        fn description(&self) -> &str {
            "counts calls"
        }

        fn input_schema(&self) -> ToolInputSchema {
            ToolInputSchema::simple(&[("name", "name")])
        }

        async fn execute(&self, input: Value) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(json!({"success": true, "data": {"name": input["name"]}}))
        }
    }

    fn reply(content: Vec<ContentBlock>) -> ProviderResponse {
        ProviderResponse {
            id: "r".to_string(),
            model: "test-model".to_string(),
            content,
            stop_reason: None,
            role: "assistant".to_string(),
            provider: "scripted".to_string(),
        }
    }

    fn call(id: &str, name: &str) -> ContentBlock {
        ContentBlock::ToolUse {
            id: id.to_string(),
            name: "get_user_info".to_string(),
            input: json!({"name": name}),
        }
    }

    fn session(provider: Arc<ScriptedProvider>) -> (ChatSession, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = ToolRegistry::new();
        registry
            .register(Box::new(CountingTool { calls: calls.clone() }))
            .unwrap();
        (ChatSession::new(provider, ToolExecutor::new(registry), "gpt-4o"), calls)
    }

    #[tokio::test]
    async fn test_direct_answer_skips_executor() {
        let provider = Arc::new(ScriptedProvider::new(vec![reply(vec![ContentBlock::Text {
            text: "안녕하세요! 무엇을 도와드릴까요?".to_string(),
        }])]));
        let (session, calls) = session(provider.clone());

        let outcome = session.run_turn("안녕하세요!").await.unwrap();

        assert_eq!(
            outcome,
            TurnOutcome::Direct {
                text: "안녕하세요! 무엇을 도와드릴까요?".to_string()
            }
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let requests = provider.requests.lock().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].tool_choice, ToolChoice::Auto);
        assert_eq!(requests[0].tools.as_ref().unwrap()[0].name, "get_user_info");
    }

    #[tokio::test]
    async fn test_tool_turn_builds_three_message_follow_up() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            reply(vec![call("call_1", "김철수")]),
            reply(vec![ContentBlock::Text {
                text: "김철수님은 개발팀입니다.".to_string(),
            }]),
        ]));
        let (session, calls) = session(provider.clone());

        let outcome = session.run_turn("김철수 정보 알려줘").await.unwrap();
        assert_eq!(outcome.text(), "김철수님은 개발팀입니다.");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let requests = provider.requests.lock().await;
        let follow_up = &requests[1];
        assert!(follow_up.tools.is_none());
        assert_eq!(follow_up.messages.len(), 3);
        assert_eq!(follow_up.messages[0], Message::user("김철수 정보 알려줘"));
        assert_eq!(follow_up.messages[1].role, "assistant");
        assert_eq!(follow_up.messages[2].role, "tool");
        match &follow_up.messages[2].content[0] {
            ContentBlock::ToolResult { tool_use_id, content, .. } => {
                assert_eq!(tool_use_id, "call_1");
                assert!(content.contains("김철수"));
            }
            other => panic!("unexpected block: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_only_first_tool_call_runs() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            reply(vec![call("call_1", "김철수"), call("call_2", "이영희")]),
            reply(vec![ContentBlock::Text { text: "done".to_string() }]),
        ]));
        let (session, calls) = session(provider);

        match session.run_turn("둘 다 알려줘").await.unwrap() {
            TurnOutcome::ToolAssisted {
                tool_use,
                ignored_calls,
                ..
            } => {
                assert_eq!(tool_use.id, "call_1");
                assert_eq!(ignored_calls, 1);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let (session, calls) = session(provider);

        let err = session.run_turn("김철수 정보 알려줘").await.unwrap_err();
        assert!(err.to_string().contains("Initial model request failed"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(TurnPhase::ExecutingTool.to_string(), "executing_tool");
    }
}
