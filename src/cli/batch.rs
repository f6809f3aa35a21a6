// Batch driver
//
// Runs prompts one after another. Each turn is isolated: a failure is
// reported and the next prompt still runs.

use std::io::Write;
use tracing::error;

use crate::chat::{ChatSession, TurnOutcome};

/// Prompts run when none are given on the command line
pub const SAMPLE_PROMPTS: [&str; 4] = [
    "김철수 정보 알려줘",
    "이영희는 어느 팀이야?",
    "홍길동 정보 알려줘",
    "안녕하세요!",
];

/// Tally of a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub succeeded: usize,
    pub failed: Vec<(String, String)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed.len()
    }
}

fn separator() -> String {
    format!("\n{}\n", "=".repeat(40))
}

/// Run every prompt through `session`, writing the transcript to `out`
pub async fn run_batch<W: Write>(
    session: &ChatSession,
    prompts: &[String],
    out: &mut W,
) -> std::io::Result<BatchReport> {
    let mut report = BatchReport::default();

    for (idx, prompt) in prompts.iter().enumerate() {
        if idx > 0 {
            writeln!(out, "{}", separator())?;
        }

        writeln!(out, "사용자: {}", prompt)?;

        match session.run_turn(prompt).await {
            Ok(outcome) => {
                render_outcome(&outcome, out)?;
                report.succeeded += 1;
            }
            Err(e) => {
                error!(prompt = %prompt, "Turn failed: {:#}", e);
                writeln!(out, "오류: 이 질문을 처리하지 못했습니다 ({})", e)?;
                report.failed.push((prompt.clone(), format!("{:#}", e)));
            }
        }
    }

    Ok(report)
}

/// Console transcript of one finished turn
pub fn render_outcome<W: Write>(outcome: &TurnOutcome, out: &mut W) -> std::io::Result<()> {
    match outcome {
        TurnOutcome::Direct { text } => {
            writeln!(out, "ChatGPT: {}", text)?;
        }
        TurnOutcome::ToolAssisted {
            tool_use,
            result,
            ignored_calls,
            text,
        } => {
            writeln!(out, "ChatGPT가 도구 사용을 요청했습니다")?;
            writeln!(out, "   함수: {}", tool_use.name)?;
            writeln!(out, "   인수: {}", tool_use.input)?;
            if *ignored_calls > 0 {
                writeln!(out, "   (추가 요청 {}건은 실행하지 않았습니다)", ignored_calls)?;
            }
            writeln!(out, "   결과: {}", result.content)?;
            writeln!(out, "ChatGPT: {}", text)?;
        }
    }
    Ok(())
}
