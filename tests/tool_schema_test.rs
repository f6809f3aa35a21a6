// Tool declaration and argument handling
//
// The declared schema requires exactly one string field, and arguments the
// model produces for it decode to that field alone.

use serde_json::{json, Value};
use staffcall::directory::{EmployeeLookup, MockDirectory};
use staffcall::tools::{default_registry, ToolExecutor, ToolUse};
use std::sync::Arc;

fn executor() -> ToolExecutor {
    let lookup = Arc::new(EmployeeLookup::mock_only(MockDirectory::sample()));
    ToolExecutor::new(default_registry(lookup).unwrap())
}

#[test]
fn test_declared_schema() {
    let executor = executor();
    let defs = executor.registry().definitions();
    assert_eq!(defs.len(), 1);

    let schema = defs[0].input_schema.to_json();
    assert_eq!(
        schema,
        json!({
            "type": "object",
            "properties": {"name": {"type": "string", "description": "직원 이름"}},
            "required": ["name"]
        })
    );
}

#[test]
fn test_model_arguments_round_trip() {
    // Arguments arrive as a JSON string on the wire
    let wire = json!({"name": "박민수"}).to_string();
    let parsed: Value = serde_json::from_str(&wire).unwrap();

    let fields: Vec<&String> = parsed.as_object().unwrap().keys().collect();
    assert_eq!(fields, vec!["name"]);

    let executor = executor();
    assert!(executor.registry().validate_input("get_user_info", &parsed).is_ok());
}

#[tokio::test]
async fn test_found_name_matches_query_exactly() {
    let executor = executor();
    for name in ["김철수", "이영희", "박민수"] {
        let result = executor
            .execute_tool(&ToolUse::new("get_user_info".to_string(), json!({ "name": name })))
            .await;
        assert!(!result.is_error, "{name} should be found");
        assert_eq!(result.json().unwrap()["data"]["name"], name);
    }
}

#[tokio::test]
async fn test_near_miss_names_are_not_found() {
    let executor = executor();
    for name in ["김철수 ", "김 철수", "홍길동"] {
        let result = executor
            .execute_tool(&ToolUse::new("get_user_info".to_string(), json!({ "name": name })))
            .await;
        assert!(result.is_error, "{name:?} should not match");
        let message = result.json().unwrap()["message"].as_str().unwrap().to_string();
        assert!(message.contains(name));
    }
}

#[tokio::test]
async fn test_unknown_function_is_explicit_failure() {
    let result = executor()
        .execute_tool(&ToolUse::new("get_weather".to_string(), json!({"city": "Seoul"})))
        .await;
    assert!(result.is_error);
    assert_eq!(result.json().unwrap()["message"], "알 수 없는 함수: get_weather");
}

#[tokio::test]
async fn test_wrong_argument_type_is_rejected() {
    let result = executor()
        .execute_tool(&ToolUse::new("get_user_info".to_string(), json!({"name": 3})))
        .await;
    assert!(result.is_error);
    assert!(result.content.contains("잘못된 인수"));
}
