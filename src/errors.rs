// User-friendly error messages
//
// Turns configuration and connectivity failures into messages that tell the
// user what to change. Headings follow the LANG environment variable
// (Korean or English).

fn get_locale() -> &'static str {
    match std::env::var("LANG") {
        Ok(lang) if lang.starts_with("ko") => "ko",
        _ => "en",
    }
}

/// Localized heading text
fn t(key: &str) -> &'static str {
    match (get_locale(), key) {
        ("ko", "try") => "해결 방법:",
        ("ko", "suggestion") => "제안:",
        ("ko", "possible_causes") => "가능한 원인:",
        ("ko", "error") => "오류:",

        (_, "try") => "Try:",
        (_, "suggestion") => "Suggestion:",
        (_, "possible_causes") => "Possible causes:",
        _ => "Error:",
    }
}

/// Format a missing API key error
pub fn api_key_missing_error(provider: &str) -> String {
    format!(
        "{} API key is missing\n\n\
        \x1b[1;33m{}\x1b[0m\n\
        • OPENAI_API_KEY is not set in the environment or .env\n\
        • [model] api_key is missing from ~/.staffcall/config.toml\n\n\
        \x1b[1;32m{}\x1b[0m\n\
        1. Export the key:\n\
           \x1b[36mexport OPENAI_API_KEY=\"sk-...\"\x1b[0m\n\n\
        2. Or add it to a .env file in the working directory",
        provider,
        t("possible_causes"),
        t("try")
    )
}

/// Format a config parse error
pub fn config_parse_error(path: &str, error: &str) -> String {
    format!(
        "Failed to parse config file {}\n\n\
        \x1b[1;33m{}\x1b[0m {}\n\n\
        \x1b[1;32m{}\x1b[0m\n\
        • Check for missing quotes around strings\n\
        • Check for unclosed [section] headers\n\
        • lookup must be one of \"mock\", \"fallback\", \"remote\"",
        path,
        t("error"),
        error,
        t("try")
    )
}

/// Format a remote directory configuration error
pub fn remote_directory_missing_error(policy: &str) -> String {
    format!(
        "Lookup policy '{}' needs a remote employee directory\n\n\
        \x1b[1;32m{}\x1b[0m\n\
        1. Set both variables:\n\
           \x1b[36mexport SUPABASE_URL=\"https://<project>.supabase.co\"\x1b[0m\n\
           \x1b[36mexport SUPABASE_KEY=\"<anon key>\"\x1b[0m\n\n\
        2. Or run with the in-memory table:\n\
           \x1b[36mstaffcall --lookup mock\x1b[0m",
        policy,
        t("try")
    )
}

/// Format a remote directory connectivity error
pub fn remote_directory_unreachable_error(location: &str, cause: &str) -> String {
    format!(
        "Could not reach the employee directory at {}\n\n\
        \x1b[1;33m{}\x1b[0m {}\n\n\
        \x1b[1;33m{}\x1b[0m\n\
        • SUPABASE_URL points at the wrong project\n\
        • SUPABASE_KEY is expired or lacks read access to the table\n\
        • The network is down or the request timed out\n\n\
        \x1b[1;32m{}\x1b[0m\n\
        1. Check the project URL and key in the Supabase dashboard\n\n\
        2. Or run with the in-memory table:\n\
           \x1b[36mstaffcall --lookup mock\x1b[0m",
        location,
        t("error"),
        cause,
        t("possible_causes"),
        t("try")
    )
}
