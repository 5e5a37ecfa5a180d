use gha_relay_core::CiProviderError;

/// Truncates `text` to at most `max_chars` characters, appending an ellipsis when cut.
pub fn truncate_for_error(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let mut truncated = trimmed.chars().take(max_chars).collect::<String>();
    truncated.push_str("...");
    truncated
}

pub(crate) fn transport_error(operation: &str, error: &reqwest::Error) -> CiProviderError {
    if error.is_timeout() {
        return CiProviderError::timeout(format!("github api {operation} timed out"));
    }
    CiProviderError::request(format!("github api {operation} request failed: {error}"))
}

pub(crate) fn status_error(
    operation: &str,
    resource: impl FnOnce() -> String,
    status: u16,
    body: &str,
) -> CiProviderError {
    if status == 404 {
        return CiProviderError::NotFound {
            resource: resource(),
        };
    }
    CiProviderError::request(format!(
        "github api {operation} failed with status {status}: {}",
        truncate_for_error(body, 800)
    ))
}
