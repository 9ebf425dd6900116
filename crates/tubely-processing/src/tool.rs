//! Validation of external tool paths taken from configuration.

/// Reject tool paths containing shell metacharacters or directory traversal.
pub fn validate_tool_path(path: &str) -> Result<(), String> {
    if path.trim().is_empty() {
        return Err("Tool path is empty".to_string());
    }

    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(format!("Path contains dangerous characters: {}", path));
    }

    if path.contains("..") {
        return Err(format!("Path contains directory traversal: {}", path));
    }

    if !path
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '/' | '-' | '_' | '.' | '\\' | ':'))
    {
        return Err(format!("Path contains unsafe characters: {}", path));
    }

    Ok(())
}
