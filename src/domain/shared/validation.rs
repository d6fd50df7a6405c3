use regex::Regex;
use std::sync::OnceLock;

/// Trim `value` and check it has between 1 and `max_chars` characters
pub fn required_text(field: &str, value: &str, max_chars: usize) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{} cannot be empty", field));
    }
    if trimmed.chars().count() > max_chars {
        return Err(format!("{} must be {} characters or less", field, max_chars));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional value; blank input becomes `None`
pub fn optional_text(field: &str, value: Option<&str>, max_chars: usize) -> Result<Option<String>, String> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) if v.chars().count() > max_chars => Err(format!(
            "{} must be {} characters or less",
            field, max_chars
        )),
        Some(v) => Ok(Some(v.to_string())),
    }
}

fn whitespace_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern compiles"))
}

/// Collapse whitespace runs and cut to `max_chars` on a char boundary
pub fn normalize_for_synthesis(text: &str, max_chars: usize) -> String {
    let collapsed = whitespace_pattern().replace_all(text.trim(), " ");
    match collapsed.char_indices().nth(max_chars) {
        Some((byte_index, _)) => collapsed[..byte_index].trim_end().to_string(),
        None => collapsed.into_owned(),
    }
}
