use serde::Serialize;

/// Runs `log_action` with a pretty-printed copy of `value`, only when DEBUG is on.
pub(crate) fn with_pretty_json_debug<T, F>(value: &T, log_action: F)
where
    T: Serialize,
    F: FnOnce(&str),
{
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }

    let pretty_json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|error| format!("<pretty serialize failed: {error}>"));
    log_action(pretty_json.as_str());
}

/// Masks all but the last four characters, for identifiers that are safe to partially log.
pub fn mask_tail(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.is_empty() {
        return "<unset>".to_string();
    }
    let keep = chars.len().min(4);
    let (hidden, shown) = chars.split_at(chars.len() - keep);
    format!("{}{}", "*".repeat(hidden.len()), shown.iter().collect::<String>())
}
