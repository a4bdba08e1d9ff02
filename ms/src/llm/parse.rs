//! Text fallbacks for models that answer in prose instead of calling the tool

/// Remove a surrounding markdown code fence, if present
pub fn strip_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    if !(trimmed.starts_with("```") && trimmed.ends_with("```") && trimmed.len() >= 6) {
        return trimmed.to_string();
    }

    let mut out = String::new();
    for line in trimmed.lines().skip(1) {
        if line.trim() == "```" {
            break;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim().to_string()
}

/// Find the first balanced `{...}` block, ignoring braces inside strings
pub fn extract_first_json_object(raw: &str) -> Option<&str> {
    let mut start = None;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in raw.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => {
                if depth == 0 {
                    start = Some(idx);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0
                    && let Some(begin) = start
                {
                    return Some(&raw[begin..=idx]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fences_removes_language_tag() {
        let raw = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_fences(raw), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_fences_leaves_plain_text() {
        assert_eq!(strip_fences("  hello  "), "hello");
    }

    #[test]
    fn test_extract_skips_braces_in_strings() {
        let raw = r#"Here you go: {"name": "a {weird} dish", "x": {"y": 1}} trailing }"#;
        assert_eq!(
            extract_first_json_object(raw),
            Some(r#"{"name": "a {weird} dish", "x": {"y": 1}}"#)
        );
    }

    #[test]
    fn test_extract_handles_escaped_quotes() {
        let raw = r#"{"q": "say \"}\" now"}"#;
        assert_eq!(extract_first_json_object(raw), Some(raw));
    }

    #[test]
    fn test_extract_none_when_unbalanced() {
        assert_eq!(extract_first_json_object("{\"a\": 1"), None);
        assert_eq!(extract_first_json_object("no json"), None);
    }
}
