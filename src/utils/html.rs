use ammonia;

/// Clean HTML content using the ammonia library.
///
/// Instructor-authored text (module descriptions, questions, choices) is
/// rendered to anonymous students, so it is sanitized once before storage:
/// safe tags like <b> or <p> survive, <script>, <iframe> and event handler
/// attributes are stripped.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}

/// Same as [`clean_html`] for optional fields.
pub fn clean_optional_html(input: Option<&str>) -> Option<String> {
    input.map(clean_html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_html_strips_script() {
        let cleaned = clean_html("<b>2 + 2</b><script>alert(1)</script>");
        assert_eq!(cleaned, "<b>2 + 2</b>");
    }

    #[test]
    fn test_clean_optional_html_keeps_none() {
        assert_eq!(clean_optional_html(None), None);
    }
}
