use once_cell::sync::Lazy;
use regex::Regex;

use crate::entities::submission::ContactField;

static SCRIPT_BLOCKS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
        .expect("script block pattern is valid")
});

static MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("markup pattern is valid"));

/// Removes angle-bracket markup and trims surrounding whitespace.
///
/// Script and style elements are dropped together with their contents. Any
/// `<` left in the output has no closing `>` after it, so no tag survives.
pub fn strip_markup(input: &str) -> String {
    let without_blocks = SCRIPT_BLOCKS.replace_all(input, "");
    MARKUP.replace_all(&without_blocks, "").trim().to_string()
}

/// Truncates to at most `max_chars` characters, never splitting a code point.
pub fn truncate_chars(input: String, max_chars: usize) -> String {
    match input.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => input[..byte_idx].to_string(),
        None => input,
    }
}

/// Sanitizes one form field. Empty results collapse to `None`.
pub fn sanitize_field(field: ContactField, value: Option<&str>) -> Option<String> {
    let cleaned = truncate_chars(strip_markup(value?), field.max_len());
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_script_content() {
        assert_eq!(strip_markup("<script>x</script>hello"), "hello");
        assert_eq!(strip_markup("  <b>bold</b> text  "), "bold text");
        assert_eq!(strip_markup("<STYLE type=\"text/css\">p{}</STYLE>ok"), "ok");
    }

    #[test]
    fn leaves_no_markup_behind() {
        let inputs = [
            "<<b>script>alert(1)</script>",
            "<scr<b>ipt>x",
            "a < b > c",
            "<img src=x onerror=alert(1)>hi",
            "1 < 2",
        ];
        let markup = Regex::new(r"<[^>]*>").unwrap();
        for input in inputs {
            let out = strip_markup(input);
            assert!(!markup.is_match(&out), "markup left in {:?}", out);
        }
    }

    #[test]
    fn lone_angle_bracket_is_kept() {
        assert_eq!(strip_markup("1 < 2"), "1 < 2");
    }

    #[test]
    fn truncates_to_exact_field_limit() {
        for field in ContactField::ALL {
            let long = "x".repeat(field.max_len() + 50);
            let out = sanitize_field(field, Some(&long)).unwrap();
            assert_eq!(out.chars().count(), field.max_len());
        }
    }

    #[test]
    fn markup_input_respects_limit() {
        let input = format!("<p>{}</p>", "y".repeat(300));
        let out = sanitize_field(ContactField::Name, Some(&input)).unwrap();
        assert!(!out.contains('<'));
        assert!(out.chars().count() <= ContactField::Name.max_len());
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let out = truncate_chars("héllo wörld".to_string(), 2);
        assert_eq!(out, "hé");
    }

    #[test]
    fn empty_after_sanitizing_is_none() {
        assert_eq!(sanitize_field(ContactField::Message, Some("  <br/>  ")), None);
        assert_eq!(sanitize_field(ContactField::Message, None), None);
    }
}
