//! Markup neutralization for model-authored text
//!
//! Rationale, required actions and citations may be rendered by a caller's
//! UI. Text containing markup or script patterns is rewritten so it
//! displays literally; clean text is returned untouched.

use crate::review::ProposedDecision;
use regex::Regex;
use std::sync::LazyLock;

/// Any of these marks the text as carrying markup
static INJECTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // opening or closing tag
        r"(?i)<\s*/?\s*[a-z][a-z0-9-]*(?:\s[^>]*)?/?\s*>",
        // script-bearing URL schemes
        r"(?i)\b(?:javascript|vbscript)\s*:",
        r"(?i)\bdata\s*:\s*text/html",
        // inline event handler attribute
        r#"(?i)\bon[a-z]+\s*=\s*["'`]"#,
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid injection pattern"))
    .collect()
});

/// Elements whose content is dropped entirely rather than escaped
static DANGEROUS_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)<\s*script\b.*?(?:<\s*/\s*script\s*>|\z)|<\s*style\b.*?(?:<\s*/\s*style\s*>|\z)|<\s*iframe\b.*?(?:<\s*/\s*iframe\s*>|\z)",
    )
    .expect("valid block pattern")
});

static SCRIPT_SCHEME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:javascript|vbscript)\s*:|\bdata\s*:\s*text/html[^\s,]*,?")
        .expect("valid scheme pattern")
});

/// Sanitized text and whether anything changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitized {
    pub text: String,
    pub modified: bool,
}

/// Whether `text` contains a markup or script pattern
pub fn contains_markup(text: &str) -> bool {
    INJECTION_PATTERNS.iter().any(|re| re.is_match(text))
}

/// Neutralize markup in `text`.
///
/// Script, style and iframe blocks are removed, script URL schemes are
/// stripped, and the remainder is HTML-escaped.
///
/// ```
/// use review_domain::response::sanitize_text;
///
/// let clean = sanitize_text("Deploy window is 02:00 UTC");
/// assert!(!clean.modified);
///
/// let dirty = sanitize_text("Looks fine <script>alert(1)</script><b>ok</b>");
/// assert!(dirty.modified);
/// assert_eq!(dirty.text, "Looks fine &lt;b&gt;ok&lt;/b&gt;");
/// ```
pub fn sanitize_text(text: &str) -> Sanitized {
    if !contains_markup(text) {
        return Sanitized {
            text: text.to_string(),
            modified: false,
        };
    }

    let without_blocks = DANGEROUS_BLOCK.replace_all(text, "");
    let without_schemes = SCRIPT_SCHEME.replace_all(&without_blocks, "");
    Sanitized {
        text: escape_html(&without_schemes),
        modified: true,
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Sanitize every free-text field of `decision` in place.
///
/// Returns the names of the fields that were rewritten.
pub fn sanitize_decision(decision: &mut ProposedDecision) -> Vec<&'static str> {
    let mut modified = Vec::new();

    let rationale = sanitize_text(&decision.rationale);
    if rationale.modified {
        decision.rationale = rationale.text;
        modified.push("rationale");
    }

    if sanitize_all(&mut decision.required_actions) {
        modified.push("required_actions");
    }
    if sanitize_all(&mut decision.citations) {
        modified.push("citations");
    }

    modified
}

fn sanitize_all(items: &mut [String]) -> bool {
    let mut any = false;
    for item in items.iter_mut() {
        let sanitized = sanitize_text(item);
        if sanitized.modified {
            *item = sanitized.text;
            any = true;
        }
    }
    any
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_untouched() {
        for text in [
            "Complies with change policy section 4",
            "Risk is low & rollback is documented",
            "Use a < b comparisons carefully",
            "Onboarding = done; ratio 3:1",
        ] {
            let result = sanitize_text(text);
            assert!(!result.modified, "{text}");
            assert_eq!(result.text, text);
        }
    }

    #[test]
    fn test_script_block_removed() {
        let result = sanitize_text("ok<script type=\"text/javascript\">steal()</script> done");
        assert!(result.modified);
        assert_eq!(result.text, "ok done");
    }

    #[test]
    fn test_unterminated_script_removed() {
        let result = sanitize_text("before <script>never closed");
        assert_eq!(result.text, "before ");
    }

    #[test]
    fn test_tags_escaped() {
        let result = sanitize_text("<img src=x onerror=\"alert(1)\">");
        assert!(result.modified);
        assert!(!result.text.contains('<'));
        assert!(!result.text.contains('"'));
    }

    #[test]
    fn test_javascript_scheme_stripped() {
        let result = sanitize_text("see javascript:alert(document.cookie)");
        assert!(result.modified);
        assert!(!result.text.to_lowercase().contains("javascript:"));
        assert_eq!(result.text, "see alert(document.cookie)");
    }

    #[test]
    fn test_event_handler_detected() {
        assert!(contains_markup(r#"x onclick='run()'"#));
        assert!(!contains_markup("onboarding required"));
    }

    #[test]
    fn test_sanitize_is_stable_on_output() {
        let once = sanitize_text("<b>bold</b> & <i>it</i>");
        let twice = sanitize_text(&once.text);
        assert!(!twice.modified);
        assert_eq!(twice.text, once.text);
    }

    #[test]
    fn test_sanitize_decision_reports_fields() {
        let mut decision = ProposedDecision::reject(
            "Missing <b>owner</b>",
            vec!["Add owner".to_string(), "<script>x</script>Add tests".to_string()],
        );
        decision.citations = vec!["doc:1#chunk:1".to_string()];

        let fields = sanitize_decision(&mut decision);
        assert_eq!(fields, vec!["rationale", "required_actions"]);
        assert_eq!(decision.rationale, "Missing &lt;b&gt;owner&lt;/b&gt;");
        assert_eq!(decision.required_actions, vec!["Add owner", "Add tests"]);
        assert_eq!(decision.citations, vec!["doc:1#chunk:1"]);
    }
}
