use regex::Regex;
use std::sync::OnceLock;

/// Raw text captured from one fenced block plus its declared kind tag.
///
/// Identity is `(kind, text)`: a change in either yields a different payload, which downstream
/// components treat as a fresh block rather than an update.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiagramPayload {
    kind: String,
    text: String,
}

impl DiagramPayload {
    pub fn new(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            text: text.into(),
        }
    }

    /// Builds a payload from a fence info string (` ```plot-function title=... `) and the raw
    /// block body. One trailing newline is stripped from the body.
    pub fn from_fence(info: &str, inner: &str) -> Self {
        let text = inner.strip_suffix('\n').unwrap_or(inner);
        let text = text.strip_suffix('\r').unwrap_or(text);
        Self::new(fence_tag(info), text)
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

fn fence_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(?:language-)?([\w-]+)").expect("fence tag regex"))
}

/// Extracts the language tag from a fence info string; empty when none is declared.
pub fn fence_tag(info: &str) -> String {
    fence_tag_re()
        .captures(info)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_fence_strips_single_trailing_newline() {
        let p = DiagramPayload::from_fence("plot-function", "{\"fn\":\"x\"}\n\n");
        assert_eq!(p.kind(), "plot-function");
        assert_eq!(p.text(), "{\"fn\":\"x\"}\n");
    }

    #[test]
    fn fence_tag_handles_class_prefix_and_attributes() {
        assert_eq!(fence_tag("language-plot-force"), "plot-force");
        assert_eq!(fence_tag("plot-function {title=x}"), "plot-function");
        assert_eq!(fence_tag(""), "");
        assert_eq!(fence_tag("   "), "");
    }

    #[test]
    fn identity_covers_kind_and_text() {
        let a = DiagramPayload::new("plot-function", "{}");
        let b = DiagramPayload::new("plot-force", "{}");
        assert_ne!(a, b);
        assert_eq!(a, DiagramPayload::new("plot-function", "{}"));
    }
}
