//! Mount-point identifiers for interactive boards.
//!
//! Board libraries look their mount target up by element id, so ids must be unique across all
//! blocks rendered in one process and must not contain separators such as `:`.

use std::fmt;

const PREFIX: &str = "board";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MountId(String);

impl MountId {
    /// A fresh, process-unique id (`board-<32 hex digits>`).
    pub fn generate() -> Self {
        Self(format!("{PREFIX}-{}", uuid::Uuid::new_v4().simple()))
    }

    /// Derives an id from a host-supplied key, stripping reserved characters.
    pub fn from_raw(raw: &str) -> Self {
        Self(sanitize_mount_id(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mount-point flavour of [`sanitize_id`], falling back to `board-`.
pub fn sanitize_mount_id(raw: &str) -> String {
    sanitize_id(raw, PREFIX)
}

/// Reduces `raw` to an element id made of `[A-Za-z0-9_-]` that starts with a letter.
///
/// Other characters become `-`, runs of `-` collapse and leading or trailing `-` are dropped.
/// Ids that would not start with a letter get `<prefix>-` in front; blank input yields
/// `<prefix>-untitled`.
pub fn sanitize_id(raw: &str, prefix: &str) -> String {
    let raw = raw.trim();
    let mut out = String::with_capacity(raw.len() + prefix.len() + 1);
    for ch in raw.chars() {
        let ok = ch.is_ascii_alphanumeric() || ch == '-' || ch == '_';
        out.push(if ok { ch } else { '-' });
    }

    if !out.starts_with(|c: char| c.is_ascii_alphabetic()) {
        out.insert(0, '-');
        out.insert_str(0, prefix);
    }
    while out.contains("--") {
        out = out.replace("--", "-");
    }
    let out = out.trim_matches('-');
    if out.is_empty() || out == prefix {
        return format!("{prefix}-untitled");
    }
    out.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_are_unique_and_clean() {
        let ids: HashSet<MountId> = (0..256).map(|_| MountId::generate()).collect();
        assert_eq!(ids.len(), 256);
        for id in &ids {
            assert!(id.as_str().starts_with("board-"));
            assert!(
                id.as_str()
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-')
            );
        }
    }

    #[test]
    fn sanitize_strips_reserved_separators() {
        assert_eq!(sanitize_mount_id(":r1:"), "board-r1");
        assert_eq!(sanitize_mount_id("jxgbox-:R2a:"), "jxgbox-R2a");
        assert_eq!(sanitize_mount_id("  "), "board-untitled");
        assert_eq!(sanitize_mount_id("a b.c"), "a-b-c");
    }

    #[test]
    fn sanitize_id_uses_the_callers_prefix() {
        assert_eq!(sanitize_id("  ", "fp"), "fp-untitled");
        assert_eq!(sanitize_id("block #3", "fp"), "block-3");
        assert_eq!(sanitize_id("3d", "fp"), "fp-3d");
        assert_eq!(sanitize_id(":r1:", "fp"), "fp-r1");
        assert_eq!(sanitize_id("---", "fp"), "fp-untitled");
    }
}
