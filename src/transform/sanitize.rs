//! Manifest sanitization
//!
//! Some manifests in the wild carry content the resolver chokes on. The
//! staged copy gets template placeholders, escaped spaces, and comment
//! lines neutralized. This transform is one-directional; the staged
//! manifest is discarded after the run.

use regex::Regex;
use std::sync::LazyLock;

static TEMPLATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\{[^\}]*?\}\}").unwrap());
static ESCAPED_SPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\\\\ )|(\\ )").unwrap());
static COMMENT_LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s*//.*").unwrap());

/// Returns manifest content with resolver-hostile constructs neutralized
pub fn sanitize_manifest_content(content: &str) -> String {
    let content = TEMPLATE_RE.replace_all(content, "something");
    // A backslash-space is unescaped unless the backslash is itself escaped
    let content = ESCAPED_SPACE_RE.replace_all(&content, |caps: &regex::Captures| {
        if caps.get(1).is_some() {
            caps[0].to_string()
        } else {
            " ".to_string()
        }
    });
    let content = COMMENT_LINE_RE.replace_all(&content, " ");
    content.to_string()
}
