// ABOUTME: Renders exported pages as Markdown with YAML frontmatter
// ABOUTME: Also synthesizes a body for docs that carry inline content blocks

use crate::model::Document;
use chrono::{DateTime, SecondsFormat, Utc};

/// Body written when a page or doc has no content.
pub const NO_CONTENT: &str = "*No content*";

/// Escapes a value for a double-quoted YAML scalar.
fn yaml_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

pub fn frontmatter(title: &str, exported_at: DateTime<Utc>) -> String {
    format!(
        "---\ntitle: {}\nexported_at: \"{}\"\n---\n\n",
        yaml_quoted(title),
        exported_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

pub fn render_markdown(title: &str, content: &str, exported_at: DateTime<Utc>) -> String {
    let body = if content.is_empty() { NO_CONTENT } else { content };
    format!("{}{}", frontmatter(title, exported_at), body)
}

/// Joins a doc's markdown (or untyped string) blocks with blank lines.
pub fn doc_inline_content(doc: &Document) -> String {
    doc.content_blocks()
        .iter()
        .filter(|block| block.is_markdown())
        .map(|block| block.text())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixed_time() -> DateTime<Utc> {
        "2025-03-14T09:26:53.589Z".parse().unwrap()
    }

    #[test]
    fn test_render_markdown_with_content() {
        let md = render_markdown("Intro", "# Welcome\n\nHello.", fixed_time());
        insta::assert_snapshot!(md, @r#"
        ---
        title: "Intro"
        exported_at: "2025-03-14T09:26:53.589Z"
        ---

        # Welcome

        Hello.
        "#);
    }

    #[test]
    fn test_render_markdown_placeholder() {
        let md = render_markdown("Empty", "", fixed_time());
        assert!(md.ends_with("---\n\n*No content*"));
    }

    #[test]
    fn test_frontmatter_escapes_title() {
        let fm = frontmatter(r#"The "Best" C:\Path"#, fixed_time());
        assert!(fm.contains(r#"title: "The \"Best\" C:\\Path""#));

        #[derive(serde::Deserialize)]
        struct Parsed {
            title: String,
            exported_at: String,
        }

        let yaml = fm.trim_start_matches("---\n").split("\n---\n").next().unwrap();
        let parsed: Parsed = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(parsed.title, r#"The "Best" C:\Path"#);
        assert_eq!(parsed.exported_at, "2025-03-14T09:26:53.589Z");
    }

    #[test]
    fn test_doc_inline_content_filters_blocks() {
        let doc: Document = serde_json::from_value(json!({
            "id": "d1",
            "name": "Notes",
            "content": [
                {"type": "markdown", "content": "Hello"},
                {"type": "other", "content": {"skip": true}},
                {"content": "World"}
            ]
        }))
        .unwrap();

        assert_eq!(doc_inline_content(&doc), "Hello\n\nWorld");
    }

    #[test]
    fn test_doc_inline_content_skips_typed_non_markdown_block() {
        let doc: Document = serde_json::from_value(json!({
            "id": "d1",
            "content": [
                {"type": "markdown", "content": "Hello"},
                {"type": "other", "content": "skip"}
            ]
        }))
        .unwrap();

        assert_eq!(doc_inline_content(&doc), "Hello");
    }

    #[test]
    fn test_doc_inline_content_absent() {
        let doc: Document = serde_json::from_value(json!({"id": "d1"})).unwrap();
        assert_eq!(doc_inline_content(&doc), "");
    }
}
