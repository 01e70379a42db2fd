use std::path::PathBuf;

use distiller_engine::{
    callout_prefix, parse_body, serialize_document, AlertDialect, CalloutDialect, Document,
    NativeDialect, SerializeOptions, CALLOUT_PREFIXES,
};
use pretty_assertions::assert_eq;

fn doc_with_blocks(html: &str) -> Document {
    Document {
        source_path: PathBuf::from("doc.html"),
        content_hash: "0".repeat(64),
        title: "Sample".to_string(),
        author: None,
        difficulty: None,
        blocks: parse_body(html),
    }
}

#[test]
fn header_uses_setext_underline_of_title_length() {
    let doc = doc_with_blocks("<html><body><p>Body</p></body></html>");
    let text = serialize_document(&doc, &NativeDialect, &SerializeOptions::default());
    assert!(text.starts_with("Sample\n======\n"), "{text}");
    assert!(text.contains("\nBody\n"));
}

#[test]
fn metadata_block_renders_author_and_uppercased_level() {
    let mut doc = doc_with_blocks("<html><body><p>Body</p></body></html>");
    doc.author = Some("Jane Doe".to_string());
    doc.difficulty = Some("medium".to_string());
    let text = serialize_document(&doc, &NativeDialect, &SerializeOptions::default());
    assert!(
        text.contains("```\nAuthor: Jane Doe\nLevel : MEDIUM\n```"),
        "{text}"
    );
}

#[test]
fn native_dialect_renders_fenced_callout() {
    let doc = doc_with_blocks(
        r#"<html><body><blockquote class="tip"><p>Use hashing.</p></blockquote></body></html>"#,
    );
    let text = serialize_document(&doc, &NativeDialect, &SerializeOptions::default());
    assert!(text.contains(":::tip\nUse hashing.\n:::"), "{text}");
}

#[test]
fn alert_dialect_prefix_table_is_total() {
    let expected = [
        ("info", "NOTE"),
        ("tip", "TIP"),
        ("warning", "CAUTION"),
        ("solution-bad", "WARNING"),
        ("solution-good", "IMPORTANT"),
        ("solution-great", "IMPORTANT"),
    ];
    assert_eq!(CALLOUT_PREFIXES, &expected);
    for (kind, prefix) in expected {
        assert_eq!(callout_prefix(kind), prefix);
        let rendered = AlertDialect.render_callout(kind, "Body");
        assert_eq!(rendered, format!("> [!{prefix}]\n> Body"));
    }
    // Unrecognized kinds degrade to an empty prefix, never an error.
    assert_eq!(callout_prefix("problem"), "");
    assert_eq!(AlertDialect.render_callout("problem", "Body"), ">\n> Body");
    assert_eq!(callout_prefix("mystery"), "");
}

#[test]
fn alert_dialect_prefixes_every_body_line() {
    let rendered = AlertDialect.render_callout("info", "One\n\nTwo");
    assert_eq!(rendered, "> [!NOTE]\n> One\n>\n> Two");
}

#[test]
fn code_blocks_are_fenced_with_detected_language() {
    let doc = doc_with_blocks(
        "<html><body><pre><code>def foo(): pass</code></pre></body></html>",
    );
    let text = serialize_document(&doc, &NativeDialect, &SerializeOptions::default());
    assert!(text.contains("```python\ndef foo(): pass\n```"), "{text}");
}

#[test]
fn dialect_code_override_takes_precedence() {
    struct IndentedCode;
    impl CalloutDialect for IndentedCode {
        fn render_callout(&self, kind: &str, body: &str) -> String {
            format!(":::{kind}\n{body}\n:::")
        }
        fn render_code(&self, _lang: &str, code: &str) -> Option<String> {
            Some(
                code.lines()
                    .map(|l| format!("    {l}"))
                    .collect::<Vec<_>>()
                    .join("\n"),
            )
        }
    }
    let doc = doc_with_blocks("<html><body><pre>def foo(): pass</pre></body></html>");
    let text = serialize_document(&doc, &IndentedCode, &SerializeOptions::default());
    assert!(text.contains("    def foo(): pass"), "{text}");
    assert!(!text.contains("```"), "{text}");
}

#[test]
fn root_relative_images_become_absolute() {
    let doc = doc_with_blocks(
        r#"<html><body><img src="/img/cache.png" alt="Cache layout"></body></html>"#,
    );
    let options = SerializeOptions {
        site_origin: "https://docs.example.com".to_string(),
    };
    let text = serialize_document(&doc, &NativeDialect, &options);
    assert!(
        text.contains("![Cache layout](https://docs.example.com/img/cache.png)"),
        "{text}"
    );

    // Already-relative sources pass through untouched.
    let doc = doc_with_blocks(r#"<html><body><img src="doc_01.svg"></body></html>"#);
    let text = serialize_document(&doc, &NativeDialect, &options);
    assert!(text.contains("![](doc_01.svg)"), "{text}");
}

#[test]
fn generic_rendering_covers_inline_and_lists() {
    let doc = doc_with_blocks(
        r#"<html><body>
            <h2>Tradeoffs</h2>
            <p>Prefer <strong>simple</strong> and <em>boring</em> <code>GET /v1</code> <a href="/faq">designs</a>.</p>
            <ul><li>One</li><li>Two<ul><li>Nested</li></ul></li></ul>
            <ol><li>First</li><li>Second</li></ol>
            <table><thead><tr><th>Key</th><th>Value</th></tr></thead>
                   <tbody><tr><td>a</td><td>1</td></tr></tbody></table>
        </body></html>"#,
    );
    let text = serialize_document(&doc, &NativeDialect, &SerializeOptions::default());
    assert!(text.contains("## Tradeoffs"), "{text}");
    assert!(
        text.contains("Prefer **simple** and *boring* `GET /v1` [designs](/faq)."),
        "{text}"
    );
    assert!(text.contains("- One\n- Two\n  - Nested"), "{text}");
    assert!(text.contains("1. First\n2. Second"), "{text}");
    assert!(text.contains("| Key | Value |\n| --- | --- |\n| a | 1 |"), "{text}");
}
