//! Depth-first markdown rendering of the normalized tree.
//!
//! Callout rendering (and optionally code rendering) is pluggable per
//! dialect; everything else uses the shared generic rendering below.

use url::Url;

use crate::detect::detect_language;
use crate::document::Document;
use crate::dom::{DomNode, Element};

/// Callout kind -> generic-host alert prefix. Pure lookup data; kinds
/// outside the table render with an empty prefix, never an error.
pub const CALLOUT_PREFIXES: &[(&str, &str)] = &[
    ("info", "NOTE"),
    ("tip", "TIP"),
    ("warning", "CAUTION"),
    ("solution-bad", "WARNING"),
    ("solution-good", "IMPORTANT"),
    ("solution-great", "IMPORTANT"),
];

pub fn callout_prefix(kind: &str) -> &'static str {
    CALLOUT_PREFIXES
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, prefix)| *prefix)
        .unwrap_or("")
}

/// The two-point extension surface of a serialization dialect: callout
/// rendering is required, code rendering may be overridden. All other node
/// kinds share the generic rendering and are not overridable.
pub trait CalloutDialect: Send + Sync {
    fn render_callout(&self, kind: &str, body: &str) -> String;

    /// Return `None` to use the shared fenced-block rendering.
    fn render_code(&self, _lang: &str, _code: &str) -> Option<String> {
        None
    }
}

/// Native-site dialect: custom fenced container blocks.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeDialect;

impl CalloutDialect for NativeDialect {
    fn render_callout(&self, kind: &str, body: &str) -> String {
        format!(":::{kind}\n{body}\n:::")
    }
}

/// Generic-host dialect: blockquote alerts with a bracketed prefix line.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlertDialect;

impl CalloutDialect for AlertDialect {
    fn render_callout(&self, kind: &str, body: &str) -> String {
        let prefix = callout_prefix(kind);
        let mut out = String::new();
        if prefix.is_empty() {
            out.push_str(">\n");
        } else {
            out.push_str("> [!");
            out.push_str(prefix);
            out.push_str("]\n");
        }
        for line in body.lines() {
            if line.is_empty() {
                out.push_str(">\n");
            } else {
                out.push_str("> ");
                out.push_str(line);
                out.push('\n');
            }
        }
        out.trim_end().to_string()
    }
}

#[derive(Debug, Clone)]
pub struct SerializeOptions {
    /// Origin prepended to root-relative image sources.
    pub site_origin: String,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            site_origin: "https://www.hellointerview.com".to_string(),
        }
    }
}

/// Render the whole document: Setext title header, optional fenced metadata
/// block, then each body block followed by a blank line.
pub fn serialize_document(
    doc: &Document,
    dialect: &dyn CalloutDialect,
    options: &SerializeOptions,
) -> String {
    let mut out = String::new();
    out.push_str(&doc.title);
    out.push('\n');
    out.push_str(&"=".repeat(doc.title.chars().count()));
    out.push('\n');

    if doc.author.is_some() || doc.difficulty.is_some() {
        out.push_str("\n```\n");
        if let Some(author) = &doc.author {
            out.push_str("Author: ");
            out.push_str(author);
            out.push('\n');
        }
        if let Some(difficulty) = &doc.difficulty {
            out.push_str("Level : ");
            out.push_str(&difficulty.to_uppercase());
            out.push('\n');
        }
        out.push_str("```\n");
    }

    for block in &doc.blocks {
        let rendered = render_block(block, dialect, options);
        if rendered.trim().is_empty() {
            continue;
        }
        out.push('\n');
        out.push_str(rendered.trim_end());
        out.push('\n');
    }
    out
}

const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "iframe", "template"];

fn render_block(node: &DomNode, dialect: &dyn CalloutDialect, options: &SerializeOptions) -> String {
    let el = match node {
        DomNode::Text(text) => return collapse_whitespace(text),
        DomNode::Element(el) => el,
    };

    match el.tag.as_str() {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = el.tag[1..].parse::<usize>().unwrap_or(1);
            format!("{} {}", "#".repeat(level), render_inline_children(el, options))
        }
        "blockquote" => {
            let kind = el.classes.iter().next().cloned().unwrap_or_default();
            let body = render_child_blocks(el, dialect, options);
            dialect.render_callout(&kind, &body)
        }
        "pre" => {
            let code = raw_text(el);
            let code = code.trim_matches('\n');
            let lang = detect_language(code);
            dialect
                .render_code(&lang, code)
                .unwrap_or_else(|| format!("```{lang}\n{code}\n```"))
        }
        "ul" => render_list(el, false, 0, options),
        "ol" => render_list(el, true, 0, options),
        "table" => render_table(el, options),
        "img" => render_image(el, options),
        "hr" => "---".to_string(),
        tag if SKIPPED_TAGS.contains(&tag) => String::new(),
        "div" | "section" | "article" | "main" | "figure" | "header" | "footer" | "aside" => {
            if has_block_children(el) {
                render_child_blocks(el, dialect, options)
            } else {
                render_inline_children(el, options)
            }
        }
        _ => render_inline_children(el, options),
    }
}

fn render_child_blocks(
    el: &Element,
    dialect: &dyn CalloutDialect,
    options: &SerializeOptions,
) -> String {
    let mut parts = Vec::new();
    for child in &el.children {
        let rendered = render_block(child, dialect, options);
        if !rendered.trim().is_empty() {
            parts.push(rendered.trim_end().to_string());
        }
    }
    parts.join("\n\n")
}

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "main", "figure", "blockquote", "pre", "ul", "ol", "table",
    "img", "hr", "h1", "h2", "h3", "h4", "h5", "h6",
];

fn has_block_children(el: &Element) -> bool {
    el.child_elements()
        .any(|child| BLOCK_TAGS.contains(&child.tag.as_str()))
}

fn render_inline_children(el: &Element, options: &SerializeOptions) -> String {
    let mut writer = InlineWriter::new();
    for child in &el.children {
        write_inline(child, &mut writer, options);
    }
    writer.finish()
}

fn write_inline(node: &DomNode, writer: &mut InlineWriter, options: &SerializeOptions) {
    let el = match node {
        DomNode::Text(text) => {
            writer.push_collapsed(text);
            return;
        }
        DomNode::Element(el) => el,
    };

    match el.tag.as_str() {
        "strong" | "b" => {
            writer.push_raw("**");
            for child in &el.children {
                write_inline(child, writer, options);
            }
            writer.push_raw("**");
        }
        "em" | "i" => {
            writer.push_raw("*");
            for child in &el.children {
                write_inline(child, writer, options);
            }
            writer.push_raw("*");
        }
        "code" => {
            writer.push_raw("`");
            writer.push_raw(raw_text(el).trim());
            writer.push_raw("`");
        }
        "a" => {
            writer.push_raw("[");
            for child in &el.children {
                write_inline(child, writer, options);
            }
            writer.push_raw("](");
            writer.push_raw(el.attr("href").unwrap_or(""));
            writer.push_raw(")");
        }
        "img" => writer.push_raw(&render_image(el, options)),
        "br" => writer.push_raw("\n"),
        tag if SKIPPED_TAGS.contains(&tag) => {}
        _ => {
            for child in &el.children {
                write_inline(child, writer, options);
            }
        }
    }
}

fn render_image(el: &Element, options: &SerializeOptions) -> String {
    let Some(src) = el.attr("src") else {
        return String::new();
    };
    let alt = el.attr("alt").unwrap_or("");
    let src = absolutize(src, &options.site_origin);
    format!("![{alt}]({src})")
}

/// Root-relative sources are rewritten against the configured site origin
/// before emission; everything else passes through untouched.
fn absolutize(src: &str, origin: &str) -> String {
    if !src.starts_with('/') {
        return src.to_string();
    }
    match Url::parse(origin).and_then(|base| base.join(src)) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{}{}", origin.trim_end_matches('/'), src),
    }
}

fn render_list(el: &Element, ordered: bool, depth: usize, options: &SerializeOptions) -> String {
    let indent = "  ".repeat(depth);
    let mut lines = Vec::new();
    let mut number = 1;

    for item in el.child_elements().filter(|c| c.tag == "li") {
        let marker = if ordered {
            format!("{number}. ")
        } else {
            "- ".to_string()
        };

        let mut writer = InlineWriter::new();
        let mut nested = Vec::new();
        for child in &item.children {
            match child.as_element() {
                Some(sub) if sub.tag == "ul" || sub.tag == "ol" => nested.push(sub),
                _ => write_inline(child, &mut writer, options),
            }
        }

        lines.push(format!("{indent}{marker}{}", writer.finish()));
        for sub in nested {
            lines.push(render_list(sub, sub.tag == "ol", depth + 1, options));
        }
        number += 1;
    }
    lines.join("\n")
}

fn render_table(el: &Element, options: &SerializeOptions) -> String {
    let mut rows: Vec<Vec<String>> = Vec::new();
    collect_table_rows(el, options, &mut rows);
    if rows.is_empty() {
        return String::new();
    }

    let mut lines = Vec::new();
    lines.push(format!("| {} |", rows[0].join(" | ")));
    lines.push(format!(
        "| {} |",
        vec!["---"; rows[0].len()].join(" | ")
    ));
    for row in &rows[1..] {
        lines.push(format!("| {} |", row.join(" | ")));
    }
    lines.join("\n")
}

fn collect_table_rows(el: &Element, options: &SerializeOptions, rows: &mut Vec<Vec<String>>) {
    for child in el.child_elements() {
        match child.tag.as_str() {
            "tr" => {
                let cells: Vec<String> = child
                    .child_elements()
                    .filter(|c| c.tag == "td" || c.tag == "th")
                    .map(|c| render_inline_children(c, options))
                    .collect();
                if !cells.is_empty() {
                    rows.push(cells);
                }
            }
            "thead" | "tbody" | "tfoot" => collect_table_rows(child, options, rows),
            _ => {}
        }
    }
}

/// Text of all descendants with whitespace preserved, for code blocks.
fn raw_text(el: &Element) -> String {
    el.text()
}

fn collapse_whitespace(text: &str) -> String {
    let mut writer = InlineWriter::new();
    writer.push_collapsed(text);
    writer.finish()
}

/// Whitespace-collapsing string builder for inline content.
struct InlineWriter {
    buf: String,
    last_was_space: bool,
}

impl InlineWriter {
    fn new() -> Self {
        Self {
            buf: String::new(),
            last_was_space: true,
        }
    }

    fn push_collapsed(&mut self, text: &str) {
        for ch in text.chars() {
            if ch.is_whitespace() {
                if !self.last_was_space {
                    self.buf.push(' ');
                    self.last_was_space = true;
                }
            } else {
                self.buf.push(ch);
                self.last_was_space = false;
            }
        }
    }

    fn push_raw(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.buf.push_str(text);
        self.last_was_space = text.ends_with(char::is_whitespace);
    }

    fn finish(self) -> String {
        self.buf.trim().to_string()
    }
}
