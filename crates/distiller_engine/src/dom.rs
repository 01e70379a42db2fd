use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

/// One node of the owned document tree the normalizer rewrites.
///
/// The tree is built once from the parsed HTML and is exclusively owned by
/// its document, so rewrite passes can mutate it freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomNode {
    Element(Element),
    Text(String),
}

impl DomNode {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            DomNode::Element(el) => Some(el),
            DomNode::Text(_) => None,
        }
    }
}

/// An element with its styling markers split out of the attribute map.
///
/// Classes live in an ordered set and attributes in a `BTreeMap` so that
/// matching and serialization never depend on hash iteration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub tag: String,
    pub classes: BTreeSet<String>,
    pub id: Option<String>,
    pub attrs: BTreeMap<String, String>,
    pub children: Vec<DomNode>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    /// True when the element's class set equals `classes` exactly.
    pub fn class_set_eq(&self, classes: &[&str]) -> bool {
        self.classes.len() == classes.len()
            && classes.iter().all(|c| self.classes.contains(*c))
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Concatenated text of all descendant text nodes, in document order.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Child elements only, skipping interleaved text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(DomNode::as_element)
    }
}

fn collect_text(nodes: &[DomNode], out: &mut String) {
    for node in nodes {
        match node {
            DomNode::Text(text) => out.push_str(text),
            DomNode::Element(el) => collect_text(&el.children, out),
        }
    }
}

/// Parse a full HTML document and return the `<body>` children as an owned
/// tree. Returns an empty vector when the document has no body content.
pub fn parse_body(html: &str) -> Vec<DomNode> {
    let doc = Html::parse_document(html);
    let body_sel = Selector::parse("body").ok();

    let Some(body) = body_sel.as_ref().and_then(|sel| doc.select(sel).next()) else {
        return Vec::new();
    };

    body.children().filter_map(from_node).collect()
}

fn from_node(node: NodeRef<'_, Node>) -> Option<DomNode> {
    match node.value() {
        Node::Text(text) => Some(DomNode::Text(text.to_string())),
        Node::Element(_) => ElementRef::wrap(node).map(|el| DomNode::Element(from_element(el))),
        _ => None,
    }
}

fn from_element(element: ElementRef<'_>) -> Element {
    let value = element.value();
    let mut classes = BTreeSet::new();
    for class in value.classes() {
        classes.insert(class.to_string());
    }

    let mut id = None;
    let mut attrs = BTreeMap::new();
    for (name, val) in value.attrs() {
        match name {
            "class" => {}
            "id" => id = Some(val.to_string()),
            _ => {
                attrs.insert(name.to_string(), val.to_string());
            }
        }
    }

    Element {
        tag: value.name().to_ascii_lowercase(),
        classes,
        id,
        attrs,
        children: element.children().filter_map(from_node).collect(),
    }
}

/// Depth-first search for the first element satisfying `pred`, including
/// `root` itself.
pub fn find_element<'a>(
    root: &'a Element,
    pred: &dyn Fn(&Element) -> bool,
) -> Option<&'a Element> {
    if pred(root) {
        return Some(root);
    }
    for child in root.child_elements() {
        if let Some(found) = find_element(child, pred) {
            return Some(found);
        }
    }
    None
}

/// Serialize an element back to markup in canonical form: lowercase tag,
/// attributes in sorted order, classes space-joined. Byte-identical input
/// trees always produce byte-identical markup.
pub fn to_markup(el: &Element) -> String {
    let mut out = String::new();
    write_markup(el, &mut out);
    out
}

fn write_markup(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.tag);
    if !el.classes.is_empty() {
        let joined: Vec<&str> = el.classes.iter().map(String::as_str).collect();
        let _ = write!(out, " class=\"{}\"", escape_attr(&joined.join(" ")));
    }
    if let Some(id) = &el.id {
        let _ = write!(out, " id=\"{}\"", escape_attr(id));
    }
    for (name, value) in &el.attrs {
        let _ = write!(out, " {}=\"{}\"", name, escape_attr(value));
    }
    out.push('>');
    for child in &el.children {
        match child {
            DomNode::Text(text) => out.push_str(&escape_text(text)),
            DomNode::Element(child_el) => write_markup(child_el, out),
        }
    }
    let _ = write!(out, "</{}>", el.tag);
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
