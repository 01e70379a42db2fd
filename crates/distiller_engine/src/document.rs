use std::path::{Path, PathBuf};

use crate::decode::decode_source;
use crate::dom::{self, DomNode, Element};
use crate::hash::content_hash;
use crate::types::ConvertError;

const AUTHOR_CLASS: &str = "mui-ltrqv0";
const DIFFICULTY_CLASS: &str = "mui-su24yt";

/// A parsed source document.
///
/// The first element child of the body is the masthead: it carries the
/// required title heading and the optional author/difficulty markers, and
/// is excluded from the rendered body. The remaining element children are
/// the content blocks handed to the normalizer.
#[derive(Debug)]
pub struct Document {
    pub source_path: PathBuf,
    pub content_hash: String,
    pub title: String,
    pub author: Option<String>,
    pub difficulty: Option<String>,
    pub blocks: Vec<DomNode>,
}

impl Document {
    pub fn parse(source_path: &Path, raw: &[u8]) -> Result<Self, ConvertError> {
        let hash = content_hash(raw);
        let decoded = decode_source(raw)?;

        let mut children: Vec<DomNode> = dom::parse_body(&decoded.text)
            .into_iter()
            .filter(|node| node.as_element().is_some())
            .collect();
        if children.is_empty() {
            return Err(ConvertError::EmptyDocument);
        }

        let masthead = match children.remove(0) {
            DomNode::Element(el) => el,
            DomNode::Text(_) => return Err(ConvertError::EmptyDocument),
        };

        // The title anchors the document's identity; a missing heading is
        // fatal rather than silently emitting a placeholder.
        let title = dom::find_element(&masthead, &|el| el.tag == "h1")
            .map(|el| el.text().trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConvertError::MissingTitle)?;

        Ok(Self {
            source_path: source_path.to_path_buf(),
            content_hash: hash,
            title,
            author: marker_text(&masthead, AUTHOR_CLASS),
            difficulty: marker_text(&masthead, DIFFICULTY_CLASS),
            blocks: children,
        })
    }
}

fn marker_text(root: &Element, class: &str) -> Option<String> {
    dom::find_element(root, &|el| el.has_class(class))
        .map(|el| el.text().trim().to_string())
        .filter(|t| !t.is_empty())
}
