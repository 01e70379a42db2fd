//! Ordered rewrite rules turning framework-generated markup into canonical
//! semantic nodes.
//!
//! The rule table is fixed and non-reorderable: later rules depend on the
//! canonical shape earlier rules produce (the header-id rule must run inside
//! already-retagged accordion callouts, decorative vectors must be dropped
//! before plain vectors are counted for extraction, and the figure fold must
//! run before its caption sweep).

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::dom::{self, DomNode, Element};
use crate::persist::{write_atomic, PersistError};

const CHIP: &[&str] = &["MuiBox-root", "mui-1vu004u"];
const CALLOUT_INFO: &[&str] = &["MuiBox-root", "mui-1ygn9bx"];
const CALLOUT_TIP: &[&str] = &["MuiBox-root", "mui-1147lff"];
const CALLOUT_WARNING_A: &[&str] = &["MuiBox-root", "mui-o9fqh4"];
const CALLOUT_WARNING_B: &[&str] = &["MuiBox-root", "mui-8d9r5j"];
const CAPTION_ITEM: &[&str] = &["MuiGrid-root", "MuiGrid-item", "mui-1wxaqej"];
const PROBLEM_BOX: &[&str] = &["MuiBox-root", "mui-1fz7ihe"];
const BODY_TYPOGRAPHY: &[&str] = &["MuiTypography-root", "MuiTypography-body1", "mui-1p1f0ag"];
const CHALLENGE_TYPOGRAPHY: &[&str] = &["MuiTypography-root", "MuiTypography-body1", "mui-1quhbks"];
const FIGURE_GRID: &[&str] = &["MuiGrid-root", "MuiGrid-container", "mui-14m0w29"];
const FIGURE_CAPTION: &[&str] = &["MuiGrid-root", "MuiGrid-item", "mui-jkubns"];

const ACCORDION_BAD: &[&str] = &[
    "MuiPaper-root",
    "MuiPaper-elevation",
    "MuiPaper-rounded",
    "MuiPaper-elevation0",
    "MuiAccordion-root",
    "MuiAccordion-rounded",
    "MuiAccordion-gutters",
    "mui-ifi55z",
];
const ACCORDION_GOOD: &[&str] = &[
    "MuiPaper-root",
    "MuiPaper-elevation",
    "MuiPaper-rounded",
    "MuiPaper-elevation0",
    "MuiAccordion-root",
    "MuiAccordion-rounded",
    "MuiAccordion-gutters",
    "mui-nhbct3",
];
const ACCORDION_GREAT: &[&str] = &[
    "MuiPaper-root",
    "MuiPaper-elevation",
    "MuiPaper-rounded",
    "MuiPaper-elevation0",
    "MuiAccordion-root",
    "MuiAccordion-rounded",
    "MuiAccordion-gutters",
    "mui-11r69q9",
];

/// Marker class on the accordion header element -> solution kind.
const HEADER_MARKERS: &[(&str, &str)] = &[
    ("mui-1ev8i4f", "solution-bad"),
    ("mui-guv1gb", "solution-good"),
    ("mui-3ujfba", "solution-great"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// Tag name plus exact class-set equality.
    ClassSet {
        tag: &'static str,
        classes: &'static [&'static str],
    },
    /// Any element with this tag name.
    Tag(&'static str),
    /// Element identifier match.
    Id(&'static str),
    /// `svg` carrying any class, or the `data-slot="icon"` role marker.
    DecorativeVector,
    /// `svg` with no class at all.
    PlainVector,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Replace the tag, set the class set to `class` (or empty), drop all
    /// other attributes; children are kept.
    Retag {
        tag: &'static str,
        class: Option<&'static str>,
    },
    /// Like `Retag`, but the class is chosen by the element's own marker
    /// class via `markers`.
    RetagByMarker {
        tag: &'static str,
        markers: &'static [(&'static str, &'static str)],
    },
    /// Remove the element and its entire subtree.
    Decompose,
    /// Write the vector element to a side file and replace it with an image
    /// reference. The only action with filesystem side effects.
    ExtractVector,
    /// Fold an object + caption grid into a single image node.
    MergeCaption,
}

/// One entry of the fixed rewrite sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewriteRule {
    pub matcher: Matcher,
    pub action: Action,
}

const fn rule(matcher: Matcher, action: Action) -> RewriteRule {
    RewriteRule { matcher, action }
}

/// The fixed, ordered rule table. Document order within each rule,
/// depth-first top-to-bottom across the tree.
pub const REWRITE_RULES: &[RewriteRule] = &[
    // 1. Chip spans become inline code.
    rule(
        Matcher::ClassSet { tag: "span", classes: CHIP },
        Action::Retag { tag: "code", class: None },
    ),
    // 2. Callout boxes. Two distinct class sets both map to "warning":
    //    the framework emits several hashed names for one visual style.
    rule(
        Matcher::ClassSet { tag: "div", classes: CALLOUT_INFO },
        Action::Retag { tag: "blockquote", class: Some("info") },
    ),
    rule(
        Matcher::ClassSet { tag: "div", classes: CALLOUT_TIP },
        Action::Retag { tag: "blockquote", class: Some("tip") },
    ),
    rule(
        Matcher::ClassSet { tag: "div", classes: CALLOUT_WARNING_A },
        Action::Retag { tag: "blockquote", class: Some("warning") },
    ),
    rule(
        Matcher::ClassSet { tag: "div", classes: CALLOUT_WARNING_B },
        Action::Retag { tag: "blockquote", class: Some("warning") },
    ),
    // 3. Decorative caption grid items (duplicate the image alt text) and
    //    interactive buttons are dropped entirely.
    rule(
        Matcher::ClassSet { tag: "div", classes: CAPTION_ITEM },
        Action::Decompose,
    ),
    rule(Matcher::Tag("button"), Action::Decompose),
    // 4. Accordion panels become solution callouts; their header element is
    //    retagged to a heading carrying the matching solution kind.
    rule(
        Matcher::ClassSet { tag: "div", classes: ACCORDION_BAD },
        Action::Retag { tag: "blockquote", class: Some("solution-bad") },
    ),
    rule(
        Matcher::ClassSet { tag: "div", classes: ACCORDION_GOOD },
        Action::Retag { tag: "blockquote", class: Some("solution-good") },
    ),
    rule(
        Matcher::ClassSet { tag: "div", classes: ACCORDION_GREAT },
        Action::Retag { tag: "blockquote", class: Some("solution-great") },
    ),
    rule(
        Matcher::Id("panel1bh-header"),
        Action::RetagByMarker { tag: "h4", markers: HEADER_MARKERS },
    ),
    // 5. Problem statement box.
    rule(
        Matcher::ClassSet { tag: "div", classes: PROBLEM_BOX },
        Action::Retag { tag: "blockquote", class: Some("problem") },
    ),
    // 6. Body typography divs are plain paragraphs.
    rule(
        Matcher::ClassSet { tag: "div", classes: BODY_TYPOGRAPHY },
        Action::Retag { tag: "p", class: None },
    ),
    // 7. Approach/challenge labels render bold.
    rule(
        Matcher::ClassSet { tag: "div", classes: CHALLENGE_TYPOGRAPHY },
        Action::Retag { tag: "strong", class: None },
    ),
    // 8. Decorative icon vectors are dropped before extraction counts.
    rule(Matcher::DecorativeVector, Action::Decompose),
    // 9. Remaining plain vectors are written to side files.
    rule(Matcher::PlainVector, Action::ExtractVector),
    // 10. Object + caption figure grids fold into a single image, then any
    //     figure caption surviving on its own is swept away.
    rule(
        Matcher::ClassSet { tag: "div", classes: FIGURE_GRID },
        Action::MergeCaption,
    ),
    rule(
        Matcher::ClassSet { tag: "div", classes: FIGURE_CAPTION },
        Action::Decompose,
    ),
];

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("failed to write extracted graphic {path}")]
    SideFile {
        path: PathBuf,
        #[source]
        source: PersistError,
    },
}

/// Apply the full rule table to `blocks`, in place. Returns the side files
/// written by vector extraction, in document order.
pub fn normalize(
    blocks: &mut Vec<DomNode>,
    source_path: &Path,
) -> Result<Vec<PathBuf>, NormalizeError> {
    let mut extractor = VectorExtractor::new(source_path);
    for rule in REWRITE_RULES {
        apply_rule(blocks, rule, &mut extractor)?;
    }
    Ok(extractor.written)
}

fn matches(matcher: &Matcher, el: &Element) -> bool {
    match matcher {
        Matcher::ClassSet { tag, classes } => el.tag == *tag && el.class_set_eq(classes),
        Matcher::Tag(tag) => el.tag == *tag,
        Matcher::Id(id) => el.id.as_deref() == Some(*id),
        Matcher::DecorativeVector => {
            el.tag == "svg" && (!el.classes.is_empty() || el.attr("data-slot") == Some("icon"))
        }
        Matcher::PlainVector => el.tag == "svg" && el.classes.is_empty(),
    }
}

fn apply_rule(
    nodes: &mut Vec<DomNode>,
    rule: &RewriteRule,
    extractor: &mut VectorExtractor,
) -> Result<(), NormalizeError> {
    let mut i = 0;
    while i < nodes.len() {
        let is_match = match &nodes[i] {
            DomNode::Element(el) => matches(&rule.matcher, el),
            DomNode::Text(_) => false,
        };

        if !is_match {
            if let DomNode::Element(el) = &mut nodes[i] {
                apply_rule(&mut el.children, rule, extractor)?;
            }
            i += 1;
            continue;
        }

        match rule.action {
            Action::Decompose => {
                nodes.remove(i);
                // Do not advance: the next node shifted into this slot.
            }
            Action::Retag { tag, class } => {
                if let DomNode::Element(el) = &mut nodes[i] {
                    retag(el, tag, class);
                    apply_rule(&mut el.children, rule, extractor)?;
                }
                i += 1;
            }
            Action::RetagByMarker { tag, markers } => {
                if let DomNode::Element(el) = &mut nodes[i] {
                    let kind = markers
                        .iter()
                        .find(|(marker, _)| el.has_class(marker))
                        .map(|(_, kind)| *kind);
                    retag(el, tag, kind);
                    apply_rule(&mut el.children, rule, extractor)?;
                }
                i += 1;
            }
            Action::ExtractVector => {
                if let DomNode::Element(el) = &mut nodes[i] {
                    let image = extractor.extract(el)?;
                    nodes[i] = DomNode::Element(image);
                }
                i += 1;
            }
            Action::MergeCaption => {
                let folded = nodes[i].as_element().and_then(fold_figure);
                match folded {
                    Some(image) => nodes[i] = DomNode::Element(image),
                    None => {
                        // Grid without the expected shape: leave it, but
                        // keep rewriting inside it.
                        if let DomNode::Element(el) = &mut nodes[i] {
                            apply_rule(&mut el.children, rule, extractor)?;
                        }
                    }
                }
                i += 1;
            }
        }
    }
    Ok(())
}

fn retag(el: &mut Element, tag: &str, class: Option<&str>) {
    el.tag = tag.to_string();
    el.classes.clear();
    if let Some(class) = class {
        el.classes.insert(class.to_string());
    }
    el.id = None;
    el.attrs.clear();
}

/// Fold a figure grid whose element children are exactly an `object` embed
/// and a caption item into one image node.
fn fold_figure(el: &Element) -> Option<Element> {
    let kids: Vec<&Element> = el.child_elements().collect();
    if kids.len() != 2 {
        return None;
    }
    let object = kids.iter().find(|k| k.tag == "object")?;
    let caption = kids.iter().find(|k| k.class_set_eq(FIGURE_CAPTION))?;
    let src = object.attr("data")?;

    let mut image = Element::new("img");
    image.attrs.insert("src".to_string(), src.to_string());
    image
        .attrs
        .insert("alt".to_string(), caption.text().trim().to_string());
    Some(image)
}

struct VectorExtractor {
    dir: PathBuf,
    stem: String,
    next_index: usize,
    written: Vec<PathBuf>,
}

impl VectorExtractor {
    fn new(source_path: &Path) -> Self {
        let dir = source_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let stem = source_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        Self {
            dir,
            stem,
            next_index: 1,
            written: Vec::new(),
        }
    }

    /// Write the vector's canonical markup to `{stem}_{NN}.svg` and return
    /// the image node that replaces it. The index is 1-based document order,
    /// assigned to every plain vector whether or not dimensions were
    /// inferred, so reruns on unchanged input produce identical names.
    fn extract(&mut self, el: &mut Element) -> Result<Element, NormalizeError> {
        ensure_dimensions(el);

        let filename = format!("{}_{:02}.svg", self.stem, self.next_index);
        self.next_index += 1;

        let path = self.dir.join(&filename);
        write_atomic(&path, &dom::to_markup(el)).map_err(|source| NormalizeError::SideFile {
            path: path.clone(),
            source,
        })?;
        self.written.push(path);

        let mut image = Element::new("img");
        image.attrs.insert("src".to_string(), filename);
        Ok(image)
    }
}

/// Derive missing width/height from the 3rd and 4th viewBox fields.
fn ensure_dimensions(el: &mut Element) {
    if el.attrs.contains_key("width") && el.attrs.contains_key("height") {
        return;
    }
    // The HTML parser preserves the adjusted `viewBox` casing for foreign
    // content, but tolerate the all-lowercase form as well.
    let view_box = el
        .attr("viewBox")
        .or_else(|| el.attr("viewbox"))
        .unwrap_or("0 0 0 0")
        .to_string();
    let fields: Vec<&str> = view_box.split(' ').collect();
    let width = fields.get(2).copied().unwrap_or("0").to_string();
    let height = fields.get(3).copied().unwrap_or("0").to_string();

    if !el.attrs.contains_key("width") {
        el.attrs.insert("width".to_string(), width);
    }
    if !el.attrs.contains_key("height") {
        el.attrs.insert("height".to_string(), height);
    }
}
