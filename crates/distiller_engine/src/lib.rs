//! Distiller engine: normalization, serialization, and incremental batch
//! conversion of framework-generated HTML into portable markdown.
mod batch;
mod decode;
mod detect;
mod document;
mod dom;
mod hash;
mod persist;
mod rules;
mod serialize;
mod types;

pub use batch::{convert_corpus, convert_document, BatchOptions};
pub use decode::{decode_source, DecodeError, DecodedSource};
pub use detect::detect_language;
pub use document::Document;
pub use dom::{find_element, parse_body, to_markup, DomNode, Element};
pub use hash::{content_hash, hash_marker, is_stale, marker_current};
pub use persist::{write_atomic, PersistError};
pub use rules::{normalize, Action, Matcher, NormalizeError, RewriteRule, REWRITE_RULES};
pub use serialize::{
    callout_prefix, serialize_document, AlertDialect, CalloutDialect, NativeDialect,
    SerializeOptions, CALLOUT_PREFIXES,
};
pub use types::{BatchSummary, ConvertError, DocFailure, DocStatus, Stage};
