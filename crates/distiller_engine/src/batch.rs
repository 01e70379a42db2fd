use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use engine_logging::{engine_debug, engine_info, engine_warn};

use crate::document::Document;
use crate::hash::{content_hash, hash_marker, marker_current};
use crate::persist::write_atomic;
use crate::rules::normalize;
use crate::serialize::{serialize_document, CalloutDialect, SerializeOptions};
use crate::types::{BatchSummary, ConvertError, DocFailure, DocStatus, Stage};

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub source_extension: String,
    pub output_extension: String,
    pub serialize: SerializeOptions,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            source_extension: "html".to_string(),
            output_extension: "md".to_string(),
            serialize: SerializeOptions::default(),
        }
    }
}

/// Convert every source under `root`, recursively, in sorted path order.
///
/// Each document's failure is isolated: the batch continues past failing
/// documents and reports all of them together in the summary.
pub fn convert_corpus(
    root: &Path,
    dialect: &dyn CalloutDialect,
    options: &BatchOptions,
) -> io::Result<BatchSummary> {
    let mut sources = Vec::new();
    collect_sources(root, &options.source_extension, &mut sources)?;
    sources.sort();

    let mut summary = BatchSummary::default();
    for source in sources {
        engine_debug!("{}: {:?}", source.display(), Stage::Discovered);
        match convert_document(&source, dialect, options) {
            Ok(DocStatus::Skipped) => {
                engine_debug!("{}: {:?}", source.display(), Stage::Skipped);
                summary.skipped += 1;
            }
            Ok(DocStatus::Written { output, side_files }) => {
                engine_info!(
                    "{}: {:?} -> {} ({side_files} side files)",
                    source.display(),
                    Stage::Written,
                    output.display()
                );
                summary.written += 1;
            }
            Err(error) => {
                engine_warn!("{}: {:?}: {error}", source.display(), Stage::Failed);
                summary.failures.push(DocFailure { source, error });
            }
        }
    }
    Ok(summary)
}

/// Convert one source document, honoring the hash marker in any existing
/// output. Side files are written during normalization, before the
/// document's own output.
pub fn convert_document(
    source: &Path,
    dialect: &dyn CalloutDialect,
    options: &BatchOptions,
) -> Result<DocStatus, ConvertError> {
    let raw = fs::read(source)?;
    let marker = hash_marker(&content_hash(&raw));
    let output = source.with_extension(&options.output_extension);

    if marker_current(&output, &marker)? {
        return Ok(DocStatus::Skipped);
    }

    let mut doc = Document::parse(source, &raw)?;

    engine_debug!("{}: {:?}", source.display(), Stage::Normalizing);
    let side_files = normalize(&mut doc.blocks, source)?;

    engine_debug!("{}: {:?}", source.display(), Stage::Serializing);
    let body = serialize_document(&doc, dialect, &options.serialize);

    let text = format!("{marker}\n{body}");
    write_atomic(&output, &text).map_err(|err| ConvertError::Output {
        path: output.clone(),
        source: err,
    })?;

    Ok(DocStatus::Written {
        output,
        side_files: side_files.len(),
    })
}

fn collect_sources(dir: &Path, extension: &str, out: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_sources(&path, extension, out)?;
        } else if file_type.is_file()
            && path.extension().and_then(|e| e.to_str()) == Some(extension)
        {
            out.push(path);
        }
    }
    Ok(())
}
