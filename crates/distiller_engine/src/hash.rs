use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use sha2::{Digest, Sha256};

/// Hex SHA-256 digest of the raw source bytes.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(64);
    for byte in digest.iter() {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}

/// The marker embedded as the first line of every written output file.
pub fn hash_marker(hash: &str) -> String {
    format!("<!-- {hash} -->")
}

/// A source is stale iff no output exists, or the output's first line does
/// not equal the marker for the freshly computed source hash. Modification
/// times are never consulted: touching or copying a file without a content
/// change never triggers reprocessing, and any single-byte edit always does.
pub fn is_stale(source: &Path, output: &Path) -> io::Result<bool> {
    let raw = std::fs::read(source)?;
    let marker = hash_marker(&content_hash(&raw));
    Ok(!marker_current(output, &marker)?)
}

/// True when `output` exists and its first line equals `marker`.
pub fn marker_current(output: &Path, marker: &str) -> io::Result<bool> {
    let file = match File::open(output) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };
    let mut first_line = String::new();
    BufReader::new(file).read_line(&mut first_line)?;
    Ok(first_line.trim_end_matches(['\r', '\n']) == marker)
}
