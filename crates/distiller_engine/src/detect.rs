use std::sync::LazyLock;

use syntect::parsing::SyntaxSet;

/// Default syntax corpus, loaded once.
static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

/// Heuristic language tag for a literal code block.
///
/// Ladder, first match wins. An empty result is a valid outcome and still
/// produces a fenced block with no language tag; this never fails.
pub fn detect_language(code: &str) -> String {
    if code.contains("def ") {
        return "python".to_string();
    }
    if code.contains("function ") {
        return "javascript".to_string();
    }
    if code.contains("SELECT ") {
        return "sql".to_string();
    }
    let trimmed = code.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return "json".to_string();
    }

    // Fall back to a first-line lexical guess against the syntax corpus
    // (shebangs, XML prologs, mode lines). Report the syntax's primary
    // file extension as the tag.
    let first_line = trimmed.lines().next().unwrap_or("");
    match SYNTAXES.find_syntax_by_first_line(first_line) {
        Some(syntax) if syntax.name != "Plain Text" => syntax
            .file_extensions
            .first()
            .cloned()
            .unwrap_or_else(|| syntax.name.to_ascii_lowercase()),
        _ => String::new(),
    }
}
