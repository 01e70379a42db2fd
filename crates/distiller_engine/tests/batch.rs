use std::fs;
use std::path::Path;

use distiller_engine::{
    content_hash, convert_corpus, convert_document, hash_marker, AlertDialect, BatchOptions,
    ConvertError, DocStatus, NativeDialect,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const SAMPLE: &str = r#"<html><body>
    <div class="masthead">
        <h1>Design a URL Shortener</h1>
        <div class="mui-ltrqv0">Jane Doe</div>
        <div class="mui-su24yt">medium</div>
    </div>
    <p>Shorten links with a hashed key.</p>
    <svg viewBox="0 0 10 10"><circle cx="5" cy="5" r="4"></circle></svg>
    <div class="MuiBox-root mui-1147lff"><p>Use consistent hashing.</p></div>
    <pre><code>def foo(): pass</code></pre>
</body></html>"#;

fn write_sample(dir: &Path, name: &str) {
    fs::write(dir.join(name), SAMPLE).unwrap();
}

#[test]
fn converts_a_document_end_to_end() {
    engine_logging::initialize_for_tests();
    let temp = TempDir::new().unwrap();
    write_sample(temp.path(), "guide.html");

    let summary = convert_corpus(temp.path(), &NativeDialect, &BatchOptions::default()).unwrap();
    assert_eq!(summary.written, 1);
    assert_eq!(summary.skipped, 0);
    assert!(summary.is_clean());

    let output = fs::read_to_string(temp.path().join("guide.md")).unwrap();
    let marker = hash_marker(&content_hash(SAMPLE.as_bytes()));
    let mut lines = output.lines();
    assert_eq!(lines.next(), Some(marker.as_str()));
    assert_eq!(lines.next(), Some("Design a URL Shortener"));
    assert_eq!(
        lines.next().map(str::len),
        Some("Design a URL Shortener".len())
    );

    assert!(output.contains("Author: Jane Doe"), "{output}");
    assert!(output.contains("Level : MEDIUM"), "{output}");
    assert!(output.contains("![](guide_01.svg)"), "{output}");
    assert!(output.contains(":::tip\nUse consistent hashing.\n:::"), "{output}");
    assert!(output.contains("```python\ndef foo(): pass\n```"), "{output}");

    let svg = fs::read_to_string(temp.path().join("guide_01.svg")).unwrap();
    assert!(svg.contains(r#"width="10""#), "{svg}");
    assert!(svg.contains(r#"height="10""#), "{svg}");
}

#[test]
fn second_run_performs_zero_writes() {
    engine_logging::initialize_for_tests();
    let temp = TempDir::new().unwrap();
    write_sample(temp.path(), "guide.html");
    let options = BatchOptions::default();

    let first = convert_corpus(temp.path(), &NativeDialect, &options).unwrap();
    assert_eq!(first.written, 1);
    let output_bytes = fs::read(temp.path().join("guide.md")).unwrap();

    let second = convert_corpus(temp.path(), &NativeDialect, &options).unwrap();
    assert_eq!(second.written, 0);
    assert_eq!(second.skipped, 1);
    assert_eq!(fs::read(temp.path().join("guide.md")).unwrap(), output_bytes);
}

#[test]
fn content_edit_forces_reprocessing() {
    let temp = TempDir::new().unwrap();
    write_sample(temp.path(), "guide.html");
    let options = BatchOptions::default();

    convert_corpus(temp.path(), &NativeDialect, &options).unwrap();
    fs::write(
        temp.path().join("guide.html"),
        SAMPLE.replace("hashed key", "random key"),
    )
    .unwrap();

    let summary = convert_corpus(temp.path(), &NativeDialect, &options).unwrap();
    assert_eq!(summary.written, 1);
    assert_eq!(summary.skipped, 0);
}

#[test]
fn batch_continues_past_failing_documents() {
    let temp = TempDir::new().unwrap();
    let nested = temp.path().join("chapter");
    fs::create_dir(&nested).unwrap();
    write_sample(&nested, "good.html");
    fs::write(
        nested.join("bad.html"),
        "<html><body><div><p>No heading here</p></div></body></html>",
    )
    .unwrap();

    let summary = convert_corpus(temp.path(), &NativeDialect, &BatchOptions::default()).unwrap();
    assert_eq!(summary.written, 1);
    assert_eq!(summary.failures.len(), 1);
    let failure = &summary.failures[0];
    assert!(failure.source.ends_with("chapter/bad.html"));
    assert!(matches!(failure.error, ConvertError::MissingTitle));
    assert!(nested.join("good.md").exists());
    assert!(!nested.join("bad.md").exists());
}

#[test]
fn alert_dialect_renders_blockquote_callouts() {
    let temp = TempDir::new().unwrap();
    write_sample(temp.path(), "guide.html");

    let status = convert_document(
        &temp.path().join("guide.html"),
        &AlertDialect,
        &BatchOptions::default(),
    )
    .unwrap();
    assert!(matches!(status, DocStatus::Written { .. }));

    let output = fs::read_to_string(temp.path().join("guide.md")).unwrap();
    assert!(output.contains("> [!TIP]\n> Use consistent hashing."), "{output}");
}

#[test]
fn non_source_files_are_ignored() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("notes.txt"), "not html").unwrap();
    let summary = convert_corpus(temp.path(), &NativeDialect, &BatchOptions::default()).unwrap();
    assert_eq!(summary.written + summary.skipped, 0);
    assert!(summary.is_clean());
}
