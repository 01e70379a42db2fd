use distiller_engine::decode_source;
use pretty_assertions::assert_eq;

#[test]
fn decode_handles_utf8_bom() {
    let decoded = decode_source(b"\xEF\xBB\xBFhello").unwrap();
    assert_eq!(decoded.text, "hello");
    assert_eq!(decoded.encoding_label, "UTF-8");
}

#[test]
fn decode_sniffs_legacy_encodings() {
    let decoded = decode_source(b"caf\xe9").unwrap(); // iso-8859-1
    assert_eq!(decoded.text, "caf\u{e9}");
    assert!(
        decoded.encoding_label.eq_ignore_ascii_case("ISO-8859-1")
            || decoded.encoding_label.eq_ignore_ascii_case("windows-1252")
    );
}

#[test]
fn decode_passes_plain_utf8_through() {
    let decoded = decode_source("<p>héllo</p>".as_bytes()).unwrap();
    assert_eq!(decoded.text, "<p>héllo</p>");
}
