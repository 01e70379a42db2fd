use distiller_engine::detect_language;
use pretty_assertions::assert_eq;

#[test]
fn ladder_rules_map_to_fixed_tags() {
    assert_eq!(detect_language("def foo(): pass"), "python");
    assert_eq!(detect_language("function add(a, b) { return a + b; }"), "javascript");
    assert_eq!(detect_language("SELECT id FROM users;"), "sql");
    assert_eq!(detect_language("{\n  \"key\": 1\n}"), "json");
}

#[test]
fn earlier_rules_win_over_later_ones() {
    // Contains both "def " and "SELECT "; the python rule runs first.
    assert_eq!(
        detect_language("def query():\n    run('SELECT 1')"),
        "python"
    );
    // Lowercase select does not trigger the sql rule.
    assert_eq!(detect_language("select * from t"), "");
}

#[test]
fn first_line_guess_covers_shebangs() {
    assert!(!detect_language("#!/usr/bin/env python3\nprint(1)").is_empty());
}

#[test]
fn undetectable_code_yields_empty_tag() {
    assert_eq!(detect_language("qwerty asdf zxcv"), "");
    assert_eq!(detect_language(""), "");
}
