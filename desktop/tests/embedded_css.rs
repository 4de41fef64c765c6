#![cfg(test)]
//! The desktop build inlines the shared theme from `ui/assets/theme/main.css`;
//! a truncated or moved file would only show up at runtime otherwise.
//!
//! If you intentionally rename or relocate the theme, update both this test and the
//! `include_str!` constant in `desktop/src/main.rs`.

const EMBEDDED_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

#[test]
fn embedded_css_file_exists_and_is_not_empty() {
    assert!(
        !EMBEDDED_CSS.trim().is_empty(),
        "Embedded CSS file appears to be empty. If this is intentional, remove the test."
    );
}

#[test]
fn embedded_css_contains_expected_tokens() {
    // Quick sanity tokens that should exist in our theme.
    let required = [
        "--color-bg",
        ".dropzone",
        "body {",
        ".button--primary",
    ];
    for token in required {
        assert!(
            EMBEDDED_CSS.contains(token),
            "Expected token `{token}` missing from embedded CSS"
        );
    }
}
