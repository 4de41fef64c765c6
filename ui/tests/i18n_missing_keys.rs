use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

const EN_US: &str = include_str!("../i18n/en-US/mlcompare-ui.ftl");
const ES_ES: &str = include_str!("../i18n/es-ES/mlcompare-ui.ftl");

/// Every non-fallback locale must define at least the keys of en-US.
///
/// To add a locale, create `ui/i18n/<locale>/mlcompare-ui.ftl`, copy the
/// en-US keys and register the file below.
#[test]
fn all_locales_have_all_fallback_keys() {
    let fallback_keys = extract_keys(EN_US);

    assert!(
        !fallback_keys.is_empty(),
        "Fallback (en-US) contains no keys."
    );
    assert_no_dup_keys(EN_US, "en-US");

    let locales: &[(&str, &str)] = &[("es-ES", ES_ES)];

    let mut failures = Vec::new();

    for (locale, src) in locales {
        assert_no_dup_keys(src, locale);

        let keys = extract_keys(src);
        let missing: BTreeSet<String> = fallback_keys
            .iter()
            .filter(|k| !keys.contains(*k))
            .cloned()
            .collect();

        if !missing.is_empty() {
            failures.push(format!(
                "Locale {locale} is missing {} key(s):\n  {}",
                missing.len(),
                missing.into_iter().collect::<Vec<_>>().join("\n  ")
            ));
        }
    }

    if !failures.is_empty() {
        panic!(
            "Translation completeness check failed:\n\n{}\n\nHint: copy the missing keys from en-US, then translate.",
            failures.join("\n\n")
        );
    }
}

/// Every literal `t!("...")` key used under `src/` exists in en-US.
#[test]
fn every_used_key_is_defined() {
    let defined = extract_keys(EN_US);
    let mut used = BTreeSet::new();
    collect_used_keys(&Path::new(env!("CARGO_MANIFEST_DIR")).join("src"), &mut used);

    assert!(!used.is_empty(), "no t! lookups found under src/");

    let missing: Vec<_> = used.iter().filter(|k| !defined.contains(*k)).collect();
    assert!(
        missing.is_empty(),
        "keys used in source but missing from en-US: {missing:?}"
    );
}

fn collect_used_keys(dir: &Path, out: &mut BTreeSet<String>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_used_keys(&path, out);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            if let Ok(src) = fs::read_to_string(&path) {
                extract_used_keys(&src, out);
            }
        }
    }
}

fn extract_used_keys(src: &str, out: &mut BTreeSet<String>) {
    const OPEN: &str = "t!(\"";
    let mut rest = src;
    while let Some(pos) = rest.find(OPEN) {
        let after = &rest[pos + OPEN.len()..];
        let Some(end) = after.find('"') else {
            break;
        };
        let key = &after[..end];
        // `format!("` also ends in `t!(`; only a standalone `t!` is a lookup.
        let standalone = rest[..pos]
            .chars()
            .last()
            .map_or(true, |c| !(c.is_alphanumeric() || c == '_'));
        if standalone && !key.is_empty() && key.chars().all(|c| matches!(c, 'a'..='z' | '0'..='9' | '-')) {
            out.insert(key.to_string());
        }
        rest = &after[end..];
    }
}

/// Extract message keys from a Fluent file (simple heuristic).
fn extract_keys(src: &str) -> HashSet<String> {
    let mut keys = HashSet::new();

    for line in src.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        // Skip attribute or continuation lines (start with '.' or indent).
        if line.starts_with('.') {
            continue;
        }
        // Basic pattern: key [space]* '='
        if let Some(eq_pos) = line.find('=') {
            let (left, _right) = line.split_at(eq_pos);
            let key = left.trim();
            if !key.is_empty()
                && !key.contains(' ')
                && !key.contains('\t')
                && !key.starts_with('[')
                && !key.starts_with('@')
            {
                keys.insert(key.to_string());
            }
        }
    }

    keys
}

/// Assert no duplicate key definitions in a single FTL file (rudimentary).
fn assert_no_dup_keys(src: &str, locale: &str) {
    let mut seen = HashSet::new();
    let mut dups = BTreeSet::new();

    for line in src.lines() {
        let raw = line;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('.') {
            continue;
        }
        if let Some(eq_pos) = line.find('=') {
            let key = line[..eq_pos].trim();
            if !key.is_empty()
                && !key.contains(' ')
                && !key.contains('\t')
                && !key.starts_with('[')
                && !key.starts_with('@')
            {
                if !seen.insert(key.to_string()) {
                    dups.insert(format!("{key}  (line: \"{raw}\")"));
                }
            }
        }
    }

    if !dups.is_empty() {
        panic!(
            "Duplicate key definitions in {locale}:\n  {}",
            dups.into_iter().collect::<Vec<_>>().join("\n  ")
        );
    }
}
