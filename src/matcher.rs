use crate::registry::{ConfigLayer, OverrideLayer};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::Path;

/// Normalize a path for matching: forward slashes, relative to `root`, no
/// leading `./` or `/`. Matching is always performed on this form.
pub fn normalize_path(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let mut s = rel.to_string_lossy().replace('\\', "/");
    while let Some(stripped) = s.strip_prefix("./") {
        s = stripped.to_string();
    }
    s.trim_start_matches('/').to_string()
}

/// Compile patterns into one set. `*` stays within a path segment; `**`
/// crosses segments. An empty pattern list compiles to a set matching
/// nothing.
pub fn build_glob_set(patterns: &[String]) -> Result<GlobSet, globset::Error> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern).literal_separator(true).build()?;
        builder.add(glob);
    }
    builder.build()
}

/// Test a compiled set against a normalized path. Patterns are anchored to
/// the full relative path; a pattern without a `/` (e.g. `*.test.js`) also
/// matches on the final path segment, so it applies at any depth.
pub fn set_matches(set: &GlobSet, path: &str) -> bool {
    if set.is_empty() {
        return false;
    }
    if set.is_match(path) {
        return true;
    }
    match path.rsplit('/').next() {
        Some(name) if name != path => set.is_match(name),
        _ => false,
    }
}

/// Whether an override selects `path`: the positive patterns must match and
/// the exclusion patterns must not.
pub fn override_applies(ov: &OverrideLayer, path: &str) -> bool {
    set_matches(&ov.include, path) && !set_matches(&ov.exclude, path)
}

/// Filter sibling overrides (a layer's direct children, or one override's
/// nested children) to those applying to `path`, preserving declaration
/// order. Recursion into a matched override's own children is the resolver's
/// concern.
pub fn applicable_overrides<'a>(
    overrides: &'a [OverrideLayer],
    path: &str,
) -> Vec<&'a OverrideLayer> {
    overrides
        .iter()
        .filter(|ov| override_applies(ov, path))
        .collect()
}

/// Whether a layer's own ignore patterns exclude `path` outright.
pub fn layer_ignores(layer: &ConfigLayer, path: &str) -> bool {
    set_matches(&layer.ignore, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleTable;
    use crate::registry::{LayerDef, OverrideDef, Registry};

    fn make_override(files: &[&str], excluded: &[&str]) -> OverrideLayer {
        let files: Vec<String> = files.iter().map(|s| s.to_string()).collect();
        let excluded_files: Vec<String> = excluded.iter().map(|s| s.to_string()).collect();
        OverrideLayer {
            include: build_glob_set(&files).unwrap(),
            exclude: build_glob_set(&excluded_files).unwrap(),
            files,
            excluded_files,
            rules: RuleTable::new(),
            overrides: Vec::new(),
        }
    }

    #[test]
    fn normalize_strips_root_and_dot_prefix() {
        let root = Path::new("/repo");
        assert_eq!(normalize_path(Path::new("/repo/src/a.js"), root), "src/a.js");
        assert_eq!(normalize_path(Path::new("./src/a.js"), Path::new(".")), "src/a.js");
        assert_eq!(normalize_path(Path::new("src/a.js"), Path::new(".")), "src/a.js");
    }

    #[test]
    fn normalize_converts_backslashes() {
        assert_eq!(
            normalize_path(Path::new("src\\components\\App.tsx"), Path::new(".")),
            "src/components/App.tsx"
        );
    }

    #[test]
    fn star_does_not_cross_segments() {
        let set = build_glob_set(&["src/*.js".to_string()]).unwrap();
        assert!(set.is_match("src/a.js"));
        assert!(!set.is_match("src/nested/a.js"));
    }

    #[test]
    fn double_star_crosses_segments() {
        let set = build_glob_set(&["src/**/*.js".to_string()]).unwrap();
        assert!(set.is_match("src/a.js"));
        assert!(set.is_match("src/nested/deep/a.js"));
        assert!(!set.is_match("lib/a.js"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let set = build_glob_set(&["**/*.ts".to_string()]).unwrap();
        assert!(set_matches(&set, "src/main.ts"));
        assert!(!set_matches(&set, "src/main.TS"));
    }

    #[test]
    fn bare_pattern_matches_final_segment() {
        let set = build_glob_set(&["*.test.js".to_string()]).unwrap();
        assert!(set_matches(&set, "foo.test.js"));
        assert!(set_matches(&set, "deep/nested/foo.test.js"));
        assert!(!set_matches(&set, "foo.js"));
    }

    #[test]
    fn anchored_pattern_does_not_float() {
        let set = build_glob_set(&["src/*.js".to_string()]).unwrap();
        assert!(!set_matches(&set, "vendor/src/a.js"));
    }

    #[test]
    fn empty_set_matches_nothing() {
        let set = build_glob_set(&[]).unwrap();
        assert!(!set_matches(&set, "anything.js"));
    }

    #[test]
    fn exclusion_vetoes_positive_match() {
        let ov = make_override(&["*.ts"], &["*.test.ts"]);
        assert!(override_applies(&ov, "src/main.ts"));
        assert!(!override_applies(&ov, "src/main.test.ts"));
    }

    #[test]
    fn brace_alternation() {
        let set = build_glob_set(&["**/*.{spec,test}.ts".to_string()]).unwrap();
        assert!(set_matches(&set, "src/a.spec.ts"));
        assert!(set_matches(&set, "src/a.test.ts"));
        assert!(!set_matches(&set, "src/a.ts"));
    }

    #[test]
    fn applicable_overrides_preserve_declaration_order() {
        let def = LayerDef {
            name: "base".to_string(),
            overrides: vec![
                OverrideDef {
                    files: vec!["**/*.js".to_string()],
                    ..Default::default()
                },
                OverrideDef {
                    files: vec!["*.test.js".to_string()],
                    ..Default::default()
                },
                OverrideDef {
                    files: vec!["*.md".to_string()],
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let registry = Registry::build(vec![def]).unwrap();
        let layer = registry.get("base").unwrap();

        let matched = applicable_overrides(&layer.overrides, "pkg/foo.test.js");
        let labels: Vec<String> = matched.iter().map(|ov| ov.label()).collect();
        assert_eq!(labels, vec!["**/*.js", "*.test.js"]);
    }
}
