//! Built-in layer definitions: `base`, `typescript` (extends `base`), and
//! `react` (extends `typescript`). These mirror a conventional JS/TS/React
//! lint setup and double as a working example of the definition model.

use crate::config::{RuleEntry, RuleTable, Severity};
use crate::registry::{BuildError, LayerDef, OverrideDef, Registry};
use serde_json::{json, Value};

fn error() -> RuleEntry {
    RuleEntry::new(Severity::Error)
}

fn warn() -> RuleEntry {
    RuleEntry::new(Severity::Warn)
}

fn off() -> RuleEntry {
    RuleEntry::new(Severity::Off)
}

fn error_opts(options: Vec<Value>) -> RuleEntry {
    RuleEntry::with_options(Severity::Error, options)
}

fn warn_opts(options: Vec<Value>) -> RuleEntry {
    RuleEntry::with_options(Severity::Warn, options)
}

fn table(entries: Vec<(&str, RuleEntry)>) -> RuleTable {
    entries
        .into_iter()
        .map(|(id, entry)| (id.to_string(), entry))
        .collect()
}

/// Base layer: plain JavaScript projects.
pub fn base() -> LayerDef {
    LayerDef {
        name: "base".to_string(),
        parent: None,
        rules: table(vec![
            ("prettier/prettier", error()),
            // Formatting rules the formatter owns.
            ("semi", off()),
            ("quotes", off()),
            ("comma-dangle", off()),
            ("no-trailing-spaces", off()),
            // Complexity limits.
            ("max-depth", error_opts(vec![json!(4)])),
            ("max-nested-callbacks", error_opts(vec![json!(3)])),
            ("max-lines", error_opts(vec![json!(500)])),
            ("complexity", error_opts(vec![json!(20)])),
            // File structure and imports.
            (
                "check-file/no-index",
                error_opts(vec![json!({ "ignoreMiddleExtensions": true })]),
            ),
            ("unused-imports/no-unused-imports", error()),
            (
                "unused-imports/no-unused-vars",
                warn_opts(vec![json!({
                    "vars": "all",
                    "varsIgnorePattern": "^_",
                    "args": "after-used",
                    "argsIgnorePattern": "^_",
                })]),
            ),
            (
                "import/no-unused-modules",
                warn_opts(vec![json!({ "unusedExports": true })]),
            ),
            (
                "import/order",
                error_opts(vec![json!({
                    "newlines-between": "always",
                    "alphabetize": { "order": "asc" },
                    "groups": ["builtin", "external", "internal", "parent", "sibling", "index"],
                })]),
            ),
            (
                "no-relative-import-paths/no-relative-import-paths",
                error_opts(vec![json!({ "allowSameFolder": true, "rootDir": "src" })]),
            ),
            // Promise handling.
            ("promise/catch-or-return", error()),
            ("promise/always-return", error()),
            ("promise/no-callback-in-promise", warn()),
            // Code style and best practices.
            ("object-shorthand", error_opts(vec![json!("always")])),
            (
                "consistent-return",
                error_opts(vec![json!({ "treatUndefinedAsUnspecified": false })]),
            ),
            ("guard-for-in", error()),
            ("no-eval", error()),
            ("no-extra-boolean-cast", error()),
            ("no-ex-assign", error()),
            ("curly", error()),
            ("no-shadow", error()),
            ("no-var", error()),
            ("prefer-const", error()),
            (
                "no-use-before-define",
                error_opts(vec![json!({ "functions": false, "classes": true })]),
            ),
            ("no-duplicate-imports", off()),
            // Security.
            ("no-unsanitized/method", error()),
            ("no-unsanitized/property", error()),
            ("security/detect-unsafe-regex", error()),
            ("security/detect-buffer-noassert", error()),
            ("security/detect-child-process", error()),
            ("security/detect-disable-mustache-escape", error()),
            ("security/detect-eval-with-expression", error()),
            ("security/detect-non-literal-fs-filename", error()),
            ("security/detect-non-literal-regexp", error()),
            ("security/detect-pseudoRandomBytes", error()),
            ("security/detect-new-buffer", error()),
        ]),
        ignore_patterns: Vec::new(),
        overrides: vec![
            OverrideDef {
                files: vec!["**/*.test.js".to_string(), "**/*.spec.js".to_string()],
                rules: table(vec![("max-nested-callbacks", error_opts(vec![json!(4)]))]),
                ..Default::default()
            },
            OverrideDef {
                files: vec![
                    "**/__tests__/**/*.js".to_string(),
                    "**/*.{spec,test}.js".to_string(),
                ],
                rules: table(vec![
                    ("jest/expect-expect", off()),
                    ("jest/no-conditional-expect", off()),
                    ("promise/always-return", off()),
                ]),
                ..Default::default()
            },
            OverrideDef {
                files: vec!["*.json".to_string()],
                rules: table(vec![
                    (
                        "spellcheck/spell-checker",
                        error_opts(vec![json!({
                            "comments": false,
                            "strings": true,
                            "identifiers": false,
                            "lang": "en_US",
                        })]),
                    ),
                    ("max-lines", off()),
                ]),
                ..Default::default()
            },
        ],
    }
}

/// TypeScript layer. Extends `base`, swapping core rules for their
/// type-aware counterparts.
pub fn typescript() -> LayerDef {
    LayerDef {
        name: "typescript".to_string(),
        parent: Some("base".to_string()),
        rules: table(vec![
            // Core rules replaced by the TS versions.
            ("no-shadow", off()),
            ("@typescript-eslint/no-shadow", error()),
            ("no-unused-vars", off()),
            (
                "@typescript-eslint/no-unused-vars",
                error_opts(vec![json!({
                    "argsIgnorePattern": "^_",
                    "varsIgnorePattern": "^_",
                })]),
            ),
            ("no-use-before-define", off()),
            (
                "@typescript-eslint/no-use-before-define",
                error_opts(vec![json!({
                    "functions": false,
                    "classes": true,
                    "variables": true,
                })]),
            ),
            ("@typescript-eslint/no-var-requires", off()),
            ("@typescript-eslint/no-require-imports", off()),
            // Promise safety.
            ("@typescript-eslint/no-floating-promises", error()),
            ("@typescript-eslint/await-thenable", error()),
            (
                "@typescript-eslint/no-misused-promises",
                error_opts(vec![json!({
                    "checksVoidReturn": { "arguments": false, "attributes": false },
                })]),
            ),
            (
                "@typescript-eslint/no-unused-expressions",
                error_opts(vec![json!({ "allowShortCircuit": true, "allowTernary": true })]),
            ),
            (
                "@typescript-eslint/naming-convention",
                error_opts(vec![
                    json!({ "selector": "enumMember", "format": ["PascalCase"] }),
                    json!({ "selector": "interface", "format": ["PascalCase"] }),
                    json!({ "selector": "typeAlias", "format": ["PascalCase"] }),
                ]),
            ),
            // Type safety.
            (
                "@typescript-eslint/explicit-function-return-type",
                warn_opts(vec![json!({
                    "allowExpressions": true,
                    "allowTypedFunctionExpressions": true,
                    "allowHigherOrderFunctions": true,
                    "allowedNames": ["useEffect"],
                })]),
            ),
            (
                "@typescript-eslint/consistent-type-imports",
                error_opts(vec![json!({ "prefer": "type-imports" })]),
            ),
            (
                "@typescript-eslint/consistent-type-assertions",
                error_opts(vec![json!({
                    "assertionStyle": "as",
                    "objectLiteralTypeAssertions": "allow-as-parameter",
                })]),
            ),
        ]),
        ignore_patterns: Vec::new(),
        overrides: vec![
            OverrideDef {
                files: vec!["*.ts".to_string(), "*.mts".to_string(), "*.cts".to_string()],
                excluded_files: vec![
                    "*.test.ts".to_string(),
                    "*.spec.ts".to_string(),
                    "*.d.ts".to_string(),
                ],
                rules: table(vec![
                    ("no-console", warn_opts(vec![json!({ "allow": ["warn", "error"] })])),
                    ("curly", error()),
                    ("@typescript-eslint/no-explicit-any", warn()),
                    ("@typescript-eslint/ban-ts-comment", off()),
                    ("@typescript-eslint/explicit-module-boundary-types", off()),
                    ("@typescript-eslint/no-unsafe-return", error()),
                    ("@typescript-eslint/no-non-null-assertion", error()),
                    ("@typescript-eslint/no-empty-interface", warn()),
                    ("@typescript-eslint/no-restricted-imports", error()),
                ]),
                ..Default::default()
            },
            OverrideDef {
                files: vec!["*.d.ts".to_string()],
                rules: table(vec![
                    ("@typescript-eslint/no-explicit-any", off()),
                    ("@typescript-eslint/no-empty-interface", off()),
                    ("@typescript-eslint/no-namespace", off()),
                    ("@typescript-eslint/no-non-null-assertion", off()),
                    ("@typescript-eslint/explicit-function-return-type", off()),
                ]),
                ..Default::default()
            },
            OverrideDef {
                files: vec![
                    "**/__tests__/**/*.ts".to_string(),
                    "**/*.{spec,test}.ts".to_string(),
                ],
                rules: table(vec![
                    (
                        "jest/valid-title",
                        RuleEntry::with_options(
                            Severity::Error,
                            vec![json!({ "ignoreTypeOfDescribeName": true })],
                        ),
                    ),
                    ("@typescript-eslint/no-explicit-any", off()),
                    ("@typescript-eslint/no-non-null-assertion", off()),
                    ("max-nested-callbacks", error_opts(vec![json!(4)])),
                    ("@typescript-eslint/explicit-function-return-type", off()),
                ]),
                ..Default::default()
            },
        ],
    }
}

/// React layer. Extends `typescript`; generated code is ignored outright.
pub fn react() -> LayerDef {
    LayerDef {
        name: "react".to_string(),
        parent: Some("typescript".to_string()),
        rules: table(vec![
            // React core.
            ("react/react-in-jsx-scope", off()),
            ("react/display-name", error()),
            ("react-hooks/exhaustive-deps", error()),
            ("react-hooks/rules-of-hooks", error()),
            // JSX formatting and style.
            (
                "react/jsx-sort-props",
                error_opts(vec![json!({
                    "callbacksLast": true,
                    "shorthandFirst": true,
                    "ignoreCase": false,
                    "noSortAlphabetically": true,
                    "reservedFirst": true,
                })]),
            ),
            (
                "react/jsx-curly-brace-presence",
                error_opts(vec![json!({
                    "props": "never",
                    "children": "never",
                    "propElementValues": "always",
                })]),
            ),
            ("react/jsx-boolean-value", error_opts(vec![json!("never")])),
            ("react/self-closing-comp", error()),
            ("react/jsx-pascal-case", error()),
            // Security and best practices.
            ("react/no-unstable-nested-components", error()),
            ("react/no-danger", error()),
            ("react/no-danger-with-children", error()),
            ("react/no-unsafe", error()),
            ("react/jsx-no-constructed-context-values", error()),
            ("react/jsx-fragments", error_opts(vec![json!("syntax")])),
            (
                "react/jsx-no-useless-fragment",
                error_opts(vec![json!({ "allowExpressions": true })]),
            ),
            // Accessibility.
            ("jsx-a11y/alt-text", error()),
            ("jsx-a11y/anchor-has-content", error()),
            ("jsx-a11y/aria-props", error()),
            ("jsx-a11y/aria-role", error()),
            ("jsx-a11y/aria-unsupported-elements", error()),
            ("jsx-a11y/click-events-have-key-events", off()),
            ("jsx-a11y/heading-has-content", error()),
            ("jsx-a11y/html-has-lang", error()),
            ("jsx-a11y/img-redundant-alt", error()),
            ("jsx-a11y/interactive-supports-focus", error()),
            // Hook-returning effects never need explicit return types.
            (
                "@typescript-eslint/explicit-function-return-type",
                warn_opts(vec![json!({
                    "allowExpressions": true,
                    "allowTypedFunctionExpressions": true,
                    "allowHigherOrderFunctions": true,
                    "allowedNames": ["useEffect", "useLayoutEffect"],
                })]),
            ),
        ]),
        ignore_patterns: vec!["**/__generated__/**".to_string()],
        overrides: vec![
            OverrideDef {
                files: vec!["*.tsx".to_string()],
                excluded_files: vec![
                    "*.test.tsx".to_string(),
                    "*.spec.tsx".to_string(),
                    "*.stories.tsx".to_string(),
                ],
                rules: table(vec![
                    ("no-console", warn_opts(vec![json!({ "allow": ["warn", "error"] })])),
                    ("@typescript-eslint/no-unsafe-return", error()),
                    ("@typescript-eslint/no-non-null-assertion", error()),
                    ("@typescript-eslint/no-empty-interface", warn()),
                    ("@typescript-eslint/no-restricted-imports", error()),
                ]),
                ..Default::default()
            },
            OverrideDef {
                files: vec!["*.stories.tsx".to_string(), "*.story.tsx".to_string()],
                rules: table(vec![
                    ("react/jsx-no-constructed-context-values", off()),
                    ("jsx-a11y/alt-text", off()),
                    ("@typescript-eslint/explicit-function-return-type", off()),
                    ("import/no-anonymous-default-export", off()),
                ]),
                ..Default::default()
            },
            OverrideDef {
                files: vec![
                    "**/__tests__/**/*.tsx".to_string(),
                    "**/*.{spec,test}.tsx".to_string(),
                ],
                rules: table(vec![
                    (
                        "jest/valid-title",
                        RuleEntry::with_options(
                            Severity::Error,
                            vec![json!({ "ignoreTypeOfDescribeName": true })],
                        ),
                    ),
                    ("@typescript-eslint/no-explicit-any", off()),
                    ("@typescript-eslint/no-non-null-assertion", off()),
                    ("react/jsx-no-constructed-context-values", off()),
                    ("max-nested-callbacks", error_opts(vec![json!(4)])),
                    ("@typescript-eslint/explicit-function-return-type", off()),
                ]),
                ..Default::default()
            },
        ],
    }
}

pub fn builtin_defs() -> Vec<LayerDef> {
    vec![base(), typescript(), react()]
}

/// Registry holding the built-in presets.
pub fn builtin_registry() -> Result<Registry, BuildError> {
    Registry::build(builtin_defs())
}
