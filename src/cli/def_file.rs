use crate::config::{RuleEntry, RuleTable, Severity};
use crate::registry::{LayerDef, OverrideDef};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Debug)]
pub enum DefsError {
    Read(std::io::Error),
    ParseToml(toml::de::Error),
    ParseJson(serde_json::Error),
    UnsupportedFormat(String),
    InvalidSeverity { rule: String, value: String },
    EmptyEntry(String),
}

impl fmt::Display for DefsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefsError::Read(e) => write!(f, "failed to read definitions: {}", e),
            DefsError::ParseToml(e) => write!(f, "failed to parse definitions: {}", e),
            DefsError::ParseJson(e) => write!(f, "failed to parse definitions: {}", e),
            DefsError::UnsupportedFormat(ext) => {
                write!(f, "unsupported definitions format: '.{}'", ext)
            }
            DefsError::InvalidSeverity { rule, value } => {
                write!(f, "rule '{}' has invalid severity '{}'", rule, value)
            }
            DefsError::EmptyEntry(rule) => {
                write!(f, "rule '{}' has an empty entry array", rule)
            }
        }
    }
}

impl std::error::Error for DefsError {}

/// Top-level definition file structure.
#[derive(Debug, Deserialize)]
pub struct DefsFile {
    #[serde(default)]
    pub layer: Vec<RawLayer>,
}

/// A single `[[layer]]` entry.
#[derive(Debug, Deserialize)]
pub struct RawLayer {
    pub name: String,
    pub parent: Option<String>,
    #[serde(default)]
    pub ignore: Vec<String>,
    #[serde(default)]
    pub rules: BTreeMap<String, RawEntry>,
    #[serde(default)]
    pub overrides: Vec<RawOverride>,
}

/// A `[[layer.overrides]]` entry, possibly nested.
#[derive(Debug, Deserialize)]
pub struct RawOverride {
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub excluded_files: Vec<String>,
    #[serde(default)]
    pub rules: BTreeMap<String, RawEntry>,
    #[serde(default)]
    pub overrides: Vec<RawOverride>,
}

/// A rule value as written in a definition file: a bare severity (`"error"`,
/// `"warn"`, `"off"`, or numeric 0/1/2), or an array whose first element is
/// the severity and whose remaining elements are the rule's options.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawEntry {
    Level(i64),
    Name(String),
    Full(Vec<Value>),
}

impl RawEntry {
    /// Convert to the core `RuleEntry` type.
    pub fn to_rule_entry(&self, rule: &str) -> Result<RuleEntry, DefsError> {
        match self {
            RawEntry::Level(level) => severity_from_level(rule, *level).map(RuleEntry::new),
            RawEntry::Name(name) => severity_from_name(rule, name).map(RuleEntry::new),
            RawEntry::Full(values) => {
                let first = values
                    .first()
                    .ok_or_else(|| DefsError::EmptyEntry(rule.to_string()))?;
                let severity = match first {
                    Value::String(name) => severity_from_name(rule, name)?,
                    Value::Number(n) => match n.as_i64() {
                        Some(level) => severity_from_level(rule, level)?,
                        None => return Err(invalid(rule, first)),
                    },
                    other => return Err(invalid(rule, other)),
                };
                Ok(RuleEntry::with_options(severity, values[1..].to_vec()))
            }
        }
    }
}

fn invalid(rule: &str, value: &Value) -> DefsError {
    DefsError::InvalidSeverity {
        rule: rule.to_string(),
        value: value.to_string(),
    }
}

fn severity_from_name(rule: &str, name: &str) -> Result<Severity, DefsError> {
    Severity::parse(name).ok_or_else(|| DefsError::InvalidSeverity {
        rule: rule.to_string(),
        value: name.to_string(),
    })
}

fn severity_from_level(rule: &str, level: i64) -> Result<Severity, DefsError> {
    Severity::from_level(level).ok_or_else(|| DefsError::InvalidSeverity {
        rule: rule.to_string(),
        value: level.to_string(),
    })
}

impl RawLayer {
    /// Convert to the core `LayerDef` type.
    pub fn to_layer_def(&self) -> Result<LayerDef, DefsError> {
        Ok(LayerDef {
            name: self.name.clone(),
            parent: self.parent.clone(),
            rules: convert_rules(&self.rules)?,
            ignore_patterns: self.ignore.clone(),
            overrides: convert_overrides(&self.overrides)?,
        })
    }
}

fn convert_rules(raw: &BTreeMap<String, RawEntry>) -> Result<RuleTable, DefsError> {
    let mut table = RuleTable::new();
    for (id, entry) in raw {
        table.set(id.clone(), entry.to_rule_entry(id)?);
    }
    Ok(table)
}

fn convert_overrides(raw: &[RawOverride]) -> Result<Vec<OverrideDef>, DefsError> {
    raw.iter()
        .map(|ov| {
            Ok(OverrideDef {
                files: ov.files.clone(),
                excluded_files: ov.excluded_files.clone(),
                rules: convert_rules(&ov.rules)?,
                overrides: convert_overrides(&ov.overrides)?,
            })
        })
        .collect()
}

/// Load layer definitions from a TOML or JSON file, chosen by extension.
pub fn load_defs(path: &Path) -> Result<Vec<LayerDef>, DefsError> {
    let text = fs::read_to_string(path).map_err(DefsError::Read)?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let file: DefsFile = match ext {
        "toml" => toml::from_str(&text).map_err(DefsError::ParseToml)?,
        "json" => serde_json::from_str(&text).map_err(DefsError::ParseJson)?,
        other => return Err(DefsError::UnsupportedFormat(other.to_string())),
    };
    file.layer.iter().map(RawLayer::to_layer_def).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    const SAMPLE: &str = r#"
[[layer]]
name = "base"

[layer.rules]
no-var = "error"
semi = 0
max-depth = ["error", 4]
unused-vars = ["warn", { varsIgnorePattern = "^_" }]

[[layer.overrides]]
files = ["*.test.js"]

[layer.overrides.rules]
no-var = "off"

[[layer]]
name = "typescript"
parent = "base"
ignore = ["**/dist/**"]
"#;

    #[test]
    fn parses_toml_definitions() {
        let file: DefsFile = toml::from_str(SAMPLE).unwrap();
        let defs: Vec<LayerDef> = file
            .layer
            .iter()
            .map(|l| l.to_layer_def().unwrap())
            .collect();
        assert_eq!(defs.len(), 2);

        let base = &defs[0];
        assert_eq!(base.name, "base");
        assert_eq!(base.rules.get("no-var").unwrap().severity, Severity::Error);
        assert_eq!(base.rules.get("semi").unwrap().severity, Severity::Off);
        assert_eq!(base.overrides.len(), 1);
        assert_eq!(base.overrides[0].files, vec!["*.test.js"]);
        assert_eq!(
            base.overrides[0].rules.get("no-var").unwrap().severity,
            Severity::Off
        );

        let ts = &defs[1];
        assert_eq!(ts.parent.as_deref(), Some("base"));
        assert_eq!(ts.ignore_patterns, vec!["**/dist/**"]);
    }

    #[test]
    fn entry_options_carry_through() {
        let file: DefsFile = toml::from_str(SAMPLE).unwrap();
        let base = file.layer[0].to_layer_def().unwrap();

        let depth = base.rules.get("max-depth").unwrap();
        assert_eq!(depth.severity, Severity::Error);
        assert_eq!(depth.options, vec![json!(4)]);

        let unused = base.rules.get("unused-vars").unwrap();
        assert_eq!(unused.severity, Severity::Warn);
        assert_eq!(unused.options, vec![json!({ "varsIgnorePattern": "^_" })]);
    }

    #[test]
    fn parses_json_definitions() {
        let text = r#"{
            "layer": [{
                "name": "base",
                "rules": { "no-var": 2, "curly": ["error"] }
            }]
        }"#;
        let file: DefsFile = serde_json::from_str(text).unwrap();
        let base = file.layer[0].to_layer_def().unwrap();
        assert_eq!(base.rules.get("no-var").unwrap().severity, Severity::Error);
        assert_eq!(base.rules.get("curly").unwrap().severity, Severity::Error);
    }

    #[test]
    fn rejects_unknown_severity_name() {
        let text = r#"
[[layer]]
name = "base"
[layer.rules]
no-var = "fatal"
"#;
        let file: DefsFile = toml::from_str(text).unwrap();
        let err = file.layer[0].to_layer_def().unwrap_err();
        match err {
            DefsError::InvalidSeverity { rule, value } => {
                assert_eq!(rule, "no-var");
                assert_eq!(value, "fatal");
            }
            other => panic!("expected InvalidSeverity, got {:?}", other),
        }
    }

    #[test]
    fn rejects_out_of_range_level() {
        let text = r#"
[[layer]]
name = "base"
[layer.rules]
no-var = 3
"#;
        let file: DefsFile = toml::from_str(text).unwrap();
        let err = file.layer[0].to_layer_def().unwrap_err();
        assert!(matches!(err, DefsError::InvalidSeverity { .. }));
    }

    #[test]
    fn rejects_empty_entry_array() {
        let entry = RawEntry::Full(Vec::new());
        let err = entry.to_rule_entry("no-var").unwrap_err();
        assert!(matches!(err, DefsError::EmptyEntry(rule) if rule == "no-var"));
    }

    #[test]
    fn load_defs_dispatches_on_extension() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let defs = load_defs(file.path()).unwrap();
        assert_eq!(defs.len(), 2);
    }

    #[test]
    fn load_defs_rejects_unknown_extension() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(b"layer: []").unwrap();
        let err = load_defs(file.path()).unwrap_err();
        assert!(matches!(err, DefsError::UnsupportedFormat(ext) if ext == "yaml"));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load_defs(Path::new("/nonexistent/defs.toml")).unwrap_err();
        assert!(matches!(err, DefsError::Read(_)));
    }
}
