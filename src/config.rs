use std::collections::BTreeMap;
use std::fmt;

/// Severity assigned to a rule in a resolved configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Off,
    Warn,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Off => "off",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }

    /// Parse the textual form. `"warning"` is accepted as an alias for
    /// `"warn"`, matching common config files in the wild.
    pub fn parse(s: &str) -> Option<Severity> {
        match s {
            "off" => Some(Severity::Off),
            "warn" | "warning" => Some(Severity::Warn),
            "error" => Some(Severity::Error),
            _ => None,
        }
    }

    /// Parse the numeric form (0 = off, 1 = warn, 2 = error).
    pub fn from_level(level: i64) -> Option<Severity> {
        match level {
            0 => Some(Severity::Off),
            1 => Some(Severity::Warn),
            2 => Some(Severity::Error),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One configured rule: a severity plus optional structured options.
///
/// Options are opaque to the resolver. On merge an entry fully replaces any
/// prior entry with the same rule id, options included; option lists are
/// never combined element-wise.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEntry {
    pub severity: Severity,
    pub options: Vec<serde_json::Value>,
}

impl RuleEntry {
    pub fn new(severity: Severity) -> Self {
        Self {
            severity,
            options: Vec::new(),
        }
    }

    pub fn with_options(severity: Severity, options: Vec<serde_json::Value>) -> Self {
        Self { severity, options }
    }
}

/// Mapping from rule id (`plugin/rule-name` or bare `rule-name`) to its
/// configured entry. Ordered by id so iteration and output are deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleTable {
    entries: BTreeMap<String, RuleEntry>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, id: impl Into<String>, entry: RuleEntry) {
        self.entries.insert(id.into(), entry);
    }

    pub fn get(&self, id: &str) -> Option<&RuleEntry> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleEntry)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
    }

    /// Return a new table with every entry from `self`, overwritten by every
    /// entry from `patch` on id conflict. Ids present only in `patch` are
    /// added. Last-applied-wins; neither input is modified.
    pub fn merge(&self, patch: &RuleTable) -> RuleTable {
        let mut entries = self.entries.clone();
        for (id, entry) in &patch.entries {
            entries.insert(id.clone(), entry.clone());
        }
        RuleTable { entries }
    }

    /// Count entries per severity: (error, warn, off).
    pub fn severity_counts(&self) -> (usize, usize, usize) {
        let mut counts = (0, 0, 0);
        for entry in self.entries.values() {
            match entry.severity {
                Severity::Error => counts.0 += 1,
                Severity::Warn => counts.1 += 1,
                Severity::Off => counts.2 += 1,
            }
        }
        counts
    }
}

impl FromIterator<(String, RuleEntry)> for RuleTable {
    fn from_iter<I: IntoIterator<Item = (String, RuleEntry)>>(iter: I) -> Self {
        RuleTable {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(entries: &[(&str, Severity)]) -> RuleTable {
        entries
            .iter()
            .map(|(id, sev)| (id.to_string(), RuleEntry::new(*sev)))
            .collect()
    }

    #[test]
    fn merge_contains_union_of_keys() {
        let base = table(&[("no-var", Severity::Error), ("curly", Severity::Error)]);
        let patch = table(&[("no-shadow", Severity::Warn)]);
        let merged = base.merge(&patch);
        assert_eq!(merged.len(), 3);
        assert!(merged.get("no-var").is_some());
        assert!(merged.get("curly").is_some());
        assert!(merged.get("no-shadow").is_some());
    }

    #[test]
    fn merge_patch_wins_on_conflict() {
        let base = table(&[("no-var", Severity::Error)]);
        let patch = table(&[("no-var", Severity::Off)]);
        let merged = base.merge(&patch);
        assert_eq!(merged.get("no-var").unwrap().severity, Severity::Off);
    }

    #[test]
    fn merge_empty_patch_is_identity() {
        let base = table(&[("no-var", Severity::Error), ("curly", Severity::Warn)]);
        let merged = base.merge(&RuleTable::new());
        assert_eq!(merged, base);
    }

    #[test]
    fn merge_replaces_options_wholesale() {
        let mut base = RuleTable::new();
        base.set(
            "max-depth",
            RuleEntry::with_options(Severity::Error, vec![json!(4)]),
        );
        let mut patch = RuleTable::new();
        patch.set("max-depth", RuleEntry::new(Severity::Warn));

        let merged = base.merge(&patch);
        let entry = merged.get("max-depth").unwrap();
        assert_eq!(entry.severity, Severity::Warn);
        // The old options must not survive the overwrite.
        assert!(entry.options.is_empty());
    }

    #[test]
    fn merge_does_not_mutate_inputs() {
        let base = table(&[("no-var", Severity::Error)]);
        let patch = table(&[("no-var", Severity::Off)]);
        let _ = base.merge(&patch);
        assert_eq!(base.get("no-var").unwrap().severity, Severity::Error);
    }

    #[test]
    fn severity_text_forms() {
        assert_eq!(Severity::parse("off"), Some(Severity::Off));
        assert_eq!(Severity::parse("warn"), Some(Severity::Warn));
        assert_eq!(Severity::parse("warning"), Some(Severity::Warn));
        assert_eq!(Severity::parse("error"), Some(Severity::Error));
        assert_eq!(Severity::parse("fatal"), None);
        assert_eq!(Severity::parse("Error"), None); // case-sensitive
    }

    #[test]
    fn severity_numeric_forms() {
        assert_eq!(Severity::from_level(0), Some(Severity::Off));
        assert_eq!(Severity::from_level(1), Some(Severity::Warn));
        assert_eq!(Severity::from_level(2), Some(Severity::Error));
        assert_eq!(Severity::from_level(3), None);
        assert_eq!(Severity::from_level(-1), None);
    }

    #[test]
    fn severity_counts() {
        let mut t = RuleTable::new();
        t.set("a", RuleEntry::new(Severity::Error));
        t.set("b", RuleEntry::new(Severity::Error));
        t.set("c", RuleEntry::new(Severity::Warn));
        t.set("d", RuleEntry::new(Severity::Off));
        assert_eq!(t.severity_counts(), (2, 1, 1));
    }

    #[test]
    fn iteration_is_ordered_by_id() {
        let mut t = RuleTable::new();
        t.set("zeta", RuleEntry::new(Severity::Off));
        t.set("alpha", RuleEntry::new(Severity::Error));
        let ids: Vec<&str> = t.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);
    }
}
