use crate::config::RuleTable;
use crate::matcher;
use crate::registry::{ConfigLayer, OverrideLayer, Registry};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ResolveError {
    UnknownLayer(String),
    Cycle(String),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::UnknownLayer(name) => write!(f, "unknown layer: '{}'", name),
            ResolveError::Cycle(name) => {
                write!(f, "layer inheritance cycle through '{}'", name)
            }
        }
    }
}

impl std::error::Error for ResolveError {}

/// Parent chain for a layer, ordered root-first and ending with the named
/// layer itself. Registry construction already rejects cycles; the walk
/// re-checks so a registry bug surfaces as an error instead of a hang.
fn layer_chain<'a>(
    registry: &'a Registry,
    name: &str,
) -> Result<Vec<&'a ConfigLayer>, ResolveError> {
    let mut current = registry
        .get(name)
        .ok_or_else(|| ResolveError::UnknownLayer(name.to_string()))?;
    let mut chain = vec![current];

    while let Some(parent) = &current.parent {
        if chain.iter().any(|layer| layer.name == *parent) {
            return Err(ResolveError::Cycle(parent.clone()));
        }
        current = registry
            .get(parent)
            .ok_or_else(|| ResolveError::UnknownLayer(parent.clone()))?;
        chain.push(current);
    }

    chain.reverse();
    Ok(chain)
}

/// Rules of a layer with its full parent chain folded in, parent first, so
/// the layer's own entries win ties. No path-dependent overrides.
pub fn effective_rules(registry: &Registry, name: &str) -> Result<RuleTable, ResolveError> {
    let mut table = RuleTable::new();
    for layer in layer_chain(registry, name)? {
        table = table.merge(&layer.rules);
    }
    Ok(table)
}

/// A resolved rule set for one path, with per-rule provenance.
#[derive(Debug)]
pub struct Resolution {
    pub rules: RuleTable,
    /// Rule id -> label of the layer or override that supplied the winning
    /// entry.
    pub origins: BTreeMap<String, String>,
    /// Number of override layers (nested ones included) that matched.
    pub overrides_applied: usize,
}

/// Computes effective rule tables per file path against an immutable
/// registry. Holds no mutable state; one resolver can serve any number of
/// threads.
pub struct Resolver<'a> {
    registry: &'a Registry,
    root: PathBuf,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a Registry, root: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            root: root.into(),
        }
    }

    /// Effective rule table for `path` under the named layer.
    ///
    /// The parent chain is folded first (root-most ancestor first), then
    /// every applicable override along the chain in declaration order,
    /// ancestors before the named layer, nested overrides depth-first after
    /// the override that carries them. Later merges overwrite earlier ones
    /// per rule id.
    pub fn resolve(&self, layer: &str, path: &Path) -> Result<RuleTable, ResolveError> {
        self.resolve_traced(layer, path).map(|r| r.rules)
    }

    /// Like [`Resolver::resolve`] but records which layer or override
    /// supplied each winning entry.
    pub fn resolve_traced(&self, layer: &str, path: &Path) -> Result<Resolution, ResolveError> {
        let chain = layer_chain(self.registry, layer)?;
        let norm = matcher::normalize_path(path, &self.root);

        let mut rules = RuleTable::new();
        let mut origins = BTreeMap::new();
        for layer in &chain {
            record_origins(&mut origins, &layer.rules, &layer.name);
            rules = rules.merge(&layer.rules);
        }

        let mut overrides_applied = 0;
        for layer in &chain {
            overrides_applied +=
                fold_overrides(&mut rules, &mut origins, &layer.name, &layer.overrides, &norm);
        }

        Ok(Resolution {
            rules,
            origins,
            overrides_applied,
        })
    }

    /// Whether any layer on the parent chain carries an ignore pattern
    /// matching `path`. Ignored paths are skipped by consumers; `resolve`
    /// itself still answers for them.
    pub fn is_ignored(&self, layer: &str, path: &Path) -> Result<bool, ResolveError> {
        let chain = layer_chain(self.registry, layer)?;
        let norm = matcher::normalize_path(path, &self.root);
        Ok(chain.iter().any(|layer| matcher::layer_ignores(layer, &norm)))
    }
}

/// Merge every matching override onto `rules`, declaration order, recursing
/// into a matched override's nested overrides before moving to its sibling.
/// Returns the number of overrides applied.
fn fold_overrides(
    rules: &mut RuleTable,
    origins: &mut BTreeMap<String, String>,
    layer_name: &str,
    overrides: &[OverrideLayer],
    path: &str,
) -> usize {
    let mut applied = 0;
    for ov in matcher::applicable_overrides(overrides, path) {
        let label = format!("{} ({})", layer_name, ov.label());
        record_origins(origins, &ov.rules, &label);
        *rules = rules.merge(&ov.rules);
        applied += 1 + fold_overrides(rules, origins, layer_name, &ov.overrides, path);
    }
    applied
}

fn record_origins(origins: &mut BTreeMap<String, String>, table: &RuleTable, label: &str) {
    for (id, _) in table.iter() {
        origins.insert(id.to_string(), label.to_string());
    }
}
