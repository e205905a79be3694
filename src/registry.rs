use crate::config::RuleTable;
use crate::matcher;
use globset::GlobSet;
use std::collections::HashMap;
use std::fmt;

/// Plain definition of a config layer, as produced by a definition file or a
/// built-in preset. Not yet validated; `Registry::build` turns a set of these
/// into compiled layers.
#[derive(Debug, Clone, Default)]
pub struct LayerDef {
    pub name: String,
    /// Name of the layer this one extends, resolved at build time.
    pub parent: Option<String>,
    pub rules: RuleTable,
    /// Paths matching any of these are skipped entirely by consumers.
    pub ignore_patterns: Vec<String>,
    pub overrides: Vec<OverrideDef>,
}

/// Definition of a glob-scoped override within a layer.
#[derive(Debug, Clone, Default)]
pub struct OverrideDef {
    pub files: Vec<String>,
    pub excluded_files: Vec<String>,
    pub rules: RuleTable,
    pub overrides: Vec<OverrideDef>,
}

#[derive(Debug)]
pub enum BuildError {
    DuplicateLayer(String),
    UnknownParent { layer: String, parent: String },
    Cycle(String),
    MalformedPattern { layer: String, source: globset::Error },
    EmptyOverrideFiles(String),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::DuplicateLayer(name) => {
                write!(f, "duplicate layer definition: '{}'", name)
            }
            BuildError::UnknownParent { layer, parent } => {
                write!(f, "layer '{}' extends unknown layer '{}'", layer, parent)
            }
            BuildError::Cycle(name) => {
                write!(f, "layer inheritance cycle through '{}'", name)
            }
            BuildError::MalformedPattern { layer, source } => {
                write!(f, "invalid glob pattern in layer '{}': {}", layer, source)
            }
            BuildError::EmptyOverrideFiles(layer) => {
                write!(f, "override in layer '{}' has no file patterns", layer)
            }
        }
    }
}

impl std::error::Error for BuildError {}

/// A validated, glob-compiled layer held by the registry.
#[derive(Debug)]
pub struct ConfigLayer {
    pub name: String,
    pub parent: Option<String>,
    pub rules: RuleTable,
    pub ignore_patterns: Vec<String>,
    pub overrides: Vec<OverrideLayer>,
    pub(crate) ignore: GlobSet,
}

/// A compiled override: applies to paths matching `files` and not matching
/// `excluded_files`. Declaration order among siblings is preserved and
/// significant: later overrides win on rule id conflict.
#[derive(Debug)]
pub struct OverrideLayer {
    pub files: Vec<String>,
    pub excluded_files: Vec<String>,
    pub rules: RuleTable,
    pub overrides: Vec<OverrideLayer>,
    pub(crate) include: GlobSet,
    pub(crate) exclude: GlobSet,
}

impl OverrideLayer {
    /// Human-readable label used in explain output and error messages.
    pub fn label(&self) -> String {
        self.files.join(", ")
    }
}

/// All known layers, keyed by name. Built once from static definitions and
/// read-only afterwards; resolution never mutates it.
#[derive(Debug, Default)]
pub struct Registry {
    layers: HashMap<String, ConfigLayer>,
}

impl Registry {
    /// Validate and compile a set of layer definitions.
    ///
    /// Fails on the first defect found: duplicate names, a parent that does
    /// not resolve, an inheritance cycle, a glob that does not parse, or an
    /// override with an empty pattern list. A failed build yields no
    /// registry; there is no partially-usable state.
    pub fn build(defs: Vec<LayerDef>) -> Result<Registry, BuildError> {
        let mut layers: HashMap<String, ConfigLayer> = HashMap::new();
        for def in defs {
            if layers.contains_key(&def.name) {
                return Err(BuildError::DuplicateLayer(def.name));
            }
            let layer = compile_layer(def)?;
            layers.insert(layer.name.clone(), layer);
        }

        for layer in layers.values() {
            if let Some(parent) = &layer.parent {
                if !layers.contains_key(parent) {
                    return Err(BuildError::UnknownParent {
                        layer: layer.name.clone(),
                        parent: parent.clone(),
                    });
                }
            }
        }

        // Walk every parent chain; a revisit within one walk is a cycle.
        for start in layers.values() {
            let mut seen: Vec<&str> = vec![&start.name];
            let mut current = start;
            while let Some(parent) = &current.parent {
                if seen.contains(&parent.as_str()) {
                    return Err(BuildError::Cycle(parent.clone()));
                }
                seen.push(parent);
                current = &layers[parent];
            }
        }

        Ok(Registry { layers })
    }

    pub fn get(&self, name: &str) -> Option<&ConfigLayer> {
        self.layers.get(name)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layer names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.layers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn compile_layer(def: LayerDef) -> Result<ConfigLayer, BuildError> {
    let ignore = matcher::build_glob_set(&def.ignore_patterns).map_err(|source| {
        BuildError::MalformedPattern {
            layer: def.name.clone(),
            source,
        }
    })?;

    let mut overrides = Vec::with_capacity(def.overrides.len());
    for ov in def.overrides {
        overrides.push(compile_override(&def.name, ov)?);
    }

    Ok(ConfigLayer {
        name: def.name,
        parent: def.parent,
        rules: def.rules,
        ignore_patterns: def.ignore_patterns,
        overrides,
        ignore,
    })
}

fn compile_override(layer_name: &str, def: OverrideDef) -> Result<OverrideLayer, BuildError> {
    if def.files.is_empty() {
        return Err(BuildError::EmptyOverrideFiles(layer_name.to_string()));
    }

    let malformed = |source| BuildError::MalformedPattern {
        layer: layer_name.to_string(),
        source,
    };
    let include = matcher::build_glob_set(&def.files).map_err(malformed)?;
    let exclude = matcher::build_glob_set(&def.excluded_files).map_err(malformed)?;

    let mut overrides = Vec::with_capacity(def.overrides.len());
    for nested in def.overrides {
        overrides.push(compile_override(layer_name, nested)?);
    }

    Ok(OverrideLayer {
        files: def.files,
        excluded_files: def.excluded_files,
        rules: def.rules,
        overrides,
        include,
        exclude,
    })
}
