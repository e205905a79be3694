use crate::registry::Registry;
use crate::resolve::{ResolveError, Resolver};
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum BatchError {
    Walk(ignore::Error),
    Resolve(ResolveError),
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchError::Walk(e) => write!(f, "failed to walk target: {}", e),
            BatchError::Resolve(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for BatchError {}

/// Per-file outcome of a batch resolution.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    /// Matched an ignore pattern on the layer chain; no table was computed.
    pub ignored: bool,
    pub errors: usize,
    pub warnings: usize,
    pub disabled: usize,
    pub overrides_applied: usize,
}

#[derive(Debug)]
pub struct BatchResult {
    pub reports: Vec<FileReport>,
    pub files_resolved: usize,
    pub files_ignored: usize,
}

/// Resolve every file under the targets against one layer.
///
/// Directories are walked gitignore-aware; explicit file targets are taken
/// as-is. Resolution is fanned out across threads; the registry is
/// immutable, so per-path calls need no coordination.
pub fn run_batch(
    registry: &Registry,
    layer: &str,
    targets: &[PathBuf],
    root: &Path,
) -> Result<BatchResult, BatchError> {
    let mut files: Vec<PathBuf> = Vec::new();
    for target in targets {
        if target.is_file() {
            files.push(target.clone());
        } else {
            for entry in WalkBuilder::new(target).build() {
                let entry = entry.map_err(BatchError::Walk)?;
                if entry.file_type().is_some_and(|ft| ft.is_file()) {
                    files.push(entry.into_path());
                }
            }
        }
    }
    files.sort();

    let resolver = Resolver::new(registry, root);
    let reports = files
        .par_iter()
        .map(|path| {
            if resolver.is_ignored(layer, path).map_err(BatchError::Resolve)? {
                return Ok(FileReport {
                    path: path.clone(),
                    ignored: true,
                    errors: 0,
                    warnings: 0,
                    disabled: 0,
                    overrides_applied: 0,
                });
            }
            let res = resolver
                .resolve_traced(layer, path)
                .map_err(BatchError::Resolve)?;
            let (errors, warnings, disabled) = res.rules.severity_counts();
            Ok(FileReport {
                path: path.clone(),
                ignored: false,
                errors,
                warnings,
                disabled,
                overrides_applied: res.overrides_applied,
            })
        })
        .collect::<Result<Vec<FileReport>, BatchError>>()?;

    let files_ignored = reports.iter().filter(|r| r.ignored).count();
    let files_resolved = reports.len() - files_ignored;

    Ok(BatchResult {
        reports,
        files_resolved,
        files_ignored,
    })
}
