//! Pod discovery and lookup.
//!
//! Pods live one-per-file in a directory, scanned non-recursively for
//! `*.yaml` / `*.yml`. The file stem is the pod key. A malformed file never
//! aborts discovery: it is excluded from the successful set and reported as a
//! per-file error alongside the others.

use crate::error::{OrcaError, Result};
use crate::pod::PodDefinition;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Result of scanning a pods directory: the valid definitions plus every
/// per-file failure.
#[derive(Debug, Default)]
pub struct Discovery {
    pods: BTreeMap<String, PodDefinition>,
    errors: Vec<OrcaError>,
}

impl Discovery {
    /// Successfully loaded definitions, keyed by pod key.
    pub fn pods(&self) -> &BTreeMap<String, PodDefinition> {
        &self.pods
    }

    /// Per-file load failures, in file order.
    pub fn errors(&self) -> &[OrcaError] {
        &self.errors
    }

    /// Look up one loaded definition.
    pub fn get(&self, key: &str) -> Option<&PodDefinition> {
        self.pods.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.pods.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pods.len()
    }
}

/// Scan a directory for pod definition files.
///
/// Fails only when the directory itself cannot be read; individual file
/// failures are collected in the returned [`Discovery`].
pub fn discover(dir: &Path) -> Result<Discovery> {
    let mut files = pod_files(dir)?;
    files.sort();

    let mut discovery = Discovery::default();
    for path in files {
        let key = pod_key(&path);
        let file = file_label(&path);

        if discovery.pods.contains_key(&key) {
            discovery.errors.push(OrcaError::PodValidation {
                file,
                reason: format!("duplicate pod key '{}'", key),
            });
            continue;
        }

        match load_file(&path, &key) {
            Ok(pod) => {
                discovery.pods.insert(key, pod);
            }
            Err(err) => discovery.errors.push(err),
        }
    }

    Ok(discovery)
}

/// Point lookup of one pod by key, used by the `info` and `run` flows.
///
/// Tries `<key>.yaml` then `<key>.yml`. Fails with [`OrcaError::PodNotFound`]
/// when neither exists, or [`OrcaError::PodValidation`] when the file is
/// malformed.
pub fn get(dir: &Path, key: &str) -> Result<PodDefinition> {
    // Keys are file stems, never paths; a separator would escape the pods
    // directory.
    if key.contains(['/', '\\']) {
        return Err(OrcaError::PodNotFound(key.to_string()));
    }
    for ext in ["yaml", "yml"] {
        let path = dir.join(format!("{}.{}", key, ext));
        if path.is_file() {
            return load_file(&path, key);
        }
    }
    Err(OrcaError::PodNotFound(key.to_string()))
}

fn pod_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        OrcaError::UserError(format!(
            "cannot read pods directory '{}': {}",
            dir.display(),
            e
        ))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            OrcaError::UserError(format!(
                "cannot read pods directory '{}': {}",
                dir.display(),
                e
            ))
        })?;
        let path = entry.path();
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == "yaml" || e == "yml");
        if path.is_file() && is_yaml {
            files.push(path);
        }
    }
    Ok(files)
}

fn pod_key(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn load_file(path: &Path, key: &str) -> Result<PodDefinition> {
    let file = file_label(path);
    let yaml = std::fs::read_to_string(path).map_err(|e| OrcaError::PodValidation {
        file: file.clone(),
        reason: format!("cannot read file: {}", e),
    })?;
    PodDefinition::parse(key, &yaml).map_err(|reason| OrcaError::PodValidation { file, reason })
}
