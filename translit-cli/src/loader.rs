//! Reading rule set definitions from TOML files

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};
use translit_core::{RuleSet, RuleSetDefinition, RuleSetLibrary, TranslitError};

/// Extension of rule set files
pub const EXTENSION: &str = "toml";

/// Errors while loading a rule set file
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file could not be read
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file is not valid TOML or has the wrong shape
    #[error("cannot parse {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// The definition does not compile
    #[error("{}: {source}", path.display())]
    Definition {
        path: PathBuf,
        source: TranslitError,
    },

    /// No rule set with that id exists in the directory
    #[error("no such input method: '{name}' in {}", dir.display())]
    NotFound { name: String, dir: PathBuf },
}

impl LoadError {
    /// Whether a lookup failed rather than a file being broken
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound { .. })
    }
}

/// Rule sets loaded from a directory, with the files that failed to load
#[derive(Debug, Default)]
pub struct LoadedLibrary {
    pub rule_sets: RuleSetLibrary,
    pub failures: Vec<LoadError>,
}

/// Parse a definition file without compiling it
pub fn read_definition(path: &Path) -> Result<RuleSetDefinition, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| LoadError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse and compile a definition file
pub fn load_rule_set(path: &Path) -> Result<RuleSet, LoadError> {
    let definition = read_definition(path)?;
    let rule_set = RuleSet::from_definition(&definition).map_err(|source| LoadError::Definition {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), id = rule_set.id(), "loaded rule set");
    Ok(rule_set)
}

/// Load every `.toml` file in a directory into a library
///
/// Files that do not load are skipped with a warning and reported in
/// [`LoadedLibrary::failures`]. Fails only when the directory cannot be read.
pub fn load_library(dir: &Path) -> Result<LoadedLibrary, LoadError> {
    let entries = std::fs::read_dir(dir).map_err(|source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| LoadError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == EXTENSION) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut loaded = LoadedLibrary::default();
    for path in paths {
        match load_rule_set(&path) {
            Ok(rule_set) => {
                if let Some(previous) = loaded.rule_sets.insert(rule_set) {
                    warn!(id = previous.id(), path = %path.display(), "duplicate rule set id, keeping the later file");
                }
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping rule set file");
                loaded.failures.push(e);
            }
        }
    }
    Ok(loaded)
}

/// Resolve `name` in a directory of rule set files
///
/// `<dir>/<name>.toml` is tried first and only that file is read. Otherwise
/// the directory is scanned for a rule set with that id, skipping files that
/// do not load.
pub fn lookup(dir: &Path, name: &str) -> Result<Arc<RuleSet>, LoadError> {
    let direct = dir.join(format!("{name}.{EXTENSION}"));
    if Path::new(name).file_name().is_some_and(|file| file == name) && direct.is_file() {
        return load_rule_set(&direct).map(Arc::new);
    }

    let loaded = load_library(dir)?;
    if !loaded.failures.is_empty() {
        debug!(skipped = loaded.failures.len(), "some rule set files did not load");
    }
    loaded.rule_sets.get(name).map_err(|_| LoadError::NotFound {
        name: name.to_string(),
        dir: dir.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rulesets_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../rulesets")
    }

    #[test]
    fn test_load_rule_set() {
        let rule_set = load_rule_set(&rulesets_dir().join("el-demo.toml")).unwrap();
        assert_eq!(rule_set.id(), "el-demo");
        assert_eq!(rule_set.transliterate("τh", "", false), "θ");
    }

    #[test]
    fn test_missing_file() {
        let err = load_rule_set(&rulesets_dir().join("missing.toml")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(!err.is_not_found());
    }

    fn dir_with_broken_sibling() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::copy(rulesets_dir().join("el-demo.toml"), dir.path().join("greek.toml")).unwrap();
        std::fs::write(dir.path().join("zz-broken.toml"), "id = \"broken\"\n").unwrap();
        dir
    }

    #[test]
    fn test_load_library() {
        let loaded = load_library(&rulesets_dir()).unwrap();
        assert!(loaded.rule_sets.contains("el-demo"));
        assert!(loaded.rule_sets.contains("hi-phonetic-demo"));
        assert!(loaded.failures.is_empty());
    }

    #[test]
    fn test_load_library_skips_broken_file() {
        let dir = dir_with_broken_sibling();
        let loaded = load_library(dir.path()).unwrap();
        assert!(loaded.rule_sets.contains("el-demo"));
        assert_eq!(loaded.rule_sets.len(), 1);
        assert_eq!(loaded.failures.len(), 1);
        assert!(matches!(loaded.failures[0], LoadError::Definition { .. }));
    }

    #[test]
    fn test_lookup_beside_broken_file() {
        let dir = dir_with_broken_sibling();

        // file name differs from the id, so this goes through the scan
        let rule_set = lookup(dir.path(), "el-demo").unwrap();
        assert_eq!(rule_set.transliterate("τh", "", false), "θ");

        let err = lookup(dir.path(), "does-not-exist").unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("no such input method: 'does-not-exist'"));
    }

    #[test]
    fn test_lookup_broken_file_by_name() {
        let dir = dir_with_broken_sibling();
        let err = lookup(dir.path(), "zz-broken").unwrap_err();
        assert!(matches!(err, LoadError::Definition { .. }));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_lookup_unknown_name() {
        let err = lookup(&rulesets_dir(), "does-not-exist").unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("no such input method: 'does-not-exist'"));
    }

    #[test]
    fn test_lookup_known_name() {
        let rule_set = lookup(&rulesets_dir(), "hi-phonetic-demo").unwrap();
        assert_eq!(rule_set.transliterate("k", "", false), "क्");
    }
}
