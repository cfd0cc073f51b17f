//! Bug catalog loading and validation
//!
//! The catalog is read once at startup and never mutated. It comes from, in
//! order of preference, an explicit file, `bugs.toml` at the working-tree
//! root, or the catalog compiled into the binary.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{BugDefinition, BugSummary};

/// Catalog file looked up at the working-tree root
pub const CATALOG_FILE_NAME: &str = "bugs.toml";

/// Default sidecar suffix for backups
pub const DEFAULT_BACKUP_SUFFIX: &str = ".backup";

const BUILTIN_CATALOG: &str = include_str!("../catalog/default.toml");

/// On-disk catalog layout
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default = "default_backup_suffix")]
    backup_suffix: String,

    #[serde(default)]
    bugs: Vec<BugDefinition>,
}

fn default_backup_suffix() -> String {
    DEFAULT_BACKUP_SUFFIX.to_string()
}

/// Where the active catalog came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Builtin,
    /// Built in code with [`Catalog::new`]
    Inline,
}

impl CatalogSource {
    /// Path used to name the source in parse errors
    fn origin(&self) -> PathBuf {
        match self {
            CatalogSource::File(path) => path.clone(),
            other => PathBuf::from(other.to_string()),
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::File(path) => write!(f, "{}", path.display()),
            CatalogSource::Builtin => write!(f, "<builtin>"),
            CatalogSource::Inline => write!(f, "<inline>"),
        }
    }
}

/// Immutable table of bug definitions, keyed by name, in declared order
#[derive(Debug, Clone)]
pub struct Catalog {
    bugs: Vec<BugDefinition>,
    index: HashMap<String, usize>,
    backup_suffix: String,
    source: CatalogSource,
}

impl Catalog {
    /// Build a validated catalog from definitions
    pub fn new(bugs: Vec<BugDefinition>, backup_suffix: impl Into<String>) -> Result<Self> {
        let backup_suffix = backup_suffix.into();
        if backup_suffix.is_empty() {
            return Err(Error::InvalidCatalog(
                "backup_suffix must not be empty".to_string(),
            ));
        }

        let mut index = HashMap::with_capacity(bugs.len());
        let mut owners: HashMap<PathBuf, String> = HashMap::new();

        for (i, bug) in bugs.iter().enumerate() {
            validate_bug(bug)?;

            if index.insert(bug.name.clone(), i).is_some() {
                return Err(Error::DuplicateBug(bug.name.clone()));
            }

            for mapping in &bug.files {
                let key = normalize(&mapping.target);
                if let Some(first) = owners.insert(key, bug.name.clone()) {
                    return Err(Error::SharedTarget {
                        target: mapping.target.clone(),
                        first,
                        second: bug.name.clone(),
                    });
                }
            }
        }

        Ok(Self {
            bugs,
            index,
            backup_suffix,
            source: CatalogSource::Inline,
        })
    }

    /// Parse a catalog from TOML text read from `source`
    pub fn from_toml(content: &str, source: CatalogSource) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content).map_err(|e| Error::CatalogParse {
            path: source.origin(),
            source: e,
        })?;
        let mut catalog = Self::new(file.bugs, file.backup_suffix)?;
        catalog.source = source;
        Ok(catalog)
    }

    /// Load a catalog from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::CatalogNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|e| Error::fs("read", path, e))?;
        Self::from_toml(&content, CatalogSource::File(path.to_path_buf()))
    }

    /// The catalog compiled into the binary
    pub fn builtin() -> Result<Self> {
        Self::from_toml(BUILTIN_CATALOG, CatalogSource::Builtin)
    }

    /// Resolve the active catalog for a working tree.
    ///
    /// An explicit path must exist. Otherwise `<root>/bugs.toml` is used when
    /// present, falling back to the built-in catalog.
    pub fn discover(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let catalog = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let candidate = root.join(CATALOG_FILE_NAME);
                if candidate.is_file() {
                    Self::from_file(&candidate)?
                } else {
                    Self::builtin()?
                }
            }
        };
        debug!(
            "Loaded {} bug(s) from {}",
            catalog.len(),
            catalog.source
        );
        Ok(catalog)
    }

    /// Look up a bug by name
    pub fn get(&self, name: &str) -> Option<&BugDefinition> {
        self.index.get(name).map(|&i| &self.bugs[i])
    }

    /// Look up a bug by name, failing with the available names
    pub fn require(&self, name: &str) -> Result<&BugDefinition> {
        self.get(name).ok_or_else(|| Error::UnknownBug {
            name: name.to_string(),
            available: self.names(),
        })
    }

    /// Bugs in declared order
    pub fn iter(&self) -> impl Iterator<Item = &BugDefinition> {
        self.bugs.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.bugs.iter().map(|b| b.name.clone()).collect()
    }

    pub fn summaries(&self) -> Vec<BugSummary> {
        self.bugs.iter().map(BugSummary::from).collect()
    }

    pub fn len(&self) -> usize {
        self.bugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bugs.is_empty()
    }

    pub fn backup_suffix(&self) -> &str {
        &self.backup_suffix
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }
}

fn validate_bug(bug: &BugDefinition) -> Result<()> {
    if bug.name.trim().is_empty() {
        return Err(Error::InvalidCatalog("bug name must not be empty".to_string()));
    }
    if bug.description.trim().is_empty() {
        return Err(Error::InvalidCatalog(format!(
            "bug '{}' has an empty description",
            bug.name
        )));
    }
    if bug.files.is_empty() {
        return Err(Error::InvalidCatalog(format!(
            "bug '{}' lists no files",
            bug.name
        )));
    }
    for mapping in &bug.files {
        if mapping.source.as_os_str().is_empty() || mapping.target.as_os_str().is_empty() {
            return Err(Error::InvalidCatalog(format!(
                "bug '{}' has a mapping with an empty path",
                bug.name
            )));
        }
        if normalize(&mapping.source) == normalize(&mapping.target) {
            return Err(Error::InvalidCatalog(format!(
                "bug '{}' maps {} onto itself",
                bug.name,
                mapping.target.display()
            )));
        }
    }
    Ok(())
}

/// Lexical normalization so `./src/a.css`, `src/x/../a.css` and `src/a.css`
/// compare equal. Symlinks are not resolved.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last = out.components().next_back();
                let folds = matches!(last, Some(Component::Normal(_)));
                // `/..` is `/`
                let at_root = matches!(last, Some(Component::RootDir | Component::Prefix(_)));
                if folds {
                    out.pop();
                } else if !at_root {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileMapping;
    use tempfile::TempDir;

    fn bug(name: &str, targets: &[&str]) -> BugDefinition {
        BugDefinition {
            name: name.to_string(),
            description: format!("{} description", name),
            files: targets
                .iter()
                .map(|t| FileMapping {
                    source: PathBuf::from(format!("bugs/{}", t.replace('/', "_"))),
                    target: PathBuf::from(t),
                })
                .collect(),
        }
    }

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = Catalog::builtin().unwrap();
        assert!(!catalog.is_empty());
        assert_eq!(catalog.backup_suffix(), ".backup");
        assert_eq!(catalog.source(), &CatalogSource::Builtin);

        let ui = catalog.get("ui-misalignment").unwrap();
        assert_eq!(ui.files[0].source, PathBuf::from("bugs/index.demo-bug.css"));
        assert_eq!(ui.files[0].target, PathBuf::from("src/index.css"));

        for summary in catalog.summaries() {
            assert!(!summary.name.is_empty());
            assert!(!summary.description.is_empty());
        }
    }

    #[test]
    fn test_preserves_declared_order() {
        let catalog = Catalog::new(
            vec![bug("zeta", &["src/z.css"]), bug("alpha", &["src/a.css"])],
            ".backup",
        )
        .unwrap();
        assert_eq!(catalog.names(), vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let err = Catalog::new(
            vec![bug("dup", &["src/a.css"]), bug("dup", &["src/b.css"])],
            ".backup",
        )
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateBug(name) if name == "dup"));
    }

    #[test]
    fn test_rejects_shared_targets() {
        let err = Catalog::new(
            vec![bug("one", &["src/a.css"]), bug("two", &["./src/a.css"])],
            ".backup",
        )
        .unwrap_err();
        match err {
            Error::SharedTarget { first, second, .. } => {
                assert_eq!(first, "one");
                assert_eq!(second, "two");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_shared_targets_through_parent_dir() {
        let err = Catalog::new(
            vec![bug("one", &["src/a.css"]), bug("two", &["src/x/../a.css"])],
            ".backup",
        )
        .unwrap_err();
        assert!(matches!(err, Error::SharedTarget { ref second, .. } if second == "two"));

        // Leading `..` cannot be folded away and stays distinct
        assert!(Catalog::new(
            vec![bug("one", &["../src/a.css"]), bug("two", &["src/a.css"])],
            ".backup",
        )
        .is_ok());
    }

    #[test]
    fn test_normalize_folds_dot_segments() {
        assert_eq!(normalize(Path::new("./src/x/../a.css")), PathBuf::from("src/a.css"));
        assert_eq!(normalize(Path::new("../../a.css")), PathBuf::from("../../a.css"));
        assert_eq!(normalize(Path::new("/../a.css")), PathBuf::from("/a.css"));
        assert_eq!(normalize(Path::new("src/..")), PathBuf::new());
    }

    #[test]
    fn test_rejects_repeated_target_within_bug() {
        let err = Catalog::new(vec![bug("twice", &["src/a.css", "src/a.css"])], ".backup")
            .unwrap_err();
        assert!(matches!(err, Error::SharedTarget { .. }));
    }

    #[test]
    fn test_rejects_empty_description_and_files() {
        let mut no_desc = bug("quiet", &["src/a.css"]);
        no_desc.description = "  ".to_string();
        assert!(matches!(
            Catalog::new(vec![no_desc], ".backup"),
            Err(Error::InvalidCatalog(_))
        ));

        assert!(matches!(
            Catalog::new(vec![bug("empty", &[])], ".backup"),
            Err(Error::InvalidCatalog(_))
        ));

        assert!(matches!(
            Catalog::new(vec![bug("ok", &["src/a.css"])], ""),
            Err(Error::InvalidCatalog(_))
        ));
    }

    #[test]
    fn test_unknown_name_reports_available() {
        let catalog = Catalog::new(vec![bug("only", &["src/a.css"])], ".backup").unwrap();
        match catalog.require("other").unwrap_err() {
            Error::UnknownBug { name, available } => {
                assert_eq!(name, "other");
                assert_eq!(available, vec!["only"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_error_names_file() {
        let source = CatalogSource::File(PathBuf::from("bugs.toml"));
        let err = Catalog::from_toml("[[bugs]]\nname = 3", source).unwrap_err();
        assert!(matches!(err, Error::CatalogParse { .. }));
        assert!(err.to_string().contains("bugs.toml"));

        let err = Catalog::from_toml("bugs = 1", CatalogSource::Inline).unwrap_err();
        assert!(err.to_string().contains("<inline>"));
    }

    #[test]
    fn test_source_follows_construction() {
        let catalog = Catalog::new(vec![bug("only", &["src/a.css"])], ".backup").unwrap();
        assert_eq!(catalog.source(), &CatalogSource::Inline);

        let text = "[[bugs]]\nname = \"x\"\ndescription = \"X\"\n\n[[bugs.files]]\nsource = \"bugs/x\"\ntarget = \"src/x\"\n";
        let path = PathBuf::from("/tmp/custom.toml");
        let catalog = Catalog::from_toml(text, CatalogSource::File(path.clone())).unwrap();
        assert_eq!(catalog.source(), &CatalogSource::File(path));
        assert_eq!(catalog.source().to_string(), "/tmp/custom.toml");
    }

    #[test]
    fn test_discover_prefers_root_catalog() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(CATALOG_FILE_NAME),
            r#"
backup_suffix = ".orig"

[[bugs]]
name = "local"
description = "Local override"

[[bugs.files]]
source = "bugs/x.css"
target = "src/x.css"
"#,
        )
        .unwrap();

        let catalog = Catalog::discover(tmp.path(), None).unwrap();
        assert_eq!(catalog.names(), vec!["local"]);
        assert_eq!(catalog.backup_suffix(), ".orig");
        assert_eq!(
            catalog.source(),
            &CatalogSource::File(tmp.path().join(CATALOG_FILE_NAME))
        );
    }

    #[test]
    fn test_discover_falls_back_to_builtin() {
        let tmp = TempDir::new().unwrap();
        let catalog = Catalog::discover(tmp.path(), None).unwrap();
        assert_eq!(catalog.source(), &CatalogSource::Builtin);
        assert!(catalog.get("ui-misalignment").is_some());
    }

    #[test]
    fn test_discover_explicit_must_exist() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.toml");
        let err = Catalog::discover(tmp.path(), Some(&missing)).unwrap_err();
        assert!(matches!(err, Error::CatalogNotFound(path) if path == missing));
    }
}
