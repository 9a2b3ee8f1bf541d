//! Build configuration handed to the bundler
//!
//! Field names serialize to what the bundler expects (`entry`, `output.filename`,
//! `output.path`, `externals`), so the JSON form can be fed to it directly.

use crate::ir::{ExtensionName, NameError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Output file-name template; `[name]` is replaced by the entry name
pub const OUTPUT_FILE_PATTERN: &str = "[name].js";

/// Placeholder the bundler substitutes in [`OUTPUT_FILE_PATTERN`]
pub const NAME_PLACEHOLDER: &str = "[name]";

/// Host-provided globals every extension is built against, as
/// (import identifier, global variable) pairs
pub const HOST_EXTERNALS: [(&str, &str); 2] = [("shiny", "Shiny"), ("jquery", "jQuery")];

/// Structural problems in a [`BuildConfig`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("configuration has no entry")]
    NoEntry,

    #[error("configuration has {0} entries, expected exactly one")]
    MultipleEntries(usize),

    #[error("invalid entry name: {0}")]
    InvalidEntryName(#[from] NameError),

    #[error("entry '{name}' points at '{path}', which is not named after it")]
    EntryNameMismatch { name: String, path: String },

    #[error("output file pattern is '{0}', expected '[name].js'")]
    UnexpectedFilePattern(String),

    #[error("output directory cannot be empty")]
    EmptyOutputDirectory,

    #[error("required external '{0}' is missing")]
    MissingExternal(String),

    #[error("external '{import}' must resolve to '{expected}', found '{found}'")]
    FixedExternalOverride {
        import: String,
        expected: String,
        found: String,
    },

    #[error("external import identifier cannot be empty")]
    EmptyImport,

    #[error("external '{0}' has an empty global name")]
    EmptyGlobal(String),
}

/// Entry name to source file path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryMapping(IndexMap<String, String>);

impl EntryMapping {
    /// Mapping with exactly one entry
    pub fn single(name: &ExtensionName, path: impl Into<String>) -> Self {
        let mut map = IndexMap::with_capacity(1);
        map.insert(name.to_string(), path.into());
        Self(map)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// The only entry, if there is exactly one
    pub fn sole(&self) -> Option<(&str, &str)> {
        if self.0.len() == 1 {
            self.0.first().map(|(k, v)| (k.as_str(), v.as_str()))
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Where the packed artifact is written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpec {
    #[serde(rename = "filename")]
    pub file_name_pattern: String,

    #[serde(rename = "path")]
    pub directory: PathBuf,
}

impl OutputSpec {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            file_name_pattern: OUTPUT_FILE_PATTERN.to_string(),
            directory: directory.into(),
        }
    }

    /// File name for a given entry
    pub fn file_name_for(&self, name: &str) -> String {
        self.file_name_pattern.replace(NAME_PLACEHOLDER, name)
    }
}

/// Import identifier to host global variable
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalsTable(IndexMap<String, String>);

impl ExternalsTable {
    /// The fixed `shiny -> Shiny`, `jquery -> jQuery` table
    pub fn host_defaults() -> Self {
        Self(
            HOST_EXTERNALS
                .iter()
                .map(|(import, global)| (import.to_string(), global.to_string()))
                .collect(),
        )
    }

    /// Add an extra host global. The fixed pairs cannot be rebound.
    pub fn insert(
        &mut self,
        import: impl Into<String>,
        global: impl Into<String>,
    ) -> Result<(), ConfigValidationError> {
        let import = import.into();
        let global = global.into();

        if import.is_empty() {
            return Err(ConfigValidationError::EmptyImport);
        }
        if global.is_empty() {
            return Err(ConfigValidationError::EmptyGlobal(import));
        }
        if let Some((_, expected)) = HOST_EXTERNALS.iter().find(|(i, _)| *i == import) {
            if *expected != global {
                return Err(ConfigValidationError::FixedExternalOverride {
                    import,
                    expected: expected.to_string(),
                    found: global,
                });
            }
        }

        self.0.insert(import, global);
        Ok(())
    }

    pub fn get(&self, import: &str) -> Option<&str> {
        self.0.get(import).map(String::as_str)
    }

    pub fn contains(&self, import: &str) -> bool {
        self.0.contains_key(import)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn validate(&self) -> Result<(), ConfigValidationError> {
        for (import, expected) in HOST_EXTERNALS {
            match self.get(import) {
                None => return Err(ConfigValidationError::MissingExternal(import.to_string())),
                Some(found) if found != expected => {
                    return Err(ConfigValidationError::FixedExternalOverride {
                        import: import.to_string(),
                        expected: expected.to_string(),
                        found: found.to_string(),
                    })
                }
                Some(_) => {}
            }
        }
        if let Some((import, _)) = self.iter().find(|(_, global)| global.is_empty()) {
            return Err(ConfigValidationError::EmptyGlobal(import.to_string()));
        }
        Ok(())
    }
}

/// Complete bundler configuration for one extension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(rename = "entry")]
    pub entries: EntryMapping,

    pub output: OutputSpec,

    pub externals: ExternalsTable,
}

impl BuildConfig {
    /// Name of the single entry
    pub fn name(&self) -> Option<&str> {
        self.entries.sole().map(|(name, _)| name)
    }

    /// Concrete artifact file name, e.g. `foo.js`
    pub fn output_file_name(&self) -> Option<String> {
        self.name().map(|name| self.output.file_name_for(name))
    }

    /// Full path of the artifact the bundler will write
    pub fn output_file(&self) -> Option<PathBuf> {
        self.output_file_name()
            .map(|file| self.output.directory.join(file))
    }

    /// Check the invariants `describe` guarantees by construction
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let (name, path) = match self.entries.sole() {
            Some(entry) => entry,
            None if self.entries.is_empty() => return Err(ConfigValidationError::NoEntry),
            None => return Err(ConfigValidationError::MultipleEntries(self.entries.len())),
        };

        ExtensionName::new(name)?;

        if !entry_path_matches(name, path) {
            return Err(ConfigValidationError::EntryNameMismatch {
                name: name.to_string(),
                path: path.to_string(),
            });
        }

        if self.output.directory.as_os_str().is_empty() {
            return Err(ConfigValidationError::EmptyOutputDirectory);
        }

        if self.output.file_name_pattern != OUTPUT_FILE_PATTERN {
            return Err(ConfigValidationError::UnexpectedFilePattern(
                self.output.file_name_pattern.clone(),
            ));
        }

        self.externals.validate()
    }
}

/// `path`'s last segment is `<name>` followed by a `.`-led suffix
fn entry_path_matches(name: &str, path: &str) -> bool {
    let file = path.rsplit('/').next().unwrap_or(path);
    match file.strip_prefix(name) {
        Some(rest) => rest.len() > 1 && rest.starts_with('.'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config(name: &str, path: &str) -> BuildConfig {
        let mut entries = IndexMap::new();
        entries.insert(name.to_string(), path.to_string());
        BuildConfig {
            entries: EntryMapping(entries),
            output: OutputSpec::new("/srv/app/inst/packer"),
            externals: ExternalsTable::host_defaults(),
        }
    }

    #[test]
    fn test_host_defaults_order_and_values() {
        let externals = ExternalsTable::host_defaults();
        let pairs: Vec<_> = externals.iter().collect();
        assert_eq!(pairs, vec![("shiny", "Shiny"), ("jquery", "jQuery")]);
    }

    #[test]
    fn test_output_file_name() {
        let cfg = config("foo", "./srcjs/exts/foo.js");
        assert_eq!(cfg.output_file_name().as_deref(), Some("foo.js"));
        assert_eq!(
            cfg.output_file(),
            Some(PathBuf::from("/srv/app/inst/packer/foo.js"))
        );
    }

    #[test]
    fn test_validate_accepts_well_formed() {
        assert_eq!(config("foo", "./srcjs/exts/foo.js").validate(), Ok(()));
        assert_eq!(config("foo", "foo.ts").validate(), Ok(()));
        assert_eq!(config("foo", "./srcjs/exts/foo.min.js").validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_mismatched_entry() {
        assert_eq!(
            config("foo", "./srcjs/exts/bar.js").validate(),
            Err(ConfigValidationError::EntryNameMismatch {
                name: "foo".to_string(),
                path: "./srcjs/exts/bar.js".to_string(),
            })
        );
        assert!(config("foo", "./srcjs/exts/foobar.js").validate().is_err());
        assert!(config("foo", "./srcjs/exts/foo.").validate().is_err());
        assert!(config("foo", "./srcjs/exts/foo./x").validate().is_err());
        assert!(config("foo", "./srcjs/exts/foo").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_entry_count() {
        let mut cfg = config("foo", "./srcjs/exts/foo.js");
        cfg.entries = EntryMapping::default();
        assert_eq!(cfg.validate(), Err(ConfigValidationError::NoEntry));

        let mut cfg = config("foo", "./srcjs/exts/foo.js");
        cfg.entries.0.insert("bar".to_string(), "./srcjs/exts/bar.js".to_string());
        assert_eq!(cfg.validate(), Err(ConfigValidationError::MultipleEntries(2)));
    }

    #[test]
    fn test_validate_rejects_bad_name_and_pattern() {
        assert_eq!(
            config("", "./srcjs/exts/.js").validate(),
            Err(ConfigValidationError::InvalidEntryName(NameError::Empty))
        );

        let mut cfg = config("foo", "./srcjs/exts/foo.js");
        cfg.output.file_name_pattern = "bundle.js".to_string();
        assert_eq!(
            cfg.validate(),
            Err(ConfigValidationError::UnexpectedFilePattern("bundle.js".to_string()))
        );
    }

    #[test]
    fn test_validate_counts_entries_from_the_mapping() {
        let mut cfg = config("foo", "./srcjs/exts/foo.js");
        cfg.entries.0.insert("bar".to_string(), "./srcjs/exts/bar.js".to_string());
        cfg.entries.0.insert("baz".to_string(), "./srcjs/exts/baz.js".to_string());
        assert_eq!(cfg.validate(), Err(ConfigValidationError::MultipleEntries(3)));
    }

    #[test]
    fn test_validate_rejects_empty_output_directory() {
        let mut cfg = config("foo", "./srcjs/exts/foo.js");
        cfg.output.directory = PathBuf::new();
        assert_eq!(cfg.validate(), Err(ConfigValidationError::EmptyOutputDirectory));

        let json = serde_json::json!({
            "entry": { "foo": "./srcjs/exts/foo.js" },
            "output": { "filename": "[name].js", "path": "" },
            "externals": { "shiny": "Shiny", "jquery": "jQuery" }
        });
        let cfg: BuildConfig = serde_json::from_value(json).unwrap();
        assert_eq!(cfg.validate(), Err(ConfigValidationError::EmptyOutputDirectory));
    }

    #[test]
    fn test_validate_rejects_tampered_externals() {
        let mut cfg = config("foo", "./srcjs/exts/foo.js");
        cfg.externals.0.shift_remove("jquery");
        assert_eq!(
            cfg.validate(),
            Err(ConfigValidationError::MissingExternal("jquery".to_string()))
        );

        let mut cfg = config("foo", "./srcjs/exts/foo.js");
        cfg.externals.0.insert("shiny".to_string(), "shiny".to_string());
        assert_eq!(
            cfg.validate(),
            Err(ConfigValidationError::FixedExternalOverride {
                import: "shiny".to_string(),
                expected: "Shiny".to_string(),
                found: "shiny".to_string(),
            })
        );
    }

    #[test]
    fn test_externals_insert_guards_fixed_pairs() {
        let mut externals = ExternalsTable::host_defaults();
        assert!(externals.insert("jquery", "$").is_err());
        assert!(externals.insert("d3", "").is_err());
        assert_eq!(externals.insert("", "d3"), Err(ConfigValidationError::EmptyImport));
        assert_eq!(externals.insert("jquery", "jQuery"), Ok(()));
        assert_eq!(externals.insert("d3", "d3"), Ok(()));
        assert_eq!(externals.len(), 3);
        assert_eq!(externals.get("d3"), Some("d3"));
    }

    #[test]
    fn test_json_shape_uses_bundler_field_names() {
        let cfg = config("foo", "./srcjs/exts/foo.js");
        let json = serde_json::to_value(&cfg).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "entry": { "foo": "./srcjs/exts/foo.js" },
                "output": { "filename": "[name].js", "path": "/srv/app/inst/packer" },
                "externals": { "shiny": "Shiny", "jquery": "jQuery" }
            })
        );

        let back: BuildConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, cfg);
    }
}
