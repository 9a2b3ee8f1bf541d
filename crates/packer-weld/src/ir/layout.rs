//! Project layout conventions
//!
//! The source root and packed output root are passed in explicitly instead of
//! being read from the working directory. A project can override the defaults
//! with a `[layout]` table in `packer.toml`.

use crate::ir::ExtensionName;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// File name looked up by [`PackerLayout::from_project_dir`]
pub const LAYOUT_FILE: &str = "packer.toml";

pub const DEFAULT_SOURCE_ROOT: &str = "./srcjs/exts";
pub const DEFAULT_SOURCE_EXTENSION: &str = ".js";
pub const DEFAULT_PACKED_OUTPUT_ROOT: &str = "./inst/packer";

/// Errors in a layout's own values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("source root cannot be empty")]
    EmptySourceRoot,

    #[error("packed output root cannot be empty")]
    EmptyOutputRoot,

    #[error("source extension '{0}' must start with '.' and cannot contain path separators")]
    InvalidSourceExtension(String),
}

/// Errors loading a layout file
#[derive(Debug, Error)]
pub enum LayoutFileError {
    #[error("Failed to read layout at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse layout at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid layout at {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: LayoutError,
    },
}

/// Where extension sources live and where packed artifacts go
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackerLayout {
    /// Directory output paths are resolved against (the bundler config's `__dirname`)
    pub project_root: PathBuf,

    /// Source directory as the bundler sees it (e.g. "./srcjs/exts")
    pub source_root: String,

    /// Source file suffix, including the dot
    pub source_extension: String,

    /// Output directory relative to `project_root`, or absolute
    pub packed_output_root: String,
}

impl Default for PackerLayout {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            source_root: DEFAULT_SOURCE_ROOT.to_string(),
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            packed_output_root: DEFAULT_PACKED_OUTPUT_ROOT.to_string(),
        }
    }
}

/// On-disk shape of `packer.toml`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LayoutFile {
    #[serde(default)]
    layout: Option<RawLayout>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLayout {
    project_root: Option<PathBuf>,
    source_root: Option<String>,
    source_extension: Option<String>,
    packed_output_root: Option<String>,
}

impl PackerLayout {
    /// Default layout rooted at `root`
    pub fn rooted_at(root: impl Into<PathBuf>) -> Self {
        Self::default().with_project_root(root)
    }

    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = root.into();
        self
    }

    pub fn with_source_root(mut self, root: impl Into<String>) -> Self {
        self.source_root = root.into();
        self
    }

    pub fn with_source_extension(mut self, ext: impl Into<String>) -> Self {
        self.source_extension = ext.into();
        self
    }

    pub fn with_packed_output_root(mut self, root: impl Into<String>) -> Self {
        self.packed_output_root = root.into();
        self
    }

    /// Parse a layout file. A missing `project_root` defaults to the file's directory.
    pub fn from_file(path: &Path) -> Result<Self, LayoutFileError> {
        let content = fs::read_to_string(path).map_err(|source| LayoutFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: LayoutFile =
            toml::from_str(&content).map_err(|source| LayoutFileError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let base = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let raw = file.layout.unwrap_or_default();

        let mut layout = Self::rooted_at(&base);
        if let Some(root) = raw.project_root {
            layout.project_root = resolve_path(&base, &root);
        }
        if let Some(source_root) = raw.source_root {
            layout.source_root = source_root;
        }
        if let Some(ext) = raw.source_extension {
            layout.source_extension = ext;
        }
        if let Some(out) = raw.packed_output_root {
            layout.packed_output_root = out;
        }

        layout.validate().map_err(|source| LayoutFileError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;

        debug!("Loaded layout from {}", path.display());
        Ok(layout)
    }

    /// Read `dir/packer.toml` if it exists, otherwise use the defaults rooted at `dir`
    pub fn from_project_dir(dir: &Path) -> Result<Self, LayoutFileError> {
        let path = dir.join(LAYOUT_FILE);
        if path.is_file() {
            Self::from_file(&path)
        } else {
            warn!(
                "No {} in {}, using default layout",
                LAYOUT_FILE,
                dir.display()
            );
            Ok(Self::rooted_at(dir))
        }
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.source_root.is_empty() {
            return Err(LayoutError::EmptySourceRoot);
        }
        if self.packed_output_root.is_empty() {
            return Err(LayoutError::EmptyOutputRoot);
        }
        let ext = &self.source_extension;
        let well_formed = ext.len() > 1
            && ext.starts_with('.')
            && !ext.chars().any(|c| matches!(c, '/' | '\\') || c.is_whitespace());
        if !well_formed {
            return Err(LayoutError::InvalidSourceExtension(
                self.source_extension.clone(),
            ));
        }
        Ok(())
    }

    /// Bundler-facing source path for an extension: `<source_root>/<name><ext>`
    pub fn source_path(&self, name: &ExtensionName) -> String {
        let root = self.source_root.trim_end_matches('/');
        format!("{}/{}{}", root, name, self.source_extension)
    }

    /// Output directory resolved against the project root
    pub fn output_dir(&self) -> PathBuf {
        resolve_path(&self.project_root, Path::new(&self.packed_output_root))
    }
}

/// Join `rel` onto `base`, dropping `.` segments and folding `..` where possible
fn resolve_path(base: &Path, rel: &Path) -> PathBuf {
    if rel.is_absolute() {
        return rel.to_path_buf();
    }

    let mut out = PathBuf::new();
    for component in base.components().chain(rel.components()) {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    out.pop();
                } else {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}
