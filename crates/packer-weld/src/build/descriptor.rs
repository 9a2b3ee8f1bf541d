//! Extension bundle descriptor
//!
//! Turns an extension name into a complete [`BuildConfig`]. Entry key, source
//! file stem and output file name all come from the same validated
//! [`ExtensionName`], so they cannot drift apart.

use crate::error::Result;
use crate::ir::{BuildConfig, EntryMapping, ExtensionName, ExternalsTable, OutputSpec, PackerLayout};
use tracing::debug;

/// Describe `name` using the default layout
///
/// # Example
/// ```
/// let config = packer_weld::describe("foo").unwrap();
/// assert_eq!(config.entries.get("foo"), Some("./srcjs/exts/foo.js"));
/// assert_eq!(config.output.file_name_pattern, "[name].js");
/// assert_eq!(config.externals.get("jquery"), Some("jQuery"));
/// ```
pub fn describe(name: &str) -> Result<BuildConfig> {
    describe_with(&PackerLayout::default(), name)
}

/// Describe `name` against an explicit layout
pub fn describe_with(layout: &PackerLayout, name: &str) -> Result<BuildConfig> {
    BundleDescriptor::new(name).layout(layout.clone()).describe()
}

/// Builder for a single extension's bundle configuration
///
/// # Example
/// ```
/// use packer_weld::{BundleDescriptor, PackerLayout};
///
/// let config = BundleDescriptor::new("charts")
///     .layout(PackerLayout::rooted_at("/srv/app"))
///     .extra_external("d3", "d3")
///     .describe()
///     .unwrap();
///
/// assert_eq!(config.output_file_name().as_deref(), Some("charts.js"));
/// assert_eq!(config.externals.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct BundleDescriptor {
    name: String,
    layout: PackerLayout,
    extra_externals: Vec<(String, String)>,
}

impl BundleDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layout: PackerLayout::default(),
            extra_externals: Vec::new(),
        }
    }

    /// Use a non-default layout
    pub fn layout(mut self, layout: PackerLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Map another import to a global the host guarantees. Rebinding
    /// `shiny` or `jquery` to a different global fails at [`describe`](Self::describe).
    pub fn extra_external(mut self, import: impl Into<String>, global: impl Into<String>) -> Self {
        self.extra_externals.push((import.into(), global.into()));
        self
    }

    /// Build the configuration. Pure: no filesystem access.
    pub fn describe(self) -> Result<BuildConfig> {
        let name = ExtensionName::new(self.name)?;
        self.layout.validate()?;

        let mut externals = ExternalsTable::host_defaults();
        for (import, global) in self.extra_externals {
            externals.insert(import, global)?;
        }

        let source = self.layout.source_path(&name);
        let directory = self.layout.output_dir();
        debug!(
            "Described extension {}: entry {}, output {}",
            name,
            source,
            directory.display()
        );

        Ok(BuildConfig {
            entries: EntryMapping::single(&name, source),
            output: OutputSpec::new(directory),
            externals,
        })
    }
}
