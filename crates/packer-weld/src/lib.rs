//! Packer-Weld: bundle descriptors for host-embedded extensions
//!
//! Each client-side extension is packaged as one script that the host web
//! application loads next to its own runtime libraries. This crate derives
//! the bundler configuration for such an extension from its name alone:
//! one entry point, one `[name].js` artifact in the packed output directory,
//! and the host-provided globals (`shiny` as `Shiny`, `jquery` as `jQuery`)
//! marked as externals so they are never bundled.
//!
//! # Architecture
//!
//! - `ir`: extension names, project layout, and the configuration types
//! - `build`: the `describe` operation and writing configs to disk
//! - `codegen`: rendering a configuration as a bundler config module
//!
//! # Usage
//!
//! ```rust,no_run
//! use packer_weld::{describe_with, ConfigEmitter, PackerLayout};
//! use std::path::Path;
//!
//! let root = Path::new("/srv/app");
//! let layout = PackerLayout::from_project_dir(root)?;
//! let config = describe_with(&layout, "charts")?;
//! ConfigEmitter::new(&config).write_to(root)?;
//! # Ok::<(), packer_weld::PackerError>(())
//! ```

pub mod build;
pub mod codegen;
pub mod error;
pub mod ir;

// Re-export commonly used types
pub use build::{describe, describe_with, BundleDescriptor, ConfigEmitter, EmitFormat};
pub use codegen::{WebpackConfigGenerator, WEBPACK_CONFIG_FILE};
pub use error::{PackerError, Result};
pub use ir::{
    BuildConfig, ConfigValidationError, EntryMapping, ExtensionName, ExternalsTable,
    LayoutError, LayoutFileError, NameError, OutputSpec, PackerLayout, HOST_EXTERNALS,
    LAYOUT_FILE, OUTPUT_FILE_PATTERN,
};
