//! Intermediate representation for extension bundles
//!
//! - `name`: validated extension identifiers
//! - `layout`: source and output directory conventions
//! - `config`: the bundler configuration itself

pub mod config;
pub mod layout;
pub mod name;

pub use config::{
    BuildConfig, ConfigValidationError, EntryMapping, ExternalsTable, OutputSpec,
    HOST_EXTERNALS, NAME_PLACEHOLDER, OUTPUT_FILE_PATTERN,
};
pub use layout::{LayoutError, LayoutFileError, PackerLayout, LAYOUT_FILE};
pub use name::{ExtensionName, NameError, MAX_NAME_LEN};
