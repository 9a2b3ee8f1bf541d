//! Build utilities for extension bundles
//!
//! - `describe`: derive a bundler configuration from an extension name
//! - `ConfigEmitter`: write a described configuration to disk

pub mod descriptor;
pub mod emit;

pub use descriptor::{describe, describe_with, BundleDescriptor};
pub use emit::{ConfigEmitter, EmitFormat};
